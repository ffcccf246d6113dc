use regex::Regex;
use std::sync::LazyLock;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0|\+62)[0-9]{8,}$").expect("phone pattern compiles"));

fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// `0` or `+62`, then at least 8 digits. Whitespace is ignored.
pub fn is_valid_phone(input: &str) -> bool {
    PHONE_PATTERN.is_match(&strip_whitespace(input))
}

/// Strips whitespace and rewrites a leading `0` to `+62`.
pub fn normalize_phone(input: &str) -> String {
    let compact = strip_whitespace(input);
    match compact.strip_prefix('0') {
        Some(rest) => format!("+62{rest}"),
        None => compact,
    }
}
