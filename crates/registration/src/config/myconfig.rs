use crate::domain::{
    form::{BirthDateField, FormVariant},
    share::Community,
};
use anyhow::{Context, Result, anyhow};
use std::time::Duration;

const DEFAULT_MEMBERS_TABLE: &str = "members";
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;
const DEFAULT_OTEL_ENDPOINT: &str = "http://otel-collector:4317";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatastoreConfig {
    Postgres {
        database_url: String,
        run_migrations: bool,
    },
    Rest {
        base_url: String,
        api_key: String,
        table: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub datastore: DatastoreConfig,
    pub community: Community,
    pub variant: FormVariant,
    pub session_idle: Duration,
    pub otel_endpoint: String,
    pub is_dev: bool,
    pub enable_file_log: bool,
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Missing environment variable: {key}"))
        };

        let port = required("PORT")?
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let datastore = match required("DATASTORE")?.as_str() {
            "postgres" => DatastoreConfig::Postgres {
                database_url: required("DATABASE_URL")?,
                run_migrations: parse_flag("RUN_MIGRATIONS", &required("RUN_MIGRATIONS")?)?,
            },
            "rest" => DatastoreConfig::Rest {
                base_url: required("SUPABASE_URL")?.trim_end_matches('/').to_string(),
                api_key: required("SUPABASE_ANON_KEY")?,
                table: lookup("MEMBERS_TABLE")
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_MEMBERS_TABLE.to_string()),
            },
            other => {
                return Err(anyhow!(
                    "DATASTORE must be 'postgres' or 'rest', got '{}'",
                    other
                ));
            }
        };

        let community = Community {
            org_name: required("ORG_NAME")?,
            group_link: required("GROUP_LINK")?,
        };

        let gallery = lookup("GALLERY_IMAGES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let birth_date = match lookup("BIRTH_DATE_FIELD").as_deref().map(str::trim) {
            None | Some("") | Some("hidden") => BirthDateField::Hidden,
            Some("optional") => BirthDateField::Optional,
            Some("required") => BirthDateField::Required,
            Some(other) => {
                return Err(anyhow!(
                    "BIRTH_DATE_FIELD must be 'hidden', 'optional' or 'required', got '{}'",
                    other
                ));
            }
        };

        let session_idle = match lookup("SESSION_IDLE_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("SESSION_IDLE_SECS must be a valid u64 integer")?,
            None => DEFAULT_SESSION_IDLE_SECS,
        };

        let otel_endpoint =
            lookup("OTEL_ENDPOINT").unwrap_or_else(|| DEFAULT_OTEL_ENDPOINT.to_string());

        let is_dev = lookup("DEV_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let enable_file_log = lookup("ENABLE_FILE_LOG")
            .map(|v| v == "true")
            .unwrap_or(false);

        Ok(Self {
            port,
            datastore,
            community,
            variant: FormVariant {
                gallery,
                birth_date,
            },
            session_idle: Duration::from_secs(session_idle),
            otel_endpoint,
            is_dev,
            enable_file_log,
        })
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(anyhow!("{key} must be 'true' or 'false', got '{other}'")),
    }
}
