use sqlx::Error as SqlxError;
use thiserror::Error;

const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";
const INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Outcome taxonomy of a failed datastore write.
///
/// Every binding (sqlx, PostgREST, test doubles) reports failures through this
/// enum so callers never inspect provider status codes themselves.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Datastore error: {}", .0.as_deref().unwrap_or("unknown"))]
    Unknown(Option<String>),
}

impl RepositoryError {
    /// Translates a provider error signal into the typed taxonomy.
    ///
    /// `code` is the SQLSTATE reported by Postgres (directly or relayed by
    /// PostgREST), `http_status` is only set by HTTP bindings.
    pub fn classify(code: Option<&str>, http_status: Option<u16>, message: &str) -> Self {
        let message = message.trim();

        match code {
            Some(UNIQUE_VIOLATION) => return RepositoryError::Conflict(message.to_string()),
            Some(CHECK_VIOLATION) => return RepositoryError::Constraint(message.to_string()),
            Some(INSUFFICIENT_PRIVILEGE) => return RepositoryError::Forbidden(message.to_string()),
            _ => {}
        }

        if matches!(http_status, Some(401 | 403))
            || message.to_lowercase().contains("row-level security")
        {
            return RepositoryError::Forbidden(message.to_string());
        }

        if message.is_empty() {
            RepositoryError::Unknown(None)
        } else {
            RepositoryError::Unknown(Some(message.to_string()))
        }
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::Database(db_err) => {
                RepositoryError::classify(db_err.code().as_deref(), None, db_err.message())
            }
            _ => RepositoryError::classify(None, None, &err.to_string()),
        }
    }
}
