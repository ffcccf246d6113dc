use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub member_id: i64,
    pub name: String,
    pub phone: String,
    pub faculty: String,
    pub major: String,
    pub study_time: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
}
