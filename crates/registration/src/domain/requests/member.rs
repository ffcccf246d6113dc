use crate::domain::catalog::{Faculty, Major, StudyTime};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A validated, normalized registration ready for the datastore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub phone: String,
    pub faculty: Faculty,
    pub major: Major,
    pub study_time: Option<StudyTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}
