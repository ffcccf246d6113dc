use crate::domain::{catalog::StudyTime, form::FormPatch};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Partial form update. Absent fields are left as they are; an empty string
/// clears an optional field.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema, Clone, Default)]
pub struct FormPatchRequest {
    #[validate(length(max = 120, message = "Name is too long"))]
    pub name: Option<String>,

    #[validate(length(max = 24, message = "Phone number is too long"))]
    pub phone: Option<String>,

    #[validate(length(max = 10, message = "Birth date must be YYYY-MM-DD"))]
    pub birth_date: Option<String>,

    #[validate(length(max = 64))]
    pub faculty: Option<String>,

    #[validate(length(max = 64))]
    pub major: Option<String>,

    #[validate(custom(function = "validate_study_time"))]
    pub study_time: Option<String>,
}

fn validate_study_time(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || StudyTime::parse(value).is_some() {
        return Ok(());
    }

    let mut err = ValidationError::new("study_time");
    err.message = Some("Study time must be Pagi or Malam".into());
    Err(err)
}

impl From<FormPatchRequest> for FormPatch {
    fn from(value: FormPatchRequest) -> Self {
        FormPatch {
            name: value.name,
            phone: value.phone,
            birth_date: value.birth_date,
            faculty: value.faculty,
            major: value.major,
            study_time: value.study_time,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema, Clone, Default)]
pub struct ShareRequest {
    /// Whether the client can open a native share sheet.
    #[serde(default)]
    pub native_share: bool,
}
