//! Form model and validator for a single registration.

use crate::domain::{
    catalog::{Faculty, Major, StudyTime},
    phone::{is_valid_phone, normalize_phone},
    requests::member::CreateMemberRequest,
};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::LazyLock};
use utoipa::ToSchema;

pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters";
pub const PHONE_INVALID: &str =
    "Phone number must start with 0 or +62 followed by at least 8 digits";
pub const BIRTH_DATE_REQUIRED: &str = "Birth date is required";
pub const BIRTH_DATE_INVALID: &str = "Birth date must be a valid date (YYYY-MM-DD)";
pub const BIRTH_DATE_IN_FUTURE: &str = "Birth date cannot be in the future";
pub const FACULTY_REQUIRED: &str = "Select a faculty";
pub const MAJOR_REQUIRED: &str = "Select a major";
pub const MAJOR_MISMATCH: &str = "Select a major that belongs to the selected faculty";

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern compiles"));

/// Form fields, ordered the way the validator evaluates them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Phone,
    BirthDate,
    Faculty,
    Major,
    StudyTime,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::BirthDate => "birth_date",
            Field::Faculty => "faculty",
            Field::Major => "major",
            Field::StudyTime => "study_time",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BirthDateField {
    #[default]
    Hidden,
    Optional,
    Required,
}

/// Which optional screens and fields a deployment of the form shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormVariant {
    pub gallery: Vec<String>,
    pub birth_date: BirthDateField,
}

impl FormVariant {
    pub fn has_gallery(&self) -> bool {
        !self.gallery.is_empty()
    }
}

/// Raw field values as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationInput {
    pub name: String,
    pub phone: String,
    pub birth_date: Option<String>,
    pub faculty: Option<String>,
    pub major: Option<String>,
    pub study_time: Option<String>,
}

impl RegistrationInput {
    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.phone = value.into();
    }

    pub fn set_birth_date(&mut self, value: Option<String>) {
        self.birth_date = value.filter(|v| !v.trim().is_empty());
    }

    /// Returns `true` when the faculty changed; a change drops the chosen major.
    pub fn select_faculty(&mut self, value: impl Into<String>) -> bool {
        let value = Some(value.into()).filter(|v| !v.trim().is_empty());
        if self.faculty == value {
            return false;
        }
        self.faculty = value;
        self.major = None;
        true
    }

    pub fn select_major(&mut self, value: Option<String>) {
        self.major = value.filter(|v| !v.is_empty());
    }

    pub fn set_study_time(&mut self, value: Option<String>) {
        self.study_time = value.filter(|v| !v.is_empty());
    }

    pub fn selected_faculty(&self) -> Option<Faculty> {
        self.faculty.as_deref().and_then(Faculty::parse)
    }

    pub fn major_options(&self) -> &'static [Major] {
        self.selected_faculty().map(Faculty::majors).unwrap_or(&[])
    }

    /// Checks every field in order and returns the normalized insert record.
    pub fn validate(
        &self,
        variant: &FormVariant,
        today: NaiveDate,
    ) -> Result<CreateMemberRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.chars().count() < 2 {
            errors.insert(Field::Name, NAME_TOO_SHORT);
        }

        if !is_valid_phone(&self.phone) {
            errors.insert(Field::Phone, PHONE_INVALID);
        }

        let birth_date = match check_birth_date(self.birth_date.as_deref(), variant, today) {
            Ok(date) => date,
            Err(msg) => {
                errors.insert(Field::BirthDate, msg);
                None
            }
        };

        let faculty = self.selected_faculty();
        if faculty.is_none() {
            errors.insert(Field::Faculty, FACULTY_REQUIRED);
        }

        // Runs even when the faculty is missing so a bad pair is always
        // reported on the major itself.
        let major = match self.major.as_deref().filter(|m| !m.is_empty()) {
            None => {
                errors.insert(Field::Major, MAJOR_REQUIRED);
                None
            }
            Some(raw) => match (faculty, Major::parse(raw)) {
                (Some(faculty), Some(major)) if faculty.allows(major) => Some(major),
                _ => {
                    errors.insert(Field::Major, MAJOR_MISMATCH);
                    None
                }
            },
        };

        let study_time = self.study_time.as_deref().and_then(StudyTime::parse);

        match (faculty, major) {
            (Some(faculty), Some(major)) if errors.is_empty() => Ok(CreateMemberRequest {
                name: name.to_string(),
                phone: normalize_phone(&self.phone),
                faculty,
                major,
                study_time,
                birth_date,
            }),
            _ => Err(errors),
        }
    }
}

fn check_birth_date(
    raw: Option<&str>,
    variant: &FormVariant,
    today: NaiveDate,
) -> Result<Option<NaiveDate>, &'static str> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty());

    match (variant.birth_date, raw) {
        (BirthDateField::Hidden, _) => Ok(None),
        (BirthDateField::Optional, None) => Ok(None),
        (BirthDateField::Required, None) => Err(BIRTH_DATE_REQUIRED),
        (_, Some(raw)) => {
            if !ISO_DATE.is_match(raw) {
                return Err(BIRTH_DATE_INVALID);
            }
            let date =
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| BIRTH_DATE_INVALID)?;
            if date > today {
                return Err(BIRTH_DATE_IN_FUTURE);
            }
            Ok(Some(date))
        }
    }
}

/// Partial update sent by the client; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub faculty: Option<String>,
    pub major: Option<String>,
    pub study_time: Option<String>,
}

impl FormPatch {
    /// Faculty is applied before major so a patch carrying both keeps the new major.
    pub fn apply(self, input: &mut RegistrationInput) -> Vec<Field> {
        let mut touched = Vec::new();

        if let Some(name) = self.name {
            input.set_name(name);
            touched.push(Field::Name);
        }
        if let Some(phone) = self.phone {
            input.set_phone(phone);
            touched.push(Field::Phone);
        }
        if let Some(birth_date) = self.birth_date {
            input.set_birth_date(Some(birth_date));
            touched.push(Field::BirthDate);
        }
        if let Some(faculty) = self.faculty {
            if input.select_faculty(faculty) {
                touched.push(Field::Major);
            }
            touched.push(Field::Faculty);
        }
        if let Some(major) = self.major {
            input.select_major(Some(major));
            touched.push(Field::Major);
        }
        if let Some(study_time) = self.study_time {
            input.set_study_time(Some(study_time));
            touched.push(Field::StudyTime);
        }

        touched
    }
}
