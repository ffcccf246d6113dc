use crate::domain::{
    catalog::{Faculty, StudyTime},
    form::BirthDateField,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct FacultyResponse {
    pub name: String,
    pub majors: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct CatalogResponse {
    pub faculties: Vec<FacultyResponse>,
    pub study_times: Vec<String>,
    pub birth_date: BirthDateField,
    pub gallery_size: usize,
}

impl CatalogResponse {
    pub fn build(birth_date: BirthDateField, gallery_size: usize) -> Self {
        let faculties = Faculty::ALL
            .into_iter()
            .map(|faculty| FacultyResponse {
                name: faculty.label().to_string(),
                majors: faculty
                    .majors()
                    .iter()
                    .map(|m| m.label().to_string())
                    .collect(),
            })
            .collect();

        Self {
            faculties,
            study_times: StudyTime::ALL
                .into_iter()
                .map(|s| s.label().to_string())
                .collect(),
            birth_date,
            gallery_size,
        }
    }
}
