//! Static faculty → major mapping behind the dependent selects.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Faculty {
    #[serde(rename = "Sains & Teknologi")]
    SainsTeknologi,
    #[serde(rename = "Sosial & Humaniora")]
    SosialHumaniora,
    #[serde(rename = "Bisnis")]
    Bisnis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Major {
    #[serde(rename = "Teknik Informatika")]
    TeknikInformatika,
    #[serde(rename = "Sistem Informasi")]
    SistemInformasi,
    #[serde(rename = "Teknik Industri")]
    TeknikIndustri,
    #[serde(rename = "Teknik Perangkat Lunak")]
    TeknikPerangkatLunak,
    #[serde(rename = "Teknik Elektro")]
    TeknikElektro,
    #[serde(rename = "Ilmu Komunikasi")]
    IlmuKomunikasi,
    #[serde(rename = "Sastra Inggris")]
    SastraInggris,
    #[serde(rename = "Bahasa Inggris")]
    BahasaInggris,
    #[serde(rename = "Akuntansi")]
    Akuntansi,
    #[serde(rename = "Manajemen")]
    Manajemen,
    #[serde(rename = "Administrasi Bisnis")]
    AdministrasiBisnis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum StudyTime {
    Pagi,
    Malam,
}

const SAINTEK_MAJORS: &[Major] = &[
    Major::TeknikInformatika,
    Major::SistemInformasi,
    Major::TeknikIndustri,
    Major::TeknikPerangkatLunak,
    Major::TeknikElektro,
];

const SOSHUM_MAJORS: &[Major] = &[
    Major::IlmuKomunikasi,
    Major::SastraInggris,
    Major::BahasaInggris,
];

const BISNIS_MAJORS: &[Major] = &[Major::Akuntansi, Major::Manajemen, Major::AdministrasiBisnis];

impl Faculty {
    pub const ALL: [Faculty; 3] = [
        Faculty::SainsTeknologi,
        Faculty::SosialHumaniora,
        Faculty::Bisnis,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Faculty::SainsTeknologi => "Sains & Teknologi",
            Faculty::SosialHumaniora => "Sosial & Humaniora",
            Faculty::Bisnis => "Bisnis",
        }
    }

    /// Allowed majors, in display order.
    pub fn majors(self) -> &'static [Major] {
        match self {
            Faculty::SainsTeknologi => SAINTEK_MAJORS,
            Faculty::SosialHumaniora => SOSHUM_MAJORS,
            Faculty::Bisnis => BISNIS_MAJORS,
        }
    }

    pub fn allows(self, major: Major) -> bool {
        self.majors().contains(&major)
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == value)
    }
}

impl Major {
    pub const ALL: [Major; 11] = [
        Major::TeknikInformatika,
        Major::SistemInformasi,
        Major::TeknikIndustri,
        Major::TeknikPerangkatLunak,
        Major::TeknikElektro,
        Major::IlmuKomunikasi,
        Major::SastraInggris,
        Major::BahasaInggris,
        Major::Akuntansi,
        Major::Manajemen,
        Major::AdministrasiBisnis,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Major::TeknikInformatika => "Teknik Informatika",
            Major::SistemInformasi => "Sistem Informasi",
            Major::TeknikIndustri => "Teknik Industri",
            Major::TeknikPerangkatLunak => "Teknik Perangkat Lunak",
            Major::TeknikElektro => "Teknik Elektro",
            Major::IlmuKomunikasi => "Ilmu Komunikasi",
            Major::SastraInggris => "Sastra Inggris",
            Major::BahasaInggris => "Bahasa Inggris",
            Major::Akuntansi => "Akuntansi",
            Major::Manajemen => "Manajemen",
            Major::AdministrasiBisnis => "Administrasi Bisnis",
        }
    }

    pub fn faculty(self) -> Faculty {
        match self {
            Major::TeknikInformatika
            | Major::SistemInformasi
            | Major::TeknikIndustri
            | Major::TeknikPerangkatLunak
            | Major::TeknikElektro => Faculty::SainsTeknologi,
            Major::IlmuKomunikasi | Major::SastraInggris | Major::BahasaInggris => {
                Faculty::SosialHumaniora
            }
            Major::Akuntansi | Major::Manajemen | Major::AdministrasiBisnis => Faculty::Bisnis,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == value)
    }
}

impl StudyTime {
    pub const ALL: [StudyTime; 2] = [StudyTime::Pagi, StudyTime::Malam];

    pub fn label(self) -> &'static str {
        match self {
            StudyTime::Pagi => "Pagi",
            StudyTime::Malam => "Malam",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == value)
    }
}

impl fmt::Display for Faculty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Major {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for StudyTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
