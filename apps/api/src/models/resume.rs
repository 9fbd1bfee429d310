use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Section items
// ────────────────────────────────────────────────────────────────────────────

/// Contact details and the free-text summary at the top of the resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub linkedin: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub level: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanguageEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub proficiency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CertificationEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AwardEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub issuer: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VolunteerEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub organization: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

/// Items of a collection section. The identifier is assigned once, at creation.
pub trait SectionItem {
    fn id(&self) -> Uuid;
}

macro_rules! section_items {
    ($($ty:ident),* $(,)?) => {
        $(
            impl $ty {
                /// Creates an empty item with a freshly assigned identifier.
                pub fn new() -> Self {
                    Self {
                        id: Uuid::new_v4(),
                        ..Default::default()
                    }
                }
            }

            impl SectionItem for $ty {
                fn id(&self) -> Uuid {
                    self.id
                }
            }
        )*
    };
}

section_items!(
    ExperienceEntry,
    EducationEntry,
    SkillEntry,
    ProjectEntry,
    LanguageEntry,
    CertificationEntry,
    AwardEntry,
    VolunteerEntry,
);

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// The complete resume. Every section is always present; absent user data is
/// an empty string or an empty collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillEntry>,
    pub projects: Vec<ProjectEntry>,
    pub languages: Vec<LanguageEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub awards: Vec<AwardEntry>,
    pub volunteer: Vec<VolunteerEntry>,
}

/// The nine top-level sections of a `ResumeDocument`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    PersonalInfo,
    Experience,
    Education,
    Skills,
    Projects,
    Languages,
    Certifications,
    Awards,
    Volunteer,
}

impl SectionKey {
    pub const ALL: [SectionKey; 9] = [
        SectionKey::PersonalInfo,
        SectionKey::Experience,
        SectionKey::Education,
        SectionKey::Skills,
        SectionKey::Projects,
        SectionKey::Languages,
        SectionKey::Certifications,
        SectionKey::Awards,
        SectionKey::Volunteer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::PersonalInfo => "personalInfo",
            SectionKey::Experience => "experience",
            SectionKey::Education => "education",
            SectionKey::Skills => "skills",
            SectionKey::Projects => "projects",
            SectionKey::Languages => "languages",
            SectionKey::Certifications => "certifications",
            SectionKey::Awards => "awards",
            SectionKey::Volunteer => "volunteer",
        }
    }

    /// Parses the camelCase key used in the persisted document shape.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

/// A typed replacement for exactly one top-level section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionValue {
    PersonalInfo(PersonalInfo),
    Experience(Vec<ExperienceEntry>),
    Education(Vec<EducationEntry>),
    Skills(Vec<SkillEntry>),
    Projects(Vec<ProjectEntry>),
    Languages(Vec<LanguageEntry>),
    Certifications(Vec<CertificationEntry>),
    Awards(Vec<AwardEntry>),
    Volunteer(Vec<VolunteerEntry>),
}

impl SectionValue {
    pub fn key(&self) -> SectionKey {
        match self {
            SectionValue::PersonalInfo(_) => SectionKey::PersonalInfo,
            SectionValue::Experience(_) => SectionKey::Experience,
            SectionValue::Education(_) => SectionKey::Education,
            SectionValue::Skills(_) => SectionKey::Skills,
            SectionValue::Projects(_) => SectionKey::Projects,
            SectionValue::Languages(_) => SectionKey::Languages,
            SectionValue::Certifications(_) => SectionKey::Certifications,
            SectionValue::Awards(_) => SectionKey::Awards,
            SectionValue::Volunteer(_) => SectionKey::Volunteer,
        }
    }

    /// Decodes an untyped JSON section body for the given key.
    pub fn from_json(key: SectionKey, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match key {
            SectionKey::PersonalInfo => SectionValue::PersonalInfo(serde_json::from_value(value)?),
            SectionKey::Experience => SectionValue::Experience(serde_json::from_value(value)?),
            SectionKey::Education => SectionValue::Education(serde_json::from_value(value)?),
            SectionKey::Skills => SectionValue::Skills(serde_json::from_value(value)?),
            SectionKey::Projects => SectionValue::Projects(serde_json::from_value(value)?),
            SectionKey::Languages => SectionValue::Languages(serde_json::from_value(value)?),
            SectionKey::Certifications => {
                SectionValue::Certifications(serde_json::from_value(value)?)
            }
            SectionKey::Awards => SectionValue::Awards(serde_json::from_value(value)?),
            SectionKey::Volunteer => SectionValue::Volunteer(serde_json::from_value(value)?),
        })
    }
}

impl ResumeDocument {
    /// Returns a copy of this document with one section replaced.
    pub fn with_section(&self, value: SectionValue) -> ResumeDocument {
        let mut next = self.clone();
        match value {
            SectionValue::PersonalInfo(v) => next.personal_info = v,
            SectionValue::Experience(v) => next.experience = v,
            SectionValue::Education(v) => next.education = v,
            SectionValue::Skills(v) => next.skills = v,
            SectionValue::Projects(v) => next.projects = v,
            SectionValue::Languages(v) => next.languages = v,
            SectionValue::Certifications(v) => next.certifications = v,
            SectionValue::Awards(v) => next.awards = v,
            SectionValue::Volunteer(v) => next.volunteer = v,
        }
        next
    }

    /// Lists every collection section that holds the same identifier twice.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_unique(SectionKey::Experience, &self.experience, &mut errors);
        check_unique(SectionKey::Education, &self.education, &mut errors);
        check_unique(SectionKey::Skills, &self.skills, &mut errors);
        check_unique(SectionKey::Projects, &self.projects, &mut errors);
        check_unique(SectionKey::Languages, &self.languages, &mut errors);
        check_unique(SectionKey::Certifications, &self.certifications, &mut errors);
        check_unique(SectionKey::Awards, &self.awards, &mut errors);
        check_unique(SectionKey::Volunteer, &self.volunteer, &mut errors);
        errors
    }
}

fn check_unique<T: SectionItem>(key: SectionKey, items: &[T], errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id()) {
            errors.push(format!(
                "duplicate id {} in section '{}'",
                item.id(),
                key.as_str()
            ));
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
