//! Resume document model: the structured content edited in an editor session.
//!
//! The document is a plain value: every edit produces a new document via
//! `document::commands::reduce`. List sections always hold at least one entry
//! while a document is being edited; `normalized` re-establishes that after a
//! document is read back from the store.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "My Professional Resume";
pub const DEFAULT_TEMPLATE: &str = "modern";

// ────────────────────────────────────────────────────────────────────────────
// End date
// ────────────────────────────────────────────────────────────────────────────

/// End of an experience or education period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EndDate {
    /// Free-text date as typed by the user, e.g. `06/2016`.
    Date(String),
    /// Still running ("Present").
    Ongoing,
}

impl EndDate {
    /// Parses raw form text. `present` (any case) is the ongoing sentinel.
    pub fn parse_input(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("present") {
            EndDate::Ongoing
        } else {
            EndDate::Date(text.to_string())
        }
    }

    /// Text shown in an input control bound to this value.
    pub fn input_text(&self) -> &str {
        match self {
            EndDate::Date(text) => text,
            EndDate::Ongoing => "Present",
        }
    }
}

impl Default for EndDate {
    fn default() -> Self {
        EndDate::Ongoing
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub professional_title: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub website: String,
    /// Public URL of the uploaded profile photo.
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: EndDate,
    pub description: String,
}

impl ExperienceEntry {
    pub fn is_blank(&self) -> bool {
        [
            &self.title,
            &self.company,
            &self.location,
            &self.start_date,
            &self.description,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub start_date: String,
    pub end_date: EndDate,
    #[serde(default)]
    pub description: Option<String>,
}

impl EducationEntry {
    pub fn is_blank(&self) -> bool {
        [
            &self.degree,
            &self.institution,
            &self.location,
            &self.start_date,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
            && self
                .description
                .as_deref()
                .map_or(true, |d| d.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub language: String,
    pub proficiency: String,
}

impl LanguageEntry {
    pub fn is_blank(&self) -> bool {
        self.language.trim().is_empty() && self.proficiency.trim().is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────────────────────────────────────

/// The full resume as edited, previewed, exported and persisted.
///
/// Stored verbatim as the `content` JSON blob of a resume record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_template")]
    pub template_name: String,
    #[serde(default)]
    pub visibility: bool,
    #[serde(default)]
    pub personal: PersonalInfo,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl ResumeDocument {
    /// A fresh document for a new resume: blank fields, one empty entry per list.
    pub fn new_blank(template_name: &str) -> Self {
        ResumeDocument {
            title: default_title(),
            template_name: template_name.to_string(),
            visibility: false,
            personal: PersonalInfo::default(),
            summary: String::new(),
            experience: vec![ExperienceEntry::default()],
            education: vec![EducationEntry::default()],
            skills: vec![String::new()],
            languages: vec![LanguageEntry::default()],
        }
    }

    /// Restores the one-entry minimum on every list section.
    pub fn normalized(mut self) -> Self {
        if self.experience.is_empty() {
            self.experience.push(ExperienceEntry::default());
        }
        if self.education.is_empty() {
            self.education.push(EducationEntry::default());
        }
        if self.skills.is_empty() {
            self.skills.push(String::new());
        }
        if self.languages.is_empty() {
            self.languages.push(LanguageEntry::default());
        }
        self
    }
}

impl Default for ResumeDocument {
    fn default() -> Self {
        ResumeDocument::new_blank(DEFAULT_TEMPLATE)
    }
}
