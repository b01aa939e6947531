//! Preview projection: turns a document into a render-ready layout tree.
//!
//! `render_preview` is pure: no clock, no randomness, no I/O. The export
//! pipeline relies on this to capture exactly what the user saw.
//!
//! # Placeholder rules
//! - Header fields (name, title, email, phone, address) always render; empty
//!   values are replaced by a placeholder string.
//! - List entries whose fields are all blank are skipped. A section with no
//!   remaining entries renders nothing, heading included.
//! - Partially filled entries use per-field placeholders.
//! - Empty summary and empty descriptions are omitted.

use serde::{Deserialize, Serialize};

use crate::document::model::{
    EducationEntry, EndDate, ExperienceEntry, LanguageEntry, PersonalInfo, ResumeDocument,
};
use crate::render::templates::{SkillsStyle, TemplateKind, Theme};

pub const NAME_PLACEHOLDER: &str = "Your Name";
pub const TITLE_PLACEHOLDER: &str = "Professional Title";
pub const EMAIL_PLACEHOLDER: &str = "email@example.com";
pub const PHONE_PLACEHOLDER: &str = "+41 00 000 00 00";
pub const ADDRESS_PLACEHOLDER: &str = "City, Country";
const DATE_PLACEHOLDER: &str = "MM/YYYY";

// ────────────────────────────────────────────────────────────────────────────
// Layout types
// ────────────────────────────────────────────────────────────────────────────

/// Viewer-side switches that change the rendering but not the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub show_photo: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions { show_photo: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewLayout {
    pub template: TemplateKind,
    pub theme: Theme,
    pub header: HeaderBlock,
    pub main: Vec<SectionBlock>,
    /// Side column; empty for single-column themes.
    pub side: Vec<SectionBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderBlock {
    pub name: String,
    pub professional_title: String,
    pub contacts: Vec<String>,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
}

impl SectionKind {
    pub fn heading(self) -> &'static str {
        match self {
            SectionKind::Summary => "Professional Summary",
            SectionKind::Experience => "Work Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Languages => "Languages",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionBlock {
    pub kind: SectionKind,
    pub heading: &'static str,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "items", rename_all = "snake_case")]
pub enum SectionBody {
    Paragraph(String),
    Entries(Vec<EntryBlock>),
    Chips(Vec<String>),
    Bullets(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryBlock {
    pub heading: String,
    pub subheading: String,
    pub period: String,
    pub description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Projection
// ────────────────────────────────────────────────────────────────────────────

/// Projects a document onto the layout of the given template.
pub fn render_preview(
    document: &ResumeDocument,
    template: TemplateKind,
    options: DisplayOptions,
) -> PreviewLayout {
    let theme = template.theme();
    let header = header_block(&document.personal, options);

    let summary = non_blank(&document.summary).map(|text| SectionBlock {
        kind: SectionKind::Summary,
        heading: SectionKind::Summary.heading(),
        body: SectionBody::Paragraph(text.to_string()),
    });
    let experience = entries_section(
        SectionKind::Experience,
        document
            .experience
            .iter()
            .filter(|e| !e.is_blank())
            .map(experience_block)
            .collect(),
    );
    let education = entries_section(
        SectionKind::Education,
        document
            .education
            .iter()
            .filter(|e| !e.is_blank())
            .map(education_block)
            .collect(),
    );
    let skills = skills_section(&document.skills, theme.skills_style);
    let languages = languages_section(&document.languages);

    let mut main: Vec<SectionBlock> = [summary, experience, education]
        .into_iter()
        .flatten()
        .collect();
    let trailing = [skills, languages].into_iter().flatten();

    let side = if theme.sidebar {
        trailing.collect()
    } else {
        main.extend(trailing);
        Vec::new()
    };

    PreviewLayout {
        template,
        theme,
        header,
        main,
        side,
    }
}

fn header_block(personal: &PersonalInfo, options: DisplayOptions) -> HeaderBlock {
    let mut contacts = vec![
        or_placeholder(&personal.email, EMAIL_PLACEHOLDER),
        or_placeholder(&personal.phone, PHONE_PLACEHOLDER),
        or_placeholder(&personal.address, ADDRESS_PLACEHOLDER),
    ];
    contacts.extend(
        [&personal.linkedin, &personal.website]
            .into_iter()
            .filter_map(|s| non_blank(s))
            .map(str::to_string),
    );

    let photo = if options.show_photo {
        personal
            .photo
            .as_deref()
            .and_then(non_blank)
            .map(str::to_string)
    } else {
        None
    };

    HeaderBlock {
        name: or_placeholder(&personal.name, NAME_PLACEHOLDER),
        professional_title: or_placeholder(&personal.professional_title, TITLE_PLACEHOLDER),
        contacts,
        photo,
    }
}

fn experience_block(entry: &ExperienceEntry) -> EntryBlock {
    EntryBlock {
        heading: or_placeholder(&entry.title, "Job Title"),
        subheading: join_place(&entry.company, "Company", &entry.location),
        period: period(&entry.start_date, &entry.end_date),
        description: non_blank(&entry.description).map(str::to_string),
    }
}

fn education_block(entry: &EducationEntry) -> EntryBlock {
    EntryBlock {
        heading: or_placeholder(&entry.degree, "Degree"),
        subheading: join_place(&entry.institution, "Institution", &entry.location),
        period: period(&entry.start_date, &entry.end_date),
        description: entry
            .description
            .as_deref()
            .and_then(non_blank)
            .map(str::to_string),
    }
}

fn entries_section(kind: SectionKind, entries: Vec<EntryBlock>) -> Option<SectionBlock> {
    if entries.is_empty() {
        return None;
    }
    Some(SectionBlock {
        kind,
        heading: kind.heading(),
        body: SectionBody::Entries(entries),
    })
}

fn skills_section(skills: &[String], style: SkillsStyle) -> Option<SectionBlock> {
    let items: Vec<String> = skills
        .iter()
        .filter_map(|s| non_blank(s))
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        return None;
    }
    let body = match style {
        SkillsStyle::Chips => SectionBody::Chips(items),
        SkillsStyle::List => SectionBody::Bullets(items),
    };
    Some(SectionBlock {
        kind: SectionKind::Skills,
        heading: SectionKind::Skills.heading(),
        body,
    })
}

fn languages_section(languages: &[LanguageEntry]) -> Option<SectionBlock> {
    let items: Vec<String> = languages
        .iter()
        .filter(|l| !l.is_blank())
        .map(|l| {
            let language = or_placeholder(&l.language, "Language");
            match non_blank(&l.proficiency) {
                Some(level) => format!("{language}: {level}"),
                None => language,
            }
        })
        .collect();
    if items.is_empty() {
        return None;
    }
    Some(SectionBlock {
        kind: SectionKind::Languages,
        heading: SectionKind::Languages.heading(),
        body: SectionBody::Bullets(items),
    })
}

fn period(start: &str, end: &EndDate) -> String {
    let start = or_placeholder(start, DATE_PLACEHOLDER);
    let end = match end {
        EndDate::Ongoing => "Present".to_string(),
        EndDate::Date(text) => or_placeholder(text, DATE_PLACEHOLDER),
    };
    format!("{start} - {end}")
}

fn join_place(primary: &str, primary_placeholder: &str, location: &str) -> String {
    let primary = or_placeholder(primary, primary_placeholder);
    match non_blank(location) {
        Some(location) => format!("{primary}, {location}"),
        None => primary,
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    non_blank(value).unwrap_or(placeholder).to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
