//! Field editors: per-section form projections and raw input translation.
//!
//! `section_form` describes the controls a client shows for one section:
//! one entry per list element, bound values, and whether the entry can be
//! removed. `FieldInput` is the one stringly-typed boundary: a form event
//! naming a section and field, turned into a typed `EditCommand` here.

use serde::{Deserialize, Serialize};

use crate::document::commands::{
    EditCommand, EducationField, ExperienceField, LanguageField, ListEdit, MetaField,
    PersonalField,
};
use crate::document::model::{
    EducationEntry, EndDate, ExperienceEntry, LanguageEntry, ResumeDocument,
};
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Meta,
    Personal,
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
}

impl SectionKey {
    fn is_list(self) -> bool {
        matches!(
            self,
            SectionKey::Experience | SectionKey::Education | SectionKey::Skills | SectionKey::Languages
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Form projection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub placeholder: &'static str,
    pub multiline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryForm {
    /// `None` for scalar sections.
    pub index: Option<usize>,
    pub fields: Vec<FormField>,
    pub removable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionForm {
    pub section: SectionKey,
    pub entries: Vec<EntryForm>,
    pub can_append: bool,
}

struct FieldDef {
    key: &'static str,
    label: &'static str,
    placeholder: &'static str,
    multiline: bool,
}

const fn single_line(key: &'static str, label: &'static str, placeholder: &'static str) -> FieldDef {
    FieldDef {
        key,
        label,
        placeholder,
        multiline: false,
    }
}

const fn multiline(key: &'static str, label: &'static str, placeholder: &'static str) -> FieldDef {
    FieldDef {
        key,
        label,
        placeholder,
        multiline: true,
    }
}

const META_FIELDS: [FieldDef; 3] = [
    single_line("title", "Resume Title", "My Professional Resume"),
    single_line("template", "Template", "modern"),
    single_line("visibility", "Public resume", "false"),
];

const PERSONAL_FIELDS: [FieldDef; 8] = [
    single_line("name", "Full Name", "John Müller"),
    single_line("professional_title", "Job Title", "e.g. Senior Software Engineer"),
    single_line("email", "Email", "email@example.com"),
    single_line("phone", "Phone", "+41 76 123 45 67"),
    single_line("address", "Location", "e.g. Zurich, Switzerland"),
    single_line("linkedin", "LinkedIn", "e.g. linkedin.com/in/yourprofile"),
    single_line("website", "Website", "e.g. yourwebsite.com"),
    single_line("photo", "Photo URL", "Upload a photo"),
];

const SUMMARY_FIELDS: [FieldDef; 1] = [multiline(
    "summary",
    "Professional Summary",
    "A brief overview of your professional background and key strengths",
)];

const EXPERIENCE_FIELDS: [FieldDef; 6] = [
    single_line("title", "Job Title", "Software Engineer"),
    single_line("company", "Company", "Company Name"),
    single_line("location", "Location", "Zurich, Switzerland"),
    single_line("start_date", "Start Date", "MM/YYYY"),
    single_line("end_date", "End Date", "MM/YYYY or Present"),
    multiline(
        "description",
        "Description",
        "Describe your responsibilities and achievements",
    ),
];

const EDUCATION_FIELDS: [FieldDef; 6] = [
    single_line("degree", "Degree", "Bachelor of Science in Computer Science"),
    single_line("institution", "Institution", "ETH Zurich"),
    single_line("location", "Location", "Zurich, Switzerland"),
    single_line("start_date", "Start Date", "MM/YYYY"),
    single_line("end_date", "End Date", "MM/YYYY or Present"),
    multiline(
        "description",
        "Description (Optional)",
        "Notable achievements, activities, or relevant coursework",
    ),
];

const SKILL_FIELDS: [FieldDef; 1] = [single_line("skill", "Skill", "e.g. Kubernetes")];

const LANGUAGE_FIELDS: [FieldDef; 2] = [
    single_line("language", "Language", "e.g. German"),
    single_line("proficiency", "Proficiency", "e.g. Native, Fluent, B2"),
];

fn bind<const N: usize>(defs: &[FieldDef; N], values: [String; N]) -> Vec<FormField> {
    defs
        .iter()
        .zip(values)
        .map(|(def, value)| FormField {
            key: def.key,
            label: def.label,
            value,
            placeholder: def.placeholder,
            multiline: def.multiline,
        })
        .collect()
}

fn experience_values(e: &ExperienceEntry) -> [String; 6] {
    [
        e.title.clone(),
        e.company.clone(),
        e.location.clone(),
        e.start_date.clone(),
        e.end_date.input_text().to_string(),
        e.description.clone(),
    ]
}

fn education_values(e: &EducationEntry) -> [String; 6] {
    [
        e.degree.clone(),
        e.institution.clone(),
        e.location.clone(),
        e.start_date.clone(),
        e.end_date.input_text().to_string(),
        e.description.clone().unwrap_or_default(),
    ]
}

fn language_values(e: &LanguageEntry) -> [String; 2] {
    [e.language.clone(), e.proficiency.clone()]
}

fn list_entries<T, const N: usize>(
    items: &[T],
    defs: &[FieldDef; N],
    values: impl Fn(&T) -> [String; N],
) -> Vec<EntryForm> {
    let removable = items.len() > 1;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| EntryForm {
            index: Some(index),
            fields: bind(defs, values(item)),
            removable,
        })
        .collect()
}

fn scalar_entry(fields: Vec<FormField>) -> Vec<EntryForm> {
    vec![EntryForm {
        index: None,
        fields,
        removable: false,
    }]
}

/// Editable controls for one section of `document`.
pub fn section_form(document: &ResumeDocument, section: SectionKey) -> SectionForm {
    let entries = match section {
        SectionKey::Meta => scalar_entry(bind(
            &META_FIELDS,
            [
                document.title.clone(),
                document.template_name.clone(),
                document.visibility.to_string(),
            ],
        )),
        SectionKey::Personal => {
            let p = &document.personal;
            scalar_entry(bind(
                &PERSONAL_FIELDS,
                [
                    p.name.clone(),
                    p.professional_title.clone(),
                    p.email.clone(),
                    p.phone.clone(),
                    p.address.clone(),
                    p.linkedin.clone(),
                    p.website.clone(),
                    p.photo.clone().unwrap_or_default(),
                ],
            ))
        }
        SectionKey::Summary => scalar_entry(bind(&SUMMARY_FIELDS, [document.summary.clone()])),
        SectionKey::Experience => {
            list_entries(&document.experience, &EXPERIENCE_FIELDS, experience_values)
        }
        SectionKey::Education => {
            list_entries(&document.education, &EDUCATION_FIELDS, education_values)
        }
        SectionKey::Skills => list_entries(&document.skills, &SKILL_FIELDS, |s| [s.clone()]),
        SectionKey::Languages => {
            list_entries(&document.languages, &LANGUAGE_FIELDS, language_values)
        }
    };

    SectionForm {
        section,
        entries,
        can_append: section.is_list(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Input translation
// ────────────────────────────────────────────────────────────────────────────

/// One keystroke-level change posted by a form control.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldInput {
    pub section: SectionKey,
    #[serde(default)]
    pub index: Option<usize>,
    pub field: String,
    pub value: String,
}

fn optional(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

impl FieldInput {
    fn unknown_field(&self) -> AppError {
        AppError::Validation(format!(
            "Unknown field '{}' for section {:?}",
            self.field, self.section
        ))
    }

    fn list_index(&self) -> Result<usize, AppError> {
        self.index.ok_or_else(|| {
            AppError::Validation(format!("Section {:?} requires an entry index", self.section))
        })
    }

    /// Translates the input into exactly one typed edit command.
    pub fn into_command(self) -> Result<EditCommand, AppError> {
        let command = match self.section {
            SectionKey::Meta => EditCommand::Meta(match self.field.as_str() {
                "title" => MetaField::Title(self.value),
                "template" => MetaField::Template(self.value),
                "visibility" => MetaField::Visibility(parse_bool(&self.value)?),
                _ => return Err(self.unknown_field()),
            }),
            SectionKey::Personal => EditCommand::Personal(match self.field.as_str() {
                "name" => PersonalField::Name(self.value),
                "professional_title" => PersonalField::ProfessionalTitle(self.value),
                "email" => PersonalField::Email(self.value),
                "phone" => PersonalField::Phone(self.value),
                "address" => PersonalField::Address(self.value),
                "linkedin" => PersonalField::Linkedin(self.value),
                "website" => PersonalField::Website(self.value),
                "photo" => PersonalField::Photo(optional(self.value)),
                _ => return Err(self.unknown_field()),
            }),
            SectionKey::Summary => match self.field.as_str() {
                "summary" => EditCommand::Summary(self.value),
                _ => return Err(self.unknown_field()),
            },
            SectionKey::Experience => {
                let index = self.list_index()?;
                let field = match self.field.as_str() {
                    "title" => ExperienceField::Title(self.value),
                    "company" => ExperienceField::Company(self.value),
                    "location" => ExperienceField::Location(self.value),
                    "start_date" => ExperienceField::StartDate(self.value),
                    "end_date" => ExperienceField::EndDate(EndDate::parse_input(&self.value)),
                    "description" => ExperienceField::Description(self.value),
                    _ => return Err(self.unknown_field()),
                };
                EditCommand::Experience(ListEdit::Update { index, field })
            }
            SectionKey::Education => {
                let index = self.list_index()?;
                let field = match self.field.as_str() {
                    "degree" => EducationField::Degree(self.value),
                    "institution" => EducationField::Institution(self.value),
                    "location" => EducationField::Location(self.value),
                    "start_date" => EducationField::StartDate(self.value),
                    "end_date" => EducationField::EndDate(EndDate::parse_input(&self.value)),
                    "description" => EducationField::Description(optional(self.value)),
                    _ => return Err(self.unknown_field()),
                };
                EditCommand::Education(ListEdit::Update { index, field })
            }
            SectionKey::Skills => {
                let index = self.list_index()?;
                match self.field.as_str() {
                    "skill" => EditCommand::Skills(ListEdit::Update {
                        index,
                        field: self.value,
                    }),
                    _ => return Err(self.unknown_field()),
                }
            }
            SectionKey::Languages => {
                let index = self.list_index()?;
                let field = match self.field.as_str() {
                    "language" => LanguageField::Language(self.value),
                    "proficiency" => LanguageField::Proficiency(self.value),
                    _ => return Err(self.unknown_field()),
                };
                EditCommand::Languages(ListEdit::Update { index, field })
            }
        };
        Ok(command)
    }
}

fn parse_bool(value: &str) -> Result<bool, AppError> {
    match value.trim() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" | "" => Ok(false),
        other => Err(AppError::Validation(format!("'{other}' is not a boolean"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::reduce;

    fn input(section: SectionKey, index: Option<usize>, field: &str, value: &str) -> FieldInput {
        FieldInput {
            section,
            index,
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_single_entry_is_not_removable() {
        let doc = ResumeDocument::new_blank("modern");
        let form = section_form(&doc, SectionKey::Experience);
        assert_eq!(form.entries.len(), 1);
        assert!(!form.entries[0].removable);
        assert!(form.can_append);
        assert_eq!(form.entries[0].fields.len(), 6);
        assert_eq!(form.entries[0].fields[4].value, "Present");
    }

    #[test]
    fn test_multiple_entries_are_removable() {
        let mut doc = ResumeDocument::new_blank("modern");
        doc.skills = vec!["Rust".to_string(), "Go".to_string()];
        let form = section_form(&doc, SectionKey::Skills);
        assert!(form.entries.iter().all(|e| e.removable));
        assert_eq!(form.entries[1].fields[0].value, "Go");
        assert_eq!(form.entries[1].index, Some(1));
    }

    #[test]
    fn test_scalar_sections_cannot_append() {
        let doc = ResumeDocument::new_blank("modern");
        for section in [SectionKey::Meta, SectionKey::Personal, SectionKey::Summary] {
            let form = section_form(&doc, section);
            assert!(!form.can_append);
            assert_eq!(form.entries.len(), 1);
            assert_eq!(form.entries[0].index, None);
        }
    }

    #[test]
    fn test_input_translates_and_applies() {
        let doc = ResumeDocument::new_blank("modern");
        let cmd = input(SectionKey::Experience, Some(0), "title", "Engineer")
            .into_command()
            .unwrap();
        let reduced = reduce(&doc, &cmd);
        assert_eq!(reduced.document.experience[0].title, "Engineer");

        let cmd = input(SectionKey::Experience, Some(0), "end_date", "present")
            .into_command()
            .unwrap();
        assert_eq!(
            cmd,
            EditCommand::Experience(ListEdit::Update {
                index: 0,
                field: ExperienceField::EndDate(EndDate::Ongoing),
            })
        );
    }

    #[test]
    fn test_blank_optional_values_become_none() {
        let cmd = input(SectionKey::Personal, None, "photo", "  ")
            .into_command()
            .unwrap();
        assert_eq!(cmd, EditCommand::Personal(PersonalField::Photo(None)));

        let cmd = input(SectionKey::Education, Some(0), "description", "")
            .into_command()
            .unwrap();
        assert_eq!(
            cmd,
            EditCommand::Education(ListEdit::Update {
                index: 0,
                field: EducationField::Description(None),
            })
        );
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        assert!(matches!(
            input(SectionKey::Personal, None, "shoe_size", "44").into_command(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            input(SectionKey::Skills, None, "skill", "Rust").into_command(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            input(SectionKey::Meta, None, "visibility", "maybe").into_command(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_visibility_toggle_parses() {
        let cmd = input(SectionKey::Meta, None, "visibility", "on")
            .into_command()
            .unwrap();
        assert_eq!(cmd, EditCommand::Meta(MetaField::Visibility(true)));
    }
}
