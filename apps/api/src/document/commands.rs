//! Edit commands and the single reducer that applies them.
//!
//! Each command addresses exactly one field (or one list element) of a
//! `ResumeDocument`. `reduce` never mutates its input; it returns the next
//! document plus an `Outcome` telling the caller whether anything changed.
//! Commands that address a missing list element, or that would empty a list,
//! are ignored rather than treated as errors.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::model::{
    EducationEntry, EndDate, ExperienceEntry, LanguageEntry, ResumeDocument,
};

// ────────────────────────────────────────────────────────────────────────────
// Command types
// ────────────────────────────────────────────────────────────────────────────

/// Document-level fields that are not part of a content section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum MetaField {
    Title(String),
    Template(String),
    Visibility(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PersonalField {
    Name(String),
    ProfessionalTitle(String),
    Email(String),
    Phone(String),
    Address(String),
    Linkedin(String),
    Website(String),
    Photo(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ExperienceField {
    Title(String),
    Company(String),
    Location(String),
    StartDate(String),
    EndDate(EndDate),
    Description(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum EducationField {
    Degree(String),
    Institution(String),
    Location(String),
    StartDate(String),
    EndDate(EndDate),
    Description(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum LanguageField {
    Language(String),
    Proficiency(String),
}

/// Operation on a list-valued section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListEdit<F> {
    Update { index: usize, field: F },
    Append,
    Remove { index: usize },
    Move { from: usize, to: usize },
}

/// One edit to a resume document. One variant per section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", content = "edit", rename_all = "snake_case")]
pub enum EditCommand {
    Meta(MetaField),
    Personal(PersonalField),
    Summary(String),
    Experience(ListEdit<ExperienceField>),
    Education(ListEdit<EducationField>),
    Skills(ListEdit<String>),
    Languages(ListEdit<LanguageField>),
}

impl EditCommand {
    /// Template identifier this command switches to, if any.
    pub fn template_switch(&self) -> Option<&str> {
        match self {
            EditCommand::Meta(MetaField::Template(name)) => Some(name),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Reducer output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    IndexOutOfBounds,
    LastEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone)]
pub struct Reduced {
    pub document: ResumeDocument,
    pub outcome: Outcome,
}

// ────────────────────────────────────────────────────────────────────────────
// List entry shapes
// ────────────────────────────────────────────────────────────────────────────

/// An element of a list section: knows its blank shape and how to take one field edit.
trait SectionEntry: Clone + Default {
    type Field;

    fn set(&mut self, field: &Self::Field);
}

impl SectionEntry for ExperienceEntry {
    type Field = ExperienceField;

    fn set(&mut self, field: &ExperienceField) {
        match field {
            ExperienceField::Title(v) => self.title = v.clone(),
            ExperienceField::Company(v) => self.company = v.clone(),
            ExperienceField::Location(v) => self.location = v.clone(),
            ExperienceField::StartDate(v) => self.start_date = v.clone(),
            ExperienceField::EndDate(v) => self.end_date = v.clone(),
            ExperienceField::Description(v) => self.description = v.clone(),
        }
    }
}

impl SectionEntry for EducationEntry {
    type Field = EducationField;

    fn set(&mut self, field: &EducationField) {
        match field {
            EducationField::Degree(v) => self.degree = v.clone(),
            EducationField::Institution(v) => self.institution = v.clone(),
            EducationField::Location(v) => self.location = v.clone(),
            EducationField::StartDate(v) => self.start_date = v.clone(),
            EducationField::EndDate(v) => self.end_date = v.clone(),
            EducationField::Description(v) => self.description = v.clone(),
        }
    }
}

impl SectionEntry for LanguageEntry {
    type Field = LanguageField;

    fn set(&mut self, field: &LanguageField) {
        match field {
            LanguageField::Language(v) => self.language = v.clone(),
            LanguageField::Proficiency(v) => self.proficiency = v.clone(),
        }
    }
}

impl SectionEntry for String {
    type Field = String;

    fn set(&mut self, field: &String) {
        self.clone_from(field);
    }
}

/// Applies a list edit in place. Returns the reason when the edit is refused.
fn apply_list<E: SectionEntry>(
    list: &mut Vec<E>,
    edit: &ListEdit<E::Field>,
) -> Result<(), IgnoreReason> {
    match edit {
        ListEdit::Update { index, field } => {
            let entry = list
                .get_mut(*index)
                .ok_or(IgnoreReason::IndexOutOfBounds)?;
            entry.set(field);
        }
        ListEdit::Append => list.push(E::default()),
        ListEdit::Remove { index } => {
            if *index >= list.len() {
                return Err(IgnoreReason::IndexOutOfBounds);
            }
            if list.len() <= 1 {
                return Err(IgnoreReason::LastEntry);
            }
            list.remove(*index);
        }
        ListEdit::Move { from, to } => {
            if *from >= list.len() || *to >= list.len() {
                return Err(IgnoreReason::IndexOutOfBounds);
            }
            let entry = list.remove(*from);
            list.insert(*to, entry);
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Reducer
// ────────────────────────────────────────────────────────────────────────────

/// Produces the document that results from applying `command` to `document`.
pub fn reduce(document: &ResumeDocument, command: &EditCommand) -> Reduced {
    let mut next = document.clone();

    let result = match command {
        EditCommand::Meta(field) => {
            match field {
                MetaField::Title(v) => next.title = v.clone(),
                MetaField::Template(v) => next.template_name = v.clone(),
                MetaField::Visibility(v) => next.visibility = *v,
            }
            Ok(())
        }
        EditCommand::Personal(field) => {
            let personal = &mut next.personal;
            match field {
                PersonalField::Name(v) => personal.name = v.clone(),
                PersonalField::ProfessionalTitle(v) => personal.professional_title = v.clone(),
                PersonalField::Email(v) => personal.email = v.clone(),
                PersonalField::Phone(v) => personal.phone = v.clone(),
                PersonalField::Address(v) => personal.address = v.clone(),
                PersonalField::Linkedin(v) => personal.linkedin = v.clone(),
                PersonalField::Website(v) => personal.website = v.clone(),
                PersonalField::Photo(v) => personal.photo = v.clone(),
            }
            Ok(())
        }
        EditCommand::Summary(v) => {
            next.summary = v.clone();
            Ok(())
        }
        EditCommand::Experience(edit) => apply_list(&mut next.experience, edit),
        EditCommand::Education(edit) => apply_list(&mut next.education, edit),
        EditCommand::Skills(edit) => apply_list(&mut next.skills, edit),
        EditCommand::Languages(edit) => apply_list(&mut next.languages, edit),
    };

    match result {
        Ok(()) => Reduced {
            document: next,
            outcome: Outcome::Applied,
        },
        Err(reason) => {
            debug!("Ignored edit command {command:?}: {reason:?}");
            Reduced {
                document: document.clone(),
                outcome: Outcome::Ignored(reason),
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_document() -> ResumeDocument {
        let mut doc = ResumeDocument::new_blank("modern");
        doc.personal.name = "Anna Muster".to_string();
        doc.summary = "Backend engineer".to_string();
        doc.experience = vec![
            ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                ..ExperienceEntry::default()
            },
            ExperienceEntry {
                title: "Intern".to_string(),
                company: "Initech".to_string(),
                ..ExperienceEntry::default()
            },
        ];
        doc.skills = vec!["Rust".to_string(), "SQL".to_string()];
        doc
    }

    #[test]
    fn test_update_isolation_on_list_field() {
        let doc = filled_document();
        let cmd = EditCommand::Experience(ListEdit::Update {
            index: 1,
            field: ExperienceField::Company("Globex".to_string()),
        });
        let reduced = reduce(&doc, &cmd);

        assert_eq!(reduced.outcome, Outcome::Applied);
        assert_eq!(reduced.document.experience[1].company, "Globex");

        // Everything else must be untouched.
        let mut expected = doc.clone();
        expected.experience[1].company = "Globex".to_string();
        assert_eq!(reduced.document, expected);
        assert_eq!(doc.experience[1].company, "Initech", "input must not be mutated");
    }

    #[test]
    fn test_update_isolation_on_scalar_fields() {
        let doc = filled_document();
        let reduced = reduce(
            &doc,
            &EditCommand::Personal(PersonalField::Email("anna@example.ch".to_string())),
        );
        let mut expected = doc.clone();
        expected.personal.email = "anna@example.ch".to_string();
        assert_eq!(reduced.document, expected);

        let reduced = reduce(&doc, &EditCommand::Meta(MetaField::Visibility(true)));
        assert!(reduced.document.visibility);
        assert_eq!(reduced.document.summary, doc.summary);
    }

    #[test]
    fn test_remove_last_entry_is_noop() {
        let mut doc = ResumeDocument::new_blank("modern");
        doc.experience[0].title = "Engineer".to_string();
        doc.experience[0].company = "Acme".to_string();

        let reduced = reduce(
            &doc,
            &EditCommand::Experience(ListEdit::Remove { index: 0 }),
        );
        assert_eq!(reduced.outcome, Outcome::Ignored(IgnoreReason::LastEntry));
        assert_eq!(reduced.document.experience.len(), 1);
        assert_eq!(reduced.document, doc);
    }

    #[test]
    fn test_remove_deletes_addressed_entry() {
        let doc = filled_document();
        let reduced = reduce(&doc, &EditCommand::Skills(ListEdit::Remove { index: 0 }));
        assert_eq!(reduced.document.skills, vec!["SQL".to_string()]);
    }

    #[test]
    fn test_append_adds_one_blank_entry_per_section() {
        let doc = filled_document();

        let reduced = reduce(&doc, &EditCommand::Experience(ListEdit::Append));
        assert_eq!(reduced.document.experience.len(), doc.experience.len() + 1);
        let added = reduced.document.experience.last().unwrap();
        assert!(added.is_blank());
        assert_eq!(added.end_date, EndDate::Ongoing);

        let reduced = reduce(&doc, &EditCommand::Education(ListEdit::Append));
        assert_eq!(reduced.document.education.len(), 2);
        assert_eq!(reduced.document.education[1].description, None);

        let reduced = reduce(&doc, &EditCommand::Skills(ListEdit::Append));
        assert_eq!(reduced.document.skills.len(), 3);
        assert_eq!(reduced.document.skills[2], "");

        let reduced = reduce(&doc, &EditCommand::Languages(ListEdit::Append));
        assert_eq!(reduced.document.languages.len(), 2);
        assert!(reduced.document.languages[1].is_blank());
    }

    #[test]
    fn test_out_of_bounds_update_is_ignored() {
        let doc = filled_document();
        let reduced = reduce(
            &doc,
            &EditCommand::Languages(ListEdit::Update {
                index: 7,
                field: LanguageField::Language("German".to_string()),
            }),
        );
        assert_eq!(
            reduced.outcome,
            Outcome::Ignored(IgnoreReason::IndexOutOfBounds)
        );
        assert_eq!(reduced.document, doc);
    }

    #[test]
    fn test_move_reorders_entries() {
        let doc = filled_document();
        let reduced = reduce(
            &doc,
            &EditCommand::Experience(ListEdit::Move { from: 1, to: 0 }),
        );
        assert_eq!(reduced.document.experience[0].title, "Intern");
        assert_eq!(reduced.document.experience[1].title, "Engineer");

        let reduced = reduce(
            &doc,
            &EditCommand::Experience(ListEdit::Move { from: 0, to: 5 }),
        );
        assert_eq!(
            reduced.outcome,
            Outcome::Ignored(IgnoreReason::IndexOutOfBounds)
        );
    }

    #[test]
    fn test_command_json_shape() {
        let json = serde_json::json!({
            "section": "experience",
            "edit": { "op": "update", "index": 0,
                      "field": { "field": "end_date", "value": { "kind": "ongoing" } } }
        });
        let cmd: EditCommand = serde_json::from_value(json).unwrap();
        assert_eq!(
            cmd,
            EditCommand::Experience(ListEdit::Update {
                index: 0,
                field: ExperienceField::EndDate(EndDate::Ongoing),
            })
        );

        let json = serde_json::json!({ "section": "skills", "edit": { "op": "append" } });
        let cmd: EditCommand = serde_json::from_value(json).unwrap();
        assert_eq!(cmd, EditCommand::Skills(ListEdit::Append));
    }

    #[test]
    fn test_template_switch_detection() {
        let cmd = EditCommand::Meta(MetaField::Template("executive".to_string()));
        assert_eq!(cmd.template_switch(), Some("executive"));
        assert_eq!(EditCommand::Summary(String::new()).template_switch(), None);
    }
}
