//! Layout variants selectable by `ResumeDocument::template_name`.

use serde::{Deserialize, Serialize};

/// The built-in layout variants. `Modern` is the fallback for unknown names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Modern,
    Professional,
    Creative,
    Executive,
    Simple,
    Amadou,
}

pub const ALL_TEMPLATES: [TemplateKind; 6] = [
    TemplateKind::Modern,
    TemplateKind::Professional,
    TemplateKind::Creative,
    TemplateKind::Executive,
    TemplateKind::Simple,
    TemplateKind::Amadou,
];

impl TemplateKind {
    pub fn id(self) -> &'static str {
        match self {
            TemplateKind::Modern => "modern",
            TemplateKind::Professional => "professional",
            TemplateKind::Creative => "creative",
            TemplateKind::Executive => "executive",
            TemplateKind::Simple => "simple",
            TemplateKind::Amadou => "amadou",
        }
    }

    /// Exact (case-insensitive) lookup by identifier or display name.
    pub fn lookup(name: &str) -> Option<Self> {
        let needle = name.trim().to_ascii_lowercase();
        ALL_TEMPLATES.into_iter().find(|kind| {
            kind.id() == needle || kind.theme().display_name.to_ascii_lowercase() == needle
        })
    }

    /// Lookup with fallback to the default layout.
    pub fn resolve(name: &str) -> Self {
        Self::lookup(name).unwrap_or(TemplateKind::Modern)
    }

    pub fn theme(self) -> Theme {
        match self {
            TemplateKind::Modern => Theme {
                display_name: "Modern",
                accent: "#2563eb",
                font_stack: "'Inter', 'Helvetica Neue', Arial, sans-serif",
                header_align: HeaderAlign::Left,
                skills_style: SkillsStyle::Chips,
                sidebar: false,
            },
            TemplateKind::Professional => Theme {
                display_name: "Professional",
                accent: "#1f2937",
                font_stack: "'Lato', 'Helvetica Neue', Arial, sans-serif",
                header_align: HeaderAlign::Left,
                skills_style: SkillsStyle::List,
                sidebar: false,
            },
            TemplateKind::Creative => Theme {
                display_name: "Creative",
                accent: "#db2777",
                font_stack: "'Poppins', 'Helvetica Neue', Arial, sans-serif",
                header_align: HeaderAlign::Center,
                skills_style: SkillsStyle::Chips,
                sidebar: true,
            },
            TemplateKind::Executive => Theme {
                display_name: "Executive",
                accent: "#0f172a",
                font_stack: "'EB Garamond', Georgia, serif",
                header_align: HeaderAlign::Center,
                skills_style: SkillsStyle::List,
                sidebar: false,
            },
            TemplateKind::Simple => Theme {
                display_name: "Simple",
                accent: "#374151",
                font_stack: "Georgia, 'Times New Roman', serif",
                header_align: HeaderAlign::Left,
                skills_style: SkillsStyle::List,
                sidebar: false,
            },
            TemplateKind::Amadou => Theme {
                display_name: "Amadou Style",
                accent: "#f97316",
                font_stack: "'Montserrat', 'Helvetica Neue', Arial, sans-serif",
                header_align: HeaderAlign::Left,
                skills_style: SkillsStyle::Chips,
                sidebar: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillsStyle {
    Chips,
    List,
}

/// Visual parameters of a layout variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub display_name: &'static str,
    pub accent: &'static str,
    pub font_stack: &'static str,
    pub header_align: HeaderAlign,
    pub skills_style: SkillsStyle,
    /// Skills and languages go in a side column instead of the main flow.
    pub sidebar: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_templates_case_insensitively() {
        assert_eq!(TemplateKind::resolve("Executive"), TemplateKind::Executive);
        assert_eq!(TemplateKind::resolve("amadou style"), TemplateKind::Amadou);
        assert_eq!(TemplateKind::resolve(" simple "), TemplateKind::Simple);
    }

    #[test]
    fn test_unknown_template_falls_back_to_modern() {
        assert_eq!(TemplateKind::resolve("neon-retro"), TemplateKind::Modern);
        assert_eq!(TemplateKind::resolve(""), TemplateKind::Modern);
        assert_eq!(TemplateKind::lookup("neon-retro"), None);
    }

    #[test]
    fn test_ids_round_trip_through_lookup() {
        for kind in ALL_TEMPLATES {
            assert_eq!(TemplateKind::lookup(kind.id()), Some(kind));
        }
    }
}
