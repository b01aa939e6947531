use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Access level a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Free,
    Professional,
    Enterprise,
}

impl Tier {
    /// Parses the `tier` column; unknown labels fall back on the premium flag.
    pub fn from_label(label: Option<&str>, is_premium: bool) -> Self {
        match label.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
            Some("free") => Tier::Free,
            Some("professional") => Tier::Professional,
            Some("enterprise") => Tier::Enterprise,
            _ if is_premium => Tier::Professional,
            _ => Tier::Free,
        }
    }
}

/// Read-only reference data describing one selectable template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub thumbnail: String,
    pub is_premium: bool,
    pub tier: Tier,
}

/// A row of the `templates` table.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub is_premium: bool,
    pub tier: Option<String>,
}

impl From<TemplateRow> for TemplateDescriptor {
    fn from(row: TemplateRow) -> Self {
        TemplateDescriptor {
            tier: Tier::from_label(row.tier.as_deref(), row.is_premium),
            id: row.id,
            name: row.name,
            description: row.description.unwrap_or_default(),
            thumbnail: row
                .thumbnail
                .unwrap_or_else(|| "/placeholder.svg".to_string()),
            is_premium: row.is_premium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_label_parsing() {
        assert_eq!(Tier::from_label(Some("Enterprise"), true), Tier::Enterprise);
        assert_eq!(Tier::from_label(None, true), Tier::Professional);
        assert_eq!(Tier::from_label(Some("gold"), false), Tier::Free);
    }

    #[test]
    fn test_row_conversion_fills_missing_columns() {
        let row = TemplateRow {
            id: "modern".to_string(),
            name: "Modern".to_string(),
            description: None,
            thumbnail: None,
            is_premium: false,
            tier: None,
        };
        let descriptor = TemplateDescriptor::from(row);
        assert_eq!(descriptor.thumbnail, "/placeholder.svg");
        assert_eq!(descriptor.description, "");
        assert_eq!(descriptor.tier, Tier::Free);
    }
}
