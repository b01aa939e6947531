//! Template catalogue: the read-only list of selectable resume templates.
//!
//! The `templates` table is the source of truth. When it is empty the
//! built-in set is served instead, and the Amadou template is always offered
//! even if the table does not list it.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::auth::Session;
use crate::errors::AppError;
use crate::models::template::{TemplateDescriptor, TemplateRow, Tier};
use crate::persistence::PersistenceError;

pub mod handlers;

const PLACEHOLDER_THUMBNAIL: &str = "/placeholder.svg";
const AMADOU_THUMBNAIL: &str = "/lovable-uploads/d881cc78-f182-4e68-a8c1-20488d0b91fe.png";

#[async_trait]
pub trait TemplateCatalogue: Send + Sync {
    async fn list(&self) -> Result<Vec<TemplateDescriptor>, PersistenceError>;

    /// Finds a template by id or display name, ignoring case.
    async fn find(&self, name: &str) -> Result<Option<TemplateDescriptor>, PersistenceError> {
        let wanted = name.trim();
        Ok(self.list().await?.into_iter().find(|t| {
            t.id.eq_ignore_ascii_case(wanted) || t.name.eq_ignore_ascii_case(wanted)
        }))
    }
}

#[derive(Clone)]
pub struct PgTemplateCatalogue {
    pool: PgPool,
}

impl PgTemplateCatalogue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateCatalogue for PgTemplateCatalogue {
    async fn list(&self) -> Result<Vec<TemplateDescriptor>, PersistenceError> {
        let rows: Vec<TemplateRow> = sqlx::query_as(
            "SELECT id, name, description, thumbnail, is_premium, tier FROM templates ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            warn!("templates table is empty; serving built-in templates");
            return Ok(builtin_templates());
        }
        debug!("Loaded {} templates", rows.len());
        Ok(with_amadou(rows.into_iter().map(Into::into).collect()))
    }
}

fn descriptor(
    id: &str,
    name: &str,
    description: &str,
    thumbnail: &str,
    tier: Tier,
) -> TemplateDescriptor {
    TemplateDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        thumbnail: thumbnail.to_string(),
        is_premium: tier != Tier::Free,
        tier,
    }
}

fn amadou() -> TemplateDescriptor {
    descriptor(
        "amadou",
        "Amadou Style",
        "Inspired by the colorful resume sample with skills section",
        AMADOU_THUMBNAIL,
        Tier::Free,
    )
}

/// Served when the catalogue table has no rows.
pub fn builtin_templates() -> Vec<TemplateDescriptor> {
    vec![
        descriptor(
            "modern",
            "Modern",
            "A clean and modern resume template",
            PLACEHOLDER_THUMBNAIL,
            Tier::Free,
        ),
        descriptor(
            "professional",
            "Professional",
            "A professional resume template for corporate jobs",
            PLACEHOLDER_THUMBNAIL,
            Tier::Free,
        ),
        descriptor(
            "creative",
            "Creative",
            "A creative resume template that stands out",
            PLACEHOLDER_THUMBNAIL,
            Tier::Professional,
        ),
        descriptor(
            "executive",
            "Executive",
            "An executive-level resume template",
            PLACEHOLDER_THUMBNAIL,
            Tier::Enterprise,
        ),
        descriptor(
            "simple",
            "Simple",
            "A simple and elegant resume template",
            PLACEHOLDER_THUMBNAIL,
            Tier::Free,
        ),
        amadou(),
    ]
}

fn with_amadou(mut templates: Vec<TemplateDescriptor>) -> Vec<TemplateDescriptor> {
    if !templates.iter().any(|t| t.id == "amadou") {
        templates.push(amadou());
    }
    templates
}

/// Premium templates need a signed-in user; any signed-in user may use them.
pub fn check_access(template: &TemplateDescriptor, session: Option<&Session>) -> Result<(), AppError> {
    if template.is_premium && session.is_none() {
        return Err(AppError::AuthRequired);
    }
    Ok(())
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Catalogue fake serving the built-in set.
    #[derive(Default)]
    pub struct BuiltinCatalogue;

    #[async_trait]
    impl TemplateCatalogue for BuiltinCatalogue {
        async fn list(&self) -> Result<Vec<TemplateDescriptor>, PersistenceError> {
            Ok(builtin_templates())
        }
    }
}
