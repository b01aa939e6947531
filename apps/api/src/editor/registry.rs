use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::Session;
use crate::document::model::DEFAULT_TEMPLATE;
use crate::document::ResumeDocument;
use crate::editor::session::EditorHandle;
use crate::errors::AppError;
use crate::persistence::ResumeStore;
use crate::templates::{check_access, TemplateCatalogue};

/// What to open: a stored resume, or a new one on a chosen template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenRequest {
    #[serde(default)]
    pub resume_id: Option<Uuid>,
    #[serde(default)]
    pub template: Option<String>,
}

/// All open editors, keyed by editor id.
#[derive(Default)]
pub struct EditorRegistry {
    editors: RwLock<HashMap<Uuid, Arc<EditorHandle>>>,
}

impl EditorRegistry {
    pub async fn open(
        &self,
        request: OpenRequest,
        session: Option<Session>,
        store: &dyn ResumeStore,
        templates: &dyn TemplateCatalogue,
    ) -> Result<Arc<EditorHandle>, AppError> {
        let handle = match request.resume_id {
            Some(record_id) => {
                let owner = session.as_ref().ok_or(AppError::AuthRequired)?;
                let document = store
                    .fetch_by_id(record_id, owner.user_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Resume {record_id} not found")))?;
                EditorHandle::new(document, Some(record_id), session)
            }
            None => {
                let name = request.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
                let template = templates
                    .find(name)
                    .await?
                    .ok_or_else(|| AppError::Validation(format!("Unknown template '{name}'")))?;
                check_access(&template, session.as_ref())?;
                EditorHandle::new(ResumeDocument::new_blank(&template.id), None, session)
            }
        };

        let handle = Arc::new(handle);
        self.editors.write().await.insert(handle.id, Arc::clone(&handle));
        info!(
            "Opened editor {} (record: {:?})",
            handle.id, request.resume_id
        );
        Ok(handle)
    }

    pub async fn get(&self, id: Uuid) -> Result<Arc<EditorHandle>, AppError> {
        self.editors
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Editor {id} not found")))
    }

    /// Discards the editor and any unsaved edits, if `caller` may use it.
    pub async fn close(&self, id: Uuid, caller: Option<&Session>) -> Result<(), AppError> {
        self.get(id).await?.authorize(caller).await?;
        match self.editors.write().await.remove(&id) {
            Some(_) => {
                info!("Closed editor {id}");
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Editor {id} not found"))),
        }
    }

    /// Drops editors untouched for longer than `max_idle`. Returns how many went.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut editors = self.editors.write().await;
        let before = editors.len();
        editors.retain(|_, handle| match handle.idle_for() {
            Some(idle) => idle <= max_idle,
            None => true,
        });
        let evicted = before - editors.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle editor(s)");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.editors.read().await.len()
    }
}

/// Periodically evicts idle editors for the life of the process.
pub fn spawn_eviction(registry: Arc<EditorRegistry>, max_idle: Duration) -> JoinHandle<()> {
    let period = (max_idle / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let evicted = registry.evict_idle(max_idle).await;
            debug!("Eviction sweep done ({evicted} evicted)");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::memory::MemoryResumeStore;
    use crate::templates::testing::BuiltinCatalogue;

    fn session() -> Session {
        Session {
            user_id: Uuid::new_v4(),
            email: None,
            access_token: "token".to_string(),
        }
    }

    #[tokio::test]
    async fn test_open_blank_on_free_template() {
        let registry = EditorRegistry::default();
        let store = MemoryResumeStore::default();
        let request = OpenRequest {
            resume_id: None,
            template: Some("Amadou Style".to_string()),
        };
        let editor = registry
            .open(request, None, &store, &BuiltinCatalogue)
            .await
            .unwrap();
        let snapshot = editor.snapshot(None).await.unwrap();
        assert_eq!(snapshot.document.template_name, "amadou");
        assert_eq!(snapshot.document.experience.len(), 1);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_open_premium_without_session_fails() {
        let registry = EditorRegistry::default();
        let store = MemoryResumeStore::default();
        let request = OpenRequest {
            resume_id: None,
            template: Some("executive".to_string()),
        };
        let err = registry
            .open(request.clone(), None, &store, &BuiltinCatalogue)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthRequired));
        assert_eq!(registry.len().await, 0);

        assert!(registry
            .open(request, Some(session()), &store, &BuiltinCatalogue)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_open_stored_resume_is_owner_scoped() {
        let registry = EditorRegistry::default();
        let store = MemoryResumeStore::default();
        let owner = session();
        let mut doc = ResumeDocument::new_blank("simple");
        doc.title = "Backend CV".to_string();
        let record_id = store.create(&doc, owner.user_id).await.unwrap();

        let request = OpenRequest {
            resume_id: Some(record_id),
            template: None,
        };
        let editor = registry
            .open(request.clone(), Some(owner.clone()), &store, &BuiltinCatalogue)
            .await
            .unwrap();
        let snapshot = editor.snapshot(Some(&owner)).await.unwrap();
        assert_eq!(snapshot.record_id, Some(record_id));
        assert_eq!(snapshot.document.title, "Backend CV");
        assert!(!snapshot.dirty);

        let stranger = registry
            .open(request.clone(), Some(session()), &store, &BuiltinCatalogue)
            .await;
        assert!(matches!(stranger, Err(AppError::NotFound(_))));

        let anonymous = registry.open(request, None, &store, &BuiltinCatalogue).await;
        assert!(matches!(anonymous, Err(AppError::AuthRequired)));
    }

    #[tokio::test]
    async fn test_close_removes_editor() {
        let registry = EditorRegistry::default();
        let store = MemoryResumeStore::default();
        let editor = registry
            .open(OpenRequest::default(), None, &store, &BuiltinCatalogue)
            .await
            .unwrap();
        assert_eq!(editor.subscriber_count(), 1);

        registry.close(editor.id, None).await.unwrap();
        assert!(matches!(registry.get(editor.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            registry.close(editor.id, None).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_close_is_refused_to_anyone_but_the_owner() {
        let registry = EditorRegistry::default();
        let store = MemoryResumeStore::default();
        let owner = session();
        let editor = registry
            .open(OpenRequest::default(), Some(owner.clone()), &store, &BuiltinCatalogue)
            .await
            .unwrap();

        assert!(matches!(
            registry.close(editor.id, None).await,
            Err(AppError::AuthRequired)
        ));
        assert!(matches!(
            registry.close(editor.id, Some(&session())).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(registry.len().await, 1, "refused close keeps the editor");

        registry.close(editor.id, Some(&owner)).await.unwrap();
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_evict_idle_removes_stale_editors() {
        let registry = EditorRegistry::default();
        let store = MemoryResumeStore::default();
        registry
            .open(OpenRequest::default(), None, &store, &BuiltinCatalogue)
            .await
            .unwrap();

        assert_eq!(registry.evict_idle(Duration::from_secs(60)).await, 0);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(registry.evict_idle(Duration::from_millis(5)).await, 1);
        assert_eq!(registry.len().await, 0);
    }
}
