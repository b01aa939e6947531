//! One open editor: its document, display switches, save bookkeeping and the
//! session subscription it was opened with.
//!
//! Save and export run against a snapshot taken under the lock; the lock is
//! released while the backend call is in flight, so edits keep flowing and
//! are simply not part of that save.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{AuthSubscription, Session, SessionContext};
use crate::document::commands::{EditCommand, MetaField, Outcome};
use crate::document::{reduce, ResumeDocument};
use crate::errors::AppError;
use crate::export::{ExportArtifact, ExportPipeline};
use crate::persistence::ResumeStore;
use crate::render::DisplayOptions;
use crate::templates::{check_access, TemplateCatalogue};

// ────────────────────────────────────────────────────────────────────────────
// Operation gate
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Save,
    Export,
}

impl Operation {
    fn label(self) -> &'static str {
        match self {
            Operation::Save => "save",
            Operation::Export => "export",
        }
    }
}

/// One in-flight flag per operation.
#[derive(Debug, Default)]
pub struct OperationGate {
    save: Arc<AtomicBool>,
    export: Arc<AtomicBool>,
}

impl OperationGate {
    fn flag(&self, op: Operation) -> &Arc<AtomicBool> {
        match op {
            Operation::Save => &self.save,
            Operation::Export => &self.export,
        }
    }

    /// Claims `op`, or fails with `Busy` while a previous run is in flight.
    pub fn try_begin(&self, op: Operation) -> Result<OperationTicket, AppError> {
        let flag = self.flag(op);
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AppError::Busy(format!("A {} is already in progress", op.label())));
        }
        Ok(OperationTicket {
            flag: Arc::clone(flag),
        })
    }

    pub fn in_flight(&self, op: Operation) -> bool {
        self.flag(op).load(Ordering::Acquire)
    }
}

/// Held for the duration of an operation; dropping it re-enables the trigger.
#[derive(Debug)]
pub struct OperationTicket {
    flag: Arc<AtomicBool>,
}

impl Drop for OperationTicket {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Editor state
// ────────────────────────────────────────────────────────────────────────────

pub struct EditorSession {
    pub document: ResumeDocument,
    pub record_id: Option<Uuid>,
    pub display: DisplayOptions,
    /// Bumped on every applied command.
    pub revision: u64,
    /// Revision of the last successful save; `None` until saved.
    pub saved_revision: Option<u64>,
    /// User the editor belongs to once known.
    pub owner_id: Option<Uuid>,
    auth: AuthSubscription,
    last_touched: Instant,
}

impl EditorSession {
    fn is_dirty(&self) -> bool {
        self.saved_revision != Some(self.revision)
    }

    fn touch(&mut self) {
        self.last_touched = Instant::now();
    }
}

/// Client-facing view of an editor.
#[derive(Debug, Clone, Serialize)]
pub struct EditorSnapshot {
    pub id: Uuid,
    pub record_id: Option<Uuid>,
    pub document: ResumeDocument,
    pub display: DisplayOptions,
    pub revision: u64,
    pub dirty: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplyResult {
    pub outcome: Outcome,
    pub editor: EditorSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveReceipt {
    pub record_id: Uuid,
    pub revision: u64,
    pub created: bool,
}

/// An open editor as shared between requests.
///
/// Every call carries the session of the request making it. Once the editor
/// has an owner, only that owner gets through.
pub struct EditorHandle {
    pub id: Uuid,
    context: SessionContext,
    gate: OperationGate,
    inner: Mutex<EditorSession>,
}

impl fmt::Debug for EditorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl EditorHandle {
    /// `record_id` is set for editors opened on a stored resume; those start clean.
    pub fn new(document: ResumeDocument, record_id: Option<Uuid>, session: Option<Session>) -> Self {
        let id = Uuid::new_v4();
        let owner_id = session.as_ref().map(|s| s.user_id);
        let context = SessionContext::new(session);
        let auth = context.subscribe(format!("editor {id}"));
        EditorHandle {
            id,
            gate: OperationGate::default(),
            inner: Mutex::new(EditorSession {
                document,
                record_id,
                display: DisplayOptions::default(),
                revision: 0,
                saved_revision: record_id.map(|_| 0),
                owner_id,
                auth,
                last_touched: Instant::now(),
            }),
            context,
        }
    }

    /// Checks `caller` against the owner and locks the editor for it.
    ///
    /// An owned editor answers `AuthRequired` to anonymous callers and
    /// `NotFound` to other users. The first signed-in caller of an unowned
    /// editor becomes its owner.
    async fn admit(
        &self,
        caller: Option<&Session>,
    ) -> Result<MutexGuard<'_, EditorSession>, AppError> {
        let mut inner = self.inner.lock().await;
        match (inner.owner_id, caller) {
            (Some(_), None) => return Err(AppError::AuthRequired),
            (Some(owner), Some(session)) if owner != session.user_id => {
                return Err(AppError::NotFound(format!("Editor {} not found", self.id)));
            }
            (None, Some(session)) => {
                info!("Editor {} now belongs to user {}", self.id, session.user_id);
                inner.owner_id = Some(session.user_id);
            }
            _ => {}
        }
        inner.touch();

        self.context.publish(caller.cloned());
        if let Some(change) = inner.auth.take_change() {
            debug!(
                "Editor {} session changed to {:?}",
                self.id,
                change.map(|s| s.user_id)
            );
        }
        Ok(inner)
    }

    /// Fails unless `caller` may use this editor.
    pub async fn authorize(&self, caller: Option<&Session>) -> Result<(), AppError> {
        self.admit(caller).await.map(drop)
    }

    fn snapshot_of(&self, inner: &EditorSession) -> EditorSnapshot {
        EditorSnapshot {
            id: self.id,
            record_id: inner.record_id,
            document: inner.document.clone(),
            display: inner.display,
            revision: inner.revision,
            dirty: inner.is_dirty(),
        }
    }

    pub async fn snapshot(&self, caller: Option<&Session>) -> Result<EditorSnapshot, AppError> {
        let inner = self.admit(caller).await?;
        Ok(self.snapshot_of(&inner))
    }

    /// The document and display options as they are right now.
    pub async fn document(
        &self,
        caller: Option<&Session>,
    ) -> Result<(ResumeDocument, DisplayOptions), AppError> {
        let inner = self.admit(caller).await?;
        Ok((inner.document.clone(), inner.display))
    }

    /// Applies one edit. Switching to a premium template without a session
    /// fails with `AuthRequired` and leaves the document as it was. A switch
    /// is stored under the template's id whichever name it was asked by.
    pub async fn apply(
        &self,
        command: EditCommand,
        caller: Option<&Session>,
        templates: &dyn TemplateCatalogue,
    ) -> Result<ApplyResult, AppError> {
        let target = match command.template_switch() {
            Some(name) => Some(
                templates
                    .find(name)
                    .await?
                    .ok_or_else(|| AppError::Validation(format!("Unknown template '{name}'")))?,
            ),
            None => None,
        };

        let mut inner = self.admit(caller).await?;
        let command = match target {
            Some(template) => {
                check_access(&template, caller)?;
                EditCommand::Meta(MetaField::Template(template.id))
            }
            None => command,
        };

        let reduced = reduce(&inner.document, &command);
        if reduced.outcome == Outcome::Applied {
            inner.document = reduced.document;
            inner.revision += 1;
        }
        Ok(ApplyResult {
            outcome: reduced.outcome,
            editor: self.snapshot_of(&inner),
        })
    }

    pub async fn set_display(
        &self,
        display: DisplayOptions,
        caller: Option<&Session>,
    ) -> Result<EditorSnapshot, AppError> {
        let mut inner = self.admit(caller).await?;
        inner.display = display;
        Ok(self.snapshot_of(&inner))
    }

    /// Persists a snapshot of the document for `caller`: create on first
    /// save, update afterwards.
    pub async fn save(
        &self,
        store: &dyn ResumeStore,
        caller: Option<&Session>,
    ) -> Result<SaveReceipt, AppError> {
        let (document, revision, record_id) = {
            let inner = self.admit(caller).await?;
            (inner.document.clone(), inner.revision, inner.record_id)
        };
        let user_id = caller.ok_or(AppError::AuthRequired)?.user_id;
        let _ticket = self.gate.try_begin(Operation::Save)?;

        let (record_id, created) = match record_id {
            Some(id) => {
                store.update(id, &document, user_id).await?;
                (id, false)
            }
            None => (store.create(&document, user_id).await?, true),
        };

        let mut inner = self.inner.lock().await;
        inner.record_id = Some(record_id);
        inner.saved_revision = Some(revision);
        info!(
            "Editor {} saved resume {record_id} at revision {revision} (created: {created})",
            self.id
        );
        Ok(SaveReceipt {
            record_id,
            revision,
            created,
        })
    }

    /// Renders a snapshot of the document and turns it into a PDF download.
    pub async fn export(
        &self,
        pipeline: &ExportPipeline,
        caller: Option<&Session>,
    ) -> Result<ExportArtifact, AppError> {
        let (document, display) = {
            let inner = self.admit(caller).await?;
            (inner.document.clone(), inner.display)
        };
        if caller.is_none() {
            return Err(AppError::AuthRequired);
        }
        let _ticket = self.gate.try_begin(Operation::Export)?;

        pipeline.export(&document, display).await.map_err(|e| {
            warn!("Export for editor {} failed: {e}", self.id);
            AppError::from(e)
        })
    }

    /// How long the editor has gone untouched. `None` while another request holds it.
    pub fn idle_for(&self) -> Option<Duration> {
        self.inner.try_lock().ok().map(|inner| inner.last_touched.elapsed())
    }

    pub fn gate(&self) -> &OperationGate {
        &self.gate
    }

    pub fn subscriber_count(&self) -> usize {
        self.context.subscriber_count()
    }
}
