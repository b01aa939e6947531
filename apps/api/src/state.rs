use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::editor::EditorRegistry;
use crate::export::ExportPipeline;
use crate::persistence::{PhotoStore, ResumeStore};
use crate::templates::TemplateCatalogue;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Resume records. Default: `PgResumeStore`.
    pub store: Arc<dyn ResumeStore>,
    /// Profile photo objects. Default: `S3PhotoStore`.
    pub photos: Arc<dyn PhotoStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub templates: Arc<dyn TemplateCatalogue>,
    pub editors: Arc<EditorRegistry>,
    pub export: ExportPipeline,
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::auth::testing::StaticAuthProvider;
    use crate::export::testing::FakeRasterizer;
    use crate::persistence::memory::{MemoryPhotoStore, MemoryResumeStore};
    use crate::templates::testing::BuiltinCatalogue;

    /// Handles onto the fakes behind a test `AppState`.
    pub struct TestBackends {
        pub store: Arc<MemoryResumeStore>,
        pub photos: Arc<MemoryPhotoStore>,
        pub rasterizer: Arc<FakeRasterizer>,
    }

    /// Bearer token of a second signed-in user in every test state.
    pub const OTHER_TOKEN: &str = "other-token";

    /// State wired to in-memory fakes; `token` and `OTHER_TOKEN` are accepted
    /// as bearer tokens of two different users.
    pub fn test_state(token: &str) -> (AppState, TestBackends, crate::auth::Session) {
        let (mut auth, session) = StaticAuthProvider::with_user(token);
        auth.add_user(OTHER_TOKEN, "mallory@example.ch");
        let store = Arc::new(MemoryResumeStore::default());
        let photos = Arc::new(MemoryPhotoStore::default());
        let rasterizer = Arc::new(FakeRasterizer::default());
        let state = AppState {
            store: store.clone(),
            photos: photos.clone(),
            auth: Arc::new(auth),
            templates: Arc::new(BuiltinCatalogue),
            editors: Arc::new(EditorRegistry::default()),
            export: ExportPipeline::new(rasterizer.clone(), 2.0),
        };
        (
            state,
            TestBackends {
                store,
                photos,
                rasterizer,
            },
            session,
        )
    }
}
