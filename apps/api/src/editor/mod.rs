// Editing sessions: form projections, the per-editor state machine, and the
// registry of open editors. Documents only change through `document::reduce`.

pub mod fields;
pub mod handlers;
pub mod registry;
pub mod session;

pub use registry::{spawn_eviction, EditorRegistry};
