pub mod commands;
pub mod model;

pub use commands::{reduce, EditCommand};
pub use model::ResumeDocument;
