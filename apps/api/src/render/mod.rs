// Preview rendering: document + template + display options -> layout -> HTML.
// Everything in here is pure; the export pipeline captures the same output.

pub mod html;
pub mod preview;
pub mod templates;

pub use html::to_html;
pub use preview::{render_preview, DisplayOptions};
pub use templates::TemplateKind;

use crate::document::ResumeDocument;

/// Renders a document straight to HTML using its own template selection.
pub fn render_document_html(document: &ResumeDocument, options: DisplayOptions) -> String {
    let template = TemplateKind::resolve(&document.template_name);
    to_html(&render_preview(document, template, options))
}
