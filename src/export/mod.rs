//! Result exports
//!
//! - JSON, byte-compatible with Python's `json.dumps(data, indent=2)`
//! - Paginated PDF report rendered with lopdf

mod json;
mod pdf;

pub use json::{to_python_json, JSON_EXPORT_FILENAME};
pub use pdf::{render_pdf, PdfExportError, PDF_EXPORT_FILENAME, PDF_TITLE};
