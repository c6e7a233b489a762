//! HTML rendering
//!
//! Server-rendered pages for the upload flow plus the static assets they
//! load. All user-controlled text is escaped with `html-escape`.

mod pages;

pub use pages::{render_index, render_processing, render_results, IndexView, PROCESSING_REFRESH_SECS};

/// Stylesheet served at `/static/style.css`
pub const STYLE_CSS: &str = include_str!("../../static/style.css");

/// Script served at `/static/script.js`
pub const SCRIPT_JS: &str = include_str!("../../static/script.js");
