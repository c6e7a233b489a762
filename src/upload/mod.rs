//! Document uploads
//!
//! Validates the multipart `file` field, sanitizes its name and stores the
//! bytes either under the uploads directory (background processing) or in a
//! self-deleting temporary file (in-request processing).

mod filename;
mod multipart;
mod types;

pub use filename::{secure_filename, stored_file_name};
pub use multipart::{read_upload, FILE_FIELD};
pub use types::{UploadError, UploadedFile};
