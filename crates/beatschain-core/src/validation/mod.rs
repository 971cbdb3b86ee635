//! Validation modules
//!
//! - `file`: submitted file descriptor checks (size, content type)
//! - `metadata`: user-supplied metadata override checks

pub mod file;
pub mod metadata;

pub use file::{normalize_content_type, validate_file};
pub use metadata::{validate_metadata_key, validate_metadata_value, validate_user_metadata};
