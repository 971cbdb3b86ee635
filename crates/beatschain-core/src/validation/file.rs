use crate::config::ValidationConfig;
use crate::error::ValidationError;
use crate::models::FileDescriptor;

/// Lower-case the MIME type and strip parameters such as `; codecs=mp4a.40.2`.
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Check a file descriptor against the size ceiling and the audio allow-list.
///
/// Checks run in a fixed order (empty, too large, type) so the reported reason
/// is deterministic for a given descriptor.
pub fn validate_file(file: &FileDescriptor, config: &ValidationConfig) -> Result<(), ValidationError> {
    if file.size_bytes == 0 {
        return Err(ValidationError::Empty);
    }

    if file.size_bytes > config.max_file_size_bytes {
        return Err(ValidationError::TooLarge {
            size_bytes: file.size_bytes,
            max_bytes: config.max_file_size_bytes,
        });
    }

    let content_type = normalize_content_type(&file.content_type);
    if !config
        .allowed_content_types
        .iter()
        .any(|allowed| normalize_content_type(allowed) == content_type)
    {
        return Err(ValidationError::UnsupportedType {
            content_type: file.content_type.clone(),
            allowed: config.allowed_content_types.join(", "),
        });
    }

    Ok(())
}
