//! Metadata validation module
//!
//! Provides validation for user-supplied metadata overrides:
//! - Key validation: pattern, max length, reserved prefixes
//! - Value validation: scalar types only, max length (JSON serialized)
//! - Key count limits

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::error::MetadataError;
use crate::models::MetadataMap;

/// Maximum length for metadata key names (64 characters)
pub const MAX_METADATA_KEY_LENGTH: usize = 64;

/// Maximum length for metadata values (512 characters when JSON serialized)
pub const MAX_METADATA_VALUE_LENGTH: usize = 512;

/// Maximum number of keys allowed in user overrides (50 keys)
pub const MAX_USER_METADATA_KEYS: usize = 50;

/// Reserved key prefixes that users cannot use
const RESERVED_PREFIXES: &[&str] = &["_system_", "_internal_"];

fn key_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_\-\.:]+$").ok())
        .as_ref()
}

/// Validate a metadata key name
///
/// Rules:
/// - Must match pattern: `^[a-zA-Z0-9_\-\.:]+$`
/// - Maximum 64 characters
/// - Cannot start with reserved prefixes
pub fn validate_metadata_key(key: &str) -> Result<(), MetadataError> {
    if key.is_empty() {
        return Err(MetadataError::EmptyKey);
    }

    if key.len() > MAX_METADATA_KEY_LENGTH {
        return Err(MetadataError::KeyTooLong {
            key: key.to_string(),
            max: MAX_METADATA_KEY_LENGTH,
        });
    }

    if !key_pattern().is_some_and(|pattern| pattern.is_match(key)) {
        return Err(MetadataError::InvalidKeyCharacters(key.to_string()));
    }

    if is_reserved_key(key) {
        return Err(MetadataError::ReservedKey(key.to_string()));
    }

    Ok(())
}

/// Check if a key is reserved (starts with reserved prefix)
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

/// Validate a metadata value: a string, number or boolean whose JSON form
/// fits in 512 characters.
pub fn validate_metadata_value(key: &str, value: &Value) -> Result<(), MetadataError> {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {}
        Value::Null | Value::Array(_) | Value::Object(_) => {
            return Err(MetadataError::NonScalarValue(key.to_string()));
        }
    }

    if value.to_string().len() > MAX_METADATA_VALUE_LENGTH {
        return Err(MetadataError::ValueTooLong {
            key: key.to_string(),
            max: MAX_METADATA_VALUE_LENGTH,
        });
    }

    Ok(())
}

/// Validate a full set of user overrides.
pub fn validate_user_metadata(metadata: &MetadataMap) -> Result<(), MetadataError> {
    if metadata.len() > MAX_USER_METADATA_KEYS {
        return Err(MetadataError::TooManyKeys {
            count: metadata.len(),
            max: MAX_USER_METADATA_KEYS,
        });
    }

    for (key, value) in metadata {
        validate_metadata_key(key)?;
        validate_metadata_value(key, value)?;
    }

    Ok(())
}
