//! Constants shared across BeatsChain crates.

/// Marker recorded as the owner when no wallet address is known.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Default upload ceiling: 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Audio content types accepted when no allow-list is configured.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] =
    &["audio/mpeg", "audio/wav", "audio/mp4", "audio/aac"];

/// Artist recorded when the audio carries no readable tag.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Token name used when neither the user nor the file supplies a title.
pub const DEFAULT_TOKEN_NAME: &str = "BeatsChain NFT";

/// Event sent to the campaign webhook before storage.
pub const EVENT_UPLOAD_START: &str = "upload_start";

/// Revenue event sent after a successful mint.
pub const EVENT_UPLOAD_COMPLETE: &str = "upload_complete";

/// Analytics event sent when a job with an attribution id fails.
pub const EVENT_UPLOAD_FAILED: &str = "upload_failed";

/// Header carrying the HMAC signature of attribution payloads.
pub const SIGNATURE_HEADER: &str = "X-BeatsChain-Signature";
