//! Content addressing for the local provider.
//!
//! Key format: `content/{sha256 hex}`; content id: `sha256-{sha256 hex}`.

use sha2::{Digest, Sha256};

const CONTENT_ID_PREFIX: &str = "sha256-";

/// Hex-encoded SHA-256 digest of `data`.
pub fn content_digest(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

pub fn content_id(digest: &str) -> String {
    format!("{}{}", CONTENT_ID_PREFIX, digest)
}

/// Storage key for a content identifier, or `None` if it was not issued locally.
pub fn content_key(content_id: &str) -> Option<String> {
    let digest = content_id.strip_prefix(CONTENT_ID_PREFIX)?;
    if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("content/{}", digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(
            content_digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_content_key() {
        let id = content_id(&content_digest(b"beat"));
        let key = content_key(&id).unwrap();
        assert!(key.starts_with("content/"));
        assert_eq!(key.len(), "content/".len() + 64);

        assert!(content_key("QmHash").is_none());
        assert!(content_key("sha256-../../etc").is_none());
    }
}
