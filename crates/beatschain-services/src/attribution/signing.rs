use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::AttributionError;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 of `body`.
pub fn sign_payload(body: &str, secret: &str) -> Result<String, AttributionError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AttributionError::Signing(format!("Invalid signing secret: {}", e)))?;

    mac.update(body.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Value of the signature header: `sha256=<hex>`.
pub fn signature_header_value(body: &str, secret: &str) -> Result<String, AttributionError> {
    Ok(format!("sha256={}", sign_payload(body, secret)?))
}

/// Check a received `sha256=<hex>` header against `body`.
pub fn verify_signature(body: &str, secret: &str, header: &str) -> Result<bool, AttributionError> {
    let Some(signature) = header.strip_prefix("sha256=") else {
        return Ok(false);
    };
    let expected = hex::decode(signature).map_err(|e| {
        AttributionError::Signing(format!("Signature is not hex encoded: {}", e))
    })?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AttributionError::Signing(format!("Invalid signing secret: {}", e)))?;
    mac.update(body.as_bytes());

    Ok(mac.verify_slice(&expected).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2
        let signature = sign_payload("what do ya want for nothing?", "Jefe").unwrap();
        assert_eq!(
            signature,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_header_round_trip() {
        let body = r#"{"event_type":"upload_start"}"#;
        let header = signature_header_value(body, "secret").unwrap();
        assert!(header.starts_with("sha256="));
        assert!(verify_signature(body, "secret", &header).unwrap());
        assert!(!verify_signature(body, "other", &header).unwrap());
        assert!(!verify_signature("tampered", "secret", &header).unwrap());
        assert!(!verify_signature(body, "secret", "v1=abc").unwrap());
    }
}
