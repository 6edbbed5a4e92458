//! Webhook Signature Verification
//!
//! LINE signs each webhook request with base64(HMAC-SHA256(channel secret,
//! raw body)) in the `x-line-signature` header. Verification must run over
//! the unparsed body bytes; re-serializing parsed JSON changes the digest.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the base64-encoded HMAC-SHA256 signature for a payload.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Verify an `x-line-signature` header value against the raw request body.
pub fn verify_signature(secret: &str, payload: &[u8], signature: &str) -> bool {
    let expected = sign_payload(secret, payload);
    // Constant-time comparison
    expected.len() == signature.len()
        && expected
            .as_bytes()
            .iter()
            .zip(signature.as_bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let secret = "test_channel_secret";
        let payload = br#"{"events":[]}"#;
        let sig = sign_payload(secret, payload);
        assert!(verify_signature(secret, payload, &sig));
        assert!(!verify_signature("wrong_secret", payload, &sig));
        assert!(!verify_signature(secret, br#"{"events":[{}]}"#, &sig));
    }

    #[test]
    fn rejects_truncated_signature() {
        let secret = "test_channel_secret";
        let payload = b"body";
        let sig = sign_payload(secret, payload);
        assert!(!verify_signature(secret, payload, &sig[..sig.len() - 1]));
        assert!(!verify_signature(secret, payload, ""));
    }

    #[test]
    fn signature_is_base64() {
        let sig = sign_payload("secret", b"payload");
        // SHA-256 digest is 32 bytes, so the base64 form is 44 chars.
        assert_eq!(sig.len(), 44);
        assert!(BASE64.decode(&sig).is_ok());
    }
}
