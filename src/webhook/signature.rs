use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Check a payload against the `X-Hub-Signature-256` value (`sha256=<hex>`).
pub fn verify_signature(secret: &str, payload: &[u8], signature_header: Option<&str>) -> Result<()> {
    let header = signature_header
        .ok_or_else(|| AppError::WebhookVerification("Missing X-Hub-Signature-256 header".to_string()))?;

    let expected = header
        .strip_prefix("sha256=")
        .and_then(|hex_digest| hex::decode(hex_digest).ok())
        .ok_or_else(|| AppError::WebhookVerification("Malformed signature header".to_string()))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::WebhookVerification(format!("Invalid HMAC key: {e}")))?;
    mac.update(payload);

    mac.verify_slice(&expected)
        .map_err(|_| AppError::WebhookVerification("Signature mismatch".to_string()))
}

#[cfg(test)]
pub(crate) fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
