use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

use crate::error::{AppError, Result};

#[derive(Debug, Serialize)]
struct JwtClaims {
    iat: i64,
    exp: i64,
    iss: String,
}

/// Sign a short-lived JWT identifying the GitHub App.
pub fn generate_app_jwt(app_id: u64, key_pem: &[u8]) -> Result<String> {
    let encoding_key = EncodingKey::from_rsa_pem(key_pem)
        .map_err(|e| AppError::Config(format!("Invalid RSA private key: {e}")))?;

    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        iat: now - 60,     // backdated for clock drift
        exp: now + 9 * 60, // must stay under 10 minutes
        iss: app_id.to_string(),
    };

    encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| AppError::Config(format!("Failed to generate JWT: {e}")))
}
