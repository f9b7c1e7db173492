//! Expiry inspection of the bearer token issued by the backend.
//!
//! The proxy does not hold the backend's signing key, so the signature is
//! not checked here; the backend remains the authority on validity. Only
//! the `exp` claim is read, to route expired sessions to the login page.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// What the page guard needs to know about a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// Not expired. `expires_at` is `None` when the token carries no `exp`.
    Active { expires_at: Option<DateTime<Utc>> },
    Expired,
    /// Not a decodable JWT.
    Malformed,
}

impl TokenStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

/// Classify `token` relative to `now`.
pub fn inspect(token: &str, now: DateTime<Utc>) -> TokenStatus {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let claims = match decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => data.claims,
        Err(e) => {
            tracing::debug!(error = %e, "Session token is not a decodable JWT");
            return TokenStatus::Malformed;
        }
    };

    match claims.exp {
        None => TokenStatus::Active { expires_at: None },
        Some(exp) => match Utc.timestamp_opt(exp, 0).single() {
            Some(expires_at) if expires_at > now => TokenStatus::Active {
                expires_at: Some(expires_at),
            },
            Some(_) => TokenStatus::Expired,
            None => TokenStatus::Malformed,
        },
    }
}

/// Seconds until `token` expires, if it carries an `exp` claim in the future.
pub fn seconds_remaining(token: &str, now: DateTime<Utc>) -> Option<i64> {
    match inspect(token, now) {
        TokenStatus::Active {
            expires_at: Some(expires_at),
        } => Some((expires_at - now).num_seconds()),
        _ => None,
    }
}
