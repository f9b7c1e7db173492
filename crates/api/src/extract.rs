//! Request extractors.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use medinv_core::error::CoreError;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that is deserialized and then checked with [`Validate`].
///
/// Both malformed JSON and failed validation reject with a 400
/// `{ "message": ... }` instead of axum's plain-text rejection.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate().map_err(CoreError::from)?;
        Ok(ValidatedJson(value))
    }
}

/// Longest identifier accepted in a `{id}` path segment.
const MAX_ID_LEN: usize = 128;

/// The `{id}` path parameter, checked to be a single plain segment.
///
/// The id is pasted into the upstream path, so anything that could change
/// that path (`/`, dot segments, encoded characters) is rejected with 400.
#[derive(Debug, Clone)]
pub struct ResourceId(pub String);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        if !is_plain_segment(&id) {
            tracing::warn!(id = %id, "Rejected path id");
            return Err(AppError::BadRequest("Identificador inválido".into()));
        }
        Ok(ResourceId(id))
    }
}

fn is_plain_segment(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ids_are_accepted() {
        assert!(is_plain_segment("42"));
        assert!(is_plain_segment("64f1c2a9e4b0a1d2c3e4f5a6"));
        assert!(is_plain_segment("3f2b8c1e-7d4a-4e9b-9c2d-1a2b3c4d5e6f"));
    }

    #[test]
    fn path_changing_ids_are_rejected() {
        for id in ["", "..", "../users/5", "a/b", "a%2Fb", "a?b", "a#b", ".", "a b"] {
            assert!(!is_plain_segment(id), "{id:?} should be rejected");
        }
        assert!(!is_plain_segment(&"x".repeat(MAX_ID_LEN + 1)));
    }
}
