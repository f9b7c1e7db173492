//! The seam shared by every backend collection the console manages.

use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

/// A backend collection reachable at `/api/{COLLECTION}` with
/// list/create/update/delete semantics.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Path segment below `/api`.
    const COLLECTION: &'static str;
    /// Human-readable entity name used in errors and logs.
    const ENTITY: &'static str;

    type Create: Serialize + Validate + Send + Sync;
    type Update: Serialize + Validate + Send + Sync;

    fn id(&self) -> &str;
}
