use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::resource::Resource;
use crate::types::{de_entity_id, EntityId};

/// A named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(deserialize_with = "de_entity_id")]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions_groups: Vec<PermissionGroup>,
}

/// Permissions sharing a functional area (e.g. "Equipos").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    pub group: String,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub code: String,
    pub name: String,
}

/// Payload for creating or editing a role.
///
/// Build `permissions_groups` with [`crate::permissions::group_selected`]
/// rather than by hand.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoleInput {
    #[validate(length(min = 1, max = 100, message = "El nombre es obligatorio"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub permissions_groups: Vec<PermissionGroup>,
}

impl Resource for Role {
    const COLLECTION: &'static str = "roles";
    const ENTITY: &'static str = "Role";
    type Create = RoleInput;
    type Update = RoleInput;

    fn id(&self) -> &str {
        &self.id
    }
}
