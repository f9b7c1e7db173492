use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::resource::Resource;
use crate::types::{de_entity_id, EntityId, Timestamp};

/// An equipment category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(deserialize_with = "de_entity_id")]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// Payload for creating or editing a category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 100, message = "El nombre es obligatorio"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

impl Resource for Category {
    const COLLECTION: &'static str = "categories";
    const ENTITY: &'static str = "Category";
    type Create = CategoryInput;
    type Update = CategoryInput;

    fn id(&self) -> &str {
        &self.id
    }
}
