use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::resource::Resource;
use crate::types::{de_entity_id, EntityId, Timestamp};

/// A workflow stage. `order_number` is the 1-based list position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    #[serde(deserialize_with = "de_entity_id")]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub order_number: u32,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StageInput {
    #[validate(length(min = 1, max = 100, message = "El nombre es obligatorio"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
}

/// Body of `PUT /api/stages/reorder`: every stage with its new position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderStages {
    pub stages: Vec<StageOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOrder {
    pub id: EntityId,
    pub order_number: u32,
}

impl ReorderStages {
    /// Every id appears once and the order numbers are exactly 1..=N.
    pub fn validate_dense(&self) -> Result<(), CoreError> {
        if self.stages.is_empty() {
            return Err(CoreError::Validation("No stages to reorder".into()));
        }
        let mut ids: Vec<&str> = self.stages.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != self.stages.len() {
            return Err(CoreError::Validation("Duplicate stage ids in reorder".into()));
        }
        let mut numbers: Vec<u32> = self.stages.iter().map(|s| s.order_number).collect();
        numbers.sort_unstable();
        let dense = numbers
            .iter()
            .zip(1u32..)
            .all(|(number, expected)| *number == expected);
        if !dense {
            return Err(CoreError::Validation(
                "Order numbers must be a dense 1-based sequence".into(),
            ));
        }
        Ok(())
    }
}

impl Resource for Stage {
    const COLLECTION: &'static str = "stages";
    const ENTITY: &'static str = "Stage";
    type Create = StageInput;
    type Update = StageInput;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Accepts `#RRGGBB` hex colors only.
fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('#').unwrap_or("");
    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color").with_message("Color inválido (use #RRGGBB)".into()))
    }
}
