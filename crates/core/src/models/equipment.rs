use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::resource::Resource;
use crate::types::{de_entity_id, EntityId, Timestamp};

/// Upper bound on records created by a single batch request.
pub const MAX_BATCH_QUANTITY: u32 = 100;

/// A single physical piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    #[serde(deserialize_with = "de_entity_id")]
    pub id: EntityId,
    #[serde(default)]
    pub serial: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub qrs: Vec<Qr>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// A QR label generated by the backend for an equipment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Qr {
    #[serde(deserialize_with = "de_entity_id")]
    pub id: EntityId,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(rename = "equipmentID", deserialize_with = "de_entity_id")]
    pub equipment_id: EntityId,
    #[serde(rename = "qrImageURL", default)]
    pub qr_image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// Step one of the creation wizard: `quantity` identical records in one call.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipmentBatch {
    #[validate(length(min = 1, max = 150, message = "El nombre es obligatorio"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub model: Option<String>,
    #[validate(range(min = 1, max = 100, message = "La cantidad debe estar entre 1 y 100"))]
    pub quantity: u32,
}

/// Partial edit of an equipment record. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub serial: Option<String>,
}

impl Resource for Equipment {
    const COLLECTION: &'static str = "equipments";
    const ENTITY: &'static str = "Equipment";
    type Create = CreateEquipmentBatch;
    type Update = EquipmentUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_qrs_and_uppercase_url_fields() {
        let json = r#"{
            "id": "eq-1",
            "serial": "SN-001",
            "name": "Desfibrilador",
            "description": "Portátil",
            "model": "DX-9",
            "imageURL": "https://files.example.com/eq-1.png",
            "qrs": [{
                "id": 3,
                "serial": "QR-3",
                "equipmentID": "eq-1",
                "qrImageURL": "https://files.example.com/qr-3.png"
            }]
        }"#;
        let equipment: Equipment = serde_json::from_str(json).unwrap();
        assert_eq!(equipment.image_url.as_deref(), Some("https://files.example.com/eq-1.png"));
        assert_eq!(equipment.qrs.len(), 1);
        assert_eq!(equipment.qrs[0].equipment_id, "eq-1");
        assert_eq!(equipment.qrs[0].id, "3");
    }

    #[test]
    fn image_url_serializes_with_backend_casing() {
        let equipment = Equipment {
            id: "1".into(),
            serial: None,
            name: "Monitor".into(),
            description: None,
            model: None,
            image_url: Some("x".into()),
            qrs: Vec::new(),
            created_at: None,
            updated_at: None,
        };
        let value = serde_json::to_value(&equipment).unwrap();
        assert_eq!(value["imageURL"], "x");
    }

    #[test]
    fn batch_quantity_bounds() {
        let mut batch = CreateEquipmentBatch {
            name: "Bomba de infusión".into(),
            description: None,
            model: None,
            quantity: 0,
        };
        assert!(batch.validate().is_err());
        batch.quantity = MAX_BATCH_QUANTITY;
        assert!(batch.validate().is_ok());
        batch.quantity = MAX_BATCH_QUANTITY + 1;
        assert!(batch.validate().is_err());
    }

    #[test]
    fn update_skips_absent_fields() {
        let update = EquipmentUpdate {
            model: Some("X2".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, serde_json::json!({ "model": "X2" }));
    }
}
