use serde::{Deserialize, Deserializer};

/// Identifiers are assigned by the backend and treated as opaque strings.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Deserialize an identifier that the backend may send as a JSON string or number.
pub fn de_entity_id<'de, D>(deserializer: D) -> Result<EntityId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "de_entity_id")]
        id: EntityId,
    }

    #[test]
    fn accepts_string_and_numeric_ids() {
        let a: Holder = serde_json::from_str(r#"{"id":"abc-1"}"#).unwrap();
        let b: Holder = serde_json::from_str(r#"{"id":42}"#).unwrap();
        assert_eq!(a.id, "abc-1");
        assert_eq!(b.id, "42");
    }

    #[test]
    fn rejects_non_scalar_ids() {
        assert!(serde_json::from_str::<Holder>(r#"{"id":[1]}"#).is_err());
    }
}
