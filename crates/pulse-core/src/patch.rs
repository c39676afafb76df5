//! Arguments of the patch mutation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::RecordId;

/// Full replacement of `name` and `value` on one existing record.
///
/// Both fields are always supplied. `description` and the creation
/// timestamp are not part of the write and stay untouched.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RecordPatch {
    pub id: RecordId,
    pub name: String,
    pub value: f64,
}

impl RecordPatch {
    #[must_use]
    pub fn new(id: RecordId, name: impl Into<String>, value: f64) -> Self {
        Self {
            id,
            name: name.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_only_id_name_value() {
        let patch = RecordPatch::new(RecordId::from("abc123"), "Updated Name", 250.0);
        let json = serde_json::to_value(&patch).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(json["id"], "abc123");
        assert_eq!(json["name"], "Updated Name");
        assert_eq!(json["value"], 250.0);
    }
}
