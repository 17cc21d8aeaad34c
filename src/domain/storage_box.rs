//! Box Entity
//!
//! A box is a physical container of items, identified to humans by its
//! generated three-word display name. Display names are not unique.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// A labeled container of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageBox {
    pub id: String,
    pub household_id: String,
    /// Generated adjective-animal-noun display name, e.g. "purple-tiger-cloud"
    pub funky_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Entity for StorageBox {
    type Draft = NewBox;
    type Patch = BoxPatch;

    const TABLE: &'static str = "boxes";

    fn id(&self) -> &str {
        &self.id
    }

    fn scope(&self) -> &str {
        &self.household_id
    }
}

/// Insert payload for a box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBox {
    pub household_id: String,
    pub funky_name: String,
}

impl NewBox {
    pub fn new(household_id: &str, funky_name: &str) -> Self {
        Self {
            household_id: household_id.to_string(),
            funky_name: funky_name.to_string(),
        }
    }
}

/// Partial update for a box
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoxPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funky_name: Option<String>,
}

impl BoxPatch {
    pub fn rename(funky_name: &str) -> Self {
        Self {
            funky_name: Some(funky_name.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_scope_is_household() {
        let json = serde_json::json!({
            "id": "boxes-1",
            "household_id": "hh-1",
            "funky_name": "purple-tiger-cloud",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z",
        });
        let b: StorageBox = serde_json::from_value(json).unwrap();
        assert_eq!(b.id(), "boxes-1");
        assert_eq!(b.scope(), "hh-1");
    }

    #[test]
    fn test_patch_skips_unset_fields() {
        let patch = BoxPatch::default();
        assert_eq!(serde_json::to_string(&patch).unwrap(), "{}");
    }
}
