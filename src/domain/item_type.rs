//! Type Entity
//!
//! Types categorize items ("Electronics", "Books"). Each type carries a
//! deterministic palette color derived from its normalized name, so the
//! same name renders identically everywhere. Names are case-insensitively
//! unique per household in practice only: the client checks before
//! creating, the store does not enforce it.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use crate::color;

/// A category attachable to items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    pub id: String,
    pub household_id: String,
    pub name: String,
    /// Hex palette color, e.g. "#1E88E5"
    pub color: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Entity for ItemType {
    type Draft = NewItemType;
    type Patch = ItemTypePatch;

    const TABLE: &'static str = "types";

    fn id(&self) -> &str {
        &self.id
    }

    fn scope(&self) -> &str {
        &self.household_id
    }
}

/// Insert payload for a type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItemType {
    pub household_id: String,
    pub name: String,
    pub color: String,
}

impl NewItemType {
    /// Build a draft with the deterministic color for `name`
    pub fn new(household_id: &str, name: &str) -> Self {
        Self {
            household_id: household_id.to_string(),
            name: name.to_string(),
            color: color::type_color(name).to_string(),
        }
    }
}

/// Partial update for a type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemTypePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Join table entry for the item-type relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTypeLink {
    pub item_id: String,
    pub type_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_derives_color_from_name() {
        let a = NewItemType::new("hh-1", "Books");
        let b = NewItemType::new("hh-1", "  books  ");
        assert_eq!(a.color, b.color);
        assert!(a.color.starts_with('#'));
    }
}
