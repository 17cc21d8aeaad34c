//! Item Entity
//!
//! A physical thing stored inside a box. Items can carry a photo and any
//! number of type associations. Deleting a box cascades to its items on
//! the server; the client never re-implements the cascade.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// A thing stored in a box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub box_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Storage path of the item photo, if any
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Entity for Item {
    type Draft = NewItem;
    type Patch = ItemPatch;

    const TABLE: &'static str = "items";

    fn id(&self) -> &str {
        &self.id
    }

    fn scope(&self) -> &str {
        &self.box_id
    }
}

/// Insert payload for an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub box_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewItem {
    pub fn new(box_id: &str, name: &str) -> Self {
        Self {
            box_id: box_id.to_string(),
            name: name.to_string(),
            description: None,
            image_url: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Partial update for an item
///
/// Outer `Option` means "field untouched"; the inner `Option` on nullable
/// columns distinguishes "set" from "clear".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_id: Option<String>,
}

impl ItemPatch {
    /// Rename and replace the description in one call, clearing the
    /// description when none is given
    pub fn edit(name: &str, description: Option<&str>) -> Self {
        Self {
            name: Some(name.to_string()),
            description: Some(description.map(str::to_string)),
            ..Self::default()
        }
    }

    pub fn set_image(path: Option<&str>) -> Self {
        Self {
            image_url: Some(path.map(str::to_string)),
            ..Self::default()
        }
    }

    pub fn move_to(box_id: &str) -> Self {
        Self {
            box_id: Some(box_id.to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_clears_missing_description() {
        let patch = ItemPatch::edit("Lamp", None);
        assert_eq!(patch.name.as_deref(), Some("Lamp"));
        assert_eq!(patch.description, Some(None));
        assert!(patch.box_id.is_none());
    }

    #[test]
    fn test_move_patch_touches_only_box() {
        let patch = ItemPatch::move_to("boxes-2");
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "box_id": "boxes-2" }));
    }
}
