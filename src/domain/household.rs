//! Household and User Entities
//!
//! The household is the tenancy unit owning boxes and types; users belong
//! to at most one household. Membership changes go through the remote
//! procedures, never through direct row writes from this crate.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// The grouping unit owning boxes, items and types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub invite_code: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Entity for Household {
    type Draft = NewHousehold;
    type Patch = HouseholdPatch;

    const TABLE: &'static str = "households";

    fn id(&self) -> &str {
        &self.id
    }

    fn scope(&self) -> &str {
        &self.owner_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHousehold {
    pub name: String,
    pub owner_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HouseholdPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_code: Option<String>,
}

/// A user profile row; the id matches the auth identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub household_id: Option<String>,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Entity for User {
    type Draft = NewUser;
    type Patch = UserPatch;

    const TABLE: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }

    fn scope(&self) -> &str {
        self.household_id.as_deref().unwrap_or("")
    }
}

/// Insert payload for a user; the id comes from the auth layer, not the
/// store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub household_id: Option<String>,
}

impl NewUser {
    pub fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            household_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub household_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_without_household_has_empty_scope() {
        let json = serde_json::json!({
            "id": "user-1",
            "household_id": null,
            "display_name": "Alex",
            "avatar_url": null,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z",
        });
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.scope(), "");
    }
}
