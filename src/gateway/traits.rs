//! Gateway Layer - Core Traits
//!
//! Defines the abstract call contract to the remote store. No
//! transactional guarantees are assumed across calls; implementations
//! can back onto a hosted store, or in-memory state for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::events::Subscription;
use crate::domain::{DomainResult, Entity, ItemType};

/// Row access for one remote table, generic over any Entity type
#[async_trait]
pub trait TableGateway<T: Entity>: Send + Sync {
    /// All rows under a parent key
    async fn select(&self, scope: &str) -> DomainResult<Vec<T>>;

    /// Find a row by id
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<T>>;

    /// Insert a row; the server assigns id and timestamps
    async fn insert(&self, draft: T::Draft) -> DomainResult<T>;

    /// Partial update by id, returning the stored row
    async fn update(&self, id: &str, patch: T::Patch) -> DomainResult<T>;

    /// Delete by id
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Open a realtime change feed for one scope
    fn subscribe(&self, scope: &str) -> Subscription<T>;
}

/// One row of the `search_items` remote procedure result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub item_id: String,
    pub item_name: String,
    pub item_description: Option<String>,
    pub item_image_url: Option<String>,
    pub box_id: String,
    pub box_funky_name: String,
    pub types: Vec<ItemType>,
}

/// Remote procedures; bodies live on the server and are opaque to this
/// crate.
///
/// The hosted store derives the acting user from ambient auth; this
/// crate has no ambient auth context, so the user id is an explicit
/// argument where the server needs it.
#[async_trait]
pub trait Procedures: Send + Sync {
    /// Full-text search across the household's items
    async fn search_items(&self, query: &str) -> DomainResult<Vec<SearchHit>>;

    /// Join the household owning `code`; returns the household id
    async fn join_household(&self, user_id: &str, code: &str) -> DomainResult<String>;

    /// Rotate a household's invite code; returns the new code
    async fn regenerate_invite_code(&self, household_id: &str) -> DomainResult<String>;

    /// Create a household owned by `user_id` and move them into it;
    /// returns the household id
    async fn create_household_for_user(&self, user_id: &str, name: &str) -> DomainResult<String>;
}

/// Operations on the item-type association rows
#[async_trait]
pub trait TypeAssignments: Send + Sync {
    /// Attach a type to an item (idempotent)
    async fn assign_type(&self, item_id: &str, type_id: &str) -> DomainResult<()>;

    /// Detach a type from an item
    async fn unassign_type(&self, item_id: &str, type_id: &str) -> DomainResult<()>;

    /// All types attached to an item
    async fn types_for_item(&self, item_id: &str) -> DomainResult<Vec<ItemType>>;

    /// Ids of all items carrying a type
    async fn items_with_type(&self, type_id: &str) -> DomainResult<Vec<String>>;
}
