//! Type Collection
//!
//! Types are scoped to a household and kept in case-insensitive name
//! order, unlike the time-ordered collections.

use std::cmp::Ordering;
use std::sync::Arc;

use super::collection::Collection;
use crate::domain::{DomainError, DomainResult, ItemType, NewItemType};
use crate::gateway::TableGateway;

fn by_name(a: &ItemType, b: &ItemType) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

impl Collection<ItemType> {
    pub fn types(gateway: Arc<dyn TableGateway<ItemType>>, household_id: &str) -> Self {
        Collection::new(gateway, household_id, by_name)
    }

    /// Create a type, reusing an existing one on a case-insensitive
    /// name match.
    ///
    /// The duplicate check is advisory: the store holds no unique
    /// constraint on normalized names, so two sessions creating the
    /// same name concurrently can both succeed and leave two rows with
    /// identical names and colors. Those rows are surfaced as-is.
    pub async fn create_type(&mut self, name: &str) -> DomainResult<ItemType> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Invalid("type name is empty".to_string()));
        }
        if let Some(existing) = self
            .rows
            .iter()
            .find(|t| t.name.to_lowercase() == name.to_lowercase())
        {
            return Ok(existing.clone());
        }
        let household_id = self.scope.clone();
        self.create(NewItemType::new(&household_id, name)).await
    }
}
