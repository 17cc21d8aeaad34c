//! Item Collection
//!
//! Items are scoped to a box and listed newest-first.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::warn;

use super::collection::Collection;
use crate::domain::{DomainError, DomainResult, Entity, Item, ItemPatch, NewItem};
use crate::gateway::TableGateway;

fn newest_first(a: &Item, b: &Item) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

impl Collection<Item> {
    pub fn items(gateway: Arc<dyn TableGateway<Item>>, box_id: &str) -> Self {
        Collection::new(gateway, box_id, newest_first)
    }

    pub async fn create_item(&mut self, name: &str, description: Option<&str>) -> DomainResult<Item> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Invalid("item name is empty".to_string()));
        }
        let box_id = self.scope.clone();
        let mut draft = NewItem::new(&box_id, name);
        draft.description = description.map(str::to_string);
        self.create(draft).await
    }

    /// Move an item into another box.
    ///
    /// The item leaves this collection immediately; the destination
    /// scope learns about it through its change feed or next load. A
    /// failed remote move triggers a compensating reload here.
    pub async fn move_to_box(&mut self, id: &str, destination_box_id: &str) -> DomainResult<()> {
        self.rows.retain(|item| item.id() != id);
        if let Err(e) = self
            .gateway
            .update(id, ItemPatch::move_to(destination_box_id))
            .await
        {
            warn!(id, destination_box_id, error = %e, "move failed, resyncing");
            let _ = self.load().await;
            self.error = Some(e.to_string());
            return Err(e);
        }
        Ok(())
    }
}
