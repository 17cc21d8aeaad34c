//! Box Collection
//!
//! Boxes are scoped to a household and listed newest-first.

use std::cmp::Ordering;
use std::sync::Arc;

use super::collection::Collection;
use crate::domain::{BoxPatch, DomainError, DomainResult, NewBox, StorageBox};
use crate::gateway::TableGateway;
use crate::naming;

fn newest_first(a: &StorageBox, b: &StorageBox) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

impl Collection<StorageBox> {
    pub fn boxes(gateway: Arc<dyn TableGateway<StorageBox>>, household_id: &str) -> Self {
        Collection::new(gateway, household_id, newest_first)
    }

    /// Create a box with a freshly generated funky name
    pub async fn create_box(&mut self) -> DomainResult<StorageBox> {
        let household_id = self.scope.clone();
        self.create(NewBox::new(&household_id, &naming::generate_funky_name()))
            .await
    }

    /// Rename a box; the new name must keep the funky-name shape
    pub async fn rename_box(&mut self, id: &str, funky_name: &str) -> DomainResult<StorageBox> {
        if !naming::is_funky_name(funky_name) {
            return Err(DomainError::Invalid(format!(
                "not a three-word box name: {:?}",
                funky_name
            )));
        }
        self.update(id, BoxPatch::rename(funky_name)).await
    }
}
