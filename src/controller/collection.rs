//! Optimistic Collection Controller
//!
//! One `Collection` mirrors one remote table scoped to a parent key,
//! for the lifetime of the view that owns it. Local mutations apply
//! optimistically where safe; asynchronous confirmations and realtime
//! change events reconcile by entity id, so a local create and its
//! echoed insert converge to a single copy regardless of arrival order.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{DomainResult, Entity};
use crate::gateway::{ChangeEvent, Subscription, TableGateway};

/// An ordered local mirror of one scope of a remote table
pub struct Collection<T: Entity> {
    pub(super) gateway: Arc<dyn TableGateway<T>>,
    pub(super) scope: String,
    pub(super) compare: fn(&T, &T) -> Ordering,
    pub(super) rows: Vec<T>,
    pub(super) loading: bool,
    pub(super) error: Option<String>,
    pub(super) changes: Option<Subscription<T>>,
}

impl<T: Entity> Collection<T> {
    /// A collection ordered by `compare`; call [`load`](Self::load) to
    /// populate it
    pub fn new(gateway: Arc<dyn TableGateway<T>>, scope: &str, compare: fn(&T, &T) -> Ordering) -> Self {
        Self {
            gateway,
            scope: scope.to_string(),
            compare,
            rows: Vec::new(),
            loading: false,
            error: None,
            changes: None,
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Display string of the most recent failure, if any
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Replace local state with the store's current rows for this scope.
    ///
    /// On failure the last-known rows are kept (empty on a first load)
    /// and the error string is retained for display.
    pub async fn load(&mut self) -> DomainResult<()> {
        self.loading = true;
        self.error = None;
        let fetched = self.gateway.select(&self.scope).await;
        self.loading = false;
        match fetched {
            Ok(mut rows) => {
                rows.sort_by(self.compare);
                self.rows = rows;
                Ok(())
            }
            Err(e) => {
                warn!(table = T::TABLE, scope = %self.scope, error = %e, "load failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Submit a new row and place the confirmed entity locally.
    ///
    /// Only the single confirmed row is merged in; there is no full
    /// reload, so concurrent optimistic insertions already reflected
    /// locally survive. On failure nothing local changes.
    pub async fn create(&mut self, draft: T::Draft) -> DomainResult<T> {
        match self.gateway.insert(draft).await {
            Ok(row) => {
                self.error = None;
                self.merge(row.clone());
                Ok(row)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Submit a partial update; replaces the matching local row in
    /// place on success, mutates nothing on failure
    pub async fn update(&mut self, id: &str, patch: T::Patch) -> DomainResult<T> {
        match self.gateway.update(id, patch).await {
            Ok(row) => {
                self.error = None;
                if let Some(slot) = self.rows.iter_mut().find(|r| r.id() == row.id()) {
                    *slot = row.clone();
                    self.resort();
                }
                Ok(row)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Remove the row locally first, then submit the remote delete.
    ///
    /// The optimistic removal cannot be undone in place (the prior
    /// position is gone), so a failed remote delete triggers a full
    /// compensating reload before the error is surfaced.
    pub async fn delete(&mut self, id: &str) -> DomainResult<()> {
        self.rows.retain(|row| row.id() != id);
        if let Err(e) = self.gateway.delete(id).await {
            warn!(table = T::TABLE, id, error = %e, "delete failed, resyncing");
            let _ = self.load().await;
            self.error = Some(e.to_string());
            return Err(e);
        }
        Ok(())
    }

    /// Apply one realtime change event.
    ///
    /// Merging is keyed on entity id, never on position: an insert for
    /// an id already present (this session's own optimistic create)
    /// replaces it rather than duplicating. Updates and deletes for
    /// unknown ids are silent no-ops; the row may belong to a
    /// since-unmounted scope.
    pub fn apply_change(&mut self, event: ChangeEvent<T>) {
        match event {
            ChangeEvent::Inserted(row) => self.merge(row),
            ChangeEvent::Updated(row) => {
                if let Some(slot) = self.rows.iter_mut().find(|r| r.id() == row.id()) {
                    *slot = row;
                    self.resort();
                }
            }
            ChangeEvent::Deleted(id) => {
                self.rows.retain(|row| row.id() != id);
            }
        }
    }

    /// Open the realtime feed for this scope; queued events are applied
    /// by [`drain_changes`](Self::drain_changes)
    pub fn attach(&mut self) {
        self.changes = Some(self.gateway.subscribe(&self.scope));
    }

    /// Apply everything queued on the attached feed, without waiting.
    /// Returns the number of events applied.
    pub fn drain_changes(&mut self) -> usize {
        let Some(mut feed) = self.changes.take() else {
            return 0;
        };
        let mut applied = 0;
        while let Some(event) = feed.try_next() {
            self.apply_change(event);
            applied += 1;
        }
        self.changes = Some(feed);
        applied
    }

    /// Close the realtime feed (view teardown). In-flight gateway calls
    /// are not cancelled; late results write into this collection and
    /// are harmless once it is dropped.
    pub fn detach(&mut self) {
        if let Some(mut feed) = self.changes.take() {
            feed.close();
        }
    }

    /// Id-keyed upsert preserving the collection order
    fn merge(&mut self, row: T) {
        if let Some(slot) = self.rows.iter_mut().find(|r| r.id() == row.id()) {
            debug!(table = T::TABLE, id = row.id(), "merging already-present row");
            *slot = row;
        } else {
            self.rows.insert(0, row);
        }
        self.resort();
    }

    /// Stable sort, so rows comparing equal keep their arrival order
    fn resort(&mut self) {
        let compare = self.compare;
        self.rows.sort_by(compare);
    }
}
