//! Realtime Change Events
//!
//! The remote store pushes row-level change notifications per table and
//! scope. Raw wire payloads are normalized into typed events here; the
//! subscription handle wraps the delivery channel and unsubscribes when
//! dropped.

use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::Entity;

/// A typed row-level change on a subscribed table
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent<T: Entity> {
    Inserted(T),
    Updated(T),
    /// Delete payloads carry identity columns only
    Deleted(String),
}

/// Wire shape of a change notification before normalization
#[derive(Debug, Clone, Deserialize)]
pub struct RawChange {
    pub event_type: String,
    #[serde(default)]
    pub new_row: Option<serde_json::Value>,
    #[serde(default)]
    pub old_row: Option<serde_json::Value>,
}

impl RawChange {
    /// Normalize into a typed event.
    ///
    /// Malformed or unknown payloads yield `None`; they are logged and
    /// never surfaced as errors, since the feed may deliver events for
    /// rows this client cannot decode yet.
    pub fn normalize<T: Entity>(self) -> Option<ChangeEvent<T>> {
        match self.event_type.as_str() {
            "INSERT" => match serde_json::from_value(self.new_row?) {
                Ok(row) => Some(ChangeEvent::Inserted(row)),
                Err(e) => {
                    warn!(table = T::TABLE, error = %e, "dropping undecodable insert event");
                    None
                }
            },
            "UPDATE" => match serde_json::from_value(self.new_row?) {
                Ok(row) => Some(ChangeEvent::Updated(row)),
                Err(e) => {
                    warn!(table = T::TABLE, error = %e, "dropping undecodable update event");
                    None
                }
            },
            "DELETE" => {
                let id = self.old_row.as_ref()?.get("id")?.as_str()?;
                Some(ChangeEvent::Deleted(id.to_string()))
            }
            other => {
                warn!(table = T::TABLE, event_type = other, "dropping unknown change event");
                None
            }
        }
    }
}

/// Handle to a realtime subscription.
///
/// Events queue on an unbounded channel until drained. Dropping the
/// handle (or calling [`close`](Subscription::close)) unsubscribes; the
/// publisher prunes the registration on its next delivery attempt.
pub struct Subscription<T: Entity> {
    rx: mpsc::UnboundedReceiver<ChangeEvent<T>>,
}

impl<T: Entity> Subscription<T> {
    pub fn new(rx: mpsc::UnboundedReceiver<ChangeEvent<T>>) -> Self {
        Self { rx }
    }

    /// Next queued event, without waiting
    pub fn try_next(&mut self) -> Option<ChangeEvent<T>> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next event; `None` once closed and drained
    pub async fn next(&mut self) -> Option<ChangeEvent<T>> {
        self.rx.recv().await
    }

    /// Stop receiving further events; already-queued events remain
    /// drainable
    pub fn close(&mut self) {
        self.rx.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StorageBox;

    fn raw(event_type: &str, new_row: Option<serde_json::Value>, old_row: Option<serde_json::Value>) -> RawChange {
        RawChange {
            event_type: event_type.to_string(),
            new_row,
            old_row,
        }
    }

    fn box_json() -> serde_json::Value {
        serde_json::json!({
            "id": "boxes-1",
            "household_id": "hh-1",
            "funky_name": "quiet-owl-meadow",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z",
        })
    }

    #[test]
    fn test_normalize_insert() {
        let event = raw("INSERT", Some(box_json()), None).normalize::<StorageBox>();
        match event {
            Some(ChangeEvent::Inserted(b)) => assert_eq!(b.funky_name, "quiet-owl-meadow"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_normalize_delete_uses_identity_only() {
        let old = serde_json::json!({ "id": "boxes-9" });
        let event = raw("DELETE", None, Some(old)).normalize::<StorageBox>();
        assert_eq!(event, Some(ChangeEvent::Deleted("boxes-9".to_string())));
    }

    #[test]
    fn test_normalize_tolerates_malformed_payloads() {
        assert_eq!(
            raw("INSERT", Some(serde_json::json!({ "id": 7 })), None).normalize::<StorageBox>(),
            None
        );
        assert_eq!(raw("INSERT", None, None).normalize::<StorageBox>(), None);
        assert_eq!(raw("DELETE", None, None).normalize::<StorageBox>(), None);
        assert_eq!(
            raw("TRUNCATE", Some(box_json()), None).normalize::<StorageBox>(),
            None
        );
    }
}
