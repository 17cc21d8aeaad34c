//! In-Memory Store
//!
//! Reference implementation of the gateway contract backed by process
//! memory. Used by tests and demos; it mirrors the hosted store's
//! observable behavior, including per-scope change-feed filtering and
//! server-side id/timestamp assignment. Write failures can be injected
//! per table to exercise compensation paths.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::debug;

use super::events::{ChangeEvent, Subscription};
use super::traits::{Procedures, SearchHit, TableGateway, TypeAssignments};
use crate::domain::{
    DomainError, DomainResult, Entity, Household, HouseholdPatch, Item, ItemType, ItemTypeLink,
    NewHousehold, StorageBox, User, UserPatch,
};
use crate::naming;

/// Server-side materialization of drafts and patches, implemented per
/// entity so [`MemoryTable`] stays generic
pub trait TableRow: Entity {
    fn materialize(draft: Self::Draft, id: String, now: DateTime<Utc>) -> Self;
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

struct Subscriber<T: Entity> {
    scope: String,
    tx: mpsc::UnboundedSender<ChangeEvent<T>>,
}

struct TableInner<T: TableRow> {
    rows: Vec<T>,
    subscribers: Vec<Subscriber<T>>,
    seq: u64,
    fail_next: Option<String>,
}

impl<T: TableRow> TableInner<T> {
    /// Deliver to subscribers of one scope, pruning closed channels
    fn emit(&mut self, scope: &str, event: ChangeEvent<T>) {
        self.subscribers.retain(|sub| {
            if sub.scope != scope {
                return true;
            }
            sub.tx.send(event.clone()).is_ok()
        });
    }

    fn take_failure(&mut self) -> DomainResult<()> {
        match self.fail_next.take() {
            Some(message) => Err(DomainError::Unavailable(message)),
            None => Ok(()),
        }
    }
}

/// One remote table held in memory
pub struct MemoryTable<T: TableRow> {
    state: Mutex<TableInner<T>>,
}

impl<T: TableRow> MemoryTable<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(TableInner {
                rows: Vec::new(),
                subscribers: Vec::new(),
                seq: 0,
                fail_next: None,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TableInner<T>> {
        self.state.lock().expect("memory table poisoned")
    }

    /// Make the next gateway call on this table fail with `message`
    pub fn fail_next(&self, message: &str) {
        self.lock().fail_next = Some(message.to_string());
    }

    /// All rows, unfiltered (test setup and procedure bodies)
    pub fn snapshot(&self) -> Vec<T> {
        self.lock().rows.clone()
    }

    /// Insert a pre-built row without emitting a change event
    pub fn seed(&self, row: T) {
        self.lock().rows.push(row);
    }
}

#[async_trait]
impl<T: TableRow> TableGateway<T> for MemoryTable<T> {
    async fn select(&self, scope: &str) -> DomainResult<Vec<T>> {
        let mut inner = self.lock();
        inner.take_failure()?;
        Ok(inner
            .rows
            .iter()
            .filter(|row| row.scope() == scope)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<T>> {
        let mut inner = self.lock();
        inner.take_failure()?;
        Ok(inner.rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn insert(&self, draft: T::Draft) -> DomainResult<T> {
        let mut inner = self.lock();
        inner.take_failure()?;
        inner.seq += 1;
        let id = format!("{}-{}", T::TABLE, inner.seq);
        let row = T::materialize(draft, id, Utc::now());
        inner.rows.push(row.clone());
        debug!(table = T::TABLE, id = row.id(), "row inserted");
        let scope = row.scope().to_string();
        inner.emit(&scope, ChangeEvent::Inserted(row.clone()));
        Ok(row)
    }

    async fn update(&self, id: &str, patch: T::Patch) -> DomainResult<T> {
        let mut inner = self.lock();
        inner.take_failure()?;
        let slot = inner
            .rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or_else(|| DomainError::NotFound(format!("{} {}", T::TABLE, id)))?;
        slot.apply_patch(patch, Utc::now());
        let row = slot.clone();
        debug!(table = T::TABLE, id, "row updated");
        // Scope filters apply to the new row values, so a row moved
        // across scopes notifies its destination, not its source.
        let scope = row.scope().to_string();
        inner.emit(&scope, ChangeEvent::Updated(row.clone()));
        Ok(row)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut inner = self.lock();
        inner.take_failure()?;
        let Some(position) = inner.rows.iter().position(|row| row.id() == id) else {
            // Matches the hosted store: deleting a missing row is a no-op
            return Ok(());
        };
        let scope = inner.rows[position].scope().to_string();
        inner.rows.remove(position);
        debug!(table = T::TABLE, id, "row deleted");
        inner.emit(&scope, ChangeEvent::Deleted(id.to_string()));
        Ok(())
    }

    fn subscribe(&self, scope: &str) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(Subscriber {
            scope: scope.to_string(),
            tx,
        });
        Subscription::new(rx)
    }
}

/// The full in-memory backend: every table plus the procedure bodies
pub struct MemoryStore {
    boxes: Arc<MemoryTable<StorageBox>>,
    items: Arc<MemoryTable<Item>>,
    types: Arc<MemoryTable<ItemType>>,
    users: Arc<MemoryTable<User>>,
    households: Arc<MemoryTable<Household>>,
    links: Mutex<Vec<ItemTypeLink>>,
    search_calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            boxes: Arc::new(MemoryTable::new()),
            items: Arc::new(MemoryTable::new()),
            types: Arc::new(MemoryTable::new()),
            users: Arc::new(MemoryTable::new()),
            households: Arc::new(MemoryTable::new()),
            links: Mutex::new(Vec::new()),
            search_calls: AtomicU64::new(0),
        })
    }

    pub fn boxes(&self) -> Arc<MemoryTable<StorageBox>> {
        Arc::clone(&self.boxes)
    }

    pub fn items(&self) -> Arc<MemoryTable<Item>> {
        Arc::clone(&self.items)
    }

    pub fn types(&self) -> Arc<MemoryTable<ItemType>> {
        Arc::clone(&self.types)
    }

    pub fn users(&self) -> Arc<MemoryTable<User>> {
        Arc::clone(&self.users)
    }

    pub fn households(&self) -> Arc<MemoryTable<Household>> {
        Arc::clone(&self.households)
    }

    /// How many times `search_items` has been invoked
    pub fn search_invocations(&self) -> u64 {
        self.search_calls.load(AtomicOrdering::Relaxed)
    }

    fn links(&self) -> std::sync::MutexGuard<'_, Vec<ItemTypeLink>> {
        self.links.lock().expect("links poisoned")
    }
}

#[async_trait]
impl Procedures for MemoryStore {
    async fn search_items(&self, query: &str) -> DomainResult<Vec<SearchHit>> {
        self.search_calls.fetch_add(1, AtomicOrdering::Relaxed);
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let boxes = self.boxes.snapshot();
        let mut hits = Vec::new();
        for item in self.items.snapshot() {
            let name_match = item.name.to_lowercase().contains(&needle);
            let desc_match = item
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !name_match && !desc_match {
                continue;
            }
            // Orphaned rows can appear between a cascade and its echo
            let Some(parent) = boxes.iter().find(|b| b.id == item.box_id) else {
                continue;
            };
            hits.push(SearchHit {
                item_id: item.id.clone(),
                item_name: item.name.clone(),
                item_description: item.description.clone(),
                item_image_url: item.image_url.clone(),
                box_id: parent.id.clone(),
                box_funky_name: parent.funky_name.clone(),
                types: self.types_for_item(&item.id).await?,
            });
        }
        hits.sort_by(|a, b| a.item_name.to_lowercase().cmp(&b.item_name.to_lowercase()));
        Ok(hits)
    }

    async fn join_household(&self, user_id: &str, code: &str) -> DomainResult<String> {
        let household = self
            .households
            .snapshot()
            .into_iter()
            .find(|h| h.invite_code == code)
            .ok_or_else(|| DomainError::NotFound("invalid invite code".to_string()))?;
        let patch = UserPatch {
            household_id: Some(Some(household.id.clone())),
            ..UserPatch::default()
        };
        self.users.update(user_id, patch).await?;
        Ok(household.id)
    }

    async fn regenerate_invite_code(&self, household_id: &str) -> DomainResult<String> {
        let code = naming::generate_invite_code();
        let patch = HouseholdPatch {
            invite_code: Some(code.clone()),
            ..HouseholdPatch::default()
        };
        self.households.update(household_id, patch).await?;
        Ok(code)
    }

    async fn create_household_for_user(&self, user_id: &str, name: &str) -> DomainResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Invalid("household name is empty".to_string()));
        }
        let household = self
            .households
            .insert(NewHousehold {
                name: name.to_string(),
                owner_id: user_id.to_string(),
            })
            .await?;
        let patch = UserPatch {
            household_id: Some(Some(household.id.clone())),
            ..UserPatch::default()
        };
        self.users.update(user_id, patch).await?;
        Ok(household.id)
    }
}

#[async_trait]
impl TypeAssignments for MemoryStore {
    async fn assign_type(&self, item_id: &str, type_id: &str) -> DomainResult<()> {
        let mut links = self.links();
        if links
            .iter()
            .any(|l| l.item_id == item_id && l.type_id == type_id)
        {
            return Ok(());
        }
        links.push(ItemTypeLink {
            item_id: item_id.to_string(),
            type_id: type_id.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn unassign_type(&self, item_id: &str, type_id: &str) -> DomainResult<()> {
        self.links()
            .retain(|l| !(l.item_id == item_id && l.type_id == type_id));
        Ok(())
    }

    async fn types_for_item(&self, item_id: &str) -> DomainResult<Vec<ItemType>> {
        let type_ids: Vec<String> = self
            .links()
            .iter()
            .filter(|l| l.item_id == item_id)
            .map(|l| l.type_id.clone())
            .collect();
        let mut types: Vec<ItemType> = self
            .types
            .snapshot()
            .into_iter()
            .filter(|t| type_ids.contains(&t.id))
            .collect();
        types.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(types)
    }

    async fn items_with_type(&self, type_id: &str) -> DomainResult<Vec<String>> {
        Ok(self
            .links()
            .iter()
            .filter(|l| l.type_id == type_id)
            .map(|l| l.item_id.clone())
            .collect())
    }
}

// ========================
// Server-side row materialization
// ========================

impl TableRow for StorageBox {
    fn materialize(draft: Self::Draft, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            household_id: draft.household_id,
            funky_name: draft.funky_name,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>) {
        if let Some(funky_name) = patch.funky_name {
            self.funky_name = funky_name;
        }
        self.updated_at = now;
    }
}

impl TableRow for Item {
    fn materialize(draft: Self::Draft, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            box_id: draft.box_id,
            name: draft.name,
            description: draft.description,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(box_id) = patch.box_id {
            self.box_id = box_id;
        }
        self.updated_at = now;
    }
}

impl TableRow for ItemType {
    fn materialize(draft: Self::Draft, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            household_id: draft.household_id,
            name: draft.name,
            color: draft.color,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        self.updated_at = now;
    }
}

impl TableRow for User {
    fn materialize(draft: Self::Draft, _id: String, now: DateTime<Utc>) -> Self {
        // User ids come from the auth layer, not the store
        Self {
            id: draft.id,
            household_id: draft.household_id,
            display_name: draft.display_name,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>) {
        if let Some(display_name) = patch.display_name {
            self.display_name = display_name;
        }
        if let Some(household_id) = patch.household_id {
            self.household_id = household_id;
        }
        if let Some(avatar_url) = patch.avatar_url {
            self.avatar_url = avatar_url;
        }
        self.updated_at = now;
    }
}

impl TableRow for Household {
    fn materialize(draft: Self::Draft, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            owner_id: draft.owner_id,
            invite_code: naming::generate_invite_code(),
            created_at: now,
        }
    }

    fn apply_patch(&mut self, patch: Self::Patch, _now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(invite_code) = patch.invite_code {
            self.invite_code = invite_code;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewBox, NewItem, NewItemType, NewUser};

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = MemoryStore::new();
        let row = store
            .boxes()
            .insert(NewBox::new("hh-1", "quiet-owl-meadow"))
            .await
            .unwrap();
        assert!(!row.id.is_empty());
        assert_eq!(row.household_id, "hh-1");
        assert_eq!(row.created_at, row.updated_at);
    }

    #[tokio::test]
    async fn test_subscription_is_scope_filtered() {
        let store = MemoryStore::new();
        let boxes = store.boxes();
        let mut ours = boxes.subscribe("hh-1");
        let mut theirs = boxes.subscribe("hh-2");

        boxes.insert(NewBox::new("hh-1", "icy-seal-harbor")).await.unwrap();

        match ours.try_next() {
            Some(ChangeEvent::Inserted(b)) => assert_eq!(b.funky_name, "icy-seal-harbor"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(theirs.try_next().is_none());
    }

    #[tokio::test]
    async fn test_dropped_subscription_stops_delivery() {
        let store = MemoryStore::new();
        let boxes = store.boxes();
        let mut kept = boxes.subscribe("hh-1");
        let dropped = boxes.subscribe("hh-1");
        drop(dropped);

        boxes.insert(NewBox::new("hh-1", "bold-elk-summit")).await.unwrap();
        assert!(kept.try_next().is_some());
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let store = MemoryStore::new();
        let boxes = store.boxes();
        boxes.fail_next("connection reset");

        let err = boxes.select("hh-1").await.unwrap_err();
        assert!(matches!(err, DomainError::Unavailable(_)));
        assert!(boxes.select("hh-1").await.is_ok());
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .boxes()
            .update("boxes-404", crate::domain::BoxPatch::rename("x-y-z"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_moved_item_notifies_destination_scope() {
        let store = MemoryStore::new();
        let items = store.items();
        let row = items.insert(NewItem::new("boxes-1", "Lamp")).await.unwrap();

        let mut source = items.subscribe("boxes-1");
        let mut dest = items.subscribe("boxes-2");
        items
            .update(&row.id, crate::domain::ItemPatch::move_to("boxes-2"))
            .await
            .unwrap();

        assert!(source.try_next().is_none());
        match dest.try_next() {
            Some(ChangeEvent::Updated(i)) => assert_eq!(i.box_id, "boxes-2"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_household_procedures_roundtrip() {
        let store = MemoryStore::new();
        store.users().insert(NewUser::new("user-1", "Alex")).await.unwrap();
        store.users().insert(NewUser::new("user-2", "Sam")).await.unwrap();

        let household_id = store
            .create_household_for_user("user-1", "Home")
            .await
            .unwrap();
        let household = store
            .households()
            .find_by_id(&household_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(household.owner_id, "user-1");

        let joined = store
            .join_household("user-2", &household.invite_code)
            .await
            .unwrap();
        assert_eq!(joined, household_id);
        let user = store.users().find_by_id("user-2").await.unwrap().unwrap();
        assert_eq!(user.household_id.as_deref(), Some(household_id.as_str()));

        let new_code = store.regenerate_invite_code(&household_id).await.unwrap();
        assert_ne!(new_code, household.invite_code);
        assert!(store.join_household("user-2", &household.invite_code).await.is_err());
    }

    #[tokio::test]
    async fn test_search_matches_name_and_description() {
        let store = MemoryStore::new();
        let parent = store
            .boxes()
            .insert(NewBox::new("hh-1", "mellow-crane-dune"))
            .await
            .unwrap();
        let lamp = store
            .items()
            .insert(NewItem::new(&parent.id, "Desk lamp").with_description("halogen bulb"))
            .await
            .unwrap();
        store
            .items()
            .insert(NewItem::new(&parent.id, "Charger"))
            .await
            .unwrap();
        let electronics = store
            .types()
            .insert(NewItemType::new("hh-1", "Electronics"))
            .await
            .unwrap();
        store.assign_type(&lamp.id, &electronics.id).await.unwrap();

        let by_name = store.search_items("lamp").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].box_funky_name, "mellow-crane-dune");
        assert_eq!(by_name[0].types.len(), 1);

        let by_description = store.search_items("HALOGEN").await.unwrap();
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].item_id, lamp.id);

        assert!(store.search_items("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assignments_are_idempotent() {
        let store = MemoryStore::new();
        store.assign_type("items-1", "types-1").await.unwrap();
        store.assign_type("items-1", "types-1").await.unwrap();
        assert_eq!(store.items_with_type("types-1").await.unwrap().len(), 1);

        store.unassign_type("items-1", "types-1").await.unwrap();
        assert!(store.items_with_type("types-1").await.unwrap().is_empty());
    }
}
