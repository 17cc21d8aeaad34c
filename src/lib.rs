//! BoxSort Core
//!
//! Client-side core of a household inventory tracker: boxes of items,
//! categorizing types, and the reconciliation logic that keeps local
//! collections consistent with a multi-writer remote store.
//!
//! Layered architecture:
//! - `domain`: entities and business rules
//! - `gateway`: remote-store call contract, change-event normalization,
//!   in-memory reference implementation
//! - `controller`: optimistic collection controllers, search feed,
//!   session loader
//!
//! Supporting modules: deterministic `naming` and `color` generators,
//! `links` for QR share URLs, `storage` for image buckets, `config`
//! and `logging` for wiring.
//!
//! The central invariant lives in [`controller::Collection`]: local
//! optimistic mutations and echoed realtime events merge by entity id,
//! so every collection converges to exactly one copy of each row no
//! matter the arrival order.

pub mod color;
pub mod config;
pub mod controller;
pub mod domain;
pub mod gateway;
pub mod links;
pub mod logging;
pub mod naming;
pub mod storage;

pub use controller::{Collection, SearchFeed, Session};
pub use domain::{
    BoxPatch, DomainError, DomainResult, Entity, Household, Item, ItemPatch, ItemType,
    ItemTypePatch, NewBox, NewItem, NewItemType, StorageBox, User,
};
pub use gateway::{ChangeEvent, MemoryStore, Procedures, SearchHit, Subscription, TableGateway};
