//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO external dependencies (except serde/chrono for
//! serialization).

mod entity;
mod household;
mod item;
mod item_type;
mod storage_box;

pub use entity::{DomainError, DomainResult, Entity};
pub use household::{Household, HouseholdPatch, NewHousehold, NewUser, User, UserPatch};
pub use item::{Item, ItemPatch, NewItem};
pub use item_type::{ItemType, ItemTypeLink, ItemTypePatch, NewItemType};
pub use storage_box::{BoxPatch, NewBox, StorageBox};
