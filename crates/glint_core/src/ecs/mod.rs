//! # Entity Component Store
//!
//! A fixed-capacity ECS over a closed set of component types.
//!
//! ## Design Philosophy
//!
//! - All storage is allocated when the store is created and never resized
//! - Every component type gets its own column of optional cells
//! - Entity IDs are slot indices with generation counters
//! - Handles re-derive validity from the store on every call

mod component;
mod entity;
mod query;
mod storage;
mod store;
mod view;

pub use component::{Component, Member, Registry};
pub use entity::{Entity, EntityId, StoreId};
pub use query::{ColumnZip, Query};
pub use storage::{Column, ErasedColumn};
pub use store::Store;
pub use view::{View, ViewRef};
