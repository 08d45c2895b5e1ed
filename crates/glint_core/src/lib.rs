//! # Glint Core
//!
//! The entity-component store behind the Glint engine:
//! - A fixed number of entity slots, chosen once at construction
//! - A closed component set declared with [`registry!`]
//! - Lazy, filtered views that hand out references into the columns
//!
//! ## Example
//!
//! ```rust,ignore
//! use glint_core::{registry, Store};
//!
//! #[derive(Clone, Debug, Default)]
//! struct Physics { velocity: [f32; 2] }
//!
//! #[derive(Clone, Debug, Default)]
//! struct Collision { a: u32, b: u32 }
//!
//! registry! {
//!     pub struct Sandbox { Physics, Collision }
//! }
//!
//! let mut store = Store::<Sandbox>::new(1024);
//! let entity = store.create().expect("store has room");
//! entity.set(&mut store, (Physics { velocity: [1.0, 0.0] },));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

#[macro_use]
mod macros;

pub mod ecs;

pub use ecs::{
    Column, ColumnZip, Component, Entity, EntityId, ErasedColumn, Member, Query, Registry, Store,
    StoreId, View, ViewRef,
};
