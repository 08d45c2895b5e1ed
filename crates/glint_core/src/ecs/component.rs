//! # Component Registry
//!
//! Components are plain data. A store works over a closed set of them,
//! declared once with [`registry!`](crate::registry):
//!
//! ```rust,ignore
//! #[derive(Clone, Debug, Default)]
//! struct Physics { velocity: [f32; 2] }
//!
//! #[derive(Clone, Debug, Default)]
//! struct Collision { a: u32, b: u32 }
//!
//! glint_core::registry! {
//!     /// Everything the sandbox can attach to an entity.
//!     pub struct Sandbox { Physics, Collision }
//! }
//! ```
//!
//! Each listed type gets a `Member<Sandbox>` impl carrying its column tag.
//! Asking a store for a type outside the set fails to compile, and so does
//! listing the same type twice.

use std::fmt::Debug;

use super::query::Query;
use super::storage::ErasedColumn;

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Clone` and `Default`: values are copied into and out of columns
/// - `Debug`: store diagnostics print them
/// - `Send + Sync + 'static`: a store may move between threads
pub trait Component: Clone + Default + Debug + Send + Sync + 'static {}

impl<T> Component for T where T: Clone + Default + Debug + Send + Sync + 'static {}

/// A closed set of component types known at build time.
///
/// Implemented by [`registry!`](crate::registry); there is no reason to
/// implement it by hand.
pub trait Registry: Sized + 'static {
    /// Every member as one query, in tag order.
    type All: Query<Self>;

    /// Member type names, indexed by tag.
    const NAMES: &'static [&'static str];

    /// Allocates one empty column per member, in tag order.
    fn columns(capacity: usize) -> Vec<Box<dyn ErasedColumn>>;
}

/// A component type registered in `R`.
pub trait Member<R: Registry>: Component {
    /// Position of this type's column inside the store.
    const TAG: usize;

    /// Type name used in diagnostics.
    const NAME: &'static str;
}

/// Declares a component registry.
///
/// Generates an uninhabited marker type implementing [`Registry`] and a
/// [`Member`] impl for every listed component. Up to eight components are
/// supported, matching the largest [`Query`] tuple.
#[macro_export]
macro_rules! registry {
    (@members $registry:ident; $tag:expr;) => {};
    (@members $registry:ident; $tag:expr; $head:ty $(, $tail:ty)*) => {
        impl $crate::Member<$registry> for $head {
            const TAG: usize = $tag;
            const NAME: &'static str = ::core::stringify!($head);
        }
        $crate::registry!(@members $registry; $tag + 1usize; $($tail),*);
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $registry:ident { $($component:ty),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $registry {}

        impl $crate::Registry for $registry {
            type All = ($($component,)+);

            const NAMES: &'static [&'static str] = &[$(::core::stringify!($component)),+];

            fn columns(
                capacity: usize,
            ) -> ::std::vec::Vec<::std::boxed::Box<dyn $crate::ErasedColumn>> {
                ::std::vec![$(
                    ::std::boxed::Box::new($crate::Column::<$component>::new(capacity))
                        as ::std::boxed::Box<dyn $crate::ErasedColumn>
                ),+]
            }
        }

        $crate::registry!(@members $registry; 0usize; $($component),+);
    };
}
