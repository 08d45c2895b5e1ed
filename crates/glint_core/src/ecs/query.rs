//! # Component Queries
//!
//! A query is a tuple of registered component types, e.g.
//! `(Transform, Sprite)`. It decides which columns a handle lookup or a
//! view touches and what shape the results take.
//!
//! Implemented for tuples of one to eight [`Member`] types. There is no
//! impl for `()`, so an empty request does not compile. Naming a type twice
//! trips a constant assertion when the query is instantiated.

use std::slice;

use super::component::{Member, Registry};
use super::storage::{downcast_mut, downcast_ref, Column, ErasedColumn};

/// Returns `true` if no tag appears twice.
const fn tags_are_distinct(tags: &[usize]) -> bool {
    let mut i = 0;
    while i < tags.len() {
        let mut j = i + 1;
        while j < tags.len() {
            if tags[i] == tags[j] {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// A non-empty, duplicate-free tuple of component types from `R`.
pub trait Query<R: Registry>: Sized + 'static {
    /// Shared borrows of the requested columns.
    type Columns<'s>;
    /// Exclusive borrows of the requested columns.
    type ColumnsMut<'s>;
    /// One slot's cells, e.g. `(&Option<A>, &Option<B>)`.
    type Cells<'s>;
    /// One slot's cells, mutably.
    type CellsMut<'s>;
    /// References to freshly written values, e.g. `(&mut A, &mut B)`.
    type Written<'s>;
    /// One `bool` per requested type.
    type Presence;
    /// Lockstep iterator over the requested columns.
    type Iter<'s>: Iterator<Item = Self::Cells<'s>>;
    /// Mutable lockstep iterator over the requested columns.
    type IterMut<'s>: Iterator<Item = Self::CellsMut<'s>>;

    /// Column tags, in request order.
    const TAGS: &'static [usize];

    /// Evaluating this fails the build for queries that repeat a type.
    const DISTINCT: () = assert!(
        tags_are_distinct(Self::TAGS),
        "a component query names the same type twice"
    );

    /// Borrows the requested columns.
    fn columns(columns: &[Box<dyn ErasedColumn>]) -> Self::Columns<'_>;

    /// Borrows the requested columns exclusively.
    fn columns_mut(columns: &mut [Box<dyn ErasedColumn>]) -> Self::ColumnsMut<'_>;

    /// Cells of one slot.
    fn cells(columns: Self::Columns<'_>, index: usize) -> Self::Cells<'_>;

    /// Cells of one slot, mutably.
    fn cells_mut(columns: Self::ColumnsMut<'_>, index: usize) -> Self::CellsMut<'_>;

    /// Writes every value into its column at `index`.
    fn write(columns: Self::ColumnsMut<'_>, index: usize, values: Self) -> Self::Written<'_>;

    /// Whether each requested column holds a value at `index`.
    fn presence(columns: Self::Columns<'_>, index: usize) -> Self::Presence;

    /// Iterates the requested columns in lockstep.
    fn iter(columns: Self::Columns<'_>) -> Self::Iter<'_>;

    /// Iterates the requested columns in lockstep, mutably.
    fn iter_mut(columns: Self::ColumnsMut<'_>) -> Self::IterMut<'_>;
}

/// Lockstep iterator over several column slices.
///
/// `I` is a tuple of slice iterators; iteration stops at the shortest.
#[derive(Debug)]
pub struct ColumnZip<I> {
    iters: I,
}

macro_rules! presence_of {
    ($name:ident) => {
        bool
    };
}

macro_rules! impl_query {
    ($($name:ident $column:ident $value:ident),+) => {
        impl<'s, $($name: 's),+> Iterator for ColumnZip<($(slice::Iter<'s, Option<$name>>,)+)> {
            type Item = ($(&'s Option<$name>,)+);

            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                let ($($column,)+) = &mut self.iters;
                Some(($($column.next()?,)+))
            }
        }

        impl<'s, $($name: 's),+> Iterator for ColumnZip<($(slice::IterMut<'s, Option<$name>>,)+)> {
            type Item = ($(&'s mut Option<$name>,)+);

            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                let ($($column,)+) = &mut self.iters;
                Some(($($column.next()?,)+))
            }
        }

        impl<R: Registry, $($name: Member<R>),+> Query<R> for ($($name,)+) {
            type Columns<'s> = ($(&'s Column<$name>,)+);
            type ColumnsMut<'s> = ($(&'s mut Column<$name>,)+);
            type Cells<'s> = ($(&'s Option<$name>,)+);
            type CellsMut<'s> = ($(&'s mut Option<$name>,)+);
            type Written<'s> = ($(&'s mut $name,)+);
            type Presence = ($(presence_of!($name),)+);
            type Iter<'s> = ColumnZip<($(slice::Iter<'s, Option<$name>>,)+)>;
            type IterMut<'s> = ColumnZip<($(slice::IterMut<'s, Option<$name>>,)+)>;

            const TAGS: &'static [usize] = &[$(<$name as Member<R>>::TAG),+];

            fn columns(columns: &[Box<dyn ErasedColumn>]) -> Self::Columns<'_> {
                let () = <Self as Query<R>>::DISTINCT;
                ($(downcast_ref::<$name>(columns, <$name as Member<R>>::TAG),)+)
            }

            fn columns_mut(columns: &mut [Box<dyn ErasedColumn>]) -> Self::ColumnsMut<'_> {
                let () = <Self as Query<R>>::DISTINCT;
                $(let mut $column: Option<&mut Column<$name>> = None;)+
                for (tag, erased) in columns.iter_mut().enumerate() {
                    $(
                        if tag == <$name as Member<R>>::TAG {
                            $column = Some(downcast_mut::<$name>(erased));
                            continue;
                        }
                    )+
                }
                ($(
                    match $column {
                        Some(column) => column,
                        None => fatal!(
                            "no column registered for {} (tag {})",
                            <$name as Member<R>>::NAME,
                            <$name as Member<R>>::TAG
                        ),
                    },
                )+)
            }

            fn cells(columns: Self::Columns<'_>, index: usize) -> Self::Cells<'_> {
                let ($($column,)+) = columns;
                ($(&$column.cells()[index],)+)
            }

            fn cells_mut(columns: Self::ColumnsMut<'_>, index: usize) -> Self::CellsMut<'_> {
                let ($($column,)+) = columns;
                ($(&mut $column.cells_mut()[index],)+)
            }

            fn write(columns: Self::ColumnsMut<'_>, index: usize, values: Self) -> Self::Written<'_> {
                let ($($column,)+) = columns;
                let ($($value,)+) = values;
                ($($column.insert(index, $value),)+)
            }

            fn presence(columns: Self::Columns<'_>, index: usize) -> Self::Presence {
                let ($($column,)+) = columns;
                ($($column.cells()[index].is_some(),)+)
            }

            fn iter(columns: Self::Columns<'_>) -> Self::Iter<'_> {
                let ($($column,)+) = columns;
                ColumnZip {
                    iters: ($($column.cells().iter(),)+),
                }
            }

            fn iter_mut(columns: Self::ColumnsMut<'_>) -> Self::IterMut<'_> {
                let ($($column,)+) = columns;
                ColumnZip {
                    iters: ($($column.cells_mut().iter_mut(),)+),
                }
            }
        }
    };
}

impl_query!(A a_col a_val);
impl_query!(A a_col a_val, B b_col b_val);
impl_query!(A a_col a_val, B b_col b_val, C c_col c_val);
impl_query!(A a_col a_val, B b_col b_val, C c_col c_val, D d_col d_val);
impl_query!(A a_col a_val, B b_col b_val, C c_col c_val, D d_col d_val, E e_col e_val);
impl_query!(
    A a_col a_val, B b_col b_val, C c_col c_val, D d_col d_val, E e_col e_val,
    F f_col f_val
);
impl_query!(
    A a_col a_val, B b_col b_val, C c_col c_val, D d_col d_val, E e_col e_val,
    F f_col f_val, G g_col g_val
);
impl_query!(
    A a_col a_val, B b_col b_val, C c_col c_val, D d_col d_val, E e_col e_val,
    F f_col f_val, G g_col g_val, H h_col h_val
);
