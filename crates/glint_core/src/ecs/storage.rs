//! # Component Storage
//!
//! Pre-allocated, optional-per-slot component columns.
//!
//! The storage uses a dense array strategy:
//! - All slots are allocated at creation and never resized
//! - Access is O(1) via entity index
//! - A slot without the component holds `None`

use std::any::{type_name, Any};

use super::component::Component;

/// Pre-allocated storage for a single component type.
///
/// # Type Parameters
///
/// * `C` - The component type to store
///
/// # Example
///
/// ```rust,ignore
/// let mut column: Column<Physics> = Column::new(1024);
/// column.insert(0, Physics::default());
/// assert!(!column.is_vacant(0));
/// ```
#[derive(Debug)]
pub struct Column<C: Component> {
    cells: Box<[Option<C>]>,
}

impl<C: Component> Column<C> {
    /// Creates a column with `capacity` vacant cells.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: vec![None; capacity].into_boxed_slice(),
        }
    }

    /// Number of cells (equal to the owning store's capacity).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` for a zero-length column.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Gets the cell at `index`, if in bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Option<C>> {
        self.cells.get(index)
    }

    /// Gets the cell at `index` mutably, if in bounds.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Option<C>> {
        self.cells.get_mut(index)
    }

    /// Stores `value` at `index`, overwriting any previous value.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn insert(&mut self, index: usize, value: C) -> &mut C {
        self.cells[index].insert(value)
    }

    /// Removes and returns the value at `index`.
    #[inline]
    pub fn take(&mut self, index: usize) -> Option<C> {
        self.cells.get_mut(index).and_then(Option::take)
    }

    /// All cells, in slot order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Option<C>] {
        &self.cells
    }

    /// All cells mutably, in slot order.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Option<C>] {
        &mut self.cells
    }
}

/// Type-erased view of a [`Column`], so a store can hold one per registered
/// type in a single array.
pub trait ErasedColumn: Send + Sync {
    /// Name of the stored component type.
    fn component_name(&self) -> &'static str;

    /// Number of cells.
    fn len(&self) -> usize;

    /// Returns `true` for a zero-length column.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cells holding a value.
    fn occupied(&self) -> usize;

    /// Returns `true` if the cell at `index` holds no value.
    fn is_vacant(&self, index: usize) -> bool;

    /// Clears the cell at `index`.
    fn reset(&mut self, index: usize);

    /// Clears every cell.
    fn clear(&mut self);

    /// Upcast for downcasting to the concrete column.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete column.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedColumn for Column<C> {
    fn component_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    fn is_vacant(&self, index: usize) -> bool {
        self.cells.get(index).map_or(true, Option::is_none)
    }

    fn reset(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = None;
        }
    }

    fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = None;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Downcasts the column at `tag`, aborting if it is missing or of another type.
pub(crate) fn downcast_ref<C: Component>(
    columns: &[Box<dyn ErasedColumn>],
    tag: usize,
) -> &Column<C> {
    let Some(column) = columns.get(tag) else {
        fatal!(
            "no column at tag {tag} for {} ({} columns registered)",
            type_name::<C>(),
            columns.len()
        );
    };
    match column.as_any().downcast_ref::<Column<C>>() {
        Some(column) => column,
        None => fatal!(
            "column {tag} holds {}, expected {}",
            column.component_name(),
            type_name::<C>()
        ),
    }
}

/// Mutable counterpart of [`downcast_ref`] for an already selected column.
pub(crate) fn downcast_mut<C: Component>(column: &mut Box<dyn ErasedColumn>) -> &mut Column<C> {
    let name = column.component_name();
    match column.as_any_mut().downcast_mut::<Column<C>>() {
        Some(column) => column,
        None => fatal!("column holds {name}, expected {}", type_name::<C>()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Velocity([f32; 2]);

    #[test]
    fn test_column_starts_vacant() {
        let column: Column<Velocity> = Column::new(100);
        assert_eq!(column.len(), 100);
        assert_eq!(column.occupied(), 0);
        assert!(column.is_vacant(99));
    }

    #[test]
    fn test_column_insert_overwrites() {
        let mut column: Column<Velocity> = Column::new(8);
        column.insert(3, Velocity([1.0, 2.0]));
        let written = column.insert(3, Velocity([5.0, 6.0]));
        assert_eq!(*written, Velocity([5.0, 6.0]));
        assert_eq!(column.get(3), Some(&Some(Velocity([5.0, 6.0]))));
        assert_eq!(column.occupied(), 1);
    }

    #[test]
    fn test_column_bounds() {
        let column: Column<Velocity> = Column::new(100);
        assert!(column.get(100).is_none());
        assert!(column.get(99).is_some());
    }

    #[test]
    fn test_reset_and_clear() {
        let mut column: Column<Velocity> = Column::new(4);
        for index in 0..4 {
            column.insert(index, Velocity::default());
        }
        column.reset(1);
        assert!(column.is_vacant(1));
        assert_eq!(column.take(2), Some(Velocity::default()));
        assert_eq!(column.occupied(), 2);
        column.clear();
        assert_eq!(column.occupied(), 0);
    }

    #[test]
    fn test_downcast_through_erased_column() {
        let mut columns: Vec<Box<dyn ErasedColumn>> = vec![Box::new(Column::<Velocity>::new(2))];
        downcast_mut::<Velocity>(&mut columns[0]).insert(0, Velocity([3.0, 4.0]));
        let column = downcast_ref::<Velocity>(&columns, 0);
        assert_eq!(column.get(0), Some(&Some(Velocity([3.0, 4.0]))));
    }
}
