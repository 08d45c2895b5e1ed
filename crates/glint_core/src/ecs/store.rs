//! # Entity Store
//!
//! The central container for entities and their components.
//! Pre-allocates all memory at creation time.

use std::marker::PhantomData;

use super::component::{Member, Registry};
use super::entity::{Entity, EntityId, StoreId};
use super::query::Query;
use super::storage::{downcast_mut, downcast_ref, Column, ErasedColumn};
use super::view::{View, ViewRef};

/// Fixed-capacity entity store over the component set `R`.
///
/// Holds one slot-presence array and one column per registered component,
/// all sized to `max_entities` at construction and never resized.
///
/// # Capacity
///
/// `create` scans for the first free slot and returns `None` once every
/// slot is live. That is a normal condition the caller must handle.
///
/// # Threading
///
/// The store is not internally synchronized. Share it across threads behind
/// an external lock.
///
/// # Example
///
/// ```rust,ignore
/// let mut store = Store::<Sandbox>::new(1024);
///
/// let entity = store.create().expect("store has room");
/// entity.set(&mut store, (Physics { velocity: [1.0, 2.0] },));
///
/// for (id, (physics,)) in store.view::<(Physics,)>().iter_mut() {
///     // ...
/// }
/// ```
pub struct Store<R: Registry> {
    id: StoreId,
    /// Live slots hold the id of their current occupant.
    slots: Box<[Option<EntityId>]>,
    /// Last generation issued per slot; survives destroy and clear.
    generations: Box<[u32]>,
    /// One column per registry member, indexed by tag.
    columns: Vec<Box<dyn ErasedColumn>>,
    _registry: PhantomData<fn() -> R>,
}

impl<R: Registry> Store<R> {
    /// Creates a store able to hold `max_entities` live entities.
    ///
    /// # Panics
    ///
    /// Panics if `max_entities` is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(max_entities: usize) -> Self {
        invariant!(max_entities > 0, "store capacity must be greater than zero");
        invariant!(
            u32::try_from(max_entities).is_ok(),
            "store capacity {max_entities} exceeds u32::MAX"
        );

        let columns = R::columns(max_entities);
        invariant!(
            columns.len() == R::NAMES.len(),
            "registry produced {} columns for {} members",
            columns.len(),
            R::NAMES.len()
        );

        let store = Self {
            id: StoreId::next(),
            slots: vec![None; max_entities].into_boxed_slice(),
            generations: vec![0; max_entities].into_boxed_slice(),
            columns,
            _registry: PhantomData,
        };
        store.check_columns();

        tracing::debug!(
            capacity = max_entities,
            components = ?R::NAMES,
            "entity store created"
        );
        store
    }

    /// Identity carried by handles issued from this store.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> StoreId {
        self.id
    }

    /// Maximum number of live entities.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live entities, counted from the slot array.
    #[must_use]
    pub fn size(&self) -> usize {
        let live = self.slots.iter().filter(|slot| slot.is_some()).count();
        invariant!(
            live <= self.capacity(),
            "store reports {live} live entities over a capacity of {}",
            self.capacity()
        );
        live
    }

    /// Returns `true` once every slot is live.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.size() == self.capacity()
    }

    /// Creates an entity in the first free slot.
    ///
    /// Returns `None` if the store is at capacity.
    pub fn create(&mut self) -> Option<Entity> {
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            tracing::debug!(capacity = self.capacity(), "store full, entity not created");
            return None;
        };

        for column in &self.columns {
            invariant!(
                column.is_vacant(index),
                "slot {index} reused while {} still holds data",
                column.component_name()
            );
        }

        let Ok(raw_index) = u32::try_from(index) else {
            fatal!("slot {index} does not fit an entity id");
        };
        let generation = self.generations[index].wrapping_add(1);
        self.generations[index] = generation;

        let id = EntityId::new(raw_index, generation);
        self.slots[index] = Some(id);
        Some(Entity::bound(self.id, id))
    }

    /// Destroys the entity behind `entity`.
    ///
    /// Clears every component of the slot and the handle's own binding.
    /// Returns `false` (doing nothing) if the handle was already invalid.
    pub fn destroy(&mut self, entity: &mut Entity) -> bool {
        if !self.is_valid(entity) {
            return false;
        }
        let destroyed = entity.id().is_some_and(|id| self.destroy_id(id));
        entity.clear();
        destroyed
    }

    /// Destroys a live entity by id.
    ///
    /// Returns `false` if the id is stale or was never issued.
    pub fn destroy_id(&mut self, id: EntityId) -> bool {
        if !self.is_live(id) {
            return false;
        }
        let index = id.slot();
        self.slots[index] = None;
        for column in &mut self.columns {
            column.reset(index);
        }
        true
    }

    /// Destroys every entity at once.
    ///
    /// Generation counters survive, so handles issued before the clear never
    /// validate against a later occupant of the same slot.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        for column in &mut self.columns {
            column.clear();
        }
        tracing::debug!(capacity = self.capacity(), "entity store cleared");
    }

    /// Returns `true` if `entity` was issued by this store and its slot is
    /// still occupied by the same id.
    #[must_use]
    pub fn is_valid(&self, entity: &Entity) -> bool {
        entity.store_id() == Some(self.id) && entity.id().is_some_and(|id| self.is_live(id))
    }

    /// Syntactic check: `true` iff an id is present.
    ///
    /// Says nothing about liveness; use [`Store::is_live`] for that.
    #[must_use]
    pub const fn is_valid_id(id: Option<EntityId>) -> bool {
        id.is_some()
    }

    /// Returns `true` if `id` names the current occupant of its slot.
    #[must_use]
    pub fn is_live(&self, id: EntityId) -> bool {
        self.slots
            .get(id.slot())
            .is_some_and(|slot| *slot == Some(id))
    }

    /// Issues a new handle for a live id.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<Entity> {
        self.is_live(id).then(|| Entity::bound(self.id, id))
    }

    /// Ids of all live entities, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    /// Writes `values` into the entity's slot, overwriting previous values.
    ///
    /// Returns the written values, or `None` without writing anything if the
    /// handle is invalid.
    pub fn set<Q: Query<R>>(&mut self, entity: &Entity, values: Q) -> Option<Q::Written<'_>> {
        let Some(index) = self.slot_of(entity) else {
            tracing::debug!(entity = ?entity.id(), "set on invalid entity ignored");
            return None;
        };
        Some(Q::write(Q::columns_mut(&mut self.columns), index, values))
    }

    /// Reads the entity's cells for the requested components.
    #[must_use]
    pub fn components<Q: Query<R>>(&self, entity: &Entity) -> Option<Q::Cells<'_>> {
        let index = self.slot_of(entity)?;
        Some(Q::cells(Q::columns(&self.columns), index))
    }

    /// Reads the entity's cells for the requested components, mutably.
    pub fn components_mut<Q: Query<R>>(&mut self, entity: &Entity) -> Option<Q::CellsMut<'_>> {
        let index = self.slot_of(entity)?;
        Some(Q::cells_mut(Q::columns_mut(&mut self.columns), index))
    }

    /// Reports which requested components the entity holds.
    #[must_use]
    pub fn has<Q: Query<R>>(&self, entity: &Entity) -> Option<Q::Presence> {
        let index = self.slot_of(entity)?;
        Some(Q::presence(Q::columns(&self.columns), index))
    }

    /// Detaches one component from the entity, returning the old value.
    pub fn remove<C: Member<R>>(&mut self, entity: &Entity) -> Option<Option<C>> {
        let index = self.slot_of(entity)?;
        Some(self.column_mut::<C>().take(index))
    }

    /// Borrows the whole column of one component type.
    #[must_use]
    pub fn column<C: Member<R>>(&self) -> &Column<C> {
        downcast_ref::<C>(&self.columns, C::TAG)
    }

    fn column_mut<C: Member<R>>(&mut self) -> &mut Column<C> {
        let Some(column) = self.columns.get_mut(C::TAG) else {
            fatal!("no column registered for {} (tag {})", C::NAME, C::TAG);
        };
        downcast_mut::<C>(column)
    }

    /// Creates a lazy view over live entities for the requested components.
    ///
    /// The view borrows the store exclusively, so liveness cannot change
    /// while it exists.
    ///
    /// The requested types must be distinct. Naming one twice does not
    /// build, even if the view is never iterated:
    ///
    /// ```compile_fail
    /// use glint_core::{registry, Store};
    ///
    /// #[derive(Clone, Debug, Default)]
    /// struct Physics;
    ///
    /// registry! { struct Sandbox { Physics } }
    ///
    /// let mut store = Store::<Sandbox>::new(4);
    /// let view = store.view::<(Physics, Physics)>();
    /// println!("{}", view.len());
    /// ```
    ///
    /// Neither does an empty request:
    ///
    /// ```compile_fail
    /// use glint_core::{registry, Store};
    ///
    /// #[derive(Clone, Debug, Default)]
    /// struct Physics;
    ///
    /// registry! { struct Sandbox { Physics } }
    ///
    /// let mut store = Store::<Sandbox>::new(4);
    /// let view = store.view::<()>();
    /// println!("{}", view.len());
    /// ```
    ///
    /// A well-formed request does:
    ///
    /// ```
    /// use glint_core::{registry, Store};
    ///
    /// #[derive(Clone, Debug, Default)]
    /// struct Physics;
    ///
    /// registry! { struct Sandbox { Physics } }
    ///
    /// let mut store = Store::<Sandbox>::new(4);
    /// let view = store.view::<(Physics,)>();
    /// assert_eq!(view.len(), 0);
    /// ```
    pub fn view<Q: Query<R>>(&mut self) -> View<'_, R, Q> {
        self.check_columns();
        View::new(self)
    }

    /// Read-only counterpart of [`Store::view`].
    #[must_use]
    pub fn view_ref<Q: Query<R>>(&self) -> ViewRef<'_, R, Q> {
        self.check_columns();
        ViewRef::new(self)
    }

    pub(crate) fn slots(&self) -> &[Option<EntityId>] {
        &self.slots
    }

    pub(crate) fn columns(&self) -> &[Box<dyn ErasedColumn>] {
        &self.columns
    }

    pub(crate) fn split_mut(&mut self) -> (&[Option<EntityId>], &mut [Box<dyn ErasedColumn>]) {
        (&self.slots, &mut self.columns)
    }

    fn slot_of(&self, entity: &Entity) -> Option<usize> {
        self.is_valid(entity)
            .then(|| entity.id().map(EntityId::slot))
            .flatten()
    }

    fn check_columns(&self) {
        for column in &self.columns {
            invariant!(
                column.len() == self.slots.len(),
                "column {} has {} cells for {} slots",
                column.component_name(),
                column.len(),
                self.slots.len()
            );
        }
    }
}

impl<R: Registry> std::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.id)
            .field("capacity", &self.capacity())
            .field("size", &self.size())
            .field("components", &R::NAMES)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Physics {
        velocity: [f32; 2],
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Collision {
        a: u32,
        b: u32,
    }

    crate::registry! {
        struct Sandbox { Physics, Collision }
    }

    #[test]
    fn test_store_creation() {
        let store = Store::<Sandbox>::new(1000);
        assert_eq!(store.capacity(), 1000);
        assert_eq!(store.size(), 0);
        assert!(!store.is_full());
    }

    #[test]
    fn test_create_yields_distinct_valid_handles() {
        let mut store = Store::<Sandbox>::new(16);
        let handles: Vec<Entity> = (0..16).filter_map(|_| store.create()).collect();

        assert_eq!(handles.len(), 16);
        assert_eq!(store.size(), 16);
        assert!(store.is_full());
        for (i, a) in handles.iter().enumerate() {
            assert!(store.is_valid(a));
            for b in &handles[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_create_past_capacity_returns_none() {
        let mut store = Store::<Sandbox>::new(4);
        let _handles: Vec<Entity> = (0..4).filter_map(|_| store.create()).collect();

        assert!(store.create().is_none());
        assert_eq!(store.size(), 4);
    }

    #[test]
    fn test_set_then_has_and_components() {
        let mut store = Store::<Sandbox>::new(8);
        let entity = store.create().unwrap();

        assert_eq!(store.has::<(Physics,)>(&entity), Some((false,)));

        let (physics,) = store
            .set(&entity, (Physics { velocity: [1.5, -2.0] },))
            .unwrap();
        assert_eq!(physics.velocity, [1.5, -2.0]);

        assert_eq!(store.has::<(Physics,)>(&entity), Some((true,)));
        assert_eq!(
            store.components::<(Physics,)>(&entity),
            Some((&Some(Physics { velocity: [1.5, -2.0] }),))
        );
    }

    #[test]
    fn test_has_reports_per_type() {
        let mut store = Store::<Sandbox>::new(8);
        let entity = store.create().unwrap();
        store.set(&entity, (Physics::default(),));

        assert_eq!(store.has::<(Physics, Collision)>(&entity), Some((true, false)));
        assert_eq!(store.has::<(Collision, Physics)>(&entity), Some((false, true)));
    }

    #[test]
    fn test_set_overwrites_and_returns_references() {
        let mut store = Store::<Sandbox>::new(2);
        let entity = store.create().unwrap();
        store.set(&entity, (Collision { a: 1, b: 2 },));

        let (collision, physics) = store
            .set(&entity, (Collision { a: 3, b: 4 }, Physics { velocity: [0.0, 1.0] }))
            .unwrap();
        collision.a = 30;
        physics.velocity[0] = 9.0;

        let (collision, physics) = store.components::<(Collision, Physics)>(&entity).unwrap();
        assert_eq!(collision.as_ref().map(|c| (c.a, c.b)), Some((30, 4)));
        assert_eq!(physics.as_ref().map(|p| p.velocity), Some([9.0, 1.0]));
    }

    #[test]
    fn test_invalid_handle_writes_nothing() {
        let mut store = Store::<Sandbox>::new(2);
        let mut entity = store.create().unwrap();
        let index = entity.id().unwrap().slot();
        assert!(store.destroy(&mut entity));

        assert!(store.set(&entity, (Physics::default(),)).is_none());
        assert!(store.components::<(Physics,)>(&entity).is_none());
        assert!(store.has::<(Physics, Collision)>(&entity).is_none());
        assert_eq!(store.column::<Physics>().get(index), Some(&None));

        let null = Entity::null();
        assert!(store.set(&null, (Physics::default(),)).is_none());
        assert_eq!(store.column::<Physics>().occupied(), 0);
    }

    #[test]
    fn test_destroy_clears_components_and_handle() {
        let mut store = Store::<Sandbox>::new(4);
        let mut entity = store.create().unwrap();
        store.set(&entity, (Physics::default(), Collision { a: 1, b: 1 }));
        assert_eq!(store.size(), 1);

        assert!(store.destroy(&mut entity));
        assert!(entity.is_null());
        assert!(!store.is_valid(&entity));
        assert_eq!(store.size(), 0);
        assert_eq!(store.column::<Physics>().occupied(), 0);
        assert_eq!(store.column::<Collision>().occupied(), 0);

        assert!(!store.destroy(&mut entity));
    }

    #[test]
    fn test_slot_reuse_does_not_alias_validity() {
        let mut store = Store::<Sandbox>::new(1);
        let a = store.create().unwrap();
        let stale_id = a.id().unwrap();
        assert!(store.destroy_id(stale_id));

        let b = store.create().unwrap();
        assert_eq!(b.id().unwrap().slot(), stale_id.slot());
        assert!(!store.is_valid(&a));
        assert!(store.is_valid(&b));
        assert_ne!(a, b);
        assert!(!store.is_live(stale_id));

        // The reused slot starts empty.
        assert_eq!(store.has::<(Physics, Collision)>(&b), Some((false, false)));
    }

    #[test]
    fn test_clear_invalidates_everything() {
        let mut store = Store::<Sandbox>::new(8);
        let handles: Vec<Entity> = (0..5).filter_map(|_| store.create()).collect();
        for handle in &handles {
            store.set(handle, (Physics::default(), Collision::default()));
        }

        store.clear();
        assert_eq!(store.size(), 0);
        assert!(handles.iter().all(|handle| !store.is_valid(handle)));
        assert_eq!(store.view::<(Physics, Collision)>().iter().count(), 0);

        let fresh = store.create().unwrap();
        assert!(handles.iter().all(|handle| *handle != fresh));
        assert_eq!(store.has::<(Physics, Collision)>(&fresh), Some((false, false)));
    }

    #[test]
    fn test_handles_from_other_stores_are_rejected() {
        let mut first = Store::<Sandbox>::new(2);
        let mut second = Store::<Sandbox>::new(2);
        let mut foreign = first.create().unwrap();
        let _local = second.create().unwrap();

        assert!(!second.is_valid(&foreign));
        assert!(!second.destroy(&mut foreign));
        assert!(first.is_valid(&foreign));
    }

    #[test]
    fn test_remove_detaches_single_component() {
        let mut store = Store::<Sandbox>::new(2);
        let entity = store.create().unwrap();
        store.set(&entity, (Physics { velocity: [2.0, 2.0] }, Collision::default()));

        let removed = store.remove::<Physics>(&entity);
        assert_eq!(removed, Some(Some(Physics { velocity: [2.0, 2.0] })));
        assert_eq!(store.has::<(Physics, Collision)>(&entity), Some((false, true)));
    }

    #[test]
    fn test_entity_rebinds_from_live_id() {
        let mut store = Store::<Sandbox>::new(2);
        let entity = store.create().unwrap();
        let id = entity.id().unwrap();

        let again = store.entity(id).unwrap();
        assert_eq!(again, entity);
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![id]);

        store.destroy_id(id);
        assert!(store.entity(id).is_none());
    }

    #[test]
    fn test_is_valid_id_is_syntactic() {
        assert!(Store::<Sandbox>::is_valid_id(Some(EntityId::new(40, 9))));
        assert!(!Store::<Sandbox>::is_valid_id(None));
    }

    #[test]
    #[should_panic(expected = "still holds data")]
    fn test_dirty_slot_on_reuse_is_fatal() {
        let mut store = Store::<Sandbox>::new(2);
        let entity = store.create().unwrap();
        store.set(&entity, (Physics { velocity: [1.0, 1.0] },));

        // Free the slot without resetting its columns.
        store.slots[entity.id().unwrap().slot()] = None;
        let _ = store.create();
    }

    #[test]
    #[should_panic(expected = "cells for")]
    fn test_column_length_mismatch_is_fatal() {
        let mut store = Store::<Sandbox>::new(4);
        store.columns[<Physics as Member<Sandbox>>::TAG] = Box::new(Column::<Physics>::new(3));
        let _ = store.view::<(Physics,)>();
    }

    #[test]
    #[should_panic(expected = "store capacity must be greater than zero")]
    fn test_zero_capacity_is_fatal() {
        let _ = Store::<Sandbox>::new(0);
    }
}
