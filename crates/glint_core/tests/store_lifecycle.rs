//! End-to-end lifecycle checks for the entity store.

use glint_core::{registry, Entity, Store};

#[derive(Clone, Debug, Default, PartialEq)]
struct Physics {
    velocity: [f32; 2],
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Collision {
    a: u32,
    b: u32,
}

registry! {
    /// Components used by these tests.
    struct Sandbox { Physics, Collision }
}

#[allow(clippy::cast_precision_loss)]
fn physics_for(i: usize) -> Physics {
    Physics {
        velocity: [i as f32, i as f32 * 0.5],
    }
}

#[allow(clippy::cast_possible_truncation)]
fn collision_for(i: usize) -> Collision {
    Collision {
        a: i as u32,
        b: (i * 2) as u32,
    }
}

#[test]
fn test_hundred_entity_round_trip() {
    let mut store = Store::<Sandbox>::new(100);
    let handles: Vec<Entity> = (0..100).filter_map(|_| store.create()).collect();
    assert_eq!(handles.len(), 100);

    for (i, handle) in handles.iter().enumerate() {
        handle.set(&mut store, (physics_for(i), collision_for(i)));
    }

    for (i, handle) in handles.iter().enumerate() {
        let (physics, collision) = handle.components::<(Physics, Collision), _>(&store).unwrap();
        assert_eq!(physics.as_ref(), Some(&physics_for(i)));
        assert_eq!(collision.as_ref(), Some(&collision_for(i)));
    }

    let target = handles[42].id().unwrap();
    for (id, (physics, collision)) in store.view::<(Physics, Collision)>().iter_mut() {
        if id == target {
            *physics = Some(Physics { velocity: [-1.0, -1.0] });
            *collision = Some(Collision { a: 4200, b: 4201 });
        }
    }

    for (i, handle) in handles.iter().enumerate() {
        let (physics, collision) = handle.components::<(Physics, Collision), _>(&store).unwrap();
        if i == 42 {
            assert_eq!(physics.as_ref().map(|p| p.velocity), Some([-1.0, -1.0]));
            assert_eq!(collision.as_ref().map(|c| (c.a, c.b)), Some((4200, 4201)));
        } else {
            assert_eq!(physics.as_ref(), Some(&physics_for(i)));
            assert_eq!(collision.as_ref(), Some(&collision_for(i)));
        }
    }
}

#[test]
fn test_capacity_plus_one() {
    let mut store = Store::<Sandbox>::new(8);
    let handles: Vec<Entity> = (0..8).filter_map(|_| store.create()).collect();
    assert_eq!(handles.len(), 8);
    assert!(store.create().is_none());
    assert!(handles.iter().all(|handle| handle.is_valid(&store)));
}

#[test]
fn test_has_pair_after_single_set() {
    let mut store = Store::<Sandbox>::new(4);
    let entity = store.create().unwrap();
    entity.set(&mut store, (Physics::default(),));
    assert_eq!(
        entity.has::<(Physics, Collision), _>(&store),
        Some((true, false))
    );
}

#[test]
fn test_destroy_then_reuse_keeps_old_handle_invalid() {
    let mut store = Store::<Sandbox>::new(3);
    let handles: Vec<Entity> = (0..3).filter_map(|_| store.create()).collect();
    let (first, rest) = handles.split_first().unwrap();

    // Destroy by id so `first` keeps its now stale binding.
    assert!(store.destroy_id(first.id().unwrap()));
    assert!(!first.is_null());
    assert!(!first.is_valid(&store));

    let replacement = store.create().unwrap();
    assert_eq!(replacement.id().unwrap().slot(), first.id().unwrap().slot());
    assert!(!first.is_valid(&store));
    assert!(replacement.is_valid(&store));
    assert_ne!(*first, replacement);
    assert!(first.set(&mut store, (Physics::default(),)).is_none());
    assert_eq!(replacement.has::<(Physics,), _>(&store), Some((false,)));

    assert!(rest.iter().all(|handle| handle.is_valid(&store)));
    assert_eq!(store.size(), 3);
}

#[test]
fn test_take_moves_binding() {
    let mut store = Store::<Sandbox>::new(2);
    let mut original = store.create().unwrap();
    let moved = original.take();

    assert!(original.is_null());
    assert!(!original.is_valid(&store));
    assert!(moved.is_valid(&store));
    assert!(!store.destroy(&mut original));
    assert_eq!(store.size(), 1);
}

#[test]
fn test_clear_then_refill() {
    let mut store = Store::<Sandbox>::new(5);
    let old: Vec<Entity> = (0..5).filter_map(|_| store.create()).collect();
    for handle in &old {
        handle.set(&mut store, (Collision { a: 1, b: 1 },));
    }

    store.clear();
    assert_eq!(store.view_ref::<(Collision,)>().iter().count(), 0);

    let fresh: Vec<Entity> = (0..5).filter_map(|_| store.create()).collect();
    assert_eq!(fresh.len(), 5);
    assert!(old.iter().all(|handle| !handle.is_valid(&store)));
    assert!(fresh
        .iter()
        .all(|handle| handle.has::<(Collision,), _>(&store) == Some((false,))));
}

#[test]
fn test_view_visits_only_live_entities_with_optional_cells() {
    let mut store = Store::<Sandbox>::new(10);
    let mut handles: Vec<Entity> = (0..10).filter_map(|_| store.create()).collect();
    for (i, handle) in handles.iter().enumerate() {
        if i % 2 == 0 {
            handle.set(&mut store, (physics_for(i),));
        }
    }
    for handle in handles.iter_mut().skip(7) {
        store.destroy(handle);
    }

    let view = store.view_ref::<(Physics,)>();
    assert_eq!(view.len(), 7);
    let with_physics = view
        .iter()
        .filter(|(_, (physics,))| physics.is_some())
        .count();
    assert_eq!(with_physics, 4);
}
