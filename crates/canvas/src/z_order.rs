//! Stacking order of board elements.
//!
//! Z-indices are plain integers on the records. A record without one stacks
//! as 0; that default is only used for comparison and never written back.
//! Promotion always assigns `max + 1` over both families, so a sequence of
//! promotions is strictly increasing. The scan is linear in the number of
//! records.

use crate::ElementStore;
use node::{ElementId, ElementKind, ElementRecord};
use strum::IntoEnumIterator;

/// The highest z-index over tasks and notes, or 0 for an empty board.
pub fn max_z_index(store: &dyn ElementStore) -> i32 {
    ElementKind::iter()
        .flat_map(|kind| store.records(kind))
        .map(ElementRecord::z_order)
        .max()
        .unwrap_or(0)
}

/// The z-index a new record gets when none is supplied.
pub fn next_z_index(store: &dyn ElementStore) -> i32 {
    max_z_index(store) + 1
}

/// Move one record above every other record.
///
/// The new value is returned even when `id` is not found in `kind`, so a
/// caller mid-gesture keeps a usable value.
pub fn bring_to_front(store: &mut dyn ElementStore, id: ElementId, kind: ElementKind) -> i32 {
    let z_index = next_z_index(store);
    match store.find_by_id_mut(kind, id) {
        Some(record) => {
            record.z_index = Some(z_index);
            log::debug!("{kind} {id} brought to front at z {z_index}");
        }
        None => log::warn!("bring_to_front: no {kind} with id {id}"),
    }
    z_index
}

/// Tasks then notes, stably sorted by ascending z-index.
pub fn sorted_elements(store: &dyn ElementStore) -> Vec<(ElementKind, &ElementRecord)> {
    let mut elements: Vec<_> = ElementKind::iter()
        .flat_map(|kind| store.records(kind).iter().map(move |record| (kind, record)))
        .collect();
    elements.sort_by_key(|(_, record)| record.z_order());
    elements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn id(n: u128) -> ElementId {
        ElementId::from_u128(n)
    }

    fn mixed_store() -> MemoryStore {
        MemoryStore::with_tasks(vec![
            ElementRecord::new(id(1), 0.0, 0.0).with_z_index(5),
            ElementRecord::new(id(2), 0.0, 0.0),
            ElementRecord::new(id(3), 0.0, 0.0).with_z_index(5),
        ])
    }

    #[test]
    fn test_max_of_empty_board() {
        assert_eq!(max_z_index(&MemoryStore::default()), 0);
        assert_eq!(next_z_index(&MemoryStore::default()), 1);
    }

    #[test]
    fn test_max_treats_missing_as_zero() {
        let mut store = MemoryStore::default();
        store.notes.push(ElementRecord::new(id(1), 0.0, 0.0));
        store.notes.push(ElementRecord::new(id(2), 0.0, 0.0).with_z_index(-3));
        assert_eq!(max_z_index(&store), 0);
        assert_eq!(store.notes[0].z_index, None);
    }

    #[test]
    fn test_max_spans_families() {
        let mut store = mixed_store();
        store.notes.push(ElementRecord::new(id(9), 0.0, 0.0).with_z_index(12));
        assert_eq!(max_z_index(&store), 12);
    }

    #[test]
    fn test_promote_and_sort() {
        let mut store = mixed_store();
        assert_eq!(max_z_index(&store), 5);

        assert_eq!(bring_to_front(&mut store, id(2), ElementKind::Task), 6);
        assert_eq!(store.tasks[1].z_index, Some(6));

        let order: Vec<_> = sorted_elements(&store).iter().map(|(_, r)| r.id).collect();
        assert_eq!(order, vec![id(1), id(3), id(2)]);
    }

    #[test]
    fn test_sort_is_stable_and_tasks_first() {
        let mut store = MemoryStore::with_tasks(vec![
            ElementRecord::new(id(1), 0.0, 0.0).with_z_index(2),
            ElementRecord::new(id(2), 0.0, 0.0),
        ]);
        store.notes.push(ElementRecord::new(id(3), 0.0, 0.0).with_z_index(2));
        store.notes.push(ElementRecord::new(id(4), 0.0, 0.0));

        let sorted = sorted_elements(&store);
        let order: Vec<_> = sorted.iter().map(|(kind, r)| (*kind, r.id)).collect();
        assert_eq!(
            order,
            vec![
                (ElementKind::Task, id(2)),
                (ElementKind::Note, id(4)),
                (ElementKind::Task, id(1)),
                (ElementKind::Note, id(3)),
            ]
        );
    }

    #[test]
    fn test_promotions_are_strictly_increasing() {
        let mut store = mixed_store();
        store.notes.push(ElementRecord::new(id(7), 0.0, 0.0));

        let targets = [
            (id(1), ElementKind::Task),
            (id(7), ElementKind::Note),
            (id(1), ElementKind::Task),
            (id(3), ElementKind::Task),
            (id(7), ElementKind::Note),
        ];
        let mut last = max_z_index(&store);
        for (target, kind) in targets {
            let z = bring_to_front(&mut store, target, kind);
            assert!(z > last);
            last = z;
        }
        assert_eq!(last, 10);
    }

    #[test]
    fn test_promote_looks_only_in_named_family() {
        let mut store = mixed_store();
        let z = bring_to_front(&mut store, id(1), ElementKind::Note);
        assert_eq!(z, 6);
        // The task with that id is untouched.
        assert_eq!(store.tasks[0].z_index, Some(5));
    }
}
