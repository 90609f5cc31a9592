use shared::ObjectId;

use super::scene::SceneStore;

/// Object selection state (supports multi-select)
#[derive(Default)]
pub struct SelectionState {
    /// Selected entity IDs (in order of selection)
    selected: Vec<ObjectId>,
    /// Version counter for selection changes (for overlay cache invalidation)
    pub version: u64,
}

impl SelectionState {
    /// Primary (first) selected entity
    pub fn primary(&self) -> Option<&ObjectId> {
        self.selected.first()
    }

    /// All selected entities
    pub fn all(&self) -> &[ObjectId] {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// Select a single entity (clears previous selection).
    /// Locked entities are refused; returns whether the selection changed.
    pub fn select(&mut self, store: &SceneStore, id: ObjectId) -> bool {
        if !store.can_select(&id) {
            tracing::warn!("selection refused for locked entity");
            return false;
        }
        self.selected.clear();
        self.selected.push(id);
        self.version += 1;
        true
    }

    /// Toggle selection (Ctrl+click behavior); locked entities are refused
    pub fn toggle(&mut self, store: &SceneStore, id: ObjectId) -> bool {
        if let Some(pos) = self.selected.iter().position(|s| s == &id) {
            self.selected.remove(pos);
            self.version += 1;
            return true;
        }
        if !store.can_select(&id) {
            tracing::warn!("selection refused for locked entity");
            return false;
        }
        self.selected.push(id);
        self.version += 1;
        true
    }

    pub fn clear(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.version += 1;
        }
    }

    /// Drop selected ids that no longer exist or became locked
    pub fn prune(&mut self, store: &SceneStore) {
        let before = self.selected.len();
        self.selected.retain(|id| store.can_select(id));
        if self.selected.len() != before {
            self.version += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::GeometryParamRecord;

    fn store_with(n: usize) -> (SceneStore, Vec<ObjectId>) {
        let mut store = SceneStore::default();
        let ids = (0..n)
            .map(|i| {
                store.add_object(
                    &format!("e{}", i),
                    GeometryParamRecord::Box {
                        width: 1.0,
                        height: 1.0,
                        depth: 1.0,
                    },
                )
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn test_initial_empty() {
        let s = SelectionState::default();
        assert!(s.primary().is_none());
        assert_eq!(s.count(), 0);
    }

    #[test]
    fn test_select_clears_previous() {
        let (store, ids) = store_with(2);
        let mut s = SelectionState::default();
        assert!(s.select(&store, ids[0].clone()));
        assert!(s.select(&store, ids[1].clone()));
        assert_eq!(s.count(), 1);
        assert!(s.is_selected(&ids[1]));
    }

    #[test]
    fn test_toggle_add_remove() {
        let (store, ids) = store_with(2);
        let mut s = SelectionState::default();
        s.select(&store, ids[0].clone());
        s.toggle(&store, ids[1].clone());
        assert_eq!(s.count(), 2);
        s.toggle(&store, ids[0].clone());
        assert_eq!(s.count(), 1);
        assert_eq!(s.primary(), Some(&ids[1]));
    }

    #[test]
    fn test_locked_entity_not_selectable() {
        let (mut store, ids) = store_with(1);
        store.toggle_lock(&ids[0]);
        let mut s = SelectionState::default();
        assert!(!s.select(&store, ids[0].clone()));
        assert_eq!(s.count(), 0);
    }

    #[test]
    fn test_group_lock_denies_selection() {
        let (mut store, ids) = store_with(1);
        let g = store.create_group("G");
        store.move_objects_to_group(&ids, &g);
        store.toggle_group_lock(&g);

        let mut s = SelectionState::default();
        assert!(!s.select(&store, ids[0].clone()));
    }

    #[test]
    fn test_prune_after_lock() {
        let (mut store, ids) = store_with(2);
        let mut s = SelectionState::default();
        s.select(&store, ids[0].clone());
        s.toggle(&store, ids[1].clone());
        store.toggle_lock(&ids[0]);
        s.prune(&store);
        assert_eq!(s.count(), 1);
        assert!(s.is_selected(&ids[1]));
    }
}
