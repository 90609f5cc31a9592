//! Group CRUD and membership
//!
//! Invariant: `group.object_ids` and the entities' `group_id` pointers stay
//! consistent — every membership mutation updates both sides within one
//! store transition.

use shared::{GroupRecord, ObjectId};

use super::SceneStore;

impl SceneStore {
    pub fn create_group(&mut self, name: &str) -> ObjectId {
        self.save_undo();
        self.redo_stack.clear();

        let id = uuid::Uuid::new_v4().to_string();
        self.groups.push(GroupRecord {
            id: id.clone(),
            name: name.to_string(),
            expanded: true,
            visible: true,
            locked: false,
            object_ids: Vec::new(),
        });

        self.version += 1;
        tracing::info!("created group {} ({})", name, super::short_id(&id));
        id
    }

    /// Remove a group. Former members survive with `group_id` cleared.
    pub fn remove_group(&mut self, id: &str) -> bool {
        let Some(pos) = self.groups.iter().position(|g| g.id == id) else {
            return false;
        };

        self.save_undo();
        self.redo_stack.clear();

        let group = self.groups.remove(pos);
        for oid in &group.object_ids {
            if let Some(entity) = self.get_entity_mut(oid) {
                entity.group_id = None;
            }
        }

        self.version += 1;
        true
    }

    /// Move entities into a group. An entity belongs to at most one group,
    /// so each is detached from its previous group first; both sides of the
    /// membership are updated in the same transition.
    pub fn move_objects_to_group(&mut self, ids: &[ObjectId], group_id: &str) -> bool {
        if self.get_group(group_id).is_none() {
            tracing::warn!("move to unknown group {}", super::short_id(group_id));
            return false;
        }

        self.save_undo();
        self.redo_stack.clear();

        for id in ids {
            if self.get_entity(id).is_none() {
                continue;
            }

            // Detach from previous group
            let previous = self.get_entity(id).and_then(|e| e.group_id.clone());
            if let Some(prev_gid) = previous {
                if let Some(prev) = self.get_group_mut(&prev_gid) {
                    prev.object_ids.retain(|oid| oid != id);
                }
            }

            if let Some(entity) = self.get_entity_mut(id) {
                entity.group_id = Some(group_id.to_string());
            }
            if let Some(group) = self.get_group_mut(group_id) {
                if !group.object_ids.contains(id) {
                    group.object_ids.push(id.clone());
                }
            }
        }

        self.version += 1;
        true
    }

    /// Detach entities from whatever group they are in
    pub fn remove_from_group(&mut self, ids: &[ObjectId]) {
        self.save_undo();
        self.redo_stack.clear();

        for id in ids {
            let Some(gid) = self.get_entity(id).and_then(|e| e.group_id.clone()) else {
                continue;
            };
            if let Some(group) = self.get_group_mut(&gid) {
                group.object_ids.retain(|oid| oid != id);
            }
            if let Some(entity) = self.get_entity_mut(id) {
                entity.group_id = None;
            }
        }

        self.version += 1;
    }

    pub fn rename_group(&mut self, id: &str, name: &str) -> bool {
        let Some(group) = self.get_group_mut(id) else {
            return false;
        };
        group.name = name.to_string();
        self.version += 1;
        true
    }

    pub fn toggle_group_visibility(&mut self, id: &str) -> bool {
        let Some(group) = self.get_group_mut(id) else {
            return false;
        };
        group.visible = !group.visible;
        self.version += 1;
        true
    }

    pub fn toggle_group_lock(&mut self, id: &str) -> bool {
        let Some(group) = self.get_group_mut(id) else {
            return false;
        };
        group.locked = !group.locked;
        self.version += 1;
        true
    }

    pub fn toggle_group_expanded(&mut self, id: &str) -> bool {
        let Some(group) = self.get_group_mut(id) else {
            return false;
        };
        group.expanded = !group.expanded;
        self.version += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::GeometryParamRecord;

    fn store_with_two() -> (SceneStore, ObjectId, ObjectId) {
        let mut store = SceneStore::default();
        let a = store.add_object(
            "a",
            GeometryParamRecord::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
        );
        let b = store.add_object(
            "b",
            GeometryParamRecord::Sphere {
                radius: 0.5,
                width_segments: 8,
                height_segments: 6,
            },
        );
        (store, a, b)
    }

    #[test]
    fn test_membership_consistency() {
        let (mut store, a, b) = store_with_two();
        let g = store.create_group("G");
        assert!(store.move_objects_to_group(&[a.clone(), b.clone()], &g));

        let group = store.get_group(&g).unwrap();
        assert!(group.object_ids.contains(&a));
        assert!(group.object_ids.contains(&b));
        assert_eq!(store.get_entity(&a).unwrap().group_id.as_deref(), Some(g.as_str()));
        assert_eq!(store.get_entity(&b).unwrap().group_id.as_deref(), Some(g.as_str()));
    }

    #[test]
    fn test_at_most_one_group() {
        let (mut store, a, _) = store_with_two();
        let g1 = store.create_group("G1");
        let g2 = store.create_group("G2");
        store.move_objects_to_group(std::slice::from_ref(&a), &g1);
        store.move_objects_to_group(std::slice::from_ref(&a), &g2);

        assert!(!store.get_group(&g1).unwrap().object_ids.contains(&a));
        assert!(store.get_group(&g2).unwrap().object_ids.contains(&a));
        assert_eq!(store.get_entity(&a).unwrap().group_id.as_deref(), Some(g2.as_str()));
    }

    #[test]
    fn test_remove_group_detaches_members() {
        let (mut store, a, b) = store_with_two();
        let g = store.create_group("G");
        store.move_objects_to_group(&[a.clone(), b.clone()], &g);
        assert!(store.remove_group(&g));

        assert!(store.get_entity(&a).unwrap().group_id.is_none());
        assert!(store.get_entity(&b).unwrap().group_id.is_none());
        assert_eq!(store.entities.len(), 2);
    }

    #[test]
    fn test_lock_inherited_downward() {
        let (mut store, a, _) = store_with_two();
        let g = store.create_group("G");
        store.move_objects_to_group(std::slice::from_ref(&a), &g);

        assert!(!store.is_locked(&a));
        store.toggle_group_lock(&g);
        assert!(store.is_locked(&a));
        assert!(!store.can_select(&a));

        store.toggle_group_lock(&g);
        assert!(!store.is_locked(&a));
        assert!(store.can_select(&a));
    }

    #[test]
    fn test_group_visibility_hides_members() {
        let (mut store, a, _) = store_with_two();
        let g = store.create_group("G");
        store.move_objects_to_group(std::slice::from_ref(&a), &g);

        assert_eq!(store.visible_entities().len(), 2);
        store.toggle_group_visibility(&g);
        let visible: Vec<_> = store.visible_entities().iter().map(|e| e.id.clone()).collect();
        assert!(!visible.contains(&a));
        assert_eq!(visible.len(), 1);
    }

    #[test]
    fn test_remove_entity_updates_group() {
        let (mut store, a, _) = store_with_two();
        let g = store.create_group("G");
        store.move_objects_to_group(std::slice::from_ref(&a), &g);
        store.remove_object(&a);
        assert!(!store.get_group(&g).unwrap().object_ids.contains(&a));
    }
}
