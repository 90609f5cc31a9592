//! Entity CRUD, transforms, duplicate, mirror

use glam::Vec3;
use shared::{GeometryParamRecord, GeometryRecord, MaterialRecord, ObjectId, Transform};

use crate::codec;
use super::{SceneEntity, SceneStore};

/// Fixed offset applied to duplicates so they never exactly overlap their source
pub const DUPLICATE_OFFSET: [f64; 3] = [0.5, 0.0, 0.5];

/// Mirror axis for scale inversion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MirrorAxis {
    X,
    Y,
    Z,
}

impl SceneStore {
    /// Create an entity from a parametric descriptor and take ownership of
    /// the generated mesh. Returns the new entity id.
    ///
    /// Goes through the same decode path as bundle loading, so imported and
    /// unknown descriptors enter as flagged placeholders here too; a pending
    /// model load is queryable via `pending_import`.
    pub fn add_object(&mut self, name: &str, descriptor: GeometryParamRecord) -> ObjectId {
        self.save_undo();
        self.redo_stack.clear();

        let material = MaterialRecord::default();
        let color = [
            material.color[0] as f32,
            material.color[1] as f32,
            material.color[2] as f32,
        ];
        let record = GeometryRecord {
            params: descriptor,
            raw_buffer: None,
        };
        let decoded = codec::decode(&record, color);

        let id = uuid::Uuid::new_v4().to_string();
        self.entities.push(SceneEntity {
            id: id.clone(),
            name: name.to_string(),
            mesh: decoded.mesh,
            descriptor: record.params,
            transform: Transform::new(),
            material,
            wireframe: None,
            visible: true,
            locked: false,
            group_id: None,
            placeholder: decoded.placeholder,
            topology_dirty: false,
        });

        self.version += 1;
        tracing::info!("added object {} ({})", name, super::short_id(&id));
        id
    }

    /// Model path the asset loader still has to resolve for this entity.
    /// Some only while the entity shows its import stand-in.
    pub fn pending_import(&self, id: &str) -> Option<String> {
        let entity = self.get_entity(id)?;
        if !entity.placeholder {
            return None;
        }
        match &entity.descriptor {
            GeometryParamRecord::Imported { model_path, .. } => Some(model_path.clone()),
            _ => None,
        }
    }

    /// Insert a fully constructed entity (used by load and by the asset
    /// bridge when a deferred import resolves).
    pub fn insert_entity(&mut self, entity: SceneEntity) {
        self.entities.push(entity);
        self.version += 1;
    }

    /// Remove an entity and drop its mesh. Detaches it from its group
    /// within the same transition. Locked entities are refused.
    pub fn remove_object(&mut self, id: &str) -> bool {
        if self.is_locked(id) {
            tracing::warn!("remove refused: {} is locked", short(id));
            return false;
        }
        let Some(pos) = self.entities.iter().position(|e| e.id == id) else {
            return false;
        };

        self.save_undo();
        self.redo_stack.clear();

        let entity = self.entities.remove(pos);
        if let Some(gid) = &entity.group_id {
            if let Some(group) = self.get_group_mut(gid) {
                group.object_ids.retain(|oid| oid != id);
            }
        }

        self.version += 1;
        true
    }

    /// Rename an entity. Locked entities are refused.
    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        if self.is_locked(id) {
            tracing::warn!("rename refused: {} is locked", short(id));
            return false;
        }
        let Some(entity) = self.get_entity_mut(id) else {
            return false;
        };
        entity.name = name.to_string();
        self.version += 1;
        true
    }

    /// Toggle visibility. Permitted on locked entities: lock guards edits,
    /// not display state.
    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        let Some(entity) = self.get_entity_mut(id) else {
            return false;
        };
        entity.visible = !entity.visible;
        self.version += 1;
        true
    }

    /// Toggle the entity's own lock flag
    pub fn toggle_lock(&mut self, id: &str) -> bool {
        let Some(entity) = self.get_entity_mut(id) else {
            return false;
        };
        entity.locked = !entity.locked;
        self.version += 1;
        true
    }

    /// Replace an entity's transform. Locked entities are refused.
    pub fn set_transform(&mut self, id: &str, transform: Transform) -> bool {
        if self.is_locked(id) {
            tracing::warn!("transform refused: {} is locked", short(id));
            return false;
        }
        let Some(entity) = self.get_entity_mut(id) else {
            return false;
        };
        entity.transform = transform;
        self.version += 1;
        true
    }

    /// Deep-clone an entity (geometry and material are copied, never shared)
    /// offset by a fixed delta. Returns the clone's id.
    pub fn duplicate(&mut self, id: &str) -> Option<ObjectId> {
        let source = self.get_entity(id)?;

        let mut transform = source.transform.clone();
        transform.position[0] += DUPLICATE_OFFSET[0];
        transform.position[1] += DUPLICATE_OFFSET[1];
        transform.position[2] += DUPLICATE_OFFSET[2];

        let clone = SceneEntity {
            id: uuid::Uuid::new_v4().to_string(),
            name: format!("{} copy", source.name),
            mesh: source.mesh.clone(),
            descriptor: source.descriptor.clone(),
            transform,
            material: source.material.clone(),
            wireframe: source.wireframe.clone(),
            visible: source.visible,
            locked: false,
            group_id: None,
            placeholder: source.placeholder,
            topology_dirty: source.topology_dirty,
        };
        let clone_id = clone.id.clone();

        self.save_undo();
        self.redo_stack.clear();
        self.entities.push(clone);
        self.version += 1;
        Some(clone_id)
    }

    /// Mirror: scale inversion on one axis. A pure transform, the mesh
    /// buffers are untouched. Locked entities are refused.
    pub fn mirror(&mut self, id: &str, axis: MirrorAxis) -> bool {
        if self.is_locked(id) {
            tracing::warn!("mirror refused: {} is locked", short(id));
            return false;
        }
        let Some(entity) = self.get_entity_mut(id) else {
            return false;
        };
        let i = match axis {
            MirrorAxis::X => 0,
            MirrorAxis::Y => 1,
            MirrorAxis::Z => 2,
        };
        entity.transform.scale[i] = -entity.transform.scale[i];
        self.version += 1;
        true
    }

    /// World-space position of an entity's origin
    pub fn world_position(&self, id: &str) -> Option<Vec3> {
        let e = self.get_entity(id)?;
        Some(Vec3::new(
            e.transform.position[0] as f32,
            e.transform.position[1] as f32,
            e.transform.position[2] as f32,
        ))
    }
}

fn short(id: &str) -> &str {
    super::short_id(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> GeometryParamRecord {
        GeometryParamRecord::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }

    #[test]
    fn test_add_and_get() {
        let mut store = SceneStore::default();
        let id = store.add_object("Box", unit_box());
        assert!(store.get_entity(&id).is_some());
        assert_eq!(store.entities.len(), 1);
        assert!(store.get_entity(&id).unwrap().mesh.vertex_count() > 0);
    }

    #[test]
    fn test_add_imported_matches_load_path() {
        let mut store = SceneStore::default();
        let id = store.add_object(
            "Chair",
            GeometryParamRecord::Imported {
                model_path: "models/chair.glb".to_string(),
                original_name: "chair".to_string(),
                original_scale: [1.0, 1.0, 1.0],
            },
        );

        // Same placeholder flagging as a bundle load of the same record
        let entity = store.get_entity(&id).unwrap();
        assert!(entity.placeholder);
        assert!(entity.mesh.vertex_count() > 0);
        assert_eq!(
            store.pending_import(&id).as_deref(),
            Some("models/chair.glb")
        );

        let parametric = store.add_object("Box", unit_box());
        assert!(!store.get_entity(&parametric).unwrap().placeholder);
        assert!(store.pending_import(&parametric).is_none());
    }

    #[test]
    fn test_remove_drops_entity() {
        let mut store = SceneStore::default();
        let id = store.add_object("Box", unit_box());
        assert!(store.remove_object(&id));
        assert!(store.get_entity(&id).is_none());
    }

    #[test]
    fn test_locked_refuses_mutation() {
        let mut store = SceneStore::default();
        let id = store.add_object("Box", unit_box());
        store.toggle_lock(&id);

        assert!(!store.rename(&id, "other"));
        assert!(!store.remove_object(&id));
        assert!(!store.mirror(&id, MirrorAxis::X));
        assert_eq!(store.get_entity(&id).unwrap().name, "Box");

        // Unlocking is always possible
        assert!(store.toggle_lock(&id));
        assert!(store.rename(&id, "other"));
    }

    #[test]
    fn test_duplicate_offsets_and_deep_clones() {
        let mut store = SceneStore::default();
        let id = store.add_object("Box", unit_box());
        let copy_id = store.duplicate(&id).unwrap();

        let src = store.get_entity(&id).unwrap();
        let copy = store.get_entity(&copy_id).unwrap();
        assert_ne!(src.id, copy.id);
        assert_eq!(copy.transform.position[0], DUPLICATE_OFFSET[0]);
        assert_eq!(copy.transform.position[2], DUPLICATE_OFFSET[2]);
        assert_eq!(copy.mesh.vertex_count(), src.mesh.vertex_count());
    }

    #[test]
    fn test_mirror_flips_one_axis() {
        let mut store = SceneStore::default();
        let id = store.add_object("Box", unit_box());
        store.mirror(&id, MirrorAxis::Y);
        let e = store.get_entity(&id).unwrap();
        assert_eq!(e.transform.scale, [1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_version_bumps() {
        let mut store = SceneStore::default();
        let v0 = store.version();
        let id = store.add_object("Box", unit_box());
        assert!(store.version() > v0);
        let v1 = store.version();
        store.toggle_visibility(&id);
        assert!(store.version() > v1);
    }
}
