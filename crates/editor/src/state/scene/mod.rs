//! Scene entity store
//!
//! Canonical registry of entities, groups, and lights with lock semantics
//! and an undo snapshot hook. The store is an explicit context object passed
//! by reference to every operation; there is no process-wide instance.

mod display;
mod entity_ops;
mod group_ops;
mod history;
mod light_ops;
mod persistence;

pub use display::{entity_display_name, light_display_name, short_id};
pub use entity_ops::{MirrorAxis, DUPLICATE_OFFSET};
pub use persistence::{PendingImport, StoreSnapshot};

use shared::{
    GeometryParamRecord, GroupRecord, LightRecord, MaterialRecord, ObjectId, Transform,
    WireframeStyle,
};

use crate::mesh::{self, LineMeshData, MeshData};

/// A placed object: an owned mesh plus editor metadata.
/// The store is the sole owner of the mesh's lifecycle.
pub struct SceneEntity {
    pub id: ObjectId,
    pub name: String,
    pub mesh: MeshData,
    /// Parametric descriptor carried from creation; the codec reads this
    /// instead of inspecting buffers at encode time.
    pub descriptor: GeometryParamRecord,
    pub transform: Transform,
    pub material: MaterialRecord,
    pub wireframe: Option<WireframeStyle>,
    pub visible: bool,
    pub locked: bool,
    pub group_id: Option<ObjectId>,
    /// Stand-in mesh for a failed/pending import
    pub placeholder: bool,
    /// Set by the topology editor once buffers no longer match `descriptor`;
    /// forces a raw-buffer override on save.
    pub topology_dirty: bool,
}

/// Scene entity store with undo/redo snapshot history
#[derive(Default)]
pub struct SceneStore {
    pub entities: Vec<SceneEntity>,
    pub groups: Vec<GroupRecord>,
    pub lights: Vec<LightRecord>,
    pub(crate) undo_stack: Vec<StoreSnapshot>,
    pub(crate) redo_stack: Vec<StoreSnapshot>,
    /// Monotonically increasing version counter for renderer cache invalidation
    pub(crate) version: u64,
}

impl SceneStore {
    /// Current store version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get_entity(&self, id: &str) -> Option<&SceneEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_entity_mut(&mut self, id: &str) -> Option<&mut SceneEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn get_group(&self, id: &str) -> Option<&GroupRecord> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn get_group_mut(&mut self, id: &str) -> Option<&mut GroupRecord> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    pub fn get_light(&self, id: &str) -> Option<&LightRecord> {
        self.lights.iter().find(|l| l.id == id)
    }

    pub fn get_light_mut(&mut self, id: &str) -> Option<&mut LightRecord> {
        self.lights.iter_mut().find(|l| l.id == id)
    }

    /// An entity is locked when its own flag is set or its owning group's
    /// flag is set. Lock is inherited downward, never upward.
    pub fn is_locked(&self, id: &str) -> bool {
        let Some(entity) = self.get_entity(id) else {
            return false;
        };
        if entity.locked {
            return true;
        }
        entity
            .group_id
            .as_deref()
            .and_then(|gid| self.get_group(gid))
            .map(|g| g.locked)
            .unwrap_or(false)
    }

    /// Selection is denied for locked entities
    pub fn can_select(&self, id: &str) -> bool {
        self.get_entity(id).is_some() && !self.is_locked(id)
    }

    /// Entities the renderer should draw this frame: entity visible and its
    /// owning group (if any) visible.
    pub fn visible_entities(&self) -> Vec<&SceneEntity> {
        self.entities
            .iter()
            .filter(|e| {
                e.visible
                    && e.group_id
                        .as_deref()
                        .and_then(|gid| self.get_group(gid))
                        .map(|g| g.visible)
                        .unwrap_or(true)
            })
            .collect()
    }

    /// Bump version without saving undo
    pub fn notify_mutated(&mut self) {
        self.version += 1;
    }

    /// Regenerate the wireframe overlay line mesh for an entity. None when
    /// the entity is missing or has no wireframe style. The renderer calls
    /// this whenever the store version changes.
    pub fn wireframe_overlay(&self, id: &str) -> Option<LineMeshData> {
        let entity = self.get_entity(id)?;
        let style = entity.wireframe.as_ref()?;
        let color = [
            style.color[0] as f32,
            style.color[1] as f32,
            style.color[2] as f32,
            style.opacity as f32,
        ];
        Some(mesh::wireframe_lines(&entity.mesh, color))
    }
}
