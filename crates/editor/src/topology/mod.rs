//! Mesh topology editor
//!
//! Direct manipulation of an entity's buffers while an edit mode is active:
//! weld-group vertex drags, edge drags, face extrude, and edge bevel. All
//! edits write into the entity owned by the scene store and mark it
//! topology-dirty so the codec attaches a raw-buffer override on save.

mod drag;
pub mod ops;
pub mod weld;

pub use drag::{DragPreview, EditSession};
pub use weld::{WeldGroups, WELD_TOLERANCE};

use std::collections::BTreeSet;

use glam::{EulerRot, Mat4, Quat, Vec3};
use shared::Transform;

/// Active element kind while editing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditMode {
    Vertex,
    Edge,
    Face,
}

/// Selected elements, mutually exclusive by edit mode; cleared on mode
/// change, on commit, and on cancel.
#[derive(Debug, Default, Clone)]
pub struct EditSelection {
    /// Weld group ids
    pub vertices: BTreeSet<usize>,
    /// Normalized (min, max) buffer index pairs
    pub edges: BTreeSet<(u32, u32)>,
    /// Triangle indices
    pub faces: BTreeSet<usize>,
}

impl EditSelection {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }
}

/// Local -> world matrix for an entity transform (XYZ Euler rotation)
pub fn world_matrix(t: &Transform) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::new(t.scale[0] as f32, t.scale[1] as f32, t.scale[2] as f32),
        Quat::from_euler(
            EulerRot::XYZ,
            t.rotation[0] as f32,
            t.rotation[1] as f32,
            t.rotation[2] as f32,
        ),
        Vec3::new(
            t.position[0] as f32,
            t.position[1] as f32,
            t.position[2] as f32,
        ),
    )
}
