//! Per-entity edit session and drag state machines
//!
//! Vertex editing: `Idle -> Hover -> Dragging -> Idle`, started by a primary
//! press on a hovered weld group and ended by release. Edge editing:
//! `Idle -> Armed -> Dragging -> Idle`, armed by a double-click gesture and
//! ended by a secondary press — deliberately asymmetric from vertex editing.
//!
//! Drag writes are applied live to the entity's buffers each pointer move;
//! cancel (Escape or a secondary press during a vertex drag) stops the
//! session and keeps the last applied positions. There is no rollback.

use glam::{Mat4, Vec3};
use shared::ObjectId;

use crate::camera::EditorCamera;
use crate::mesh::MeshData;
use crate::picking::{self, Ray};
use crate::state::scene::SceneStore;

use super::ops;
use super::weld::WeldGroups;
use super::{world_matrix, EditMode, EditSelection};

/// World-space radius within which a vertex group can be hovered/picked
pub const VERTEX_PICK_RADIUS: f32 = 0.12;
/// World-space distance within which an edge can be picked
pub const EDGE_PICK_RADIUS: f32 = 0.1;

#[derive(Debug)]
enum DragPhase {
    Idle,
    Hover {
        group: usize,
    },
    DraggingVertex {
        group: usize,
        plane_point: Vec3,
        plane_normal: Vec3,
    },
    ArmedEdge {
        groups: (usize, usize),
        start_locals: (Vec3, Vec3),
        midpoint_world: Vec3,
    },
    DraggingEdge {
        groups: (usize, usize),
        start_locals: (Vec3, Vec3),
        plane_point: Vec3,
        plane_normal: Vec3,
    },
}

/// Overlay state the renderer draws during a drag
#[derive(Clone, Debug)]
pub struct DragPreview {
    /// World position of the dragged element
    pub position: Vec3,
    /// True for edge drags
    pub is_edge: bool,
}

/// Edit-mode session for one entity. Owns the derived weld groups and the
/// drag state machine; all writes go through the scene store's entity.
pub struct EditSession {
    pub entity_id: ObjectId,
    pub mode: EditMode,
    pub selection: EditSelection,
    weld: WeldGroups,
    drag: DragPhase,
    world: Mat4,
    local: Mat4,
}

impl EditSession {
    /// Enter an edit mode for an entity. Refused for locked or missing
    /// entities. Scans buffer positions once to build the weld groups.
    pub fn begin(store: &SceneStore, id: &str, mode: EditMode) -> Option<Self> {
        if store.is_locked(id) {
            tracing::warn!("edit refused: entity is locked");
            return None;
        }
        let entity = store.get_entity(id)?;
        let world = world_matrix(&entity.transform);
        Some(Self {
            entity_id: id.to_string(),
            mode,
            selection: EditSelection::default(),
            weld: WeldGroups::build(&entity.mesh),
            drag: DragPhase::Idle,
            world,
            local: world.inverse(),
        })
    }

    /// Switch element kind; clears selection and stops any drag
    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
        self.selection.clear();
        self.drag = DragPhase::Idle;
    }

    pub fn weld_groups(&self) -> &WeldGroups {
        &self.weld
    }

    pub fn is_dragging(&self) -> bool {
        matches!(
            self.drag,
            DragPhase::DraggingVertex { .. } | DragPhase::DraggingEdge { .. }
        )
    }

    pub fn drag_preview(&self, store: &SceneStore) -> Option<DragPreview> {
        let mesh = &store.get_entity(&self.entity_id)?.mesh;
        match &self.drag {
            DragPhase::DraggingVertex { group, .. } | DragPhase::Hover { group } => {
                Some(DragPreview {
                    position: self
                        .world
                        .transform_point3(self.weld.current_position(mesh, *group)),
                    is_edge: false,
                })
            }
            DragPhase::ArmedEdge { groups, .. } | DragPhase::DraggingEdge { groups, .. } => {
                let a = self.weld.current_position(mesh, groups.0);
                let b = self.weld.current_position(mesh, groups.1);
                Some(DragPreview {
                    position: self.world.transform_point3((a + b) * 0.5),
                    is_edge: true,
                })
            }
            DragPhase::Idle => None,
        }
    }

    // ── Vertex drag: Idle -> Hover -> Dragging -> Idle ─────────

    /// Pointer moved without a drag: update hover, or apply the active drag
    pub fn pointer_move(&mut self, store: &mut SceneStore, camera: &EditorCamera, ray: &Ray) {
        match &self.drag {
            DragPhase::Idle | DragPhase::Hover { .. } => {
                if self.mode == EditMode::Vertex {
                    self.drag = match self.pick_group(store, ray) {
                        Some(group) => DragPhase::Hover { group },
                        None => DragPhase::Idle,
                    };
                }
            }
            DragPhase::ArmedEdge { .. } => self.start_edge_drag(camera),
            DragPhase::DraggingVertex { .. } | DragPhase::DraggingEdge { .. } => {
                self.apply_drag(store, ray);
            }
        }
    }

    /// Primary button press: starts a vertex drag from hover, or toggles
    /// element selection in edge/face modes.
    pub fn primary_press(&mut self, store: &mut SceneStore, camera: &EditorCamera, ray: &Ray) {
        match self.mode {
            EditMode::Vertex => {
                if let DragPhase::Hover { group } = self.drag {
                    let Some(entity) = store.get_entity(&self.entity_id) else {
                        return;
                    };
                    let plane_point = self
                        .world
                        .transform_point3(self.weld.current_position(&entity.mesh, group));
                    self.drag = DragPhase::DraggingVertex {
                        group,
                        plane_point,
                        plane_normal: camera.view_direction(),
                    };
                }
            }
            EditMode::Edge => {
                if let Some(edge) = self.pick_edge(store, ray) {
                    if !self.selection.edges.remove(&edge) {
                        self.selection.edges.insert(edge);
                    }
                }
            }
            EditMode::Face => {
                if let Some(tri) = self.pick_face(store, ray) {
                    if !self.selection.faces.remove(&tri) {
                        self.selection.faces.insert(tri);
                    }
                }
            }
        }
    }

    /// Primary button release ends a vertex drag (writes are already live)
    pub fn primary_release(&mut self) {
        if let DragPhase::DraggingVertex { group, .. } = self.drag {
            self.drag = DragPhase::Hover { group };
        }
    }

    // ── Edge drag: Idle -> Armed -> Dragging -> Idle ───────────

    /// Double-click gesture arms an edge drag on the nearest edge
    pub fn double_click(&mut self, store: &SceneStore, ray: &Ray) {
        if self.mode != EditMode::Edge {
            return;
        }
        let Some(entity) = store.get_entity(&self.entity_id) else {
            return;
        };
        let Some((i0, i1)) = self.pick_edge(store, ray) else {
            return;
        };
        let groups = (
            self.weld.group_of(i0 as usize),
            self.weld.group_of(i1 as usize),
        );
        let a = self.weld.current_position(&entity.mesh, groups.0);
        let b = self.weld.current_position(&entity.mesh, groups.1);
        self.drag = DragPhase::ArmedEdge {
            groups,
            start_locals: (a, b),
            midpoint_world: self.world.transform_point3((a + b) * 0.5),
        };
    }

    /// Secondary button: terminates an edge drag, cancels a vertex drag
    pub fn secondary_press(&mut self) {
        match self.drag {
            DragPhase::DraggingEdge { .. } | DragPhase::ArmedEdge { .. } => {
                self.drag = DragPhase::Idle;
            }
            DragPhase::DraggingVertex { .. } => self.cancel_drag(),
            _ => {}
        }
    }

    /// Escape: stop the active drag, keeping the last applied positions
    pub fn cancel_drag(&mut self) {
        if self.is_dragging() {
            tracing::info!("drag canceled, last applied positions kept");
        }
        self.drag = DragPhase::Idle;
    }

    fn start_edge_drag(&mut self, camera: &EditorCamera) {
        if let DragPhase::ArmedEdge {
            groups,
            start_locals,
            midpoint_world,
        } = self.drag
        {
            self.drag = DragPhase::DraggingEdge {
                groups,
                start_locals,
                plane_point: midpoint_world,
                plane_normal: camera.view_direction(),
            };
        }
    }

    /// Project the pointer ray onto the drag plane and write the result
    /// into every affected weld-group member.
    fn apply_drag(&mut self, store: &mut SceneStore, ray: &Ray) {
        let entity_id = self.entity_id.clone();
        match &self.drag {
            DragPhase::DraggingVertex {
                group,
                plane_point,
                plane_normal,
            } => {
                let Some(hit) = picking::ray_plane_intersect(ray, *plane_point, *plane_normal)
                else {
                    return;
                };
                let local = self.local.transform_point3(hit);
                let group = *group;
                let Some(entity) = store.get_entity_mut(&entity_id) else {
                    return;
                };
                self.weld.write_position(&mut entity.mesh, group, local);
                entity.mesh.recompute_normals();
                entity.topology_dirty = true;
                store.notify_mutated();
            }
            DragPhase::DraggingEdge {
                groups,
                start_locals,
                plane_point,
                plane_normal,
            } => {
                let Some(hit) = picking::ray_plane_intersect(ray, *plane_point, *plane_normal)
                else {
                    return;
                };
                // One offset from the edge midpoint delta, applied to all
                // vertices coincident with either endpoint.
                let delta_world = hit - *plane_point;
                let delta_local = self.local.transform_vector3(delta_world);
                let (ga, gb) = *groups;
                let (a0, b0) = *start_locals;
                let Some(entity) = store.get_entity_mut(&entity_id) else {
                    return;
                };
                self.weld.write_position(&mut entity.mesh, ga, a0 + delta_local);
                self.weld.write_position(&mut entity.mesh, gb, b0 + delta_local);
                entity.mesh.recompute_normals();
                entity.topology_dirty = true;
                store.notify_mutated();
            }
            _ => {}
        }
    }

    // ── Picking ────────────────────────────────────────────────

    fn pick_group(&self, store: &SceneStore, ray: &Ray) -> Option<usize> {
        let mesh = &store.get_entity(&self.entity_id)?.mesh;
        let mut best: Option<(usize, f32)> = None;
        for g in 0..self.weld.group_count() {
            let world_pos = self
                .world
                .transform_point3(self.weld.current_position(mesh, g));
            let dist = ray.distance_to_point(world_pos);
            if dist <= VERTEX_PICK_RADIUS && best.is_none_or(|(_, d)| dist < d) {
                best = Some((g, dist));
            }
        }
        best.map(|(g, _)| g)
    }

    fn pick_edge(&self, store: &SceneStore, ray: &Ray) -> Option<(u32, u32)> {
        let mesh = &store.get_entity(&self.entity_id)?.mesh;
        let mut best: Option<((u32, u32), f32)> = None;
        for tri in 0..mesh.triangle_count() {
            for k in 0..3 {
                let i0 = mesh.indices[tri * 3 + k];
                let i1 = mesh.indices[tri * 3 + (k + 1) % 3];
                let a = self.world.transform_point3(mesh.position(i0 as usize));
                let b = self.world.transform_point3(mesh.position(i1 as usize));
                let dist = picking::ray_segment_distance(ray, a, b);
                if dist <= EDGE_PICK_RADIUS && best.is_none_or(|(_, d)| dist < d) {
                    best = Some(((i0.min(i1), i0.max(i1)), dist));
                }
            }
        }
        best.map(|(e, _)| e)
    }

    fn pick_face(&self, store: &SceneStore, ray: &Ray) -> Option<usize> {
        let mesh = &store.get_entity(&self.entity_id)?.mesh;
        // Transform the ray into local space instead of every triangle out
        let local_ray = Ray {
            origin: self.local.transform_point3(ray.origin),
            direction: self.local.transform_vector3(ray.direction).normalize_or_zero(),
        };
        picking::pick_triangle(&local_ray, mesh).map(|hit| hit.triangle_index)
    }

    // ── Commits ────────────────────────────────────────────────

    /// Extrude the selected faces along their normals. Empty selection is a
    /// logged no-op. Clears the selection and rebuilds weld groups.
    pub fn commit_extrude(&mut self, store: &mut SceneStore, distance: f32) -> bool {
        if self.selection.faces.is_empty() {
            tracing::warn!("extrude: no faces selected");
            return false;
        }
        let faces = self.selection.faces.clone();
        self.commit_with(store, |mesh| ops::extrude_faces(mesh, &faces, distance))
    }

    /// Bevel the selected edges. Empty selection is a logged no-op.
    pub fn commit_bevel(&mut self, store: &mut SceneStore, size: f32, segments: u32) -> bool {
        if self.selection.edges.is_empty() {
            tracing::warn!("bevel: no edges selected");
            return false;
        }
        let edges = self.selection.edges.clone();
        self.commit_with(store, |mesh| ops::bevel_edges(mesh, &edges, size, segments))
    }

    fn commit_with(
        &mut self,
        store: &mut SceneStore,
        rebuild: impl FnOnce(&MeshData) -> MeshData,
    ) -> bool {
        if store.is_locked(&self.entity_id) {
            tracing::warn!("topology edit refused: entity is locked");
            return false;
        }
        let Some(entity) = store.get_entity_mut(&self.entity_id) else {
            return false;
        };
        entity.mesh = rebuild(&entity.mesh);
        entity.topology_dirty = true;
        self.weld = WeldGroups::build(&entity.mesh);
        self.selection.clear();
        self.drag = DragPhase::Idle;
        store.notify_mutated();
        true
    }
}
