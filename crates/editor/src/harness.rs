//! Headless test harness for programmatic scene manipulation.
//!
//! Drives the editor without a renderer: scene mutations, selection,
//! topology edit sessions, slide playback, and bundle round trips all run
//! through the same state types the real frontend uses.

use glam::Vec3;

use shared::{GeometryParamRecord, SceneBundle};

use crate::camera::AxisView;
use crate::picking::{self, Aabb, Ray};
use crate::state::scene::PendingImport;
use crate::state::EditorState;
use crate::topology::{EditMode, EditSession};

/// Frame step used by `run_frames`
const FRAME_DT: f64 = 1.0 / 60.0;

/// Headless harness — owns the full editor state plus an optional edit
/// session for the entity being sculpted.
pub struct EditorHarness {
    pub state: EditorState,
    pub session: Option<EditSession>,
}

impl EditorHarness {
    /// Create a new empty harness.
    pub fn new() -> Self {
        Self {
            state: EditorState::new(),
            session: None,
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Create an object from a parametric descriptor and return its ID
    pub fn create_object(&mut self, name: &str, params: GeometryParamRecord) -> String {
        self.state.scene.add_object(name, params)
    }

    /// Create a box object and return its ID
    pub fn create_box(&mut self, name: &str, w: f64, h: f64, d: f64) -> String {
        self.create_object(
            name,
            GeometryParamRecord::Box {
                width: w,
                height: h,
                depth: d,
            },
        )
    }

    /// Create a cylinder object and return its ID
    pub fn create_cylinder(&mut self, name: &str, r: f64, h: f64) -> String {
        self.create_object(
            name,
            GeometryParamRecord::Cylinder {
                radius_top: r,
                radius_bottom: r,
                height: h,
                radial_segments: 16,
            },
        )
    }

    /// Create a sphere object and return its ID
    pub fn create_sphere(&mut self, name: &str, r: f64) -> String {
        self.create_object(
            name,
            GeometryParamRecord::Sphere {
                radius: r,
                width_segments: 16,
                height_segments: 12,
            },
        )
    }

    /// Create a cone object and return its ID
    pub fn create_cone(&mut self, name: &str, r: f64, h: f64) -> String {
        self.create_object(
            name,
            GeometryParamRecord::Cone {
                radius: r,
                height: h,
                radial_segments: 16,
            },
        )
    }

    /// Delete an object by ID
    pub fn delete(&mut self, id: &str) -> bool {
        self.state.scene.remove_object(id)
    }

    pub fn object_count(&self) -> usize {
        self.state.scene.entities.len()
    }

    pub fn visible_object_count(&self) -> usize {
        self.state.scene.visible_entities().len()
    }

    // ── Bundle IO ─────────────────────────────────────────────

    /// Replace the editor state from a bundle
    pub fn load_bundle(&mut self, bundle: SceneBundle) -> Vec<PendingImport> {
        self.session = None;
        self.state.apply_bundle(bundle)
    }

    /// Load a bundle from a JSON string
    pub fn load_bundle_json(&mut self, json: &str) -> Result<Vec<PendingImport>, String> {
        let bundle: SceneBundle =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        Ok(self.load_bundle(bundle))
    }

    /// Export the current scene as a JSON bundle
    pub fn export_bundle_json(&self) -> String {
        serde_json::to_string_pretty(&self.state.to_bundle()).unwrap_or_default()
    }

    // ── Selection & picking ───────────────────────────────────

    /// Select an object (lock-aware)
    pub fn select(&mut self, id: &str) -> bool {
        self.state.selection.select(&self.state.scene, id.to_string())
    }

    pub fn clear_selection(&mut self) {
        self.state.selection.clear();
    }

    /// Pick the nearest visible object under a world-space ray
    pub fn pick(&self, ray: &Ray) -> Option<String> {
        let aabbs = self
            .state
            .scene
            .visible_entities()
            .iter()
            .map(|e| {
                let offset = Vec3::new(
                    e.transform.position[0] as f32,
                    e.transform.position[1] as f32,
                    e.transform.position[2] as f32,
                );
                (e.id.clone(), Aabb::from_mesh(&e.mesh).translated(offset))
            })
            .collect();
        picking::pick_nearest(ray, &aabbs)
    }

    /// Cast a ray through a viewport pixel
    pub fn screen_ray(&self, pixel: [f32; 2], width: f32, height: f32) -> Ray {
        self.state.camera.screen_ray(pixel, width, height)
    }

    // ── Topology editing ──────────────────────────────────────

    /// Enter an edit mode for an entity. Fails for locked entities.
    pub fn begin_edit(&mut self, id: &str, mode: EditMode) -> bool {
        self.session = EditSession::begin(&self.state.scene, id, mode);
        self.session.is_some()
    }

    /// Leave edit mode, dropping any active drag
    pub fn end_edit(&mut self) {
        if let Some(session) = &mut self.session {
            session.cancel_drag();
        }
        self.session = None;
    }

    // ── Camera & presentation ─────────────────────────────────

    /// Request an axis view shortcut
    pub fn request_view(&mut self, view: AxisView) {
        self.state.views.request_view(&self.state.camera, view);
    }

    /// Run per-frame updates for roughly `seconds` of wall time
    pub fn run_frames(&mut self, seconds: f64) {
        let frames = (seconds / FRAME_DT).ceil() as usize + 1;
        for _ in 0..frames {
            self.state.update(FRAME_DT);
        }
    }

    /// Capture a slide at the current camera pose and return its index
    pub fn capture_slide(&mut self, name: &str) -> usize {
        // Pose tracking normally happens in the frame loop
        self.state.update(FRAME_DT);
        self.state.presentation.capture_slide(name)
    }

    // ── History ───────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.state.scene.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.state.scene.redo()
    }
}

impl Default for EditorHarness {
    fn default() -> Self {
        Self::new()
    }
}
