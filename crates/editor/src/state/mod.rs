pub mod presentation;
pub mod scene;
pub mod selection;

pub use presentation::{EditorMode, PresentationPhase, PresentationState};
pub use scene::{entity_display_name, light_display_name, short_id, SceneStore};
pub use selection::SelectionState;

use shared::{SceneBundle, SceneSettings};

use crate::camera::{EditorCamera, ViewController};
use crate::state::scene::PendingImport;

/// Bundle format version written by this build
pub const BUNDLE_VERSION: u32 = 1;

/// Combined editor state: the scene store plus every per-session machine.
/// One instance per editor, passed by reference into each operation.
pub struct EditorState {
    pub scene: SceneStore,
    pub selection: SelectionState,
    pub presentation: PresentationState,
    pub camera: EditorCamera,
    pub views: ViewController,
    pub settings: SceneSettings,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            scene: SceneStore::default(),
            selection: SelectionState::default(),
            presentation: PresentationState::new(),
            camera: EditorCamera::new(),
            views: ViewController::new(),
            settings: SceneSettings::default(),
        }
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every per-frame machine by `dt` seconds. View shortcut
    /// transitions run first; while a slide owns the camera the
    /// presentation machine has the final word on its pose.
    pub fn update(&mut self, dt: f64) {
        self.views.tick(&mut self.camera);
        self.presentation.update(
            &mut self.camera,
            dt,
            self.settings.slide_transition_duration,
        );
        self.selection.prune(&self.scene);
    }

    // ── Bundle conversion ──────────────────────────────────────

    pub fn to_bundle(&self) -> SceneBundle {
        SceneBundle {
            version: BUNDLE_VERSION,
            objects: self.scene.object_records(),
            lights: self.scene.lights.clone(),
            groups: self.scene.groups.clone(),
            settings: self.settings.clone(),
            slides: self.presentation.slides.clone(),
        }
    }

    /// Replace the whole editor state from a bundle. Selection is cleared;
    /// the returned imports must be handed to the asset bridge.
    pub fn apply_bundle(&mut self, bundle: SceneBundle) -> Vec<PendingImport> {
        let pending = self
            .scene
            .apply_records(&bundle.objects, &bundle.groups, &bundle.lights);
        self.settings = bundle.settings;
        self.presentation.set_slides(bundle.slides);
        self.selection.clear();
        pending
    }

    // ── File IO ────────────────────────────────────────────────

    /// Save the scene bundle to an explicit path
    pub fn save_scene(&self, path: &std::path::Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(&self.to_bundle())
            .map_err(|e| format!("serialize scene: {e}"))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| format!("create {parent:?}: {e}"))?;
        }
        std::fs::write(path, json).map_err(|e| format!("write {path:?}: {e}"))?;
        tracing::info!("saved scene to {}", path.display());
        Ok(())
    }

    /// Load a scene bundle from an explicit path
    pub fn load_scene(&mut self, path: &std::path::Path) -> Result<Vec<PendingImport>, String> {
        let json = std::fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
        let bundle: SceneBundle =
            serde_json::from_str(&json).map_err(|e| format!("parse {path:?}: {e}"))?;
        tracing::info!(
            "loaded scene from {} ({} objects, {} slides)",
            path.display(),
            bundle.objects.len(),
            bundle.slides.len()
        );
        Ok(self.apply_bundle(bundle))
    }

    // ── Autosave ───────────────────────────────────────────────

    fn autosave_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "sceneforge", "sceneforge")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Best-effort autosave; failures are ignored, a later explicit save
    /// reports them.
    pub fn autosave(&self) {
        if let Some(path) = Self::autosave_path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(json) = serde_json::to_string_pretty(&self.to_bundle()) {
                let _ = std::fs::write(&path, json);
            }
        }
    }

    pub fn load_autosave() -> Option<SceneBundle> {
        let path = Self::autosave_path()?;
        let json = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&json).ok()
    }
}
