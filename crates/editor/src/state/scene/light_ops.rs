//! Light CRUD
//!
//! The light kind determines which fields are semantically active: target is
//! unused for point lights, angle/penumbra apply to spots only.

use shared::{LightKind, LightRecord, ObjectId};

use super::SceneStore;

impl SceneStore {
    /// Add a light with per-kind defaults. Returns the new light id.
    pub fn add_light(&mut self, name: &str, kind: LightKind) -> ObjectId {
        self.save_undo();
        self.redo_stack.clear();

        let id = uuid::Uuid::new_v4().to_string();
        let position = match kind {
            LightKind::Directional => [5.0, 10.0, 5.0],
            LightKind::Point => [0.0, 3.0, 0.0],
            LightKind::Spot => [0.0, 5.0, 0.0],
        };

        self.lights.push(LightRecord {
            id: id.clone(),
            name: name.to_string(),
            kind,
            position,
            target: [0.0, 0.0, 0.0],
            intensity: 1.0,
            color: [1.0, 1.0, 1.0],
            visible: true,
            cast_shadow: matches!(kind, LightKind::Directional | LightKind::Spot),
            distance: 0.0,
            decay: 2.0,
            angle: std::f64::consts::FRAC_PI_3,
            penumbra: 0.0,
        });

        self.version += 1;
        tracing::info!("added {:?} light {}", kind, name);
        id
    }

    pub fn remove_light(&mut self, id: &str) -> bool {
        let Some(pos) = self.lights.iter().position(|l| l.id == id) else {
            return false;
        };
        self.save_undo();
        self.redo_stack.clear();
        self.lights.remove(pos);
        self.version += 1;
        true
    }

    pub fn toggle_light_visibility(&mut self, id: &str) -> bool {
        let Some(light) = self.get_light_mut(id) else {
            return false;
        };
        light.visible = !light.visible;
        self.version += 1;
        true
    }

    /// Apply an edit to a light through a closure, bumping the version
    pub fn update_light(&mut self, id: &str, edit: impl FnOnce(&mut LightRecord)) -> bool {
        let Some(light) = self.get_light_mut(id) else {
            return false;
        };
        edit(light);
        self.version += 1;
        true
    }
}
