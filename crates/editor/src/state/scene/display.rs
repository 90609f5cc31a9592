//! Display helper functions for entities and lights

use shared::{GeometryParamRecord, LightKind, LightRecord};

use super::SceneEntity;

/// Display name for an entity: name plus short id and a kind hint
pub fn entity_display_name(entity: &SceneEntity) -> String {
    let kind = match &entity.descriptor {
        GeometryParamRecord::Box { .. } => "Box",
        GeometryParamRecord::Sphere { .. } => "Sphere",
        GeometryParamRecord::Cylinder { .. } => "Cylinder",
        GeometryParamRecord::Cone { .. } => "Cone",
        GeometryParamRecord::Plane { .. } => "Plane",
        GeometryParamRecord::Torus { .. } => "Torus",
        GeometryParamRecord::Custom { .. } => "Shape",
        GeometryParamRecord::Imported { .. } => "Model",
    };
    if entity.name.is_empty() {
        format!("{} ({})", kind, short_id(&entity.id))
    } else {
        format!("{} ({})", entity.name, short_id(&entity.id))
    }
}

/// Display name for a light
pub fn light_display_name(light: &LightRecord) -> String {
    let kind = match light.kind {
        LightKind::Directional => "Directional",
        LightKind::Point => "Point",
        LightKind::Spot => "Spot",
    };
    if light.name.is_empty() {
        format!("{} light", kind)
    } else {
        light.name.clone()
    }
}

/// Shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    if id.len() > 8 {
        &id[..8]
    } else {
        id
    }
}
