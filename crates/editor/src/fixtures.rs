//! Factory functions for creating test data.
//!
//! Convenient helpers to construct `ObjectRecord`, `SlideRecord`,
//! `SceneBundle`, and other record types used in tests.

use shared::*;

// ── Object record factories ─────────────────────────────────────

/// Create an object record with the given geometry and defaults elsewhere.
pub fn object_record(id: &str, name: &str, params: GeometryParamRecord) -> ObjectRecord {
    ObjectRecord {
        id: id.to_string(),
        name: name.to_string(),
        geometry: GeometryRecord::from(params),
        transform: Transform::new(),
        material: MaterialRecord::default(),
        wireframe: None,
        visible: true,
        locked: false,
        group_id: None,
        placeholder: false,
    }
}

/// Create a box object record.
pub fn box_record(id: &str, name: &str, w: f64, h: f64, d: f64) -> ObjectRecord {
    object_record(
        id,
        name,
        GeometryParamRecord::Box {
            width: w,
            height: h,
            depth: d,
        },
    )
}

/// Create a unit box record (1x1x1).
pub fn unit_box_record(id: &str) -> ObjectRecord {
    box_record(id, "Box", 1.0, 1.0, 1.0)
}

/// Create a box record at a specific position.
pub fn box_record_at(id: &str, name: &str, w: f64, h: f64, d: f64, pos: [f64; 3]) -> ObjectRecord {
    let mut record = box_record(id, name, w, h, d);
    record.transform.position = pos;
    record
}

/// Create a cylinder object record.
pub fn cylinder_record(id: &str, name: &str, r: f64, h: f64, segments: u32) -> ObjectRecord {
    object_record(
        id,
        name,
        GeometryParamRecord::Cylinder {
            radius_top: r,
            radius_bottom: r,
            height: h,
            radial_segments: segments,
        },
    )
}

/// Create a sphere object record.
pub fn sphere_record(id: &str, name: &str, r: f64) -> ObjectRecord {
    object_record(
        id,
        name,
        GeometryParamRecord::Sphere {
            radius: r,
            width_segments: 16,
            height_segments: 12,
        },
    )
}

/// Create a cone object record.
pub fn cone_record(id: &str, name: &str, r: f64, h: f64) -> ObjectRecord {
    object_record(
        id,
        name,
        GeometryParamRecord::Cone {
            radius: r,
            height: h,
            radial_segments: 16,
        },
    )
}

/// Attach a raw-buffer override to a record.
pub fn with_raw_buffer(
    mut record: ObjectRecord,
    positions: Vec<f32>,
    index: Option<Vec<u32>>,
) -> ObjectRecord {
    record.geometry.raw_buffer = Some(RawBufferOverride { positions, index });
    record
}

// ── Light and slide factories ───────────────────────────────────

/// Create a point light record.
pub fn point_light(id: &str, position: [f64; 3]) -> LightRecord {
    LightRecord {
        id: id.to_string(),
        name: "Point Light".to_string(),
        kind: LightKind::Point,
        position,
        target: [0.0; 3],
        intensity: 1.0,
        color: [1.0, 1.0, 1.0],
        visible: true,
        cast_shadow: false,
        distance: 0.0,
        decay: 2.0,
        angle: std::f64::consts::FRAC_PI_3,
        penumbra: 0.0,
    }
}

/// Create a slide with a camera pose.
pub fn slide(id: &str, name: &str, position: [f64; 3], target: [f64; 3]) -> SlideRecord {
    SlideRecord {
        id: id.to_string(),
        name: name.to_string(),
        duration: 5.0,
        camera_position: position,
        camera_target: target,
        annotations: Vec::new(),
        terrain_type: None,
    }
}

// ── Bundle factories ────────────────────────────────────────────

/// Wrap object records into a bundle.
pub fn bundle(objects: Vec<ObjectRecord>) -> SceneBundle {
    SceneBundle {
        version: 1,
        objects,
        lights: vec![],
        groups: vec![],
        settings: SceneSettings::default(),
        slides: vec![],
    }
}

/// Empty bundle.
pub fn empty_bundle() -> SceneBundle {
    bundle(vec![])
}

/// Bundle with a single unit box.
pub fn bundle_single_box() -> SceneBundle {
    bundle(vec![unit_box_record("box1")])
}

/// Bundle with one of each primitive.
pub fn bundle_multiple_primitives() -> SceneBundle {
    bundle(vec![
        box_record("b1", "Box", 1.0, 1.0, 1.0),
        cylinder_record("cy1", "Cylinder", 0.5, 2.0, 16),
        sphere_record("sp1", "Sphere", 0.5),
        cone_record("co1", "Cone", 0.5, 1.0),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_box_record_factory() {
        let record = unit_box_record("b1");
        assert_eq!(record.id, "b1");
        assert_eq!(record.name, "Box");
        assert!(record.visible);
        assert!(record.geometry.raw_buffer.is_none());

        match &record.geometry.params {
            GeometryParamRecord::Box {
                width,
                height,
                depth,
            } => {
                assert_eq!(*width, 1.0);
                assert_eq!(*height, 1.0);
                assert_eq!(*depth, 1.0);
            }
            other => panic!("expected box, got {other:?}"),
        }
    }

    #[test]
    fn test_box_record_at_factory() {
        let record = box_record_at("b1", "Box", 2.0, 3.0, 4.0, [1.0, 2.0, 3.0]);
        assert_eq!(record.transform.position, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_with_raw_buffer() {
        let record = with_raw_buffer(unit_box_record("b1"), vec![0.0; 9], None);
        assert!(record.geometry.raw_buffer.is_some());
    }

    #[test]
    fn test_bundle_factories() {
        assert!(empty_bundle().objects.is_empty());
        assert_eq!(bundle_single_box().objects.len(), 1);
        assert_eq!(bundle_multiple_primitives().objects.len(), 4);
    }
}
