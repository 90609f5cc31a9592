//! Geometry parameter codec: converts a generated mesh to a tagged,
//! reconstructable record and back.
//!
//! Entities carry their `GeometryParamRecord` descriptor from creation, so
//! encoding never inspects buffers to guess the primitive kind. A raw-buffer
//! override is attached when topology edits have desynchronized the mesh
//! from its parametric description; on decode the override wins.

use shared::{GeometryParamRecord, GeometryRecord, RawBufferOverride, ShapeType};

use crate::mesh::{self, MeshData, PLACEHOLDER_COLOR};

/// Result of reconstructing geometry from a record
pub struct DecodedGeometry {
    pub mesh: MeshData,
    /// True when the mesh is a stand-in rather than a faithful reconstruction
    pub placeholder: bool,
    /// Set for `imported` records: the model path the asset loader must
    /// fetch; the mesh above is a stand-in until the load completes.
    pub pending_import: Option<String>,
}

/// Generate a mesh for a parametric record.
/// Every tag resolves to a mesh; unknown custom shapes and imported models
/// yield a visually distinct stand-in.
pub fn generate(params: &GeometryParamRecord, color: [f32; 3]) -> MeshData {
    match params {
        GeometryParamRecord::Box {
            width,
            height,
            depth,
        } => mesh::cuboid(*width as f32, *height as f32, *depth as f32, color),
        GeometryParamRecord::Sphere {
            radius,
            width_segments,
            height_segments,
        } => mesh::sphere(*radius as f32, *width_segments, *height_segments, color),
        GeometryParamRecord::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        } => mesh::cylinder(
            *radius_top as f32,
            *radius_bottom as f32,
            *height as f32,
            *radial_segments,
            color,
        ),
        GeometryParamRecord::Cone {
            radius,
            height,
            radial_segments,
        } => mesh::cone(*radius as f32, *height as f32, *radial_segments, color),
        GeometryParamRecord::Plane { width, height } => {
            mesh::plane(*width as f32, *height as f32, color)
        }
        GeometryParamRecord::Torus {
            radius,
            tube,
            radial_segments,
            tubular_segments,
        } => mesh::torus(
            *radius as f32,
            *tube as f32,
            *radial_segments,
            *tubular_segments,
            color,
        ),
        GeometryParamRecord::Custom {
            shape_type,
            size,
            depth,
            bounding_box,
            ..
        } => match shape_type {
            ShapeType::Heart => mesh::heart(*size as f32, *depth as f32, color),
            ShapeType::Star => mesh::star(*size as f32, *depth as f32, color),
            ShapeType::Unknown => {
                tracing::warn!("unrecognized custom shape, substituting bounding box");
                mesh::placeholder_box(*bounding_box, PLACEHOLDER_COLOR)
            }
        },
        GeometryParamRecord::Imported { model_path, .. } => {
            tracing::info!("imported geometry {} deferred to asset loader", model_path);
            mesh::placeholder_box(None, PLACEHOLDER_COLOR)
        }
    }
}

/// Encode a mesh into its serialization record.
/// `topology_dirty` marks that free-form edits desynchronized the buffers
/// from the descriptor; the raw snapshot then travels with the tag.
pub fn encode(params: &GeometryParamRecord, mesh: &MeshData, topology_dirty: bool) -> GeometryRecord {
    let raw_buffer = if topology_dirty {
        Some(RawBufferOverride {
            positions: mesh.positions_flat(),
            index: Some(mesh.indices.clone()),
        })
    } else {
        None
    };
    GeometryRecord {
        params: params.clone(),
        raw_buffer,
    }
}

/// Best-effort record for geometry whose descriptor was never captured
/// (defensively kept for collaborator-supplied nodes).
pub fn encode_unknown(mesh: &MeshData) -> GeometryRecord {
    GeometryRecord {
        params: GeometryParamRecord::Custom {
            shape_type: ShapeType::Unknown,
            size: 1.0,
            depth: 0.5,
            vertex_count: Some(mesh.vertex_count() as u32),
            bounding_box: Some(mesh.bounds()),
        },
        raw_buffer: Some(RawBufferOverride {
            positions: mesh.positions_flat(),
            index: Some(mesh.indices.clone()),
        }),
    }
}

/// Reconstruct geometry from a record.
///
/// Precedence: a raw-buffer override reflects post-edit topology and always
/// wins over parametric regeneration; the tag then only seeds metadata.
/// This path never fails — missing fields already defaulted at parse time,
/// and unknown tags degrade to a stand-in.
pub fn decode(record: &GeometryRecord, color: [f32; 3]) -> DecodedGeometry {
    if let Some(raw) = &record.raw_buffer {
        let mesh = MeshData::from_raw(&raw.positions, raw.index.as_deref(), color);
        return DecodedGeometry {
            mesh,
            placeholder: false,
            pending_import: None,
        };
    }

    let pending_import = match &record.params {
        GeometryParamRecord::Imported { model_path, .. } => Some(model_path.clone()),
        _ => None,
    };
    let placeholder = matches!(
        &record.params,
        GeometryParamRecord::Imported { .. }
            | GeometryParamRecord::Custom {
                shape_type: ShapeType::Unknown,
                ..
            }
    );

    DecodedGeometry {
        mesh: generate(&record.params, color),
        placeholder,
        pending_import,
    }
}
