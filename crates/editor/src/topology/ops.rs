//! Face extrude and edge bevel
//!
//! Both operations build a fresh buffer per commit rather than resizing the
//! shared one in place; non-selected triangles are copied unchanged.

use std::collections::BTreeSet;

use glam::Vec3;

use crate::mesh::{MeshData, VERTEX_STRIDE};

/// Extrude each selected triangle along its face normal by a signed
/// `distance`: its three vertices are duplicated at the offset, three
/// side-wall triangles connect original to duplicate, and the duplicates
/// form a new cap. Per selected face: +3 vertices, +4 triangles.
pub fn extrude_faces(mesh: &MeshData, faces: &BTreeSet<usize>, distance: f32) -> MeshData {
    let mut out = mesh.clone();

    for &tri in faces {
        if tri >= mesh.triangle_count() {
            continue;
        }
        let normal = mesh.triangle_normal(tri);
        let offset = normal * distance;

        let idx = [
            mesh.indices[tri * 3] as usize,
            mesh.indices[tri * 3 + 1] as usize,
            mesh.indices[tri * 3 + 2] as usize,
        ];

        // Duplicate the three corners at the offset position
        let base = out.vertex_count() as u32;
        for &i in &idx {
            let p = mesh.position(i) + offset;
            let src = i * VERTEX_STRIDE;
            out.vertices
                .extend_from_slice(&mesh.vertices[src..src + VERTEX_STRIDE]);
            let new_index = out.vertex_count() - 1;
            out.set_position(new_index, p);
        }
        let dup = [base, base + 1, base + 2];

        // Three side walls connecting original corners to their duplicates
        out.indices.extend_from_slice(&[
            idx[0] as u32, idx[1] as u32, dup[1],
            idx[1] as u32, idx[2] as u32, dup[2],
            idx[2] as u32, idx[0] as u32, dup[0],
        ]);
        // New cap
        out.indices.extend_from_slice(&[dup[0], dup[1], dup[2]]);
    }

    out.recompute_normals();
    out
}

/// Bevel selected edges (encoded as vertex index pairs): `segments + 1`
/// profile points arc between the endpoints, offset by a perpendicular
/// vector under a sin profile of `size`, stitched to the original endpoints.
///
/// The edge->index-pair encoding is approximate (no half-edge adjacency);
/// edited meshes are low-poly procedural primitives where this holds up.
pub fn bevel_edges(
    mesh: &MeshData,
    edges: &BTreeSet<(u32, u32)>,
    size: f32,
    segments: u32,
) -> MeshData {
    let mut out = mesh.clone();
    let segments = segments.max(1);

    for &(e0, e1) in edges {
        let (i0, i1) = (e0 as usize, e1 as usize);
        if i0 >= mesh.vertex_count() || i1 >= mesh.vertex_count() {
            continue;
        }
        let p0 = mesh.position(i0);
        let p1 = mesh.position(i1);

        let dir = (p1 - p0).normalize_or_zero();
        if dir == Vec3::ZERO {
            continue;
        }
        // Stable perpendicular: prefer the axis least aligned with the edge
        let up = if dir.y.abs() < 0.9 { Vec3::Y } else { Vec3::X };
        let perp = dir.cross(up).cross(dir).normalize_or_zero();

        // Profile points with a sin-based bulge
        let base = out.vertex_count() as u32;
        let color = mesh.color(i0);
        for s in 0..=segments {
            let t = s as f32 / segments as f32;
            let bulge = (std::f32::consts::PI * t).sin() * size;
            let p = p0.lerp(p1, t) + perp * bulge;
            out.vertices.extend_from_slice(&[
                p.x, p.y, p.z, perp.x, perp.y, perp.z, color[0], color[1], color[2],
            ]);
        }

        // Stitch consecutive profile points to the original endpoints
        for s in 0..segments {
            let a = base + s;
            let b = base + s + 1;
            out.indices.extend_from_slice(&[e0, a, b]);
            out.indices.extend_from_slice(&[e1, b, a]);
        }
    }

    out.recompute_normals();
    out
}
