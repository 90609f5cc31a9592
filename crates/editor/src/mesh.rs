use glam::Vec3;
use shared::BoundingBox;

/// Floats per vertex: position(3) + normal(3) + color(3)
pub const VERTEX_STRIDE: usize = 9;

pub const DEFAULT_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

/// Color of stand-in meshes for failed/unknown reconstructions, visually
/// distinct from the default surface color
pub const PLACEHOLDER_COLOR: [f32; 3] = [0.9, 0.3, 0.6];

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// 9 floats per vertex
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position of vertex `i` in local space
    pub fn position(&self, i: usize) -> Vec3 {
        let base = i * VERTEX_STRIDE;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }

    pub fn set_position(&mut self, i: usize, p: Vec3) {
        let base = i * VERTEX_STRIDE;
        self.vertices[base] = p.x;
        self.vertices[base + 1] = p.y;
        self.vertices[base + 2] = p.z;
    }

    pub fn color(&self, i: usize) -> [f32; 3] {
        let base = i * VERTEX_STRIDE + 6;
        [
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        ]
    }

    pub fn set_color(&mut self, i: usize, c: [f32; 3]) {
        let base = i * VERTEX_STRIDE + 6;
        self.vertices[base] = c[0];
        self.vertices[base + 1] = c[1];
        self.vertices[base + 2] = c[2];
    }

    /// Corner positions of triangle `tri`
    pub fn triangle(&self, tri: usize) -> [Vec3; 3] {
        let i0 = self.indices[tri * 3] as usize;
        let i1 = self.indices[tri * 3 + 1] as usize;
        let i2 = self.indices[tri * 3 + 2] as usize;
        [self.position(i0), self.position(i1), self.position(i2)]
    }

    /// Geometric normal of triangle `tri`
    pub fn triangle_normal(&self, tri: usize) -> Vec3 {
        let [v0, v1, v2] = self.triangle(tri);
        (v1 - v0).cross(v2 - v0).normalize_or_zero()
    }

    /// Recompute flat per-face normals and write them to each corner.
    /// Vertices not referenced by any triangle keep their stored normal.
    pub fn recompute_normals(&mut self) {
        for tri in 0..self.triangle_count() {
            let n = self.triangle_normal(tri);
            for k in 0..3 {
                let base = self.indices[tri * 3 + k] as usize * VERTEX_STRIDE;
                self.vertices[base + 3] = n.x;
                self.vertices[base + 4] = n.y;
                self.vertices[base + 5] = n.z;
            }
        }
    }

    /// Flat xyz positions, 3 floats per vertex (raw-buffer serialization form)
    pub fn positions_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertex_count() * 3);
        for i in 0..self.vertex_count() {
            let p = self.position(i);
            out.extend_from_slice(&[p.x, p.y, p.z]);
        }
        out
    }

    /// Rebuild a mesh from a raw position/index snapshot.
    /// Without an index the positions are taken as a triangle soup.
    /// Triangles referencing vertices outside the position buffer are
    /// dropped with a diagnostic; loading never fails on a bad snapshot.
    pub fn from_raw(positions: &[f32], index: Option<&[u32]>, color: [f32; 3]) -> Self {
        let count = positions.len() / 3;
        let mut vertices = Vec::with_capacity(count * VERTEX_STRIDE);
        for i in 0..count {
            vertices.extend_from_slice(&[
                positions[i * 3],
                positions[i * 3 + 1],
                positions[i * 3 + 2],
                0.0,
                1.0,
                0.0,
                color[0],
                color[1],
                color[2],
            ]);
        }
        let indices = match index {
            Some(idx) => {
                let mut valid = Vec::with_capacity(idx.len());
                let mut dropped = 0;
                for tri in idx.chunks_exact(3) {
                    if tri.iter().all(|&i| (i as usize) < count) {
                        valid.extend_from_slice(tri);
                    } else {
                        dropped += 1;
                    }
                }
                if dropped > 0 {
                    tracing::warn!(
                        "raw snapshot references vertices beyond the position buffer, dropped {} triangle(s)",
                        dropped
                    );
                }
                valid
            }
            None => (0..count as u32).collect(),
        };
        let mut mesh = Self { vertices, indices };
        mesh.recompute_normals();
        mesh
    }

    /// Axis-aligned bounds in local space
    pub fn bounds(&self) -> BoundingBox {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for i in 0..self.vertex_count() {
            let p = self.position(i);
            min = min.min(p);
            max = max.max(p);
        }
        if self.vertex_count() == 0 {
            min = Vec3::ZERO;
            max = Vec3::ZERO;
        }
        BoundingBox {
            min: [min.x as f64, min.y as f64, min.z as f64],
            max: [max.x as f64, max.y as f64, max.z as f64],
        }
    }
}

/// Lines mesh for the edit-mode wireframe overlay:
/// interleaved [pos.x, pos.y, pos.z, r, g, b, a]
#[derive(Clone, Debug, Default)]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

/// Extract unique edges of a mesh as a line list.
/// Edges are deduplicated by quantized endpoint positions so coincident
/// duplicate vertices produce a single line.
pub fn wireframe_lines(mesh: &MeshData, color: [f32; 4]) -> LineMeshData {
    let mut seen = std::collections::HashSet::new();
    let mut vertices = Vec::new();

    let quant = |p: Vec3| -> (i64, i64, i64) {
        (
            (p.x * 1000.0).round() as i64,
            (p.y * 1000.0).round() as i64,
            (p.z * 1000.0).round() as i64,
        )
    };

    for tri in 0..mesh.triangle_count() {
        let corners = mesh.triangle(tri);
        for k in 0..3 {
            let a = corners[k];
            let b = corners[(k + 1) % 3];
            let (qa, qb) = (quant(a), quant(b));
            let key = if qa <= qb { (qa, qb) } else { (qb, qa) };
            if seen.insert(key) {
                vertices.extend_from_slice(&[a.x, a.y, a.z, color[0], color[1], color[2], color[3]]);
                vertices.extend_from_slice(&[b.x, b.y, b.z, color[0], color[1], color[2], color[3]]);
            }
        }
    }

    LineMeshData { vertices }
}

fn push_vert(vertices: &mut Vec<f32>, x: f32, y: f32, z: f32, n: Vec3, color: [f32; 3]) {
    vertices.extend_from_slice(&[x, y, z, n.x, n.y, n.z, color[0], color[1], color[2]]);
}

// ── Primitive generation ─────────────────────────────────────

pub fn cuboid(w: f32, h: f32, d: f32, color: [f32; 3]) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let faces: [([Vec3; 4], Vec3); 6] = [
        // Front (+Z)
        ([Vec3::new(-hw, -hh, hd), Vec3::new(hw, -hh, hd), Vec3::new(hw, hh, hd), Vec3::new(-hw, hh, hd)], Vec3::Z),
        // Back (-Z)
        ([Vec3::new(hw, -hh, -hd), Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, hh, -hd), Vec3::new(hw, hh, -hd)], Vec3::NEG_Z),
        // Right (+X)
        ([Vec3::new(hw, -hh, hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, hh, -hd), Vec3::new(hw, hh, hd)], Vec3::X),
        // Left (-X)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, -hh, hd), Vec3::new(-hw, hh, hd), Vec3::new(-hw, hh, -hd)], Vec3::NEG_X),
        // Top (+Y)
        ([Vec3::new(-hw, hh, hd), Vec3::new(hw, hh, hd), Vec3::new(hw, hh, -hd), Vec3::new(-hw, hh, -hd)], Vec3::Y),
        // Bottom (-Y)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, -hh, hd), Vec3::new(-hw, -hh, hd)], Vec3::NEG_Y),
    ];

    let mut vertices = Vec::with_capacity(24 * VERTEX_STRIDE);
    let mut indices = Vec::with_capacity(36);

    for (quad, normal) in &faces {
        let base = (vertices.len() / VERTEX_STRIDE) as u32;
        for v in quad {
            push_vert(&mut vertices, v.x, v.y, v.z, *normal, color);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

/// Cylinder generalized to a frustum: distinct top/bottom radii cover both
/// straight cylinders and tapered ones. A zero radius collapses that cap.
pub fn cylinder(r_top: f32, r_bottom: f32, height: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let segments = segments.max(3);
    let hh = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for i in 0..segments {
        let a0 = (i as f32) * std::f32::consts::TAU / segments as f32;
        let a1 = ((i + 1) as f32) * std::f32::consts::TAU / segments as f32;

        let (c0, s0) = (a0.cos(), a0.sin());
        let (c1, s1) = (a1.cos(), a1.sin());

        let slope = (r_bottom - r_top) / height.max(1e-6);
        let n0 = Vec3::new(c0, slope, s0).normalize();
        let n1 = Vec3::new(c1, slope, s1).normalize();

        let base = (vertices.len() / VERTEX_STRIDE) as u32;
        push_vert(&mut vertices, r_bottom * c0, -hh, r_bottom * s0, n0, color);
        push_vert(&mut vertices, r_bottom * c1, -hh, r_bottom * s1, n1, color);
        push_vert(&mut vertices, r_top * c1, hh, r_top * s1, n1, color);
        push_vert(&mut vertices, r_top * c0, hh, r_top * s0, n0, color);

        indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    if r_top > 0.0 {
        add_cap(&mut vertices, &mut indices, r_top, hh, segments, Vec3::Y, color, false);
    }
    if r_bottom > 0.0 {
        add_cap(&mut vertices, &mut indices, r_bottom, -hh, segments, Vec3::NEG_Y, color, true);
    }

    MeshData { vertices, indices }
}

/// Cone as a triangle fan: the apex vertex is duplicated per side triangle,
/// which is exactly the coincident-vertex artifact the weld groups absorb.
pub fn cone(radius: f32, height: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let segments = segments.max(3);
    let hh = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for i in 0..segments {
        let a0 = (i as f32) * std::f32::consts::TAU / segments as f32;
        let a1 = ((i + 1) as f32) * std::f32::consts::TAU / segments as f32;

        let (c0, s0) = (a0.cos(), a0.sin());
        let (c1, s1) = (a1.cos(), a1.sin());

        let slope = radius / height.max(1e-6);
        let n0 = Vec3::new(c0, slope, s0).normalize();
        let n1 = Vec3::new(c1, slope, s1).normalize();
        let n_apex = ((n0 + n1) * 0.5).normalize();

        let base = (vertices.len() / VERTEX_STRIDE) as u32;
        push_vert(&mut vertices, radius * c0, -hh, radius * s0, n0, color);
        push_vert(&mut vertices, radius * c1, -hh, radius * s1, n1, color);
        push_vert(&mut vertices, 0.0, hh, 0.0, n_apex, color);

        indices.extend_from_slice(&[base, base + 2, base + 1]);
    }

    add_cap(&mut vertices, &mut indices, radius, -hh, segments, Vec3::NEG_Y, color, true);

    MeshData { vertices, indices }
}

pub fn sphere(radius: f32, sectors: u32, rings: u32, color: [f32; 3]) -> MeshData {
    // Degenerate segment counts in legacy records would divide by zero
    let sectors = sectors.max(3);
    let rings = rings.max(2);
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for r in 0..=rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        let (sp, cp) = (phi.sin(), phi.cos());

        for s in 0..=sectors {
            let theta = std::f32::consts::TAU * s as f32 / sectors as f32;
            let (st, ct) = (theta.sin(), theta.cos());

            let n = Vec3::new(sp * ct, cp, sp * st);
            push_vert(&mut vertices, radius * n.x, radius * n.y, radius * n.z, n, color);
        }
    }

    let row = sectors + 1;
    for r in 0..rings {
        for s in 0..sectors {
            let i0 = r * row + s;
            let i1 = i0 + 1;
            let i2 = i0 + row;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i1, i2, i1, i3, i2]);
        }
    }

    MeshData { vertices, indices }
}

pub fn plane(w: f32, h: f32, color: [f32; 3]) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let mut vertices = Vec::new();
    push_vert(&mut vertices, -hw, 0.0, -hh, Vec3::Y, color);
    push_vert(&mut vertices, hw, 0.0, -hh, Vec3::Y, color);
    push_vert(&mut vertices, hw, 0.0, hh, Vec3::Y, color);
    push_vert(&mut vertices, -hw, 0.0, hh, Vec3::Y, color);
    MeshData {
        vertices,
        indices: vec![0, 2, 1, 0, 3, 2],
    }
}

pub fn torus(radius: f32, tube: f32, radial: u32, tubular: u32, color: [f32; 3]) -> MeshData {
    let radial = radial.max(3);
    let tubular = tubular.max(3);
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for i in 0..=radial {
        let u = std::f32::consts::TAU * i as f32 / radial as f32;
        let (cu, su) = (u.cos(), u.sin());
        let ring_center = Vec3::new(radius * cu, 0.0, radius * su);

        for j in 0..=tubular {
            let v = std::f32::consts::TAU * j as f32 / tubular as f32;
            let (cv, sv) = (v.cos(), v.sin());

            let n = Vec3::new(cu * cv, sv, su * cv);
            let p = ring_center + n * tube;
            push_vert(&mut vertices, p.x, p.y, p.z, n, color);
        }
    }

    let row = tubular + 1;
    for i in 0..radial {
        for j in 0..tubular {
            let i0 = i * row + j;
            let i1 = i0 + 1;
            let i2 = i0 + row;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }

    MeshData { vertices, indices }
}

fn add_cap(
    vertices: &mut Vec<f32>,
    indices: &mut Vec<u32>,
    radius: f32,
    y: f32,
    segments: u32,
    normal: Vec3,
    color: [f32; 3],
    reversed: bool,
) {
    let center = (vertices.len() / VERTEX_STRIDE) as u32;
    push_vert(vertices, 0.0, y, 0.0, normal, color);

    for i in 0..=segments {
        let a = (i as f32) * std::f32::consts::TAU / segments as f32;
        push_vert(vertices, radius * a.cos(), y, radius * a.sin(), normal, color);
    }

    for i in 0..segments {
        let r0 = center + 1 + i;
        let r1 = center + 2 + i;
        if reversed {
            indices.extend_from_slice(&[center, r0, r1]);
        } else {
            indices.extend_from_slice(&[center, r1, r0]);
        }
    }
}

// ── Outline shapes (extruded 2D profiles) ────────────────────

/// Heart curve sampled in the XY plane, scaled so `size` is the overall width
fn heart_outline(size: f32) -> Vec<[f32; 2]> {
    let n = 48;
    let scale = size / 32.0;
    (0..n)
        .map(|i| {
            let t = std::f32::consts::TAU * i as f32 / n as f32;
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            [x * scale, y * scale]
        })
        .collect()
}

/// Five-point star, outer radius `size`, inner radius `size * 0.4`
fn star_outline(size: f32) -> Vec<[f32; 2]> {
    let points = 5;
    let inner = size * 0.4;
    (0..points * 2)
        .map(|i| {
            let a = std::f32::consts::PI * i as f32 / points as f32 - std::f32::consts::FRAC_PI_2;
            let r = if i % 2 == 0 { size } else { inner };
            [r * a.cos(), -r * a.sin()]
        })
        .collect()
}

/// Extrude a closed 2D outline along +Z into a solid: fan-triangulated caps
/// plus side walls, one flat-shaded quad per outline segment.
fn extrude_outline(outline: &[[f32; 2]], depth: f32, color: [f32; 3]) -> MeshData {
    let n = outline.len();
    let hz = depth * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let back: Vec<Vec3> = outline.iter().map(|p| Vec3::new(p[0], p[1], -hz)).collect();
    let front: Vec<Vec3> = outline.iter().map(|p| Vec3::new(p[0], p[1], hz)).collect();

    // Back cap
    let base = (vertices.len() / VERTEX_STRIDE) as u32;
    for p in &back {
        push_vert(&mut vertices, p.x, p.y, p.z, Vec3::NEG_Z, color);
    }
    for i in 1..(n - 1) {
        indices.extend_from_slice(&[base, base + i as u32, base + (i + 1) as u32]);
    }

    // Front cap
    let base = (vertices.len() / VERTEX_STRIDE) as u32;
    for p in &front {
        push_vert(&mut vertices, p.x, p.y, p.z, Vec3::Z, color);
    }
    for i in 1..(n - 1) {
        indices.extend_from_slice(&[base, base + (i + 1) as u32, base + i as u32]);
    }

    // Side walls
    for i in 0..n {
        let next = (i + 1) % n;
        let b0 = back[i];
        let b1 = back[next];
        let f0 = front[i];
        let f1 = front[next];

        let normal = (b1 - b0).cross(f0 - b0).normalize_or_zero();

        let base = (vertices.len() / VERTEX_STRIDE) as u32;
        push_vert(&mut vertices, b0.x, b0.y, b0.z, normal, color);
        push_vert(&mut vertices, b1.x, b1.y, b1.z, normal, color);
        push_vert(&mut vertices, f1.x, f1.y, f1.z, normal, color);
        push_vert(&mut vertices, f0.x, f0.y, f0.z, normal, color);
        indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    MeshData { vertices, indices }
}

pub fn heart(size: f32, depth: f32, color: [f32; 3]) -> MeshData {
    extrude_outline(&heart_outline(size), depth, color)
}

pub fn star(size: f32, depth: f32, color: [f32; 3]) -> MeshData {
    extrude_outline(&star_outline(size), depth, color)
}

/// Bounding-box stand-in for unrecognized legacy records
pub fn placeholder_box(bounds: Option<BoundingBox>, color: [f32; 3]) -> MeshData {
    let (w, h, d) = match bounds {
        Some(b) => (
            (b.max[0] - b.min[0]).abs().max(0.1) as f32,
            (b.max[1] - b.min[1]).abs().max(0.1) as f32,
            (b.max[2] - b.min[2]).abs().max(0.1) as f32,
        ),
        None => (1.0, 1.0, 1.0),
    };
    cuboid(w, h, d, color)
}
