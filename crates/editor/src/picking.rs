use std::collections::HashMap;

use glam::Vec3;
use shared::ObjectId;

use crate::mesh::MeshData;

/// A ray in world space
#[derive(Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Shortest distance from a point to this ray
    pub fn distance_to_point(&self, p: Vec3) -> f32 {
        let to_p = p - self.origin;
        let t = to_p.dot(self.direction).max(0.0);
        (self.origin + self.direction * t - p).length()
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_mesh(mesh: &MeshData) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for i in 0..mesh.vertex_count() {
            let p = mesh.position(i);
            min = min.min(p);
            max = max.max(p);
        }
        if mesh.vertex_count() == 0 {
            min = Vec3::ZERO;
            max = Vec3::ZERO;
        }
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Expand by a world-space offset (for transformed entities)
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Pick the nearest object whose AABB is intersected by the ray.
pub fn pick_nearest(ray: &Ray, aabbs: &HashMap<ObjectId, Aabb>) -> Option<ObjectId> {
    let mut best: Option<(ObjectId, f32)> = None;

    for (id, aabb) in aabbs {
        if let Some(dist) = ray_aabb(ray, aabb) {
            if best.as_ref().is_none_or(|(_, d)| dist < *d) {
                best = Some((id.clone(), dist));
            }
        }
    }

    best.map(|(id, _)| id)
}

/// Möller-Trumbore ray-triangle intersection.
/// Returns the distance along the ray if hit, or None.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Ray-plane intersection; the plane passes through `point` with `normal`.
/// Returns the intersection point, or None when the ray runs parallel.
pub fn ray_plane_intersect(ray: &Ray, point: Vec3, normal: Vec3) -> Option<Vec3> {
    let denom = normal.dot(ray.direction);
    if denom.abs() < 1e-7 {
        return None;
    }
    let t = normal.dot(point - ray.origin) / denom;
    if t < 0.0 {
        return None;
    }
    Some(ray.origin + ray.direction * t)
}

/// Shortest distance between a ray and a segment [a, b]
pub fn ray_segment_distance(ray: &Ray, a: Vec3, b: Vec3) -> f32 {
    let seg = b - a;
    let seg_len = seg.length();
    if seg_len < 1e-7 {
        return ray.distance_to_point(a);
    }
    let seg_dir = seg / seg_len;

    // Closest points between the ray line and the segment line
    let w0 = ray.origin - a;
    let d_dot = ray.direction.dot(seg_dir);
    let denom = 1.0 - d_dot * d_dot;

    let (t_ray, t_seg) = if denom.abs() < 1e-7 {
        // Parallel: clamp to segment start
        (w0.dot(ray.direction).max(0.0), 0.0)
    } else {
        let a1 = ray.direction.dot(w0);
        let b1 = seg_dir.dot(w0);
        let t_seg = ((b1 - a1 * d_dot) / denom).clamp(0.0, seg_len);
        let t_ray = (t_seg * d_dot - a1).max(0.0);
        (t_ray, t_seg)
    };

    let p_ray = ray.origin + ray.direction * t_ray;
    let p_seg = a + seg_dir * t_seg;
    (p_ray - p_seg).length()
}

/// Result of picking a triangle in a mesh
#[derive(Clone, Debug)]
pub struct TriangleHit {
    /// Index of the triangle (into mesh.indices / 3)
    pub triangle_index: usize,
    /// Distance from ray origin to hit point
    pub distance: f32,
    /// Geometric normal of the hit triangle
    pub normal: Vec3,
}

/// Find the nearest triangle in a mesh intersected by the ray.
pub fn pick_triangle(ray: &Ray, mesh: &MeshData) -> Option<TriangleHit> {
    let mut best: Option<TriangleHit> = None;

    for tri in 0..mesh.triangle_count() {
        let [v0, v1, v2] = mesh.triangle(tri);
        if let Some(dist) = ray_triangle_intersect(ray, v0, v1, v2) {
            if best.as_ref().is_none_or(|b| dist < b.distance) {
                best = Some(TriangleHit {
                    triangle_index: tri,
                    distance: dist,
                    normal: mesh.triangle_normal(tri),
                });
            }
        }
    }

    best
}
