//! Tolerance-based vertex welding
//!
//! Procedural generators emit coincident duplicate vertices (flat-shaded
//! corners, cone apex fans, cap seams). A weld group clusters the buffer
//! indices that coincide within `WELD_TOLERANCE` in object-local space so
//! selection and dragging treat them as one logical vertex.
//!
//! Groups are built with a spatial hash over quantized coordinates; each
//! vertex only probes the 27 neighboring cells, so construction is O(n)
//! expected instead of the naive O(n²) scan.

use std::collections::HashMap;

use glam::Vec3;

use crate::mesh::MeshData;

/// Distance below which two local-space vertices are welded
pub const WELD_TOLERANCE: f32 = 1e-3;

/// Clusters of coincident buffer indices, derived per edit session and
/// never persisted.
#[derive(Debug, Default)]
pub struct WeldGroups {
    /// Member buffer indices per group
    members: Vec<Vec<usize>>,
    /// Representative local position per group (position of first member
    /// at build time)
    representatives: Vec<Vec3>,
    /// Buffer index -> group id
    index_to_group: Vec<usize>,
}

impl WeldGroups {
    /// Scan all buffer positions once and cluster them
    pub fn build(mesh: &MeshData) -> Self {
        let count = mesh.vertex_count();
        let mut members: Vec<Vec<usize>> = Vec::new();
        let mut representatives: Vec<Vec3> = Vec::new();
        let mut index_to_group = vec![usize::MAX; count];

        // Cell size = tolerance; coincident vertices are then at most one
        // cell apart on each axis.
        let cell = |p: Vec3| -> (i64, i64, i64) {
            (
                (p.x / WELD_TOLERANCE).floor() as i64,
                (p.y / WELD_TOLERANCE).floor() as i64,
                (p.z / WELD_TOLERANCE).floor() as i64,
            )
        };

        let mut grid: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();

        for i in 0..count {
            let p = mesh.position(i);
            let (cx, cy, cz) = cell(p);

            let mut found = None;
            'probe: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let Some(groups) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                            continue;
                        };
                        for &g in groups {
                            if (representatives[g] - p).length() <= WELD_TOLERANCE {
                                found = Some(g);
                                break 'probe;
                            }
                        }
                    }
                }
            }

            let g = match found {
                Some(g) => g,
                None => {
                    let g = members.len();
                    members.push(Vec::new());
                    representatives.push(p);
                    grid.entry((cx, cy, cz)).or_default().push(g);
                    g
                }
            };
            members[g].push(i);
            index_to_group[i] = g;
        }

        Self {
            members,
            representatives,
            index_to_group,
        }
    }

    pub fn group_count(&self) -> usize {
        self.members.len()
    }

    pub fn group_of(&self, index: usize) -> usize {
        self.index_to_group[index]
    }

    pub fn members(&self, group: usize) -> &[usize] {
        &self.members[group]
    }

    /// Representative position as of build time; after a drag the live
    /// position must be read from the mesh via any member index.
    pub fn representative(&self, group: usize) -> Vec3 {
        self.representatives[group]
    }

    /// Current position of a group read from the live mesh
    pub fn current_position(&self, mesh: &MeshData, group: usize) -> Vec3 {
        mesh.position(self.members[group][0])
    }

    /// Write one position to every index in the group, keeping coincident
    /// vertices coincident.
    pub fn write_position(&self, mesh: &mut MeshData, group: usize, p: Vec3) {
        for &i in &self.members[group] {
            mesh.set_position(i, p);
        }
    }
}
