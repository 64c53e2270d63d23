//! Secondary nodes: auxiliary points on boundaries and cell edges.
//!
//! Secondary nodes raise the sampling density of a mesh without changing its
//! primary topology, e.g. for shortest-path traveltime modelling. They live in
//! a separate list on the mesh and are referenced by index from the boundaries
//! and cells they belong to.

use hashbrown::HashMap;

use crate::geometry::{lerp, norm, sub};
use crate::topology::entity::Pos;
use crate::topology::mesh::Mesh;

/// Options for [`Mesh::create_secondary_nodes`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SecondaryNodeOptions {
    /// Secondary nodes per edge (faces get a grid derived from it).
    pub count: usize,
    /// Distance below which cell-edge nodes are merged with an existing one.
    pub tolerance: f64,
}

impl Default for SecondaryNodeOptions {
    fn default() -> Self {
        Self {
            count: 3,
            tolerance: 1e-6,
        }
    }
}

/// Bucket grid for merging coincident secondary nodes.
struct SecondaryGrid {
    tolerance: f64,
    buckets: HashMap<[i64; 3], Vec<usize>>,
}

impl SecondaryGrid {
    fn new(tolerance: f64, existing: &[Pos]) -> Self {
        let mut grid = Self {
            tolerance: tolerance.max(f64::EPSILON),
            buckets: HashMap::new(),
        };
        for (i, &p) in existing.iter().enumerate() {
            grid.insert(p, i);
        }
        grid
    }

    fn key(&self, p: Pos) -> [i64; 3] {
        p.map(|x| (x / self.tolerance).floor() as i64)
    }

    fn insert(&mut self, p: Pos, idx: usize) {
        let key = self.key(p);
        self.buckets.entry(key).or_default().push(idx);
    }

    fn find(&self, p: Pos, nodes: &[Pos]) -> Option<usize> {
        let [kx, ky, kz] = self.key(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.buckets.get(&[kx + dx, ky + dy, kz + dz]) else {
                        continue;
                    };
                    if let Some(&i) = bucket
                        .iter()
                        .find(|&&i| norm(sub(nodes[i], p)) <= self.tolerance)
                    {
                        return Some(i);
                    }
                }
            }
        }
        None
    }
}

/// Secondary positions on a triangle or quadrilateral face.
fn face_positions(pts: &[Pos], n: usize) -> Vec<Pos> {
    let mut out = Vec::new();
    for sx in 0..n {
        if pts.len() == 3 {
            for sy in 0..n - sx {
                let r = (sx + 1) as f64 / (n + 2) as f64;
                let s = (sy + 1) as f64 / (n + 2) as f64;
                let (e1, e2) = (sub(pts[1], pts[0]), sub(pts[2], pts[0]));
                out.push(std::array::from_fn(|k| pts[0][k] + r * e1[k] + s * e2[k]));
            }
        } else {
            for sy in 0..n {
                let r = (sx + 1) as f64 / (n + 1) as f64;
                let s = (sy + 1) as f64 / (n + 1) as f64;
                out.push(std::array::from_fn(|k| {
                    (1.0 - r) * (1.0 - s) * pts[0][k]
                        + r * (1.0 - s) * pts[1][k]
                        + r * s * pts[2][k]
                        + (1.0 - r) * s * pts[3][k]
                }));
            }
        }
    }
    out
}

fn edge_positions(a: Pos, b: Pos, n: usize) -> impl Iterator<Item = Pos> {
    (0..n).map(move |i| lerp(a, b, (i + 1) as f64 / (n + 1) as f64))
}

impl Mesh {
    /// Creates `options.count` equally distributed secondary nodes on the
    /// boundaries (and, in 3D, on the cell edges).
    ///
    /// Does nothing if the boundaries already carry secondary nodes. Returns
    /// the number of secondary nodes added.
    pub fn create_secondary_nodes(&mut self, options: &SecondaryNodeOptions) -> usize {
        if !self.has_neighbor_infos() {
            self.create_neighbor_infos();
        }
        if self
            .boundaries
            .first()
            .is_some_and(|b| !b.secondary_nodes.is_empty())
        {
            log::warn!("Mesh already contains secondary nodes. Not adding any more.");
            return 0;
        }

        let before = self.secondary_node_count();
        let n = options.count;
        match self.dim {
            2 => {
                for bi in 0..self.boundaries.len() {
                    let nodes = &self.boundaries[bi].nodes;
                    let (a, b) = (self.nodes[nodes[0].get()].pos, self.nodes[nodes[1].get()].pos);
                    for pos in edge_positions(a, b, n) {
                        let idx = self.push_secondary_node(pos);
                        self.boundaries[bi].secondary_nodes.push(idx);
                    }
                }
            }
            3 => {
                for bi in 0..self.boundaries.len() {
                    let pts: Vec<Pos> = self.boundaries[bi]
                        .nodes
                        .iter()
                        .map(|n| self.nodes[n.get()].pos)
                        .collect();
                    for pos in face_positions(&pts, n) {
                        let idx = self.push_secondary_node(pos);
                        self.boundaries[bi].secondary_nodes.push(idx);
                    }
                }

                let mut grid = SecondaryGrid::new(options.tolerance, &self.secondary_nodes);
                for ci in 0..self.cells.len() {
                    let cell = &self.cells[ci];
                    if cell.cell_type.edges().is_empty() {
                        log::warn!("cell type unknown: {cell}");
                        continue;
                    }
                    let ends: Vec<(Pos, Pos)> = cell
                        .cell_type
                        .edges()
                        .iter()
                        .map(|&[a, b]| {
                            (
                                self.nodes[cell.nodes[a].get()].pos,
                                self.nodes[cell.nodes[b].get()].pos,
                            )
                        })
                        .collect();
                    for (a, b) in ends {
                        for pos in edge_positions(a, b, n) {
                            let idx = match grid.find(pos, &self.secondary_nodes) {
                                Some(idx) => idx,
                                None => {
                                    let idx = self.push_secondary_node(pos);
                                    grid.insert(pos, idx);
                                    idx
                                }
                            };
                            self.cells[ci].secondary_nodes.push(idx);
                        }
                    }
                }
            }
            _ => log::warn!("Unknown dimension. Don't know what to do."),
        }

        log::info!("Added {} secondary nodes.", self.secondary_node_count());
        self.secondary_node_count() - before
    }

    /// Copy of this mesh with secondary nodes.
    pub fn create_mesh_with_secondary_nodes(&self, options: &SecondaryNodeOptions) -> Mesh {
        let mut mesh = self.clone();
        mesh.create_secondary_nodes(options);
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::meshgen::{StructuredCellType, structured_box_2d, structured_box_3d};

    #[test]
    fn two_d_boundaries_get_equidistant_nodes() {
        let mut mesh =
            structured_box_2d(1, 1, [0.0, 0.0], [4.0, 4.0], StructuredCellType::Triangle).unwrap();
        let added = mesh.create_secondary_nodes(&SecondaryNodeOptions::default());
        assert_eq!(added, 5 * 3);
        let bottom = mesh.find_boundaries_by_marker(3)[0];
        let idx = mesh.boundary(bottom).unwrap().secondary_nodes().to_vec();
        let xs: Vec<f64> = idx.iter().map(|&i| mesh.secondary_nodes()[i][0]).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn second_call_adds_nothing() {
        let mut mesh =
            structured_box_2d(2, 2, [0.0, 0.0], [1.0, 1.0], StructuredCellType::Quadrilateral)
                .unwrap();
        let first = mesh.create_secondary_nodes(&SecondaryNodeOptions::default());
        assert_eq!(first, 12 * 3);
        assert_eq!(mesh.create_secondary_nodes(&SecondaryNodeOptions::default()), 0);
        assert_eq!(mesh.secondary_node_count(), first);
    }

    #[test]
    fn hex_faces_and_shared_edges() {
        let mesh = structured_box_3d(2, 1, 1, [0.0; 3], [2.0, 1.0, 1.0]).unwrap();
        let with = mesh.create_mesh_with_secondary_nodes(&SecondaryNodeOptions::default());
        assert_eq!(mesh.secondary_node_count(), 0);
        // 11 faces * 9 + 20 unique edges * 3
        assert_eq!(with.secondary_node_count(), 99 + 60);
        assert!(with.cells().iter().all(|c| c.secondary_nodes().len() == 36));
    }

    #[test]
    fn tetrahedron_faces_use_triangle_pattern() {
        let mut mesh = Mesh::new(3).unwrap();
        let ids = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ]
        .map(|p| mesh.create_node(p, 0));
        mesh.create_cell(&ids, 0).unwrap();
        let added = mesh.create_secondary_nodes(&SecondaryNodeOptions {
            count: 2,
            ..SecondaryNodeOptions::default()
        });
        // 4 faces * 3 + 6 edges * 2
        assert_eq!(added, 12 + 12);
    }
}
