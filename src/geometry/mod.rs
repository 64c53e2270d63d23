//! Geometric queries on mesh entities.

use crate::mesh_error::MeshSeamError;
use crate::topology::entity::Pos;
use crate::topology::ids::{BoundaryId, CellId, NodeId};
use crate::topology::mesh::Mesh;

#[inline]
pub(crate) fn sub(a: Pos, b: Pos) -> Pos {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub(crate) fn norm(a: Pos) -> f64 {
    (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt()
}

/// Point at parameter `t` on the segment `a -> b`.
#[inline]
pub(crate) fn lerp(a: Pos, b: Pos, t: f64) -> Pos {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn centroid(points: impl ExactSizeIterator<Item = Pos>) -> Pos {
    let n = points.len().max(1) as f64;
    let sum = points.fold([0.0; 3], |acc, p| [acc[0] + p[0], acc[1] + p[1], acc[2] + p[2]]);
    [sum[0] / n, sum[1] / n, sum[2] / n]
}

impl Mesh {
    fn pos_of(&self, n: NodeId) -> Pos {
        self.nodes[n.get()].pos
    }

    /// Axis-aligned bounding box `(min, max)` of all nodes.
    ///
    /// An empty mesh yields `([0; 3], [0; 3])`.
    pub fn bounding_box(&self) -> (Pos, Pos) {
        let mut iter = self.nodes.iter().map(|n| n.pos);
        let Some(first) = iter.next() else {
            return ([0.0; 3], [0.0; 3]);
        };
        iter.fold((first, first), |(mut lo, mut hi), p| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(p[axis]);
                hi[axis] = hi[axis].max(p[axis]);
            }
            (lo, hi)
        })
    }

    pub fn boundary_center(&self, id: BoundaryId) -> Result<Pos, MeshSeamError> {
        let b = self.boundary(id)?;
        Ok(centroid(b.nodes().iter().map(|&n| self.pos_of(n))))
    }

    pub fn cell_center(&self, id: CellId) -> Result<Pos, MeshSeamError> {
        let c = self.cell(id)?;
        Ok(centroid(c.nodes().iter().map(|&n| self.pos_of(n))))
    }

    /// Unit normal of a 2D boundary, pointing out of its left cell.
    pub fn boundary_normal(&self, id: BoundaryId) -> Result<Pos, MeshSeamError> {
        if self.dim != 2 {
            return Err(MeshSeamError::UnsupportedDimension {
                dim: self.dim,
                operation: "boundary normal",
            });
        }
        let b = self.boundary(id)?;
        let d = sub(self.pos_of(b.node(1)), self.pos_of(b.node(0)));
        let len = norm(d);
        if len == 0.0 {
            return Err(MeshSeamError::InvalidGeometry(format!(
                "boundary {id} has zero length"
            )));
        }
        Ok([d[1] / len, -d[0] / len, 0.0])
    }

    /// Characteristic size `h` of every cell: its longest edge.
    pub fn cell_sizes(&self) -> Vec<f64> {
        self.cells
            .iter()
            .map(|c| {
                let nodes = c.nodes();
                let mut h: f64 = 0.0;
                for (i, &a) in nodes.iter().enumerate() {
                    for &b in &nodes[i + 1..] {
                        h = h.max(norm(sub(self.pos_of(a), self.pos_of(b))));
                    }
                }
                h
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::algs::meshgen::{StructuredCellType, structured_box_2d};

    #[test]
    fn bounding_box_and_sizes() {
        let mesh =
            structured_box_2d(2, 1, [-1.0, 0.0], [1.0, 2.0], StructuredCellType::Quadrilateral)
                .unwrap();
        let (lo, hi) = mesh.bounding_box();
        assert_eq!(lo, [-1.0, 0.0, 0.0]);
        assert_eq!(hi, [1.0, 2.0, 0.0]);
        let h = mesh.cell_sizes();
        assert_eq!(h.len(), 2);
        assert!((h[0] - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn exterior_normals_point_outwards() {
        let mesh =
            structured_box_2d(3, 3, [0.0, 0.0], [1.0, 1.0], StructuredCellType::Triangle).unwrap();
        for id in mesh.find_boundaries_by_marker(3) {
            let n = mesh.boundary_normal(id).unwrap();
            assert!((n[1] + 1.0).abs() < 1e-12, "bottom normal {n:?}");
        }
        for id in mesh.find_boundaries_by_marker(2) {
            let n = mesh.boundary_normal(id).unwrap();
            assert!((n[0] - 1.0).abs() < 1e-12, "right normal {n:?}");
        }
    }
}
