//! Node displacement and alignment along a curve.

use crate::mesh_error::MeshSeamError;
use crate::topology::mesh::Mesh;

/// A nodal displacement field in one of the accepted layouts.
#[derive(Clone, Debug, PartialEq)]
pub enum Displacement {
    /// Component-major flat vector: all x, then all y (then all z), `dim * N` values.
    Flat(Vec<f64>),
    /// One vector of length `N` per spatial component (`dim` vectors).
    Components(Vec<Vec<f64>>),
    /// One 3-vector per node.
    PerNode(Vec<[f64; 3]>),
}

impl Mesh {
    fn displacement_error(&self, shape: Vec<usize>) -> MeshSeamError {
        MeshSeamError::DisplacementShape {
            shape,
            nodes: self.node_count(),
            dim: self.dim,
        }
    }

    /// Moves every node by `magnify` times its displacement.
    pub fn deform(&mut self, u: &Displacement, magnify: f64) -> Result<(), MeshSeamError> {
        let n = self.node_count();
        let dim = self.dim;
        let per_node: Vec<[f64; 3]> = match u {
            Displacement::Flat(v) => {
                if v.len() != dim * n {
                    return Err(self.displacement_error(vec![v.len()]));
                }
                (0..n)
                    .map(|i| std::array::from_fn(|k| if k < dim { v[k * n + i] } else { 0.0 }))
                    .collect()
            }
            Displacement::Components(c) => {
                if c.len() != dim || c.iter().any(|comp| comp.len() != n) {
                    let inner = c.first().map_or(0, Vec::len);
                    return Err(self.displacement_error(vec![c.len(), inner]));
                }
                (0..n)
                    .map(|i| std::array::from_fn(|k| if k < dim { c[k][i] } else { 0.0 }))
                    .collect()
            }
            Displacement::PerNode(p) => {
                if p.len() != n {
                    return Err(self.displacement_error(vec![p.len(), 3]));
                }
                p.clone()
            }
        };

        for (node, d) in self.nodes.iter_mut().zip(per_node) {
            for k in 0..3 {
                node.pos[k] += magnify * d[k];
            }
        }
        Ok(())
    }

    /// Drapes a 2D profile mesh along a curve given as `(t, x, y)` points.
    ///
    /// Each node's x coordinate is read as the curve parameter `t`; the node
    /// moves to the interpolated curve point and its old y becomes z. Nodes
    /// outside the curve's `t` range are extrapolated from the end segments.
    pub fn align(&mut self, curve: &[[f64; 3]]) -> Result<(), MeshSeamError> {
        if self.dim != 2 {
            return Err(MeshSeamError::UnsupportedDimension {
                dim: self.dim,
                operation: "align",
            });
        }
        if curve.len() < 2 {
            return Err(MeshSeamError::InvalidGeometry(format!(
                "alignment curve needs at least 2 points, got {}",
                curve.len()
            )));
        }
        if let Some(i) = curve.windows(2).position(|w| w[1][0] <= w[0][0]) {
            return Err(MeshSeamError::InvalidGeometry(format!(
                "curve parameter must increase, point {} has t = {} after {}",
                i + 1,
                curve[i + 1][0],
                curve[i][0]
            )));
        }

        for node in &mut self.nodes {
            let t = node.pos[0];
            let seg = curve
                .windows(2)
                .position(|w| t <= w[1][0])
                .unwrap_or(curve.len() - 2);
            let (a, b) = (curve[seg], curve[seg + 1]);
            let s = (t - a[0]) / (b[0] - a[0]);
            node.pos = [
                a[1] + s * (b[1] - a[1]),
                a[2] + s * (b[2] - a[2]),
                node.pos[1],
            ];
        }
        log::debug!("aligned {} nodes along {} curve points", self.node_count(), curve.len());
        Ok(())
    }

    /// Like [`Mesh::align`] for plain `(x, y)` points, parameterised by
    /// cumulative distance from the first point.
    pub fn align_xy(&mut self, points: &[[f64; 2]]) -> Result<(), MeshSeamError> {
        let mut t = 0.0;
        let curve: Vec<[f64; 3]> = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i > 0 {
                    let q = points[i - 1];
                    t += (p[0] - q[0]).hypot(p[1] - q[1]);
                }
                [t, p[0], p[1]]
            })
            .collect();
        self.align(&curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_nodes() -> Mesh {
        let mut mesh = Mesh::new(2).unwrap();
        mesh.create_node([0.0, 0.0, 0.0], 0);
        mesh.create_node([1.0, 0.0, 0.0], 0);
        mesh
    }

    #[test]
    fn flat_layout_is_component_major() {
        let mut mesh = two_nodes();
        mesh.deform(&Displacement::Flat(vec![0.5, 0.25, 1.0, 2.0]), 2.0)
            .unwrap();
        assert_eq!(mesh.nodes()[0].pos, [1.0, 2.0, 0.0]);
        assert_eq!(mesh.nodes()[1].pos, [1.5, 4.0, 0.0]);
    }

    #[test]
    fn components_and_per_node_agree() {
        let mut a = two_nodes();
        let mut b = two_nodes();
        a.deform(&Displacement::Components(vec![vec![1.0, 2.0], vec![3.0, 4.0]]), 1.0)
            .unwrap();
        b.deform(
            &Displacement::PerNode(vec![[1.0, 3.0, 0.0], [2.0, 4.0, 0.0]]),
            1.0,
        )
        .unwrap();
        assert_eq!(a.positions(), b.positions());
    }

    fn profile() -> Mesh {
        let mut mesh = Mesh::new(2).unwrap();
        for p in [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, -1.0, 0.0], [0.0, -1.0, 0.0]] {
            mesh.create_node(p, 0);
        }
        mesh
    }

    #[test]
    fn align_drapes_profile_along_polyline() {
        let mut mesh = profile();
        mesh.align_xy(&[[10.0, 5.0], [10.0, 6.0], [11.0, 6.0]]).unwrap();
        assert_eq!(
            mesh.positions(),
            vec![
                [10.0, 5.0, 0.0],
                [11.0, 6.0, 0.0],
                [11.0, 6.0, -1.0],
                [10.0, 5.0, -1.0],
            ]
        );
    }

    #[test]
    fn align_extrapolates_past_the_curve_ends() {
        let mut mesh = profile();
        mesh.align(&[[0.5, 0.0, 0.0], [1.5, 2.0, 0.0]]).unwrap();
        assert_eq!(mesh.nodes()[0].pos, [-1.0, 0.0, 0.0]);
        assert_eq!(mesh.nodes()[1].pos, [3.0, 0.0, 0.0]);
    }

    #[test]
    fn align_rejects_bad_curves() {
        let mut mesh = profile();
        assert!(matches!(
            mesh.align(&[[0.0, 1.0, 1.0]]),
            Err(MeshSeamError::InvalidGeometry(_))
        ));
        assert!(matches!(
            mesh.align(&[[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            Err(MeshSeamError::InvalidGeometry(_))
        ));
        assert_eq!(mesh.nodes()[1].pos, [2.0, 0.0, 0.0]);

        let mut line = Mesh::new(1).unwrap();
        line.create_node([0.0; 3], 0);
        assert_eq!(
            line.align(&[[0.0; 3], [1.0, 0.0, 0.0]]),
            Err(MeshSeamError::UnsupportedDimension {
                dim: 1,
                operation: "align"
            })
        );
    }

    #[test]
    fn wrong_size_is_rejected() {
        let mut mesh = two_nodes();
        let err = mesh
            .deform(&Displacement::Components(vec![vec![1.0, 2.0]]), 1.0)
            .unwrap_err();
        assert_eq!(
            err,
            MeshSeamError::DisplacementShape {
                shape: vec![1, 2],
                nodes: 2,
                dim: 2
            }
        );
        assert_eq!(mesh.nodes()[1].pos, [1.0, 0.0, 0.0]);
    }
}
