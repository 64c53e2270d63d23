//! Cutting a 2D mesh along an inner boundary path.
//!
//! The path carrying the cut marker is oriented so that every edge runs along
//! the path direction. Cells on the right of the path are detached: each path
//! node that is duplicated gets a copy at the same position, and every right
//! side cell reachable around that node without crossing the cut is moved
//! onto the copy. Finally the copies are joined by new boundaries owned by
//! the detached cells, so the inner boundary becomes two exterior ones.

use std::collections::HashSet;

#[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshSeamError;
use crate::topology::ids::{BoundaryId, CellId, NodeId};
use crate::topology::mesh::Mesh;

/// Options for [`Mesh::cut_boundary`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CutOptions {
    /// Marker of the new boundaries; `None` reuses the cut marker.
    pub boundary_marker: Option<i32>,
    /// Duplicate a path endpoint when it lies on the mesh exterior.
    ///
    /// Endpoints inside the mesh are crack tips and always stay shared.
    pub duplicate_exterior_endpoints: bool,
}

impl Default for CutOptions {
    fn default() -> Self {
        Self {
            boundary_marker: None,
            duplicate_exterior_endpoints: true,
        }
    }
}

/// What a cut added to the mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CutReport {
    /// The cut path in traversal order (closed paths repeat their first node).
    pub path: Vec<NodeId>,
    /// Duplicated nodes, in path order.
    pub new_nodes: Vec<NodeId>,
    /// New boundaries on the detached side, one per path edge.
    pub new_boundaries: Vec<BoundaryId>,
}

/// One path edge after orientation: boundary, whether it must be flipped, and
/// the cell on the right of the path direction.
struct CutEdge {
    boundary: BoundaryId,
    flip: bool,
    right: CellId,
}

impl Mesh {
    /// Cuts the mesh along the single inner path carrying `marker`.
    ///
    /// All preconditions are checked before the first mutation, so on error
    /// the mesh is unchanged.
    ///
    /// # Errors
    /// * [`MeshSeamError::UnsupportedDimension`] for non-2D meshes.
    /// * [`MeshSeamError::NeighborInfosMissing`] without left/right cells.
    /// * [`MeshSeamError::PathNotFound`] / [`MeshSeamError::MultiplePaths`]
    ///   unless exactly one path carries the marker.
    /// * [`MeshSeamError::BranchedPath`] if the marked edges branch.
    /// * [`MeshSeamError::PathNotInterior`] if a path edge lacks a neighbour cell.
    /// * [`MeshSeamError::DegenerateCut`] if no path node can be duplicated.
    pub fn cut_boundary(
        &mut self,
        marker: i32,
        options: &CutOptions,
    ) -> Result<CutReport, MeshSeamError> {
        if self.dim != 2 {
            return Err(MeshSeamError::UnsupportedDimension {
                dim: self.dim,
                operation: "boundary cut",
            });
        }
        if !self.has_neighbor_infos() {
            return Err(MeshSeamError::NeighborInfosMissing);
        }
        let target_marker = options.boundary_marker.unwrap_or(marker);

        let mut paths = self.find_paths_by_marker(marker)?;
        let path = match paths.len() {
            0 => return Err(MeshSeamError::PathNotFound(marker)),
            1 => paths.remove(0),
            count => {
                return Err(MeshSeamError::MultiplePaths {
                    marker,
                    paths: count,
                });
            }
        };

        let mut edges = Vec::with_capacity(path.len() - 1);
        for pair in path.windows(2) {
            let boundary = self
                .find_boundary(pair)
                .ok_or_else(|| MeshSeamError::MissingBoundary(pair.to_vec()))?;
            let b = self.boundary(boundary)?;
            let (Some(left), Some(right)) = (b.left_cell(), b.right_cell()) else {
                return Err(MeshSeamError::PathNotInterior(boundary));
            };
            let flip = b.node(0) != pair[0];
            edges.push(CutEdge {
                boundary,
                flip,
                right: if flip { left } else { right },
            });
        }

        let edge_count = edges.len();
        let closed = path.first() == path.last();
        let mut duplicate = vec![true; edge_count + 1];
        if closed {
            duplicate[edge_count] = false;
        } else {
            duplicate[0] = options.duplicate_exterior_endpoints && self.is_exterior_node(path[0])?;
            duplicate[edge_count] =
                options.duplicate_exterior_endpoints && self.is_exterior_node(path[edge_count])?;
        }
        if edge_count == 1 && !duplicate[0] && !duplicate[1] {
            return Err(MeshSeamError::DegenerateCut(marker));
        }

        // Mutation starts here.
        for edge in &edges {
            if edge.flip {
                self.swap_boundary_orientation(edge.boundary)?;
            }
            self.set_right_cell(edge.boundary, None)?;
        }

        let mut report = CutReport {
            path: path.clone(),
            ..CutReport::default()
        };
        let mut chain: Vec<NodeId> = Vec::with_capacity(path.len());
        for (j, &original) in path.iter().enumerate() {
            if closed && j == edge_count {
                chain.push(chain[0]);
                continue;
            }
            if !duplicate[j] {
                chain.push(original);
                continue;
            }
            let node = self.node(original)?;
            let (pos, node_marker) = (node.pos, node.marker);
            let copy = self.create_node(pos, node_marker);
            let seed = edges[j.min(edge_count - 1)].right;
            self.reassign_node(seed, original, copy, marker)?;
            log::debug!("cut marker {marker}: node {original} duplicated as {copy}");
            chain.push(copy);
            report.new_nodes.push(copy);
        }

        for (i, edge) in edges.iter().enumerate() {
            let b = self.create_boundary(&[chain[i + 1], chain[i]], target_marker)?;
            self.set_left_cell(b, Some(edge.right))?;
            if !self.link_cell_boundary(edge.right, b) {
                log::warn!("cell {} has no face matching new boundary {b}", edge.right);
            }
            log::debug!("cut marker {marker}: boundary {b} owned by cell {}", edge.right);
            report.new_boundaries.push(b);
        }
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        self.debug_assert_invariants();
        Ok(report)
    }

    /// Moves every cell reachable from `seed` around `from` onto `to`.
    ///
    /// Cells are connected through their non-cut boundaries containing
    /// `from`; those boundaries are moved as well. Cells that no longer
    /// contain `from` end the walk.
    fn reassign_node(
        &mut self,
        seed: CellId,
        from: NodeId,
        to: NodeId,
        cut_marker: i32,
    ) -> Result<(), MeshSeamError> {
        let mut visited: HashSet<CellId> = HashSet::new();
        let mut seen_bounds: HashSet<BoundaryId> = HashSet::new();
        let mut cells = Vec::new();
        let mut bounds = Vec::new();
        let mut stack = vec![seed];

        while let Some(c) = stack.pop() {
            if !visited.insert(c) {
                continue;
            }
            let cell = self.cell(c)?;
            if !cell.contains(from) {
                continue;
            }
            cells.push(c);
            for b in cell.boundaries() {
                let bound = &self.boundaries[b.get()];
                if bound.marker == cut_marker || !bound.contains(from) {
                    continue;
                }
                if seen_bounds.insert(b) {
                    bounds.push(b);
                }
                for other in [bound.left_cell(), bound.right_cell()].into_iter().flatten() {
                    if other != c && !visited.contains(&other) {
                        stack.push(other);
                    }
                }
            }
        }

        let swap = |n: &NodeId| if *n == from { to } else { *n };
        for b in bounds {
            let nodes: Vec<NodeId> = self.boundaries[b.get()].nodes().iter().map(swap).collect();
            self.set_boundary_nodes(b, nodes)?;
        }
        for c in cells {
            let nodes: Vec<NodeId> = self.cells[c.get()].nodes().iter().map(swap).collect();
            self.set_cell_nodes(c, nodes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_and_json() {
        let opts = CutOptions::default();
        assert_eq!(opts.boundary_marker, None);
        assert!(opts.duplicate_exterior_endpoints);

        let parsed: CutOptions = serde_json::from_str(r#"{"boundary_marker": 3}"#).unwrap();
        assert_eq!(parsed.boundary_marker, Some(3));
        assert!(parsed.duplicate_exterior_endpoints);
    }
}
