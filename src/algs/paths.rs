//! Path finding over marked boundary edges.
//!
//! The edges are loaded into an adjacency arena (node → remaining incident
//! edges). Open chains are walked first from every degree-1 node, then the
//! remaining closed loops from every degree-2 node; each visited edge is
//! removed from both of its endpoints, so every edge ends up in exactly one
//! path and the arena is empty afterwards.

use std::collections::BTreeMap;

use crate::mesh_error::MeshSeamError;
use crate::topology::ids::{BoundaryId, NodeId};
use crate::topology::mesh::Mesh;

/// Remaining incident edges per node, as `(neighbour, edge)` pairs.
#[derive(Debug, Default)]
struct EdgeArena {
    adjacency: BTreeMap<NodeId, Vec<(NodeId, BoundaryId)>>,
}

impl EdgeArena {
    fn insert(&mut self, a: NodeId, b: NodeId, edge: BoundaryId) {
        self.adjacency.entry(a).or_default().push((b, edge));
        self.adjacency.entry(b).or_default().push((a, edge));
    }

    fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(&node).map_or(0, Vec::len)
    }

    /// Nodes with exactly `degree` remaining edges, ascending.
    fn nodes_with_degree(&self, degree: usize) -> Vec<NodeId> {
        self.adjacency
            .iter()
            .filter(|(_, edges)| edges.len() == degree)
            .map(|(&n, _)| n)
            .collect()
    }

    /// Removes the edge towards the smallest neighbour of `node`.
    fn take_next(&mut self, node: NodeId) -> Option<NodeId> {
        let edges = self.adjacency.get_mut(&node)?;
        let (i, &(next, edge)) = edges.iter().enumerate().min_by_key(|(_, (n, _))| *n)?;
        edges.swap_remove(i);
        if edges.is_empty() {
            self.adjacency.remove(&node);
        }
        if let Some(back) = self.adjacency.get_mut(&next) {
            if let Some(j) = back.iter().position(|&(n, e)| n == node && e == edge) {
                back.swap_remove(j);
            }
            if back.is_empty() {
                self.adjacency.remove(&next);
            }
        }
        Some(next)
    }

    /// Walks from `start` while the current node has exactly one remaining edge.
    ///
    /// The first step is taken regardless of the start degree so loops can be
    /// entered from a degree-2 node.
    fn walk(&mut self, start: NodeId) -> Vec<NodeId> {
        let mut path = vec![start];
        let mut current = start;
        while let Some(next) = self.take_next(current) {
            path.push(next);
            current = next;
            if self.degree(current) != 1 {
                break;
            }
        }
        path
    }

    fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

impl Mesh {
    /// Finds the connected paths formed by the given boundary edges.
    ///
    /// Returns one node sequence per connected component: open chains first
    /// (started at their smaller endpoint id, in ascending order), then closed
    /// loops, which repeat their first node at the end. A chain of `N` edges
    /// yields `N + 1` node ids in both cases.
    ///
    /// # Errors
    /// * [`MeshSeamError::NotAnEdge`] if a boundary does not have two nodes.
    /// * [`MeshSeamError::BranchedPath`] if three or more of the edges meet at a node.
    pub fn find_paths(&self, bounds: &[BoundaryId]) -> Result<Vec<Vec<NodeId>>, MeshSeamError> {
        let mut arena = EdgeArena::default();
        for &id in bounds {
            let b = self.boundary(id)?;
            if b.nodes().len() != 2 {
                return Err(MeshSeamError::NotAnEdge {
                    boundary: id,
                    nodes: b.nodes().len(),
                });
            }
            arena.insert(b.node(0), b.node(1), id);
        }

        if let Some((&node, edges)) = arena.adjacency.iter().find(|(_, e)| e.len() > 2) {
            return Err(MeshSeamError::BranchedPath {
                node,
                degree: edges.len(),
            });
        }

        let mut paths = Vec::new();
        for start in arena.nodes_with_degree(1) {
            if arena.degree(start) == 1 {
                paths.push(arena.walk(start));
            }
        }
        for start in arena.nodes_with_degree(2) {
            if arena.degree(start) == 2 {
                paths.push(arena.walk(start));
            }
        }
        debug_assert!(arena.is_empty(), "unvisited edges after path search");
        Ok(paths)
    }

    /// Finds the paths formed by all boundaries carrying `marker`.
    pub fn find_paths_by_marker(&self, marker: i32) -> Result<Vec<Vec<NodeId>>, MeshSeamError> {
        self.find_paths(&self.find_boundaries_by_marker(marker))
    }
}
