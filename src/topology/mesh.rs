//! The mesh store: nodes, boundaries, cells and their adjacency.
//!
//! Boundaries are registered in a lookup index keyed by their sorted node set,
//! and every node keeps the set of boundaries that reference it. Both are
//! maintained by the mutating methods of [`Mesh`], so code outside this module
//! changes connectivity only through them.

use std::fmt;

use hashbrown::HashMap;
use itertools::Itertools;

use crate::data::DataMap;
use crate::mesh_error::MeshSeamError;
use crate::topology::cell_type::{CellType, is_boundary_shape};
use crate::topology::entity::{Boundary, Cell, Node, Pos};
use crate::topology::ids::{BoundaryId, CellId, NodeId};

/// Unstructured mesh of dimension 1, 2 or 3.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub(crate) dim: usize,
    pub(crate) nodes: Vec<Node>,
    pub(crate) boundaries: Vec<Boundary>,
    pub(crate) cells: Vec<Cell>,
    pub(crate) secondary_nodes: Vec<Pos>,
    pub(crate) data: DataMap,
    boundary_index: HashMap<Vec<NodeId>, BoundaryId>,
    node_boundaries: Vec<Vec<BoundaryId>>,
    neighbors_ready: bool,
}

fn index_key(nodes: &[NodeId]) -> Vec<NodeId> {
    nodes.iter().copied().sorted_unstable().collect()
}

/// `true` when `face` runs in the same cyclic direction as `nodes`.
fn same_orientation(nodes: &[NodeId], face: &[NodeId]) -> bool {
    match nodes.len() {
        0 | 1 => true,
        2 => nodes[0] == face[0],
        len => nodes
            .iter()
            .position(|&n| n == face[0])
            .is_some_and(|i| nodes[(i + 1) % len] == face[1]),
    }
}

impl Mesh {
    /// Creates an empty mesh of dimension `dim`.
    pub fn new(dim: usize) -> Result<Self, MeshSeamError> {
        if !(1..=3).contains(&dim) {
            return Err(MeshSeamError::UnsupportedDimension {
                dim,
                operation: "mesh construction",
            });
        }
        Ok(Self {
            dim,
            nodes: Vec::new(),
            boundaries: Vec::new(),
            cells: Vec::new(),
            secondary_nodes: Vec::new(),
            data: DataMap::default(),
            boundary_index: HashMap::new(),
            node_boundaries: Vec::new(),
            neighbors_ready: false,
        })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn secondary_node_count(&self) -> usize {
        self.secondary_nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn secondary_nodes(&self) -> &[Pos] {
        &self.secondary_nodes
    }

    /// Node positions in id order.
    pub fn positions(&self) -> Vec<Pos> {
        self.nodes.iter().map(|n| n.pos).collect()
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, MeshSeamError> {
        self.nodes
            .get(id.get())
            .ok_or(MeshSeamError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, MeshSeamError> {
        self.nodes
            .get_mut(id.get())
            .ok_or(MeshSeamError::UnknownNode(id))
    }

    pub fn boundary(&self, id: BoundaryId) -> Result<&Boundary, MeshSeamError> {
        self.boundaries
            .get(id.get())
            .ok_or(MeshSeamError::UnknownBoundary(id))
    }

    pub fn cell(&self, id: CellId) -> Result<&Cell, MeshSeamError> {
        self.cells.get(id.get()).ok_or(MeshSeamError::UnknownCell(id))
    }

    fn check_nodes(&self, nodes: &[NodeId]) -> Result<(), MeshSeamError> {
        match nodes.iter().find(|n| n.get() >= self.nodes.len()) {
            Some(&n) => Err(MeshSeamError::UnknownNode(n)),
            None => Ok(()),
        }
    }

    fn check_cell(&self, cell: Option<CellId>) -> Result<(), MeshSeamError> {
        match cell {
            Some(c) if c.get() >= self.cells.len() => Err(MeshSeamError::UnknownCell(c)),
            _ => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Appends a node and returns its id.
    pub fn create_node(&mut self, pos: Pos, marker: i32) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node { pos, marker });
        self.node_boundaries.push(Vec::new());
        id
    }

    /// Appends a boundary over `nodes`.
    ///
    /// Fails if a boundary over the same node set already exists.
    pub fn create_boundary(
        &mut self,
        nodes: &[NodeId],
        marker: i32,
    ) -> Result<BoundaryId, MeshSeamError> {
        if !is_boundary_shape(self.dim, nodes.len()) {
            return Err(MeshSeamError::InvalidShape {
                entity: "boundary",
                nodes: nodes.len(),
                dim: self.dim,
            });
        }
        self.check_nodes(nodes)?;
        if let Some(existing) = self.find_boundary(nodes) {
            return Err(MeshSeamError::DuplicateBoundary {
                nodes: nodes.to_vec(),
                existing,
            });
        }
        Ok(self.push_boundary(nodes.to_vec(), marker))
    }

    fn push_boundary(&mut self, nodes: Vec<NodeId>, marker: i32) -> BoundaryId {
        let id = BoundaryId::new(self.boundaries.len());
        self.boundary_index.insert(index_key(&nodes), id);
        for n in &nodes {
            self.node_boundaries[n.get()].push(id);
        }
        self.boundaries.push(Boundary::new(nodes, marker));
        id
    }

    /// Appends a cell; its shape is inferred from the node count.
    ///
    /// Invalidates neighbour infos.
    pub fn create_cell(&mut self, nodes: &[NodeId], marker: i32) -> Result<CellId, MeshSeamError> {
        let cell_type =
            CellType::infer(self.dim, nodes.len()).ok_or(MeshSeamError::InvalidShape {
                entity: "cell",
                nodes: nodes.len(),
                dim: self.dim,
            })?;
        self.check_nodes(nodes)?;
        let id = CellId::new(self.cells.len());
        self.cells.push(Cell::new(nodes.to_vec(), marker, cell_type));
        self.neighbors_ready = false;
        Ok(id)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns the boundary spanning exactly the given node set, in any order.
    pub fn find_boundary(&self, nodes: &[NodeId]) -> Option<BoundaryId> {
        self.boundary_index.get(&index_key(nodes)).copied()
    }

    /// Returns all boundaries carrying `marker`, in id order.
    pub fn find_boundaries_by_marker(&self, marker: i32) -> Vec<BoundaryId> {
        self.boundaries
            .iter()
            .enumerate()
            .filter(|(_, b)| b.marker == marker)
            .map(|(i, _)| BoundaryId::new(i))
            .collect()
    }

    /// Boundaries that reference `node`.
    pub fn boundaries_of_node(&self, node: NodeId) -> Result<&[BoundaryId], MeshSeamError> {
        self.node_boundaries
            .get(node.get())
            .map(Vec::as_slice)
            .ok_or(MeshSeamError::UnknownNode(node))
    }

    /// `true` when `node` touches a boundary on the mesh exterior.
    pub fn is_exterior_node(&self, node: NodeId) -> Result<bool, MeshSeamError> {
        Ok(self
            .boundaries_of_node(node)?
            .iter()
            .any(|b| self.boundaries[b.get()].is_outside()))
    }

    /// Whether left/right cells and cell boundary slots are up to date.
    #[inline]
    pub fn has_neighbor_infos(&self) -> bool {
        self.neighbors_ready
    }

    pub fn cell_markers(&self) -> Vec<i32> {
        self.cells.iter().map(|c| c.marker).collect()
    }

    pub fn set_cell_markers(&mut self, markers: &[i32]) -> Result<(), MeshSeamError> {
        if markers.len() != self.cells.len() {
            return Err(MeshSeamError::DataSizeMismatch {
                key: "cell markers".into(),
                len: markers.len(),
                nodes: self.nodes.len(),
                cells: self.cells.len(),
                boundaries: self.boundaries.len(),
            });
        }
        for (cell, &m) in self.cells.iter_mut().zip(markers) {
            cell.marker = m;
        }
        Ok(())
    }

    pub fn boundary_markers(&self) -> Vec<i32> {
        self.boundaries.iter().map(|b| b.marker).collect()
    }

    pub fn set_boundary_marker(&mut self, id: BoundaryId, marker: i32) -> Result<(), MeshSeamError> {
        self.boundaries
            .get_mut(id.get())
            .ok_or(MeshSeamError::UnknownBoundary(id))?
            .marker = marker;
        Ok(())
    }

    pub(crate) fn signed_area(&self, nodes: &[NodeId]) -> f64 {
        let twice: f64 = nodes
            .iter()
            .circular_tuple_windows()
            .map(|(a, b)| {
                let pa = self.nodes[a.get()].pos;
                let pb = self.nodes[b.get()].pos;
                pa[0] * pb[1] - pb[0] * pa[1]
            })
            .sum();
        0.5 * twice
    }

    // -------------------------------------------------------------------------
    // Neighbour infos
    // -------------------------------------------------------------------------

    /// Creates the missing boundaries of all cell faces (marker 0), fills the
    /// cell boundary slots and assigns left/right cells.
    ///
    /// In 2D the left cell of a boundary `(a, b)` lies on the left of `a -> b`;
    /// clockwise cells are treated as their counter-clockwise counterpart.
    /// Boundaries bordering a single cell end up with that cell on the left.
    pub fn create_neighbor_infos(&mut self) {
        for b in &mut self.boundaries {
            b.left = None;
            b.right = None;
        }
        for cell_idx in 0..self.cells.len() {
            let cell_id = CellId::new(cell_idx);
            let reversed = self.dim == 2 && self.signed_area(&self.cells[cell_idx].nodes) < 0.0;
            let face_count = self.cells[cell_idx].cell_type.faces().len();
            for slot in 0..face_count {
                let mut face = self.cells[cell_idx].face_nodes(slot);
                if reversed {
                    face.reverse();
                }
                let b = match self.find_boundary(&face) {
                    Some(b) => b,
                    None => self.push_boundary(face.clone(), 0),
                };
                self.cells[cell_idx].boundaries[slot] = Some(b);

                let bound = &mut self.boundaries[b.get()];
                let (own, other) = if same_orientation(&bound.nodes, &face) {
                    (&mut bound.left, &mut bound.right)
                } else {
                    (&mut bound.right, &mut bound.left)
                };
                if own.is_none() {
                    *own = Some(cell_id);
                } else if other.is_none() {
                    *other = Some(cell_id);
                } else {
                    log::warn!("boundary {b} borders more than two cells; ignoring cell {cell_id}");
                }
            }
        }
        for b in &mut self.boundaries {
            if b.left.is_none() && b.right.is_some() {
                b.nodes.reverse();
                std::mem::swap(&mut b.left, &mut b.right);
            }
        }
        self.neighbors_ready = true;
    }

    // -------------------------------------------------------------------------
    // Connectivity mutation
    // -------------------------------------------------------------------------

    /// Replaces the nodes of a boundary, keeping the lookup index in sync.
    pub fn set_boundary_nodes(
        &mut self,
        id: BoundaryId,
        nodes: Vec<NodeId>,
    ) -> Result<(), MeshSeamError> {
        let old = self.boundary(id)?.nodes.clone();
        if old.len() != nodes.len() {
            return Err(MeshSeamError::InvalidShape {
                entity: "boundary",
                nodes: nodes.len(),
                dim: self.dim,
            });
        }
        self.check_nodes(&nodes)?;
        let new_key = index_key(&nodes);
        if let Some(&existing) = self.boundary_index.get(&new_key) {
            if existing != id {
                return Err(MeshSeamError::DuplicateBoundary { nodes, existing });
            }
        }
        self.boundary_index.remove(&index_key(&old));
        self.boundary_index.insert(new_key, id);
        for n in &old {
            self.node_boundaries[n.get()].retain(|&b| b != id);
        }
        for n in &nodes {
            self.node_boundaries[n.get()].push(id);
        }
        self.boundaries[id.get()].nodes = nodes;
        Ok(())
    }

    /// Replaces the nodes of a cell; the cell keeps its shape and boundary slots.
    pub fn set_cell_nodes(&mut self, id: CellId, nodes: Vec<NodeId>) -> Result<(), MeshSeamError> {
        let expected = self.cell(id)?.nodes.len();
        if expected != nodes.len() {
            return Err(MeshSeamError::InvalidShape {
                entity: "cell",
                nodes: nodes.len(),
                dim: self.dim,
            });
        }
        self.check_nodes(&nodes)?;
        self.cells[id.get()].nodes = nodes;
        Ok(())
    }

    pub fn set_left_cell(
        &mut self,
        id: BoundaryId,
        cell: Option<CellId>,
    ) -> Result<(), MeshSeamError> {
        self.check_cell(cell)?;
        self.boundaries
            .get_mut(id.get())
            .ok_or(MeshSeamError::UnknownBoundary(id))?
            .left = cell;
        Ok(())
    }

    pub fn set_right_cell(
        &mut self,
        id: BoundaryId,
        cell: Option<CellId>,
    ) -> Result<(), MeshSeamError> {
        self.check_cell(cell)?;
        self.boundaries
            .get_mut(id.get())
            .ok_or(MeshSeamError::UnknownBoundary(id))?
            .right = cell;
        Ok(())
    }

    /// Reverses the node order of a boundary and swaps its left and right cells.
    pub fn swap_boundary_orientation(&mut self, id: BoundaryId) -> Result<(), MeshSeamError> {
        let b = self
            .boundaries
            .get_mut(id.get())
            .ok_or(MeshSeamError::UnknownBoundary(id))?;
        b.nodes.reverse();
        std::mem::swap(&mut b.left, &mut b.right);
        Ok(())
    }

    /// Points the face slot of `cell` spanning the nodes of `boundary` at it.
    pub(crate) fn link_cell_boundary(&mut self, cell: CellId, boundary: BoundaryId) -> bool {
        let key = index_key(&self.boundaries[boundary.get()].nodes);
        let c = &mut self.cells[cell.get()];
        let faces = c.cell_type.faces().len();
        for slot in 0..faces {
            if index_key(&c.face_nodes(slot)) == key {
                c.boundaries[slot] = Some(boundary);
                return true;
            }
        }
        false
    }

    pub(crate) fn push_secondary_node(&mut self, pos: Pos) -> usize {
        self.secondary_nodes.push(pos);
        self.secondary_nodes.len() - 1
    }

    pub(crate) fn boundary_index_len(&self) -> usize {
        self.boundary_index.len()
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mesh: Nodes: {} Cells: {} Boundaries: {}",
            self.node_count(),
            self.cell_count(),
            self.boundary_count()
        )?;
        if self.secondary_node_count() > 0 {
            write!(f, " secNodes: {}", self.secondary_node_count())?;
        }
        if !self.data.is_empty() {
            let mut block = String::from("\nMesh contains data:\n");
            for (name, value) in self.data_dict() {
                if value.len() > 1 {
                    block.push_str(&format!("\t{name} :{}", value.shape_string()));
                } else {
                    block.push_str(&format!("\t{name}"));
                }
                block.push('\n');
            }
            write!(
                f,
                "{}",
                block.trim_end_matches(|c: char| c == ',' || c.is_whitespace())
            )?;
        }
        Ok(())
    }
}
