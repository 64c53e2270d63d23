//! Node, boundary and cell records stored by [`Mesh`](crate::topology::mesh::Mesh).
//!
//! Entity connectivity is only mutable through the owning mesh, which keeps
//! the boundary lookup index and the node-to-boundary sets in sync.

use std::fmt;

use crate::topology::cell_type::CellType;
use crate::topology::ids::{BoundaryId, CellId, NodeId};

/// Cartesian position; unused trailing components are zero.
pub type Pos = [f64; 3];

/// A mesh vertex.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub pos: Pos,
    pub marker: i32,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Marker: {}\t[{}, {}, {}]",
            self.marker, self.pos[0], self.pos[1], self.pos[2]
        )
    }
}

/// A boundary entity bordering zero, one or two cells.
///
/// By convention the left cell lies on the left of the directed edge
/// `nodes[0] -> nodes[1]` in 2D. A boundary with only a left cell is on the
/// mesh exterior.
#[derive(Clone, Debug, PartialEq)]
pub struct Boundary {
    pub(crate) nodes: Vec<NodeId>,
    pub marker: i32,
    pub(crate) left: Option<CellId>,
    pub(crate) right: Option<CellId>,
    pub(crate) secondary_nodes: Vec<usize>,
}

impl Boundary {
    pub(crate) fn new(nodes: Vec<NodeId>, marker: i32) -> Self {
        Self {
            nodes,
            marker,
            left: None,
            right: None,
            secondary_nodes: Vec::new(),
        }
    }

    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, i: usize) -> NodeId {
        self.nodes[i]
    }

    #[inline]
    pub fn left_cell(&self) -> Option<CellId> {
        self.left
    }

    #[inline]
    pub fn right_cell(&self) -> Option<CellId> {
        self.right
    }

    /// Is the boundary on the outside of the mesh.
    #[inline]
    pub fn is_outside(&self) -> bool {
        self.left.is_some() && self.right.is_none()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Indices into the mesh's secondary node list.
    pub fn secondary_nodes(&self) -> &[usize] {
        &self.secondary_nodes
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Boundary Marker: {} Nodes:", self.marker)?;
        for n in &self.nodes {
            write!(f, " {n}")?;
        }
        Ok(())
    }
}

/// A mesh cell with its boundary slots (one per local face).
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub(crate) nodes: Vec<NodeId>,
    pub marker: i32,
    pub(crate) cell_type: CellType,
    pub(crate) boundaries: Vec<Option<BoundaryId>>,
    pub(crate) secondary_nodes: Vec<usize>,
}

impl Cell {
    pub(crate) fn new(nodes: Vec<NodeId>, marker: i32, cell_type: CellType) -> Self {
        let faces = cell_type.faces().len();
        Self {
            nodes,
            marker,
            cell_type,
            boundaries: vec![None; faces],
            secondary_nodes: Vec::new(),
        }
    }

    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Boundary in local face slot `i`, once neighbour infos exist.
    #[inline]
    pub fn boundary(&self, i: usize) -> Option<BoundaryId> {
        self.boundaries.get(i).copied().flatten()
    }

    pub fn boundaries(&self) -> impl Iterator<Item = BoundaryId> + '_ {
        self.boundaries.iter().filter_map(|b| *b)
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Node ids of local face `i`, in face order.
    pub fn face_nodes(&self, i: usize) -> Vec<NodeId> {
        self.cell_type.faces()[i]
            .iter()
            .map(|&local| self.nodes[local])
            .collect()
    }

    /// Indices into the mesh's secondary node list.
    pub fn secondary_nodes(&self) -> &[usize] {
        &self.secondary_nodes
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} Marker: {} Nodes:", self.cell_type, self.marker)?;
        for n in &self.nodes {
            write!(f, " {n}")?;
        }
        Ok(())
    }
}
