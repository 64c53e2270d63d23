//! MeshSeamError: Unified error type for mesh-seam public APIs
//!
//! Every fallible operation of the mesh store, the path finder, the cutter
//! and the data channels reports through this enum. Errors are terminal for
//! the calling operation; mutating operations check their preconditions
//! before touching the mesh.

use thiserror::Error;

use crate::topology::ids::{BoundaryId, CellId, NodeId};

/// Unified error type for mesh-seam operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshSeamError {
    /// A node id does not refer to an existing node.
    #[error("node `{0}` does not exist")]
    UnknownNode(NodeId),
    /// A boundary id does not refer to an existing boundary.
    #[error("boundary `{0}` does not exist")]
    UnknownBoundary(BoundaryId),
    /// A cell id does not refer to an existing cell.
    #[error("cell `{0}` does not exist")]
    UnknownCell(CellId),
    /// The mesh dimension is outside `1..=3` or not supported by an operation.
    #[error("unsupported mesh dimension {dim} for {operation}")]
    UnsupportedDimension { dim: usize, operation: &'static str },
    /// Geometry parameters are inconsistent.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// An entity was created with a node count that does not fit the mesh dimension.
    #[error("cannot build a {entity} from {nodes} nodes in a {dim}D mesh")]
    InvalidShape {
        entity: &'static str,
        nodes: usize,
        dim: usize,
    },
    /// A boundary over the same node set already exists.
    #[error("boundary over nodes {nodes:?} already exists as `{existing}`")]
    DuplicateBoundary {
        nodes: Vec<NodeId>,
        existing: BoundaryId,
    },
    /// No boundary connects the given nodes.
    #[error("no boundary connects nodes {0:?}")]
    MissingBoundary(Vec<NodeId>),
    /// A boundary handed to the path finder is not a two-node edge.
    #[error("boundary `{boundary}` has {nodes} nodes; paths can only follow edges")]
    NotAnEdge { boundary: BoundaryId, nodes: usize },
    /// The marked edges meet at a node with more than two incident edges.
    #[error("marked edges branch at node `{node}` (degree {degree})")]
    BranchedPath { node: NodeId, degree: usize },
    /// No boundary carries the requested marker.
    #[error("did not find a path for marker {0}")]
    PathNotFound(i32),
    /// The marker is spread over more than one connected path.
    #[error("marker {marker} forms {paths} separate paths; only one can be cut at once")]
    MultiplePaths { marker: i32, paths: usize },
    /// No node of the path can be duplicated, so the cut would not separate anything.
    #[error("cannot cut marker {0}: a single edge whose endpoints both stay shared")]
    DegenerateCut(i32),
    /// A path edge lacks a left or right cell, i.e. it runs along the exterior.
    #[error("path is not inside the mesh: boundary `{0}` misses an adjacent cell")]
    PathNotInterior(BoundaryId),
    /// Array length matches neither node, cell nor boundary count.
    #[error(
        "data `{key}` has length {len}; expected {nodes} (nodes), {cells} (cells) or {boundaries} (boundaries)"
    )]
    DataSizeMismatch {
        key: String,
        len: usize,
        nodes: usize,
        cells: usize,
        boundaries: usize,
    },
    /// The requested data name is unknown.
    #[error("the mesh does not have the requested data `{key}`; available: {available:?}")]
    MissingData { key: String, available: Vec<String> },
    /// A displacement field does not match the node count or mesh dimension.
    #[error("displacement shape {shape:?} does not match {nodes} nodes in {dim}D")]
    DisplacementShape {
        shape: Vec<usize>,
        nodes: usize,
        dim: usize,
    },
    /// The operation needs left/right cell information; call `create_neighbor_infos` first.
    #[error("neighbour infos missing; call `create_neighbor_infos` first")]
    NeighborInfosMissing,
    /// Mesh invariant violated (see [`crate::DebugInvariants`]).
    #[error("mesh invariant violated: {0}")]
    InvariantViolation(String),
    /// Writing mesh output failed.
    #[error("mesh I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MeshSeamError {
    fn from(err: std::io::Error) -> Self {
        MeshSeamError::Io(err.to_string())
    }
}
