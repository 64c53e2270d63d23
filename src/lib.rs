#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-seam
//!
//! mesh-seam is a small unstructured mesh library for 1D, 2D and 3D meshes of
//! segments, triangles, quadrilaterals, tetrahedra and hexahedra. Its main
//! purpose is turning inner boundaries into seams: connected paths of marked
//! boundary edges are found and the mesh is cut open along them, duplicating
//! the path nodes so the two sides can move independently.
//!
//! ## Features
//! - Mesh store with boundary lookup by node set and left/right cell adjacency
//! - Path search over marked boundary edges ([`Mesh::find_paths`])
//! - Cutting a 2D mesh along a marked path ([`Mesh::cut_boundary`])
//! - Named data channels with vector (`_x/_y/_z`) and stacked (`#i`) grouping
//! - Secondary nodes on boundaries and cell edges
//! - Nodal displacement, structured grid generation and legacy VTK output
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: skipped work and inconsistent
//! input at `warn`, rejected data at `error`, progress at `info` and cut
//! details at `debug`. Install any logger to see them.
//!
//! ## Invariants
//!
//! Mesh consistency is checked by [`DebugInvariants`] after every cut in
//! debug builds, or in release builds with the `check-invariants` feature.

pub mod algs;
pub mod data;
pub mod debug_invariants;
pub mod geometry;
pub mod io;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use topology::mesh::Mesh;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::cut::{CutOptions, CutReport};
    pub use crate::algs::deform::Displacement;
    pub use crate::algs::meshgen::{StructuredCellType, structured_box_2d, structured_box_3d};
    pub use crate::algs::secondary::SecondaryNodeOptions;
    pub use crate::data::{DataMap, DataValue};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::MeshWriter;
    pub use crate::io::vtk::VtkWriter;
    pub use crate::mesh_error::MeshSeamError;
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::entity::{Boundary, Cell, Node, Pos};
    pub use crate::topology::ids::{BoundaryId, CellId, NodeId};
    pub use crate::topology::mesh::Mesh;
}
