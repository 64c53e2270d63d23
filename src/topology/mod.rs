//! Mesh topology: entity ids, cell shapes, entities and the mesh store.
//!
//! [`Mesh`] owns dense arrays of nodes, boundaries and cells addressed by
//! [`NodeId`], [`BoundaryId`] and [`CellId`]. Boundaries know their left and
//! right cells once neighbour infos are built, and cells know the boundary on
//! each of their faces.

pub mod cell_type;
pub mod entity;
pub mod ids;
pub mod mesh;

pub use cell_type::CellType;
pub use entity::{Boundary, Cell, Node, Pos};
pub use ids::{BoundaryId, CellId, NodeId};
pub use mesh::Mesh;
