//! Mesh output for external viewers.
//!
//! Writers turn a [`Mesh`] and its data channels into a file format a
//! plotting toolkit can load directly.

pub mod vtk;

use std::io::Write;

use crate::mesh_error::MeshSeamError;
use crate::topology::mesh::Mesh;

/// Trait for mesh writers.
pub trait MeshWriter {
    /// Write the mesh to a writer.
    fn write<W: Write>(&self, writer: W, mesh: &Mesh) -> Result<(), MeshSeamError>;
}
