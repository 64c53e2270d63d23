use crate::mesh_error::MeshSeamError;
use crate::topology::ids::{BoundaryId, CellId};
use crate::topology::mesh::Mesh;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MeshSeamError>;
}

/// Helper macro to run a fallible check and panic on error when invariant
/// checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

fn violation(msg: String) -> MeshSeamError {
    MeshSeamError::InvariantViolation(msg)
}

impl DebugInvariants for Mesh {
    fn debug_assert_invariants(&self) {
        debug_invariants!(self.validate_invariants(), "Mesh invalid");
    }

    fn validate_invariants(&self) -> Result<(), MeshSeamError> {
        let node_count = self.node_count();

        // 1) every referenced node exists
        for (i, b) in self.boundaries().iter().enumerate() {
            if let Some(&n) = b.nodes().iter().find(|n| n.get() >= node_count) {
                return Err(violation(format!("boundary {i} references node {n}")));
            }
        }
        for (i, c) in self.cells().iter().enumerate() {
            if let Some(&n) = c.nodes().iter().find(|n| n.get() >= node_count) {
                return Err(violation(format!("cell {i} references node {n}")));
            }
        }

        // 2) lookup index and per-node lists agree with the boundaries
        if self.boundary_index_len() != self.boundary_count() {
            return Err(violation(format!(
                "boundary index holds {} entries for {} boundaries",
                self.boundary_index_len(),
                self.boundary_count()
            )));
        }
        for (i, b) in self.boundaries().iter().enumerate() {
            let id = BoundaryId::new(i);
            if self.find_boundary(b.nodes()) != Some(id) {
                return Err(violation(format!("boundary {b} is not indexed as {id}")));
            }
            for &n in b.nodes() {
                if !self.boundaries_of_node(n)?.contains(&id) {
                    return Err(violation(format!("node {n} does not list boundary {id}")));
                }
            }
        }

        if !self.has_neighbor_infos() {
            return Ok(());
        }

        // 3) left/right cells contain the boundary and list it in a face slot
        for (i, b) in self.boundaries().iter().enumerate() {
            let id = BoundaryId::new(i);
            for cell in [b.left_cell(), b.right_cell()].into_iter().flatten() {
                let c = self.cell(cell)?;
                if !b.nodes().iter().all(|&n| c.contains(n)) {
                    return Err(violation(format!(
                        "boundary {id} borders cell {cell} which does not contain it"
                    )));
                }
                if !c.boundaries().any(|slot| slot == id) {
                    return Err(violation(format!(
                        "cell {cell} borders boundary {id} but has no slot for it"
                    )));
                }
            }
        }

        // 4) cell slots point at boundaries that know the cell
        for (i, c) in self.cells().iter().enumerate() {
            let id = CellId::new(i);
            for b in c.boundaries() {
                let bound = self.boundary(b)?;
                if bound.left_cell() != Some(id) && bound.right_cell() != Some(id) {
                    return Err(violation(format!(
                        "cell {id} lists boundary {b} which does not border it"
                    )));
                }
            }
        }
        Ok(())
    }
}
