//! Strong index handles for mesh entities.
//!
//! Nodes, boundaries and cells live in dense vectors inside [`Mesh`], so each
//! entity is addressed by its position. The three handle types wrap a `usize`
//! so a boundary index can never be passed where a cell index is expected.
//!
//! [`Mesh`]: crate::topology::mesh::Mesh

use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Wraps a raw index.
            #[inline]
            pub const fn new(raw: usize) -> Self {
                $name(raw)
            }

            /// Returns the raw index into the owning mesh vector.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        /// Prints only the raw index.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(id: $name) -> usize {
                id.0
            }
        }
    };
}

entity_id!(
    /// Handle of a mesh node (vertex).
    NodeId
);
entity_id!(
    /// Handle of a mesh boundary (edge in 2D, face in 3D).
    BoundaryId
);
entity_id!(
    /// Handle of a mesh cell.
    CellId
);
