//! Mesh algorithms: path search, cutting, generation and node operations.

pub mod cut;
pub mod deform;
pub mod meshgen;
pub mod paths;
pub mod secondary;

pub use cut::{CutOptions, CutReport};
pub use deform::Displacement;
pub use meshgen::{StructuredCellType, structured_box_2d, structured_box_3d};
pub use secondary::SecondaryNodeOptions;
