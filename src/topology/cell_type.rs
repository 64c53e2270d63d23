//! Cell shape metadata and local face/edge tables.

/// Cell shapes supported by the mesh store.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellType {
    /// 1D segment.
    Segment,
    /// 2D simplex (triangle).
    Triangle,
    /// 2D tensor-product cell (quad).
    Quadrilateral,
    /// 3D simplex (tet).
    Tetrahedron,
    /// 3D tensor-product cell (hex).
    Hexahedron,
}

const SEGMENT_FACES: &[&[usize]] = &[&[0], &[1]];
const TRIANGLE_FACES: &[&[usize]] = &[&[0, 1], &[1, 2], &[2, 0]];
const QUAD_FACES: &[&[usize]] = &[&[0, 1], &[1, 2], &[2, 3], &[3, 0]];
const TET_FACES: &[&[usize]] = &[&[1, 2, 3], &[2, 0, 3], &[0, 1, 3], &[0, 2, 1]];
//   7------6
//  /|     /|
// 4------5 |
// | 3----|-2
// |/     |/
// 0------1
const HEX_FACES: &[&[usize]] = &[
    &[0, 3, 2, 1],
    &[4, 5, 6, 7],
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
];

const TET_EDGES: &[[usize; 2]] = &[[0, 1], [0, 2], [0, 3], [1, 2], [2, 3], [3, 1]];
const HEX_EDGES: &[[usize; 2]] = &[
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
];

impl CellType {
    /// Infers the cell shape from the mesh dimension and the node count.
    pub fn infer(dim: usize, nodes: usize) -> Option<Self> {
        match (dim, nodes) {
            (1, 2) => Some(CellType::Segment),
            (2, 3) => Some(CellType::Triangle),
            (2, 4) => Some(CellType::Quadrilateral),
            (3, 4) => Some(CellType::Tetrahedron),
            (3, 8) => Some(CellType::Hexahedron),
            _ => None,
        }
    }

    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> usize {
        match self {
            CellType::Segment => 1,
            CellType::Triangle | CellType::Quadrilateral => 2,
            CellType::Tetrahedron | CellType::Hexahedron => 3,
        }
    }

    /// Number of nodes of the shape.
    pub fn node_count(self) -> usize {
        match self {
            CellType::Segment => 2,
            CellType::Triangle => 3,
            CellType::Quadrilateral | CellType::Tetrahedron => 4,
            CellType::Hexahedron => 8,
        }
    }

    /// Local node indices of each face (boundary) of the shape.
    ///
    /// 2D faces follow the counter-clockwise node order, so the cell lies on
    /// the left of every directed face.
    pub fn faces(self) -> &'static [&'static [usize]] {
        match self {
            CellType::Segment => SEGMENT_FACES,
            CellType::Triangle => TRIANGLE_FACES,
            CellType::Quadrilateral => QUAD_FACES,
            CellType::Tetrahedron => TET_FACES,
            CellType::Hexahedron => HEX_FACES,
        }
    }

    /// Local node index pairs of the edges of a 3D shape; empty otherwise.
    pub fn edges(self) -> &'static [[usize; 2]] {
        match self {
            CellType::Tetrahedron => TET_EDGES,
            CellType::Hexahedron => HEX_EDGES,
            _ => &[],
        }
    }
}

/// Returns `true` when `nodes` nodes form a valid boundary in a `dim`-D mesh.
pub fn is_boundary_shape(dim: usize, nodes: usize) -> bool {
    matches!((dim, nodes), (1, 1) | (2, 2) | (3, 3) | (3, 4))
}
