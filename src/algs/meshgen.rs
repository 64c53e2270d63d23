//! Basic mesh generators for structured boxes.
//!
//! Generated meshes come with neighbour infos and marked exterior boundaries:
//! in 2D left/right/bottom/top get markers 1/2/3/4, in 3D the x-, y- and
//! z-faces get 1/2, 3/4 and 5/6.

use crate::mesh_error::MeshSeamError;
use crate::topology::ids::BoundaryId;
use crate::topology::mesh::Mesh;

/// Cell-type choices for structured meshes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StructuredCellType {
    Triangle,
    Quadrilateral,
    Hexahedron,
}

fn invalid_geometry(message: impl Into<String>) -> MeshSeamError {
    MeshSeamError::InvalidGeometry(message.into())
}

fn build_mesh(
    dimension: usize,
    vertex_coords: &[[f64; 3]],
    cells: &[Vec<usize>],
    min: [f64; 3],
    max: [f64; 3],
) -> Result<Mesh, MeshSeamError> {
    let mut mesh = Mesh::new(dimension)?;
    let nodes: Vec<_> = vertex_coords
        .iter()
        .map(|&pos| mesh.create_node(pos, 0))
        .collect();
    for (cell_idx, vertices) in cells.iter().enumerate() {
        let ids = vertices
            .iter()
            .map(|&v| {
                nodes.get(v).copied().ok_or_else(|| {
                    invalid_geometry(format!("cell {cell_idx} references missing vertex {v}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        mesh.create_cell(&ids, 0)?;
    }
    mesh.create_neighbor_infos();
    mark_exterior(&mut mesh, min, max)?;
    Ok(mesh)
}

fn mark_exterior(mesh: &mut Mesh, min: [f64; 3], max: [f64; 3]) -> Result<(), MeshSeamError> {
    let dim = mesh.dim();
    let outside: Vec<_> = mesh
        .boundaries()
        .iter()
        .enumerate()
        .filter(|(_, b)| b.is_outside())
        .map(|(i, _)| BoundaryId::new(i))
        .collect();
    for id in outside {
        let center = mesh.boundary_center(id)?;
        for axis in 0..dim {
            let tol = 1e-9 * (max[axis] - min[axis]).abs().max(1.0);
            let marker = if (center[axis] - min[axis]).abs() < tol {
                Some(2 * axis as i32 + 1)
            } else if (center[axis] - max[axis]).abs() < tol {
                Some(2 * axis as i32 + 2)
            } else {
                None
            };
            if let Some(m) = marker {
                mesh.set_boundary_marker(id, m)?;
                break;
            }
        }
    }
    Ok(())
}

/// Generate a structured 2D box mesh over `[min, max]` with `nx`×`ny` cells.
///
/// Triangles split every quad along its `v0 -> v2` diagonal.
pub fn structured_box_2d(
    nx: usize,
    ny: usize,
    min: [f64; 2],
    max: [f64; 2],
    cell_type: StructuredCellType,
) -> Result<Mesh, MeshSeamError> {
    if nx == 0 || ny == 0 {
        return Err(invalid_geometry("nx and ny must be positive"));
    }
    if cell_type == StructuredCellType::Hexahedron {
        return Err(invalid_geometry("hex elements are not valid for 2D meshes"));
    }

    let dx = (max[0] - min[0]) / nx as f64;
    let dy = (max[1] - min[1]) / ny as f64;
    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        let y = min[1] + dy * j as f64;
        for i in 0..=nx {
            let x = min[0] + dx * i as f64;
            vertices.push([x, y, 0.0]);
        }
    }

    let mut cells = Vec::new();
    let row_stride = nx + 1;
    for j in 0..ny {
        for i in 0..nx {
            let v0 = j * row_stride + i;
            let v1 = v0 + 1;
            let v3 = v0 + row_stride;
            let v2 = v3 + 1;
            if cell_type == StructuredCellType::Triangle {
                cells.push(vec![v0, v1, v2]);
                cells.push(vec![v0, v2, v3]);
            } else {
                cells.push(vec![v0, v1, v2, v3]);
            }
        }
    }

    build_mesh(
        2,
        &vertices,
        &cells,
        [min[0], min[1], 0.0],
        [max[0], max[1], 0.0],
    )
}

/// Generate a structured 3D hexahedral box mesh over `[min, max]` with `nx`×`ny`×`nz` cells.
pub fn structured_box_3d(
    nx: usize,
    ny: usize,
    nz: usize,
    min: [f64; 3],
    max: [f64; 3],
) -> Result<Mesh, MeshSeamError> {
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(invalid_geometry("nx, ny, and nz must be positive"));
    }

    let dx = (max[0] - min[0]) / nx as f64;
    let dy = (max[1] - min[1]) / ny as f64;
    let dz = (max[2] - min[2]) / nz as f64;
    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
    for k in 0..=nz {
        let z = min[2] + dz * k as f64;
        for j in 0..=ny {
            let y = min[1] + dy * j as f64;
            for i in 0..=nx {
                let x = min[0] + dx * i as f64;
                vertices.push([x, y, z]);
            }
        }
    }

    let mut cells = Vec::with_capacity(nx * ny * nz);
    let row_stride = nx + 1;
    let slab_stride = row_stride * (ny + 1);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let base = k * slab_stride + j * row_stride + i;
                let v0 = base;
                let v1 = base + 1;
                let v3 = base + row_stride;
                let v2 = v3 + 1;
                let v4 = base + slab_stride;
                let v5 = v4 + 1;
                let v7 = v4 + row_stride;
                let v6 = v7 + 1;
                cells.push(vec![v0, v1, v2, v3, v4, v5, v6, v7]);
            }
        }
    }

    build_mesh(3, &vertices, &cells, min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_box_counts() {
        let mesh =
            structured_box_2d(4, 4, [0.0, 0.0], [4.0, 4.0], StructuredCellType::Triangle).unwrap();
        assert_eq!(mesh.node_count(), 25);
        assert_eq!(mesh.cell_count(), 32);
        // 20 horizontal + 20 vertical + 16 diagonal edges
        assert_eq!(mesh.boundary_count(), 56);
        assert_eq!(mesh.boundaries().iter().filter(|b| b.is_outside()).count(), 16);
        for m in 1..=4 {
            assert_eq!(mesh.find_boundaries_by_marker(m).len(), 4);
        }
    }

    #[test]
    fn quad_box_marks_each_side() {
        let mesh =
            structured_box_2d(3, 2, [0.0, 0.0], [3.0, 2.0], StructuredCellType::Quadrilateral)
                .unwrap();
        assert_eq!(mesh.find_boundaries_by_marker(1).len(), 2);
        assert_eq!(mesh.find_boundaries_by_marker(2).len(), 2);
        assert_eq!(mesh.find_boundaries_by_marker(3).len(), 3);
        assert_eq!(mesh.find_boundaries_by_marker(4).len(), 3);
        // inner edges stay unmarked
        assert_eq!(mesh.find_boundaries_by_marker(0).len(), 7);
    }

    #[test]
    fn hex_box_counts() {
        let mesh = structured_box_3d(2, 1, 1, [0.0; 3], [2.0, 1.0, 1.0]).unwrap();
        assert_eq!(mesh.node_count(), 12);
        assert_eq!(mesh.cell_count(), 2);
        assert_eq!(mesh.boundary_count(), 11);
        assert_eq!(mesh.find_boundaries_by_marker(0).len(), 1);
        assert_eq!(mesh.find_boundaries_by_marker(6).len(), 2);
    }

    #[test]
    fn rejects_empty_grid() {
        assert!(matches!(
            structured_box_2d(0, 1, [0.0; 2], [1.0; 2], StructuredCellType::Quadrilateral),
            Err(MeshSeamError::InvalidGeometry(_))
        ));
    }
}
