//! Legacy VTK (`.vtk`) writer.
//!
//! Meshes with cells are written as an `UNSTRUCTURED_GRID` with a
//! `Cell_Marker` array. Meshes holding only boundaries, or any mesh when
//! [`VtkWriter::boundaries`] is set, are written as `POLYDATA` with a
//! `Boundary_Marker` array; in boundary mode only exterior or marked
//! boundaries are kept. Data channels whose length matches the written
//! entities or the node count become cell or point data. Cell data wins when
//! both counts are equal.

use std::io::Write;

use crate::data::DataValue;
use crate::io::MeshWriter;
use crate::mesh_error::MeshSeamError;
use crate::topology::cell_type::CellType;
use crate::topology::ids::NodeId;
use crate::topology::mesh::Mesh;

#[derive(Debug, Default, Clone)]
pub struct VtkWriter {
    /// Export the exterior and marked boundaries instead of the cells.
    pub boundaries: bool,
}

impl VtkWriter {
    /// Writer for the boundary view of a mesh.
    pub fn boundary_view() -> Self {
        Self { boundaries: true }
    }

    fn vtk_cell_type(cell_type: CellType) -> i32 {
        match cell_type {
            CellType::Segment => 3,
            CellType::Triangle => 5,
            CellType::Quadrilateral => 9,
            CellType::Tetrahedron => 10,
            CellType::Hexahedron => 12,
        }
    }

    fn array_name(name: &str) -> String {
        name.replace(char::is_whitespace, "_")
    }

    fn write_channel<W: Write>(
        writer: &mut W,
        name: &str,
        value: &DataValue,
    ) -> Result<(), MeshSeamError> {
        match value {
            DataValue::Scalar(v) => {
                writeln!(writer, "SCALARS {} double 1", Self::array_name(name))?;
                writeln!(writer, "LOOKUP_TABLE default")?;
                for x in v {
                    writeln!(writer, "{x}")?;
                }
            }
            DataValue::Vector(v) => {
                writeln!(writer, "VECTORS {} double", Self::array_name(name))?;
                for p in v {
                    writeln!(writer, "{} {} {}", p[0], p[1], p[2])?;
                }
            }
            DataValue::Series(items) => {
                for (i, item) in items.iter().enumerate() {
                    Self::write_channel(writer, &format!("{name}#{i}"), item)?;
                }
            }
        }
        Ok(())
    }

    /// Entity count of a channel; `None` for series with members of differing lengths.
    fn channel_len(value: &DataValue) -> Option<usize> {
        match value {
            DataValue::Series(items) => {
                let first = items.first().map_or(Some(0), Self::channel_len)?;
                items
                    .iter()
                    .all(|item| Self::channel_len(item) == Some(first))
                    .then_some(first)
            }
            other => Some(other.len()),
        }
    }

    /// Restricts a channel to the entities at `ids`.
    fn select(value: &DataValue, ids: &[usize]) -> DataValue {
        match value {
            DataValue::Scalar(v) => DataValue::Scalar(ids.iter().map(|&i| v[i]).collect()),
            DataValue::Vector(v) => DataValue::Vector(ids.iter().map(|&i| v[i]).collect()),
            DataValue::Series(items) => {
                DataValue::Series(items.iter().map(|item| Self::select(item, ids)).collect())
            }
        }
    }

    fn write_points<W: Write>(writer: &mut W, mesh: &Mesh) -> Result<(), MeshSeamError> {
        writeln!(writer, "POINTS {} double", mesh.node_count())?;
        for node in mesh.nodes() {
            writeln!(writer, "{} {} {}", node.pos[0], node.pos[1], node.pos[2])?;
        }
        Ok(())
    }

    fn write_connectivity<W: Write>(
        writer: &mut W,
        section: &str,
        entities: &[&[NodeId]],
    ) -> Result<(), MeshSeamError> {
        let total_size: usize = entities.iter().map(|nodes| nodes.len() + 1).sum();
        writeln!(writer, "{section} {} {}", entities.len(), total_size)?;
        for nodes in entities {
            write!(writer, "{}", nodes.len())?;
            for n in nodes.iter() {
                write!(writer, " {n}")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Writes `CELL_DATA` (marker plus entity-sized channels) and `POINT_DATA`.
    ///
    /// `ids` picks the written entities out of channels of length `source_len`.
    fn write_data<W: Write>(
        writer: &mut W,
        mesh: &Mesh,
        marker_name: &str,
        markers: &[i32],
        source_len: usize,
        ids: &[usize],
    ) -> Result<(), MeshSeamError> {
        let mut channels = mesh.data_dict();
        channels.retain(|name, value| {
            let keep = Self::channel_len(value).is_some();
            if !keep {
                log::warn!("skipping data `{name}`: series members differ in length");
            }
            keep
        });

        writeln!(writer, "CELL_DATA {}", markers.len())?;
        writeln!(writer, "SCALARS {marker_name} int 1")?;
        writeln!(writer, "LOOKUP_TABLE default")?;
        for m in markers {
            writeln!(writer, "{m}")?;
        }
        let whole = ids.len() == source_len;
        for (name, value) in &channels {
            if Self::channel_len(value) == Some(source_len) {
                if whole {
                    Self::write_channel(writer, name, value)?;
                } else {
                    Self::write_channel(writer, name, &Self::select(value, ids))?;
                }
            }
        }

        let point_channels: Vec<_> = channels
            .iter()
            .filter(|(_, v)| {
                let len = Self::channel_len(v);
                len == Some(mesh.node_count()) && len != Some(source_len)
            })
            .collect();
        if !point_channels.is_empty() {
            writeln!(writer, "POINT_DATA {}", mesh.node_count())?;
            for (name, value) in point_channels {
                Self::write_channel(writer, name, value)?;
            }
        }
        Ok(())
    }

    fn write_cells<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), MeshSeamError> {
        writeln!(writer, "DATASET UNSTRUCTURED_GRID")?;
        Self::write_points(&mut writer, mesh)?;
        let cells: Vec<_> = mesh.cells().iter().map(|c| c.nodes()).collect();
        Self::write_connectivity(&mut writer, "CELLS", &cells)?;
        writeln!(writer, "CELL_TYPES {}", mesh.cell_count())?;
        for cell in mesh.cells() {
            writeln!(writer, "{}", Self::vtk_cell_type(cell.cell_type()))?;
        }
        let ids: Vec<usize> = (0..mesh.cell_count()).collect();
        Self::write_data(
            &mut writer,
            mesh,
            "Cell_Marker",
            &mesh.cell_markers(),
            mesh.cell_count(),
            &ids,
        )
    }

    fn write_boundaries<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), MeshSeamError> {
        let ids: Vec<usize> = if self.boundaries {
            if mesh.cell_count() > 0 && !mesh.has_neighbor_infos() {
                return Err(MeshSeamError::NeighborInfosMissing);
            }
            mesh.boundaries()
                .iter()
                .enumerate()
                .filter(|(_, b)| b.is_outside() || b.marker != 0)
                .map(|(i, _)| i)
                .collect()
        } else {
            (0..mesh.boundary_count()).collect()
        };

        writeln!(writer, "DATASET POLYDATA")?;
        Self::write_points(&mut writer, mesh)?;
        let section = match mesh.dim() {
            1 => "VERTICES",
            2 => "LINES",
            _ => "POLYGONS",
        };
        let faces: Vec<_> = ids.iter().map(|&i| mesh.boundaries()[i].nodes()).collect();
        Self::write_connectivity(&mut writer, section, &faces)?;
        let markers: Vec<i32> = ids.iter().map(|&i| mesh.boundaries()[i].marker).collect();
        Self::write_data(
            &mut writer,
            mesh,
            "Boundary_Marker",
            &markers,
            mesh.boundary_count(),
            &ids,
        )
    }
}

impl MeshWriter for VtkWriter {
    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), MeshSeamError> {
        writeln!(writer, "# vtk DataFile Version 3.0")?;
        writeln!(writer, "mesh-seam")?;
        writeln!(writer, "ASCII")?;
        if self.boundaries || (mesh.cell_count() == 0 && mesh.boundary_count() > 0) {
            self.write_boundaries(writer, mesh)
        } else {
            self.write_cells(writer, mesh)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::meshgen::{StructuredCellType, structured_box_2d};

    fn render(writer: &VtkWriter, mesh: &Mesh) -> String {
        let mut buf = Vec::new();
        writer.write(&mut buf, mesh).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_cells_and_data() {
        let mut mesh =
            structured_box_2d(1, 1, [0.0, 0.0], [1.0, 1.0], StructuredCellType::Triangle).unwrap();
        mesh.set_data("rho", DataValue::Scalar(vec![10.0, 20.0])).unwrap();
        mesh.set_data("u", DataValue::Vector(vec![[0.0, 1.0, 0.0]; 4]))
            .unwrap();

        let text = render(&VtkWriter::default(), &mesh);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# vtk DataFile Version 3.0");
        assert!(lines.contains(&"DATASET UNSTRUCTURED_GRID"));
        assert!(lines.contains(&"POINTS 4 double"));
        assert!(lines.contains(&"CELLS 2 8"));
        assert!(lines.contains(&"3 0 1 3"));
        assert!(lines.contains(&"CELL_TYPES 2"));
        assert!(lines.contains(&"SCALARS Cell_Marker int 1"));
        assert!(lines.contains(&"SCALARS rho double 1"));
        assert!(lines.contains(&"POINT_DATA 4"));
        assert!(lines.contains(&"VECTORS u double"));
        let cell_data = lines.iter().position(|l| *l == "CELL_DATA 2").unwrap();
        let point_data = lines.iter().position(|l| *l == "POINT_DATA 4").unwrap();
        assert!(cell_data < point_data);
    }

    #[test]
    fn boundary_only_mesh_is_polydata() {
        let mut mesh = Mesh::new(2).unwrap();
        let ids = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]].map(|p| mesh.create_node(p, 0));
        mesh.create_boundary(&[ids[0], ids[1]], 4).unwrap();
        mesh.create_boundary(&[ids[1], ids[2]], 5).unwrap();

        let text = render(&VtkWriter::default(), &mesh);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.contains(&"DATASET POLYDATA"));
        assert!(lines.contains(&"LINES 2 6"));
        assert!(lines.contains(&"2 0 1"));
        assert!(lines.contains(&"SCALARS Boundary_Marker int 1"));
        let at = lines.iter().position(|l| *l == "CELL_DATA 2").unwrap();
        assert_eq!(&lines[at + 3..at + 5], &["4", "5"]);
        assert!(!text.contains("CELLS"));
    }

    #[test]
    fn boundary_mode_keeps_exterior_and_marked_edges() {
        let mut mesh =
            structured_box_2d(2, 1, [0.0, 0.0], [2.0, 1.0], StructuredCellType::Quadrilateral)
                .unwrap();
        // inner edge (1, 4) stays unmarked and is dropped
        let text = render(&VtkWriter::boundary_view(), &mesh);
        assert!(text.contains("LINES 6 18"));
        assert!(!text.contains("\n2 1 4\n") && !text.contains("\n2 4 1\n"));

        let inner = mesh.find_boundary(&[NodeId::new(1), NodeId::new(4)]).unwrap();
        mesh.set_boundary_marker(inner, 8).unwrap();
        mesh.set_data("flux", DataValue::Scalar((0..7).map(f64::from).collect()))
            .unwrap();
        let text = render(&VtkWriter::boundary_view(), &mesh);
        assert!(text.contains("LINES 7 21"));
        assert!(text.contains("SCALARS flux double 1"));
    }

    #[test]
    fn boundary_mode_needs_neighbour_infos() {
        let mut mesh = Mesh::new(2).unwrap();
        let ids = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]].map(|p| mesh.create_node(p, 0));
        mesh.create_cell(&ids, 0).unwrap();
        let mut buf = Vec::new();
        assert_eq!(
            VtkWriter::boundary_view().write(&mut buf, &mesh),
            Err(MeshSeamError::NeighborInfosMissing)
        );
    }

    #[test]
    fn ragged_series_is_skipped() {
        let mut mesh =
            structured_box_2d(1, 1, [0.0, 0.0], [1.0, 1.0], StructuredCellType::Triangle).unwrap();
        // one member per cell, one per node
        mesh.set_data(
            "mixed",
            DataValue::Series(vec![
                DataValue::Scalar(vec![0.0; 2]),
                DataValue::Scalar(vec![0.0; 4]),
            ]),
        )
        .unwrap();
        mesh.set_data("rho", DataValue::Scalar(vec![1.0, 2.0])).unwrap();

        let text = render(&VtkWriter::default(), &mesh);
        assert!(!text.contains("mixed"));
        assert!(text.contains("SCALARS rho double 1"));
        assert!(!text.contains("POINT_DATA"));
    }
}
