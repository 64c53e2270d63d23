use mesh_seam::prelude::*;

fn unit_square() -> Mesh {
    structured_box_2d(1, 1, [0.0, 0.0], [1.0, 1.0], StructuredCellType::Triangle).unwrap()
}

#[test]
fn plain_summary() {
    assert_eq!(
        unit_square().to_string(),
        "Mesh: Nodes: 4 Cells: 2 Boundaries: 5"
    );
}

#[test]
fn summary_lists_channels_with_shapes() {
    let mut mesh = unit_square();
    mesh.set_data("rho", DataValue::Scalar(vec![1.0, 2.0])).unwrap();
    mesh.set_data("u", DataValue::Vector(vec![[0.0; 3]; 4])).unwrap();
    mesh.set_data(
        "t",
        DataValue::Series(vec![
            DataValue::Scalar(vec![0.0; 4]),
            DataValue::Scalar(vec![1.0; 4]),
            DataValue::Scalar(vec![2.0; 4]),
        ]),
    )
    .unwrap();
    assert_eq!(
        mesh.to_string(),
        "Mesh: Nodes: 4 Cells: 2 Boundaries: 5\n\
         Mesh contains data:\n\
         \trho :(2,)\n\
         \tt :(3, 4)\n\
         \tu :(4, 3)"
    );
}

#[test]
fn single_value_channels_show_no_shape() {
    let mut mesh = Mesh::new(2).unwrap();
    let ids = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]].map(|p| mesh.create_node(p, 0));
    mesh.create_cell(&ids, 2).unwrap();
    mesh.set_data("m", DataValue::Scalar(vec![5.0])).unwrap();
    assert_eq!(
        mesh.to_string(),
        "Mesh: Nodes: 3 Cells: 1 Boundaries: 0\nMesh contains data:\n\tm"
    );
}

#[test]
fn summary_counts_secondary_nodes() {
    let mesh = unit_square().create_mesh_with_secondary_nodes(&SecondaryNodeOptions::default());
    assert_eq!(
        mesh.to_string(),
        "Mesh: Nodes: 4 Cells: 2 Boundaries: 5 secNodes: 15"
    );
}

#[test]
fn cut_deform_and_export() {
    let mut mesh =
        structured_box_2d(2, 2, [0.0, 0.0], [2.0, 2.0], StructuredCellType::Quadrilateral).unwrap();
    let path = [NodeId::new(1), NodeId::new(4)];
    let b = mesh.find_boundary(&path).unwrap();
    mesh.set_boundary_marker(b, 9).unwrap();

    let report = mesh.cut_boundary(9, &CutOptions::default()).unwrap();
    assert_eq!(report.new_nodes.len(), 1);
    assert_eq!(mesh.node_count(), 10);

    // open the crack: push every node right of x = 1 further right
    let shift: Vec<[f64; 3]> = mesh
        .nodes()
        .iter()
        .map(|node| [if node.pos[0] > 1.0 { 1.0 } else { 0.0 }, 0.0, 0.0])
        .collect();
    mesh.deform(&Displacement::PerNode(shift), 0.5).unwrap();
    let (lo, hi) = mesh.bounding_box();
    assert_eq!(lo, [0.0, 0.0, 0.0]);
    assert_eq!(hi, [2.5, 2.0, 0.0]);

    let mut out = Vec::new();
    VtkWriter::default().write(&mut out, &mesh).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("POINTS 10 double"));
    assert!(text.contains("CELLS 4 20"));
    mesh.validate_invariants().unwrap();
}
