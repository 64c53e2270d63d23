use mesh_seam::Mesh;
use mesh_seam::algs::meshgen::{StructuredCellType, structured_box_2d};
use mesh_seam::mesh_error::MeshSeamError;
use mesh_seam::topology::ids::{BoundaryId, NodeId};
use proptest::prelude::*;

fn nid(i: usize) -> NodeId {
    NodeId::new(i)
}

/// Loose 2D nodes with one marker-1 boundary per `(a, b)` pair, inserted in the given order.
fn mesh_with_edges(count: usize, edges: &[(usize, usize)]) -> (Mesh, Vec<BoundaryId>) {
    let mut mesh = Mesh::new(2).unwrap();
    for i in 0..count {
        let angle = i as f64;
        mesh.create_node([angle.cos(), angle.sin(), 0.0], 0);
    }
    let ids = edges
        .iter()
        .map(|&(a, b)| mesh.create_boundary(&[nid(a), nid(b)], 1).unwrap())
        .collect();
    (mesh, ids)
}

fn is_edge(mesh: &Mesh, a: NodeId, b: NodeId) -> bool {
    mesh.find_boundary(&[a, b]).is_some()
}

#[test]
fn exterior_ring_of_generated_grid() {
    let mut mesh =
        structured_box_2d(3, 2, [0.0, 0.0], [3.0, 2.0], StructuredCellType::Quadrilateral).unwrap();
    let outside: Vec<_> = mesh
        .boundaries()
        .iter()
        .enumerate()
        .filter(|(_, b)| b.is_outside())
        .map(|(i, _)| BoundaryId::new(i))
        .collect();
    for &b in &outside {
        mesh.set_boundary_marker(b, 7).unwrap();
    }
    let paths = mesh.find_paths_by_marker(7).unwrap();
    assert_eq!(paths.len(), 1);
    let ring = &paths[0];
    assert_eq!(ring.len(), outside.len() + 1);
    assert_eq!(ring.first(), Some(&nid(0)));
    assert_eq!(ring.last(), Some(&nid(0)));
    // smallest neighbour of node 0 on the ring is node 1
    assert_eq!(ring[1], nid(1));
}

#[test]
fn bottom_edge_is_an_open_chain() {
    let mesh =
        structured_box_2d(4, 1, [0.0, 0.0], [4.0, 1.0], StructuredCellType::Triangle).unwrap();
    let paths = mesh.find_paths_by_marker(3).unwrap();
    assert_eq!(paths, vec![(0..5).map(nid).collect::<Vec<_>>()]);
}

#[test]
fn face_boundaries_are_not_edges() {
    let mesh = mesh_seam::algs::meshgen::structured_box_3d(1, 1, 1, [0.0; 3], [1.0; 3]).unwrap();
    let ids = mesh.find_boundaries_by_marker(1);
    assert!(matches!(
        mesh.find_paths(&ids),
        Err(MeshSeamError::NotAnEdge { nodes: 4, .. })
    ));
}

#[test]
fn t_junction_is_rejected() {
    let (mesh, ids) = mesh_with_edges(5, &[(0, 1), (1, 2), (2, 3), (2, 4)]);
    assert_eq!(
        mesh.find_paths(&ids),
        Err(MeshSeamError::BranchedPath {
            node: nid(2),
            degree: 3
        })
    );
}

fn chain_case() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    (2usize..24).prop_flat_map(|n| {
        (
            Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
            Just((0..n - 1).collect::<Vec<_>>()).prop_shuffle(),
        )
    })
}

fn ring_case() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    (3usize..24).prop_flat_map(|n| {
        (
            Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
            Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
        )
    })
}

proptest! {
    #[test]
    fn open_chain_is_recovered((labels, order) in chain_case()) {
        let n = labels.len();
        let edges: Vec<_> = order.iter().map(|&i| (labels[i], labels[i + 1])).collect();
        let (mesh, ids) = mesh_with_edges(n, &edges);

        let paths = mesh.find_paths(&ids).unwrap();
        prop_assert_eq!(paths.len(), 1);
        let path = &paths[0];
        prop_assert_eq!(path.len(), n);

        let mut expected: Vec<NodeId> = labels.iter().copied().map(nid).collect();
        if labels[0] > labels[n - 1] {
            expected.reverse();
        }
        prop_assert_eq!(path, &expected);
    }

    #[test]
    fn closed_ring_is_recovered((labels, order) in ring_case()) {
        let n = labels.len();
        let edges: Vec<_> = order
            .iter()
            .map(|&i| (labels[i], labels[(i + 1) % n]))
            .collect();
        let (mesh, ids) = mesh_with_edges(n, &edges);

        let paths = mesh.find_paths(&ids).unwrap();
        prop_assert_eq!(paths.len(), 1);
        let ring = &paths[0];
        prop_assert_eq!(ring.len(), n + 1);
        prop_assert_eq!(ring[0], nid(0));
        prop_assert_eq!(ring[n], nid(0));

        let start = labels.iter().position(|&l| l == 0).unwrap();
        let before = labels[(start + n - 1) % n];
        let after = labels[(start + 1) % n];
        prop_assert_eq!(ring[1], nid(before.min(after)));

        for pair in ring.windows(2) {
            prop_assert!(is_edge(&mesh, pair[0], pair[1]));
        }
        let mut inner: Vec<NodeId> = ring[..n].to_vec();
        inner.sort();
        inner.dedup();
        prop_assert_eq!(inner.len(), n);
    }
}
