use std::collections::{BTreeMap, BTreeSet};

use netm_core::{AttrSet, AttrValue, Attrs, EdgeTriple, Label, MultiGraph, NmError, Value};
use netm_graph::{
    convert_edges, ring, EdgeSelection, ExpandOptions, Lengths, MultiDiGraph, RingOptions,
};
use proptest::prelude::*;

fn both_ways_ring() -> MultiDiGraph {
    ring(RingOptions {
        nodes: 3,
        left: true,
        right: true,
        self_loops: false,
    })
    .unwrap()
}

fn star(lengths: &[usize]) -> MultiDiGraph {
    let leaves = (1..=lengths.len()).map(|leaf| (Label::from(0), Label::from(leaf)));
    MultiDiGraph::from_edges(0..=lengths.len(), leaves).unwrap()
}

/// Steps from `leaf` back to `root`, following single predecessors.
fn depth(graph: &MultiDiGraph, root: &Label, leaf: &Label) -> usize {
    let mut steps = 0;
    let mut current = leaf.clone();
    while &current != root {
        let preds = graph.predecessors(&current).unwrap();
        assert_eq!(preds.len(), 1, "node {current} has {} predecessors", preds.len());
        current = preds[0].clone();
        steps += 1;
    }
    steps
}

#[test]
fn single_edge_of_length_two_gains_one_node() {
    let mut graph = both_ways_ring();
    let summary = convert_edges(
        &mut graph,
        &EdgeSelection::of([(0, 1)]),
        &Lengths::Uniform(2),
        &ExpandOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.nodes_added(), 1);
    assert_eq!(summary.trunks[&Label::from(0)], vec![Label::from(3)]);
    assert_eq!(summary.removed, vec![EdgeTriple::new(0, 1, 0)]);
    assert_eq!(graph.node_count(), 4);
    assert!(!graph.contains_edge(&EdgeTriple::new(0, 1, 0)));
    assert!(graph.contains_edge(&EdgeTriple::new(0, 3, 0)));
    assert!(graph.contains_edge(&EdgeTriple::new(3, 1, 0)));
    assert_eq!(graph.edge_count(), 7);
}

#[test]
fn edges_from_one_root_share_a_trunk() {
    let mut graph = star(&[3, 2]);
    let table: BTreeMap<EdgeTriple, usize> = [
        (EdgeTriple::new(0, 1, 0), 3),
        (EdgeTriple::new(0, 2, 0), 2),
    ]
    .into_iter()
    .collect();
    let summary = convert_edges(
        &mut graph,
        &EdgeSelection::All,
        &Lengths::PerEdge(table),
        &ExpandOptions::default(),
    )
    .unwrap();

    assert_eq!(
        summary.trunks[&Label::from(0)],
        vec![Label::from(3), Label::from(4)]
    );
    assert!(graph.contains_edge(&EdgeTriple::new(0, 3, 0)));
    assert!(graph.contains_edge(&EdgeTriple::new(3, 4, 0)));
    assert!(graph.contains_edge(&EdgeTriple::new(4, 1, 0)));
    assert!(graph.contains_edge(&EdgeTriple::new(3, 2, 0)));
    assert_eq!(depth(&graph, &Label::from(0), &Label::from(1)), 3);
    assert_eq!(depth(&graph, &Label::from(0), &Label::from(2)), 2);
}

#[test]
fn short_and_unknown_lengths_are_handled_in_place() {
    let mut graph = star(&[0, 1, 0]);
    let table: BTreeMap<EdgeTriple, usize> = [
        (EdgeTriple::new(0, 1, 0), 0),
        (EdgeTriple::new(0, 2, 0), 1),
    ]
    .into_iter()
    .collect();
    let summary = convert_edges(
        &mut graph,
        &EdgeSelection::All,
        &Lengths::PerEdge(table),
        &ExpandOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.nodes_added(), 0);
    assert_eq!(summary.removed, vec![EdgeTriple::new(0, 1, 0)]);
    assert_eq!(summary.skipped, vec![EdgeTriple::new(0, 3, 0)]);
    assert_eq!(
        graph.edge_triples(),
        vec![EdgeTriple::new(0, 2, 0), EdgeTriple::new(0, 3, 0)]
    );
}

#[test]
fn trunk_and_branch_attributes() {
    let mut graph = MultiDiGraph::new();
    let mut payload = Attrs::new();
    payload.insert("capacity".into(), Value::from(9));
    graph
        .add_edge(Label::from("s"), Label::from("t"), None, payload)
        .unwrap();

    let mut node_data = AttrSet::new();
    node_data.insert("fresh".into(), AttrValue::from(true));
    let mut edge_data = AttrSet::new();
    edge_data.insert("trunk".into(), AttrValue::from(true));
    let options = ExpandOptions {
        node_data,
        edge_data,
        ..ExpandOptions::default()
    }
    .with_label(|_, root, index| Label::from(format!("{root}-{index}")));

    convert_edges(&mut graph, &EdgeSelection::All, &Lengths::Uniform(3), &options).unwrap();

    let first = Label::from("s-0");
    let second = Label::from("s-1");
    assert_eq!(
        graph.node_attrs(&first).unwrap().get("fresh"),
        Some(&Value::from(true))
    );
    let trunk_edge = graph
        .edge_attrs(&EdgeTriple::new("s-0", "s-1", 0))
        .unwrap();
    assert_eq!(trunk_edge.get("trunk"), Some(&Value::from(true)));
    let branch = graph
        .edge_attrs(&EdgeTriple::new(second.clone(), "t", 0))
        .unwrap();
    assert_eq!(branch.get("capacity"), Some(&Value::from(9)));
    assert_eq!(branch.get("trunk"), None);
}

#[test]
fn selection_errors_leave_graph_untouched() {
    let mut graph = both_ways_ring();
    let before = graph.edge_triples();
    let err = convert_edges(
        &mut graph,
        &EdgeSelection::of([(0, 1), (0, 9)]),
        &Lengths::Uniform(2),
        &ExpandOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), "unknown-edge");
    assert_eq!(graph.edge_triples(), before);
}

#[test]
fn colliding_fresh_labels_are_rejected() {
    let mut graph = both_ways_ring();
    let options = ExpandOptions::default().with_label(|_, _, _| Label::from(2));
    match convert_edges(
        &mut graph,
        &EdgeSelection::of([(0, 1)]),
        &Lengths::Uniform(2),
        &options,
    )
    .unwrap_err()
    {
        NmError::Graph(info) => {
            assert_eq!(info.code, "label-collision");
            assert_eq!(info.context.get("label"), Some(&"2".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(graph.node_count(), 3);
}

fn assert_path(graph: &MultiDiGraph, path: &[i64]) {
    for pair in path.windows(2) {
        let edge = EdgeTriple::new(pair[0], pair[1], 0);
        assert!(graph.contains_edge(&edge), "missing {edge} on path {path:?}");
    }
}

fn trunk(labels: &[i64]) -> Vec<Label> {
    labels.iter().copied().map(Label::from).collect()
}

#[test]
fn default_labels_skip_nodes_left_by_gaps() {
    let mut graph = MultiDiGraph::from_edges(
        [0, 1, 2, 3],
        [(Label::from(0), Label::from(3))],
    )
    .unwrap();
    graph.remove_node(&Label::from(1)).unwrap();

    let summary = convert_edges(
        &mut graph,
        &EdgeSelection::of([(0, 3)]),
        &Lengths::Uniform(3),
        &ExpandOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.trunks[&Label::from(0)], trunk(&[4, 5]));
    assert_path(&graph, &[0, 4, 5, 3]);
    assert_eq!(graph.node_count(), 5);
}

#[test]
fn longest_trunk_is_built_first_and_trunks_never_share_nodes() {
    let mut graph = both_ways_ring();
    // Ring edges: (0,2) (1,0) (2,1) then (0,1) (1,2) (2,0).
    let table: BTreeMap<EdgeTriple, usize> = [
        ((0, 2), 3),
        ((0, 1), 2),
        ((1, 0), 2),
        ((1, 2), 1),
        ((2, 1), 4),
        ((2, 0), 1),
    ]
    .into_iter()
    .map(|((source, target), length)| (EdgeTriple::new(source, target, 0), length))
    .collect();
    let summary = convert_edges(
        &mut graph,
        &EdgeSelection::All,
        &Lengths::PerEdge(table),
        &ExpandOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.trunks[&Label::from(2)], trunk(&[3, 4, 5]));
    assert_eq!(summary.trunks[&Label::from(0)], trunk(&[6, 7]));
    assert_eq!(summary.trunks[&Label::from(1)], trunk(&[8]));
    assert_eq!(summary.nodes_added(), 3 + 2 + 1);
    assert_eq!(graph.node_count(), 9);

    let fresh: BTreeSet<&Label> = summary.trunks.values().flatten().collect();
    assert_eq!(fresh.len(), summary.nodes_added());

    assert_path(&graph, &[2, 3, 4, 5, 1]);
    assert_path(&graph, &[0, 6, 7, 2]);
    assert_path(&graph, &[0, 6, 1]);
    assert_path(&graph, &[1, 8, 0]);
    assert_path(&graph, &[1, 2]);
    assert_path(&graph, &[2, 0]);
    for removed in [(0, 2), (0, 1), (1, 0), (2, 1)] {
        assert!(!graph.contains_edge(&EdgeTriple::new(removed.0, removed.1, 0)));
    }
    assert_eq!(summary.removed.len(), 4);
}

#[test]
fn equal_trunks_keep_root_order() {
    let mut graph = both_ways_ring();
    let summary = convert_edges(
        &mut graph,
        &EdgeSelection::All,
        &Lengths::Uniform(3),
        &ExpandOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.trunks[&Label::from(0)], trunk(&[3, 4]));
    assert_eq!(summary.trunks[&Label::from(1)], trunk(&[5, 6]));
    assert_eq!(summary.trunks[&Label::from(2)], trunk(&[7, 8]));
    assert_eq!(graph.node_count(), 3 + 6);
    assert_path(&graph, &[0, 3, 4, 2]);
    assert_path(&graph, &[0, 3, 4, 1]);
    assert_path(&graph, &[2, 7, 8, 0]);
}

proptest! {
    #[test]
    fn every_path_has_its_requested_length(lengths in prop::collection::vec(1usize..6, 1..6)) {
        let mut graph = star(&lengths);
        let table: BTreeMap<EdgeTriple, usize> = lengths
            .iter()
            .enumerate()
            .map(|(idx, length)| (EdgeTriple::new(0, idx + 1, 0), *length))
            .collect();
        let summary = convert_edges(
            &mut graph,
            &EdgeSelection::All,
            &Lengths::PerEdge(table),
            &ExpandOptions::default(),
        )
        .unwrap();

        let longest = lengths.iter().copied().max().unwrap_or(1);
        prop_assert_eq!(summary.nodes_added(), longest - 1);
        for (idx, length) in lengths.iter().enumerate() {
            prop_assert_eq!(depth(&graph, &Label::from(0), &Label::from(idx + 1)), *length);
        }
    }
}
