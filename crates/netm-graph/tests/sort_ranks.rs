use std::collections::BTreeSet;

use netm_core::{Attrs, EdgeTriple, Label, MultiGraph, NmError, Rank, Value};
use netm_graph::{
    ring, sort_graph, EdgeCriterion, MultiDiGraph, NodeCriterion, RingOptions, SortConfig,
    SortOptions,
};
use proptest::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-degrees: node 0 has 2, node 1 has 1, node 2 has 0.
fn funnel() -> MultiDiGraph {
    MultiDiGraph::from_edges(
        [0, 1, 2],
        [
            (Label::from(1), Label::from(0)),
            (Label::from(2), Label::from(0)),
            (Label::from(2), Label::from(1)),
        ],
    )
    .unwrap()
}

#[test]
fn in_degree_groups_nodes_by_rank() {
    init_tracing();
    let mut graph = funnel();
    sort_graph(&mut graph, &SortOptions::default()).unwrap();

    let sorting = graph.meta().sorting.clone().unwrap();
    assert_eq!(sorting.len(), 3);
    assert_eq!(sorting.get(&Rank::Int(0)), Some(&[Label::from(2)][..]));
    assert_eq!(sorting.get(&Rank::Int(1)), Some(&[Label::from(1)][..]));
    assert_eq!(sorting.get(&Rank::Int(2)), Some(&[Label::from(0)][..]));
    assert_eq!(
        graph.node_labels(),
        vec![Label::from(2), Label::from(1), Label::from(0)]
    );
    // 100*r(s) - 10*r(t), descending: (1,0)=80, (2,1)=-10, (2,0)=-20.
    assert_eq!(
        graph.edge_triples(),
        vec![
            EdgeTriple::new(1, 0, 0),
            EdgeTriple::new(2, 1, 0),
            EdgeTriple::new(2, 0, 0),
        ]
    );
}

#[test]
fn relabel_renames_nodes_to_sorted_positions() {
    let mut graph = funnel();
    sort_graph(&mut graph, &SortOptions::default().relabel(true)).unwrap();

    assert_eq!(
        graph.node_labels(),
        vec![Label::from(0), Label::from(1), Label::from(2)]
    );
    let edges: BTreeSet<EdgeTriple> = graph.edge_triples().into_iter().collect();
    let expected: BTreeSet<EdgeTriple> = [
        EdgeTriple::new(1, 2, 0),
        EdgeTriple::new(0, 2, 0),
        EdgeTriple::new(0, 1, 0),
    ]
    .into_iter()
    .collect();
    assert_eq!(edges, expected);

    let sorting = graph.meta().sorting.clone().unwrap();
    assert_eq!(sorting.get(&Rank::Int(0)), Some(&[Label::from(0)][..]));
    assert_eq!(sorting.get(&Rank::Int(2)), Some(&[Label::from(2)][..]));
    assert_eq!(
        graph.meta().mapping.as_ref().unwrap()[&Label::from(0)],
        Label::from(2)
    );
}

#[test]
fn descending_nodes_reverse_the_groups() {
    let mut graph = funnel();
    sort_graph(&mut graph, &SortOptions::default().nodes_ascending(false)).unwrap();
    let ranks: Vec<Rank> = graph
        .meta()
        .sorting
        .as_ref()
        .unwrap()
        .groups()
        .iter()
        .map(|group| group.rank.clone())
        .collect();
    assert_eq!(ranks, vec![Rank::Int(2), Rank::Int(1), Rank::Int(0)]);
}

#[test]
fn unknown_accessor_fails_before_mutation() {
    let mut graph = funnel();
    let options = SortOptions::default().nodes_by(NodeCriterion::named("betweenness"));
    match sort_graph(&mut graph, &options).unwrap_err() {
        NmError::Lookup(info) => {
            assert_eq!(info.code, "unknown-criterion");
            assert_eq!(info.context.get("name"), Some(&"betweenness".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        graph.node_labels(),
        vec![Label::from(0), Label::from(1), Label::from(2)]
    );
    assert!(graph.meta().sorting.is_none());

    let options = SortOptions::default().edges_by(EdgeCriterion::named("weight"));
    assert_eq!(
        sort_graph(&mut graph, &options).unwrap_err().code(),
        "unknown-criterion"
    );
}

#[test]
fn attribute_criterion_reads_named_value() {
    let mut graph = funnel();
    for (node, score) in [(0, 5.5), (1, -1.0), (2, 3.0)] {
        let mut attrs = Attrs::new();
        attrs.insert("score".into(), Value::from(score));
        graph.add_node(Label::from(node), attrs).unwrap();
    }
    let mut options = SortOptions::default().nodes_by(NodeCriterion::named("attr"));
    options.node_args = vec![Value::from("score")];
    sort_graph(&mut graph, &options).unwrap();
    assert_eq!(
        graph.node_labels(),
        vec![Label::from(1), Label::from(2), Label::from(0)]
    );

    options.node_args.clear();
    assert_eq!(
        sort_graph(&mut graph, &options).unwrap_err().code(),
        "criterion-args"
    );
}

#[test]
fn edge_criterion_and_custom_key() {
    let mut graph = funnel();
    let options = SortOptions::default()
        .edges_by(EdgeCriterion::named("target"))
        .edges_ascending(true)
        .edge_key(|edge, _| Rank::from(&edge.source));
    sort_graph(&mut graph, &options).unwrap();
    assert_eq!(
        graph.edge_triples(),
        vec![
            EdgeTriple::new(1, 0, 0),
            EdgeTriple::new(2, 0, 0),
            EdgeTriple::new(2, 1, 0),
        ]
    );
}

#[test]
fn custom_node_function_and_key() {
    let mut graph = funnel();
    let options = SortOptions::default()
        .nodes_by(NodeCriterion::func(|graph, node, _| {
            Ok(Rank::Seq(vec![
                Rank::from(graph.out_degree(node)?),
                Rank::from(node),
            ]))
        }))
        .node_key(|node, _| Rank::from(node))
        .edge_key(|edge, _| Rank::from(&edge.key));
    sort_graph(&mut graph, &options).unwrap();
    // out-degrees: 0 -> 0, 1 -> 1, 2 -> 2
    assert_eq!(
        graph.node_labels(),
        vec![Label::from(0), Label::from(1), Label::from(2)]
    );
    assert_eq!(graph.meta().sorting.as_ref().unwrap().len(), 3);
}

#[test]
fn no_node_criterion_keeps_edge_order() {
    let mut graph = ring(RingOptions {
        nodes: 4,
        left: true,
        right: true,
        self_loops: false,
    })
    .unwrap();
    let before = graph.edge_triples();
    let options = SortOptions {
        nodes_by: None,
        nodes_ascending: false,
        ..SortOptions::default()
    };
    sort_graph(&mut graph, &options).unwrap();
    assert_eq!(graph.edge_triples(), before);
    assert_eq!(
        graph.node_labels(),
        vec![Label::from(3), Label::from(2), Label::from(1), Label::from(0)]
    );
}

#[test]
fn textual_ranks_need_an_edge_key() {
    let mut graph = MultiDiGraph::from_edges(
        ["a", "b"],
        [(Label::from("a"), Label::from("b"))],
    )
    .unwrap();
    let options = SortOptions::default().nodes_by(NodeCriterion::named("label"));
    match sort_graph(&mut graph, &options).unwrap_err() {
        NmError::Malformed(info) => assert_eq!(info.code, "non-numeric-rank"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(graph.meta().sorting.is_none());
}

#[test]
fn config_from_json_fills_defaults() {
    let config = SortConfig::from_json(r#"{"nodes_by": "out_degree", "relabel": true}"#).unwrap();
    assert_eq!(config.nodes_by.as_deref(), Some("out_degree"));
    assert!(config.nodes_ascending);
    assert!(!config.edges_ascending);
    assert!(config.relabel);

    let mut graph = funnel();
    sort_graph(&mut graph, &config.into_options()).unwrap();
    assert_eq!(graph.node_labels()[0], Label::from(0));

    let err = SortConfig::from_json("{\"relabel\": \"yes\"}").unwrap_err();
    assert_eq!(err.code(), "sort-config");
}

proptest! {
    #[test]
    fn rank_groups_partition_the_nodes(
        edges in prop::collection::vec((0i64..8, 0i64..8), 0..30),
        criterion in prop::sample::select(vec!["in_degree", "out_degree", "degree", "label"]),
    ) {
        let pairs = edges.iter().map(|(s, t)| (Label::from(*s), Label::from(*t)));
        let mut graph = MultiDiGraph::from_edges(0i64..8, pairs).unwrap();
        let edge_count = graph.edge_count();
        let options = SortOptions::default().nodes_by(NodeCriterion::named(criterion));
        sort_graph(&mut graph, &options).unwrap();

        let sorting = graph.meta().sorting.clone().unwrap();
        let members: Vec<Label> = sorting.members().cloned().collect();
        let unique: BTreeSet<Label> = members.iter().cloned().collect();
        let nodes: BTreeSet<Label> = graph.node_labels().into_iter().collect();
        prop_assert_eq!(members.len(), graph.node_count());
        prop_assert_eq!(unique, nodes);
        prop_assert_eq!(graph.edge_count(), edge_count);
        let ranks: Vec<Rank> = sorting.groups().iter().map(|group| group.rank.clone()).collect();
        prop_assert!(ranks.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
