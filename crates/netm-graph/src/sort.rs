//! Stable node/edge ordering and rank groups.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use netm_core::{EdgeId, EdgeTriple, Label, MultiGraph, NmError, NodeId, Rank, Sorting, Value};
use tracing::{debug, instrument};

use crate::multigraph::MultiDiGraph;
use crate::options::{EdgeCriterion, NodeCriterion, SortOptions};
use crate::relabel::{relabel_graph, Relabeling};

enum NodeAccessor<'a> {
    InDegree,
    OutDegree,
    Degree,
    Label,
    Attr(String),
    Func(&'a crate::options::NodeFn),
}

enum EdgeAccessor<'a> {
    Source,
    Target,
    Key,
    Attr(String),
    Func(&'a crate::options::EdgeFn),
}

struct NodeEntry {
    id: NodeId,
    label: Label,
    rank: Option<Rank>,
    key: Rank,
}

struct EdgeEntry {
    id: EdgeId,
    rank: Option<Rank>,
    key: Rank,
}

/// Reorders nodes and edges and records rank groups in `meta.sorting`.
///
/// Nodes are stably sorted by their `nodes_by` rank, then by `node_key`.
/// Edges are stably sorted by their `edges_by` rank, then by `edge_key`,
/// which defaults to `100 * rank(source) - 10 * rank(target)`. Content is
/// unchanged unless `relabel` is set, in which case nodes are renamed to
/// their ordinal position in the new order.
///
/// An unknown accessor name fails before the graph is touched.
#[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn sort_graph(graph: &mut MultiDiGraph, options: &SortOptions) -> Result<(), NmError> {
    let node_accessor = options
        .nodes_by
        .as_ref()
        .map(|criterion| resolve_node_accessor(criterion, &options.node_args))
        .transpose()?;
    let edge_accessor = options
        .edges_by
        .as_ref()
        .map(|criterion| resolve_edge_accessor(criterion, &options.edge_args))
        .transpose()?;

    let mut nodes = Vec::with_capacity(graph.node_count());
    for id in graph.node_ids() {
        let label = graph.label_of(id)?.clone();
        let rank = match &node_accessor {
            Some(accessor) => Some(node_rank(graph, accessor, &label, &options.node_args)?),
            None => None,
        };
        let key = match (&options.node_key, &rank) {
            (Some(node_key), rank) => node_key(&label, rank.as_ref().unwrap_or(&Rank::Missing)),
            (None, Some(rank)) => rank.last_element(),
            (None, None) => Rank::from(&label),
        };
        nodes.push(NodeEntry {
            id,
            label,
            rank,
            key,
        });
    }
    nodes.sort_by(|a, b| directed(compare(&a.rank, &a.key, &b.rank, &b.key), options.nodes_ascending));

    let node_ranks: BTreeMap<Label, Rank> = nodes
        .iter()
        .filter_map(|entry| entry.rank.clone().map(|rank| (entry.label.clone(), rank)))
        .collect();
    let mut edges = Vec::with_capacity(graph.edge_count());
    for id in graph.edge_ids() {
        let triple = graph.triple_of(id)?;
        let rank = match &edge_accessor {
            Some(accessor) => Some(edge_rank(graph, accessor, &triple, &options.edge_args)?),
            None => None,
        };
        let key = match &options.edge_key {
            Some(edge_key) => edge_key(&triple, rank.as_ref().unwrap_or(&Rank::Missing)),
            None if node_accessor.is_some() => default_edge_key(&triple, &node_ranks)?,
            None => Rank::Missing,
        };
        edges.push(EdgeEntry { id, rank, key });
    }
    edges.sort_by(|a, b| directed(compare(&a.rank, &a.key, &b.rank, &b.key), options.edges_ascending));

    let node_order: Vec<NodeId> = nodes.iter().map(|entry| entry.id).collect();
    let edge_order: Vec<EdgeId> = edges.iter().map(|entry| entry.id).collect();
    graph.rebuild_in_order(&node_order, &edge_order);

    let mut ranked: Vec<(Label, Rank)> = nodes
        .into_iter()
        .map(|entry| {
            let rank = entry.rank.unwrap_or(entry.key);
            (entry.label, rank)
        })
        .collect();

    if options.relabel {
        let mapping = ranked
            .iter()
            .enumerate()
            .map(|(position, (node, _))| (node.clone(), Label::from(position)))
            .collect();
        relabel_graph(graph, Some(Relabeling::Map(mapping)));
        if let Some(applied) = &graph.meta.inverse_mapping {
            for (node, _) in ranked.iter_mut() {
                if let Some(new) = applied.get(node) {
                    *node = new.clone();
                }
            }
        }
    }

    let sorting = Sorting::from_ranked(ranked);
    debug!(groups = sorting.len(), relabel = options.relabel, "graph sorted");
    graph.meta.sorting = Some(sorting);
    Ok(())
}

fn compare(rank_a: &Option<Rank>, key_a: &Rank, rank_b: &Option<Rank>, key_b: &Rank) -> Ordering {
    rank_a.cmp(rank_b).then_with(|| key_a.cmp(key_b))
}

fn directed(ordering: Ordering, ascending: bool) -> Ordering {
    if ascending {
        ordering
    } else {
        ordering.reverse()
    }
}

fn resolve_node_accessor<'a>(
    criterion: &'a NodeCriterion,
    args: &[Value],
) -> Result<NodeAccessor<'a>, NmError> {
    match criterion {
        NodeCriterion::Func(func) => Ok(NodeAccessor::Func(func)),
        NodeCriterion::Named(name) => match name.as_str() {
            "in_degree" => Ok(NodeAccessor::InDegree),
            "out_degree" => Ok(NodeAccessor::OutDegree),
            "degree" => Ok(NodeAccessor::Degree),
            "label" => Ok(NodeAccessor::Label),
            "attr" => attribute_name(args).map(NodeAccessor::Attr),
            other => Err(unknown_criterion(other, "in_degree, out_degree, degree, label, attr")),
        },
    }
}

fn resolve_edge_accessor<'a>(
    criterion: &'a EdgeCriterion,
    args: &[Value],
) -> Result<EdgeAccessor<'a>, NmError> {
    match criterion {
        EdgeCriterion::Func(func) => Ok(EdgeAccessor::Func(func)),
        EdgeCriterion::Named(name) => match name.as_str() {
            "source" => Ok(EdgeAccessor::Source),
            "target" => Ok(EdgeAccessor::Target),
            "key" => Ok(EdgeAccessor::Key),
            "attr" => attribute_name(args).map(EdgeAccessor::Attr),
            other => Err(unknown_criterion(other, "source, target, key, attr")),
        },
    }
}

fn node_rank(
    graph: &MultiDiGraph,
    accessor: &NodeAccessor<'_>,
    node: &Label,
    args: &[Value],
) -> Result<Rank, NmError> {
    Ok(match accessor {
        NodeAccessor::InDegree => Rank::from(graph.in_degree(node)?),
        NodeAccessor::OutDegree => Rank::from(graph.out_degree(node)?),
        NodeAccessor::Degree => Rank::from(graph.degree(node)?),
        NodeAccessor::Label => Rank::from(node),
        NodeAccessor::Attr(name) => graph
            .node_attrs(node)?
            .get(name)
            .map(Rank::from_value)
            .unwrap_or(Rank::Missing),
        NodeAccessor::Func(func) => func(graph, node, args)?,
    })
}

fn edge_rank(
    graph: &MultiDiGraph,
    accessor: &EdgeAccessor<'_>,
    edge: &EdgeTriple,
    args: &[Value],
) -> Result<Rank, NmError> {
    Ok(match accessor {
        EdgeAccessor::Source => Rank::from(&edge.source),
        EdgeAccessor::Target => Rank::from(&edge.target),
        EdgeAccessor::Key => Rank::from(&edge.key),
        EdgeAccessor::Attr(name) => graph
            .edge_attrs(edge)?
            .get(name)
            .map(Rank::from_value)
            .unwrap_or(Rank::Missing),
        EdgeAccessor::Func(func) => func(graph, edge, args)?,
    })
}

fn default_edge_key(edge: &EdgeTriple, ranks: &BTreeMap<Label, Rank>) -> Result<Rank, NmError> {
    let source = ranks.get(&edge.source).unwrap_or(&Rank::Missing);
    let target = ranks.get(&edge.target).unwrap_or(&Rank::Missing);
    if let (Rank::Int(s), Rank::Int(t)) = (source, target) {
        let exact = s
            .checked_mul(100)
            .zip(t.checked_mul(10))
            .and_then(|(a, b)| a.checked_sub(b));
        if let Some(score) = exact {
            return Ok(Rank::Int(score));
        }
    }
    match (source.as_f64(), target.as_f64()) {
        (Some(s), Some(t)) => Ok(Rank::Float(100.0 * s - 10.0 * t)),
        _ => Err(NmError::malformed(
            "non-numeric-rank",
            "default edge key needs numeric node ranks",
        )
        .with_context("edge", edge)
        .with_context("source_rank", source)
        .with_context("target_rank", target)
        .with_hint("supply an edge_key or a numeric nodes_by criterion")),
    }
}

fn attribute_name(args: &[Value]) -> Result<String, NmError> {
    args.first()
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            NmError::malformed("criterion-args", "`attr` needs an attribute name argument")
                .with_context("args", args.len())
        })
}

fn unknown_criterion(name: &str, known: &str) -> NmError {
    NmError::lookup("unknown-criterion", "no graph accessor with this name")
        .with_context("name", name)
        .with_hint(format!("known accessors: {known}"))
}
