//! Attribute columns and equality filters over a graph.

use std::collections::{BTreeMap, BTreeSet};

use netm_core::{Attrs, EdgeTriple, Label, Value};

use crate::multigraph::MultiDiGraph;

/// Attribute names used by at least one node, sorted.
pub fn node_attr_names(graph: &MultiDiGraph) -> Vec<String> {
    collect_names(graph.nodes_with_attrs().map(|(_, attrs)| attrs))
}

/// Attribute names used by at least one edge, sorted.
pub fn edge_attr_names(graph: &MultiDiGraph) -> Vec<String> {
    collect_names(graph.edges_with_attrs().map(|(_, attrs)| attrs))
}

/// One column per requested attribute, aligned with node order.
///
/// Nodes lacking an attribute contribute `null`. With no names, every
/// attribute in use is returned.
pub fn node_data(graph: &MultiDiGraph, names: &[&str]) -> BTreeMap<String, Vec<Value>> {
    let names = requested(names, || node_attr_names(graph));
    columns(&names, graph.nodes_with_attrs().map(|(_, attrs)| attrs))
}

/// One column per requested attribute, aligned with edge order.
pub fn edge_data(graph: &MultiDiGraph, names: &[&str]) -> BTreeMap<String, Vec<Value>> {
    let names = requested(names, || edge_attr_names(graph));
    columns(&names, graph.edges_with_attrs().map(|(_, attrs)| attrs))
}

/// Nodes whose attributes equal every entry of `criteria`, in node order.
pub fn nodes_where(graph: &MultiDiGraph, criteria: &Attrs) -> Vec<Label> {
    graph
        .nodes_with_attrs()
        .filter(|(_, attrs)| matches_all(attrs, criteria))
        .map(|(node, _)| node.clone())
        .collect()
}

/// Edges whose attributes equal every entry of `criteria`, in edge order.
pub fn edges_where(graph: &MultiDiGraph, criteria: &Attrs) -> Vec<EdgeTriple> {
    graph
        .edges_with_attrs()
        .filter(|(_, attrs)| matches_all(attrs, criteria))
        .map(|(edge, _)| edge)
        .collect()
}

fn collect_names<'a>(maps: impl Iterator<Item = &'a Attrs>) -> Vec<String> {
    let names: BTreeSet<&String> = maps.flat_map(|attrs| attrs.keys()).collect();
    names.into_iter().cloned().collect()
}

fn requested(names: &[&str], all: impl FnOnce() -> Vec<String>) -> Vec<String> {
    if names.is_empty() {
        all()
    } else {
        names.iter().map(|name| name.to_string()).collect()
    }
}

fn columns<'a>(
    names: &[String],
    maps: impl Iterator<Item = &'a Attrs>,
) -> BTreeMap<String, Vec<Value>> {
    let mut out: BTreeMap<String, Vec<Value>> =
        names.iter().map(|name| (name.clone(), Vec::new())).collect();
    for attrs in maps {
        for (name, column) in out.iter_mut() {
            column.push(attrs.get(name).cloned().unwrap_or(Value::Null));
        }
    }
    out
}

fn matches_all(attrs: &Attrs, criteria: &Attrs) -> bool {
    !criteria.is_empty()
        && criteria
            .iter()
            .all(|(name, expected)| attrs.get(name) == Some(expected))
}
