//! Plain-text rendering of graphs.

use netm_core::{Label, MultiGraph, NmError};

use crate::multigraph::MultiDiGraph;

/// Renders a padded ASCII table from rows of cells.
pub fn table(rows: &[Vec<String>], header: &[&str]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }
    let mut out = String::new();
    push_row(&mut out, header.iter().copied(), &widths);
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.zip(widths.iter().copied()) {
        out.push_str(&format!("{cell:<width$}|"));
    }
    out.push('\n');
}

/// Node, predecessors and successors for every node, one row per node.
pub fn print_graph(graph: &MultiDiGraph) -> Result<String, NmError> {
    let mut rows = Vec::with_capacity(graph.node_count());
    for node in graph.node_labels() {
        let join = |labels: Vec<Label>| {
            labels
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        rows.push(vec![
            node.to_string(),
            join(graph.predecessors(&node)?),
            join(graph.successors(&node)?),
        ]);
    }
    Ok(table(&rows, &["Node", "Predecessors", "Successors"]))
}
