//! Serializes a [`DotGraph`] back to DOT text that [`parse_dot_graph`] reads
//! into an equivalent graph.
//!
//! [`parse_dot_graph`]: crate::dot::parse_dot_graph

use tracing::debug;

use crate::attrs::Attributes;
use crate::dot::{DotEdge, DotGraph, DotVertexRef};
use crate::edge::Endpoints;

const INDENT: &str = "    ";

pub fn write_dot(graph: &DotGraph) -> String {
    let mut lines = vec!["digraph {".to_string()];
    let mut written: Vec<&DotVertexRef> = Vec::new();

    if !graph.attributes().is_empty() {
        lines.push(format!("{INDENT}graph {};", attribute_list(graph.attributes())));
    }
    for vertex in graph.vertices() {
        lines.push(format!("{INDENT}{}", vertex_statement(vertex)));
        written.push(vertex);
    }
    for subgraph in graph.subgraphs() {
        lines.push(format!("{INDENT}subgraph {} {{", quote(subgraph.name())));
        if !subgraph.attributes().is_empty() {
            lines.push(format!(
                "{INDENT}{INDENT}graph {};",
                attribute_list(subgraph.attributes())
            ));
        }
        for vertex in subgraph.vertices() {
            // A repeated mention only adds membership; attributes went out
            // with the first one.
            if written.contains(&vertex) {
                debug!(vertex = vertex.id(), subgraph = subgraph.name(), "vertex already written");
                lines.push(format!("{INDENT}{INDENT}{};", quote(vertex.id())));
                continue;
            }
            lines.push(format!("{INDENT}{INDENT}{}", vertex_statement(vertex)));
            written.push(vertex);
        }
        lines.push(format!("{INDENT}}}"));
    }
    for edge in graph.vertex_edges() {
        lines.push(format!("{INDENT}{}", edge_statement(edge)));
    }
    let skipped = graph.subgraph_edges().count();
    if skipped > 0 {
        debug!(skipped, "subgraph edges have no DOT form");
    }

    lines.push("}".to_string());
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn vertex_statement(vertex: &DotVertexRef) -> String {
    if vertex.attributes().is_empty() {
        format!("{};", quote(vertex.id()))
    } else {
        format!("{} {};", quote(vertex.id()), attribute_list(&vertex.attributes()))
    }
}

fn edge_statement(edge: &DotEdge) -> String {
    let mut statement = format!(
        "{} -> {}",
        endpoint(edge.source(), edge.source_port()),
        endpoint(edge.destination(), edge.destination_port())
    );
    if !edge.attributes().is_empty() {
        statement.push(' ');
        statement.push_str(&attribute_list(edge.attributes()));
    }
    statement.push(';');
    statement
}

fn endpoint(vertex: &DotVertexRef, port: Option<&str>) -> String {
    match port {
        Some(port) => format!("{}:{}", quote(vertex.id()), quote(port)),
        None => quote(vertex.id()),
    }
}

fn attribute_list(attributes: &Attributes) -> String {
    let pairs: Vec<String> = attributes
        .iter()
        .map(|(key, value)| format!("{}={}", quote(key), quote(value)))
        .collect();
    format!("[{}]", pairs.join(", "))
}

/// Quotes are escaped; a backslash is doubled so the output stays
/// parseable, although the reader drops it.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
