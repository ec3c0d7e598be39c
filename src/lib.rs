pub mod attrs;
pub mod builder;
pub mod dot;
pub mod dot_ast;
pub mod dot_parser;
pub mod dot_writer;
pub mod edge;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod notify;
pub mod subgraph;

pub use attrs::{Attributes, RankDirection};
pub use builder::{FromEndpoints, FromName, GraphBuilder, GraphEvents, VertexFactory, unquote};
pub use dot::{DotEdge, DotGraph, DotSubGraph, DotVertex, DotVertexFactory, DotVertexRef, parse_dot_graph};
pub use dot_parser::parse_dot;
pub use dot_writer::write_dot;
pub use edge::{Edge, Endpoints};
pub use error::{EdgeEnd, Error, GraphError, Result};
pub use geometry::{BoundingBox, Point};
pub use graph::{Graph, GraphEdge, SubGraphId};
pub use notify::{ChangeBatch, ChangeNotifier, GraphChanged, SubscriptionId};
pub use subgraph::{AsSubGraph, SubGraph};

/// One-paragraph description of a parsed graph, as the CLI prints it.
pub fn summarize(graph: &DotGraph) -> String {
    let mut lines = vec![
        format!("vertices: {}", graph.all_vertices().count()),
        format!("subgraphs: {}", graph.subgraphs().count()),
        format!("edges: {}", graph.edges().len()),
        format!("rankdir: {}", graph.rank_direction()),
    ];
    if let (Some(width), Some(height)) = (graph.width(), graph.height()) {
        lines.push(format!("size: {width}x{height}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn summarize_counts_elements() {
        let graph = parse_dot_graph(
            "digraph { bb=\"0,0,72.5,36\"; subgraph s { a; b } c; a -> b; b -> c }",
        )
        .unwrap();
        assert_eq!(
            summarize(&graph),
            "vertices: 3\nsubgraphs: 1\nedges: 2\nrankdir: LR\nsize: 72.5x36"
        );
    }

    #[test]
    fn summarize_omits_unknown_size() {
        let graph = parse_dot_graph("graph { a }").unwrap();
        assert_eq!(
            summarize(&graph),
            "vertices: 1\nsubgraphs: 0\nedges: 0\nrankdir: LR"
        );
    }

    #[test]
    fn syntax_error_is_reported() {
        let err = parse_dot_graph("digraph { a -> }").unwrap_err();
        assert!(
            err.to_string().starts_with("syntax error in DOT graph"),
            "got: {err}"
        );
    }
}
