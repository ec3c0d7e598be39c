pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("syntax error in DOT graph: {message}")]
    Syntax { message: String },
}

/// Contract violations reported by [`crate::graph::Graph`] mutations.
///
/// A call that returns one of these has not changed the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("add_vertex: vertex is already in the graph")]
    DuplicateVertex,

    #[error("add_edge: edge's {0} does not belong to the graph")]
    MissingEndpoint(EdgeEnd),

    #[error("add_subgraph_edge: edge's {0} is not a subgraph of the graph")]
    MissingSubGraphEndpoint(EdgeEnd),

    #[error("remove_vertex: given vertex is not a top-level vertex of the graph")]
    VertexNotTopLevel,

    #[error("remove_vertex_with_edges: given vertex is not part of the graph nor of any of its subgraphs")]
    VertexNotFound,

    #[error("remove_edge: given edge is not part of the graph")]
    EdgeNotFound,

    #[error("remove_subgraph: given subgraph is not part of the graph")]
    SubGraphNotFound,

    #[error("end_changes called without a matching start_changes")]
    UnbalancedChanges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    Source,
    Destination,
}

impl std::fmt::Display for EdgeEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeEnd::Source => f.write_str("source"),
            EdgeEnd::Destination => f.write_str("destination"),
        }
    }
}
