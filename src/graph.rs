use std::fmt;

use crate::attrs::{self, Attributes, RankDirection};
use crate::edge::{Edge, Endpoints};
use crate::error::{EdgeEnd, GraphError};
use crate::notify::{ChangeBatch, ChangeNotifier, SubscriptionId};
use crate::subgraph::{AsSubGraph, SubGraph};

/// Stable handle to a subgraph owned by a [`Graph`]. Subgraph-to-subgraph
/// edges refer to their endpoints through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubGraphId(usize);

impl fmt::Display for SubGraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subgraph#{}", self.0)
    }
}

/// An entry of the combined edge sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphEdge<VE, SGE> {
    Vertices(VE),
    SubGraphs(SGE),
}

impl<VE: fmt::Display, SGE: fmt::Display> fmt::Display for GraphEdge<VE, SGE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphEdge::Vertices(e) => write!(f, "{e}"),
            GraphEdge::SubGraphs(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Debug)]
struct SubGraphEntry<SG> {
    id: SubGraphId,
    subgraph: SG,
    forwarding: SubscriptionId,
}

/// Attributed graph of top-level vertices, flat subgraphs and edges.
///
/// Every mutation checks its preconditions first and returns a
/// [`GraphError`] without touching the graph when they do not hold.
/// Successful mutations raise [`Graph::changed`], as do mutations of an
/// attached subgraph.
#[derive(Debug)]
pub struct Graph<V, SG = SubGraph<V>, VE = Edge<V>, SGE = Edge<SubGraphId>> {
    vertices: Vec<V>,
    subgraphs: Vec<SubGraphEntry<SG>>,
    edges: Vec<GraphEdge<VE, SGE>>,
    attributes: Attributes,
    changed: ChangeNotifier,
    next_subgraph: usize,
}

impl<V, SG, VE, SGE> Default for Graph<V, SG, VE, SGE> {
    fn default() -> Self {
        Graph {
            vertices: Vec::new(),
            subgraphs: Vec::new(),
            edges: Vec::new(),
            attributes: Attributes::new(),
            changed: ChangeNotifier::new(),
            next_subgraph: 0,
        }
    }
}

impl<V, SG, VE, SGE> Graph<V, SG, VE, SGE> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level vertices only; see [`Graph::all_vertices`].
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn subgraphs(&self) -> impl Iterator<Item = &SG> {
        self.subgraphs.iter().map(|e| &e.subgraph)
    }

    pub fn subgraph_ids(&self) -> impl Iterator<Item = SubGraphId> + '_ {
        self.subgraphs.iter().map(|e| e.id)
    }

    pub fn subgraph(&self, id: SubGraphId) -> Option<&SG> {
        self.subgraphs
            .iter()
            .find(|e| e.id == id)
            .map(|e| &e.subgraph)
    }

    /// Mutations made through this reference still reach [`Graph::changed`].
    pub fn subgraph_mut(&mut self, id: SubGraphId) -> Option<&mut SG> {
        self.subgraphs
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| &mut e.subgraph)
    }

    pub fn contains_subgraph(&self, id: SubGraphId) -> bool {
        self.subgraphs.iter().any(|e| e.id == id)
    }

    /// Vertex edges and subgraph edges, in insertion order.
    pub fn edges(&self) -> &[GraphEdge<VE, SGE>] {
        &self.edges
    }

    pub fn vertex_edges(&self) -> impl Iterator<Item = &VE> {
        self.edges.iter().filter_map(|e| match e {
            GraphEdge::Vertices(e) => Some(e),
            GraphEdge::SubGraphs(_) => None,
        })
    }

    pub fn subgraph_edges(&self) -> impl Iterator<Item = &SGE> {
        self.edges.iter().filter_map(|e| match e {
            GraphEdge::SubGraphs(e) => Some(e),
            GraphEdge::Vertices(_) => None,
        })
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn changed(&self) -> &ChangeNotifier {
        &self.changed
    }

    pub fn start_changes(&self) {
        self.changed.start_changes();
    }

    pub fn end_changes(&self) -> Result<(), GraphError> {
        self.changed.end_changes()
    }

    /// Groups every change made while the guard lives into one notification.
    pub fn batch(&self) -> ChangeBatch {
        self.changed.batch()
    }

    /// Height/width ratio requested from the layout engine.
    pub fn ratio(&self) -> Option<f64> {
        attrs::get_f64(&self.attributes, "ratio")
    }

    pub fn set_ratio(&mut self, ratio: Option<f64>) {
        attrs::set_f64(&mut self.attributes, "ratio", ratio);
    }

    pub fn rank_direction(&self) -> RankDirection {
        attrs::get_enum(&self.attributes, "rankdir", RankDirection::default())
    }

    pub fn set_rank_direction(&mut self, direction: RankDirection) {
        self.attributes
            .insert("rankdir".to_string(), direction.to_string());
    }

    pub fn add_subgraph(&mut self, subgraph: SG) -> SubGraphId
    where
        SG: AsSubGraph<V>,
    {
        let id = SubGraphId(self.next_subgraph);
        self.next_subgraph += 1;
        let graph_changed = self.changed.clone();
        let forwarding = subgraph
            .as_sub_graph()
            .changed()
            .subscribe(move |_| graph_changed.raise());
        self.subgraphs.push(SubGraphEntry {
            id,
            subgraph,
            forwarding,
        });
        self.changed.raise();
        id
    }

    /// Detaches the subgraph and hands it back. Edges that refer to it are
    /// kept.
    pub fn remove_subgraph(&mut self, id: SubGraphId) -> Result<SG, GraphError>
    where
        SG: AsSubGraph<V>,
    {
        let index = self
            .subgraphs
            .iter()
            .position(|e| e.id == id)
            .ok_or(GraphError::SubGraphNotFound)?;
        let entry = self.subgraphs.remove(index);
        entry
            .subgraph
            .as_sub_graph()
            .changed()
            .unsubscribe(entry.forwarding);
        self.changed.raise();
        Ok(entry.subgraph)
    }

    pub fn add_subgraph_edge(&mut self, edge: SGE) -> Result<(), GraphError>
    where
        SGE: Endpoints<SubGraphId>,
    {
        if !self.contains_subgraph(*edge.source()) {
            return Err(GraphError::MissingSubGraphEndpoint(EdgeEnd::Source));
        }
        if !self.contains_subgraph(*edge.destination()) {
            return Err(GraphError::MissingSubGraphEndpoint(EdgeEnd::Destination));
        }
        self.edges.push(GraphEdge::SubGraphs(edge));
        self.changed.raise();
        Ok(())
    }

    pub fn remove_edge(&mut self, edge: &GraphEdge<VE, SGE>) -> Result<GraphEdge<VE, SGE>, GraphError>
    where
        VE: PartialEq,
        SGE: PartialEq,
    {
        let index = self
            .edges
            .iter()
            .position(|e| e == edge)
            .ok_or(GraphError::EdgeNotFound)?;
        let removed = self.edges.remove(index);
        self.changed.raise();
        Ok(removed)
    }
}

impl<V, SG, VE, SGE> Graph<V, SG, VE, SGE>
where
    V: PartialEq,
    SG: AsSubGraph<V>,
{
    /// Top-level vertices followed by each subgraph's vertices, in subgraph
    /// insertion order.
    pub fn all_vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.iter().chain(
            self.subgraphs
                .iter()
                .flat_map(|e| e.subgraph.as_sub_graph().vertices().iter()),
        )
    }

    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.all_vertices().any(|v| v == vertex)
    }

    pub fn add_vertex(&mut self, vertex: V) -> Result<(), GraphError> {
        if self.contains_vertex(&vertex) {
            return Err(GraphError::DuplicateVertex);
        }
        self.vertices.push(vertex);
        self.changed.raise();
        Ok(())
    }

    pub fn add_edge(&mut self, edge: VE) -> Result<(), GraphError>
    where
        VE: Endpoints<V>,
    {
        if !self.contains_vertex(edge.source()) {
            return Err(GraphError::MissingEndpoint(EdgeEnd::Source));
        }
        if !self.contains_vertex(edge.destination()) {
            return Err(GraphError::MissingEndpoint(EdgeEnd::Destination));
        }
        self.edges.push(GraphEdge::Vertices(edge));
        self.changed.raise();
        Ok(())
    }

    /// Removes a top-level vertex. Vertices inside subgraphs are only
    /// reachable through [`Graph::remove_vertex_with_edges`].
    pub fn remove_vertex(&mut self, vertex: &V) -> Result<V, GraphError> {
        let index = self
            .vertices
            .iter()
            .position(|v| v == vertex)
            .ok_or(GraphError::VertexNotTopLevel)?;
        let removed = self.vertices.remove(index);
        self.changed.raise();
        Ok(removed)
    }

    /// Removes `vertex` from the top level or from the subgraphs holding it,
    /// then every vertex edge that starts or ends at it. Observers see a
    /// single change.
    pub fn remove_vertex_with_edges(&mut self, vertex: &V) -> Result<(), GraphError>
    where
        VE: Endpoints<V>,
    {
        let top_level = self.vertices.iter().any(|v| v == vertex);
        if !top_level && !self.contains_vertex(vertex) {
            return Err(GraphError::VertexNotFound);
        }

        let _batch = self.batch();
        if top_level {
            self.remove_vertex(vertex)?;
        } else {
            for entry in &mut self.subgraphs {
                let subgraph = entry.subgraph.as_sub_graph_mut();
                if subgraph.vertices().contains(vertex) {
                    subgraph.remove_vertex(vertex)?;
                }
            }
        }
        self.remove_edges_with(vertex);
        Ok(())
    }

    fn remove_edges_with(&mut self, vertex: &V)
    where
        VE: Endpoints<V>,
    {
        let before = self.edges.len();
        self.edges.retain(|e| match e {
            GraphEdge::Vertices(e) => !e.touches(vertex),
            GraphEdge::SubGraphs(_) => true,
        });
        if self.edges.len() != before {
            self.changed.raise();
        }
    }
}

impl<V, SG, VE, SGE> fmt::Display for Graph<V, SG, VE, SGE>
where
    V: fmt::Display,
    SG: fmt::Display,
    VE: fmt::Display,
    SGE: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "graph:")?;
        for vertex in &self.vertices {
            writeln!(f, "{vertex}")?;
        }
        for entry in &self.subgraphs {
            write!(f, "{}", entry.subgraph)?;
        }
        for edge in &self.edges {
            writeln!(f, "{edge}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    type TestGraph = Graph<&'static str>;

    fn counting(graph: &TestGraph) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        graph.changed().subscribe(move |_| c.set(c.get() + 1));
        count
    }

    fn sample() -> (TestGraph, SubGraphId) {
        let mut graph = TestGraph::new();
        graph.add_vertex("a").unwrap();
        graph.add_vertex("b").unwrap();
        let sg = graph.add_subgraph(SubGraph::new());
        graph.subgraph_mut(sg).unwrap().add_vertex("c");
        graph.add_edge(Edge::new("a", "b")).unwrap();
        graph.add_edge(Edge::new("b", "c")).unwrap();
        (graph, sg)
    }

    fn vertex_edge_pairs(graph: &TestGraph) -> Vec<(&str, &str)> {
        graph
            .vertex_edges()
            .map(|e| (*e.source(), *e.destination()))
            .collect()
    }

    #[test]
    fn add_vertex_fires_once() {
        let mut graph = TestGraph::new();
        let count = counting(&graph);
        graph.add_vertex("a").unwrap();
        assert_eq!(graph.all_vertices().filter(|v| **v == "a").count(), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn duplicate_vertex_is_rejected() {
        let mut graph = TestGraph::new();
        graph.add_vertex("a").unwrap();
        assert_eq!(graph.add_vertex("a"), Err(GraphError::DuplicateVertex));
        assert_eq!(graph.vertices().len(), 1);
    }

    #[test]
    fn vertex_already_in_subgraph_is_rejected_at_top_level() {
        let (mut graph, _) = sample();
        assert_eq!(graph.add_vertex("c"), Err(GraphError::DuplicateVertex));
    }

    #[test]
    fn all_vertices_flattens_subgraphs_in_order() {
        let (mut graph, _) = sample();
        let second = graph.add_subgraph(SubGraph::new());
        graph.subgraph_mut(second).unwrap().add_vertex("d");
        let all: Vec<_> = graph.all_vertices().copied().collect();
        assert_eq!(all, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn edge_endpoints_must_be_in_graph() {
        let (mut graph, _) = sample();
        let count = counting(&graph);
        assert_eq!(
            graph.add_edge(Edge::new("x", "a")),
            Err(GraphError::MissingEndpoint(EdgeEnd::Source))
        );
        assert_eq!(
            graph.add_edge(Edge::new("a", "x")),
            Err(GraphError::MissingEndpoint(EdgeEnd::Destination))
        );
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn subgraph_edges_need_member_subgraphs() {
        let (mut graph, first) = sample();
        let second = graph.add_subgraph(SubGraph::new());
        graph.add_subgraph_edge(Edge::new(first, second)).unwrap();
        assert_eq!(graph.subgraph_edges().count(), 1);
        assert_eq!(graph.vertex_edges().count(), 2);
        assert_eq!(graph.edges().len(), 3);

        let detached = graph.remove_subgraph(second).unwrap();
        assert_eq!(detached.vertices().len(), 0);
        assert_eq!(
            graph.add_subgraph_edge(Edge::new(first, second)),
            Err(GraphError::MissingSubGraphEndpoint(EdgeEnd::Destination))
        );
    }

    #[test]
    fn subgraph_changes_are_forwarded() {
        let (mut graph, sg) = sample();
        let count = counting(&graph);
        graph.subgraph_mut(sg).unwrap().add_vertex("d");
        assert_eq!(count.get(), 1);
        graph.subgraph_mut(sg).unwrap().set_label("group");
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn removed_subgraph_stops_forwarding() {
        let (mut graph, sg) = sample();
        let mut detached = graph.remove_subgraph(sg).unwrap();
        let count = counting(&graph);
        detached.add_vertex("z");
        assert_eq!(count.get(), 0);
        assert_eq!(graph.remove_subgraph(sg).err(), Some(GraphError::SubGraphNotFound));
    }

    #[test]
    fn add_subgraph_fires() {
        let mut graph = TestGraph::new();
        let count = counting(&graph);
        graph.add_subgraph(SubGraph::new());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn remove_vertex_only_at_top_level() {
        let (mut graph, _) = sample();
        assert_eq!(graph.remove_vertex(&"c"), Err(GraphError::VertexNotTopLevel));
        assert_eq!(graph.remove_vertex(&"a"), Ok("a"));
        assert_eq!(graph.vertices(), &["b"]);
    }

    #[test]
    fn remove_edge_matches_by_endpoints() {
        let (mut graph, _) = sample();
        let mut relabelled = Edge::new("a", "b");
        relabelled.set_label("ignored");
        graph.remove_edge(&GraphEdge::Vertices(relabelled)).unwrap();
        assert_eq!(vertex_edge_pairs(&graph), vec![("b", "c")]);
        assert_eq!(
            graph.remove_edge(&GraphEdge::Vertices(Edge::new("a", "b"))),
            Err(GraphError::EdgeNotFound)
        );
    }

    #[test]
    fn remove_top_level_vertex_with_edges() {
        let (mut graph, _) = sample();
        graph.remove_vertex_with_edges(&"a").unwrap();
        assert_eq!(graph.vertices(), &["b"]);
        assert_eq!(vertex_edge_pairs(&graph), vec![("b", "c")]);
    }

    #[test]
    fn remove_subgraph_vertex_with_edges() {
        let (mut graph, sg) = sample();
        graph.remove_vertex_with_edges(&"c").unwrap();
        assert_eq!(graph.vertices(), &["a", "b"]);
        assert_eq!(graph.subgraph(sg).unwrap().vertices().len(), 0);
        assert_eq!(vertex_edge_pairs(&graph), vec![("a", "b")]);
    }

    #[test]
    fn remove_vertex_with_edges_fires_once() {
        let (mut graph, _) = sample();
        let count = counting(&graph);
        graph.remove_vertex_with_edges(&"b").unwrap();
        assert_eq!(count.get(), 1);
        assert_eq!(graph.edges().len(), 0);
    }

    #[test]
    fn remove_unknown_vertex_with_edges_fails_cleanly() {
        let (mut graph, _) = sample();
        let count = counting(&graph);
        assert_eq!(
            graph.remove_vertex_with_edges(&"zz"),
            Err(GraphError::VertexNotFound)
        );
        assert_eq!(count.get(), 0);
        assert!(!graph.changed().is_batching());
        assert_eq!(graph.edges().len(), 2);
    }

    #[test]
    fn explicit_batch_collapses_notifications() {
        let mut graph = TestGraph::new();
        let count = counting(&graph);
        graph.start_changes();
        graph.add_vertex("a").unwrap();
        graph.add_vertex("b").unwrap();
        graph.add_edge(Edge::new("a", "b")).unwrap();
        assert_eq!(count.get(), 0);
        graph.end_changes().unwrap();
        assert_eq!(count.get(), 1);
        assert_eq!(graph.end_changes(), Err(GraphError::UnbalancedChanges));
    }

    #[test]
    fn ratio_and_rank_direction_views() {
        let mut graph = TestGraph::new();
        assert_eq!(graph.ratio(), None);
        assert_eq!(graph.rank_direction(), RankDirection::LeftToRight);
        graph.set_ratio(Some(0.75));
        graph.set_rank_direction(RankDirection::TopToBottom);
        assert_eq!(graph.attributes()["ratio"], "0.75");
        assert_eq!(graph.attributes()["rankdir"], "TB");
        assert_eq!(graph.ratio(), Some(0.75));
        assert_eq!(graph.rank_direction(), RankDirection::TopToBottom);
        graph.attributes_mut().insert("ratio".into(), "fill".into());
        assert_eq!(graph.ratio(), None);
    }

    #[test]
    fn display_lists_everything() {
        let (graph, _) = sample();
        let text = graph.to_string();
        assert!(text.starts_with("graph:\na\nb\n"), "got: {text}");
        assert!(text.contains("subgraph: \n\tc\n"), "got: {text}");
        assert!(text.contains("a -- b []"), "got: {text}");
        assert!(text.contains("b -- c []"), "got: {text}");
    }
}
