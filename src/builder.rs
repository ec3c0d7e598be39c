//! Incremental graph construction driven by grammar callbacks.
//!
//! A parser reports what it finds through [`GraphEvents`], in source order.
//! [`GraphBuilder`] turns those callbacks into [`Graph`] mutations. How an
//! identifier becomes a vertex is left to a [`VertexFactory`].

use tracing::{debug, warn};

use crate::attrs::Attributes;
use crate::edge::{Edge, Endpoints};
use crate::error::GraphError;
use crate::graph::{Graph, SubGraphId};
use crate::subgraph::{AsSubGraph, SubGraph};

/// Callbacks a graph grammar emits while scanning its input.
pub trait GraphEvents {
    type Error;

    fn enter_subgraph(&mut self, name: &str);

    fn leave_subgraph(&mut self);

    fn add_graph_attributes(&mut self, attributes: Option<Attributes>);

    fn add_vertex(&mut self, id: &str, attributes: Option<Attributes>) -> Result<(), Self::Error>;

    fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        attributes: Option<Attributes>,
    ) -> Result<(), Self::Error>;
}

/// Turns raw identifiers into vertices.
pub trait VertexFactory<V> {
    /// Called once per newly declared identifier.
    fn create_vertex(&mut self, id: &str, attributes: Attributes) -> V;

    /// Called for edge endpoints. Must create the vertex when `id` has not
    /// been seen yet, since an edge may be the first mention of a vertex.
    fn get_vertex(&mut self, id: &str) -> V;

    /// The vertex already made for `id`, if any. Never creates one.
    fn find_vertex(&self, id: &str) -> Option<V>;

    /// Applies the attributes of a repeated declaration to a known vertex.
    /// Later values for a key win.
    fn update_vertex(&mut self, vertex: &V, attributes: Attributes);
}

pub trait FromName {
    fn from_name(name: &str) -> Self;
}

impl<V> FromName for SubGraph<V> {
    fn from_name(name: &str) -> Self {
        SubGraph::named(name)
    }
}

pub trait FromEndpoints<T> {
    fn from_endpoints(source: T, destination: T, attributes: Attributes) -> Self;
}

impl<T> FromEndpoints<T> for Edge<T> {
    fn from_endpoints(source: T, destination: T, attributes: Attributes) -> Self {
        Edge::with_attributes(source, destination, attributes)
    }
}

/// Feeds [`GraphEvents`] into a [`Graph`].
///
/// Vertex declarations and graph attributes go to the current scope: the
/// subgraph being populated, or the graph itself. Edges always go to the
/// graph. There is one level of scope only; `leave_subgraph` returns to the
/// top level no matter how many `enter_subgraph` calls came before.
///
/// Declaring a vertex that is already in the graph merges its attributes
/// instead of adding it again. Inside a subgraph the vertex also becomes a
/// member of that subgraph, leaving the top level if it was there.
pub struct GraphBuilder<'g, V, SG, VE, SGE, F> {
    graph: &'g mut Graph<V, SG, VE, SGE>,
    factory: F,
    current: Option<SubGraphId>,
}

impl<'g, V, SG, VE, SGE, F> GraphBuilder<'g, V, SG, VE, SGE, F>
where
    V: PartialEq,
    SG: AsSubGraph<V> + FromName,
    VE: Endpoints<V> + FromEndpoints<V>,
    F: VertexFactory<V>,
{
    pub fn new(graph: &'g mut Graph<V, SG, VE, SGE>, factory: F) -> Self {
        GraphBuilder {
            graph,
            factory,
            current: None,
        }
    }

    pub fn graph(&self) -> &Graph<V, SG, VE, SGE> {
        self.graph
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn current_subgraph(&self) -> Option<SubGraphId> {
        self.current
    }

    pub fn into_factory(self) -> F {
        self.factory
    }

    /// The subgraph in scope, if it is still attached to the graph.
    fn scope_mut(&mut self) -> Option<&mut SubGraph<V>> {
        let id = self.current?;
        match self.graph.subgraph_mut(id) {
            Some(sg) => Some(sg.as_sub_graph_mut()),
            None => {
                warn!(%id, "current subgraph was removed from the graph, using top level");
                None
            }
        }
    }

    fn add_to_scope(&mut self, vertex: V) -> Result<(), GraphError> {
        match self.scope_mut() {
            Some(subgraph) => {
                subgraph.add_vertex(vertex);
                Ok(())
            }
            None => self.graph.add_vertex(vertex),
        }
    }

    /// Membership part of a redeclaration.
    fn join_scope(&mut self, vertex: V) -> Result<(), GraphError>
    where
        V: Clone,
    {
        let Some(scope) = self.current else {
            return Ok(());
        };
        let in_scope = match self.graph.subgraph(scope) {
            Some(sg) => sg.as_sub_graph().vertices().contains(&vertex),
            None => {
                warn!(%scope, "current subgraph was removed from the graph, using top level");
                return Ok(());
            }
        };
        if in_scope {
            return Ok(());
        }
        let top_level = self.graph.vertices().contains(&vertex);
        let _batch = self.graph.batch();
        self.add_to_scope(vertex.clone())?;
        if top_level {
            self.graph.remove_vertex(&vertex)?;
        }
        Ok(())
    }

    fn resolve(&mut self, id: &str) -> Result<V, GraphError>
    where
        V: Clone,
    {
        let vertex = self.factory.get_vertex(id);
        if !self.graph.contains_vertex(&vertex) {
            debug!(id, "implicit vertex declaration");
            self.add_to_scope(vertex.clone())?;
        }
        Ok(vertex)
    }
}

impl<V, SG, VE, SGE, F> GraphEvents for GraphBuilder<'_, V, SG, VE, SGE, F>
where
    V: PartialEq + Clone,
    SG: AsSubGraph<V> + FromName,
    VE: Endpoints<V> + FromEndpoints<V>,
    F: VertexFactory<V>,
{
    type Error = GraphError;

    fn enter_subgraph(&mut self, name: &str) {
        debug!(name, "enter subgraph");
        let id = self.graph.add_subgraph(SG::from_name(name));
        self.current = Some(id);
    }

    fn leave_subgraph(&mut self) {
        if self.current.take().is_none() {
            warn!("leave_subgraph called at top level");
        }
    }

    fn add_graph_attributes(&mut self, attributes: Option<Attributes>) {
        let Some(attributes) = attributes.filter(|a| !a.is_empty()) else {
            return;
        };
        match self.scope_mut() {
            Some(subgraph) => subgraph.attributes_mut().extend(attributes),
            None => self.graph.attributes_mut().extend(attributes),
        }
    }

    fn add_vertex(&mut self, id: &str, attributes: Option<Attributes>) -> Result<(), GraphError> {
        let attributes = attributes.unwrap_or_default();
        let known = self
            .factory
            .find_vertex(id)
            .filter(|v| self.graph.contains_vertex(v));
        match known {
            Some(vertex) => {
                debug!(id, "vertex redeclared");
                self.factory.update_vertex(&vertex, attributes);
                self.join_scope(vertex)
            }
            None => {
                let vertex = self.factory.create_vertex(id, attributes);
                self.add_to_scope(vertex)
            }
        }
    }

    fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        attributes: Option<Attributes>,
    ) -> Result<(), GraphError> {
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;
        self.graph.add_edge(VE::from_endpoints(
            source,
            target,
            attributes.unwrap_or_default(),
        ))
    }
}

/// Strips the first and last character of a quoted token and deletes every
/// backslash. Escapes are not decoded: `\"` becomes `"` and `\n` becomes `n`.
pub fn unquote(token: &str) -> String {
    let mut chars = token.chars();
    chars.next();
    chars.next_back();
    chars.as_str().replace('\\', "")
}
