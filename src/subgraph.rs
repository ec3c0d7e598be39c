use std::fmt;

use crate::attrs::{self, Attributes};
use crate::error::GraphError;
use crate::geometry::BoundingBox;
use crate::notify::ChangeNotifier;

/// A named, flat group of vertices inside a [`crate::graph::Graph`].
///
/// Subgraphs do not nest. `add_vertex` performs no duplicate check; keeping
/// vertices unique is up to the caller.
#[derive(Debug)]
pub struct SubGraph<V> {
    name: String,
    vertices: Vec<V>,
    attributes: Attributes,
    changed: ChangeNotifier,
}

impl<V> SubGraph<V> {
    pub fn new() -> Self {
        Self::named("")
    }

    pub fn named(name: impl Into<String>) -> Self {
        SubGraph {
            name: name.into(),
            vertices: Vec::new(),
            attributes: Attributes::new(),
            changed: ChangeNotifier::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
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

    pub fn add_vertex(&mut self, vertex: V) {
        self.vertices.push(vertex);
        self.changed.raise();
    }

    /// Removes `vertex` from this subgraph only. Edges that touch it are left
    /// alone; [`crate::graph::Graph::remove_vertex_with_edges`] cleans those up.
    pub(crate) fn remove_vertex(&mut self, vertex: &V) -> Result<V, GraphError>
    where
        V: PartialEq,
    {
        let index = self
            .vertices
            .iter()
            .position(|v| v == vertex)
            .ok_or(GraphError::VertexNotFound)?;
        Ok(self.vertices.remove(index))
    }

    pub fn label(&self) -> &str {
        attrs::get_or(&self.attributes, "label", "")
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.attributes.insert("label".to_string(), label.into());
        self.changed.raise();
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::parse(self.attributes.get("bb").map(String::as_str))
    }
}

impl<V> Default for SubGraph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Display> fmt::Display for SubGraph<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "subgraph: {}", self.name)?;
        for vertex in &self.vertices {
            writeln!(f, "\t{vertex}")?;
        }
        Ok(())
    }
}

/// Access to the [`SubGraph`] at the core of a richer subgraph type.
pub trait AsSubGraph<V> {
    fn as_sub_graph(&self) -> &SubGraph<V>;
    fn as_sub_graph_mut(&mut self) -> &mut SubGraph<V>;
}

impl<V> AsSubGraph<V> for SubGraph<V> {
    fn as_sub_graph(&self) -> &SubGraph<V> {
        self
    }

    fn as_sub_graph_mut(&mut self) -> &mut SubGraph<V> {
        self
    }
}
