//! DOT flavoured graph: string-identified vertices and layout geometry read
//! back from the attributes a layout engine writes.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::attrs::{self, Attributes};
use crate::builder::{GraphBuilder, VertexFactory};
use crate::dot_parser::parse_dot;
use crate::edge::Edge;
use crate::error::Result;
use crate::geometry::{BoundingBox, Point};
use crate::graph::{Graph, SubGraphId};
use crate::subgraph::SubGraph;

/// A vertex named by its DOT identifier. Two vertices are equal when their
/// ids are.
///
/// Attributes sit behind a `RefCell`: the vertex is shared by the graph and
/// its edges, and a later node statement for the same id still adds to it.
#[derive(Debug, Clone)]
pub struct DotVertex {
    id: String,
    attributes: RefCell<Attributes>,
}

impl DotVertex {
    pub fn new(id: impl Into<String>, attributes: Attributes) -> Self {
        DotVertex {
            id: id.into(),
            attributes: RefCell::new(attributes),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attributes(&self) -> Ref<'_, Attributes> {
        self.attributes.borrow()
    }

    /// Later values for a key win.
    pub fn merge_attributes(&self, attributes: Attributes) {
        self.attributes.borrow_mut().extend(attributes);
    }

    /// Falls back to the id, as the layout engine does.
    pub fn label(&self) -> String {
        attrs::get_or(&self.attributes(), "label", &self.id).to_string()
    }

    /// Center of the vertex (`pos`), in points.
    pub fn position(&self) -> Option<Point> {
        Point::parse(self.attributes().get("pos").map(String::as_str))
    }

    /// In inches.
    pub fn width(&self) -> Option<f64> {
        attrs::get_f64(&self.attributes(), "width")
    }

    /// In inches.
    pub fn height(&self) -> Option<f64> {
        attrs::get_f64(&self.attributes(), "height")
    }
}

impl PartialEq for DotVertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DotVertex {}

impl Hash for DotVertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for DotVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

pub type DotVertexRef = Rc<DotVertex>;
pub type DotSubGraph = SubGraph<DotVertexRef>;
pub type DotEdge = Edge<DotVertexRef>;
pub type DotGraphInner = Graph<DotVertexRef, DotSubGraph, DotEdge, Edge<SubGraphId>>;

/// [`Graph`] of [`DotVertex`] with the layout bounding box of the whole
/// graph. Dereferences to the underlying graph.
#[derive(Debug, Default)]
pub struct DotGraph {
    graph: DotGraphInner,
    bounding_box: RefCell<Option<BoundingBox>>,
}

impl DotGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_graph(&self) -> &DotGraphInner {
        &self.graph
    }

    pub fn as_graph_mut(&mut self) -> &mut DotGraphInner {
        &mut self.graph
    }

    pub fn into_graph(self) -> DotGraphInner {
        self.graph
    }

    /// Parsed from `bb`; reparsed only when the raw string changes.
    pub fn bounding_box(&self) -> BoundingBox {
        let raw = self.graph.attributes().get("bb").map(String::as_str);
        let mut cached = self.bounding_box.borrow_mut();
        match cached.as_ref() {
            Some(bb) if bb.is_parsed_from(raw) => bb.clone(),
            _ => {
                let bb = BoundingBox::parse(raw);
                *cached = Some(bb.clone());
                bb
            }
        }
    }

    pub fn width(&self) -> Option<f64> {
        self.bounding_box().width()
    }

    pub fn height(&self) -> Option<f64> {
        self.bounding_box().height()
    }

    pub fn find_vertex(&self, id: &str) -> Option<&DotVertexRef> {
        self.graph.all_vertices().find(|v| v.id() == id)
    }
}

impl Deref for DotGraph {
    type Target = DotGraphInner;

    fn deref(&self) -> &Self::Target {
        &self.graph
    }
}

impl DerefMut for DotGraph {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.graph
    }
}

impl fmt::Display for DotGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.graph)
    }
}

/// Resolves ids to shared [`DotVertex`] values, creating unknown ids on
/// first use.
#[derive(Debug, Default)]
pub struct DotVertexFactory {
    vertices: IndexMap<String, DotVertexRef>,
}

impl DotVertexFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl VertexFactory<DotVertexRef> for DotVertexFactory {
    fn create_vertex(&mut self, id: &str, attributes: Attributes) -> DotVertexRef {
        let vertex = Rc::new(DotVertex::new(id, attributes));
        self.vertices.insert(id.to_string(), Rc::clone(&vertex));
        vertex
    }

    fn get_vertex(&mut self, id: &str) -> DotVertexRef {
        if let Some(vertex) = self.vertices.get(id) {
            return Rc::clone(vertex);
        }
        debug!(id, "creating vertex for unknown id");
        self.create_vertex(id, Attributes::new())
    }

    fn find_vertex(&self, id: &str) -> Option<DotVertexRef> {
        self.vertices.get(id).cloned()
    }

    fn update_vertex(&mut self, vertex: &DotVertexRef, attributes: Attributes) {
        vertex.merge_attributes(attributes);
    }
}

/// Parses DOT text and builds the graph it describes.
pub fn parse_dot_graph(input: &str) -> Result<DotGraph> {
    let document = parse_dot(input)?;
    let mut graph = DotGraph::new();
    let mut builder = GraphBuilder::new(graph.as_graph_mut(), DotVertexFactory::new());
    document.replay(&mut builder)?;
    debug!(
        vertices = graph.all_vertices().count(),
        subgraphs = graph.subgraphs().count(),
        edges = graph.edges().len(),
        "built DOT graph"
    );
    Ok(graph)
}
