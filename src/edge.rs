use std::fmt;
use std::hash::{Hash, Hasher};

use crate::attrs::{self, Attributes};
use crate::geometry::Point;

/// Anything with a source and a destination of type `T`.
pub trait Endpoints<T> {
    fn source(&self) -> &T;
    fn destination(&self) -> &T;

    fn touches(&self, end: &T) -> bool
    where
        T: PartialEq,
    {
        self.source() == end || self.destination() == end
    }
}

/// A relation between two vertices or two subgraphs.
///
/// Endpoints, arrows and ports are fixed at construction. Equality and
/// hashing look only at the endpoints, so changing attributes never moves an
/// edge in a set or map keyed on edges.
#[derive(Debug, Clone)]
pub struct Edge<T> {
    source: T,
    destination: T,
    source_arrow: Option<String>,
    destination_arrow: Option<String>,
    source_port: Option<String>,
    destination_port: Option<String>,
    attributes: Attributes,
}

impl<T> Edge<T> {
    pub fn new(source: T, destination: T) -> Self {
        Self::with_attributes(source, destination, Attributes::new())
    }

    pub fn with_attributes(source: T, destination: T, attributes: Attributes) -> Self {
        Edge {
            source,
            destination,
            source_arrow: None,
            destination_arrow: None,
            source_port: None,
            destination_port: None,
            attributes,
        }
    }

    pub fn with_source_arrow(mut self, arrow: impl Into<String>) -> Self {
        self.source_arrow = Some(arrow.into());
        self
    }

    pub fn with_destination_arrow(mut self, arrow: impl Into<String>) -> Self {
        self.destination_arrow = Some(arrow.into());
        self
    }

    pub fn with_source_port(mut self, port: impl Into<String>) -> Self {
        self.source_port = Some(port.into());
        self
    }

    pub fn with_destination_port(mut self, port: impl Into<String>) -> Self {
        self.destination_port = Some(port.into());
        self
    }

    pub fn source_arrow(&self) -> Option<&str> {
        self.source_arrow.as_deref()
    }

    pub fn destination_arrow(&self) -> Option<&str> {
        self.destination_arrow.as_deref()
    }

    pub fn source_port(&self) -> Option<&str> {
        self.source_port.as_deref()
    }

    pub fn destination_port(&self) -> Option<&str> {
        self.destination_port.as_deref()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn label(&self) -> &str {
        attrs::get_or(&self.attributes, "label", "")
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.attributes.insert("label".to_string(), label.into());
    }

    /// Label drawn near the source arrow (`taillabel`).
    pub fn source_arrow_label(&self) -> &str {
        attrs::get_or(&self.attributes, "taillabel", "")
    }

    pub fn set_source_arrow_label(&mut self, label: impl Into<String>) {
        self.attributes.insert("taillabel".to_string(), label.into());
    }

    /// Label drawn near the destination arrow (`headlabel`).
    pub fn destination_arrow_label(&self) -> &str {
        attrs::get_or(&self.attributes, "headlabel", "")
    }

    pub fn set_destination_arrow_label(&mut self, label: impl Into<String>) {
        self.attributes.insert("headlabel".to_string(), label.into());
    }

    /// Heavier edges are kept shorter by the layout engine.
    pub fn weight(&self) -> Option<f64> {
        attrs::get_f64(&self.attributes, "weight")
    }

    pub fn set_weight(&mut self, weight: Option<f64>) {
        attrs::set_f64(&mut self.attributes, "weight", weight);
    }

    pub fn min_len(&self) -> Option<f64> {
        attrs::get_f64(&self.attributes, "minlen")
    }

    pub fn set_min_len(&mut self, min_len: Option<f64>) {
        attrs::set_f64(&mut self.attributes, "minlen", min_len);
    }

    /// Distance between the arrow labels and the nodes.
    pub fn arrow_label_distance(&self) -> Option<f64> {
        attrs::get_f64(&self.attributes, "labeldistance")
    }

    pub fn set_arrow_label_distance(&mut self, distance: Option<f64>) {
        attrs::set_f64(&mut self.attributes, "labeldistance", distance);
    }

    pub fn label_position(&self) -> Option<Point> {
        Point::parse(self.attributes.get("lp").map(String::as_str))
    }
}

impl<T> Endpoints<T> for Edge<T> {
    fn source(&self) -> &T {
        &self.source
    }

    fn destination(&self) -> &T {
        &self.destination
    }
}

impl<T: PartialEq> PartialEq for Edge<T> {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.destination == other.destination
    }
}

impl<T: Eq> Eq for Edge<T> {}

impl<T: Hash> Hash for Edge<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.destination.hash(state);
    }
}

impl<T: fmt::Display> fmt::Display for Edge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -- {} [{}]",
            self.source,
            self.destination,
            attrs::format_attributes(&self.attributes)
        )
    }
}
