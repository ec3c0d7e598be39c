use tracing::trace;

use crate::attrs::Attributes;
use crate::builder::GraphEvents;

#[derive(Debug, Clone, PartialEq)]
pub struct DotDocument {
    pub strict: bool,
    pub kind: GraphKind,
    pub id: Option<String>,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphKind {
    Graph,
    Digraph,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Node(NodeStmt),
    Edge(EdgeStmt),
    Attributes(AttrTarget, Attributes),
    Assign(String, String),
    SubGraph(SubGraphStmt),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrTarget {
    Graph,
    Node,
    Edge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeId {
    pub id: String,
    pub port: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeStmt {
    pub node: NodeId,
    pub attributes: Option<Attributes>,
}

/// `a -> b -> c [attrs]`; `chain` holds every operand in order.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStmt {
    pub chain: Vec<NodeId>,
    pub attributes: Option<Attributes>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubGraphStmt {
    pub id: Option<String>,
    pub statements: Vec<Statement>,
}

impl DotDocument {
    /// Emits the callbacks for every statement, in source order.
    pub fn replay<E: GraphEvents>(&self, events: &mut E) -> Result<(), E::Error> {
        replay_statements(&self.statements, events)
    }
}

fn replay_statements<E: GraphEvents>(statements: &[Statement], events: &mut E) -> Result<(), E::Error> {
    for statement in statements {
        match statement {
            Statement::Node(stmt) => {
                events.add_vertex(&stmt.node.id, stmt.attributes.clone())?;
            }
            Statement::Edge(stmt) => {
                for pair in stmt.chain.windows(2) {
                    events.add_edge(&pair[0].id, &pair[1].id, stmt.attributes.clone())?;
                }
            }
            Statement::Attributes(AttrTarget::Graph, attributes) => {
                events.add_graph_attributes(Some(attributes.clone()));
            }
            Statement::Attributes(target, _) => {
                trace!(?target, "default attribute list not forwarded");
            }
            Statement::Assign(key, value) => {
                let mut attributes = Attributes::new();
                attributes.insert(key.clone(), value.clone());
                events.add_graph_attributes(Some(attributes));
            }
            Statement::SubGraph(sub) => {
                events.enter_subgraph(sub.id.as_deref().unwrap_or(""));
                replay_statements(&sub.statements, events)?;
                events.leave_subgraph();
            }
        }
    }
    Ok(())
}
