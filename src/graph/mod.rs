//! Graph-output primitives handed to the downstream ingestion sink.

mod edge;
mod node;

pub use edge::{Edge, HasCommentEdge, LeadsEdge, PartOfEdge};
pub use node::{
    Attributes, CardNode, CommentNode, FieldOptionNode, IterationNode, Node, PersonNode,
};

use std::collections::HashSet;

/// Accumulates the node and edge lists for one run.
///
/// Node ids are unique: inserting a node whose id is already present is a
/// no-op, tracked through a set so the check is constant-time.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_ids: HashSet<String>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node unless one with the same id already exists.
    ///
    /// Returns `true` if the node was inserted.
    pub fn push_node(&mut self, node: Node) -> bool {
        if self.node_ids.contains(node.id()) {
            return false;
        }
        self.node_ids.insert(node.id().to_string());
        self.nodes.push(node);
        true
    }

    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_ids.contains(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
