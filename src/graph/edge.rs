use serde::Serialize;
use serde_json::Value;

use super::node::Attributes;

/// Connects a card to the iteration it is scheduled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartOfEdge {
    pub card: String,
    pub iteration: String,
}

/// Connects an assignee to a card they lead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadsEdge {
    pub person: String,
    pub card: String,
}

/// Connects a card to one of its issue comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HasCommentEdge {
    pub card: String,
    pub comment: String,
    /// 0 for the most recent comment, incrementing per comment in
    /// retrieval order.
    pub recency: u32,
}

/// An edge in the exported graph, one variant per relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Edge {
    PartOf(PartOfEdge),
    Leads(LeadsEdge),
    HasComment(HasCommentEdge),
}

impl Edge {
    /// Edges carry no id of their own; the sink assigns one on ingestion.
    pub fn id(&self) -> Option<&str> {
        None
    }

    pub fn source_id(&self) -> &str {
        match self {
            Edge::PartOf(e) => &e.card,
            Edge::Leads(e) => &e.person,
            Edge::HasComment(e) => &e.card,
        }
    }

    pub fn target_id(&self) -> &str {
        match self {
            Edge::PartOf(e) => &e.iteration,
            Edge::Leads(e) => &e.card,
            Edge::HasComment(e) => &e.comment,
        }
    }

    pub fn relation(&self) -> &str {
        match self {
            Edge::PartOf(_) => "part of",
            Edge::Leads(_) => "leads",
            Edge::HasComment(_) => "has comment",
        }
    }

    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        if let Edge::HasComment(e) = self {
            attrs.insert("recency".into(), Value::from(e.recency));
        }
        attrs
    }
}
