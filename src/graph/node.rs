use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Insertion-ordered attribute map attached to nodes and edges.
///
/// Ordered so repeated exports of the same board are byte-identical.
pub type Attributes = IndexMap<String, Value>;

/// An option of a single-select board field, e.g. the "Done" column of the
/// Status field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOptionNode {
    /// Lowercased option name, e.g. "done".
    pub id: String,
    /// Lowercased field name, e.g. "status".
    pub label: String,
}

/// A card on the board, backed by an issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardNode {
    /// Item id assigned by the board.
    pub id: String,
    pub title: String,
    /// Issue body, empty when the issue has none.
    pub description: String,
    pub labels: Vec<String>,
    pub status: Option<String>,
    pub size: Option<String>,
    pub priority: Option<String>,
    /// Title of the iteration the card is scheduled in, if any.
    pub iteration: Option<String>,
    pub assignees: Vec<String>,
    /// Namespaced issue reference, e.g. "project-planning42".
    pub issue_ref: String,
}

/// A time-boxed iteration cards can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationNode {
    /// Iteration id assigned by the board.
    pub id: String,
    pub title: String,
}

/// An assignee, identified by login.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonNode {
    pub name: String,
}

/// A single issue comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    pub id: String,
    /// Rendered as "author: body".
    pub text: String,
}

/// A node in the exported graph.
///
/// One variant per node kind the adapter produces. The accessors expose the
/// uniform (id, label, attributes) triple the downstream sink ingests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    FieldOption(FieldOptionNode),
    Card(CardNode),
    Iteration(IterationNode),
    Person(PersonNode),
    Comment(CommentNode),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::FieldOption(n) => &n.id,
            Node::Card(n) => &n.id,
            Node::Iteration(n) => &n.id,
            Node::Person(n) => &n.name,
            Node::Comment(n) => &n.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Node::FieldOption(n) => &n.label,
            Node::Card(_) => "project",
            Node::Iteration(_) => "iteration",
            Node::Person(_) => "person",
            Node::Comment(_) => "comment",
        }
    }

    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        match self {
            Node::FieldOption(_) => {}
            Node::Card(n) => {
                attrs.insert("title".into(), Value::from(n.title.clone()));
                attrs.insert("description".into(), Value::from(n.description.clone()));
                attrs.insert("labels".into(), Value::from(n.labels.clone()));
                attrs.insert("status".into(), opt_value(&n.status));
                attrs.insert("size".into(), opt_value(&n.size));
                attrs.insert("priority".into(), opt_value(&n.priority));
                attrs.insert("iteration".into(), opt_value(&n.iteration));
                attrs.insert("assignees".into(), Value::from(n.assignees.clone()));
                attrs.insert("issue_number".into(), Value::from(n.issue_ref.clone()));
            }
            Node::Iteration(n) => {
                attrs.insert("title".into(), Value::from(n.title.clone()));
            }
            Node::Person(n) => {
                attrs.insert("name".into(), Value::from(n.name.clone()));
            }
            Node::Comment(n) => {
                attrs.insert("text".into(), Value::from(n.text.clone()));
            }
        }
        attrs
    }
}

fn opt_value(value: &Option<String>) -> Value {
    value.as_deref().map_or(Value::Null, Value::from)
}
