use std::collections::BTreeMap;

use log::{info, warn};

use crate::graph::{
    CardNode, CommentNode, Edge, FieldOptionNode, Graph, HasCommentEdge, IterationNode, LeadsEdge,
    Node, PartOfEdge, PersonNode,
};

use super::types::{FieldDefinition, IssueComment, ProjectItem};

/// Fields whose options become standalone nodes. Every other custom field
/// stays folded into the card's flat record.
const OPTION_NODE_FIELDS: [&str; 3] = ["Status", "Size", "Priority"];

/// Derives the full node and edge lists from already-fetched board data.
///
/// Pure and deterministic: the input maps are ordered by issue number, so
/// assembling the same data twice yields identical node and edge lists.
///
/// Order matters — iteration and person nodes are deduplicated against
/// nodes emitted by earlier steps:
/// 1. one node per Status/Size/Priority option,
/// 2. one card node per item with a non-empty title,
/// 3. iteration nodes (deduplicated) and `part of` edges,
/// 4. comment nodes and `has comment` edges with recency ordinals,
/// 5. person nodes (deduplicated) and `leads` edges, in a second full pass.
pub fn assemble_graph(
    fields: &[FieldDefinition],
    items: &BTreeMap<u64, ProjectItem>,
    comments: &BTreeMap<u64, Vec<IssueComment>>,
) -> Graph {
    info!("Generating nodes and edges.");

    let mut graph = Graph::new();

    for field in fields {
        if !OPTION_NODE_FIELDS.contains(&field.name.as_str()) {
            continue;
        }
        for option in field.options() {
            graph.push_node(Node::FieldOption(FieldOptionNode {
                id: option.name.to_lowercase(),
                label: field.name.to_lowercase(),
            }));
        }
    }

    for item in items.values() {
        let Some(title) = item.title().filter(|t| !t.is_empty()) else {
            warn!("Item {} has no title.", item.id);
            continue;
        };

        graph.push_node(Node::Card(CardNode {
            id: item.id.clone(),
            title: title.to_string(),
            description: item.content.body.clone(),
            labels: item.content.labels.clone(),
            status: item.field("Status").map(String::from),
            size: item.field("Size").map(String::from),
            priority: item.field("Priority").map(String::from),
            iteration: item.iteration.as_ref().map(|i| i.title.clone()),
            assignees: item.content.assignees.clone(),
            issue_ref: item.issue_ref.clone(),
        }));

        if let Some(iteration) = item.iteration.as_ref().filter(|i| !i.id.is_empty()) {
            graph.push_node(Node::Iteration(IterationNode {
                id: iteration.id.clone(),
                title: iteration.title.clone(),
            }));
            graph.push_edge(Edge::PartOf(PartOfEdge {
                card: item.id.clone(),
                iteration: iteration.id.clone(),
            }));
        }

        if let Some(item_comments) = comments.get(&item.number) {
            for (recency, comment) in item_comments.iter().enumerate() {
                graph.push_node(Node::Comment(CommentNode {
                    id: comment.id.clone(),
                    text: comment.display_text(),
                }));
                graph.push_edge(Edge::HasComment(HasCommentEdge {
                    card: item.id.clone(),
                    comment: comment.id.clone(),
                    recency: recency as u32,
                }));
            }
        }
    }

    // Assignees in a second pass so person nodes dedup against the whole
    // node set. Items that produced no card node get no leads edges either,
    // keeping every edge endpoint resolvable.
    for item in items.values() {
        if !graph.contains_node(&item.id) {
            continue;
        }
        for assignee in &item.content.assignees {
            graph.push_node(Node::Person(PersonNode {
                name: assignee.clone(),
            }));
            graph.push_edge(Edge::Leads(LeadsEdge {
                person: assignee.clone(),
                card: item.id.clone(),
            }));
        }
    }

    graph
}
