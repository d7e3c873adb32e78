use anyhow::Result;
use serde_json::json;
use std::io::Write;

use crate::graph::Graph;

/// Serializes the graph for the downstream ingestion sink.
///
/// Every node becomes an (id, label, attributes) record and every edge an
/// (id, source, target, relation, attributes) record; edge ids are null
/// until the sink assigns them.
pub fn export_json(graph: &Graph, pretty: bool, output: &mut dyn Write) -> Result<()> {
    let document = json!({
        "nodes": graph
            .nodes()
            .iter()
            .map(|n| json!({
                "id": n.id(),
                "label": n.label(),
                "attributes": n.attributes(),
            }))
            .collect::<Vec<_>>(),
        "edges": graph
            .edges()
            .iter()
            .map(|e| json!({
                "id": e.id(),
                "source": e.source_id(),
                "target": e.target_id(),
                "relation": e.relation(),
                "attributes": e.attributes(),
            }))
            .collect::<Vec<_>>(),
    });

    let rendered = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    writeln!(output, "{rendered}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CardNode, Edge, HasCommentEdge, Node};

    #[test]
    fn test_export_json_shape() {
        let mut graph = Graph::new();
        graph.push_node(Node::Card(CardNode {
            id: "CARD1".into(),
            title: "Fix bug".into(),
            description: String::new(),
            labels: vec!["bug".into()],
            status: Some("Done".into()),
            size: None,
            priority: None,
            iteration: None,
            assignees: vec![],
            issue_ref: "tracker42".into(),
        }));
        graph.push_edge(Edge::HasComment(HasCommentEdge {
            card: "CARD1".into(),
            comment: "C1".into(),
            recency: 0,
        }));

        let mut buffer = Vec::new();
        export_json(&graph, false, &mut buffer).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["nodes"][0]["id"], "CARD1");
        assert_eq!(parsed["nodes"][0]["label"], "project");
        assert_eq!(parsed["nodes"][0]["attributes"]["title"], "Fix bug");
        assert_eq!(parsed["nodes"][0]["attributes"]["size"], serde_json::Value::Null);
        assert_eq!(parsed["edges"][0]["id"], serde_json::Value::Null);
        assert_eq!(parsed["edges"][0]["source"], "CARD1");
        assert_eq!(parsed["edges"][0]["target"], "C1");
        assert_eq!(parsed["edges"][0]["relation"], "has comment");
        assert_eq!(parsed["edges"][0]["attributes"]["recency"], 0);
    }
}
