use std::fmt::Write;

use indexmap::IndexMap;

use crate::graph::{Edge, Graph, Node};

use super::styling::{bright, cyan, dim};
use super::tables::create_table;

/// Prints a human-readable summary of the exported graph to stdout.
///
/// Shows the total node and edge counts plus one table of node counts per
/// label and one of edge counts per relation, in first-seen order.
pub fn print_summary(graph: &Graph) {
    println!("{}", render_summary(graph));
}

fn render_summary(graph: &Graph) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "{} {} nodes, {} edges",
        bright("Graph:"),
        cyan(graph.node_count()),
        cyan(graph.edge_count())
    );

    let mut node_table = create_table(&["Label", "Nodes"]);
    for (label, count) in count_by(graph.nodes().iter().map(Node::label)) {
        node_table.add_row(vec![label.to_string(), count.to_string()]);
    }
    let _ = writeln!(output, "{node_table}");

    if graph.edges().is_empty() {
        let _ = writeln!(output, "{}", dim("No edges."));
    } else {
        let mut edge_table = create_table(&["Relation", "Edges"]);
        for (relation, count) in count_by(graph.edges().iter().map(Edge::relation)) {
            edge_table.add_row(vec![relation.to_string(), count.to_string()]);
        }
        let _ = writeln!(output, "{edge_table}");
    }

    output
}

fn count_by<'a>(labels: impl Iterator<Item = &'a str>) -> IndexMap<&'a str, usize> {
    let mut counts = IndexMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FieldOptionNode, LeadsEdge, PersonNode};

    #[test]
    fn test_render_summary_counts_labels_and_relations() {
        let mut graph = Graph::new();
        graph.push_node(Node::FieldOption(FieldOptionNode {
            id: "todo".into(),
            label: "status".into(),
        }));
        graph.push_node(Node::FieldOption(FieldOptionNode {
            id: "done".into(),
            label: "status".into(),
        }));
        graph.push_node(Node::Person(PersonNode {
            name: "alice".into(),
        }));
        graph.push_edge(Edge::Leads(LeadsEdge {
            person: "alice".into(),
            card: "CARD1".into(),
        }));

        let rendered = render_summary(&graph);
        assert!(rendered.contains("3 nodes"));
        assert!(rendered.contains("1 edges"));
        assert!(rendered.contains("status"));
        assert!(rendered.contains("person"));
        assert!(rendered.contains("leads"));
    }

    #[test]
    fn test_render_summary_empty_graph() {
        let rendered = render_summary(&Graph::new());
        assert!(rendered.contains("0 nodes"));
        assert!(rendered.contains("No edges."));
    }
}
