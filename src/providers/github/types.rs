use indexmap::IndexMap;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Wire types
//
// The GraphQL inline fragments produce loosely-typed records: which keys are
// present depends on the concrete field type. Everything is optional here and
// classified exactly once into the tagged types below.
// ---------------------------------------------------------------------------

/// A field definition as it arrives on the wire.
///
/// Plain fields carry id + name only, single-select fields add `options`,
/// iteration fields add `configuration`. Unmatched field types arrive as
/// empty objects.
#[derive(Debug, Clone, Deserialize)]
pub struct RawField {
    pub id: Option<String>,
    pub name: Option<String>,
    pub options: Option<Vec<SelectOption>>,
    pub configuration: Option<RawIterationConfiguration>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawIterationConfiguration {
    pub iterations: Vec<IterationDef>,
}

/// One option of a single-select field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub name: String,
}

/// One configured iteration of an iteration field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationDef {
    pub id: String,
    pub start_date: String,
}

/// A per-item field value as it arrives on the wire.
///
/// Exactly one payload shape is populated per record; empty objects show up
/// for value types not covered by the query's fragments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFieldValue {
    pub text: Option<String>,
    pub date: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub iteration_id: Option<String>,
    pub field: Option<FieldRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldRef {
    pub name: String,
}

/// A board item as it arrives on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub id: String,
    #[serde(default)]
    pub field_values: RawFieldValueConnection,
    pub content: Option<RawContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFieldValueConnection {
    pub nodes: Vec<RawFieldValue>,
}

/// Issue content linked to a board item. Items backed by draft cards or
/// pull requests come back without a `number`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawContent {
    pub title: Option<String>,
    pub body: Option<String>,
    pub number: Option<u64>,
    pub labels: Option<RawLabelConnection>,
    pub assignees: Option<RawAssigneeConnection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLabelConnection {
    pub edges: Vec<RawLabelEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLabelEdge {
    pub node: RawLabelNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLabelNode {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAssigneeConnection {
    pub nodes: Vec<RawAssigneeNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAssigneeNode {
    pub login: String,
}

/// One issue comment.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    pub id: String,
    pub body: String,
    pub author: Option<CommentAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentAuthor {
    pub login: String,
}

impl IssueComment {
    /// Comment text as it appears on the comment node.
    ///
    /// Deleted accounts have no author and render as "ghost", matching how
    /// GitHub itself displays them.
    pub fn display_text(&self) -> String {
        let author = self.author.as_ref().map_or("ghost", |a| a.login.as_str());
        format!("{}: {}", author, self.body)
    }
}

// ---------------------------------------------------------------------------
// Classified types
// ---------------------------------------------------------------------------

/// A board field definition, classified from the wire shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Plain,
    SingleSelect(Vec<SelectOption>),
    Iteration(Vec<IterationDef>),
}

impl FieldDefinition {
    /// Classifies a wire record by which sub-structure is present.
    ///
    /// Returns `None` for empty records (field types the query does not
    /// cover).
    pub fn classify(raw: RawField) -> Option<Self> {
        let id = raw.id?;
        let name = raw.name?;
        let kind = if let Some(options) = raw.options {
            FieldKind::SingleSelect(options)
        } else if let Some(configuration) = raw.configuration {
            FieldKind::Iteration(configuration.iterations)
        } else {
            FieldKind::Plain
        };
        Some(Self { id, name, kind })
    }

    pub fn options(&self) -> &[SelectOption] {
        match &self.kind {
            FieldKind::SingleSelect(options) => options,
            _ => &[],
        }
    }
}

/// A per-item field value, classified from the wire shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text { field: String, text: String },
    SingleSelect { field: String, name: String },
    Date { field: String, date: String },
    Iteration { title: String, iteration_id: String },
}

impl FieldValue {
    /// Classifies a wire record by key presence.
    ///
    /// Iteration values carry no owning field name, only an iteration id,
    /// so they are special-cased first. Every other shape is keyed under
    /// its field's name. Returns `None` for empty records.
    pub fn classify(raw: RawFieldValue) -> Option<Self> {
        if let Some(iteration_id) = raw.iteration_id {
            return Some(FieldValue::Iteration {
                title: raw.title.unwrap_or_default(),
                iteration_id,
            });
        }

        let field = raw.field?.name;
        if let Some(text) = raw.text {
            Some(FieldValue::Text { field, text })
        } else if let Some(date) = raw.date {
            Some(FieldValue::Date { field, date })
        } else if let Some(name) = raw.name {
            Some(FieldValue::SingleSelect { field, name })
        } else {
            None
        }
    }
}

/// An iteration value attached to an item.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationValue {
    pub id: String,
    pub title: String,
}

/// Linked issue content after normalization.
#[derive(Debug, Clone, Default)]
pub struct IssueContent {
    pub body: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
}

/// A board item with its field values collapsed into one flat record.
#[derive(Debug, Clone)]
pub struct ProjectItem {
    /// Item id assigned by the board.
    pub id: String,
    /// Flat field name → scalar value map (text, date and single-select
    /// values alike).
    pub fields: IndexMap<String, String>,
    /// Iteration the item is scheduled in, if any.
    pub iteration: Option<IterationValue>,
    pub content: IssueContent,
    /// Issue number of the linked issue.
    pub number: u64,
    /// Namespaced issue reference used for comment lookup,
    /// e.g. "project-planning42".
    pub issue_ref: String,
}

impl ProjectItem {
    /// Normalizes a wire item into a flat record.
    ///
    /// Items without an issue number cannot be addressed by the rest of the
    /// pipeline and are dropped (`None`).
    pub fn normalize(raw: RawItem, namespace: &str) -> Option<Self> {
        let content = raw.content?;
        let number = content.number?;

        let mut fields = IndexMap::new();
        let mut iteration = None;

        for value in raw
            .field_values
            .nodes
            .into_iter()
            .filter_map(FieldValue::classify)
        {
            match value {
                FieldValue::Iteration {
                    title,
                    iteration_id,
                } => {
                    iteration = Some(IterationValue {
                        id: iteration_id,
                        title,
                    });
                }
                FieldValue::Text { field, text } => {
                    fields.insert(field, text);
                }
                FieldValue::Date { field, date } => {
                    fields.insert(field, date);
                }
                FieldValue::SingleSelect { field, name } => {
                    fields.insert(field, name);
                }
            }
        }

        let labels = content
            .labels
            .map(|c| c.edges.into_iter().map(|e| e.node.name).collect())
            .unwrap_or_default();

        let assignees = content
            .assignees
            .map(|c| c.nodes.into_iter().map(|n| n.login).collect())
            .unwrap_or_default();

        Some(Self {
            id: raw.id,
            fields,
            iteration,
            content: IssueContent {
                body: content.body.unwrap_or_default(),
                labels,
                assignees,
            },
            number,
            issue_ref: format!("{namespace}{number}"),
        })
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The card title comes from the board's Title field value.
    pub fn title(&self) -> Option<&str> {
        self.field("Title")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_value(json: serde_json::Value) -> RawFieldValue {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_classify_text_value() {
        let value = FieldValue::classify(raw_value(serde_json::json!({
            "text": "Fix bug",
            "field": {"name": "Title"}
        })));
        assert_eq!(
            value,
            Some(FieldValue::Text {
                field: "Title".into(),
                text: "Fix bug".into()
            })
        );
    }

    #[test]
    fn test_classify_single_select_value() {
        let value = FieldValue::classify(raw_value(serde_json::json!({
            "name": "Done",
            "field": {"name": "Status"}
        })));
        assert_eq!(
            value,
            Some(FieldValue::SingleSelect {
                field: "Status".into(),
                name: "Done".into()
            })
        );
    }

    #[test]
    fn test_classify_date_value() {
        let value = FieldValue::classify(raw_value(serde_json::json!({
            "date": "2024-06-01",
            "field": {"name": "Due"}
        })));
        assert_eq!(
            value,
            Some(FieldValue::Date {
                field: "Due".into(),
                date: "2024-06-01".into()
            })
        );
    }

    #[test]
    fn test_classify_iteration_value_wins_over_field_name() {
        // Iteration values carry no owning field name, only title + id.
        let value = FieldValue::classify(raw_value(serde_json::json!({
            "title": "Sprint 3",
            "iterationId": "IT3"
        })));
        assert_eq!(
            value,
            Some(FieldValue::Iteration {
                title: "Sprint 3".into(),
                iteration_id: "IT3".into()
            })
        );
    }

    #[test]
    fn test_classify_empty_value_is_dropped() {
        assert_eq!(FieldValue::classify(RawFieldValue::default()), None);
    }

    #[test]
    fn test_classify_plain_field_definition() {
        let field = FieldDefinition::classify(
            serde_json::from_value(serde_json::json!({"id": "F1", "name": "Title"})).unwrap(),
        )
        .unwrap();
        assert!(matches!(field.kind, FieldKind::Plain));
        assert!(field.options().is_empty());
    }

    #[test]
    fn test_classify_single_select_field_definition() {
        let field = FieldDefinition::classify(
            serde_json::from_value(serde_json::json!({
                "id": "F2",
                "name": "Status",
                "options": [{"id": "O1", "name": "Todo"}]
            }))
            .unwrap(),
        )
        .unwrap();
        assert!(matches!(field.kind, FieldKind::SingleSelect(_)));
        assert_eq!(field.options().len(), 1);
    }

    #[test]
    fn test_classify_iteration_field_definition() {
        let field = FieldDefinition::classify(
            serde_json::from_value(serde_json::json!({
                "id": "F3",
                "name": "Sprint",
                "configuration": {"iterations": [{"id": "IT1", "startDate": "2024-06-01"}]}
            }))
            .unwrap(),
        )
        .unwrap();
        match field.kind {
            FieldKind::Iteration(iterations) => {
                assert_eq!(iterations[0].id, "IT1");
                assert_eq!(iterations[0].start_date, "2024-06-01");
            }
            _ => panic!("expected iteration field"),
        }
    }

    #[test]
    fn test_classify_unmatched_field_definition_is_dropped() {
        let field = FieldDefinition::classify(
            serde_json::from_value(serde_json::json!({})).unwrap(),
        );
        assert!(field.is_none());
    }

    #[test]
    fn test_normalize_builds_flat_record() {
        let raw: RawItem = serde_json::from_value(serde_json::json!({
            "id": "ITEM1",
            "fieldValues": {"nodes": [
                {"text": "Fix bug", "field": {"name": "Title"}},
                {"name": "Done", "field": {"name": "Status"}},
                {"title": "Sprint 1", "iterationId": "IT1"},
                {}
            ]},
            "content": {
                "title": "Fix bug",
                "body": "Something broke",
                "number": 42,
                "labels": {"edges": [{"node": {"name": "bug"}}]},
                "assignees": {"nodes": [{"login": "octocat"}]}
            }
        }))
        .unwrap();

        let item = ProjectItem::normalize(raw, "project-planning").unwrap();
        assert_eq!(item.id, "ITEM1");
        assert_eq!(item.title(), Some("Fix bug"));
        assert_eq!(item.field("Status"), Some("Done"));
        assert_eq!(
            item.iteration,
            Some(IterationValue {
                id: "IT1".into(),
                title: "Sprint 1".into()
            })
        );
        assert_eq!(item.content.labels, vec!["bug"]);
        assert_eq!(item.content.assignees, vec!["octocat"]);
        assert_eq!(item.number, 42);
        assert_eq!(item.issue_ref, "project-planning42");
    }

    #[test]
    fn test_normalize_drops_item_without_issue_number() {
        let raw: RawItem = serde_json::from_value(serde_json::json!({
            "id": "ITEM2",
            "fieldValues": {"nodes": []},
            "content": {"title": "Draft", "body": null, "number": null}
        }))
        .unwrap();
        assert!(ProjectItem::normalize(raw, "project-planning").is_none());

        let raw: RawItem = serde_json::from_value(serde_json::json!({
            "id": "ITEM3",
            "fieldValues": {"nodes": []},
            "content": null
        }))
        .unwrap();
        assert!(ProjectItem::normalize(raw, "project-planning").is_none());
    }

    #[test]
    fn test_comment_display_text_falls_back_to_ghost() {
        let comment = IssueComment {
            id: "C1".into(),
            body: "looks good".into(),
            author: None,
        };
        assert_eq!(comment.display_text(), "ghost: looks good");

        let comment = IssueComment {
            id: "C2".into(),
            body: "ship it".into(),
            author: Some(CommentAuthor {
                login: "octocat".into(),
            }),
        };
        assert_eq!(comment.display_text(), "octocat: ship it");
    }
}
