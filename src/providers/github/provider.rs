use std::collections::BTreeMap;

use log::{info, warn};

use crate::auth::Token;
use crate::error::{BoardGraphError, Result};
use crate::graph::Graph;

use super::builder::assemble_graph;
use super::client::ProjectsClient;
use super::types::{FieldDefinition, IssueComment, ProjectItem, SelectOption};

/// GitHub Projects board provider.
///
/// Fetches a board's field definitions and items from the GraphQL API,
/// normalizes them, and derives the node/edge graph. Also carries the three
/// single-select write operations, which are independent of the read
/// pipeline.
pub struct GitHubProjectProvider {
    client: ProjectsClient,
    org: String,
    repo: String,
    project_number: i64,
    comment_limit: usize,
}

impl GitHubProjectProvider {
    /// Creates a provider for one board.
    ///
    /// # Arguments
    ///
    /// * `graphql_url` - GraphQL endpoint URL
    /// * `org` - Organization login owning the board
    /// * `repo` - Repository holding the issues backing the cards; also the
    ///   namespace prefix of issue references
    /// * `project_number` - Board number within the organization
    /// * `comment_limit` - Most-recent comments fetched per card
    /// * `token` - API bearer token
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the client cannot be constructed.
    pub fn new(
        graphql_url: &str,
        org: String,
        repo: String,
        project_number: i64,
        comment_limit: usize,
        token: &Token,
    ) -> Result<Self> {
        let client = ProjectsClient::new(graphql_url, token)?;

        Ok(Self {
            client,
            org,
            repo,
            project_number,
            comment_limit,
        })
    }

    /// Runs the full read pipeline: fetch, normalize, build the graph.
    ///
    /// # Errors
    ///
    /// Returns an error if any board-level fetch fails. Per-item data
    /// quality problems (missing titles, malformed issue references,
    /// missing comment threads) are logged and skipped.
    pub async fn collect_graph(&self) -> Result<Graph> {
        info!(
            "Collecting board {}/{} (project {})",
            self.org, self.repo, self.project_number
        );

        let project_id = self
            .client
            .resolve_project_id(&self.org, self.project_number)
            .await?;

        let fields = self.client.fetch_fields(&project_id).await?;
        info!("Fetched {} field definitions", fields.len());

        let items = self.fetch_items(&project_id).await?;
        info!("Fetched {} items", items.len());

        let comments = self.fetch_comments(&items).await?;

        Ok(assemble_graph(&fields, &items, &comments))
    }

    /// Fetches all board items, normalized and keyed by issue number.
    ///
    /// Items without a linked issue number are dropped here — nothing
    /// downstream can address them.
    async fn fetch_items(&self, project_id: &str) -> Result<BTreeMap<u64, ProjectItem>> {
        let raw = self.client.fetch_items(project_id).await?;

        Ok(raw
            .into_iter()
            .filter_map(|item| ProjectItem::normalize(item, &self.repo))
            .map(|item| (item.number, item))
            .collect())
    }

    /// Fetches the comment threads for every item, keyed by issue number.
    ///
    /// The issue number is recovered from each item's namespaced issue
    /// reference; a reference that does not parse is logged and skipped,
    /// as is an issue the API no longer knows about. Network and HTTP
    /// failures abort the run.
    async fn fetch_comments(
        &self,
        items: &BTreeMap<u64, ProjectItem>,
    ) -> Result<BTreeMap<u64, Vec<IssueComment>>> {
        let mut comments = BTreeMap::new();

        for item in items.values() {
            let Some(number) = self.issue_number_from_ref(&item.issue_ref) else {
                warn!("Could not extract number from {}.", item.issue_ref);
                continue;
            };

            match self
                .client
                .fetch_comments(&self.org, &self.repo, number, self.comment_limit)
                .await
            {
                Ok(thread) => {
                    comments.insert(item.number, thread);
                }
                Err(BoardGraphError::MissingData(path)) => {
                    warn!("No comment thread for issue {number}: {path}");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(comments)
    }

    /// Recovers the issue number from a namespaced issue reference.
    fn issue_number_from_ref(&self, issue_ref: &str) -> Option<u64> {
        issue_ref.strip_prefix(self.repo.as_str())?.parse().ok()
    }

    /// Moves a card to a new Status column.
    pub async fn move_card(&self, item_id: &str, column: &str) -> Result<()> {
        self.set_single_select(item_id, "Status", column).await
    }

    /// Updates the Timeslot value of a card.
    pub async fn set_timeslot(&self, item_id: &str, timeslot: &str) -> Result<()> {
        self.set_single_select(item_id, "Timeslot", timeslot).await
    }

    /// Updates the Duration value of a card.
    pub async fn set_duration(&self, item_id: &str, duration: &str) -> Result<()> {
        self.set_single_select(item_id, "Duration", duration).await
    }

    /// Resolves a field and option by exact name and writes the value.
    ///
    /// All three write operations share this path, so a name that does not
    /// resolve fails the mutation the same way for each of them: the error
    /// names the field and option, and remote state is left unchanged.
    async fn set_single_select(
        &self,
        item_id: &str,
        field_name: &str,
        option_name: &str,
    ) -> Result<()> {
        let project_id = self
            .client
            .resolve_project_id(&self.org, self.project_number)
            .await?;

        let fields = self.client.fetch_fields(&project_id).await?;

        let Some((field_id, option)) = resolve_option(&fields, field_name, option_name) else {
            warn!("Could not find {option_name} in {field_name} field options.");
            return Err(BoardGraphError::UnresolvedOption {
                field: field_name.to_string(),
                option: option_name.to_string(),
            });
        };

        self.client
            .update_single_select(&project_id, item_id, &field_id, &option.id)
            .await?;

        info!("Set {field_name} = {option_name} on item {item_id}");
        Ok(())
    }
}

/// Scans field definitions for an exact field-name match, then that field's
/// options for an exact option-name match.
fn resolve_option(
    fields: &[FieldDefinition],
    field_name: &str,
    option_name: &str,
) -> Option<(String, SelectOption)> {
    let field = fields.iter().find(|f| f.name == field_name)?;
    let option = field.options().iter().find(|o| o.name == option_name)?;
    Some((field.id.clone(), option.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::github::types::FieldKind;

    fn status_field() -> FieldDefinition {
        FieldDefinition {
            id: "F1".into(),
            name: "Status".into(),
            kind: FieldKind::SingleSelect(vec![
                SelectOption {
                    id: "O1".into(),
                    name: "Todo".into(),
                },
                SelectOption {
                    id: "O2".into(),
                    name: "Done".into(),
                },
            ]),
        }
    }

    #[test]
    fn test_resolve_option_exact_match() {
        let fields = vec![status_field()];
        let (field_id, option) = resolve_option(&fields, "Status", "Done").unwrap();
        assert_eq!(field_id, "F1");
        assert_eq!(option.id, "O2");
    }

    #[test]
    fn test_resolve_option_unknown_option() {
        let fields = vec![status_field()];
        assert!(resolve_option(&fields, "Status", "Archived").is_none());
    }

    #[test]
    fn test_resolve_option_unknown_field() {
        let fields = vec![status_field()];
        assert!(resolve_option(&fields, "Priority", "High").is_none());
    }

    #[test]
    fn test_resolve_option_requires_exact_case() {
        let fields = vec![status_field()];
        assert!(resolve_option(&fields, "status", "Done").is_none());
        assert!(resolve_option(&fields, "Status", "done").is_none());
    }
}
