use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::auth::Token;
use crate::error::{BoardGraphError, Result};

use super::types::{FieldDefinition, IssueComment, RawField, RawItem};

/// GitHub's GraphQL endpoint.
pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Items fetched per page.
pub(super) const PAGE_SIZE: i64 = 20;

const FIELDS_QUERY: &str = r"
query($project: ID!) {
  node(id: $project) {
    ... on ProjectV2 {
      fields(first: 20) {
        nodes {
          ... on ProjectV2Field {
            id
            name
          }
          ... on ProjectV2SingleSelectField {
            id
            name
            options {
              id
              name
            }
          }
          ... on ProjectV2IterationField {
            id
            name
            configuration {
              iterations {
                startDate
                id
              }
            }
          }
        }
      }
    }
  }
}";

const ITEMS_QUERY: &str = r"
query($project: ID!, $first: Int!, $cursor: String) {
  node(id: $project) {
    ... on ProjectV2 {
      items(first: $first, after: $cursor) {
        nodes {
          id
          fieldValues(first: 100) {
            nodes {
              ... on ProjectV2ItemFieldTextValue {
                text
                field {
                  ... on ProjectV2FieldCommon {
                    name
                  }
                }
              }
              ... on ProjectV2ItemFieldIterationValue {
                title
                iterationId
              }
              ... on ProjectV2ItemFieldDateValue {
                date
                field {
                  ... on ProjectV2FieldCommon {
                    name
                  }
                }
              }
              ... on ProjectV2ItemFieldSingleSelectValue {
                name
                field {
                  ... on ProjectV2FieldCommon {
                    name
                  }
                }
              }
            }
          }
          content {
            ... on Issue {
              title
              body
              number
              labels(first: 10) {
                edges {
                  node {
                    name
                  }
                }
              }
              assignees(first: 10) {
                nodes {
                  login
                }
              }
            }
          }
        }
        pageInfo {
          endCursor
          hasNextPage
        }
      }
    }
  }
}";

const PROJECT_ID_QUERY: &str = r"
query($org: String!, $number: Int!) {
  organization(login: $org) {
    projectV2(number: $number) {
      id
    }
  }
}";

const COMMENTS_QUERY: &str = r"
query($owner: String!, $repo: String!, $number: Int!, $last: Int!) {
  repository(owner: $owner, name: $repo) {
    issue(number: $number) {
      comments(last: $last) {
        nodes {
          author {
            login
          }
          id
          body
        }
      }
    }
  }
}";

const UPDATE_FIELD_MUTATION: &str = r"
mutation($project: ID!, $item: ID!, $field: ID!, $option: String!) {
  updateProjectV2ItemFieldValue(
    input: {projectId: $project, itemId: $item, fieldId: $field, value: {singleSelectOptionId: $option}}
  ) {
    clientMutationId
  }
}";

/// Client for the GitHub Projects GraphQL API.
///
/// Constructed once per run and passed by reference into each retrieval
/// call; request headers live here, not in any ambient global.
pub struct ProjectsClient {
    client: reqwest::Client,
    graphql_url: Url,
}

impl ProjectsClient {
    /// Creates a client authenticating every request with the given token.
    ///
    /// `graphql_url` is [`GITHUB_GRAPHQL_URL`] in production; tests point it
    /// at a mock server.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(graphql_url: &str, token: &Token) -> Result<Self> {
        let graphql_url = Url::parse(graphql_url)
            .map_err(|e| BoardGraphError::Config(format!("Invalid GraphQL URL: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("boardgraph/0.1.0"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|e| BoardGraphError::Config(format!("Invalid token: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| BoardGraphError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            graphql_url,
        })
    }

    /// Resolves the board's node id from an organization login and project
    /// number.
    pub async fn resolve_project_id(&self, org: &str, number: i64) -> Result<String> {
        let data: ProjectIdData = self
            .post_graphql(PROJECT_ID_QUERY, json!({ "org": org, "number": number }))
            .await?;

        data.organization
            .and_then(|o| o.project_v2)
            .map(|p| p.id)
            .ok_or_else(|| {
                BoardGraphError::MissingData(format!(
                    "organization.projectV2 (org '{org}', project {number})"
                ))
            })
    }

    /// Fetches the board's field definitions, classified into tagged
    /// [`FieldDefinition`] records.
    pub async fn fetch_fields(&self, project_id: &str) -> Result<Vec<FieldDefinition>> {
        let data: FieldsData = self
            .post_graphql(FIELDS_QUERY, json!({ "project": project_id }))
            .await?;

        let nodes = data
            .node
            .and_then(|n| n.fields)
            .map(|f| f.nodes)
            .ok_or_else(|| BoardGraphError::MissingData("node.fields.nodes".to_string()))?;

        Ok(nodes
            .into_iter()
            .filter_map(FieldDefinition::classify)
            .collect())
    }

    /// Fetches all board items with cursor-based pagination.
    ///
    /// Keeps requesting pages of [`PAGE_SIZE`] items until the API reports
    /// no next page. An unbounded board performs an unbounded number of
    /// sequential requests.
    pub async fn fetch_items(&self, project_id: &str) -> Result<Vec<RawItem>> {
        let mut all_items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let data: ItemsData = self
                .post_graphql(
                    ITEMS_QUERY,
                    json!({ "project": project_id, "first": PAGE_SIZE, "cursor": cursor }),
                )
                .await?;

            let items = data
                .node
                .and_then(|n| n.items)
                .ok_or_else(|| BoardGraphError::MissingData("node.items".to_string()))?;

            all_items.extend(items.nodes);

            if !items.page_info.has_next_page {
                break;
            }

            cursor = items.page_info.end_cursor;

            // If hasNextPage is true but no cursor came back, break rather
            // than loop forever on the same page.
            if cursor.is_none() {
                break;
            }
        }

        Ok(all_items)
    }

    /// Fetches the `last` most recent comments of one issue.
    pub async fn fetch_comments(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        last: usize,
    ) -> Result<Vec<IssueComment>> {
        let data: CommentsData = self
            .post_graphql(
                COMMENTS_QUERY,
                json!({ "owner": owner, "repo": repo, "number": issue_number, "last": last }),
            )
            .await?;

        data.repository
            .and_then(|r| r.issue)
            .map(|i| i.comments.nodes)
            .ok_or_else(|| {
                BoardGraphError::MissingData(format!(
                    "repository.issue.comments (issue {issue_number})"
                ))
            })
    }

    /// Sets a single-select field value on one item.
    pub async fn update_single_select(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> Result<()> {
        let _: serde_json::Value = self
            .post_graphql(
                UPDATE_FIELD_MUTATION,
                json!({
                    "project": project_id,
                    "item": item_id,
                    "field": field_id,
                    "option": option_id,
                }),
            )
            .await?;

        Ok(())
    }

    /// Executes one GraphQL request and unwraps the response envelope.
    ///
    /// Distinguishes network failure, non-2xx responses, GraphQL errors in
    /// the envelope, and an absent data payload. No retries: every call is
    /// a single round trip.
    async fn post_graphql<T>(&self, query: &str, variables: serde_json::Value) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(self.graphql_url.clone())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(BoardGraphError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: GraphQlEnvelope<T> = response.json().await?;

        if let Some(errors) = envelope.errors {
            return Err(BoardGraphError::GraphQl(
                errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join(", "),
            ));
        }

        envelope
            .data
            .ok_or_else(|| BoardGraphError::MissingData("data".to_string()))
    }
}

// GraphQL response envelope and per-query payloads.

#[derive(Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlErrorMessage>>,
}

#[derive(Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

#[derive(Deserialize)]
struct ProjectIdData {
    organization: Option<Organization>,
}

#[derive(Deserialize)]
struct Organization {
    #[serde(rename = "projectV2")]
    project_v2: Option<ProjectRef>,
}

#[derive(Deserialize)]
struct ProjectRef {
    id: String,
}

#[derive(Deserialize)]
struct FieldsData {
    node: Option<FieldsNode>,
}

#[derive(Deserialize)]
struct FieldsNode {
    fields: Option<FieldConnection>,
}

#[derive(Deserialize)]
struct FieldConnection {
    nodes: Vec<RawField>,
}

#[derive(Deserialize)]
struct ItemsData {
    node: Option<ItemsNode>,
}

#[derive(Deserialize)]
struct ItemsNode {
    items: Option<ItemConnection>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemConnection {
    nodes: Vec<RawItem>,
    page_info: PageInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

#[derive(Deserialize)]
struct CommentsData {
    repository: Option<Repository>,
}

#[derive(Deserialize)]
struct Repository {
    issue: Option<IssueNode>,
}

#[derive(Deserialize)]
struct IssueNode {
    comments: CommentConnection,
}

#[derive(Deserialize)]
struct CommentConnection {
    nodes: Vec<IssueComment>,
}
