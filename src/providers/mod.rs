mod github;

pub use github::{GitHubProjectProvider, GITHUB_GRAPHQL_URL};
