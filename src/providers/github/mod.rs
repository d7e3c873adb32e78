mod builder;
mod client;
mod provider;
mod types;


pub use client::GITHUB_GRAPHQL_URL;
pub use provider::GitHubProjectProvider;
