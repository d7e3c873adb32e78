use crate::error::{BoardGraphError, Result};

/// Environment variable holding the GitHub personal access token.
pub const TOKEN_ENV_VAR: &str = "BOARDGRAPH_GITHUB_TOKEN";

/// A GitHub API bearer token.
///
/// Wrapped so the secret never leaks through `Debug` output or logs.
#[derive(Clone)]
pub struct Token(String);

impl Token {
    /// Reads the token from the `BOARDGRAPH_GITHUB_TOKEN` environment
    /// variable.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the variable is unset or empty.
    /// This is checked before any network access happens.
    pub fn from_env() -> Result<Self> {
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(value) if !value.is_empty() => Ok(Self(value)),
            _ => Err(BoardGraphError::Config(format!(
                "No GitHub API token found. Please set the {TOKEN_ENV_VAR} environment variable."
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(***)")
    }
}
