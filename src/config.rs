use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file structure for boardgraph.
///
/// Lets users save their board coordinates and output preferences instead of
/// repeating them as flags. Loaded from the current directory or a specified
/// path; CLI flags take precedence over file values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Board coordinates
    #[serde(default)]
    pub board: BoardConfig,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BoardConfig {
    /// Organization login owning the board
    pub org: Option<String>,

    /// Repository holding the issues backing the cards
    pub repo: Option<String>,

    /// Project number within the organization
    pub project: Option<i64>,

    /// Most-recent comments fetched per card
    #[serde(default = "default_comment_limit")]
    pub comment_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            org: None,
            repo: None,
            project: None,
            comment_limit: default_comment_limit(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Summary,
            pretty: false,
        }
    }
}

fn default_comment_limit() -> usize {
    10
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./boardgraph.toml
    /// 3. ./boardgraph.json
    /// 4. ./boardgraph.yaml
    /// 5. ./boardgraph.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = [
            "boardgraph.toml",
            "boardgraph.json",
            "boardgraph.yaml",
            "boardgraph.yml",
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.board.org, None);
        assert_eq!(config.board.comment_limit, 10);
        assert_eq!(config.output.format, OutputFormat::Summary);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_load_toml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
[board]
org = "acme"
repo = "tracker"
project = 6
comment-limit = 5

[output]
format = "json"
pretty = true
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.board.org, Some("acme".to_string()));
        assert_eq!(config.board.repo, Some("tracker".to_string()));
        assert_eq!(config.board.project, Some(6));
        assert_eq!(config.board.comment_limit, 5);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let json_content = r#"{
  "board": {
    "org": "acme",
    "project": 6
  }
}"#;
        write!(temp_file, "{}", json_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.board.org, Some("acme".to_string()));
        assert_eq!(config.board.project, Some(6));
        assert_eq!(config.board.comment_limit, 10);
    }

    #[test]
    fn test_load_missing_path_is_an_error() {
        assert!(Config::load(Some(Path::new("nonexistent.toml"))).is_err());
    }
}
