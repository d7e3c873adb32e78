use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardGraphError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    #[error("Response is missing expected data at {0}")]
    MissingData(String),

    #[error("Could not resolve option '{option}' on field '{field}'")]
    UnresolvedOption { field: String, option: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BoardGraphError>;
