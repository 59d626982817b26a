use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum JoinMatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A list or search failed to load; the message is the one shown to the user.
    #[error("could not fetch {what}: {message}")]
    Fetch { what: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, JoinMatchError>;
