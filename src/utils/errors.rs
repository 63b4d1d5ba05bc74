use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    HttpRequestError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("JSON decoding failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Output error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("MovieBox API returned code {code}: {message}")]
    ApiError { code: i64, message: String },

    #[error("MovieBox API request failed: HTTP {status} body={body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Other error: {0}")]
    Other(String),
}
