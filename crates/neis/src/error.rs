use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("meal service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("meal service responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("meal service returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
