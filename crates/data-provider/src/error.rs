use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Expected element not found on page: {0}")]
    MissingElement(String),

    #[error("Could not read {what} from '{text}'")]
    InvalidNumber { what: String, text: String },

    #[error("Invalid CSS selector '{0}'")]
    Selector(String),

    #[error("No snapshot available for ticker '{0}'")]
    UnknownTicker(String),

    #[error("Failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize snapshot: {0}")]
    Deserialization(#[from] serde_json::Error),
}
