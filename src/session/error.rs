use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    /// The auth backend rejected the request; message passed through
    /// unmodified.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("invalid backend URL: {0}")]
    InvalidBaseUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("session cache error: {0}")]
    Cache(#[from] std::io::Error),

    #[error("HOME environment variable not set")]
    NoHome,
}
