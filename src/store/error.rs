use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The store rejected the request. The message is whatever the backend
    /// reported, passed through unmodified for display.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// A scoped update/delete matched no row: the id does not exist or the
    /// row belongs to another account (row-level security filters it out
    /// silently, so an empty representation is the only signal we get).
    #[error("{0}")]
    NotFound(String),

    /// A mutation asked for its representation back and got nothing.
    #[error("store response contained no rows")]
    EmptyResponse,

    #[error("invalid column name: {0}")]
    InvalidColumn(String),

    #[error("invalid backend URL: {0}")]
    InvalidBaseUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed store response: {0}")]
    Decode(#[from] serde_json::Error),
}
