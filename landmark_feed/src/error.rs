//! Error type for the landmark feed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    /// Socket or other I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Datagram was not valid feed JSON
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Well-formed JSON with inconsistent content
    #[error("malformed message: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;
