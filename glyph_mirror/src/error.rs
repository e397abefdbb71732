//! Error types for the glyph mirror application.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`crate::config::Config`]
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config values out of range
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Window creation or update failed
    #[error("window error: {0}")]
    Window(String),

    /// Perception feed could not be started
    #[error("feed error: {0}")]
    Feed(#[from] landmark_feed::FeedError),
}

impl From<minifb::Error> for Error {
    fn from(e: minifb::Error) -> Self {
        Error::Window(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
