use std::borrow::Cow;
use std::fmt;
use std::io;

use thiserror::Error;

#[derive(Debug)]
pub enum FetchError {
    Http { code: u16, description: Cow<'static, str> },
    Network(Cow<'static, str>),
    Other(Cow<'static, str>),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { code, description } => write!(f, "HTTP error: {code} {description}"),
            Self::Network(err) => write!(f, "Network error: {err}"),
            Self::Other(err) => write!(f, "{err}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Fetch error: {0}")]
    Fetch(FetchError),
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(Cow<'static, str>),
    #[error("Malformed post block: {0}")]
    MalformedPostBlock(Cow<'static, str>),
    #[error("No posts found")]
    NoPostsFound,
    #[error("Post has no author")]
    NoPostAuthor,
    #[error("Login failed: {0}")]
    Login(Cow<'static, str>),
    #[error("Error sending notification: {0}")]
    Notify(Cow<'static, str>),
    #[error("Error opening config: {0:#}")]
    OpenConfig(anyhow::Error),
    #[error("Error reading config")]
    ReadConfig(io::Error),
    #[error("Error parsing config: {0}")]
    ParseConfig(Cow<'static, str>),
    #[error("Configuration error: {0}")]
    Config(Cow<'static, str>),
    #[error("Error creating file: {0:#}")]
    CreateFile(anyhow::Error),
    #[error("Error writing file")]
    WriteFile(io::Error),
    #[error("Error: {0}")]
    Other(Cow<'static, str>),
}

impl From<FetchError> for WatchError {
    fn from(err: FetchError) -> Self {
        Self::Fetch(err)
    }
}
