use std::borrow::Cow;

use threadwatch::{FetchError, WatchError};

#[derive(Debug)]
pub enum CliErrorKind {
    Config,
    Network,
    Other,
}

impl CliErrorKind {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config => 2,
            Self::Network => 3,
            Self::Other => 101,
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub kind: CliErrorKind,
    pub description: Cow<'static, str>,
}

impl CliError {
    pub fn new<S: Into<Cow<'static, str>>>(kind: CliErrorKind, description: S) -> CliError {
        CliError {
            kind,
            description: description.into(),
        }
    }
}

impl From<WatchError> for CliError {
    fn from(error: WatchError) -> Self {
        match error {
            WatchError::OpenConfig(err) => {
                CliError::new(CliErrorKind::Config, format!("Error opening config file: {err:#}"))
            }
            WatchError::ReadConfig(err) => {
                CliError::new(CliErrorKind::Config, format!("Error reading config file: {err}"))
            }
            WatchError::ParseConfig(err) => {
                CliError::new(CliErrorKind::Config, format!("Error parsing configuration: {err}"))
            }
            WatchError::Config(err) => CliError::new(CliErrorKind::Config, format!("Configuration error: {err}")),
            WatchError::CreateFile(err) => {
                CliError::new(CliErrorKind::Config, format!("Error creating file: {err:#}"))
            }
            WatchError::WriteFile(err) => CliError::new(CliErrorKind::Config, format!("Error writing file: {err}")),
            WatchError::Fetch(err) => match err {
                FetchError::Http { code, description } => {
                    CliError::new(CliErrorKind::Network, format!("HTTP error: {code} {description}"))
                }
                FetchError::Network(err) => CliError::new(CliErrorKind::Network, err.to_string()),
                FetchError::Other(err) => CliError::new(CliErrorKind::Other, err.to_string()),
            },
            WatchError::Login(err) => CliError::new(CliErrorKind::Network, format!("Login failed: {err}")),
            WatchError::Notify(err) => {
                CliError::new(CliErrorKind::Network, format!("Error sending notification: {err}"))
            }
            err @ (WatchError::MalformedTimestamp(_)
            | WatchError::MalformedPostBlock(_)
            | WatchError::NoPostsFound
            | WatchError::NoPostAuthor
            | WatchError::Other(_)) => CliError::new(CliErrorKind::Other, err.to_string()),
        }
    }
}
