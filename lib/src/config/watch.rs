use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::{Duration, FixedOffset};
use serde_derive::Deserialize;
use tracing::debug;
use url::Url;

use crate::notify::MessageOptions;
use crate::pipeline::{ForumWatch, PipelineOptions, ThreadErrorPolicy};
use crate::util;

use super::*;

pub const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_CONFIG_TOML: &str = include_str!("default_config.toml");

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscordConfig {
    pub bot_token: String,
    pub channel_id: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ForumConfig {
    pub name: String,
    pub id: u64,
    #[serde(default)]
    pub threads: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ThreadwatchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Minutes.
    #[serde(default = "default_update_window")]
    pub update_window: i64,
    /// Hours.
    #[serde(default = "default_display_utc_offset")]
    pub display_utc_offset: i32,
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,
    #[serde(default = "default_include_post_time")]
    pub include_post_time: bool,
    #[serde(default)]
    pub on_thread_error: ThreadErrorPolicy,
    /// Seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    pub auth: Option<AuthConfig>,
    pub discord: Option<DiscordConfig>,
    #[serde(default)]
    pub forums: Vec<ForumConfig>,
}

#[derive(Debug)]
pub struct ResolvedConfig {
    pub pipeline: PipelineOptions,
    pub message: MessageOptions,
    pub request_timeout: StdDuration,
    pub auth: Option<AuthConfig>,
    pub discord: Option<DiscordConfig>,
    pub forums: Vec<ForumWatch>,
}

fn default_base_url() -> String {
    "https://gamersplane.com".to_owned()
}

fn default_update_window() -> i64 {
    10
}

fn default_display_utc_offset() -> i32 {
    -8
}

fn default_excerpt_length() -> usize {
    300
}

fn default_include_post_time() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

impl ThreadwatchConfig {
    pub fn from_file(path: &Path) -> Result<Self, WatchError> {
        let mut file = util::open_file(path).map_err(WatchError::OpenConfig)?;

        let mut toml_str = String::new();
        file.read_to_string(&mut toml_str).map_err(WatchError::ReadConfig)?;

        Self::from_str(&toml_str)
    }

    /// Directory the config file lives in by default.
    pub fn default_location() -> Option<PathBuf> {
        get_default_config_path()
    }

    pub fn path_from_location(path: &Path) -> PathBuf {
        path.join(CONFIG_FILENAME)
    }

    /// Load the config file from a config directory.
    ///
    /// Unlike most settings, the watched forums have no sensible default, so a
    /// missing file is an error rather than an empty config.
    pub fn from_location(path: &Path) -> Result<Self, WatchError> {
        let config_file_path = Self::path_from_location(path);

        if !config_file_path.exists() {
            return Err(WatchError::Config(
                format!(
                    "Config file not found: {}. Run 'threadwatch generate-config' to create one.",
                    config_file_path.display()
                )
                .into(),
            ));
        }

        debug!("Loading config from {}", config_file_path.display());

        Self::from_file(&config_file_path)
    }

    pub fn from_default_location() -> Result<Self, WatchError> {
        let path = Self::default_location()
            .ok_or_else(|| WatchError::Config("No default configuration directory found.".into()))?;

        Self::from_location(&path)
    }

    pub fn write_default() -> Result<PathBuf, WatchError> {
        let config_location = Self::default_location()
            .ok_or_else(|| WatchError::Config("No default configuration directory found.".into()))?;

        Self::write_default_to(&config_location)
    }

    /// Write the bundled default config into `path`, unless a config file is already there.
    /// Returns the path of the config file.
    pub fn write_default_to(path: &Path) -> Result<PathBuf, WatchError> {
        let config_file_path = Self::path_from_location(path);

        if !config_file_path.exists() {
            // Create config directory if necessary.
            util::ensure_parent_dir(&config_file_path).map_err(WatchError::CreateFile)?;

            // Write config file.
            let mut file = util::create_file(&config_file_path).map_err(WatchError::CreateFile)?;
            file.write_all(DEFAULT_CONFIG_TOML.as_bytes())
                .map_err(WatchError::WriteFile)?;
        }

        Ok(config_file_path)
    }

    /// Validate the configuration and convert it into runtime options.
    pub fn resolve(self) -> Result<ResolvedConfig, WatchError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|err| WatchError::Config(format!("Invalid base-url '{}': {}", self.base_url, err).into()))?;

        if self.update_window < 0 {
            return Err(WatchError::Config("update-window must not be negative.".into()));
        }

        let window = Duration::try_minutes(self.update_window)
            .ok_or_else(|| WatchError::Config("update-window is too large.".into()))?;

        let display_offset = (-23..=23)
            .contains(&self.display_utc_offset)
            .then(|| FixedOffset::east_opt(self.display_utc_offset * 3600))
            .flatten()
            .ok_or_else(|| WatchError::Config("display-utc-offset must be between -23 and 23 hours.".into()))?;

        let mut seen_ids: HashSet<u64> = HashSet::new();
        for forum in self.forums.iter() {
            if !seen_ids.insert(forum.id) {
                return Err(WatchError::Config(format!("Forum id {} is listed more than once.", forum.id).into()));
            }
        }

        let forums = self
            .forums
            .into_iter()
            .map(|forum| ForumWatch {
                id: forum.id,
                name: forum.name,
                threads: forum.threads.into_iter().collect(),
            })
            .collect();

        Ok(ResolvedConfig {
            pipeline: PipelineOptions {
                base_url,
                window,
                display_offset,
                excerpt_length: self.excerpt_length,
                on_thread_error: self.on_thread_error,
            },
            message: MessageOptions {
                include_post_time: self.include_post_time,
            },
            request_timeout: StdDuration::from_secs(self.request_timeout),
            auth: self.auth,
            discord: self.discord,
            forums,
        })
    }
}

impl FromStr for ThreadwatchConfig {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s).map_err(|err| WatchError::ParseConfig(err.to_string().into()))?;

        Ok(config)
    }
}
