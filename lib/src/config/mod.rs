use std::path::PathBuf;

use tracing::error;

use crate::error::*;

mod watch;

pub use self::watch::*;

pub const CONFIG_DIR: &str = "threadwatch";

pub fn get_default_config_path() -> Option<PathBuf> {
    let config_path = dirs::config_dir().map(|p| p.join(CONFIG_DIR));

    if config_path.is_none() {
        error!("Could not get configuration path!");
    }

    config_path
}

/// Write the default config file, unless one already exists.
/// Returns the path of the config file.
pub fn generate_default_config() -> Result<PathBuf, WatchError> {
    ThreadwatchConfig::write_default()
}
