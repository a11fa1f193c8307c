//! Configuration file handling for roach.
//!
//! Looks for `.config/roach.styx` in the current directory or any parent
//! directory. `COCKROACH_*` environment variables override what the file
//! says; without a file, they are the whole configuration.

pub use roach_config::Config;

use roach_config::EnvError;
use std::path::{Path, PathBuf};

/// Load configuration for the current directory and process environment.
///
/// Returns the path of the file that was read, if any.
pub fn load() -> Result<(Config, Option<PathBuf>), ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(e.to_string()))?;
    load_from(&cwd, |key| std::env::var(key).ok())
}

/// Load configuration starting from a specific directory.
pub fn load_from(
    start: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<(Config, Option<PathBuf>), ConfigError> {
    let Some(config_path) = find_config_file(start) else {
        return Ok((Config::from_env(env)?, None));
    };

    let content =
        std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io(e.to_string()))?;
    let mut config: Config =
        facet_styx::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.apply_env(env)?;

    Ok((config, Some(config_path)))
}

/// Find `.config/roach.styx` by searching up the directory tree.
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".config/roach.styx");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading the file
    #[error("Failed to read .config/roach.styx: {0}")]
    Io(String),

    /// Parse error in the Styx file
    #[error("Failed to parse .config/roach.styx: {0}")]
    Parse(String),

    /// Missing or malformed environment variable
    #[error(transparent)]
    Env(#[from] EnvError),
}
