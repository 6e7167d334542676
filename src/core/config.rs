//! # Configuration
//!
//! Centralizes the store's settings with a clear override hierarchy:
//! defaults → config file → env vars.
//!
//! Config lives at `~/.shelf/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use chrono::Duration;

use crate::core::storage;
use crate::core::store::DEFAULT_RETENTION_DAYS;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ShelfConfig {
    #[serde(default)]
    pub library: LibraryConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Library file name, or an absolute path. Relative names live under
    /// `~/.shelf/`.
    pub file: Option<String>,
    /// Days a book stays in the recycle bin before automatic purge.
    pub retention_days: Option<i64>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub library_path: PathBuf,
    pub retention: Duration,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.shelf/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".shelf").join("config.toml"))
}

/// Load config from `~/.shelf/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ShelfConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ShelfConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ShelfConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ShelfConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: ShelfConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Shelf Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults, then this file, then env vars.

# [library]
# file = "books.json"        # File name under ~/.shelf/, or an absolute path
# retention_days = 28        # Recycle-bin window before automatic purge
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars.
pub fn resolve(config: &ShelfConfig) -> ResolvedConfig {
    // Library file: env → config → default
    let file = std::env::var("SHELF_LIBRARY_FILE")
        .ok()
        .or_else(|| config.library.file.clone())
        .unwrap_or_else(|| storage::LIBRARY_FILE_NAME.to_string());

    let file = PathBuf::from(file);
    let library_path = if file.is_absolute() {
        file
    } else {
        match dirs::home_dir() {
            Some(home) => home.join(".shelf").join(file),
            None => {
                warn!(
                    "Could not determine home directory, keeping the library in the working directory"
                );
                file
            }
        }
    };

    // Retention: env → config → default
    let retention_days = std::env::var("SHELF_RETENTION_DAYS")
        .ok()
        .and_then(|value| match value.parse::<i64>() {
            Ok(days) => Some(days),
            Err(_) => {
                warn!("Ignoring invalid SHELF_RETENTION_DAYS value: {value}");
                None
            }
        })
        .or(config.library.retention_days)
        .unwrap_or(DEFAULT_RETENTION_DAYS);

    ResolvedConfig {
        library_path,
        retention: Duration::days(retention_days),
    }
}
