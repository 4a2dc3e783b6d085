//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration is a small TOML file. Everything that may change
//! while a service runs lives in the `settings` table instead (see
//! [`crate::db::settings`]).

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "MDIST_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "mdist.db";

/// Bootstrap configuration loaded from TOML file
///
/// These settings cannot change during runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database and the asset store
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Identifier generation configuration
    #[serde(default)]
    pub identifiers: IdentifierConfig,

    /// Asset store configuration
    #[serde(default)]
    pub assets: AssetConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// ISRC registrant settings
#[derive(Debug, Clone, Deserialize)]
pub struct IdentifierConfig {
    /// Country code + registrant code (5 characters) prefixed to every ISRC
    #[serde(default = "default_isrc_registrant")]
    pub isrc_registrant: String,
}

/// Local asset store settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetConfig {
    /// Directory for uploaded assets; defaults to `<root_folder>/assets`
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_port() -> u16 {
    5740
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_isrc_registrant() -> String {
    "QZMD1".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self { isrc_registrant: default_isrc_registrant() }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            port: default_port(),
            bind_address: default_bind_address(),
            logging: LoggingConfig::default(),
            identifiers: IdentifierConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`
    ///
    /// A missing file yields the built-in defaults. A file that exists but
    /// cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let registrant = &self.identifiers.isrc_registrant;
        if registrant.len() != 5 || !registrant.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::Config(format!(
                "identifiers.isrc_registrant must be 5 alphanumeric characters, got {:?}",
                registrant
            )));
        }
        Ok(())
    }
}

/// Default config file path for a service (`<config_dir>/mdist/<file_name>`)
pub fn default_config_path(file_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mdist").join(file_name))
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        debug!("Root folder from command line: {}", path.display());
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            debug!("Root folder from {}: {}", env_var_name, path);
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.root_folder {
        debug!("Root folder from config file: {}", path.display());
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    get_default_root_folder()
}

/// Get OS-dependent default root folder path
fn get_default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mdist"))
        .unwrap_or_else(|| PathBuf::from("./mdist_data"))
}

/// Create the root folder if missing and return the database path inside it
pub fn prepare_root_folder(root_folder: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root_folder)?;
    Ok(root_folder.join(DATABASE_FILE))
}
