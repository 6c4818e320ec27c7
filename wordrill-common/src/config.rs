//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV_VAR: &str = "WORDRILL_ROOT";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "wordrill.db";

/// Default number of words written per bulk score transaction
pub const DEFAULT_SCORE_BATCH_SIZE: usize = 1000;

/// Default SQLite busy timeout
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5730;

/// Contents of `config.toml`
///
/// Every section is optional; missing keys fall back to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct WordrillConfig {
    pub root_folder: Option<PathBuf>,
    pub engine: EngineConfig,
    pub server: ServerConfig,
}

/// `[engine]` section
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Chunk size for bulk score updates after each selection
    pub score_batch_size: usize,
    /// SQLite busy timeout applied at pool initialization
    pub busy_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            score_batch_size: DEFAULT_SCORE_BATCH_SIZE,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// `[server]` section
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl WordrillConfig {
    /// Parse and validate TOML configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: WordrillConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration
    ///
    /// An explicit path must exist and parse. Without one, the platform
    /// config locations are searched and defaults are used if none exists.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(path) => path.to_path_buf(),
            None => match locate_config_file() {
                Some(path) => path,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        tracing::info!("Loaded config file: {}", path.display());
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.engine.score_batch_size == 0 {
            return Err(Error::Config(
                "engine.score_batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>, config: &WordrillConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(root_folder) = &config.root_folder {
        return root_folder.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Path of the database file inside a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE_NAME)
}

/// Find the first existing config file for the platform
fn locate_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("wordrill").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/wordrill/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/wordrill (or /var/lib/wordrill for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("wordrill"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/wordrill"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("wordrill"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/wordrill"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("wordrill"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\wordrill"))
    } else {
        PathBuf::from("./wordrill_data")
    }
}
