//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration comes from a small TOML file. A missing or
//! unreadable file is never fatal: the tools fall back to compiled defaults
//! and log a warning.
//!
//! Root folder priority:
//! 1. Command-line argument
//! 2. `SPARKLE_ROOT_FOLDER`, then `SPARKLE_ROOT` environment variables
//! 3. `root_folder` in the TOML file
//! 4. OS-dependent compiled default

use crate::paths::ROOT_DIR_NAME;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Primary root folder environment variable
pub const ENV_ROOT_FOLDER: &str = "SPARKLE_ROOT_FOLDER";

/// Alternative root folder environment variable
pub const ENV_ROOT: &str = "SPARKLE_ROOT";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Data root folder (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Lyrics lookup configuration
    #[serde(default)]
    pub lyrics: LyricsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (logs to stderr if not specified)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Lyrics lookup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricsConfig {
    /// File extensions in search priority order
    #[serde(default = "default_preferred_formats")]
    pub preferred_formats: Vec<String>,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            preferred_formats: default_preferred_formats(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_preferred_formats() -> Vec<String> {
    ["krc", "ksc", "hrcx", "hrcs", "lrc"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Compiled defaults for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let root_folder = dirs::data_local_dir()
            .map(|d| d.join(ROOT_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".").join(ROOT_DIR_NAME));

        Self {
            root_folder,
            log_level: default_log_level(),
        }
    }
}

/// Default location of the config file (`<config dir>/sparkle/sparkle.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sparkle").join("sparkle.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Load config from `path` (or the default location), falling back to defaults.
pub fn load_or_default(path: Option<&Path>) -> TomlConfig {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => {
                warn!("Could not determine config directory, using defaults");
                return TomlConfig::default();
            }
        },
    };

    if !path.exists() {
        warn!(path = %path.display(), "Config file not found, using defaults");
        return TomlConfig::default();
    }

    match load_toml_config(&path) {
        Ok(config) => {
            debug!(path = %path.display(), "Loaded config file");
            config
        }
        Err(e) => {
            warn!("{}; using defaults", e);
            TomlConfig::default()
        }
    }
}

/// Write config atomically (temp file + rename), mode 0600 on Unix
pub fn write_toml_config(config: &TomlConfig, target: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut temp_name = target.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    std::fs::write(&temp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    if let Err(e) = std::fs::rename(&temp_path, target) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}

/// Root folder resolver applying the priority order above
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        for var in [ENV_ROOT_FOLDER, ENV_ROOT] {
            if let Ok(path) = std::env::var(var) {
                if !path.is_empty() {
                    return PathBuf::from(path);
                }
            }
        }

        if let Some(path) = &self.toml_root {
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}
