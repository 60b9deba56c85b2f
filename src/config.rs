//! Configuration types for the jumpbox menu

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up next to the executable when no config is given
pub const DEFAULT_CONFIG_FILE: &str = "jumpbox.toml";

/// Where device and site records come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryKind {
    /// Local TOML inventory file
    #[default]
    Inventory,
    /// NetBox REST API
    Netbox,
}

/// Main menu text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub title: String,
    pub subtitle: String,
    /// Add an exit row to the main menu
    pub show_exit: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            title: "Jumpbox Main".to_string(),
            subtitle: "Select an option...".to_string(),
            show_exit: true,
        }
    }
}

/// Device directory settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub kind: DirectoryKind,

    /// Inventory file, used when `kind = "inventory"`
    pub inventory: PathBuf,

    /// NetBox API base, e.g. `http://netbox.example.com/api/`
    pub url: Option<String>,

    /// NetBox API token, sent as `Authorization: Token <token>`
    pub token: Option<String>,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            kind: DirectoryKind::default(),
            inventory: PathBuf::from("inventory.toml"),
            url: None,
            token: None,
            timeout_secs: 10,
        }
    }
}

/// Remote session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Program run for every connection
    pub command: String,

    /// Extra arguments placed before `-l <user> <target>`
    pub args: Vec<String>,

    /// Login name; when unset the operator is asked on every connection
    pub username: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            command: "ssh".to_string(),
            args: Vec::new(),
            username: None,
        }
    }
}

/// Configuration for the jumpbox menu
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub menu: MenuConfig,
    pub directory: DirectoryConfig,
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Find and load the configuration.
    ///
    /// An explicit path must exist. Without one, `jumpbox.toml` in
    /// `fallback_dir` is used if present, otherwise the defaults.
    /// Returns the file that was read, if any.
    pub fn resolve(
        explicit: Option<&Path>,
        fallback_dir: Option<&Path>,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load_from_file(path)?, Some(path.to_path_buf())));
        }

        match fallback_dir.map(|dir| dir.join(DEFAULT_CONFIG_FILE)) {
            Some(path) if path.is_file() => Ok((Self::load_from_file(&path)?, Some(path))),
            _ => Ok((Self::default(), None)),
        }
    }

    /// Reject settings that cannot produce a working menu
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.command.trim().is_empty() {
            return Err(ConfigError::Invalid("session.command must not be empty".into()));
        }
        if self.directory.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "directory.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.directory.kind == DirectoryKind::Netbox
            && self.directory.url.as_deref().is_none_or(|url| url.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "directory.url is required when directory.kind = \"netbox\"".into(),
            ));
        }
        Ok(())
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Settings parsed but make no sense together
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::Invalid(message) => write!(f, "Invalid configuration: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::Invalid(_) => None,
        }
    }
}
