use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable naming a config file to use instead of the default.
pub const CONFIG_ENV: &str = "MDCLIP_CONFIG";

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub markdown: MarkdownConfig,
    pub clipboard: ClipboardConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MarkdownConfig {
    pub tables: bool,
    pub tasklists: bool,
    pub strikethrough: bool,
    pub footnotes: bool,
    pub strip_frontmatter: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            tasklists: true,
            strikethrough: true,
            footnotes: false,
            strip_frontmatter: true,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardBackend {
    /// Configured command, else a detected clipboard program.
    #[default]
    Auto,
    Command,
    Osc52,
    Stdout,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct ClipboardConfig {
    pub backend: ClipboardBackend,
    /// Program and arguments receiving the text on stdin, e.g. `["wl-copy"]`.
    pub command: Vec<String>,
}

impl Config {
    /// The defaults shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        // Validated by build.rs
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::compiled_default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load config from a file that must exist.
    pub fn load_required(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Pick the config to use: an explicit path, then `$MDCLIP_CONFIG`, then
    /// the per-user default location.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_required(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load_required(Path::new(&path));
        }
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::compiled_default()),
        }
    }

    /// `<config dir>/mdclip/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mdclip").join("config.toml"))
    }

    fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
