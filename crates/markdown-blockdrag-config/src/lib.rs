use markdown_blockdrag_engine::interaction::{DropPolicy, OperationKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Persisted drag-and-drop preferences.
///
/// Stored as flat TOML, one key per modifier class:
///
/// ```toml
/// simple_same_pane = "move"
/// simple_different_panes = "embed"
/// shift = "copy"
/// alt = "none"
/// show_handle_on_hover = true
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simple_same_pane: OperationKind,
    pub simple_different_panes: OperationKind,
    pub shift: OperationKind,
    /// Applies to alt and meta alike
    pub alt: OperationKind,
    pub show_handle_on_hover: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_policy(DropPolicy::default(), true)
    }
}

impl Settings {
    pub fn from_policy(policy: DropPolicy, show_handle_on_hover: bool) -> Self {
        Self {
            simple_same_pane: policy.same_pane,
            simple_different_panes: policy.different_panes,
            shift: policy.shift,
            alt: policy.alt_or_meta,
            show_handle_on_hover,
        }
    }

    pub fn policy(&self) -> DropPolicy {
        DropPolicy {
            same_pane: self.simple_same_pane,
            different_panes: self.simple_different_panes,
            shift: self.shift,
            alt_or_meta: self.alt,
        }
    }

    /// Read settings from `config_path`; `None` when the file does not exist.
    ///
    /// A file that is not TOML is an error. Individual keys holding invalid
    /// values fall back to their defaults and unknown keys are ignored.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let table: toml::Table =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        let defaults = Self::default();
        let settings = Self {
            simple_same_pane: read_key(&table, "simple_same_pane", defaults.simple_same_pane),
            simple_different_panes: read_key(
                &table,
                "simple_different_panes",
                defaults.simple_different_panes,
            ),
            shift: read_key(&table, "shift", defaults.shift),
            alt: read_key(&table, "alt", defaults.alt),
            show_handle_on_hover: read_key(
                &table,
                "show_handle_on_hover",
                defaults.show_handle_on_hover,
            ),
        };

        for key in table.keys().filter(|key| !KNOWN_KEYS.contains(&key.as_str())) {
            log::debug!("ignoring unknown setting {key} in {}", config_path.display());
        }

        Ok(Some(settings))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Like [`Settings::load_from_path`], but any failure yields the defaults.
    pub fn load_or_default_from_path<P: AsRef<Path>>(config_path: P) -> Self {
        match Self::load_from_path(config_path) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    pub fn load_or_default() -> Self {
        Self::load_or_default_from_path(Self::config_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-blockdrag");
        PathBuf::from(config_dir.as_ref()).join("settings.toml")
    }
}

const KNOWN_KEYS: [&str; 5] = [
    "simple_same_pane",
    "simple_different_panes",
    "shift",
    "alt",
    "show_handle_on_hover",
];

fn read_key<T: DeserializeOwned>(table: &toml::Table, key: &str, default: T) -> T {
    let Some(value) = table.get(key) else {
        return default;
    };
    match value.clone().try_into() {
        Ok(parsed) => parsed,
        Err(err) => {
            log::warn!("invalid value for setting {key} ({value}): {err}; using default");
            default
        }
    }
}
