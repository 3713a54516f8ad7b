use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::SortKey;

/// Application configuration, loaded from `~/.config/stanza/config.toml`.
/// Every field has a default, so a missing file or a partial file both
/// work.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub core: CoreConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
    /// Directory holding the annotation blob and, by default, the dataset.
    pub data_dir: PathBuf,
    /// Dataset override. `None` means `<data_dir>/books.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Sort applied at startup. Empty or unknown keeps catalog order.
    pub default_sort: String,
    /// Event poll interval in milliseconds.
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Log file used while the TUI owns the terminal. `None` means
    /// `<data_dir>/stanza.log`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Tracing filter used when RUST_LOG is unset.
    pub level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stanza");
        Self { data_dir, books_path: None }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { default_sort: String::new(), tick_ms: 250 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { file: None, level: "warn".to_string() }
    }
}

impl AppConfig {
    /// Standard config file location. `STANZA_CONFIG` overrides it.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("STANZA_CONFIG") {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stanza")
            .join("config.toml")
    }

    /// Load from the standard location, falling back to defaults when no
    /// file exists. `STANZA_DATA_DIR` and `STANZA_BOOKS_PATH` override the
    /// file either way.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("STANZA_DATA_DIR") {
            self.core.data_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("STANZA_BOOKS_PATH") {
            self.core.books_path = Some(PathBuf::from(path));
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    // ─── Derived paths ───────────────────────────────────────────────────

    /// Location of the annotation blob.
    pub fn annotations_path(&self) -> PathBuf {
        self.core.data_dir.join("annotations.json")
    }

    /// Location of the dataset file.
    pub fn books_path(&self) -> PathBuf {
        self.core
            .books_path
            .clone()
            .unwrap_or_else(|| self.core.data_dir.join("books.json"))
    }

    /// Location of the TUI log file.
    pub fn log_path(&self) -> PathBuf {
        self.log
            .file
            .clone()
            .unwrap_or_else(|| self.core.data_dir.join("stanza.log"))
    }

    /// Startup sort parsed from `ui.default_sort`.
    pub fn default_sort(&self) -> Option<SortKey> {
        SortKey::parse(&self.ui.default_sort)
    }
}
