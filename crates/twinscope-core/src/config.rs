use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Root application configuration, loaded from `~/.config/twinscope/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub core: CoreConfig,
    pub dedup: DedupConfig,
    /// Saved filters: name → query string.
    pub filters: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub library_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub default_threshold: f64,
    pub marker_prefix: String,
    pub marker_style: MarkerStyle,
    pub batch_size: usize,
    pub skip_trashed_in_pass: bool,
    /// Overrides of the record-mode default weights, by field name.
    pub record_weights: BTreeMap<String, f64>,
    /// Overrides of the name-mode default weights, by name part.
    pub name_weights: BTreeMap<String, f64>,
}

/// How duplicate markers are labelled within one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerStyle {
    /// One label for every tagged pair of the pass.
    #[default]
    Shared,
    /// The pass label suffixed with the candidate's position.
    PerPair,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for CoreConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("twinscope");

        Self {
            library_path: data_dir.to_string_lossy().to_string(),
        }
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            default_threshold: 0.6,
            marker_prefix: "duplicate-pair".to_string(),
            marker_style: MarkerStyle::Shared,
            batch_size: 100,
            skip_trashed_in_pass: true,
            record_weights: BTreeMap::new(),
            name_weights: BTreeMap::new(),
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/twinscope/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("TWINSCOPE_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("twinscope")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the standard path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        self.save_to(&path)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    // ─── Derived paths ─────────────────────────────────────

    pub fn library_path(&self) -> PathBuf {
        PathBuf::from(&self.core.library_path)
    }

    pub fn set_library_path(&mut self, path: PathBuf) {
        self.core.library_path = path.to_string_lossy().to_string();
    }

    /// Path to the cards directory.
    pub fn cards_dir(&self) -> PathBuf {
        self.library_path().join("cards")
    }

    /// Path to the run lock file.
    pub fn lock_path(&self) -> PathBuf {
        self.library_path().join(".dedup.lock")
    }
}
