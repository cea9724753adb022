//! Project configuration loaded from `eventb.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Deserialize;

/// Name of the optional per-project configuration file.
pub const CONFIG_FILE: &str = "eventb.toml";

/// Settings read from `eventb.toml` at the project root. Every field is
/// optional; defaults match the stock layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output directory for compiled artifacts, relative to the root.
    output_dir: String,
    /// Executable launched by `eventb rodin`.
    rodin_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: eventb_compile::OUTPUT_DIR.to_string(),
            rodin_path: "rodin".to_string(),
        }
    }
}

impl Config {
    /// Load the configuration under `root`, falling back to defaults when
    /// no file exists.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Output directory for compiled artifacts.
    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    /// Executable launched by `eventb rodin`.
    pub fn rodin_path(&self) -> &str {
        &self.rodin_path
    }
}
