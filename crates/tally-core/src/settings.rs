//! User settings loaded from `settings.toml`.
//!
//! ```toml
//! [names]
//! normalize = "upper"   # upper | lower | preserve
//!
//! [display]
//! decimals = 2
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use tally_engine::engine::Normalization;

use crate::error::{Result, TallyError};

const MAX_SETTINGS_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const MAX_DECIMALS: usize = 15;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub names: NameSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NameSettings {
    /// Canonical form for cell names and formula variables.
    pub normalize: Normalization,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    /// Decimal places for non-integral numbers.
    pub decimals: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings { decimals: 2 }
    }
}

impl Settings {
    /// Parse settings from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Settings> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`.
    pub fn load(path: &Path) -> Result<Settings> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_SETTINGS_FILE_BYTES {
            return Err(TallyError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Refusing to read {}: settings file too large ({} bytes, max {})",
                    path.display(),
                    meta.len(),
                    MAX_SETTINGS_FILE_BYTES
                ),
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load the user's settings file if there is one, else the defaults.
    pub fn load_default() -> Result<Settings> {
        match default_settings_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Settings::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.display.decimals > MAX_DECIMALS {
            return Err(TallyError::InvalidSetting(format!(
                "display.decimals must be at most {}, got {}",
                MAX_DECIMALS, self.display.decimals
            )));
        }
        Ok(())
    }
}

/// Location of the per-user settings file.
pub fn default_settings_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("me", "shoryuken", "tally")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("settings.toml");
    Some(path)
}
