//! The configured scalars driving a drink transaction.
//!
//! Values and bounds mirror the shipped defaults; a config file may set any
//! subset of fields and the rest fall back to defaults. Files are loaded
//! with format detection (RON/TOML/JSON by extension) and range-validated
//! before use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct
// ---------------------------------------------------------------------------

/// All tunables of the drink transaction core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrinkConfig {
    /// Fluid volume consumed from the linked source per drink.
    pub drink_volume: u32,
    /// Thirst points restored per 250 volume units.
    pub thirst_per_ration: u32,
    /// Quench points restored per 250 volume units.
    pub quench_per_ration: u32,
    /// Nausea duration in seconds for low-purity drinks. 0 disables.
    pub nausea_seconds: u32,
    /// Hunger duration in seconds for dirty drinks. 0 disables.
    pub hunger_seconds: u32,
    /// Whether drinking spends stored energy at all.
    pub energy_enabled: bool,
    /// Maximum energy the vessel can store.
    pub energy_capacity: u64,
    /// Energy spent per combined thirst+quench point. 0 disables the budget
    /// check even when `energy_enabled` is set.
    pub energy_cost_per_point: u64,
}

impl Default for DrinkConfig {
    fn default() -> Self {
        Self {
            drink_volume: 500,
            thirst_per_ration: 2,
            quench_per_ration: 2,
            nausea_seconds: 8,
            hunger_seconds: 13,
            energy_enabled: true,
            energy_capacity: 100_000,
            energy_cost_per_point: 1_000,
        }
    }
}

impl DrinkConfig {
    /// Whether the energy budget gates drinking under this config.
    pub fn energy_gated(&self) -> bool {
        self.energy_enabled && self.energy_cost_per_point > 0
    }

    /// Validate every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        range(
            "drink_volume",
            u64::from(self.drink_volume),
            1,
            100_000,
        )?;
        range("thirst_per_ration", u64::from(self.thirst_per_ration), 0, 20)?;
        range("quench_per_ration", u64::from(self.quench_per_ration), 0, 20)?;
        range("nausea_seconds", u64::from(self.nausea_seconds), 0, 300)?;
        range("hunger_seconds", u64::from(self.hunger_seconds), 0, 300)?;
        range("energy_capacity", self.energy_capacity, 1, 10_000_000)?;
        range(
            "energy_cost_per_point",
            self.energy_cost_per_point,
            0,
            1_000_000,
        )?;
        Ok(())
    }

    /// Load and validate a config file, detecting the format from its
    /// extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: DrinkConfig = deserialize_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

fn range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A field value is outside its allowed range.
    #[error("{field} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Format detection
// ---------------------------------------------------------------------------

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(ConfigError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Read a file and deserialize it according to its detected format.
fn deserialize_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| ConfigError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
        Format::Json => serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
        Format::Toml => toml::from_str(&content).map_err(|e| ConfigError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
