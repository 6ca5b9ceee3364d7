//! Configuration loading and parsing for DBC generation

use anyhow::{Context, Result};
use can_log_stats::SynthesisOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub synthesis: SynthesisOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Rendering options for the generated DBC file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// `VERSION` string (default "TODO")
    pub version: Option<String>,
    /// Node name used for `BU_`, transmitters and receivers (default "TODO")
    pub node: Option<String>,
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub use_min_bytes: bool,
    pub ignore_constant: bool,
    pub min_frequency: Option<f64>,
    pub max_frequency: Option<f64>,
    pub version: Option<String>,
    pub node: Option<String>,
}

impl AppConfig {
    /// Apply command-line flags on top of the loaded configuration
    ///
    /// Switches can only turn an option on; values replace the file's.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        self.synthesis.use_min_bytes |= overrides.use_min_bytes;
        self.synthesis.ignore_constant |= overrides.ignore_constant;
        if overrides.min_frequency.is_some() {
            self.synthesis.min_frequency = overrides.min_frequency;
        }
        if overrides.max_frequency.is_some() {
            self.synthesis.max_frequency = overrides.max_frequency;
        }
        if overrides.version.is_some() {
            self.output.version = overrides.version;
        }
        if overrides.node.is_some() {
            self.output.node = overrides.node;
        }
        self
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .synthesis
        .validate()
        .with_context(|| format!("Invalid [synthesis] section in {:?}", path))?;

    Ok(config)
}
