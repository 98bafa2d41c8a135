//! CLI configuration management.
//!
//! Supports loading configuration from a config file, environment variables
//! and CLI arguments with proper precedence:
//! defaults < config file < environment < command line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use casim_automaton::{Param, SimulationConfig};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Prefix of the environment variables that override simulation parameters,
/// e.g. `CASIM_RULE=110`.
pub const ENV_PREFIX: &str = "CASIM_";

/// Application-wide configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Simulation parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Characters used to draw each state, lowest state first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,

    /// File this configuration was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the config file and environment variables.
    ///
    /// `explicit` replaces the default config file location. A missing file
    /// yields defaults, and a later save creates it.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::load_file(explicit)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Load only the config file layer, without environment overrides.
    ///
    /// This is what gets written back by `config set`.
    pub fn load_file(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(Self::config_file_path);
        match path {
            Some(path) if path.exists() => Self::read_file(&path),
            Some(path) => Ok(Self {
                source: explicit.map(|_| path),
                ..Self::default()
            }),
            None => Ok(Self::default()),
        }
    }

    /// Apply `CASIM_*` environment overrides on top of the current values.
    fn apply_env(&mut self) -> Result<()> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        for param in Param::ALL {
            let var = env_var_name(param);
            if let Ok(value) = std::env::var(&var) {
                self.simulation
                    .set_param(param.name(), &value)
                    .with_context(|| format!("Invalid value in {var}"))?;
                debug!(var = %var, value = %value, "config_env_override");
            }
        }
        if let Ok(palette) = std::env::var(format!("{ENV_PREFIX}PALETTE")) {
            self.palette = Some(palette);
        }
        Ok(())
    }

    /// Save current configuration to the config file.
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = self
            .source
            .clone()
            .or_else(Self::config_file_path)
            .context("No config file location available on this platform")?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        Ok(config_path)
    }

    /// Get the path to the default config file.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "casim", "casim").map(|dirs| dirs.config_dir().join("config.json"))
    }

    fn read_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        debug!(path = %path.display(), "config_file_loaded");
        Ok(config)
    }
}

/// Environment variable that overrides `param`.
pub fn env_var_name(param: Param) -> String {
    format!("{ENV_PREFIX}{}", param.name().to_uppercase())
}
