//! Application configuration (TOML file + CLI overrides)

use std::path::Path;

use anyhow::{bail, Context, Result};
use eqlight_core::logging::LogConfig;
use eqlight_core::{AudioConfig, BAND_COUNT};
use serde::{Deserialize, Serialize};

/// Parameters of the synthetic input signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// RNG seed for the noise component
    pub seed: u64,
    /// Resting ADC level per band (0..1023)
    pub base_levels: [u16; BAND_COUNT],
    /// Period of the slow loudness swell in milliseconds
    pub swell_period_ms: u64,
    /// Swell depth as a fraction of the base level (0..1)
    pub swell_depth: f32,
    /// Bass kicks per minute (0 disables kicks)
    pub bpm: f32,
    /// ADC level a kick adds to the two bass bands
    pub kick_level: u16,
    /// Kick decay time in milliseconds
    pub kick_ms: u64,
    /// Uniform noise amplitude in ADC counts
    pub noise: u16,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            base_levels: [380, 360, 330, 300, 270, 240, 200],
            swell_period_ms: 8000,
            swell_depth: 0.3,
            bpm: 120.0,
            kick_level: 550,
            kick_ms: 120,
            noise: 25,
        }
    }
}

impl SimulationConfig {
    /// Check ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.swell_depth) {
            bail!("simulation.swell_depth must be in 0..=1, got {}", self.swell_depth);
        }
        if !self.bpm.is_finite() || self.bpm < 0.0 {
            bail!("simulation.bpm must be >= 0, got {}", self.bpm);
        }
        if self.swell_period_ms == 0 {
            bail!("simulation.swell_period_ms must be > 0");
        }
        Ok(())
    }
}

/// Everything the binary reads from its config file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Signal path settings
    pub audio: AudioConfig,
    /// Logging settings
    pub logging: LogConfig,
    /// Simulated input
    pub simulation: SimulationConfig,
}

impl AppConfig {
    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.audio.validate().context("Invalid [audio] section")?;
        self.simulation.validate()?;
        Ok(())
    }

    /// Effective configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
