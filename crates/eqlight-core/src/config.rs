//! Tunable constants for the signal path, with documented semantics.
//!
//! Defaults are the values the firmware was calibrated with. Device timing
//! (reset width, strobe settle) is deliberately not here; see
//! [`crate::sampler`].

use serde::{Deserialize, Serialize};

use crate::bands::BAND_COUNT;
use crate::error::{CoreError, Result};

/// Filtering, calibration and AGC parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Raw level subtracted from every reading; anything at or below it is silence
    pub noise_floor: u16,

    /// Per-band sensitivity correction in tenths (9 = x0.9, 13 = x1.3)
    pub band_factors: [u8; BAND_COUNT],

    /// Exponential smoothing factor for per-band values (0..1, larger = faster)
    pub spectrum_smooth: f32,

    /// Fraction a peak-hold value loses every cycle
    pub peak_decay: f32,

    /// Smoothing factor of the long-horizon loudness average driving AGC
    pub agc_smooth: f32,

    /// Lower gain clamp
    pub gain_min: f32,

    /// Upper gain clamp
    pub gain_max: f32,

    /// Loudness the AGC steers the running average towards
    pub target_level: f32,

    /// Starting value of the running loudness average (must be > 0)
    pub initial_loudness: f32,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            noise_floor: 65,
            band_factors: [9, 11, 13, 13, 12, 12, 13],
            spectrum_smooth: 0.08,
            peak_decay: 0.01,
            agc_smooth: 0.004,
            gain_min: 0.1,
            gain_max: 15.0,
            target_level: 270.0,
            initial_loudness: 270.0,
        }
    }
}

impl ProcessorConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        check_factor("spectrum_smooth", self.spectrum_smooth)?;
        check_factor("agc_smooth", self.agc_smooth)?;

        if !self.peak_decay.is_finite() || !(0.0..1.0).contains(&self.peak_decay) {
            return Err(CoreError::InvalidConfig(format!(
                "peak_decay must be in [0, 1), got {}",
                self.peak_decay
            )));
        }
        if !self.gain_min.is_finite() || self.gain_min <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "gain_min must be > 0, got {}",
                self.gain_min
            )));
        }
        if !self.gain_max.is_finite() || self.gain_min > self.gain_max {
            return Err(CoreError::InvalidConfig(format!(
                "gain range is empty: [{}, {}]",
                self.gain_min, self.gain_max
            )));
        }
        check_positive("target_level", self.target_level)?;
        check_positive("initial_loudness", self.initial_loudness)?;

        if let Some(band) = self.band_factors.iter().position(|&f| f == 0) {
            return Err(CoreError::InvalidConfig(format!(
                "band_factors[{}] must be non-zero",
                band
            )));
        }
        Ok(())
    }
}

/// Beat detector thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeatConfig {
    /// How far bass must rise above its running average to trigger
    pub level: f32,

    /// How far bass must fall below the last peak to re-arm
    pub deadzone: f32,

    /// Minimum time between two triggers (milliseconds)
    pub delay_ms: u64,

    /// Smoothing factor of the running bass average
    pub smooth: f32,
}

impl Default for BeatConfig {
    fn default() -> Self {
        Self {
            level: 20.0,
            deadzone: 30.0,
            delay_ms: 50,
            smooth: 0.004,
        }
    }
}

impl BeatConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        check_factor("beat.smooth", self.smooth)?;
        if !self.level.is_finite() || self.level < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "beat.level must be >= 0, got {}",
                self.level
            )));
        }
        if !self.deadzone.is_finite() || self.deadzone < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "beat.deadzone must be >= 0, got {}",
                self.deadzone
            )));
        }
        Ok(())
    }
}

/// Complete signal path configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AudioConfig {
    /// Filtering and AGC
    pub processor: ProcessorConfig,

    /// Beat detection
    pub beat: BeatConfig,

    /// Minimum time between acquisition cycles (milliseconds, 0 = every frame)
    pub sample_interval_ms: u64,

    /// Log a loudness summary every N cycles (0 disables)
    pub log_every_cycles: u64,
}

impl AudioConfig {
    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.processor.validate()?;
        self.beat.validate()
    }

    /// Parse from TOML; missing keys take their defaults
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: AudioConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn check_factor(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(CoreError::InvalidConfig(format!(
            "{} must be in (0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_positive(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::InvalidConfig(format!(
            "{} must be > 0, got {}",
            name, value
        )));
    }
    Ok(())
}
