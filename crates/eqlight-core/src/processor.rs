//! Signal processor - noise floor, band correction, AGC, smoothing and peak hold.
//!
//! One call to [`SignalProcessor::process`] is one acquisition cycle. The
//! processor itself is stateless; everything that persists between cycles
//! lives in [`SpectrumState`] and [`GainState`], which the caller owns.

use serde::{Deserialize, Serialize};

use crate::bands::{Band, RawBands, BAND_COUNT};
use crate::config::ProcessorConfig;

/// Per-band spectrum data shared with renderers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpectrumState {
    /// Floor-subtracted, corrected, gain-applied levels of the latest cycle
    pub raw: RawBands,
    /// Exponentially smoothed levels
    pub smoothed: [f32; BAND_COUNT],
    /// Peak-hold values of `smoothed`
    pub peak: [f32; BAND_COUNT],
    /// `raw / 4`, saturated to a byte
    pub scaled: [u8; BAND_COUNT],
    /// Pre-gain mean of the corrected bands, `/ 4`, saturated to a byte
    pub average8: u8,
}

impl SpectrumState {
    /// All-zero state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean of the two lowest smoothed bands
    pub fn bass_combo(&self) -> f32 {
        (self.smoothed[0] + self.smoothed[1]) / 2.0
    }

    /// Mean of the four lowest smoothed bands (VU-style effects)
    pub fn low_combo(&self) -> f32 {
        self.smoothed[..4].iter().sum::<f32>() / 4.0
    }

    /// Smoothed level of one band
    pub fn band(&self, band: Band) -> f32 {
        self.smoothed[band.index()]
    }
}

/// Automatic gain control state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainState {
    /// Long-horizon smoothed loudness (mean corrected band level)
    pub running_loudness_average: f32,
    /// Gain applied on the next cycle, always within the configured clamp
    pub gain: f32,
}

impl GainState {
    /// Initial state for a configuration
    pub fn new(config: &ProcessorConfig) -> Self {
        let running_loudness_average = config.initial_loudness;
        let gain = (config.target_level / running_loudness_average)
            .clamp(config.gain_min, config.gain_max);
        Self {
            running_loudness_average,
            gain,
        }
    }
}

impl Default for GainState {
    fn default() -> Self {
        Self::new(&ProcessorConfig::default())
    }
}

/// What a cycle computed, for logging and diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSummary {
    /// Sum of corrected (pre-gain) band values
    pub corrected_sum: u32,
    /// `corrected_sum / 7`
    pub corrected_mean: f32,
    /// Gain used on this cycle's values
    pub gain_applied: f32,
    /// Gain computed for the next cycle
    pub next_gain: f32,
}

/// Turns raw band samples into spectrum and gain updates
#[derive(Debug, Clone)]
pub struct SignalProcessor {
    config: ProcessorConfig,
}

impl SignalProcessor {
    /// Create a processor; the config is expected to be validated
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Floor-subtract and correct one band (integer, truncating)
    pub fn correct(&self, band: Band, level: u16) -> u32 {
        let floored = level.saturating_sub(self.config.noise_floor) as u32;
        floored * self.config.band_factors[band.index()] as u32 / 10
    }

    /// Run one cycle over a fresh sample
    ///
    /// Every slot of `spectrum` is overwritten before returning. The gain
    /// computed here only takes effect on the next call.
    pub fn process(
        &self,
        sample: &RawBands,
        spectrum: &mut SpectrumState,
        gain: &mut GainState,
    ) -> CycleSummary {
        let cfg = &self.config;
        let gain_applied = gain.gain;
        let mut corrected_sum: u32 = 0;

        for (band, &level) in Band::ALL.into_iter().zip(sample.iter()) {
            let i = band.index();
            let corrected = self.correct(band, level);
            corrected_sum += corrected;

            // float -> int casts saturate
            let boosted = (corrected as f32 * gain_applied) as u16;
            spectrum.raw[i] = boosted;

            spectrum.smoothed[i] = (1.0 - cfg.spectrum_smooth) * spectrum.smoothed[i]
                + cfg.spectrum_smooth * boosted as f32;

            if spectrum.peak[i] < spectrum.smoothed[i] {
                spectrum.peak[i] = spectrum.smoothed[i];
            }
            spectrum.peak[i] *= 1.0 - cfg.peak_decay;

            spectrum.scaled[i] = (boosted / 4).min(u8::MAX as u16) as u8;
        }

        let corrected_mean = corrected_sum as f32 / BAND_COUNT as f32;
        gain.running_loudness_average = (1.0 - cfg.agc_smooth) * gain.running_loudness_average
            + cfg.agc_smooth * corrected_mean;
        spectrum.average8 = (corrected_mean / 4.0) as u8;

        // a zero average divides to +inf, which the clamp maps to gain_max
        gain.gain = (cfg.target_level / gain.running_loudness_average)
            .clamp(cfg.gain_min, cfg.gain_max);

        CycleSummary {
            corrected_sum,
            corrected_mean,
            gain_applied,
            next_gain: gain.gain,
        }
    }
}
