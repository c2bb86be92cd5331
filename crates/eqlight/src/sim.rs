//! Simulated analyzer chip
//!
//! Synthesizes a seven-band signal from a few musical ingredients (per-band
//! resting level, slow swell, bass kicks, noise) and serves it through the
//! same reset/strobe protocol as the real chip, so the whole pipeline runs
//! unchanged on a desktop.

use std::f32::consts::TAU;

use eqlight_core::{RawBands, SpectrumDevice, ADC_MAX, BAND_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationConfig;

/// [`SpectrumDevice`] backed by a synthetic signal
pub struct SimulatedDevice {
    config: SimulationConfig,
    rng: StdRng,
    now_ms: u64,
    frame: RawBands,
    reset_high: bool,
    strobe_high: bool,
    pointer: Option<usize>,
    busy_us: u64,
}

impl SimulatedDevice {
    /// Create a device; `config` is expected to be validated
    pub fn new(config: SimulationConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            now_ms: 0,
            frame: [0; BAND_COUNT],
            reset_high: false,
            strobe_high: true,
            pointer: None,
            busy_us: 0,
        }
    }

    /// Move the signal clock forward; the next reset latches a frame at `now_ms`
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Total time spent in `delay_us`
    pub fn busy_us(&self) -> u64 {
        self.busy_us
    }

    /// Noise-free level of `band` at `t_ms`
    pub fn level_at(&self, band: usize, t_ms: u64) -> f32 {
        let cfg = &self.config;
        let swell_phase = (t_ms % cfg.swell_period_ms) as f32 / cfg.swell_period_ms as f32;
        let swell = 1.0 + cfg.swell_depth * (TAU * swell_phase).sin();
        let mut level = cfg.base_levels[band] as f32 * swell;

        if band < 2 {
            level += cfg.kick_level as f32 * self.kick_envelope(t_ms);
        }
        level.clamp(0.0, ADC_MAX as f32)
    }

    /// 1.0 at the start of each kick, falling linearly to 0 over `kick_ms`
    fn kick_envelope(&self, t_ms: u64) -> f32 {
        let cfg = &self.config;
        if cfg.bpm <= 0.0 || cfg.kick_ms == 0 {
            return 0.0;
        }
        let period_ms = (60_000.0 / cfg.bpm).max(1.0) as u64;
        let since_kick = t_ms % period_ms;
        if since_kick >= cfg.kick_ms {
            return 0.0;
        }
        1.0 - since_kick as f32 / cfg.kick_ms as f32
    }

    fn latch_frame(&mut self) {
        let noise = self.config.noise as i32;
        for band in 0..BAND_COUNT {
            let jitter = self.rng.random_range(-noise..=noise);
            let level = self.level_at(band, self.now_ms) as i32 + jitter;
            self.frame[band] = level.clamp(0, ADC_MAX as i32) as u16;
        }
    }
}

impl SpectrumDevice for SimulatedDevice {
    fn set_reset(&mut self, high: bool) {
        if self.reset_high && !high {
            self.pointer = None;
            self.latch_frame();
        }
        self.reset_high = high;
    }

    fn set_strobe(&mut self, high: bool) {
        if self.strobe_high && !high {
            self.pointer = Some(match self.pointer {
                None => 0,
                Some(i) => (i + 1) % BAND_COUNT,
            });
        }
        self.strobe_high = high;
    }

    fn read_level(&mut self) -> u16 {
        self.frame[self.pointer.unwrap_or(0)]
    }

    fn delay_us(&mut self, us: u32) {
        self.busy_us += us as u64;
    }
}
