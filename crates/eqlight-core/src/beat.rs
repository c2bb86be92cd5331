//! Bass beat detection with hysteresis and a re-trigger delay.
//!
//! Edge-triggered: `poll` returns `true` only on the cycle that enters
//! [`BeatPhase::Triggered`]. The detector re-arms once bass falls more than
//! the deadzone below the peak seen at the trigger.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BeatConfig;
use crate::processor::SpectrumState;

/// Detector phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BeatPhase {
    /// Armed, waiting for a bass spike
    #[default]
    Idle,
    /// Fired, waiting for bass to fall through the deadzone
    Triggered,
}

/// Beat detector state, owned by the caller
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BeatState {
    /// Long-horizon average of the bass combo
    pub running_bass_average: f32,
    /// High watermark; set to the bass level on trigger
    pub last_peak_value: f32,
    /// Current phase
    pub phase: BeatPhase,
    /// Clock reading of the last trigger
    pub last_trigger_ms: Option<u64>,
}

impl BeatState {
    /// Fresh, armed state
    pub fn new() -> Self {
        Self::default()
    }

    /// True while in the triggered phase
    pub fn is_triggered(&self) -> bool {
        self.phase == BeatPhase::Triggered
    }
}

/// Derives a one-cycle beat pulse from the two lowest bands
#[derive(Debug, Clone)]
pub struct BeatDetector {
    config: BeatConfig,
}

impl BeatDetector {
    /// Create a detector; the config is expected to be validated
    pub fn new(config: BeatConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &BeatConfig {
        &self.config
    }

    /// Check the latest spectrum for a beat. Call once per frame.
    pub fn poll(&self, state: &mut BeatState, spectrum: &SpectrumState, now_ms: u64) -> bool {
        self.step(state, spectrum.bass_combo(), now_ms)
    }

    /// Advance the detector with a precomputed bass level
    pub fn step(&self, state: &mut BeatState, bass_combo: f32, now_ms: u64) -> bool {
        let cfg = &self.config;

        state.running_bass_average =
            (1.0 - cfg.smooth) * state.running_bass_average + cfg.smooth * bass_combo;
        if state.last_peak_value < state.running_bass_average {
            state.last_peak_value = state.running_bass_average;
        }

        let delay_elapsed = match state.last_trigger_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= cfg.delay_ms,
        };

        if bass_combo - state.running_bass_average > cfg.level
            && state.phase == BeatPhase::Idle
            && delay_elapsed
        {
            state.phase = BeatPhase::Triggered;
            state.last_peak_value = bass_combo;
            state.last_trigger_ms = Some(now_ms);
            debug!(
                "Beat at {}ms: bass={:.1}, avg={:.1}",
                now_ms, bass_combo, state.running_bass_average
            );
            true
        } else {
            if state.last_peak_value - bass_combo > cfg.deadzone {
                state.phase = BeatPhase::Idle;
            }
            false
        }
    }
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self::new(BeatConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_input_never_fires() {
        let detector = BeatDetector::default();
        let mut state = BeatState::new();
        for t in 0..1000 {
            assert!(!detector.step(&mut state, 5.0, t * 10));
        }
        assert_eq!(state.phase, BeatPhase::Idle);
    }

    #[test]
    fn test_step_fires_once() {
        let detector = BeatDetector::default();
        let mut state = BeatState::new();

        assert!(detector.step(&mut state, 50.0, 0));
        assert!(state.is_triggered());
        assert_eq!(state.last_peak_value, 50.0);
        assert_eq!(state.last_trigger_ms, Some(0));

        for t in 1..500 {
            assert!(!detector.step(&mut state, 50.0, t * 10));
        }
    }

    #[test]
    fn test_deadzone_rearms() {
        let detector = BeatDetector::default();
        let mut state = BeatState::new();

        assert!(detector.step(&mut state, 50.0, 0));
        // 50 - 25 = 25 is inside the deadzone
        assert!(!detector.step(&mut state, 25.0, 100));
        assert!(state.is_triggered());
        // 50 - 10 = 40 clears it
        assert!(!detector.step(&mut state, 10.0, 200));
        assert_eq!(state.phase, BeatPhase::Idle);

        assert!(detector.step(&mut state, 50.0, 300));
    }

    #[test]
    fn test_retrigger_delay() {
        let detector = BeatDetector::default();
        let mut state = BeatState::new();

        assert!(detector.step(&mut state, 50.0, 1000));
        assert!(!detector.step(&mut state, 0.0, 1010)); // re-armed
        assert!(!detector.step(&mut state, 50.0, 1030)); // too soon
        assert!(!detector.step(&mut state, 0.0, 1040));
        assert!(detector.step(&mut state, 50.0, 1050)); // exactly the delay
    }

    #[test]
    fn test_first_trigger_needs_no_history() {
        let detector = BeatDetector::default();
        let mut state = BeatState::new();
        assert!(detector.step(&mut state, 50.0, 0));
    }

    #[test]
    fn test_watermark_follows_running_average() {
        let detector = BeatDetector::default();
        let mut state = BeatState::new();
        for t in 0..2000 {
            detector.step(&mut state, 15.0, t);
        }
        assert!(state.running_bass_average > 14.0);
        assert!((state.last_peak_value - state.running_bass_average).abs() < 1e-3);
    }

    #[test]
    fn test_poll_uses_two_lowest_bands() {
        let detector = BeatDetector::default();
        let mut state = BeatState::new();
        let mut spectrum = SpectrumState::new();
        spectrum.smoothed = [80.0, 20.0, 500.0, 500.0, 500.0, 500.0, 500.0];
        assert!(detector.poll(&mut state, &spectrum, 0));
        assert_eq!(state.last_peak_value, 50.0);
    }
}
