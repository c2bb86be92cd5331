//! Spectrum pipeline - one strictly ordered acquisition cycle per update.
//!
//! Owns the sampler, processor and beat detector together with the three
//! state structs. `update` runs sample + process to completion before any
//! renderer can look at the result; renderers only ever get a
//! [`SpectrumView`].

use tracing::{debug, info, trace};

use crate::beat::{BeatDetector, BeatState};
use crate::clock::IntervalTimer;
use crate::config::AudioConfig;
use crate::device::SpectrumDevice;
use crate::diagnostics::SpectrumSnapshot;
use crate::error::Result;
use crate::processor::{CycleSummary, GainState, SignalProcessor, SpectrumState};
use crate::sampler::BandSampler;
use crate::view::SpectrumView;

/// Sampler, processor and beat detector wired together
pub struct SpectrumPipeline<D: SpectrumDevice> {
    sampler: BandSampler<D>,
    processor: SignalProcessor,
    beat_detector: BeatDetector,

    spectrum: SpectrumState,
    gain: GainState,
    beat: BeatState,

    timer: IntervalTimer,
    log_every_cycles: u64,

    cycles: u64,
    last_cycle_ms: u64,
    last_summary: Option<CycleSummary>,
    last_beat: bool,
}

impl<D: SpectrumDevice> SpectrumPipeline<D> {
    /// Validate the config and build a pipeline around `device`
    pub fn new(device: D, config: AudioConfig) -> Result<Self> {
        config.validate()?;

        let gain = GainState::new(&config.processor);
        let timer = IntervalTimer::new(config.sample_interval_ms);
        debug!(
            "SpectrumPipeline created: interval={}ms, noise_floor={}, gain={:.2} [{}, {}]",
            timer.interval_ms(),
            config.processor.noise_floor,
            gain.gain,
            config.processor.gain_min,
            config.processor.gain_max
        );

        Ok(Self {
            sampler: BandSampler::new(device),
            processor: SignalProcessor::new(config.processor),
            beat_detector: BeatDetector::new(config.beat),
            spectrum: SpectrumState::new(),
            gain,
            beat: BeatState::new(),
            timer,
            log_every_cycles: config.log_every_cycles,
            cycles: 0,
            last_cycle_ms: 0,
            last_summary: None,
            last_beat: false,
        })
    }

    /// Run an acquisition cycle if the sample interval is due
    ///
    /// Returns `true` when a new cycle completed.
    pub fn update(&mut self, now_ms: u64) -> bool {
        if !self.timer.due(now_ms) {
            return false;
        }

        let sample = self.sampler.sample();
        let summary = self
            .processor
            .process(&sample, &mut self.spectrum, &mut self.gain);

        self.cycles += 1;
        self.last_cycle_ms = now_ms;
        self.last_summary = Some(summary);

        trace!(
            "cycle #{}: mean={:.1}, gain {:.3} -> {:.3}",
            self.cycles,
            summary.corrected_mean,
            summary.gain_applied,
            summary.next_gain
        );

        if self.log_every_cycles > 0 && self.cycles % self.log_every_cycles == 0 {
            info!(
                "Spectrum: {} cycles, loudness avg={:.1}, gain={:.2}, average8={}",
                self.cycles,
                self.gain.running_loudness_average,
                self.gain.gain,
                self.spectrum.average8
            );
        }
        true
    }

    /// Ask the beat detector about the current spectrum. Once per frame.
    pub fn poll_beat(&mut self, now_ms: u64) -> bool {
        self.last_beat = self
            .beat_detector
            .poll(&mut self.beat, &self.spectrum, now_ms);
        self.last_beat
    }

    /// Read-only spectrum for renderers
    pub fn view(&self) -> SpectrumView<'_> {
        SpectrumView::new(&self.spectrum)
    }

    /// Latest spectrum state
    pub fn spectrum(&self) -> &SpectrumState {
        &self.spectrum
    }

    /// AGC state
    pub fn gain_state(&self) -> &GainState {
        &self.gain
    }

    /// Beat detector state
    pub fn beat_state(&self) -> &BeatState {
        &self.beat
    }

    /// Completed cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Summary of the most recent cycle
    pub fn last_summary(&self) -> Option<&CycleSummary> {
        self.last_summary.as_ref()
    }

    /// Snapshot of the latest cycle and beat poll
    pub fn snapshot(&self) -> SpectrumSnapshot {
        SpectrumSnapshot::capture(
            self.cycles,
            self.last_cycle_ms,
            &self.spectrum,
            &self.gain,
            self.last_beat,
        )
    }

    /// Borrow the device
    pub fn device(&self) -> &D {
        self.sampler.device()
    }

    /// Borrow the device mutably
    pub fn device_mut(&mut self) -> &mut D {
        self.sampler.device_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::ScriptedDevice;

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = AudioConfig::default();
        config.processor.gain_max = -1.0;
        assert!(SpectrumPipeline::new(ScriptedDevice::constant([0; 7]), config).is_err());
    }

    #[test]
    fn test_update_runs_full_cycle() {
        let mut pipeline =
            SpectrumPipeline::new(ScriptedDevice::constant([1000; 7]), AudioConfig::default())
                .expect("pipeline");

        assert!(pipeline.update(0));
        assert_eq!(pipeline.cycles(), 1);
        assert_eq!(pipeline.view().raw()[0], 841);
        assert!(pipeline.device().violations().is_empty());
        assert_eq!(pipeline.last_summary().map(|s| s.corrected_sum), Some(7758));
    }

    #[test]
    fn test_sample_interval_gates_cycles() {
        let config = AudioConfig {
            sample_interval_ms: 10,
            ..Default::default()
        };
        let mut pipeline =
            SpectrumPipeline::new(ScriptedDevice::constant([500; 7]), config).expect("pipeline");

        let ran: Vec<bool> = [0, 4, 9, 10, 15, 21].iter().map(|&t| pipeline.update(t)).collect();
        assert_eq!(ran, vec![true, false, false, true, false, true]);
        assert_eq!(pipeline.cycles(), 3);
        assert_eq!(pipeline.device().frames_served(), 3);
    }

    #[test]
    fn test_snapshot_reflects_last_cycle() {
        let mut pipeline =
            SpectrumPipeline::new(ScriptedDevice::constant([1000; 7]), AudioConfig::default())
                .expect("pipeline");
        pipeline.update(40);
        let beat = pipeline.poll_beat(40);

        let snapshot = pipeline.snapshot();
        assert_eq!(snapshot.cycle, 1);
        assert_eq!(snapshot.timestamp_ms, 40);
        assert_eq!(snapshot.raw, pipeline.spectrum().raw);
        assert_eq!(snapshot.beat, beat);
    }
}
