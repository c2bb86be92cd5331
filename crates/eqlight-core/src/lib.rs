//! eqlight Core - Spectrum Acquisition and Auto Gain Control
//!
//! This crate contains the signal path that turns a seven-band analyzer chip
//! into data an LED renderer can consume:
//! - Band sampling over the reset/strobe/analog device protocol
//! - Noise floor, per-band correction, gain and temporal smoothing
//! - Peak hold and automatic gain control
//! - Edge-triggered bass beat detection
//! - Read-only renderer view and diagnostic dumps

#![warn(missing_docs)]

pub mod bands;
pub mod beat;
pub mod clock;
pub mod config;
pub mod device;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod processor;
pub mod sampler;
pub mod view;

// --- Re-exports grouped by category ---

// Bands & Device
pub use bands::{Band, RawBands, ADC_MAX, BAND_COUNT};
pub use device::{DeviceEvent, ScriptedDevice, SpectrumDevice};
pub use sampler::{BandSampler, RESET_PULSE_US, STROBE_SETTLE_US};

// Signal Processing
pub use beat::{BeatDetector, BeatPhase, BeatState};
pub use processor::{CycleSummary, GainState, SignalProcessor, SpectrumState};

// Scheduling & Pipeline
pub use clock::{Clock, IntervalTimer, ManualClock, MonotonicClock};
pub use pipeline::SpectrumPipeline;

// Renderer & Diagnostics
pub use diagnostics::{ScaledDump, SpectrumSnapshot};
pub use view::SpectrumView;

// Configuration, Errors & Logging
pub use config::{AudioConfig, BeatConfig, ProcessorConfig};
pub use error::{CoreError, Result};
pub use logging::LogConfig;
