//! Device boundary for the seven-band analyzer chip.
//!
//! The chip is driven with two digital outputs (reset, strobe) and read via
//! one analog input. Implementations wrap whatever pin/ADC driver the board
//! provides; [`ScriptedDevice`] replays programmed frames and records the
//! control-line protocol for tests and offline runs.

use crate::bands::{RawBands, BAND_COUNT};
use crate::sampler::STROBE_SETTLE_US;

/// Pins and timing of a seven-band analyzer chip
///
/// Reads cannot fail: a stuck or out-of-range input is still a number, and
/// the noise floor downstream deals with it.
pub trait SpectrumDevice {
    /// Drive the reset line (`true` = high)
    fn set_reset(&mut self, high: bool);

    /// Drive the strobe line (`true` = high)
    fn set_strobe(&mut self, high: bool);

    /// Read the analog output for the currently selected band
    fn read_level(&mut self) -> u16;

    /// Block for the given number of microseconds
    fn delay_us(&mut self, us: u32);
}

impl<D: SpectrumDevice + ?Sized> SpectrumDevice for &mut D {
    fn set_reset(&mut self, high: bool) {
        (**self).set_reset(high)
    }

    fn set_strobe(&mut self, high: bool) {
        (**self).set_strobe(high)
    }

    fn read_level(&mut self) -> u16 {
        (**self).read_level()
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}

/// One recorded interaction with a [`ScriptedDevice`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    /// Reset line driven
    Reset(bool),
    /// Strobe line driven
    Strobe(bool),
    /// Busy-wait
    Delay(u32),
    /// Analog read of a band
    Read {
        /// Band slot the multiplexer pointed at
        band: usize,
        /// Value returned
        value: u16,
    },
}

/// In-memory analyzer that replays programmed frames
///
/// Each reset pulse loads the next frame; once the script is exhausted the
/// last frame repeats. The band pointer behaves like the chip's
/// multiplexer: a reset rewinds it, every falling strobe edge selects the
/// next band.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDevice {
    frames: Vec<RawBands>,
    next_frame: usize,
    current: RawBands,
    reset_high: bool,
    strobe_high: bool,
    /// `None` until the first strobe after a reset
    pointer: Option<usize>,
    rewound: bool,
    settle_us: u32,
    events: Vec<DeviceEvent>,
    violations: Vec<String>,
}

impl ScriptedDevice {
    /// Device that will return `frames` in order, one per reset pulse
    pub fn new(frames: Vec<RawBands>) -> Self {
        Self {
            frames,
            strobe_high: true,
            ..Default::default()
        }
    }

    /// Device returning the same frame forever
    pub fn constant(frame: RawBands) -> Self {
        Self::new(vec![frame])
    }

    /// Append a frame to the end of the script
    pub fn push_frame(&mut self, frame: RawBands) {
        self.frames.push(frame);
    }

    /// Every recorded interaction, oldest first
    pub fn events(&self) -> &[DeviceEvent] {
        &self.events
    }

    /// Protocol violations seen so far (reads with strobe high, reads
    /// before a reset, reads before the settle time elapsed)
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Forget recorded events and violations
    pub fn clear_log(&mut self) {
        self.events.clear();
        self.violations.clear();
    }

    /// Number of frames consumed so far
    pub fn frames_served(&self) -> usize {
        self.next_frame
    }

    fn load_next_frame(&mut self) {
        self.current = match self.frames.get(self.next_frame) {
            Some(frame) => *frame,
            None => self.frames.last().copied().unwrap_or([0; BAND_COUNT]),
        };
        self.next_frame += 1;
    }
}

impl SpectrumDevice for ScriptedDevice {
    fn set_reset(&mut self, high: bool) {
        self.events.push(DeviceEvent::Reset(high));
        // falling edge completes the pulse
        if self.reset_high && !high {
            self.pointer = None;
            self.rewound = true;
            self.load_next_frame();
        }
        self.reset_high = high;
    }

    fn set_strobe(&mut self, high: bool) {
        self.events.push(DeviceEvent::Strobe(high));
        if self.strobe_high && !high {
            self.pointer = Some(match self.pointer {
                None => 0,
                Some(i) => (i + 1) % BAND_COUNT,
            });
            self.settle_us = 0;
        }
        self.strobe_high = high;
    }

    fn read_level(&mut self) -> u16 {
        if !self.rewound {
            self.violations.push("read before first reset".to_string());
        }
        if self.strobe_high {
            self.violations.push("read with strobe high".to_string());
        }
        if self.settle_us < STROBE_SETTLE_US {
            self.violations.push(format!(
                "read after {}us settle (< {}us)",
                self.settle_us, STROBE_SETTLE_US
            ));
        }

        let band = self.pointer.unwrap_or(0);
        let value = self.current[band];
        self.events.push(DeviceEvent::Read { band, value });
        value
    }

    fn delay_us(&mut self, us: u32) {
        self.events.push(DeviceEvent::Delay(us));
        self.settle_us = self.settle_us.saturating_add(us);
    }
}
