//! Read-only spectrum access for renderers.
//!
//! Effects get a [`SpectrumView`] between cycles. It borrows the state
//! immutably, so nothing a renderer does can leak back into the next cycle.

use crate::bands::{Band, RawBands, BAND_COUNT};
use crate::processor::SpectrumState;

/// Borrowed, immutable view of the latest spectrum
#[derive(Debug, Clone, Copy)]
pub struct SpectrumView<'a> {
    state: &'a SpectrumState,
}

impl<'a> SpectrumView<'a> {
    /// Wrap a spectrum state
    pub fn new(state: &'a SpectrumState) -> Self {
        Self { state }
    }

    /// Gain-applied band levels
    pub fn raw(&self) -> &'a RawBands {
        &self.state.raw
    }

    /// Smoothed band levels
    pub fn smoothed(&self) -> &'a [f32; BAND_COUNT] {
        &self.state.smoothed
    }

    /// Peak-hold levels
    pub fn peak(&self) -> &'a [f32; BAND_COUNT] {
        &self.state.peak
    }

    /// Byte-range band levels
    pub fn scaled(&self) -> &'a [u8; BAND_COUNT] {
        &self.state.scaled
    }

    /// Byte-range whole-spectrum average
    pub fn average8(&self) -> u8 {
        self.state.average8
    }

    /// Smoothed level of one band
    pub fn band(&self, band: Band) -> f32 {
        self.state.band(band)
    }

    /// Mean of the two bass bands
    pub fn bass_combo(&self) -> f32 {
        self.state.bass_combo()
    }

    /// Mean of the four lowest bands
    pub fn low_combo(&self) -> f32 {
        self.state.low_combo()
    }

    /// Byte level of one band mapped into `lo..=hi`
    pub fn scaled_in(&self, band: Band, lo: u8, hi: u8) -> u8 {
        scale8(self.state.scaled[band.index()], lo, hi)
    }
}

/// Linear integer map of `value` from `in_min..in_max` to `out_min..out_max`
///
/// Truncates toward zero and does not clamp, matching the usual
/// microcontroller `map()` helper. A degenerate input range yields `out_min`.
pub fn map_range(value: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_max == in_min {
        return out_min;
    }
    let scaled = (value as i64 - in_min as i64) * (out_max as i64 - out_min as i64)
        / (in_max as i64 - in_min as i64);
    (scaled + out_min as i64) as i32
}

/// Map a byte into `lo..=hi`: 0 gives `lo`, 255 gives close to `hi`
pub fn scale8(value: u8, lo: u8, hi: u8) -> u8 {
    if hi <= lo {
        return lo;
    }
    let span = (hi - lo) as u16 + 1;
    lo + ((value as u16 * span) >> 8) as u8
}
