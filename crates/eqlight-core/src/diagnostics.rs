//! Diagnostics - per-cycle dumps for offline calibration
//!
//! - **ScaledDump**: the byte levels as one tab-separated line
//! - **SpectrumSnapshot**: the full cycle result, serializable as JSON

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bands::{RawBands, BAND_COUNT};
use crate::error::Result;
use crate::processor::{GainState, SpectrumState};

/// Tab-separated `scaled[0..6]`
pub struct ScaledDump<'a>(pub &'a [u8; BAND_COUNT]);

impl fmt::Display for ScaledDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\t")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Everything one cycle produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumSnapshot {
    /// Cycle counter
    pub cycle: u64,
    /// Clock reading of the cycle
    pub timestamp_ms: u64,
    /// Gain-applied levels
    pub raw: RawBands,
    /// Smoothed levels
    pub smoothed: [f32; BAND_COUNT],
    /// Peak-hold levels
    pub peak: [f32; BAND_COUNT],
    /// Byte levels
    pub scaled: [u8; BAND_COUNT],
    /// Byte average
    pub average8: u8,
    /// Gain for the next cycle
    pub gain: f32,
    /// Running loudness average
    pub loudness: f32,
    /// Beat fired on this frame
    pub beat: bool,
}

impl SpectrumSnapshot {
    /// Capture the current state
    pub fn capture(
        cycle: u64,
        timestamp_ms: u64,
        spectrum: &SpectrumState,
        gain: &GainState,
        beat: bool,
    ) -> Self {
        Self {
            cycle,
            timestamp_ms,
            raw: spectrum.raw,
            smoothed: spectrum.smoothed,
            peak: spectrum.peak,
            scaled: spectrum.scaled,
            average8: spectrum.average8,
            gain: gain.gain,
            loudness: gain.running_loudness_average,
            beat,
        }
    }

    /// One JSON line
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Tab-separated byte levels
    pub fn scaled_line(&self) -> String {
        ScaledDump(&self.scaled).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_dump_format() {
        let line = ScaledDump(&[0, 12, 255, 3, 4, 5, 6]).to_string();
        assert_eq!(line, "0\t12\t255\t3\t4\t5\t6");
        assert_eq!(line.split('\t').count(), BAND_COUNT);
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let mut spectrum = SpectrumState::new();
        spectrum.raw = [1, 2, 3, 4, 5, 6, 7];
        spectrum.scaled = [9; 7];
        spectrum.smoothed[0] = 1.5;
        let gain = GainState::default();

        let snapshot = SpectrumSnapshot::capture(3, 60, &spectrum, &gain, true);
        let json = snapshot.to_json_line().expect("serialize");
        assert!(!json.contains('\n'));

        let parsed: SpectrumSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, snapshot);
        assert_eq!(parsed.scaled_line(), "9\t9\t9\t9\t9\t9\t9");
    }
}
