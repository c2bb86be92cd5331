//! Frequency band definitions for the seven-band analyzer chip.

use serde::{Deserialize, Serialize};

/// Number of frequency bands reported by the analyzer per cycle
pub const BAND_COUNT: usize = 7;

/// Highest value the analog input can report (10-bit converter)
pub const ADC_MAX: u16 = 1023;

/// One raw sample per band, in device order (low to high)
pub type RawBands = [u16; BAND_COUNT];

/// The seven analyzer bands, named by center frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    /// 63 Hz
    Hz63,
    /// 160 Hz
    Hz160,
    /// 400 Hz
    Hz400,
    /// 1 kHz
    Hz1k,
    /// 2.5 kHz
    Hz2k5,
    /// 6.25 kHz
    Hz6k25,
    /// 16 kHz
    Hz16k,
}

impl Band {
    /// All bands in the order the device reports them
    pub const ALL: [Band; BAND_COUNT] = [
        Band::Hz63,
        Band::Hz160,
        Band::Hz400,
        Band::Hz1k,
        Band::Hz2k5,
        Band::Hz6k25,
        Band::Hz16k,
    ];

    /// Slot of this band in the per-band arrays
    pub fn index(self) -> usize {
        self as usize
    }

    /// Band for a slot index, if in range
    pub fn from_index(index: usize) -> Option<Band> {
        Self::ALL.get(index).copied()
    }

    /// Center frequency in Hz
    pub fn center_hz(self) -> f32 {
        match self {
            Band::Hz63 => 63.0,
            Band::Hz160 => 160.0,
            Band::Hz400 => 400.0,
            Band::Hz1k => 1000.0,
            Band::Hz2k5 => 2500.0,
            Band::Hz6k25 => 6250.0,
            Band::Hz16k => 16000.0,
        }
    }

    /// Short display label
    pub fn label(self) -> &'static str {
        match self {
            Band::Hz63 => "63",
            Band::Hz160 => "160",
            Band::Hz400 => "400",
            Band::Hz1k => "1k",
            Band::Hz2k5 => "2k5",
            Band::Hz6k25 => "6k25",
            Band::Hz16k => "16k",
        }
    }

    /// True for the two lowest bands used by beat detection
    pub fn is_bass(self) -> bool {
        matches!(self, Band::Hz63 | Band::Hz160)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_order_matches_index() {
        for (i, band) in Band::ALL.iter().enumerate() {
            assert_eq!(band.index(), i);
            assert_eq!(Band::from_index(i), Some(*band));
        }
        assert_eq!(Band::from_index(BAND_COUNT), None);
    }

    #[test]
    fn test_center_frequencies_ascend() {
        let freqs: Vec<f32> = Band::ALL.iter().map(|b| b.center_hz()).collect();
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_bass_bands() {
        let bass: Vec<Band> = Band::ALL.into_iter().filter(|b| b.is_bass()).collect();
        assert_eq!(bass, vec![Band::Hz63, Band::Hz160]);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<&str> = Band::ALL.iter().map(|b| b.label()).collect();
        assert_eq!(labels, vec!["63", "160", "400", "1k", "2k5", "6k25", "16k"]);
    }
}
