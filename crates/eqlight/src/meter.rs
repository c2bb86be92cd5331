//! One-line terminal spectrum meter

use std::fmt;

use eqlight_core::view::{map_range, scale8};
use eqlight_core::{SpectrumView, ADC_MAX, BAND_COUNT};

/// vertical partials (height)
const VBLOCKS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[inline]
fn level_glyph(level: usize) -> char {
    VBLOCKS[level.min(VBLOCKS.len() - 1)]
}

fn peak_level(peak: f32) -> usize {
    map_range(peak as i32, 0, ADC_MAX as i32, 0, 8).clamp(0, 8) as usize
}

/// Current levels, peak-hold levels, beat marker and gain
#[derive(Debug, Clone, PartialEq)]
pub struct MeterLine {
    levels: [usize; BAND_COUNT],
    peaks: [usize; BAND_COUNT],
    beat: bool,
    gain: f32,
}

impl MeterLine {
    /// Build a meter line from the renderer view
    pub fn new(view: &SpectrumView<'_>, beat: bool, gain: f32) -> Self {
        Self {
            levels: view.scaled().map(|byte| scale8(byte, 0, 8) as usize),
            peaks: view.peak().map(peak_level),
            beat,
            gain,
        }
    }
}

impl fmt::Display for MeterLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &level in &self.levels {
            write!(f, "{}", level_glyph(level))?;
        }
        f.write_str(" | ")?;
        for &peak in &self.peaks {
            write!(f, "{}", level_glyph(peak))?;
        }
        let marker = if self.beat { '*' } else { ' ' };
        write!(f, " | {} | gain {:5.2}", marker, self.gain)
    }
}
