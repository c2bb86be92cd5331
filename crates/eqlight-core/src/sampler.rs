//! Band sampler - one fresh set of seven band levels per call.

use crate::bands::{RawBands, BAND_COUNT};
use crate::device::SpectrumDevice;
use tracing::{debug, trace};

/// How long reset is held high before sampling (microseconds)
pub const RESET_PULSE_US: u32 = 5;

/// Settle time between strobe falling and the analog read (microseconds)
pub const STROBE_SETTLE_US: u32 = 50;

/// Reads all seven bands from an analyzer chip
pub struct BandSampler<D: SpectrumDevice> {
    device: D,
    samples_taken: u64,
}

impl<D: SpectrumDevice> BandSampler<D> {
    /// Take ownership of the device and put its lines in the idle state
    /// (reset low, strobe high)
    pub fn new(mut device: D) -> Self {
        device.set_reset(false);
        device.set_strobe(true);
        debug!("BandSampler ready: {} bands", BAND_COUNT);
        Self {
            device,
            samples_taken: 0,
        }
    }

    /// Rewind the chip and read every band, low to high
    ///
    /// Blocks for roughly `RESET_PULSE_US + 7 * STROBE_SETTLE_US`.
    pub fn sample(&mut self) -> RawBands {
        self.device.set_reset(true);
        self.device.delay_us(RESET_PULSE_US);
        self.device.set_reset(false);

        let mut raw = [0u16; BAND_COUNT];
        for slot in raw.iter_mut() {
            self.device.set_strobe(false);
            self.device.delay_us(STROBE_SETTLE_US);
            *slot = self.device.read_level();
            self.device.set_strobe(true);
        }

        self.samples_taken += 1;
        trace!("sample #{}: {:?}", self.samples_taken, raw);
        raw
    }

    /// Number of completed `sample()` calls
    pub fn samples_taken(&self) -> u64 {
        self.samples_taken
    }

    /// Borrow the device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Borrow the device mutably
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Give the device back
    pub fn into_device(self) -> D {
        self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceEvent, ScriptedDevice};

    #[test]
    fn test_new_sets_idle_lines() {
        let sampler = BandSampler::new(ScriptedDevice::constant([0; 7]));
        assert_eq!(
            sampler.device().events(),
            &[DeviceEvent::Reset(false), DeviceEvent::Strobe(true)]
        );
    }

    #[test]
    fn test_sample_reads_bands_in_order() {
        let mut sampler = BandSampler::new(ScriptedDevice::constant([
            100, 200, 300, 400, 500, 600, 700,
        ]));
        assert_eq!(sampler.sample(), [100, 200, 300, 400, 500, 600, 700]);
        assert!(sampler.device().violations().is_empty());
        assert_eq!(sampler.samples_taken(), 1);
    }

    #[test]
    fn test_sample_protocol_sequence() {
        let mut sampler = BandSampler::new(ScriptedDevice::constant([7; 7]));
        sampler.device_mut().clear_log();
        sampler.sample();

        let events = sampler.device().events();
        assert_eq!(
            &events[..3],
            &[
                DeviceEvent::Reset(true),
                DeviceEvent::Delay(RESET_PULSE_US),
                DeviceEvent::Reset(false),
            ]
        );

        let per_band = &events[3..];
        assert_eq!(per_band.len(), BAND_COUNT * 4);
        for (band, chunk) in per_band.chunks(4).enumerate() {
            assert_eq!(chunk[0], DeviceEvent::Strobe(false));
            assert_eq!(chunk[1], DeviceEvent::Delay(STROBE_SETTLE_US));
            assert_eq!(chunk[2], DeviceEvent::Read { band, value: 7 });
            assert_eq!(chunk[3], DeviceEvent::Strobe(true));
        }
    }

    #[test]
    fn test_out_of_range_values_pass_through() {
        let mut sampler = BandSampler::new(ScriptedDevice::constant([4095; 7]));
        assert_eq!(sampler.sample(), [4095; 7]);
    }

    #[test]
    fn test_consecutive_samples_take_fresh_frames() {
        let mut sampler = BandSampler::new(ScriptedDevice::new(vec![[1; 7], [2; 7], [3; 7]]));
        assert_eq!(sampler.sample()[0], 1);
        assert_eq!(sampler.sample()[0], 2);
        assert_eq!(sampler.sample()[0], 3);
        assert_eq!(sampler.into_device().frames_served(), 3);
    }
}
