//! Band-pass filter stage
//!
//! One equalizer band: Butterworth band-pass followed by a flat gain.
//! The filter runs causally in a single forward pass, so each band carries
//! the group delay of its IIR design. That delay is part of the sound of
//! the equalizer, not something to compensate.

use log::debug;

use super::butterworth::BandPassDesign;
use crate::audio::AudioBuffer;
use crate::error::{Result, TribandError};

/// Filter order used by the fixed three-band layout
pub const DEFAULT_FILTER_ORDER: usize = 4;

/// Convert decibels to linear amplitude
pub fn db_to_linear(gain_db: f64) -> f64 {
    10.0_f64.powf(gain_db / 20.0)
}

/// Convert linear amplitude to decibels
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Reject a NaN or infinite gain for the band `low_hz`-`high_hz`
pub fn check_gain(low_hz: f64, high_hz: f64, gain_db: f64) -> Result<()> {
    if gain_db.is_finite() {
        Ok(())
    } else {
        Err(TribandError::InvalidGain {
            band: format!("{}-{} Hz", low_hz, high_hz),
            gain_db,
        })
    }
}

/// A designed band-pass filter ready to run over whole buffers
///
/// The stage holds only coefficients; every call starts from zeroed filter
/// memory, so one stage can be shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct BandPassStage {
    design: BandPassDesign,
}

impl BandPassStage {
    /// Design a stage for the given edges and sample rate
    pub fn new(order: usize, low_hz: f64, high_hz: f64, sample_rate: u32) -> Result<Self> {
        let design = BandPassDesign::new(order, low_hz, high_hz, sample_rate)?;
        Ok(Self { design })
    }

    /// The underlying filter design
    pub fn design(&self) -> &BandPassDesign {
        &self.design
    }

    /// Filter `samples` and scale by `gain_db`
    ///
    /// Output is f64 so that band sums keep full precision until the final
    /// normalization. Gain is applied as given, without clamping.
    pub fn process(&self, samples: &[f32], gain_db: f64) -> Result<Vec<f64>> {
        check_gain(self.design.low_hz(), self.design.high_hz(), gain_db)?;
        let gain = db_to_linear(gain_db);
        let mut filter = self.design.cascade();
        let output = samples
            .iter()
            .map(|&x| filter.process_sample(x as f64) * gain)
            .collect();
        Ok(output)
    }
}

/// Band-pass `buffer` between `low_hz` and `high_hz` and apply `gain_db`
///
/// Uses the default 4th-order design. The returned buffer has the same
/// length and sample rate as the input.
pub fn apply_band_pass(
    buffer: &AudioBuffer,
    low_hz: f64,
    high_hz: f64,
    gain_db: f64,
) -> Result<AudioBuffer> {
    let stage = BandPassStage::new(DEFAULT_FILTER_ORDER, low_hz, high_hz, buffer.sample_rate())?;
    debug!(
        "Band-pass {:.1}-{:.1} Hz at {:+.2} dB over {} samples",
        low_hz,
        high_hz,
        gain_db,
        buffer.len()
    );
    let filtered = stage.process(buffer.samples(), gain_db)?;
    AudioBuffer::new(
        filtered.into_iter().map(|s| s as f32).collect(),
        buffer.sample_rate(),
    )
}
