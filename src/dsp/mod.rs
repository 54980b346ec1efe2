//! Equalizer DSP
//!
//! Butterworth band-pass design, causal biquad filtering and the three-band
//! equalizer built from them.

mod band_pass;
mod biquad;
mod butterworth;
mod equalizer;

pub use band_pass::{
    apply_band_pass, check_gain, db_to_linear, linear_to_db, BandPassStage, DEFAULT_FILTER_ORDER,
};
pub use biquad::{BiquadCascade, BiquadCoeffs};
pub use butterworth::{validate_range, BandPassDesign};
pub use equalizer::{equalize, Band, BandDefinition, BandLayout, BandSignals, Equalizer, GainSet};
