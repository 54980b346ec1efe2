//! Triband - Three-Band Equalizer Engine
//!
//! Splits a mono signal into bass, mid and treble with 4th-order Butterworth
//! band-pass filters, applies a gain in dB to each band, sums the bands and
//! peak-normalizes the result.
//!
//! # Architecture
//!
//! - `dsp`: filter design and the stateless [`Equalizer`] engine
//! - `audio`: mono [`AudioBuffer`], WAV loading/export, measurements
//! - `config`: JSON band layout and gain presets
//! - `cli`: the `triband` command-line front-end
//!
//! ```no_run
//! use triband::{equalize, AudioBuffer, GainSet};
//!
//! let input = AudioBuffer::sine_wave(1000.0, 0.5, 1.0, 44100)?;
//! let output = equalize(&input, &GainSet::new(0.0, 6.0, 0.0))?;
//! assert_eq!(output.len(), input.len());
//! # Ok::<(), triband::TribandError>(())
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod dsp;
pub mod error;

pub use audio::AudioBuffer;
pub use config::EqualizerConfig;
pub use dsp::{equalize, Band, BandDefinition, BandLayout, Equalizer, GainSet};
pub use error::{Result, TribandError};
