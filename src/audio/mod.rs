//! Audio buffers, WAV I/O and measurements
//!
//! Everything around the equalizer that touches samples but is not the
//! equalizer itself: the mono buffer type, the WAV loader/writer and the
//! analysis helpers.

pub mod analysis;
mod buffer;
pub mod io;

pub use analysis::{AudioAnalysis, BandEnergy, Spectrum, WaveformBin};
pub use buffer::AudioBuffer;
pub use io::{load_wav, load_wav_with, to_pcm16, write_wav_pcm16, LoadOptions};
