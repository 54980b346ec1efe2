//! Mono audio buffer
//!
//! AudioBuffer is the unit the equalizer consumes and produces. Multi-channel
//! sources are mixed down to mono by the loader before they get here.

use crate::error::{Result, TribandError};

/// Mono sample data with its sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Samples, nominally within -1.0..=1.0
    samples: Vec<f32>,
    /// Sample rate in Hz, fixed for the lifetime of the buffer
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer from mono samples
    ///
    /// Empty buffers are allowed; a zero sample rate is not.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(TribandError::InvalidSampleRate { sample_rate });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Create a silent buffer with the given number of samples
    pub fn silence(num_samples: usize, sample_rate: u32) -> Result<Self> {
        Self::new(vec![0.0; num_samples], sample_rate)
    }

    /// Create a sine wave test tone
    pub fn sine_wave(
        frequency: f64,
        amplitude: f32,
        duration_secs: f64,
        sample_rate: u32,
    ) -> Result<Self> {
        let num_samples = (duration_secs * sample_rate as f64).round() as usize;
        let angular_freq = 2.0 * std::f64::consts::PI * frequency / sample_rate as f64;
        let samples = (0..num_samples)
            .map(|i| amplitude * (angular_freq * i as f64).sin() as f32)
            .collect();
        Self::new(samples, sample_rate)
    }

    /// Get a reference to the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consume the buffer and return its samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Nyquist frequency in Hz
    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Maximum absolute sample value (0.0 for an empty buffer)
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
    }

    /// Check that every sample is finite
    pub fn is_finite(&self) -> bool {
        self.samples.iter().all(|s| s.is_finite())
    }
}
