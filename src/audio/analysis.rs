//! Audio measurement utilities
//!
//! Objective measurements used by the CLI `analyze` command and by tests to
//! check equalizer output without listening to it.
//!
//! # Measurements
//! - RMS and peak level
//! - Magnitude spectrum (FFT) and per-band energy shares
//! - Waveform preview bins for drawing a waveform elsewhere

use rustfft::{num_complex::Complex, FftPlanner};

use super::AudioBuffer;
use crate::dsp::{linear_to_db, Band, BandLayout};

/// Calculate RMS (Root Mean Square) of samples
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squares / samples.len() as f64).sqrt() as f32
}

/// Calculate peak (maximum absolute value) of samples
pub fn calculate_peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// One-sided power spectrum of a buffer
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// Power per bin, bins 0..=N/2
    power: Vec<f64>,
    /// Width of one bin in Hz
    bin_hz: f64,
}

impl Spectrum {
    /// FFT over the whole buffer (no windowing)
    pub fn of(buffer: &AudioBuffer) -> Self {
        let n = buffer.len();
        if n == 0 {
            return Self {
                power: Vec::new(),
                bin_hz: 0.0,
            };
        }

        let mut data: Vec<Complex<f64>> = buffer
            .samples()
            .iter()
            .map(|&s| Complex::new(s as f64, 0.0))
            .collect();
        let mut planner = FftPlanner::<f64>::new();
        planner.plan_fft_forward(n).process(&mut data);

        let power = data[..=n / 2].iter().map(|c| c.norm_sqr()).collect();
        Self {
            power,
            bin_hz: buffer.sample_rate() as f64 / n as f64,
        }
    }

    /// Total power across all bins
    pub fn total_power(&self) -> f64 {
        self.power.iter().sum()
    }

    /// Power of the bins whose centre lies in `low_hz..high_hz`
    pub fn band_power(&self, low_hz: f64, high_hz: f64) -> f64 {
        self.power
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                let freq = *i as f64 * self.bin_hz;
                freq >= low_hz && freq < high_hz
            })
            .map(|(_, p)| p)
            .sum()
    }

    /// Frequency of the strongest non-DC bin
    pub fn dominant_frequency(&self) -> Option<f64> {
        self.power
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .filter(|(_, p)| **p > 0.0)
            .map(|(i, _)| i as f64 * self.bin_hz)
    }
}

/// Fraction of total spectral power inside each band of a layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandEnergy {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
    /// Everything below the low band, above the high band, or in gaps
    pub outside: f64,
}

impl BandEnergy {
    /// Measure how the power of `buffer` is spread over `layout`
    pub fn measure(buffer: &AudioBuffer, layout: &BandLayout) -> Self {
        let spectrum = Spectrum::of(buffer);
        let total = spectrum.total_power();
        if total <= 0.0 {
            return Self {
                low: 0.0,
                mid: 0.0,
                high: 0.0,
                outside: 0.0,
            };
        }
        let share = |band: Band| {
            let def = layout.band(band);
            spectrum.band_power(def.low_hz, def.high_hz) / total
        };
        let (low, mid, high) = (share(Band::Low), share(Band::Mid), share(Band::High));
        Self {
            low,
            mid,
            high,
            outside: (1.0 - low - mid - high).max(0.0),
        }
    }

    /// Share for `band`
    pub fn get(&self, band: Band) -> f64 {
        match band {
            Band::Low => self.low,
            Band::Mid => self.mid,
            Band::High => self.high,
        }
    }
}

/// Min/max/RMS of one slice of a waveform preview
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveformBin {
    pub min: f32,
    pub max: f32,
    pub rms: f32,
}

/// Reduce `buffer` to at most `bins` preview bins
pub fn waveform_preview(buffer: &AudioBuffer, bins: usize) -> Vec<WaveformBin> {
    if bins == 0 || buffer.is_empty() {
        return Vec::new();
    }
    let chunk_len = buffer.len().div_ceil(bins);
    buffer
        .samples()
        .chunks(chunk_len)
        .map(|chunk| WaveformBin {
            min: chunk.iter().copied().fold(f32::INFINITY, f32::min),
            max: chunk.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            rms: calculate_rms(chunk),
        })
        .collect()
}

/// Summary measurements for a buffer
#[derive(Debug, Clone)]
pub struct AudioAnalysis {
    pub rms_db: f64,
    pub peak_db: f64,
    pub duration: f64,
    pub sample_rate: u32,
    pub num_samples: usize,
    pub dominant_frequency: Option<f64>,
    pub band_energy: BandEnergy,
}

impl AudioAnalysis {
    /// Analyze `buffer` against `layout`
    pub fn analyze(buffer: &AudioBuffer, layout: &BandLayout) -> Self {
        let samples = buffer.samples();
        Self {
            rms_db: linear_to_db(calculate_rms(samples) as f64),
            peak_db: linear_to_db(calculate_peak(samples) as f64),
            duration: buffer.duration(),
            sample_rate: buffer.sample_rate(),
            num_samples: buffer.len(),
            dominant_frequency: Spectrum::of(buffer).dominant_frequency(),
            band_energy: BandEnergy::measure(buffer, layout),
        }
    }

    /// Generate a summary string for display
    pub fn summary(&self) -> String {
        let dominant = self
            .dominant_frequency
            .map(|f| format!("{:.1} Hz", f))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "Duration: {:.2}s | {} samples @ {} Hz\n\
             RMS: {:.1} dBFS | Peak: {:.1} dBFS\n\
             Dominant frequency: {}\n\
             Band energy: low {:.1}% | mid {:.1}% | high {:.1}% | outside {:.1}%",
            self.duration,
            self.num_samples,
            self.sample_rate,
            self.rms_db,
            self.peak_db,
            dominant,
            self.band_energy.low * 100.0,
            self.band_energy.mid * 100.0,
            self.band_energy.high * 100.0,
            self.band_energy.outside * 100.0
        )
    }
}
