//! Butterworth band-pass design
//!
//! Digital IIR design in the usual analog-prototype way:
//! 1. Butterworth low-pass prototype poles on the left unit half-circle
//! 2. Low-pass to band-pass transform around the prewarped band edges
//! 3. Bilinear transform to the z-plane
//! 4. Grouping into second-order sections
//!
//! An order-N design yields a 2N-pole band-pass, i.e. N biquads. Cutoffs are
//! normalized to Nyquist before design, so the response is -3 dB at both band
//! edges and exactly unity at the (prewarped) geometric centre.

use std::f64::consts::PI;

use log::debug;
use rustfft::num_complex::Complex;

use super::biquad::{BiquadCascade, BiquadCoeffs};
use crate::error::{Result, TribandError};

/// Bilinear transform constant for cutoffs normalized to Nyquist (2 * fs with fs = 2)
const BILINEAR_K: f64 = 4.0;

/// Poles with a smaller imaginary part than this are treated as real
const REAL_POLE_EPS: f64 = 1e-12;

/// Check `0 < low < high < sample_rate / 2`
pub fn validate_range(low_hz: f64, high_hz: f64, sample_rate: u32) -> Result<()> {
    let nyquist = sample_rate as f64 / 2.0;
    let valid = low_hz.is_finite()
        && high_hz.is_finite()
        && low_hz > 0.0
        && low_hz < high_hz
        && high_hz < nyquist;
    if valid {
        Ok(())
    } else {
        Err(TribandError::InvalidFilterRange {
            low_hz,
            high_hz,
            sample_rate,
        })
    }
}

/// A designed Butterworth band-pass filter
#[derive(Debug, Clone, PartialEq)]
pub struct BandPassDesign {
    order: usize,
    low_hz: f64,
    high_hz: f64,
    sample_rate: u32,
    sections: Vec<BiquadCoeffs>,
}

impl BandPassDesign {
    /// Design an order-`order` band-pass between `low_hz` and `high_hz`
    pub fn new(order: usize, low_hz: f64, high_hz: f64, sample_rate: u32) -> Result<Self> {
        if order == 0 {
            return Err(TribandError::InvalidOrder { order });
        }
        validate_range(low_hz, high_hz, sample_rate)?;

        let nyquist = sample_rate as f64 / 2.0;
        let wn_low = low_hz / nyquist;
        let wn_high = high_hz / nyquist;
        let sections = design_sections(order, wn_low, wn_high);

        debug!(
            "Butterworth band-pass order {}: {:.1}-{:.1} Hz @ {} Hz (normalized {:.5}-{:.5}), {} sections",
            order,
            low_hz,
            high_hz,
            sample_rate,
            wn_low,
            wn_high,
            sections.len()
        );

        Ok(Self {
            order,
            low_hz,
            high_hz,
            sample_rate,
            sections,
        })
    }

    /// Prototype order
    pub fn order(&self) -> usize {
        self.order
    }

    /// Lower band edge in Hz
    pub fn low_hz(&self) -> f64 {
        self.low_hz
    }

    /// Upper band edge in Hz
    pub fn high_hz(&self) -> f64 {
        self.high_hz
    }

    /// Sample rate the design is valid for
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Second-order sections, in processing order
    pub fn sections(&self) -> &[BiquadCoeffs] {
        &self.sections
    }

    /// Fresh filter with zeroed memory
    pub fn cascade(&self) -> BiquadCascade {
        BiquadCascade::new(self.sections.clone())
    }

    /// Frequency (Hz) where the response peaks at exactly unity
    ///
    /// Geometric mean of the prewarped edges, mapped back through the
    /// bilinear transform.
    pub fn center_frequency_hz(&self) -> f64 {
        let nyquist = self.sample_rate as f64 / 2.0;
        let w_low = prewarp(self.low_hz / nyquist);
        let w_high = prewarp(self.high_hz / nyquist);
        let w0 = (w_low * w_high).sqrt();
        let omega = 2.0 * (w0 / BILINEAR_K).atan();
        omega / PI * nyquist
    }

    /// Magnitude response at `freq_hz`
    pub fn magnitude_at(&self, freq_hz: f64) -> f64 {
        let omega = 2.0 * PI * freq_hz / self.sample_rate as f64;
        self.cascade().magnitude(omega)
    }
}

/// Prewarp a Nyquist-normalized frequency for the bilinear transform
fn prewarp(wn: f64) -> f64 {
    BILINEAR_K * (PI * wn / 2.0).tan()
}

fn design_sections(order: usize, wn_low: f64, wn_high: f64) -> Vec<BiquadCoeffs> {
    let n = order as i32;

    // Analog low-pass prototype: p = -exp(j*pi*m/(2N)), m = -N+1, -N+3, ..., N-1
    let prototype: Vec<Complex<f64>> = (0..n)
        .map(|i| {
            let m = (-n + 1 + 2 * i) as f64;
            -Complex::from_polar(1.0, PI * m / (2.0 * order as f64))
        })
        .collect();

    // Low-pass to band-pass: each prototype pole splits into two
    let w_low = prewarp(wn_low);
    let w_high = prewarp(wn_high);
    let bw = w_high - w_low;
    let w0_sq = w_low * w_high;
    let mut analog_poles = Vec::with_capacity(2 * order);
    for p in &prototype {
        let half = *p * (bw / 2.0);
        let root = (half * half - w0_sq).sqrt();
        analog_poles.push(half + root);
        analog_poles.push(half - root);
    }

    // Band-pass adds N zeros at s = 0 and the gain bw^N. Bilinear transform
    // maps s = 0 to z = 1 and the N zeros at infinity to z = -1.
    let k = Complex::new(BILINEAR_K, 0.0);
    let denom = analog_poles
        .iter()
        .fold(Complex::new(1.0, 0.0), |acc, p| acc * (k - *p));
    let gain = (bw * BILINEAR_K).powi(n) * (Complex::new(1.0, 0.0) / denom).re;

    let digital_poles: Vec<Complex<f64>> =
        analog_poles.iter().map(|&p| (k + p) / (k - p)).collect();

    let mut sections: Vec<BiquadCoeffs> = digital_poles
        .iter()
        .filter(|p| p.im > REAL_POLE_EPS)
        .map(|p| band_section(-2.0 * p.re, p.norm_sqr()))
        .collect();

    let mut real_poles: Vec<f64> = digital_poles
        .iter()
        .filter(|p| p.im.abs() <= REAL_POLE_EPS)
        .map(|p| p.re)
        .collect();
    real_poles.sort_by(f64::total_cmp);
    for pair in real_poles.chunks(2) {
        match pair {
            [r1, r2] => sections.push(band_section(-(r1 + r2), r1 * r2)),
            // Unreachable for a band-pass: real poles come in pairs.
            [r] => sections.push(band_section(-r, 0.0)),
            _ => {}
        }
    }

    if let Some(first) = sections.first_mut() {
        *first = first.scaled(gain);
    }
    sections
}

/// Biquad with one zero at z = 1 and one at z = -1
fn band_section(a1: f64, a2: f64) -> BiquadCoeffs {
    BiquadCoeffs {
        b0: 1.0,
        b1: 0.0,
        b2: -1.0,
        a1,
        a2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_section_count_matches_order() {
        for order in 1..=6 {
            let design = BandPassDesign::new(order, 250.0, 4000.0, 44100).unwrap();
            assert_eq!(design.sections().len(), order);
        }
    }

    #[test]
    fn test_unity_gain_at_center() {
        for (low, high) in [(60.0, 250.0), (250.0, 4000.0), (4000.0, 12000.0)] {
            let design = BandPassDesign::new(4, low, high, 44100).unwrap();
            let fc = design.center_frequency_hz();
            assert!(fc > low && fc < high, "centre {} outside {}-{}", fc, low, high);
            assert_relative_eq!(design.magnitude_at(fc), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_minus_3db_at_band_edges() {
        let design = BandPassDesign::new(4, 250.0, 4000.0, 44100).unwrap();
        assert_relative_eq!(design.magnitude_at(250.0), FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_relative_eq!(design.magnitude_at(4000.0), FRAC_1_SQRT_2, epsilon = 1e-6);
    }

    #[test]
    fn test_stopband_attenuation() {
        let design = BandPassDesign::new(4, 250.0, 4000.0, 44100).unwrap();
        // Two octaves below and above the band edges, 4th order: ~-48 dB
        assert!(design.magnitude_at(62.5) < 0.01);
        assert!(design.magnitude_at(16000.0) < 0.01);
    }

    #[test]
    fn test_poles_inside_unit_circle() {
        let design = BandPassDesign::new(4, 60.0, 250.0, 44100).unwrap();
        for s in design.sections() {
            // a2 is the product of the pole pair magnitudes
            assert!(s.a2 < 1.0 && s.a2 > 0.0, "unstable section {:?}", s);
        }
    }

    #[test]
    fn test_invalid_ranges() {
        let cases = [
            (300.0, 250.0, 44100),
            (250.0, 250.0, 44100),
            (0.0, 250.0, 44100),
            (-10.0, 250.0, 44100),
            (4000.0, 22050.0, 44100),
            (4000.0, 12000.0, 16000),
            (f64::NAN, 250.0, 44100),
        ];
        for (low, high, fs) in cases {
            let err = BandPassDesign::new(4, low, high, fs).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_FILTER_RANGE", "{} {} {}", low, high, fs);
        }
    }

    #[test]
    fn test_zero_order_rejected() {
        let err = BandPassDesign::new(0, 250.0, 4000.0, 44100).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ORDER");
    }
}
