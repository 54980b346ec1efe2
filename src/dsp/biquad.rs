//! Second-order filter sections
//!
//! Higher-order IIR filters are run as a cascade of biquads, which keeps
//! the recursion numerically stable at low normalized cutoffs where a
//! single high-order direct-form polynomial would not be.

use rustfft::num_complex::Complex;

/// Biquad filter coefficients
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
/// Normalized: a0 == 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Scale the numerator by a constant gain
    pub fn scaled(self, gain: f64) -> Self {
        Self {
            b0: self.b0 * gain,
            b1: self.b1 * gain,
            b2: self.b2 * gain,
            ..self
        }
    }

    /// Complex response at normalized angular frequency `omega` (rad/sample)
    pub fn response(&self, omega: f64) -> Complex<f64> {
        let z1 = Complex::from_polar(1.0, -omega);
        let z2 = z1 * z1;
        let num = Complex::new(self.b0, 0.0) + z1 * self.b1 + z2 * self.b2;
        let den = Complex::new(1.0, 0.0) + z1 * self.a1 + z2 * self.a2;
        num / den
    }
}

/// Filter state for one section
///
/// Direct Form II transposed: two state variables per section, causal,
/// single pass.
#[derive(Debug, Clone, Copy, Default)]
struct BiquadState {
    s1: f64,
    s2: f64,
}

impl BiquadState {
    fn process(&mut self, input: f64, c: &BiquadCoeffs) -> f64 {
        let output = c.b0 * input + self.s1;
        self.s1 = c.b1 * input - c.a1 * output + self.s2;
        self.s2 = c.b2 * input - c.a2 * output;
        output
    }
}

/// A cascade of biquad sections with its own filter memory
#[derive(Debug, Clone)]
pub struct BiquadCascade {
    sections: Vec<BiquadCoeffs>,
    states: Vec<BiquadState>,
}

impl BiquadCascade {
    /// Create a cascade with zeroed filter memory
    pub fn new(sections: Vec<BiquadCoeffs>) -> Self {
        let states = vec![BiquadState::default(); sections.len()];
        Self { sections, states }
    }

    /// Coefficients of each section, in processing order
    pub fn sections(&self) -> &[BiquadCoeffs] {
        &self.sections
    }

    /// Run one sample through every section
    pub fn process_sample(&mut self, input: f64) -> f64 {
        self.sections
            .iter()
            .zip(self.states.iter_mut())
            .fold(input, |sample, (coeffs, state)| state.process(sample, coeffs))
    }

    /// Clear the filter memory
    pub fn reset(&mut self) {
        self.states.fill(BiquadState::default());
    }

    /// Magnitude of the cascade at normalized angular frequency `omega`
    pub fn magnitude(&self, omega: f64) -> f64 {
        self.sections
            .iter()
            .map(|s| s.response(omega))
            .fold(Complex::new(1.0, 0.0), |acc, h| acc * h)
            .norm()
    }
}
