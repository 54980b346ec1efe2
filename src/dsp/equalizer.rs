//! Three-band equalizer engine
//!
//! Splits a mono signal into low/mid/high with band-pass filters, applies a
//! gain per band, sums the bands back together and peak-normalizes the sum
//! to exactly 1.0.
//!
//! The engine is a pure function of its inputs. An [`Equalizer`] holds only
//! its immutable [`BandLayout`], so it can be cloned or shared across threads
//! freely and every call is bit-for-bit reproducible.

use log::debug;
use serde::{Deserialize, Serialize};

use super::band_pass::{check_gain, BandPassStage, DEFAULT_FILTER_ORDER};
use crate::audio::AudioBuffer;
use crate::error::{Result, TribandError};

/// One of the three equalizer bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    /// All bands in processing order
    pub const ALL: [Band; 3] = [Band::Low, Band::Mid, Band::High];

    /// Short display name
    pub fn name(self) -> &'static str {
        match self {
            Band::Low => "low",
            Band::Mid => "mid",
            Band::High => "high",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Frequency range of a single band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandDefinition {
    /// Lower edge in Hz
    pub low_hz: f64,
    /// Upper edge in Hz
    pub high_hz: f64,
}

impl BandDefinition {
    pub const fn new(low_hz: f64, high_hz: f64) -> Self {
        Self { low_hz, high_hz }
    }
}

/// Band edges and filter order for an equalizer
///
/// The default is the classic bass/mid/treble split:
/// 60-250 Hz, 250-4000 Hz, 4000-12000 Hz, 4th-order filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandLayout {
    pub low: BandDefinition,
    pub mid: BandDefinition,
    pub high: BandDefinition,
    /// Butterworth prototype order (each band-pass has twice as many poles)
    pub order: usize,
}

impl BandLayout {
    pub const DEFAULT: Self = Self {
        low: BandDefinition::new(60.0, 250.0),
        mid: BandDefinition::new(250.0, 4000.0),
        high: BandDefinition::new(4000.0, 12000.0),
        order: DEFAULT_FILTER_ORDER,
    };

    /// Definition for `band`
    pub fn band(&self, band: Band) -> BandDefinition {
        match band {
            Band::Low => self.low,
            Band::Mid => self.mid,
            Band::High => self.high,
        }
    }

    /// Check every band against `0 < low < high < sample_rate / 2`
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        if self.order == 0 {
            return Err(TribandError::InvalidOrder { order: self.order });
        }
        for band in Band::ALL {
            let def = self.band(band);
            super::butterworth::validate_range(def.low_hz, def.high_hz, sample_rate)?;
        }
        Ok(())
    }

    /// Check the order and that every band has `0 < low < high`
    ///
    /// Same checks as [`BandLayout::validate`] minus the Nyquist limit, for
    /// layouts not yet tied to a sample rate.
    pub fn validate_edges(&self) -> Result<()> {
        if self.order == 0 {
            return Err(TribandError::InvalidOrder { order: self.order });
        }
        for band in Band::ALL {
            let def = self.band(band);
            let valid = def.low_hz.is_finite()
                && def.high_hz.is_finite()
                && def.low_hz > 0.0
                && def.low_hz < def.high_hz;
            if !valid {
                return Err(TribandError::InvalidConfig {
                    reason: format!(
                        "{} band {}-{} Hz (requires 0 < low < high)",
                        band, def.low_hz, def.high_hz
                    ),
                });
            }
        }
        Ok(())
    }

    /// Reject NaN and infinite gains, naming the offending band by its edges
    pub fn validate_gains(&self, gains: &GainSet) -> Result<()> {
        for band in Band::ALL {
            let def = self.band(band);
            check_gain(def.low_hz, def.high_hz, gains.get(band))?;
        }
        Ok(())
    }

    /// Design the three band-pass stages for `sample_rate`
    pub fn stages(&self, sample_rate: u32) -> Result<[BandPassStage; 3]> {
        let stage = |band: Band| {
            let def = self.band(band);
            BandPassStage::new(self.order, def.low_hz, def.high_hz, sample_rate)
        };
        Ok([stage(Band::Low)?, stage(Band::Mid)?, stage(Band::High)?])
    }
}

impl Default for BandLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Per-band gains in dB
///
/// Any finite value is accepted; typical controls span -12..+12 dB.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GainSet {
    pub low_db: f64,
    pub mid_db: f64,
    pub high_db: f64,
}

impl GainSet {
    /// Names accepted by [`GainSet::preset`]
    pub const PRESET_NAMES: [&'static str; 4] = ["flat", "bass-boost", "vocal", "treble-boost"];

    pub const fn new(low_db: f64, mid_db: f64, high_db: f64) -> Self {
        Self {
            low_db,
            mid_db,
            high_db,
        }
    }

    /// All bands at 0 dB
    pub const fn flat() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Look up a built-in preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "flat" => Some(Self::flat()),
            "bass-boost" => Some(Self::new(6.0, 0.0, -2.0)),
            "vocal" => Some(Self::new(-4.0, 4.0, 1.0)),
            "treble-boost" => Some(Self::new(-2.0, 0.0, 6.0)),
            _ => None,
        }
    }

    /// Gain for `band`
    pub fn get(&self, band: Band) -> f64 {
        match band {
            Band::Low => self.low_db,
            Band::Mid => self.mid_db,
            Band::High => self.high_db,
        }
    }

    /// Replace the gain for `band`
    pub fn with(mut self, band: Band, gain_db: f64) -> Self {
        match band {
            Band::Low => self.low_db = gain_db,
            Band::Mid => self.mid_db = gain_db,
            Band::High => self.high_db = gain_db,
        }
        self
    }

    /// Largest of the three gains
    pub fn max_db(&self) -> f64 {
        self.low_db.max(self.mid_db).max(self.high_db)
    }

    /// Shift every band so the loudest sits at 0 dB
    ///
    /// Peak normalization cancels any common offset, so equalizing with the
    /// shifted set gives the same result while keeping every linear gain at
    /// or below 1.0.
    pub fn relative_to_max(&self) -> Self {
        let max_db = self.max_db();
        Self::new(
            self.low_db - max_db,
            self.mid_db - max_db,
            self.high_db - max_db,
        )
    }
}

impl From<[f64; 3]> for GainSet {
    fn from([low_db, mid_db, high_db]: [f64; 3]) -> Self {
        Self::new(low_db, mid_db, high_db)
    }
}

/// Gained but not yet summed band signals
#[derive(Debug, Clone, PartialEq)]
pub struct BandSignals {
    pub low: Vec<f64>,
    pub mid: Vec<f64>,
    pub high: Vec<f64>,
}

impl BandSignals {
    /// Signal for `band`
    pub fn band(&self, band: Band) -> &[f64] {
        match band {
            Band::Low => &self.low,
            Band::Mid => &self.mid,
            Band::High => &self.high,
        }
    }

    /// Elementwise sum of the three bands
    pub fn sum(&self) -> Vec<f64> {
        self.low
            .iter()
            .zip(&self.mid)
            .zip(&self.high)
            .map(|((l, m), h)| l + m + h)
            .collect()
    }
}

/// The three-band equalizer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Equalizer {
    layout: BandLayout,
}

impl Equalizer {
    /// Create an equalizer bound to `layout`
    pub fn new(layout: BandLayout) -> Self {
        Self { layout }
    }

    /// The band layout in use
    pub fn layout(&self) -> &BandLayout {
        &self.layout
    }

    /// Filter `buffer` into gained band signals without summing
    ///
    /// All validation happens before any filtering. Gains are applied as
    /// given, so gains beyond roughly +6000 dB overflow here; [`process`]
    /// avoids that by working on [`GainSet::relative_to_max`].
    ///
    /// [`process`]: Equalizer::process
    pub fn split(&self, buffer: &AudioBuffer, gains: &GainSet) -> Result<BandSignals> {
        self.layout.validate_gains(gains)?;
        self.layout.validate(buffer.sample_rate())?;
        let [low, mid, high] = self.layout.stages(buffer.sample_rate())?;
        let samples = buffer.samples();
        Ok(BandSignals {
            low: low.process(samples, gains.low_db)?,
            mid: mid.process(samples, gains.mid_db)?,
            high: high.process(samples, gains.high_db)?,
        })
    }

    /// Equalize `buffer` with `gains`
    ///
    /// Returns a buffer of identical length and sample rate whose peak
    /// absolute value is 1.0.
    ///
    /// # Errors
    /// * `InvalidFilterRange` - a band does not fit below Nyquist
    /// * `InvalidGain` - a gain is NaN or infinite; any finite gain is accepted
    /// * `SilentSignal` - the summed bands are all zero (e.g. silent input)
    /// * `NonFiniteOutput` - the input contained NaN/Inf samples
    pub fn process(&self, buffer: &AudioBuffer, gains: &GainSet) -> Result<AudioBuffer> {
        debug!(
            "Equalizing {} samples @ {} Hz with gains low {:+.2} / mid {:+.2} / high {:+.2} dB",
            buffer.len(),
            buffer.sample_rate(),
            gains.low_db,
            gains.mid_db,
            gains.high_db
        );

        self.layout.validate_gains(gains)?;
        let summed = self.split(buffer, &gains.relative_to_max())?.sum();
        let normalized = normalize_peak(summed)?;
        AudioBuffer::new(normalized, buffer.sample_rate())
    }
}

/// Equalize with the default band layout
pub fn equalize(buffer: &AudioBuffer, gains: &GainSet) -> Result<AudioBuffer> {
    Equalizer::default().process(buffer, gains)
}

/// Divide every sample by the peak absolute value
fn normalize_peak(samples: Vec<f64>) -> Result<Vec<f32>> {
    let peak = samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max);
    if samples.iter().any(|s| !s.is_finite()) {
        return Err(TribandError::NonFiniteOutput);
    }
    if peak == 0.0 {
        return Err(TribandError::SilentSignal);
    }
    debug!("Normalizing by peak {:.6}", peak);
    Ok(samples.into_iter().map(|s| (s / peak) as f32).collect())
}
