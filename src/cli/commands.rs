//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;
use std::time::Instant;

use log::info;

use crate::audio::{self, AudioAnalysis};
use crate::config::EqualizerConfig;
use crate::dsp::{Band, GainSet};
use crate::error::{Result, TribandError};

/// Per-band gain overrides from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GainOverrides {
    pub low: Option<f64>,
    pub mid: Option<f64>,
    pub high: Option<f64>,
}

/// Combine config gains, an optional preset and per-band overrides
///
/// Later sources win: config, then preset, then explicit flags.
pub fn resolve_gains(
    base: GainSet,
    preset: Option<&str>,
    overrides: GainOverrides,
) -> Result<GainSet> {
    let mut gains = match preset {
        Some(name) => GainSet::preset(name).ok_or_else(|| TribandError::InvalidConfig {
            reason: format!(
                "unknown preset '{}' (available: {})",
                name,
                GainSet::PRESET_NAMES.join(", ")
            ),
        })?,
        None => base,
    };
    for (band, value) in [
        (Band::Low, overrides.low),
        (Band::Mid, overrides.mid),
        (Band::High, overrides.high),
    ] {
        if let Some(gain_db) = value {
            gains = gains.with(band, gain_db);
        }
    }
    Ok(gains)
}

fn load_config(path: Option<&Path>) -> Result<EqualizerConfig> {
    match path {
        Some(path) => EqualizerConfig::load(path),
        None => Ok(EqualizerConfig::default()),
    }
}

/// Equalize a WAV file.
pub fn process(
    input: &Path,
    output: &Path,
    overrides: GainOverrides,
    preset: Option<&str>,
    config_path: Option<&Path>,
) -> Result<()> {
    info!("Processing: {} -> {}", input.display(), output.display());

    let config = load_config(config_path)?;
    let gains = resolve_gains(config.gains, preset, overrides)?;

    let buffer = audio::load_wav(input)?;
    info!(
        "Loaded {} samples @ {} Hz ({:.2}s)",
        buffer.len(),
        buffer.sample_rate(),
        buffer.duration()
    );

    let started = Instant::now();
    let equalized = config.equalizer().process(&buffer, &gains)?;
    info!("Equalized in {:.1} ms", started.elapsed().as_secs_f64() * 1000.0);

    audio::write_wav_pcm16(&equalized, output)?;

    println!("=== Triband ===");
    println!("Input:  {}", input.display());
    println!("Output: {}", output.display());
    println!(
        "Gains:  low {:+.1} dB | mid {:+.1} dB | high {:+.1} dB",
        gains.low_db, gains.mid_db, gains.high_db
    );
    println!("Samples: {} @ {} Hz", equalized.len(), equalized.sample_rate());

    Ok(())
}

/// Print measurements for a WAV file.
pub fn analyze(input: &Path, config_path: Option<&Path>) -> Result<()> {
    info!("Analyzing: {}", input.display());

    let config = load_config(config_path)?;
    let buffer = audio::load_wav_with(input, audio::LoadOptions { normalize: false })?;
    let analysis = AudioAnalysis::analyze(&buffer, &config.layout);

    println!("=== {} ===", input.display());
    println!("{}", analysis.summary());

    Ok(())
}

/// Print the band layout.
pub fn bands(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let layout = &config.layout;
    layout.validate_edges()?;
    layout.validate_gains(&config.gains)?;

    println!("Filter: Butterworth band-pass, order {}", layout.order);
    println!("{:-<44}", "");
    for band in Band::ALL {
        let def = layout.band(band);
        println!(
            "{:<6} {:>9.1} Hz - {:>9.1} Hz  {:+6.1} dB",
            band.name(),
            def.low_hz,
            def.high_hz,
            config.gains.get(band)
        );
    }
    println!("{:-<44}", "");
    // Nyquist needs to sit above the highest band edge
    let min_rate = Band::ALL
        .iter()
        .map(|&b| layout.band(b).high_hz)
        .fold(0.0_f64, f64::max)
        * 2.0;
    println!("Requires sample rate above {:.0} Hz", min_rate);

    Ok(())
}

/// Write a default config file.
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(TribandError::InvalidConfig {
            reason: format!("{} already exists (use --force to overwrite)", path.display()),
        });
    }
    EqualizerConfig::default().save(path)?;
    println!("Config written: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioBuffer;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_gains_precedence() {
        let base = GainSet::new(1.0, 1.0, 1.0);
        assert_eq!(resolve_gains(base, None, GainOverrides::default()).unwrap(), base);

        let preset = resolve_gains(base, Some("bass-boost"), GainOverrides::default()).unwrap();
        assert_eq!(preset, GainSet::preset("bass-boost").unwrap());

        let overridden = resolve_gains(
            base,
            Some("flat"),
            GainOverrides {
                mid: Some(-12.0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(overridden, GainSet::new(0.0, -12.0, 0.0));
    }

    #[test]
    fn test_unknown_preset() {
        let err = resolve_gains(GainSet::flat(), Some("nope"), GainOverrides::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_process_writes_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        let tone = AudioBuffer::sine_wave(1000.0, 0.5, 0.5, 44100).unwrap();
        audio::write_wav_pcm16(&tone, &input).unwrap();

        process(
            &input,
            &output,
            GainOverrides {
                mid: Some(6.0),
                ..Default::default()
            },
            None,
            None,
        )
        .unwrap();

        let result = audio::load_wav_with(&output, audio::LoadOptions { normalize: false })
            .unwrap();
        assert_eq!(result.len(), tone.len());
        assert!(result.peak() > 0.999);
    }

    #[test]
    fn test_process_silent_input_fails() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("silent.wav");
        let output = dir.path().join("out.wav");
        let silence = AudioBuffer::silence(4410, 44100).unwrap();
        audio::write_wav_pcm16(&silence, &input).unwrap();

        let err = process(&input, &output, GainOverrides::default(), None, None).unwrap_err();
        assert!(matches!(err, TribandError::SilentSignal));
        assert!(!output.exists());
    }

    #[test]
    fn test_bands_rejects_inverted_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("eq.json");
        std::fs::write(
            &path,
            r#"{"layout": {"mid": {"low_hz": 4000.0, "high_hz": 250.0}}}"#,
        )
        .unwrap();

        let err = bands(Some(&path)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(bands(None).is_ok());
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("eq.json");
        init_config(&path, false).unwrap();
        assert!(init_config(&path, false).is_err());
        assert!(init_config(&path, true).is_ok());
    }
}
