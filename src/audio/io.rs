//! WAV loading and 16-bit export
//!
//! The loader decodes any PCM or float WAV that hound can read, averages
//! the channels down to mono and (by default) peak-normalizes the result,
//! which is what the equalizer expects as input. The export side is the
//! fixed-point conversion a playback sink needs: samples scaled by 32767
//! into signed 16-bit integers.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, warn};

use super::AudioBuffer;
use crate::error::{Result, TribandError};

/// Scale factor from float samples to 16-bit PCM
pub const PCM16_SCALE: f32 = 32767.0;

/// Loader options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Divide by the peak absolute value after down-mixing
    pub normalize: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { normalize: true }
    }
}

/// Load a WAV file as a mono, peak-normalized buffer
pub fn load_wav(path: &Path) -> Result<AudioBuffer> {
    load_wav_with(path, LoadOptions::default())
}

/// Load a WAV file as a mono buffer
///
/// # Errors
/// * `FileNotFound` - if the file does not exist
/// * `AudioRead` - if the file is not a readable WAV file
/// * `UnsupportedFormat` - for bit depths hound cannot map to f32
pub fn load_wav_with(path: &Path, options: LoadOptions) -> Result<AudioBuffer> {
    if !path.exists() {
        return Err(TribandError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let reader = WavReader::open(path).map_err(|source| TribandError::AudioRead {
        path: path.display().to_string(),
        source,
    })?;
    let spec = reader.spec();
    debug!(
        "Loading {}: {} ch, {} Hz, {}-bit {:?}",
        path.display(),
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.sample_format
    );

    let interleaved = read_samples_as_f32(reader, spec, path)?;
    let channels = spec.channels.max(1) as usize;
    if channels > 1 {
        warn!(
            "{} has {} channels; averaging down to mono",
            path.display(),
            channels
        );
    }
    let mut samples = downmix(&interleaved, channels);

    if options.normalize {
        let peak = samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max);
        if peak > 0.0 {
            samples.iter_mut().for_each(|s| *s /= peak);
        } else {
            warn!("{} is silent; leaving it unnormalized", path.display());
        }
    }

    AudioBuffer::new(samples, spec.sample_rate)
}

/// Average interleaved frames down to one channel
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Convert float samples to 16-bit PCM, saturating outside -1.0..=1.0
pub fn to_pcm16(buffer: &AudioBuffer) -> Vec<i16> {
    buffer
        .samples()
        .iter()
        .map(|&s| (s * PCM16_SCALE).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16)
        .collect()
}

/// Write a buffer as a mono 16-bit PCM WAV file
pub fn write_wav_pcm16(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let write_err = |source: hound::Error| TribandError::AudioWrite {
        path: path.display().to_string(),
        source,
    };

    let mut writer = WavWriter::create(path, spec).map_err(write_err)?;
    for sample in to_pcm16(buffer) {
        writer.write_sample(sample).map_err(write_err)?;
    }
    writer.finalize().map_err(write_err)?;

    debug!("Wrote {} samples to {}", buffer.len(), path.display());
    Ok(())
}

/// Read samples from a WAV reader and convert to f32 in -1.0..1.0
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    spec: WavSpec,
    path: &Path,
) -> Result<Vec<f32>> {
    let read_err = |source: hound::Error| TribandError::AudioRead {
        path: path.display().to_string(),
        source,
    };
    match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(read_err),
        SampleFormat::Int => {
            let scale = match spec.bits_per_sample {
                8 => 128.0,
                16 => 32768.0,
                24 => 8388608.0,
                32 => 2147483648.0,
                bits => {
                    return Err(TribandError::UnsupportedFormat {
                        details: format!("{}-bit integer audio", bits),
                    })
                }
            };
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(read_err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    fn write_stereo_i16(path: &Path, frames: &[(i16, i16)], sample_rate: u32) {
        let spec = WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &(l, r) in frames {
            writer.write_sample(l).unwrap();
            writer.write_sample(r).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_downmix_averages_channels() {
        let mixed = downmix(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2);
        assert_eq!(mixed, vec![0.5, 0.5, 0.0]);
        assert_eq!(downmix(&[0.1, 0.2], 1), vec![0.1, 0.2]);
    }

    #[test]
    fn test_to_pcm16_scaling() {
        let buffer = AudioBuffer::new(vec![1.0, -1.0, 0.5, 0.0, 2.0, -2.0], 44100).unwrap();
        assert_eq!(
            to_pcm16(&buffer),
            vec![32767, -32767, 16384, 0, 32767, -32768]
        );
    }

    #[test]
    fn test_load_stereo_downmixes_and_normalizes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_stereo_i16(&path, &[(8192, 0), (-8192, -8192), (0, 0)], 22050);

        let buffer = load_wav(&path).unwrap();
        assert_eq!(buffer.sample_rate(), 22050);
        assert_eq!(buffer.len(), 3);
        assert_relative_eq!(buffer.samples()[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(buffer.samples()[1], -1.0, epsilon = 1e-6);
        assert_eq!(buffer.samples()[2], 0.0);
    }

    #[test]
    fn test_load_without_normalize() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quiet.wav");
        write_stereo_i16(&path, &[(16384, 16384)], 8000);

        let buffer = load_wav_with(&path, LoadOptions { normalize: false }).unwrap();
        assert_relative_eq!(buffer.samples()[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_load_silent_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("silent.wav");
        write_stereo_i16(&path, &[(0, 0), (0, 0)], 8000);

        let buffer = load_wav(&path).unwrap();
        assert!(buffer.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_missing_file() {
        let err = load_wav(Path::new("/definitely/not/here.wav")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_not_a_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk.wav");
        std::fs::write(&path, b"definitely not RIFF").unwrap();
        let err = load_wav(&path).unwrap_err();
        assert_eq!(err.error_code(), "AUDIO_READ");
    }

    #[test]
    fn test_write_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let buffer = AudioBuffer::sine_wave(440.0, 1.0, 0.1, 44100).unwrap();
        write_wav_pcm16(&buffer, &path).unwrap();

        let reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().bits_per_sample, 16);
        assert_eq!(reader.len() as usize, buffer.len());

        let reloaded = load_wav_with(&path, LoadOptions { normalize: false }).unwrap();
        for (a, b) in buffer.samples().iter().zip(reloaded.samples()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-4);
        }
    }
}
