//! Error handling for Triband
//!
//! Every failure is returned to the immediate caller; the engine never
//! swallows an error or hands back a partially processed buffer.

use thiserror::Error;

/// Result type alias for Triband operations
pub type Result<T> = std::result::Result<T, TribandError>;

/// Main error type for Triband operations
#[derive(Error, Debug)]
pub enum TribandError {
    // Engine errors
    #[error(
        "Invalid filter range: {low_hz} Hz..{high_hz} Hz at {sample_rate} Hz \
         (requires 0 < low < high < sample_rate / 2)"
    )]
    InvalidFilterRange {
        low_hz: f64,
        high_hz: f64,
        sample_rate: u32,
    },

    #[error("Signal is silent after equalization; cannot normalize")]
    SilentSignal,

    #[error("Invalid gain for {band} band: {gain_db} dB (must be finite)")]
    InvalidGain { band: String, gain_db: f64 },

    #[error("Invalid filter order: {order} (must be at least 1)")]
    InvalidOrder { order: usize },

    #[error("Invalid sample rate: {sample_rate} Hz")]
    InvalidSampleRate { sample_rate: u32 },

    #[error("Equalized signal contains NaN/Inf samples")]
    NonFiniteOutput,

    // File errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read audio file: {path}")]
    AudioRead {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Failed to write audio file: {path}")]
    AudioWrite {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Unsupported audio format: {details}")]
    UnsupportedFormat { details: String },

    // Configuration errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TribandError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            TribandError::InvalidFilterRange { .. } => "INVALID_FILTER_RANGE",
            TribandError::SilentSignal => "SILENT_SIGNAL",
            TribandError::InvalidGain { .. } => "INVALID_GAIN",
            TribandError::InvalidOrder { .. } => "INVALID_ORDER",
            TribandError::InvalidSampleRate { .. } => "INVALID_SAMPLE_RATE",
            TribandError::NonFiniteOutput => "NON_FINITE_OUTPUT",
            TribandError::FileNotFound { .. } => "FILE_NOT_FOUND",
            TribandError::AudioRead { .. } => "AUDIO_READ",
            TribandError::AudioWrite { .. } => "AUDIO_WRITE",
            TribandError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            TribandError::InvalidConfig { .. } => "INVALID_CONFIG",
            TribandError::Io(_) => "IO_ERROR",
            TribandError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if retrying with different inputs can succeed
    ///
    /// An invalid filter range is tied to the band table and sample rate,
    /// so retrying with new gains alone never helps.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TribandError::SilentSignal
                | TribandError::InvalidGain { .. }
                | TribandError::FileNotFound { .. }
                | TribandError::UnsupportedFormat { .. }
                | TribandError::InvalidConfig { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TribandError::InvalidFilterRange { .. } => vec![
                "Use audio with a higher sample rate",
                "Lower the upper edge of the offending band below Nyquist",
                "Make sure every band has low < high",
            ],
            TribandError::SilentSignal => vec![
                "Check that the input is not silent",
                "Raise at least one band gain",
                "The input may have no energy inside any band",
            ],
            TribandError::InvalidGain { .. } => vec![
                "Use a finite gain in dB (e.g. -12 to +12)",
                "Use a large negative value instead of -inf to mute a band",
            ],
            TribandError::NonFiniteOutput => vec![
                "The input contains NaN or infinite samples",
                "Re-decode the source file",
            ],
            TribandError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            TribandError::AudioRead { .. } | TribandError::UnsupportedFormat { .. } => vec![
                "Convert the file to 16-bit PCM WAV first",
                "Check if the file plays in another application",
            ],
            TribandError::InvalidConfig { .. } | TribandError::Serialization(_) => vec![
                "Regenerate a default file with 'triband init-config'",
            ],
            _ => vec![],
        }
    }
}
