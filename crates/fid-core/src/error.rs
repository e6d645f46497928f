//! Error types for FID preprocessing

use thiserror::Error;

use crate::Channel;

/// Preprocessing error type
///
/// Numeric degeneracy (NaN, infinity) is never reported here; only
/// structural problems detected before any buffer is touched.
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Invalid acquisition parameters: {0}")]
    InvalidParams(String),

    #[error("{channel:?} {buffer} buffer too short: need {required} floats, got {actual}")]
    BufferTooShort {
        channel: Channel,
        buffer: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Channel mismatch: expected {expected}, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("Invalid channel indicator: {0} (expected 0 or 1)")]
    InvalidChannelIndicator(u32),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias
pub type PrepResult<T> = Result<T, PrepError>;
