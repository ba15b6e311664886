use thiserror::Error;

use crate::engine::FullscreenApi;

/// Failures an engine reports asynchronously through its notification channel.
///
/// These are never returned from a controller command: a command only issues
/// a request, and the engine decides later whether it succeeded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("play request rejected: {0}")]
    PlayRejected(String),
    #[error("fullscreen request denied by {0}")]
    FullscreenDenied(FullscreenApi),
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Errors raised while building a command from raw values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("fraction must be between 0 and 9 tenths, got {0}")]
    FractionOutOfRange(u8),
    #[error("playback rate must be a positive finite number, got {0}")]
    InvalidRate(f64),
}
