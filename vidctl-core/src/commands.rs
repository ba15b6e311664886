use crate::error::{CommandError, EngineError};

/// Direction of a one-rung move on the rate ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum RateStep {
    #[strum(serialize = "faster")]
    Up,
    #[strum(serialize = "slower")]
    Down,
}

/// A seek target expressed in tenths of the duration, always within `0..=9`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tenth(u8);

impl Tenth {
    pub fn new(value: u8) -> Result<Self, CommandError> {
        if value <= 9 {
            Ok(Self(value))
        } else {
            Err(CommandError::FractionOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Fraction of the duration this tenth points at
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl TryFrom<u8> for Tenth {
    type Error = CommandError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Commands sent from the input layer to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Play when paused, pause when playing
    TogglePlay,
    /// Relative seek in seconds
    SeekBy(f64),
    /// Jump to a tenth of the duration
    SeekToFraction(Tenth),
    /// Absolute seek in seconds
    SeekTo(f64),
    /// Jump to a point on the progress bar, `0.0..=1.0`
    SeekToProgress(f64),
    /// Move one rung on the rate ladder
    StepRate(RateStep),
    /// Pick a rate directly; snapped to the nearest ladder rung
    SetRate(f64),
    /// Flip the theater layout flag
    ToggleTheater,
    /// Ask the engine to enter (or leave) fullscreen
    ToggleFullscreen,
}

/// Notifications sent from the playback engine to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Playback has started
    Playing,
    /// Playback has been paused
    Paused,
    /// Current position moved
    TimeUpdate(f64),
    /// Duration became known, changed, or was reset by a new source
    DurationChange(Option<f64>),
    /// Rate changed, possibly by something other than the controller
    RateChange(f64),
    /// The host entered or left fullscreen
    FullscreenChange,
    /// A new source was loaded
    SourceChange(String),
    /// A request failed after it was issued
    Error(EngineError),
}
