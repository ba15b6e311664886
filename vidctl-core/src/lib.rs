pub mod bus;
pub mod clock;
pub mod commands;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod input;
pub mod ladder;
pub mod simulated;

pub use bus::{EventBus, HostEvent, Subscription};
pub use clock::{PlaybackClock, PlaybackStatus};
pub use commands::{Command, EngineEvent, RateStep, Tenth};
pub use controller::{Controller, ControllerSnapshot, VisualMode};
pub use engine::{FullscreenApi, PlaybackEngine};
pub use error::{CommandError, EngineError};
pub use input::{Focus, Key, KeyInput, Modifiers};
pub use ladder::RateLadder;
pub use simulated::SimulatedEngine;
