//! Transport adapter over a [`PlaybackEngine`].
//!
//! Every operation is a no-op while no engine is attached, and seeks are
//! clamped into `[0, duration]` before they reach the engine.

use crate::commands::Tenth;
use crate::engine::{FullscreenApi, PlaybackEngine};

/// Point-in-time copy of the engine's transport state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackStatus {
    pub current_time: f64,
    pub duration: Option<f64>,
    pub paused: bool,
    pub rate: f64,
}

impl PlaybackStatus {
    /// Progress through the source (0.0 to 1.0), zero while duration is unknown
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(duration) if duration > 0.0 => (self.current_time / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

/// Owns the single engine of one player instance
#[derive(Debug)]
pub struct PlaybackClock<E> {
    engine: Option<E>,
}

impl<E> Default for PlaybackClock<E> {
    fn default() -> Self {
        Self { engine: None }
    }
}

impl<E: PlaybackEngine> PlaybackClock<E> {
    pub fn new() -> Self {
        Self { engine: None }
    }

    pub fn with_engine(engine: E) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// Attach an engine, returning the one it replaces
    pub fn attach(&mut self, engine: E) -> Option<E> {
        self.engine.replace(engine)
    }

    pub fn detach(&mut self) -> Option<E> {
        self.engine.take()
    }

    pub fn is_attached(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_mut()
    }

    pub fn status(&self) -> Option<PlaybackStatus> {
        self.engine.as_ref().map(|engine| PlaybackStatus {
            current_time: engine.current_time(),
            duration: known_duration(engine),
            paused: engine.is_paused(),
            rate: engine.playback_rate(),
        })
    }

    pub fn toggle_play(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            log::debug!("toggle_play ignored: no engine attached");
            return;
        };
        if engine.is_paused() {
            engine.play();
        } else {
            engine.pause();
        }
    }

    /// Relative seek, clamped into `[0, duration]`
    pub fn seek_by(&mut self, delta_seconds: f64) {
        if !delta_seconds.is_finite() {
            log::debug!("seek_by ignored: non-finite delta {}", delta_seconds);
            return;
        }
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let Some(duration) = known_duration(engine) else {
            log::debug!("seek_by ignored: duration unknown");
            return;
        };
        let target = (engine.current_time() + delta_seconds).clamp(0.0, duration);
        engine.set_current_time(target);
    }

    /// Absolute seek to `tenth / 10` of the duration
    pub fn seek_to_fraction(&mut self, tenth: Tenth) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let Some(duration) = known_duration(engine) else {
            log::debug!("seek_to_fraction ignored: duration unknown");
            return;
        };
        engine.set_current_time(duration * tenth.fraction());
    }

    /// Absolute seek in seconds, clamped into `[0, duration]`
    pub fn seek_to(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            log::debug!("seek_to ignored: non-finite target {}", seconds);
            return;
        }
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let Some(duration) = known_duration(engine) else {
            log::debug!("seek_to ignored: duration unknown");
            return;
        };
        engine.set_current_time(seconds.clamp(0.0, duration));
    }

    /// Seek to a position along the progress bar, `0.0..=1.0` of the duration
    pub fn seek_to_progress(&mut self, ratio: f64) {
        if !ratio.is_finite() {
            log::debug!("seek_to_progress ignored: non-finite ratio {}", ratio);
            return;
        }
        let Some(duration) = self.engine.as_ref().and_then(known_duration) else {
            log::debug!("seek_to_progress ignored: duration unknown");
            return;
        };
        self.seek_to(ratio.clamp(0.0, 1.0) * duration);
    }

    pub fn set_rate(&mut self, rate: f64) {
        if let Some(engine) = self.engine.as_mut() {
            engine.set_playback_rate(rate);
        }
    }

    pub fn rate(&self) -> Option<f64> {
        self.engine.as_ref().map(|engine| engine.playback_rate())
    }

    /// Ask the host to go fullscreen through the first API it exposes.
    ///
    /// Returns the API used, or `None` when the request was dropped.
    pub fn request_fullscreen(&mut self) -> Option<FullscreenApi> {
        let engine = self.engine.as_mut()?;
        let Some(api) = first_supported(engine) else {
            log::info!("Fullscreen request dropped: host exposes no fullscreen API");
            return None;
        };
        engine.request_fullscreen(api);
        Some(api)
    }

    pub fn exit_fullscreen(&mut self) -> Option<FullscreenApi> {
        let engine = self.engine.as_mut()?;
        let api = first_supported(engine)?;
        engine.exit_fullscreen(api);
        Some(api)
    }

    /// Whether the host currently shows the video fullscreen under any API
    pub fn is_fullscreen(&self) -> bool {
        self.engine.as_ref().is_some_and(|engine| {
            FullscreenApi::probe_order().any(|api| engine.fullscreen_active(api))
        })
    }
}

fn first_supported<E: PlaybackEngine>(engine: &E) -> Option<FullscreenApi> {
    FullscreenApi::probe_order().find(|&api| engine.has_fullscreen_api(api))
}

/// Engines may report NaN or a negative length before probing completes
fn known_duration<E: PlaybackEngine>(engine: &E) -> Option<f64> {
    engine
        .duration()
        .filter(|duration| duration.is_finite() && *duration >= 0.0)
}
