//! In-process engine that keeps a virtual transport instead of decoding.
//!
//! Seeks and rate changes apply immediately, like a media element's
//! `currentTime` setter. Play, pause and fullscreen requests are queued and
//! only take effect on the next [`SimulatedEngine::tick`], which is also when
//! their notifications are produced.

use std::collections::VecDeque;
use std::time::Duration;

use crate::commands::EngineEvent;
use crate::config::DEFAULT_RATE;
use crate::engine::{FullscreenApi, PlaybackEngine};
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Request {
    Play,
    Pause,
    EnterFullscreen(FullscreenApi),
    ExitFullscreen(FullscreenApi),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Probe {
    /// Duration is known
    Done,
    /// Duration becomes known on the next tick
    Pending(f64),
    /// The source never reports a duration
    Never,
    /// The source cannot be opened; reported on the next tick
    Failed,
}

#[derive(Debug, Clone)]
pub struct SimulatedEngine {
    source: String,
    current_time: f64,
    duration: Option<f64>,
    paused: bool,
    rate: f64,
    probe: Probe,
    fullscreen_apis: Vec<FullscreenApi>,
    fullscreen: Option<FullscreenApi>,
    autoplay_blocked: bool,
    fullscreen_denied: bool,
    pending: VecDeque<Request>,
    outbox: Vec<EngineEvent>,
}

impl SimulatedEngine {
    fn base(source: &str, probe: Probe) -> Self {
        Self {
            source: source.to_string(),
            current_time: 0.0,
            duration: None,
            paused: true,
            rate: DEFAULT_RATE,
            probe,
            fullscreen_apis: vec![FullscreenApi::Standard],
            fullscreen: None,
            autoplay_blocked: false,
            fullscreen_denied: false,
            pending: VecDeque::new(),
            outbox: vec![EngineEvent::SourceChange(source.to_string())],
        }
    }

    /// Source whose metadata is already loaded
    pub fn with_duration(source: &str, duration: f64) -> Self {
        let mut engine = Self::base(source, Probe::Done);
        engine.duration = Some(duration.max(0.0));
        engine
    }

    /// Source whose duration is reported on the first tick
    pub fn loading(source: &str, duration: f64) -> Self {
        Self::base(source, Probe::Pending(duration.max(0.0)))
    }

    /// Source that never reports a duration
    pub fn unprobed(source: &str) -> Self {
        Self::base(source, Probe::Never)
    }

    /// Source that fails to open
    pub fn failed(source: &str) -> Self {
        Self::base(source, Probe::Failed)
    }

    /// Restrict which fullscreen entry points this host exposes
    pub fn with_fullscreen_apis(mut self, apis: &[FullscreenApi]) -> Self {
        self.fullscreen_apis = apis.to_vec();
        self
    }

    /// Reject every play request, like a browser autoplay policy
    pub fn with_autoplay_blocked(mut self) -> Self {
        self.autoplay_blocked = true;
        self
    }

    pub fn with_fullscreen_denied(mut self) -> Self {
        self.fullscreen_denied = true;
        self
    }

    /// Apply queued requests and advance the transport by `elapsed` of wall time.
    ///
    /// Returns the notifications produced since the previous tick.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<EngineEvent> {
        match self.probe {
            Probe::Pending(duration) => {
                self.duration = Some(duration);
                self.probe = Probe::Done;
                self.outbox.push(EngineEvent::DurationChange(Some(duration)));
            }
            Probe::Failed => {
                self.probe = Probe::Never;
                self.outbox.push(EngineEvent::Error(EngineError::SourceUnavailable(
                    self.source.clone(),
                )));
            }
            Probe::Done | Probe::Never => {}
        }

        while let Some(request) = self.pending.pop_front() {
            self.apply(request);
        }

        if !self.paused && !elapsed.is_zero() {
            self.advance(elapsed.as_secs_f64() * self.rate);
        }

        std::mem::take(&mut self.outbox)
    }

    /// Apply queued requests without moving the transport
    pub fn process_requests(&mut self) -> Vec<EngineEvent> {
        self.tick(Duration::ZERO)
    }

    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    fn apply(&mut self, request: Request) {
        match request {
            Request::Play if self.paused => {
                if self.autoplay_blocked {
                    self.outbox.push(EngineEvent::Error(EngineError::PlayRejected(
                        "autoplay policy".to_string(),
                    )));
                } else if self.duration.is_none() {
                    self.outbox.push(EngineEvent::Error(EngineError::PlayRejected(
                        "no playable source".to_string(),
                    )));
                } else {
                    if self.duration.is_some_and(|d| self.current_time >= d) {
                        self.current_time = 0.0;
                    }
                    self.paused = false;
                    self.outbox.push(EngineEvent::Playing);
                }
            }
            Request::Pause if !self.paused => {
                self.paused = true;
                self.outbox.push(EngineEvent::Paused);
            }
            Request::EnterFullscreen(api) if self.fullscreen.is_none() => {
                if self.fullscreen_denied {
                    self.outbox
                        .push(EngineEvent::Error(EngineError::FullscreenDenied(api)));
                } else {
                    self.fullscreen = Some(api);
                    self.outbox.push(EngineEvent::FullscreenChange);
                }
            }
            Request::ExitFullscreen(_) if self.fullscreen.is_some() => {
                self.fullscreen = None;
                self.outbox.push(EngineEvent::FullscreenChange);
            }
            // Already in the requested state
            _ => {}
        }
    }

    fn advance(&mut self, seconds: f64) {
        let Some(duration) = self.duration else {
            return;
        };
        self.current_time = (self.current_time + seconds).min(duration);
        self.outbox.push(EngineEvent::TimeUpdate(self.current_time));
        if self.current_time >= duration {
            log::debug!("Reached end of {}", self.source);
            self.paused = true;
            self.outbox.push(EngineEvent::Paused);
        }
    }
}

impl PlaybackEngine for SimulatedEngine {
    fn play(&mut self) {
        self.pending.push_back(Request::Play);
    }

    fn pause(&mut self) {
        self.pending.push_back(Request::Pause);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        let upper = self.duration.unwrap_or(0.0);
        self.current_time = seconds.clamp(0.0, upper);
        self.outbox.push(EngineEvent::TimeUpdate(self.current_time));
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        if rate.is_finite() && rate > 0.0 && rate != self.rate {
            self.rate = rate;
            self.outbox.push(EngineEvent::RateChange(rate));
        }
    }

    fn has_fullscreen_api(&self, api: FullscreenApi) -> bool {
        self.fullscreen_apis.contains(&api)
    }

    fn request_fullscreen(&mut self, api: FullscreenApi) {
        if self.has_fullscreen_api(api) {
            self.pending.push_back(Request::EnterFullscreen(api));
        }
    }

    fn exit_fullscreen(&mut self, api: FullscreenApi) {
        if self.has_fullscreen_api(api) {
            self.pending.push_back(Request::ExitFullscreen(api));
        }
    }

    fn fullscreen_active(&self, api: FullscreenApi) -> bool {
        self.fullscreen == Some(api)
    }

    fn source(&self) -> Option<&str> {
        Some(&self.source)
    }
}
