//! Player state machine.
//!
//! The controller owns what the engine does not: the rate ladder position and
//! the theater flag. Paused and fullscreen are mirrored from engine
//! notifications, so they may lag a request until the next [`Controller::sync`].

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::bus::{EventBus, HostEvent, Subscription};
use crate::clock::PlaybackClock;
use crate::commands::{Command, EngineEvent};
use crate::engine::PlaybackEngine;
use crate::error::CommandError;
use crate::input::{KeyInput, map_key};
use crate::ladder::RateLadder;

/// Layout the renderer should use. Fullscreen wins when both flags are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum VisualMode {
    Normal,
    Theater,
    Fullscreen,
}

/// Everything an observer needs to redraw the player
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub rate_index: usize,
    pub rate: f64,
    pub theater: bool,
    pub fullscreen: bool,
    pub paused: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub source: Option<String>,
}

impl ControllerSnapshot {
    pub fn visual_mode(&self) -> VisualMode {
        if self.fullscreen {
            VisualMode::Fullscreen
        } else if self.theater {
            VisualMode::Theater
        } else {
            VisualMode::Normal
        }
    }

    /// Progress through the source (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(duration) if duration > 0.0 => (self.current_time / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

pub struct Controller<E> {
    clock: PlaybackClock<E>,
    ladder: RateLadder,
    rate_index: usize,
    theater: bool,
    fullscreen: bool,
    paused: bool,
    listener: Option<Subscription<HostEvent>>,
    observers: Vec<Sender<ControllerSnapshot>>,
    last_published: Option<ControllerSnapshot>,
}

impl<E: PlaybackEngine> Default for Controller<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PlaybackEngine> Controller<E> {
    /// Controller with no engine attached yet
    pub fn new() -> Self {
        let ladder = RateLadder::standard();
        Self {
            clock: PlaybackClock::new(),
            rate_index: ladder.default_index(),
            ladder,
            theater: false,
            fullscreen: false,
            paused: true,
            listener: None,
            observers: Vec::new(),
            last_published: None,
        }
    }

    pub fn with_engine(engine: E) -> Self {
        let mut controller = Self::new();
        controller.load_source(engine);
        controller
    }

    /// Start at the ladder rung closest to `rate`
    pub fn with_initial_rate(mut self, rate: f64) -> Self {
        self.rate_index = self.ladder.snap(rate);
        self.clock.set_rate(self.ladder.rate_at(self.rate_index));
        self.publish();
        self
    }

    // ---- accessors ----------------------------------------------------------

    pub fn rate_index(&self) -> usize {
        self.rate_index
    }

    pub fn rate(&self) -> f64 {
        self.ladder.rate_at(self.rate_index)
    }

    pub fn ladder(&self) -> &RateLadder {
        &self.ladder
    }

    pub fn theater(&self) -> bool {
        self.theater
    }

    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn clock(&self) -> &PlaybackClock<E> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut PlaybackClock<E> {
        &mut self.clock
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let status = self.clock.status();
        ControllerSnapshot {
            rate_index: self.rate_index,
            rate: status.map(|s| s.rate).unwrap_or_else(|| self.rate()),
            theater: self.theater,
            fullscreen: self.fullscreen,
            paused: self.paused,
            current_time: status.map(|s| s.current_time).unwrap_or(0.0),
            duration: status.and_then(|s| s.duration),
            source: self
                .clock
                .engine()
                .and_then(|engine| engine.source())
                .map(str::to_string),
        }
    }

    // ---- source lifecycle ---------------------------------------------------

    /// Swap in an engine for a new source.
    ///
    /// Rate and theater survive the swap; the current rung is applied to the
    /// new engine. Returns the previous engine.
    pub fn load_source(&mut self, engine: E) -> Option<E> {
        let previous = self.clock.attach(engine);
        self.clock.set_rate(self.rate());
        self.paused = self.clock.status().is_none_or(|s| s.paused);
        self.fullscreen = self.clock.is_fullscreen();
        log::info!(
            "Source attached: {}",
            self.clock
                .engine()
                .and_then(|engine| engine.source())
                .unwrap_or("(unnamed)")
        );
        self.publish();
        previous
    }

    /// Tear down the engine. Later commands no-op until a new one is loaded.
    pub fn unload(&mut self) -> Option<E> {
        let engine = self.clock.detach();
        self.paused = true;
        self.fullscreen = false;
        self.publish();
        engine
    }

    // ---- commands -----------------------------------------------------------

    /// Map a raw key event and dispatch it.
    ///
    /// Returns whether the published snapshot changed.
    pub fn handle_input(&mut self, input: &KeyInput) -> bool {
        match map_key(input) {
            Some(command) => self.dispatch(command),
            None => false,
        }
    }

    /// Run one command to completion. Returns whether the snapshot changed.
    pub fn dispatch(&mut self, command: Command) -> bool {
        if !self.clock.is_attached() {
            log::debug!("{:?} ignored: no engine attached", command);
            return false;
        }
        log::debug!("Dispatching {:?}", command);

        match command {
            Command::TogglePlay => self.clock.toggle_play(),
            Command::SeekBy(delta) => self.clock.seek_by(delta),
            Command::SeekToFraction(tenth) => self.clock.seek_to_fraction(tenth),
            Command::SeekTo(seconds) => self.clock.seek_to(seconds),
            Command::SeekToProgress(ratio) => self.clock.seek_to_progress(ratio),
            Command::StepRate(step) => {
                let observed = self.clock.rate().unwrap_or_else(|| self.rate());
                let index = self.ladder.step_from(observed, step);
                self.apply_rate_index(index);
            }
            Command::SetRate(rate) => {
                if !rate.is_finite() || rate <= 0.0 {
                    log::warn!("{}", CommandError::InvalidRate(rate));
                    return false;
                }
                self.apply_rate_index(self.ladder.snap(rate));
            }
            Command::ToggleTheater => self.theater = !self.theater,
            Command::ToggleFullscreen => {
                if self.fullscreen {
                    self.clock.exit_fullscreen();
                } else {
                    self.clock.request_fullscreen();
                }
            }
        }

        self.publish()
    }

    fn apply_rate_index(&mut self, index: usize) {
        let rate = self.ladder.rate_at(index);
        self.rate_index = index;
        if self.clock.rate() != Some(rate) {
            log::info!("Speed: {}x", rate);
            self.clock.set_rate(rate);
        }
    }

    // ---- notifications ------------------------------------------------------

    /// Fold one engine notification into the read-model
    pub fn sync(&mut self, event: &EngineEvent) -> bool {
        match event {
            EngineEvent::Playing => self.paused = false,
            EngineEvent::Paused => self.paused = true,
            EngineEvent::FullscreenChange => self.fullscreen = self.clock.is_fullscreen(),
            EngineEvent::RateChange(rate) => {
                // Off-ladder rates keep the old index; the next step resolves
                // from the observed rate anyway
                if let Some(index) = self.ladder.index_of(*rate) {
                    self.rate_index = index;
                }
            }
            EngineEvent::SourceChange(source) => log::debug!("Engine loaded {}", source),
            EngineEvent::Error(err) => log::warn!("Engine reported: {}", err),
            EngineEvent::TimeUpdate(_) | EngineEvent::DurationChange(_) => {}
        }
        self.publish()
    }

    // ---- listener registration ----------------------------------------------

    /// Start listening to host input and engine notifications on `bus`.
    ///
    /// The registration lasts until [`Controller::stop`] or until the
    /// controller is dropped.
    pub fn start(&mut self, bus: &EventBus<HostEvent>) {
        let subscription = bus.subscribe();
        log::debug!("Controller listening (listener {})", subscription.id());
        self.listener = Some(subscription);
    }

    pub fn stop(&mut self) {
        if let Some(subscription) = self.listener.take() {
            log::debug!("Controller stopped (listener {})", subscription.id());
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Handle everything queued on the bus since the last pump.
    ///
    /// Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        let events: Vec<HostEvent> = match &self.listener {
            Some(subscription) => subscription.try_iter().collect(),
            None => return 0,
        };

        for event in &events {
            match event {
                HostEvent::Key(input) => {
                    self.handle_input(input);
                }
                HostEvent::Engine(notification) => {
                    self.sync(notification);
                }
            }
        }
        events.len()
    }

    // ---- observers ----------------------------------------------------------

    /// Receive a snapshot every time the player state changes
    pub fn subscribe(&mut self) -> Receiver<ControllerSnapshot> {
        let (tx, rx) = unbounded();
        let snapshot = self.snapshot();
        let _ = tx.send(snapshot);
        self.observers.push(tx);
        rx
    }

    /// Send the snapshot to observers if it differs from the last one sent
    fn publish(&mut self) -> bool {
        let snapshot = self.snapshot();
        if self.last_published.as_ref() == Some(&snapshot) {
            return false;
        }
        self.observers.retain(|tx| tx.send(snapshot.clone()).is_ok());
        self.last_published = Some(snapshot);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{RateStep, Tenth};
    use crate::engine::FullscreenApi;
    use crate::error::EngineError;
    use crate::input::{Focus, Key};
    use crate::simulated::SimulatedEngine;
    use approx::assert_abs_diff_eq;

    fn controller_at(duration: f64, position: f64) -> Controller<SimulatedEngine> {
        let mut engine = SimulatedEngine::with_duration("clip.mp4", duration);
        engine.set_current_time(position);
        Controller::with_engine(engine)
    }

    fn press(controller: &mut Controller<SimulatedEngine>, c: char) -> bool {
        controller.handle_input(&KeyInput::new(Key::Char(c)))
    }

    fn flush(controller: &mut Controller<SimulatedEngine>) {
        let events = controller.clock_mut().engine_mut().unwrap().process_requests();
        for event in &events {
            controller.sync(event);
        }
    }

    fn time(controller: &Controller<SimulatedEngine>) -> f64 {
        controller.snapshot().current_time
    }

    #[test]
    fn starts_at_normal_speed() {
        let controller = controller_at(100.0, 0.0);
        assert_abs_diff_eq!(controller.rate(), 1.0);
        assert!(!controller.theater());
        assert!(!controller.fullscreen());
        assert!(controller.paused());
    }

    #[test]
    fn seek_scenario() {
        let mut controller = controller_at(100.0, 50.0);
        press(&mut controller, 'j');
        assert_abs_diff_eq!(time(&controller), 40.0);
        press(&mut controller, 'l');
        press(&mut controller, 'l');
        assert_abs_diff_eq!(time(&controller), 60.0);
        press(&mut controller, '3');
        assert_abs_diff_eq!(time(&controller), 30.0);
    }

    #[test]
    fn arrows_seek_five_seconds() {
        let mut controller = controller_at(100.0, 50.0);
        controller.handle_input(&KeyInput::new(Key::Left));
        assert_abs_diff_eq!(time(&controller), 45.0);
        controller.handle_input(&KeyInput::new(Key::Right));
        controller.handle_input(&KeyInput::new(Key::Right));
        assert_abs_diff_eq!(time(&controller), 55.0);
    }

    #[test]
    fn rate_steps_clamp_at_ladder_ends() {
        let mut controller = controller_at(100.0, 0.0);
        for _ in 0..20 {
            press(&mut controller, '>');
        }
        assert_eq!(controller.rate_index(), controller.ladder().top());
        assert_abs_diff_eq!(controller.rate(), 5.0);
        assert!(!press(&mut controller, '>'));

        for _ in 0..20 {
            press(&mut controller, '<');
        }
        assert_eq!(controller.rate_index(), 0);
        assert_abs_diff_eq!(controller.rate(), 0.2);
        assert!(!press(&mut controller, '<'));
    }

    #[test]
    fn rate_step_follows_externally_changed_rate() {
        let mut controller = controller_at(100.0, 0.0);
        controller
            .clock_mut()
            .engine_mut()
            .unwrap()
            .set_playback_rate(2.0);
        controller.sync(&EngineEvent::RateChange(2.0));
        assert_abs_diff_eq!(controller.rate(), 2.0);

        controller.dispatch(Command::StepRate(RateStep::Up));
        assert_abs_diff_eq!(controller.rate(), 3.0);
        assert_abs_diff_eq!(controller.clock().rate().unwrap(), 3.0);
    }

    #[test]
    fn off_ladder_rate_steps_to_neighbour() {
        let mut controller = controller_at(100.0, 0.0);
        controller
            .clock_mut()
            .engine_mut()
            .unwrap()
            .set_playback_rate(1.25);
        controller.sync(&EngineEvent::RateChange(1.25));

        controller.dispatch(Command::StepRate(RateStep::Down));
        assert_abs_diff_eq!(controller.clock().rate().unwrap(), 1.2);
    }

    #[test]
    fn set_rate_snaps_and_rejects_garbage() {
        let mut controller = controller_at(100.0, 0.0);
        assert!(controller.dispatch(Command::SetRate(2.9)));
        assert_abs_diff_eq!(controller.rate(), 3.0);

        assert!(!controller.dispatch(Command::SetRate(-1.0)));
        assert!(!controller.dispatch(Command::SetRate(f64::NAN)));
        assert_abs_diff_eq!(controller.rate(), 3.0);
    }

    #[test]
    fn theater_toggle_is_an_involution() {
        let mut controller = controller_at(100.0, 10.0);
        press(&mut controller, '>');
        let before = controller.snapshot();

        press(&mut controller, 't');
        assert!(controller.theater());
        press(&mut controller, 'T');

        let after = controller.snapshot();
        assert_eq!(before, after);
    }

    #[test]
    fn play_state_is_eventually_consistent() {
        let mut controller = controller_at(100.0, 0.0);
        press(&mut controller, ' ');
        assert!(controller.paused());

        flush(&mut controller);
        assert!(!controller.paused());

        press(&mut controller, 'k');
        assert!(!controller.paused());
        flush(&mut controller);
        assert!(controller.paused());
    }

    #[test]
    fn fullscreen_flag_flips_only_on_notification() {
        let mut controller = controller_at(100.0, 0.0);
        press(&mut controller, 'f');
        assert!(!controller.fullscreen());

        flush(&mut controller);
        assert!(controller.fullscreen());
        assert_eq!(controller.snapshot().visual_mode(), VisualMode::Fullscreen);

        press(&mut controller, 'f');
        flush(&mut controller);
        assert!(!controller.fullscreen());
    }

    #[test]
    fn denied_fullscreen_only_logs() {
        let engine = SimulatedEngine::with_duration("clip.mp4", 10.0).with_fullscreen_denied();
        let mut controller = Controller::with_engine(engine);
        flush(&mut controller);
        let before = controller.snapshot();

        press(&mut controller, 'f');
        let events = controller.clock_mut().engine_mut().unwrap().process_requests();
        assert_eq!(
            events,
            vec![EngineEvent::Error(EngineError::FullscreenDenied(
                FullscreenApi::Standard
            ))]
        );
        for event in &events {
            assert!(!controller.sync(event));
        }

        assert!(!controller.fullscreen());
        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn absolute_seek_commands() {
        let mut controller = controller_at(200.0, 10.0);
        controller.dispatch(Command::SeekTo(75.0));
        assert_abs_diff_eq!(time(&controller), 75.0);
        controller.dispatch(Command::SeekToProgress(0.5));
        assert_abs_diff_eq!(time(&controller), 100.0);
        controller.dispatch(Command::SeekTo(1e6));
        assert_abs_diff_eq!(time(&controller), 200.0);
    }

    #[test]
    fn absolute_seek_waits_for_duration() {
        let mut controller = Controller::with_engine(SimulatedEngine::loading("clip.mp4", 200.0));
        assert!(!controller.dispatch(Command::SeekToProgress(0.5)));
        assert!(!controller.dispatch(Command::SeekTo(30.0)));
        assert_abs_diff_eq!(time(&controller), 0.0);
    }

    #[test]
    fn theater_and_fullscreen_coexist() {
        let mut controller = controller_at(100.0, 0.0);
        press(&mut controller, 't');
        press(&mut controller, 'f');
        flush(&mut controller);

        let snapshot = controller.snapshot();
        assert!(snapshot.theater && snapshot.fullscreen);
        assert_eq!(snapshot.visual_mode(), VisualMode::Fullscreen);
    }

    #[test]
    fn fullscreen_never_set_without_host_api() {
        let engine = SimulatedEngine::with_duration("clip.mp4", 10.0).with_fullscreen_apis(&[]);
        let mut controller = Controller::with_engine(engine);
        press(&mut controller, 'f');
        flush(&mut controller);
        assert!(!controller.fullscreen());
    }

    #[test]
    fn text_entry_focus_blocks_digit_seek() {
        let mut controller = controller_at(100.0, 50.0);
        press(&mut controller, '>');
        let before = controller.snapshot();

        let changed = controller
            .handle_input(&KeyInput::new(Key::Char('5')).with_focus(Focus::TextEntry));

        assert!(!changed);
        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn commands_without_engine_noop() {
        let mut controller = Controller::<SimulatedEngine>::new();
        assert!(!controller.dispatch(Command::ToggleTheater));
        assert!(!controller.dispatch(Command::StepRate(RateStep::Up)));
        assert!(!controller.dispatch(Command::SeekToFraction(Tenth::new(3).unwrap())));
        assert!(!controller.theater());
        assert_eq!(controller.rate_index(), controller.ladder().default_index());
    }

    #[test]
    fn digits_noop_until_duration_known() {
        let mut controller = Controller::with_engine(SimulatedEngine::loading("clip.mp4", 200.0));
        press(&mut controller, '5');
        assert_abs_diff_eq!(time(&controller), 0.0);

        flush(&mut controller);
        press(&mut controller, '5');
        assert_abs_diff_eq!(time(&controller), 100.0);
    }

    #[test]
    fn engine_errors_do_not_change_state() {
        let engine = SimulatedEngine::with_duration("clip.mp4", 10.0).with_autoplay_blocked();
        let mut controller = Controller::with_engine(engine);
        press(&mut controller, 'k');
        flush(&mut controller);
        assert!(controller.paused());
    }

    #[test]
    fn new_source_keeps_rate_and_theater() {
        let mut controller = controller_at(100.0, 0.0);
        press(&mut controller, '>');
        press(&mut controller, '>');
        press(&mut controller, 't');
        let rate_index = controller.rate_index();

        let previous = controller.load_source(SimulatedEngine::with_duration("next.mp4", 30.0));
        assert!(previous.is_some());
        assert_eq!(controller.rate_index(), rate_index);
        assert!(controller.theater());
        assert_abs_diff_eq!(controller.clock().rate().unwrap(), 1.4);
        assert_eq!(controller.snapshot().source.as_deref(), Some("next.mp4"));
    }

    #[test]
    fn initial_rate_is_snapped() {
        let controller = controller_at(100.0, 0.0).with_initial_rate(1.65);
        assert_abs_diff_eq!(controller.rate(), 1.6);
        assert_abs_diff_eq!(controller.clock().rate().unwrap(), 1.6);
    }

    #[test]
    fn observers_receive_changes_only() {
        let mut controller = controller_at(100.0, 0.0);
        let rx = controller.subscribe();
        assert_eq!(rx.try_iter().count(), 1);

        press(&mut controller, 't');
        press(&mut controller, 'x');
        let updates: Vec<_> = rx.try_iter().collect();
        assert_eq!(updates.len(), 1);
        assert!(updates[0].theater);
    }

    #[test]
    fn listener_is_scoped_to_start_and_stop() {
        let bus = EventBus::new();
        let mut controller = controller_at(100.0, 50.0);

        assert!(!controller.is_listening());
        controller.start(&bus);
        assert!(controller.is_listening());
        assert_eq!(bus.listener_count(), 1);
        bus.publish(HostEvent::Key(KeyInput::new(Key::Char('j'))));
        assert_eq!(controller.pump(), 1);
        assert_abs_diff_eq!(time(&controller), 40.0);

        controller.stop();
        assert!(!controller.is_listening());
        assert_eq!(bus.listener_count(), 0);
        bus.publish(HostEvent::Key(KeyInput::new(Key::Char('j'))));
        assert_eq!(controller.pump(), 0);
        assert_abs_diff_eq!(time(&controller), 40.0);
    }

    #[test]
    fn dropping_controller_releases_listener() {
        let bus = EventBus::new();
        {
            let mut controller = controller_at(100.0, 0.0);
            controller.start(&bus);
            assert_eq!(bus.listener_count(), 1);
        }
        assert_eq!(bus.listener_count(), 0);
    }
}
