use std::path::Path;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

use crate::state::SeekTarget;
use vidctl_core::{
    Command, Controller, ControllerSnapshot, EventBus, HostEvent, KeyInput, SimulatedEngine,
};

/// One player instance: the controller, its engine, and the bus feeding it.
///
/// The host loop pushes key events with [`Player::send_key`] and drives the
/// engine with [`Player::tick`]; both end with the controller draining the bus.
pub struct Player {
    bus: EventBus<HostEvent>,
    controller: Controller<SimulatedEngine>,
    snapshots: Receiver<ControllerSnapshot>,
    source_duration: f64,
    last_tick: Instant,
}

impl Player {
    pub fn new(source_duration: f64, initial_rate: f64) -> Self {
        let bus = EventBus::new();
        let mut controller = Controller::new().with_initial_rate(initial_rate);
        controller.start(&bus);
        let snapshots = controller.subscribe();

        Self {
            bus,
            controller,
            snapshots,
            source_duration,
            last_tick: Instant::now(),
        }
    }

    /// Open `path` as the new source and start playing it.
    ///
    /// Rate and theater mode carry over from the previous source.
    pub fn open(&mut self, path: &Path) {
        let name = path.to_string_lossy();
        let engine = if path.exists() {
            SimulatedEngine::loading(&name, self.source_duration)
        } else {
            log::warn!("{} does not exist", name);
            SimulatedEngine::failed(&name)
        };

        self.controller.load_source(engine);
        self.controller.dispatch(Command::TogglePlay);
    }

    /// Pick a speed directly; the value snaps to the nearest ladder rung
    pub fn set_rate(&mut self, rate: f64) {
        self.controller.dispatch(Command::SetRate(rate));
    }

    /// Jump to an absolute position; ignored until the duration is known
    pub fn seek(&mut self, target: SeekTarget) {
        let command = match target {
            SeekTarget::Seconds(seconds) => Command::SeekTo(seconds),
            SeekTarget::Progress(ratio) => Command::SeekToProgress(ratio),
        };
        self.controller.dispatch(command);
    }

    pub fn send_key(&mut self, input: KeyInput) {
        self.bus.publish(HostEvent::Key(input));
        self.controller.pump();
    }

    /// Advance the engine by the wall time since the previous tick and fold
    /// its notifications into the controller
    pub fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.advance(elapsed);
    }

    /// Advance the engine by a fixed amount of playback wall time
    pub fn advance(&mut self, elapsed: Duration) {
        let events = self
            .controller
            .clock_mut()
            .engine_mut()
            .map(|engine| engine.tick(elapsed))
            .unwrap_or_default();

        for event in events {
            self.bus.publish(HostEvent::Engine(event));
        }
        self.controller.pump();
    }

    /// Snapshots published since the last call
    pub fn updates(&self) -> impl Iterator<Item = ControllerSnapshot> + '_ {
        self.snapshots.try_iter()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.controller.snapshot()
    }

    /// Release the bus registration; the controller stops reacting to input
    pub fn shutdown(&mut self) {
        self.controller.stop();
        self.controller.unload();
    }
}
