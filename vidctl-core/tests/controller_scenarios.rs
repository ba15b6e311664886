use std::time::Duration;

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use vidctl_core::{
    Command, Controller, EngineEvent, EventBus, Focus, HostEvent, Key, KeyInput, Modifiers,
    PlaybackEngine, RateStep, SimulatedEngine, VisualMode,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Host loop stand-in: forwards engine notifications onto the bus and lets
/// the controller drain it.
struct Host {
    bus: EventBus<HostEvent>,
    controller: Controller<SimulatedEngine>,
}

impl Host {
    fn new(engine: SimulatedEngine) -> Self {
        let bus = EventBus::new();
        let mut controller = Controller::with_engine(engine);
        controller.start(&bus);
        Self { bus, controller }
    }

    fn key(&mut self, token: &str) {
        let input = KeyInput::parse(token).expect("valid key token");
        self.bus.publish(HostEvent::Key(input));
        self.controller.pump();
    }

    fn tick(&mut self, elapsed: Duration) {
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

    fn time(&self) -> f64 {
        self.controller.snapshot().current_time
    }
}

#[test]
fn keyboard_seek_scenario_through_the_bus() {
    init_logger();
    let mut engine = SimulatedEngine::with_duration("movie.mp4", 100.0);
    engine.set_current_time(50.0);
    let mut host = Host::new(engine);

    host.key("j");
    assert_abs_diff_eq!(host.time(), 40.0);
    host.key("l");
    host.key("l");
    assert_abs_diff_eq!(host.time(), 60.0);
    host.key("3");
    assert_abs_diff_eq!(host.time(), 30.0);
}

#[test]
fn playback_advances_at_ladder_rate() {
    init_logger();
    let mut host = Host::new(SimulatedEngine::loading("movie.mp4", 60.0));
    host.tick(Duration::ZERO);

    host.key("space");
    host.tick(Duration::ZERO);
    assert!(!host.controller.paused());

    host.key(">");
    host.key(">");
    host.key(">");
    host.key(">");
    host.key(">");
    assert_abs_diff_eq!(host.controller.rate(), 2.0);

    host.tick(Duration::from_secs(5));
    assert_abs_diff_eq!(host.time(), 10.0, epsilon = 1e-9);
}

#[test]
fn reaching_the_end_pauses_the_read_model() {
    init_logger();
    let mut host = Host::new(SimulatedEngine::with_duration("short.mp4", 3.0));
    host.key("k");
    host.tick(Duration::ZERO);
    assert!(!host.controller.paused());

    host.tick(Duration::from_secs(5));
    assert!(host.controller.paused());
    assert_abs_diff_eq!(host.time(), 3.0);
}

#[test]
fn text_field_focus_suspends_every_shortcut() {
    init_logger();
    let mut engine = SimulatedEngine::with_duration("movie.mp4", 100.0);
    engine.set_current_time(50.0);
    let mut host = Host::new(engine);
    host.key(">");
    let before = host.controller.snapshot();

    for key in [Key::Char('5'), Key::Char('k'), Key::Char('t'), Key::Left] {
        host.bus
            .publish(HostEvent::Key(KeyInput::new(key).with_focus(Focus::TextEntry)));
    }
    host.controller.pump();
    host.tick(Duration::ZERO);

    assert_eq!(host.controller.snapshot(), before);
}

#[test]
fn ctrl_digit_does_not_seek() {
    let mut engine = SimulatedEngine::with_duration("movie.mp4", 100.0);
    engine.set_current_time(50.0);
    let mut controller = Controller::with_engine(engine);

    let ctrl = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    controller.handle_input(&KeyInput::new(Key::Char('2')).with_modifiers(ctrl));
    assert_abs_diff_eq!(controller.snapshot().current_time, 50.0);
}

#[test]
fn fullscreen_and_theater_layering() {
    init_logger();
    let engine = SimulatedEngine::with_duration("movie.mp4", 100.0);
    let mut host = Host::new(engine);

    host.key("t");
    assert_eq!(host.controller.snapshot().visual_mode(), VisualMode::Theater);

    host.key("f");
    assert_eq!(host.controller.snapshot().visual_mode(), VisualMode::Theater);
    host.tick(Duration::ZERO);
    assert_eq!(host.controller.snapshot().visual_mode(), VisualMode::Fullscreen);

    host.key("f");
    host.tick(Duration::ZERO);
    assert_eq!(host.controller.snapshot().visual_mode(), VisualMode::Theater);
}

#[test]
fn swapping_sources_keeps_player_preferences() {
    init_logger();
    let mut host = Host::new(SimulatedEngine::with_duration("first.mp4", 100.0));
    host.key("<");
    host.key("t");

    host.controller
        .load_source(SimulatedEngine::loading("second.mp4", 20.0));
    host.tick(Duration::ZERO);

    let snapshot = host.controller.snapshot();
    assert!(snapshot.theater);
    assert_abs_diff_eq!(snapshot.rate, 0.8);
    assert_eq!(snapshot.duration, Some(20.0));
    assert_eq!(snapshot.source.as_deref(), Some("second.mp4"));
}

#[test]
fn unloaded_controller_ignores_input() {
    let mut host = Host::new(SimulatedEngine::with_duration("movie.mp4", 100.0));
    let engine = host.controller.unload();
    assert!(engine.is_some());

    host.key("t");
    host.key(">");
    assert!(!host.controller.theater());
    assert!(!host.controller.dispatch(Command::TogglePlay));
}

#[test]
fn engine_error_notifications_are_only_observed() {
    init_logger();
    let mut host = Host::new(SimulatedEngine::failed("missing.mp4"));
    host.tick(Duration::ZERO);
    host.key("space");
    host.tick(Duration::ZERO);

    let snapshot = host.controller.snapshot();
    assert!(snapshot.paused);
    assert_eq!(snapshot.duration, None);

    // Sync accepts arbitrary errors without touching state
    let before = host.controller.snapshot();
    host.controller.sync(&EngineEvent::Error(
        vidctl_core::EngineError::PlayRejected("test".into()),
    ));
    assert_eq!(host.controller.snapshot(), before);
}

proptest! {
    #[test]
    fn prop_rate_stays_on_ladder(steps in prop::collection::vec(any::<bool>(), 0..60)) {
        let mut controller = Controller::with_engine(SimulatedEngine::with_duration("p.mp4", 10.0));
        let ladder = *controller.ladder();

        for up in steps {
            let step = if up { RateStep::Up } else { RateStep::Down };
            controller.dispatch(Command::StepRate(step));

            prop_assert!(controller.rate_index() < ladder.len());
            let rate = controller.clock().rate().unwrap();
            prop_assert!(ladder.index_of(rate).is_some());
            prop_assert_eq!(ladder.rate_at(controller.rate_index()), rate);
        }
    }

    #[test]
    fn prop_keyboard_seeks_stay_in_bounds(
        duration in 1.0f64..7_200.0,
        keys in prop::collection::vec(
            prop::sample::select(vec!["j", "l", "left", "right", "0", "9", "5"]),
            1..40,
        ),
    ) {
        let mut controller = Controller::with_engine(SimulatedEngine::with_duration("p.mp4", duration));
        for token in keys {
            controller.handle_input(&KeyInput::parse(token).unwrap());
            let t = controller.snapshot().current_time;
            prop_assert!(t >= 0.0 && t <= duration);
        }
    }
}
