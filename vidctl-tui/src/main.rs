use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};
use vidctl_core::{Focus, KeyInput};

mod keys;
mod player;
mod router;
mod routes;
mod state;
mod ui;

use player::Player;
use router::{RouteAction, Router, Tab};
use routes::player::PlayerRoute;
use state::AppState;

/// Keyboard-driven video player controller
#[derive(Debug, Parser)]
#[command(name = "vidctl", version, about)]
struct Cli {
    /// Video file to open on startup
    source: Option<PathBuf>,

    /// Length reported for opened sources, in seconds
    #[arg(long, default_value_t = 120.0)]
    duration: f64,

    /// Initial playback speed, snapped to the nearest ladder step
    #[arg(long, default_value_t = 1.0)]
    rate: f64,

    /// Run a whitespace-separated key script without a terminal and print the
    /// final state (e.g. "space j l l 3 >")
    #[arg(long, value_name = "KEYS")]
    headless: Option<String>,

    /// Log level filter
    #[arg(long, default_value = "debug")]
    log_level: log::LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(script) = cli.headless.as_deref() {
        env_logger::Builder::new()
            .filter_level(cli.log_level)
            .parse_default_env()
            .init();
        return run_headless(&cli, script);
    }

    // Initialize tui_logger for TUI log display
    tui_logger::init_logger(cli.log_level).context("Failed to init tui_logger")?;
    tui_logger::set_default_level(cli.log_level);

    log::info!("Starting vidctl");

    let mut player = Player::new(cli.duration, cli.rate);
    if let Some(source) = &cli.source {
        player.open(source);
    }

    let result = run_tui(&mut player);

    player.shutdown();
    result
}

fn run_headless(cli: &Cli, script: &str) -> anyhow::Result<()> {
    let mut player = Player::new(cli.duration, cli.rate);
    if let Some(source) = &cli.source {
        player.open(source);
        player.advance(Duration::ZERO);
    }

    for token in script.split_whitespace() {
        let input = KeyInput::parse(token)
            .with_context(|| format!("Unknown key in script: {:?}", token))?;
        player.send_key(input);
        player.advance(Duration::ZERO);
    }

    let snapshot = player.snapshot();
    println!("source:     {}", snapshot.source.as_deref().unwrap_or("-"));
    println!(
        "position:   {:.1}s / {}",
        snapshot.current_time,
        snapshot
            .duration
            .map(|d| format!("{:.1}s", d))
            .unwrap_or_else(|| "unknown".to_string())
    );
    println!("paused:     {}", snapshot.paused);
    println!("speed:      {}x", snapshot.rate);
    println!("theater:    {}", snapshot.theater);
    println!("fullscreen: {}", snapshot.fullscreen);

    player.shutdown();
    Ok(())
}

fn run_tui(player: &mut Player) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut state = AppState::new(player.snapshot());
    let mut router = Router::new(Box::new(PlayerRoute));

    let result = event_loop(&mut terminal, player, &mut state, &mut router);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut ratatui::Terminal<CrosstermBackend<io::Stdout>>,
    player: &mut Player,
    state: &mut AppState,
    router: &mut Router,
) -> anyhow::Result<()> {
    loop {
        // Advance the engine and collect controller updates
        player.tick();
        for snapshot in player.updates().collect::<Vec<_>>() {
            state.handle_snapshot(snapshot);
        }

        terminal.draw(|f| ui::draw(f, state, router))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(key, state, player, router)? {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Handle one key press. Returns whether the app should quit.
fn handle_key(
    key: KeyEvent,
    state: &mut AppState,
    player: &mut Player,
    router: &mut Router,
) -> anyhow::Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    let focus = router.current().focus();

    // App navigation keys only apply outside text fields
    if focus == Focus::Player {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Tab => {
                // Cycle through tabs
                let current = Tab::for_route(router.current().name()).unwrap_or(Tab::Player);
                router.replace(current.next().route(), state)?;
                return Ok(false);
            }
            _ => {}
        }
    }

    if key.code == KeyCode::Esc && router.depth() > 1 {
        router.execute_action(RouteAction::Pop, state)?;
        return Ok(false);
    }

    // The controller sees every key along with the focus context
    player.send_key(keys::to_key_input(&key, focus));

    // Delegate to the current route's input handler
    let action = router.current_mut().handle_input(key, state, player)?;
    router.execute_action(action, state)
}
