use anyhow::Result;
use ratatui::{
    Frame,
    crossterm::event::{KeyCode, KeyEvent},
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};
use vidctl_core::VisualMode;

use crate::{
    player::Player,
    router::{RouteAction, RouteHandler},
    routes::{goto::GotoRoute, open::OpenRoute, speed::SpeedRoute},
    state::AppState,
};

// ==================================================================
// Player Route Implementation
// ==================================================================

#[derive(Debug, Clone)]
pub struct PlayerRoute;

impl RouteHandler for PlayerRoute {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        draw_player_panel(frame, area, state);
    }

    fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &mut AppState,
        _player: &mut Player,
    ) -> Result<RouteAction> {
        // Playback shortcuts were already handled by the controller
        match key.code {
            KeyCode::Char('o') | KeyCode::Char('O') => Ok(RouteAction::Push(Box::new(OpenRoute))),
            KeyCode::Char('g') | KeyCode::Char('G') => Ok(RouteAction::Push(Box::new(GotoRoute))),
            KeyCode::Char('s') | KeyCode::Char('S') => {
                Ok(RouteAction::Push(Box::new(SpeedRoute::default())))
            }
            _ => Ok(RouteAction::None),
        }
    }

    fn name(&self) -> &str {
        "Player"
    }

    fn help_items(&self) -> Vec<(&str, &str)> {
        vec![
            ("Space", "Play/Pause"),
            ("J/L", "-10s/+10s"),
            ("←/→", "-5s/+5s"),
            ("</>", "Speed"),
            ("S", "Pick Speed"),
            ("G", "Go To"),
            ("T", "Theater"),
            ("F", "Fullscreen"),
            ("O", "Open"),
            ("Tab", "Switch Tab"),
            ("Q", "Quit"),
        ]
    }
}

/// Draw the player panel
pub fn draw_player_panel(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Video surface
            Constraint::Length(3), // Progress bar
            Constraint::Length(3), // Transport info
        ])
        .split(area);

    draw_video_surface(f, video_area(chunks[0], state.player.visual_mode()), state);
    draw_progress(f, chunks[1], state);
    draw_transport(f, chunks[2], state);
}

/// Area the video occupies for the given layout mode.
///
/// Fullscreen fills whatever area it is given; the caller hands it the whole
/// frame in that mode.
pub fn video_area(area: Rect, mode: VisualMode) -> Rect {
    let width_pct = match mode {
        VisualMode::Normal => 60,
        VisualMode::Theater => 90,
        VisualMode::Fullscreen => return area,
    };

    let [centered] = Layout::horizontal([Constraint::Percentage(width_pct)])
        .flex(Flex::Center)
        .areas(area);
    centered
}

/// Draw the box standing in for the rendered video
pub fn draw_video_surface(f: &mut Frame, area: Rect, state: &AppState) {
    let mode = state.player.visual_mode();
    let border_style = match mode {
        VisualMode::Fullscreen => Style::default().fg(Color::White),
        VisualMode::Theater => Style::default().fg(Color::Magenta),
        VisualMode::Normal => Style::default().fg(Color::Cyan),
    };

    let block = Block::default()
        .title(format!(" 🎬 {} ", mode))
        .borders(Borders::ALL)
        .border_style(border_style.add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = match &state.player.source {
        Some(source) => {
            let icon = if state.player.paused { "⏸" } else { "▶" };
            vec![
                Line::from(Span::styled(
                    source.as_str(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("{} {}", icon, state.position_label()),
                    Style::default().fg(Color::Gray),
                )),
            ]
        }
        None => vec![Line::from(Span::styled(
            "No video loaded",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    f.render_widget(Paragraph::new(text).centered(), inner);
}

/// Draw the progress bar
pub fn draw_progress(f: &mut Frame, area: Rect, state: &AppState) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .ratio(state.progress())
        .label(state.position_label());

    f.render_widget(gauge, area);
}

fn draw_transport(f: &mut Frame, area: Rect, state: &AppState) {
    let flag = |on: bool| if on { "on" } else { "off" };
    let line = Line::from(vec![
        Span::styled("Speed: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}x", state.player.rate),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("Theater: ", Style::default().fg(Color::Gray)),
        Span::raw(flag(state.player.theater)),
        Span::raw("   "),
        Span::styled("Fullscreen: ", Style::default().fg(Color::Gray)),
        Span::raw(flag(state.player.fullscreen)),
    ]);

    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
