use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use strum::IntoEnumIterator;

use crate::{
    router::{Router, Tab},
    routes::player::draw_video_surface,
    state::AppState,
};

/// Draw the TUI interface
pub fn draw(f: &mut Frame, state: &AppState, router: &Router) {
    // Fullscreen hides the chrome; the video takes the whole terminal
    if state.player.fullscreen && router.current().name() == "Player" {
        draw_video_surface(f, f.area(), state);
        return;
    }

    // Main horizontal split: Sidebar (left) and Main Content (right)
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([
            Constraint::Length(15), // Sidebar navigation
            Constraint::Min(40),    // Main content area
        ])
        .split(f.area());

    draw_sidebar(f, main_chunks[0], router);
    draw_main_content(f, main_chunks[1], state, router);
}

/// Draw the sidebar navigation
fn draw_sidebar(f: &mut Frame, area: Rect, router: &Router) {
    let block = Block::default()
        .title(" Navigation ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    f.render_widget(block, area);

    // Sub-routes such as Open keep their parent tab highlighted
    let current = Tab::for_route(router.current().name()).unwrap_or(Tab::Player);
    let nav_text: Vec<Line> = Tab::iter()
        .map(|tab| {
            let is_active = current == tab;
            let prefix = if is_active { "▶ " } else { "  " };
            let style = if is_active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(format!("{}{}", prefix, tab), style))
        })
        .collect();

    f.render_widget(Paragraph::new(nav_text), inner);
}

/// Draw the main content area for the current route
fn draw_main_content(f: &mut Frame, area: Rect, state: &AppState, router: &Router) {
    // Split the main area into Content (top) and Footer (bottom)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Route content
            Constraint::Length(3), // Controls info
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    router.current().render(f, chunks[0], state);
    draw_controls(f, chunks[1], router);
    draw_status(f, chunks[2], state);
}

/// Draw the key hints for the current route
fn draw_controls(f: &mut Frame, area: Rect, router: &Router) {
    let controls: Vec<Span> = router
        .current()
        .help_items()
        .into_iter()
        .flat_map(|(key, action)| {
            let key_color = match key {
                "Tab" => Color::Magenta,
                "Q" => Color::Red,
                _ => Color::Yellow,
            };
            [
                Span::styled(format!("[{}]", key), Style::default().fg(key_color)),
                Span::raw(format!(" {}  ", action)),
            ]
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(controls))
        .block(Block::default().borders(Borders::ALL).title(" Controls "));

    f.render_widget(paragraph, area);
}

/// Draw the status bar
fn draw_status(f: &mut Frame, area: Rect, state: &AppState) {
    let status_style = if state.player.source.is_none() {
        Style::default().fg(Color::DarkGray)
    } else if state.player.paused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Green)
    };

    let status_text = format!(
        "{}  |  {}  |  {}x  |  {}",
        state.status_message,
        state.position_label(),
        state.player.rate,
        state.player.visual_mode()
    );

    let paragraph = Paragraph::new(status_text)
        .style(status_style)
        .block(Block::default().borders(Borders::ALL).title(" Status "));

    f.render_widget(paragraph, area);
}
