use anyhow::Result;
use ratatui::{
    Frame,
    crossterm::event::KeyEvent,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use vidctl_core::input::SHORTCUTS;

use crate::{
    player::Player,
    router::{RouteAction, RouteHandler},
    state::AppState,
};

/// Keyboard shortcut reference
#[derive(Debug, Clone)]
pub struct HelpRoute;

impl RouteHandler for HelpRoute {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let key_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let mut lines: Vec<Line> = SHORTCUTS
            .iter()
            .map(|(keys, action)| {
                Line::from(vec![
                    Span::styled(format!("{:<12}", keys), key_style),
                    Span::raw(*action),
                ])
            })
            .collect();

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Current Speed: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}x", state.player.rate),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(" ⌨ Keyboard Shortcuts ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, area);
    }

    fn handle_input(
        &mut self,
        _key: KeyEvent,
        _state: &mut AppState,
        _player: &mut Player,
    ) -> Result<RouteAction> {
        Ok(RouteAction::None)
    }

    fn name(&self) -> &str {
        "Help"
    }
}
