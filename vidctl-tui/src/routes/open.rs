use std::path::PathBuf;

use anyhow::Result;
use ratatui::{
    Frame,
    crossterm::event::{KeyCode, KeyEvent},
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use vidctl_core::Focus;

use crate::{
    player::Player,
    router::{RouteAction, RouteHandler},
    state::AppState,
};

/// Path prompt for opening a new source.
///
/// While this route is on top keyboard focus is in a text field, so the
/// controller ignores every key.
#[derive(Debug, Clone)]
pub struct OpenRoute;

impl RouteHandler for OpenRoute {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let [_, row, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(area);

        let block = Block::default()
            .title(" 📂 Open video (Enter to load, Esc to cancel) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        let line = Line::from(vec![
            Span::raw(state.path_input.buffer.as_str()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]);

        frame.render_widget(Clear, row);
        frame.render_widget(Paragraph::new(line).block(block), row);
    }

    fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &mut AppState,
        player: &mut Player,
    ) -> Result<RouteAction> {
        match key.code {
            KeyCode::Char(c) => state.path_input.push(c),
            KeyCode::Backspace => state.path_input.backspace(),
            KeyCode::Enter => {
                if let Some(path) = state.path_input.take() {
                    player.open(&PathBuf::from(path));
                }
                return Ok(RouteAction::Pop);
            }
            _ => {}
        }
        Ok(RouteAction::None)
    }

    fn name(&self) -> &str {
        "Open"
    }

    fn focus(&self) -> Focus {
        Focus::TextEntry
    }

    fn on_exit(&mut self, state: &mut AppState) -> Result<()> {
        state.path_input.buffer.clear();
        Ok(())
    }

    fn help_items(&self) -> Vec<(&str, &str)> {
        vec![("Enter", "Open"), ("Esc", "Cancel")]
    }
}
