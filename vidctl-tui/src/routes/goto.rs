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
    state::{AppState, SeekTarget},
};

/// Prompt for an absolute position (`1:30`, `90`, `45%`)
#[derive(Debug, Clone)]
pub struct GotoRoute;

impl RouteHandler for GotoRoute {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let [_, row, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(area);

        let title = match state.player.duration {
            Some(_) => format!(" ⏱ Go to (now {}) ", state.position_label()),
            None => " ⏱ Go to (duration unknown) ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        let line = Line::from(vec![
            Span::raw(state.seek_input.buffer.as_str()),
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
            KeyCode::Char(c) => state.seek_input.push(c),
            KeyCode::Backspace => state.seek_input.backspace(),
            KeyCode::Enter => {
                let typed = state.seek_input.take().unwrap_or_default();
                match SeekTarget::parse(&typed) {
                    Some(target) => player.seek(target),
                    None => log::warn!("Not a position: {:?}", typed),
                }
                return Ok(RouteAction::Pop);
            }
            _ => {}
        }
        Ok(RouteAction::None)
    }

    fn name(&self) -> &str {
        "Go To"
    }

    fn focus(&self) -> Focus {
        Focus::TextEntry
    }

    fn on_exit(&mut self, state: &mut AppState) -> Result<()> {
        state.seek_input.buffer.clear();
        Ok(())
    }

    fn help_items(&self) -> Vec<(&str, &str)> {
        vec![("Enter", "Seek"), ("Esc", "Cancel")]
    }
}
