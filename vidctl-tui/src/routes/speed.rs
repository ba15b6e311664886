use anyhow::Result;
use ratatui::{
    Frame,
    crossterm::event::{KeyCode, KeyEvent},
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};
use vidctl_core::{Focus, RateLadder};

use crate::{
    player::Player,
    router::{RouteAction, RouteHandler},
    state::AppState,
};

/// Speed picker over the rate ladder.
///
/// The list owns keyboard focus, so player shortcuts are ignored while it is open.
#[derive(Debug, Clone)]
pub struct SpeedRoute {
    ladder: RateLadder,
    selected: usize,
}

impl Default for SpeedRoute {
    fn default() -> Self {
        let ladder = RateLadder::standard();
        Self {
            selected: ladder.default_index(),
            ladder,
        }
    }
}

impl SpeedRoute {
    pub fn selected(&self) -> usize {
        self.selected
    }
}

impl RouteHandler for SpeedRoute {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let height = self.ladder.len() as u16 + 2;
        let [_, column, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(20),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, list_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .areas(column);

        let items: Vec<ListItem> = self
            .ladder
            .rates()
            .iter()
            .enumerate()
            .map(|(i, rate)| {
                let marker = if i == state.player.rate_index { "●" } else { " " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Green)),
                    Span::raw(format!(" {}x", rate)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" ⏩ Speed ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));

        frame.render_widget(Clear, list_area);
        frame.render_stateful_widget(list, list_area, &mut list_state);
    }

    fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &mut AppState,
        player: &mut Player,
    ) -> Result<RouteAction> {
        match key.code {
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => self.selected = (self.selected + 1).min(self.ladder.top()),
            KeyCode::Enter => {
                player.set_rate(self.ladder.rate_at(self.selected));
                return Ok(RouteAction::Pop);
            }
            _ => {}
        }
        Ok(RouteAction::None)
    }

    fn name(&self) -> &str {
        "Speed"
    }

    fn focus(&self) -> Focus {
        Focus::TextEntry
    }

    fn on_enter(&mut self, state: &mut AppState) -> Result<()> {
        self.selected = state.player.rate_index.min(self.ladder.top());
        Ok(())
    }

    fn help_items(&self) -> Vec<(&str, &str)> {
        vec![("↑/↓", "Select"), ("Enter", "Apply"), ("Esc", "Cancel")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;
    use std::path::Path;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn picker_starts_on_current_rate_and_applies_selection() {
        let mut player = Player::new(30.0, 1.4);
        player.open(Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml")));
        player.advance(Duration::ZERO);
        let mut state = AppState::new(player.snapshot());

        let mut route = SpeedRoute::default();
        route.on_enter(&mut state).unwrap();
        assert_eq!(route.selected(), state.player.rate_index);

        route
            .handle_input(key(KeyCode::Down), &mut state, &mut player)
            .unwrap();
        let action = route
            .handle_input(key(KeyCode::Enter), &mut state, &mut player)
            .unwrap();

        assert!(matches!(action, RouteAction::Pop));
        assert_eq!(player.snapshot().rate, 1.6);
    }

    #[test]
    fn selection_stays_on_the_ladder() {
        let mut player = Player::new(30.0, 1.0);
        let mut state = AppState::new(player.snapshot());
        let mut route = SpeedRoute::default();

        for _ in 0..30 {
            route
                .handle_input(key(KeyCode::Down), &mut state, &mut player)
                .unwrap();
        }
        assert_eq!(route.selected(), RateLadder::standard().top());

        for _ in 0..30 {
            route
                .handle_input(key(KeyCode::Up), &mut state, &mut player)
                .unwrap();
        }
        assert_eq!(route.selected(), 0);
    }
}
