use anyhow::Result;
use ratatui::{
    Frame,
    crossterm::event::KeyEvent,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
};
use tui_logger::TuiLoggerWidget;

use crate::{
    player::Player,
    router::{RouteAction, RouteHandler},
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct LogRoute;

impl RouteHandler for LogRoute {
    fn render(&self, frame: &mut Frame, area: Rect, _state: &AppState) {
        let log_widget = TuiLoggerWidget::default()
            .block(
                Block::default()
                    .title(" 📋 Log ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(log_widget, area);
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
        "Log"
    }
}
