use anyhow::Result;
use ratatui::{Frame, crossterm::event::KeyEvent, layout::Rect};
use strum::{EnumIter, EnumString, IntoEnumIterator};
use vidctl_core::Focus;

use crate::{
    player::Player,
    routes::{help::HelpRoute, log::LogRoute, player::PlayerRoute},
    state::AppState,
};

/// Trait that all routes must implement
/// This enables dynamic dispatch and polymorphic behavior
pub trait RouteHandler: std::fmt::Debug {
    /// Render this route's UI
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState);

    /// Handle keyboard input for this route, after the controller has seen it
    fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &mut AppState,
        player: &mut Player,
    ) -> Result<RouteAction>;

    /// Get the display name for breadcrumbs/navigation
    fn name(&self) -> &str;

    /// Where keyboard focus sits while this route is on top
    fn focus(&self) -> Focus {
        Focus::Player
    }

    /// Optional: Called when entering this route
    fn on_enter(&mut self, _state: &mut AppState) -> Result<()> {
        Ok(())
    }

    /// Optional: Called when leaving this route
    fn on_exit(&mut self, _state: &mut AppState) -> Result<()> {
        Ok(())
    }

    fn help_items(&self) -> Vec<(&str, &str)> {
        vec![("Tab", "Switch Tab"), ("Q", "Quit")]
    }
}

/// Actions that can be returned from route handlers
#[derive(Debug)]
pub enum RouteAction {
    /// Do nothing, stay on current route
    None,
    /// Go back to previous route
    Pop,
    /// Navigate to a new route
    Push(Box<dyn RouteHandler>),
    /// Quit the application
    Quit,
}

/// Router manages the navigation stack
pub struct Router {
    /// Stack of route handlers, last element is current route
    stack: Vec<Box<dyn RouteHandler>>,
}

impl Router {
    pub fn new(initial_route: Box<dyn RouteHandler>) -> Self {
        Self {
            stack: vec![initial_route],
        }
    }

    /// Get current route (top of stack)
    pub fn current(&self) -> &dyn RouteHandler {
        self.stack
            .last()
            .expect("Stack should never be empty")
            .as_ref()
    }

    /// Get mutable reference to current route
    pub fn current_mut(&mut self) -> &mut Box<dyn RouteHandler> {
        self.stack.last_mut().expect("Stack should never be empty")
    }

    /// Execute a route action, returning whether the app should quit
    pub fn execute_action(&mut self, action: RouteAction, state: &mut AppState) -> Result<bool> {
        match action {
            RouteAction::None => Ok(false),
            RouteAction::Pop => {
                self.pop(state)?;
                Ok(false)
            }
            RouteAction::Push(route) => {
                self.push(route, state)?;
                Ok(false)
            }
            RouteAction::Quit => Ok(true),
        }
    }

    /// Navigate to a new route (push onto stack)
    pub fn push(&mut self, mut route: Box<dyn RouteHandler>, state: &mut AppState) -> Result<()> {
        route.on_enter(state)?;
        self.stack.push(route);
        Ok(())
    }

    /// Go back (pop from stack)
    pub fn pop(&mut self, state: &mut AppState) -> Result<Option<Box<dyn RouteHandler>>> {
        // Keep at least one route in the stack
        if self.stack.len() > 1 {
            if let Some(mut route) = self.stack.pop() {
                route.on_exit(state)?;
                return Ok(Some(route));
            }
        }
        Ok(None)
    }

    /// Replace current route (useful for tab switching)
    pub fn replace(&mut self, mut new_route: Box<dyn RouteHandler>, state: &mut AppState) -> Result<()> {
        if let Some(mut old_route) = self.stack.pop() {
            old_route.on_exit(state)?;
        }
        new_route.on_enter(state)?;
        self.stack.push(new_route);
        Ok(())
    }

    /// Get the depth of navigation
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Main tabs, in sidebar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, strum::Display)]
pub enum Tab {
    Player,
    Help,
    Log,
}

impl Tab {
    /// Route handler backing this tab
    pub fn route(self) -> Box<dyn RouteHandler> {
        match self {
            Tab::Player => Box::new(PlayerRoute),
            Tab::Help => Box::new(HelpRoute),
            Tab::Log => Box::new(LogRoute),
        }
    }

    /// Tab owning the route called `name`, if it is a main tab
    pub fn for_route(name: &str) -> Option<Tab> {
        name.parse().ok()
    }

    /// Next tab, wrapping around
    pub fn next(self) -> Tab {
        let tabs: Vec<Tab> = Tab::iter().collect();
        let idx = tabs.iter().position(|t| *t == self).unwrap_or(0);
        tabs[(idx + 1) % tabs.len()]
    }
}
