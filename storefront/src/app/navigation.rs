//! # Navigation
//!
//! Back stack with an authentication and role guard.

use crate::app::state::{Access, RoleConfig, Screen};
use crate::services::session::Session;

#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Screen::Splash],
        }
    }

    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::Splash)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Where a request for `target` actually lands: signed-out users go to
    /// login, users of the wrong role go to their own home.
    pub fn resolve(target: Screen, session: Option<&Session>) -> Screen {
        match (target.access(), session) {
            (Access::Public, _) => target,
            (_, None) => {
                tracing::info!(
                    screen = target.route_name(),
                    "Access denied without session, redirecting to login"
                );
                Screen::Login
            }
            (Access::Role(required), Some(session)) if required != session.role => {
                let home = RoleConfig::for_role(session.role).home;
                tracing::info!(
                    screen = target.route_name(),
                    role = %session.role,
                    "Screen belongs to another role, redirecting home"
                );
                home
            }
            _ => target,
        }
    }

    /// Push `target` (after the guard). Navigating to the current screen is a no-op.
    pub fn navigate(&mut self, target: Screen, session: Option<&Session>) -> Screen {
        let resolved = Self::resolve(target, session);
        if resolved != self.current() {
            self.stack.push(resolved);
        }
        resolved
    }

    /// Replace the back stack with `target` (after the guard).
    pub fn reset(&mut self, target: Screen, session: Option<&Session>) -> Screen {
        let resolved = Self::resolve(target, session);
        self.stack.clear();
        self.stack.push(resolved);
        resolved
    }

    /// Pop one screen. Returns the new current screen, `None` at the root.
    pub fn back(&mut self) -> Option<Screen> {
        if self.stack.len() <= 1 {
            return None;
        }
        self.stack.pop();
        Some(self.current())
    }
}
