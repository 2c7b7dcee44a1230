//! Component trait, the building block for every screen.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

/// Every screen implements Component.
///
/// Lifecycle: (`handle_key_event` | `update` | `render`)*
pub trait Component: Send {
    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Process a dispatched action. May return a follow-up action.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Render into the provided frame area.
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Set focus state.
    fn set_focused(&mut self, _focused: bool) {}

    /// Whether the component is collecting text or modal input, in which
    /// case the app forwards every key except Ctrl+C to it.
    fn captures_input(&self) -> bool {
        false
    }
}
