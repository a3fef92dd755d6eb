//! Keyboard-driven parts of the panel: the dashboard and the viewer popup.

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

/// A part of the panel that reacts to keys and actions and draws itself.
///
/// The app offers a key to the viewer first while it is open, then to the
/// global bindings, then to the dashboard. Every action that the app loop
/// does not handle itself is offered to both through `update`.
pub trait Component {
    /// A key press, mapped to an action for the app loop.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action>;

    /// Apply an action. Actions meant for someone else are ignored.
    fn update(&mut self, action: &Action);

    fn render(&self, frame: &mut Frame, area: Rect);

    /// True while this part owns the keyboard: an open text field or popup.
    fn captures_input(&self) -> bool {
        false
    }
}
