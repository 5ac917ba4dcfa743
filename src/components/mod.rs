pub mod activity_log;
pub mod header;
pub mod help;
pub mod lead_panel;
pub mod network_banner;
pub mod status_bar;
pub mod toast;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::events::AppEvent;
use crate::shell::ShellState;

/// Trait for interactive UI components
pub trait Component {
    /// Handle a key event, optionally returning an AppEvent
    fn handle_key(&mut self, key: KeyEvent, state: &ShellState) -> Option<AppEvent>;

    /// Render the component into the given area
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &ShellState);
}
