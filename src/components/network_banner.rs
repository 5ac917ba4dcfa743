use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::shell::ShellState;
use crate::theme::THEME;

/// Passive alert shown while the chain-error flag is set.
pub struct NetworkBanner {
    pub network_display_name: String,
}

impl NetworkBanner {
    pub fn new(network_display_name: String) -> Self {
        Self {
            network_display_name,
        }
    }

    /// Rows the banner needs; zero hides it.
    pub fn height(&self, state: &ShellState) -> u16 {
        if state.chain_error.is_some() { 3 } else { 0 }
    }

    pub fn description(&self) -> String {
        format!("Please change to {}", self.network_display_name)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &ShellState) {
        if state.chain_error.is_none() || area.height == 0 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(THEME.error_style())
            .style(Style::default().bg(THEME.surface));

        let line = Line::from(vec![
            Span::styled(
                " ! Wrong Network! ",
                Style::default()
                    .fg(THEME.error)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(self.description(), Style::default().fg(THEME.warning)),
        ]);

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
