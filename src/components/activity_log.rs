use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::shell::ShellState;
use crate::theme::THEME;

/// Newest-first list of submitted transactions and observed `LeadSet` events.
pub struct ActivityLog;

impl ActivityLog {
    pub fn render(frame: &mut Frame, area: Rect, state: &ShellState) {
        let block = Block::default()
            .title(format!(" Activity ({}) ", state.activity.len()))
            .borders(Borders::ALL)
            .border_style(THEME.border_style());

        if state.activity.is_empty() {
            let empty = Paragraph::new(Span::styled(
                "  No activity yet",
                THEME.muted_style(),
            ))
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = state
            .activity
            .iter()
            .rev()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!(" {} ", entry.at.format("%H:%M:%S")),
                        THEME.muted_style(),
                    ),
                    Span::styled(entry.text.as_str(), THEME.hash_style()),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}
