use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::shell::{Phase, ShellState};
use crate::theme::THEME;

pub struct StatusBar {
    pub editing: bool,
}

impl StatusBar {
    pub fn new() -> Self {
        Self { editing: false }
    }

    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        if self.editing {
            vec![
                ("Enter", ":Set Lead  "),
                ("Esc", ":Done  "),
                ("Ctrl+U", ":Clear"),
            ]
        } else {
            vec![
                ("c", ":Connect  "),
                ("g", ":GetLead  "),
                ("i", ":Edit  "),
                ("s", ":Set Lead  "),
                ("?", ":Help  "),
                ("q", ":Quit"),
            ]
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &ShellState) {
        let bg = Block::default().style(THEME.header_style());
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(20)])
            .split(area);

        let mut left = vec![Span::raw(" ")];
        for (key, label) in self.hints() {
            left.push(Span::styled(key, Style::default().fg(THEME.text_accent)));
            left.push(Span::styled(label, Style::default().fg(THEME.text_muted)));
        }
        frame.render_widget(
            Paragraph::new(Line::from(left)).style(THEME.header_style()),
            chunks[0],
        );

        let (dot_color, status_text) = match state.phase {
            Phase::Connected(_) => (THEME.success, "Connected"),
            Phase::Connecting => (THEME.warning, "Connecting"),
            Phase::Disconnected => (THEME.error, "Disconnected"),
        };
        let right = Line::from(vec![
            Span::styled("\u{25cf} ", Style::default().fg(dot_color)),
            Span::styled(format!("{status_text} "), Style::default().fg(dot_color)),
        ]);
        frame.render_widget(
            Paragraph::new(right)
                .alignment(Alignment::Right)
                .style(THEME.header_style()),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_follow_edit_mode() {
        let mut bar = StatusBar::new();
        assert!(bar.hints().iter().any(|(k, _)| *k == "c"));
        bar.editing = true;
        assert!(bar.hints().iter().all(|(k, _)| *k != "c"));
        assert!(bar.hints().iter().any(|(k, _)| *k == "Enter"));
    }
}
