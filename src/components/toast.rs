use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::shell::ShellState;
use crate::theme::THEME;

const TOAST_WIDTH: u16 = 36;
const TOAST_HEIGHT: u16 = 3;

/// Bottom-left popup for the current toast, if any.
pub struct ToastView;

impl ToastView {
    pub fn area(area: Rect) -> Rect {
        let width = TOAST_WIDTH.min(area.width);
        let height = TOAST_HEIGHT.min(area.height);
        Rect::new(
            area.x,
            area.y + area.height.saturating_sub(height),
            width,
            height,
        )
    }

    pub fn render(frame: &mut Frame, area: Rect, state: &ShellState) {
        let Some(toast) = &state.toast else {
            return;
        };

        let popup_area = Self::area(area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(THEME.success_style())
            .style(Style::default().bg(THEME.surface));

        let line = Line::from(vec![
            Span::styled(" \u{2713} ", THEME.success_style().add_modifier(Modifier::BOLD)),
            Span::styled(toast.message.as_str(), Style::default().fg(THEME.text)),
        ]);

        frame.render_widget(Paragraph::new(line).block(block), popup_area);
    }
}
