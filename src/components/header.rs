use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::shell::ShellState;
use crate::theme::THEME;
use crate::utils;

pub struct Header {
    pub chain_id: u64,
    pub expected_chain_id: u64,
    pub network_name: String,
    pub native_symbol: String,
}

impl Header {
    pub fn new(
        chain_id: u64,
        expected_chain_id: u64,
        network_name: String,
        native_symbol: String,
    ) -> Self {
        Self {
            chain_id,
            expected_chain_id,
            network_name,
            native_symbol,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &ShellState) {
        let header_block = Block::default().style(THEME.header_style());
        frame.render_widget(header_block, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(12),
                Constraint::Min(0),
                Constraint::Length(36),
            ])
            .split(area);

        let title = Paragraph::new(Span::styled(
            " lead-tui",
            Style::default()
                .fg(THEME.text_accent)
                .add_modifier(Modifier::BOLD),
        ))
        .style(THEME.header_style());
        frame.render_widget(title, chunks[0]);

        let account = match state.account() {
            Some(addr) => Span::styled(utils::truncate_address(&addr), THEME.address_style()),
            None => Span::styled("not connected", THEME.muted_style()),
        };
        frame.render_widget(
            Paragraph::new(Line::from(account))
                .alignment(Alignment::Center)
                .style(THEME.header_style()),
            chunks[1],
        );

        let chain_style = if self.chain_id == self.expected_chain_id {
            Style::default().fg(THEME.text)
        } else {
            Style::default().fg(THEME.warning)
        };
        let network_info = Line::from(vec![
            Span::styled(self.network_name.as_str(), Style::default().fg(THEME.text)),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(format!("chain {:#x}", self.chain_id), chain_style),
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(format!("{} ", self.native_symbol), THEME.eth_style()),
        ]);
        let network_paragraph = Paragraph::new(network_info)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(network_paragraph, chunks[2]);
    }
}
