use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::events::AppEvent;
use crate::shell::{Phase, ShellState};
use crate::theme::THEME;

/// The single page: account, balance, connect button, lead value and the
/// new-lead input.
pub struct LeadPanel {
    pub editing: bool,
    input: String,
    cursor_position: usize,
}

impl LeadPanel {
    pub fn new() -> Self {
        Self {
            editing: false,
            input: String::new(),
            cursor_position: 0,
        }
    }

    pub fn start_editing(&mut self, state: &ShellState) {
        self.editing = true;
        self.input = state.pending_input.clone();
        self.cursor_position = self.input.chars().count();
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn changed(&self) -> Option<AppEvent> {
        Some(AppEvent::InputChanged(self.input.clone()))
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Enter => {
                self.editing = false;
                Some(AppEvent::SetLeadRequested)
            }
            KeyCode::Esc | KeyCode::Tab => {
                self.editing = false;
                None
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    self.cursor_position -= 1;
                    let idx = self.byte_index();
                    self.input.remove(idx);
                    return self.changed();
                }
                None
            }
            KeyCode::Delete => {
                if self.cursor_position < self.input.chars().count() {
                    let idx = self.byte_index();
                    self.input.remove(idx);
                    return self.changed();
                }
                None
            }
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                if self.cursor_position < self.input.chars().count() {
                    self.cursor_position += 1;
                }
                None
            }
            KeyCode::Home => {
                self.cursor_position = 0;
                None
            }
            KeyCode::End => {
                self.cursor_position = self.input.chars().count();
                None
            }
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'u' {
                    self.input.clear();
                    self.cursor_position = 0;
                } else {
                    let idx = self.byte_index();
                    self.input.insert(idx, c);
                    self.cursor_position += 1;
                }
                self.changed()
            }
            _ => None,
        }
    }

    fn button<'a>(key: &'a str, label: &'a str, enabled: bool) -> Vec<Span<'a>> {
        let style = if enabled {
            THEME.selected_style()
        } else {
            THEME.muted_style()
        };
        vec![
            Span::styled(format!(" [{key}] "), THEME.accent_style()),
            Span::styled(format!(" {label} "), style),
        ]
    }
}

impl Component for LeadPanel {
    fn handle_key(&mut self, key: KeyEvent, state: &ShellState) -> Option<AppEvent> {
        if self.editing {
            return self.handle_edit_key(key);
        }

        match key.code {
            KeyCode::Char('c') if state.can_connect() => Some(AppEvent::ConnectRequested),
            KeyCode::Char('g') => Some(AppEvent::GetLeadRequested),
            KeyCode::Char('s') => Some(AppEvent::SetLeadRequested),
            KeyCode::Char('i') | KeyCode::Tab => {
                self.start_editing(state);
                None
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &ShellState) {
        let outer_block = Block::default()
            .title(" Lead app ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style());
        let inner = outer_block.inner(area);
        frame.render_widget(outer_block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // account
                Constraint::Length(2), // balance
                Constraint::Length(2), // connect
                Constraint::Length(2), // get lead
                Constraint::Length(3), // input + set lead
                Constraint::Min(0),
            ])
            .split(inner);

        let account = match &state.phase {
            Phase::Connected(addr) => Span::styled(format!("{addr}"), THEME.address_style()),
            Phase::Connecting => Span::styled("waiting for wallet...", THEME.muted_style()),
            Phase::Disconnected => Span::styled("-", THEME.muted_style()),
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("  Account:  ", THEME.muted_style()),
                account,
            ])),
            chunks[0],
        );

        let balance = if state.balance.is_empty() {
            Span::styled("-", THEME.muted_style())
        } else {
            Span::styled(state.balance.clone(), THEME.eth_style())
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("  Balance:  ", THEME.muted_style()),
                balance,
            ])),
            chunks[1],
        );

        let connect_label = if state.can_connect() {
            "Connect Wallet"
        } else {
            "Connected"
        };
        let mut connect = vec![Span::raw(" ")];
        connect.extend(Self::button("c", connect_label, state.can_connect()));
        frame.render_widget(Paragraph::new(Line::from(connect)), chunks[2]);

        let mut get_lead = vec![Span::raw(" ")];
        get_lead.extend(Self::button("g", "GetLead", true));
        get_lead.push(Span::raw("   "));
        get_lead.push(Span::styled(
            state.lead.clone(),
            Style::default()
                .fg(THEME.success)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(Line::from(get_lead)), chunks[3]);

        let input_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(18)])
            .split(chunks[4]);

        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.editing {
                THEME.border_focused_style()
            } else {
                THEME.border_style()
            })
            .title(" New lead [i] ");
        let input_inner = input_block.inner(input_row[0]);
        frame.render_widget(input_block, input_row[0]);

        let text = if self.editing {
            Span::styled(self.input.as_str(), Style::default().fg(THEME.text))
        } else if state.pending_input.is_empty() {
            Span::styled("Press i to type...", THEME.muted_style())
        } else {
            Span::styled(state.pending_input.as_str(), Style::default().fg(THEME.text))
        };
        frame.render_widget(Paragraph::new(text), input_inner);

        if self.editing {
            let cursor_x = input_inner.x + self.cursor_position as u16;
            if cursor_x < input_inner.right() {
                frame.set_cursor_position((cursor_x, input_inner.y));
            }
        }

        let mut set_lead = vec![Span::raw(" ")];
        set_lead.extend(Self::button("s", "Set Lead", true));
        frame.render_widget(
            Paragraph::new(Line::from(set_lead)).block(Block::default().padding(Padding::top(1))),
            input_row[1],
        );
    }
}
