use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;

use crate::components::Component;
use crate::components::activity_log::ActivityLog;
use crate::components::header::Header;
use crate::components::help::HelpOverlay;
use crate::components::lead_panel::LeadPanel;
use crate::components::network_banner::NetworkBanner;
use crate::components::status_bar::StatusBar;
use crate::components::toast::ToastView;
use crate::data::LeadService;
use crate::events::AppEvent;
use crate::shell::ShellState;
use crate::theme::THEME;

pub struct App {
    state: ShellState,

    // Components
    header: Header,
    banner: NetworkBanner,
    panel: LeadPanel,
    status_bar: StatusBar,
    help: HelpOverlay,

    // Data
    service: LeadService,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,

    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn with_service(
        service: LeadService,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        tick_rate_ms: u64,
    ) -> Self {
        let network = service.wallet().network().clone();
        let header = Header::new(
            service.wallet().current_chain_id(),
            network.chain_id,
            network.name.clone(),
            network.symbol.clone(),
        );
        Self {
            state: ShellState::new(),
            header,
            banner: NetworkBanner::new(network.display_name),
            panel: LeadPanel::new(),
            status_bar: StatusBar::new(),
            help: HelpOverlay::new(),
            service,
            event_rx,
            should_quit: false,
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    pub async fn run(&mut self, mut terminal: ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        let mut interval = tokio::time::interval(self.tick_rate);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => {
                    self.handle_app_event(AppEvent::Tick(Instant::now()));
                    terminal.draw(|frame| self.render(frame))?;
                }
                Some(Ok(event)) = events.next() => {
                    self.handle_terminal_event(event);
                }
                Some(app_event) = self.event_rx.recv() => {
                    self.handle_app_event(app_event);
                }
            }
        }

        tracing::info!("shutting down");
        self.service.shutdown().await;
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(THEME.surface)),
            area,
        );

        // header | banner | panel | activity | status bar
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(self.banner.height(&self.state)),
                Constraint::Length(13),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.render(frame, chunks[0], &self.state);
        self.banner.render(frame, chunks[1], &self.state);
        self.panel.render(frame, chunks[2], &self.state);
        ActivityLog::render(frame, chunks[3], &self.state);
        self.status_bar.editing = self.panel.editing;
        self.status_bar.render(frame, chunks[4], &self.state);

        // Overlays
        let above_status = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        ToastView::render(frame, above_status, &self.state);
        self.help.render(frame, area);
    }

    fn handle_terminal_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }
            self.handle_key(key);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Help overlay consumes all keys when visible
        if self.help.handle_key(key) {
            return;
        }

        if !self.panel.editing {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('?') => {
                    self.help.toggle();
                    return;
                }
                _ => {}
            }
        }

        if let Some(event) = self.panel.handle_key(key, &self.state) {
            self.handle_app_event(event);
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        if let Some(command) = self.state.apply(event) {
            self.service.dispatch(command);
        }
    }
}
