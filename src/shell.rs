//! Application state and the reducer that drives it.
//!
//! Every handler result arrives as an [`AppEvent`]; [`ShellState::apply`]
//! folds it into state and may ask for one follow-up [`Command`]. Nothing in
//! here performs I/O.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use alloy::primitives::Address;
use chrono::{DateTime, Local};

use crate::events::{Action, AppEvent};
use crate::utils;

const TOAST_TTL: Duration = Duration::from_secs(5);
const MAX_ACTIVITY: usize = 50;

pub const TX_SUCCESS_MESSAGE: &str = "Transaction successful";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    Connecting,
    Connected(Address),
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect,
    RefreshBalance(Address),
    ReadLead,
    WriteLead(String),
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub at: DateTime<Local>,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ShellState {
    pub phase: Phase,
    pub balance: String,
    pub chain_error: Option<String>,
    pub lead: String,
    pub pending_input: String,
    pub toast: Option<Toast>,
    pub activity: VecDeque<ActivityEntry>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Disconnected,
            balance: String::new(),
            chain_error: None,
            lead: String::new(),
            pending_input: String::new(),
            toast: None,
            activity: VecDeque::new(),
        }
    }

    pub fn account(&self) -> Option<Address> {
        match self.phase {
            Phase::Connected(account) => Some(account),
            _ => None,
        }
    }

    /// The connect button stays enabled until an account is set.
    pub fn can_connect(&self) -> bool {
        self.account().is_none()
    }

    pub fn apply(&mut self, event: AppEvent) -> Option<Command> {
        match event {
            AppEvent::ConnectRequested => {
                if !self.can_connect() {
                    return None;
                }
                self.phase = Phase::Connecting;
                Some(Command::Connect)
            }
            AppEvent::WalletUnavailable => {
                tracing::warn!("no wallet available; install or configure one to connect");
                self.phase = Phase::Disconnected;
                None
            }
            AppEvent::WrongNetwork {
                expected,
                actual,
                message,
            } => {
                tracing::warn!(expected, actual, %message, "wallet on wrong network");
                self.phase = Phase::Disconnected;
                self.chain_error = Some(message);
                None
            }
            AppEvent::AccountsGranted(accounts) => match accounts.first() {
                Some(&account) => {
                    self.phase = Phase::Connected(account);
                    self.chain_error = None;
                    Some(Command::RefreshBalance(account))
                }
                None => {
                    tracing::warn!("wallet granted no accounts");
                    self.phase = Phase::Disconnected;
                    None
                }
            },
            AppEvent::BalanceLoaded { account, wei } => {
                self.balance = utils::format_ether(wei);
                tracing::info!(%account, balance = %self.balance, "balance refreshed");
                None
            }
            AppEvent::GetLeadRequested => Some(Command::ReadLead),
            AppEvent::LeadLoaded(value) => {
                tracing::info!(lead = %value, "lead read");
                self.lead = value;
                None
            }
            AppEvent::SetLeadRequested => Some(Command::WriteLead(self.pending_input.clone())),
            AppEvent::InputChanged(value) => {
                self.pending_input = value;
                None
            }
            AppEvent::LeadTxSubmitted(tx_hash) => {
                self.push_activity(format!("setLead submitted {tx_hash}"));
                None
            }
            AppEvent::LeadTxConfirmed(receipt) => {
                tracing::info!(?receipt, "setLead receipt");
                if !receipt.success {
                    return None;
                }
                self.toast = Some(Toast {
                    message: TX_SUCCESS_MESSAGE.to_string(),
                    expires_at: Instant::now() + TOAST_TTL,
                });
                Some(Command::ReadLead)
            }
            AppEvent::LeadSetObserved(event) => {
                let line = format!(
                    "{} => {}: {}",
                    event.from,
                    event.to,
                    utils::format_ether(event.value)
                );
                tracing::info!("{line}");
                self.push_activity(line);
                None
            }
            AppEvent::ActionFailed { action, error } => {
                tracing::warn!(%action, %error, "action failed");
                if action == Action::Connect && self.phase == Phase::Connecting {
                    self.phase = Phase::Disconnected;
                }
                None
            }
            AppEvent::Tick(now) => {
                if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
                    self.toast = None;
                }
                None
            }
        }
    }

    fn push_activity(&mut self, text: String) {
        if self.activity.len() == MAX_ACTIVITY {
            self.activity.pop_front();
        }
        self.activity.push_back(ActivityEntry {
            at: Local::now(),
            text,
        });
    }
}
