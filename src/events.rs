use std::time::Instant;

use alloy::primitives::{Address, B256, U256};

use crate::data::types::{LeadSetEvent, Receipt};
use crate::error::LeadError;

/// The user actions that talk to the chain, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Connect,
    RefreshBalance,
    GetLead,
    SetLead,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Connect => write!(f, "connect"),
            Action::RefreshBalance => write!(f, "balance"),
            Action::GetLead => write!(f, "getLead"),
            Action::SetLead => write!(f, "setLead"),
        }
    }
}

/// Everything that can change shell state: key-driven intents from the
/// components and results from background tasks.
#[derive(Debug, Clone)]
pub enum AppEvent {
    // User intents
    ConnectRequested,
    GetLeadRequested,
    SetLeadRequested,
    InputChanged(String),

    // Wallet
    WalletUnavailable,
    WrongNetwork { expected: u64, actual: u64, message: String },
    AccountsGranted(Vec<Address>),
    BalanceLoaded { account: Address, wei: U256 },

    // Contract
    LeadLoaded(String),
    LeadTxSubmitted(B256),
    LeadTxConfirmed(Receipt),
    LeadSetObserved(LeadSetEvent),

    // Status
    ActionFailed { action: Action, error: LeadError },
    Tick(Instant),
}

impl AppEvent {
    /// Map a failed task onto the event the shell reacts to.
    pub fn from_error(action: Action, error: LeadError) -> Self {
        match error {
            LeadError::WalletUnavailable if action == Action::Connect => {
                AppEvent::WalletUnavailable
            }
            LeadError::WrongNetwork {
                expected,
                actual,
                message,
            } => AppEvent::WrongNetwork {
                expected,
                actual,
                message,
            },
            error => AppEvent::ActionFailed { action, error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_network_maps_to_own_event() {
        let event = AppEvent::from_error(
            Action::Connect,
            LeadError::WrongNetwork {
                expected: 0x13881,
                actual: 1,
                message: "change to Mumbai Polygon".to_string(),
            },
        );
        assert!(matches!(event, AppEvent::WrongNetwork { actual: 1, .. }));
    }

    #[test]
    fn test_wallet_unavailable_on_connect() {
        let event = AppEvent::from_error(Action::Connect, LeadError::WalletUnavailable);
        assert!(matches!(event, AppEvent::WalletUnavailable));
    }

    #[test]
    fn test_wallet_unavailable_on_read_is_plain_failure() {
        let event = AppEvent::from_error(Action::GetLead, LeadError::WalletUnavailable);
        assert!(matches!(
            event,
            AppEvent::ActionFailed {
                action: Action::GetLead,
                error: LeadError::WalletUnavailable
            }
        ));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::SetLead.to_string(), "setLead");
        assert_eq!(Action::Connect.to_string(), "connect");
    }
}
