use alloy::primitives::B256;
use alloy::providers::PendingTransactionError;
use alloy::transports::TransportError;
use thiserror::Error;

/// Every way a wallet or contract interaction can fail.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LeadError {
    #[error("no wallet configured; pass --private-key or set LEAD_TUI_PRIVATE_KEY")]
    WalletUnavailable,

    #[error("{message} (wallet is on chain {actual:#x}, expected {expected:#x})")]
    WrongNetwork {
        expected: u64,
        actual: u64,
        message: String,
    },

    #[error("call reverted: {0}")]
    CallReverted(String),

    #[error("transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: B256 },

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("request rejected by wallet: {0}")]
    UserRejected(String),

    #[error("contract has no method `{0}`")]
    UnknownMethod(String),

    #[error("contract has no event `{0}`")]
    UnknownEvent(String),

    #[error("abi error: {0}")]
    Abi(String),

    #[error("cancelled")]
    Cancelled,
}

pub type LeadResult<T> = Result<T, LeadError>;

/// EIP-1193 "user rejected request".
const USER_REJECTED_CODE: i64 = 4001;
/// Geth and most nodes answer reverted `eth_call`s with code 3.
const EXECUTION_REVERTED_CODE: i64 = 3;

impl LeadError {
    /// Classify a JSON-RPC transport failure.
    pub fn from_rpc(err: TransportError) -> Self {
        match err.as_error_resp() {
            Some(payload) => classify(payload.code, payload.message.as_ref()),
            None => LeadError::NetworkError(err.to_string()),
        }
    }

    /// Classify a failure while waiting for a receipt. Node errors go through
    /// [`LeadError::from_rpc`]; watcher failures are network errors.
    pub fn from_pending(err: PendingTransactionError) -> Self {
        match err {
            PendingTransactionError::TransportError(err) => LeadError::from_rpc(err),
            err => LeadError::NetworkError(err.to_string()),
        }
    }
}

pub fn classify(code: i64, message: &str) -> LeadError {
    if code == USER_REJECTED_CODE {
        LeadError::UserRejected(message.to_string())
    } else if code == EXECUTION_REVERTED_CODE || message.to_lowercase().contains("revert") {
        LeadError::CallReverted(message.to_string())
    } else {
        LeadError::NetworkError(format!("{message} (code {code})"))
    }
}

impl From<alloy::dyn_abi::Error> for LeadError {
    fn from(err: alloy::dyn_abi::Error) -> Self {
        LeadError::Abi(err.to_string())
    }
}
