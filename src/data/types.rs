use std::path::Path;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256, Bytes, U256};
use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

/// A network the wallet is expected to be on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Short name used in the mismatch message, e.g. "Mumbai Polygon".
    pub name: String,
    /// Longer name shown in the wrong-network banner.
    pub display_name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub symbol: String,
}

impl NetworkConfig {
    /// Text stored in the chain-error flag when the wallet is elsewhere.
    pub fn mismatch_message(&self) -> String {
        format!("change to {}", self.name)
    }
}

/// Address and interface of the contract the app talks to.
///
/// Loaded from a JSON file given with `--contract`; every field falls back to
/// the Lead contract defaults when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContractConfig {
    pub address: String,
    pub method_signatures: Vec<String>,
    pub event_signatures: Vec<String>,
    pub network: String,
}

pub const LEAD_CONTRACT_ADDRESS: &str = "0xB0b72FB76a9390943A869eD2e837D183Cd44F954";

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: LEAD_CONTRACT_ADDRESS.to_string(),
            method_signatures: vec![
                "function getLead() external view returns (string memory)".to_string(),
                "function setLead(string) returns (string)".to_string(),
            ],
            event_signatures: vec![
                "event LeadSet(address indexed from, address indexed to, uint256 value)"
                    .to_string(),
            ],
            network: "mumbai".to_string(),
        }
    }
}

impl ContractConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read contract config {}", path.display()))?;
        serde_json::from_str(&data)
            .wrap_err_with(|| format!("invalid contract config {}", path.display()))
    }
}

/// A raw log as returned by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: Option<u64>,
    pub tx_hash: Option<B256>,
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
}

/// An event log decoded against the contract interface.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent {
    pub name: String,
    pub fields: Vec<(String, DynSolValue)>,
    pub block_number: Option<u64>,
    pub tx_hash: Option<B256>,
}

impl DecodedEvent {
    pub fn field(&self, name: &str) -> Option<&DynSolValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// `LeadSet(address indexed from, address indexed to, uint256 value)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSetEvent {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub block_number: Option<u64>,
}

impl LeadSetEvent {
    pub fn from_decoded(event: &DecodedEvent) -> Option<Self> {
        let from = event.field("from")?.as_address()?;
        let to = event.field("to")?.as_address()?;
        let (value, _) = event.field("value")?.as_uint()?;
        Some(Self {
            from,
            to,
            value,
            block_number: event.block_number,
        })
    }
}
