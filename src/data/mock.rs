//! In-memory `ChainClient` that behaves like a node hosting the Lead contract.

use std::collections::HashMap;
use std::sync::Mutex;

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{Address, B256, Bytes, U256, keccak256};
use async_trait::async_trait;
use futures::channel::mpsc;
use futures::stream::{BoxStream, StreamExt};

use crate::data::provider::ChainClient;
use crate::data::types::{LogEntry, Receipt};
use crate::error::{LeadError, LeadResult};

pub const ACCOUNT: Address = Address::repeat_byte(0xab);

pub struct MockState {
    pub chain_id: u64,
    pub has_signer: bool,
    pub accounts: Vec<Address>,
    pub reject_accounts: bool,
    pub balance: U256,
    pub lead: String,
    pub revert_reads: bool,
    pub fail_receipts: bool,
    pub stall_receipts: bool,
    pub accounts_requested: usize,
    pub balance_queries: usize,
    pub watchers: usize,
    block: u64,
    nonce: u64,
    pending: HashMap<B256, (Address, String)>,
    log_senders: Vec<mpsc::UnboundedSender<LogEntry>>,
}

pub struct MockChain {
    pub state: Mutex<MockState>,
}

fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

impl MockChain {
    pub fn new(chain_id: u64) -> Self {
        Self {
            state: Mutex::new(MockState {
                chain_id,
                has_signer: true,
                accounts: vec![ACCOUNT],
                reject_accounts: false,
                balance: U256::from(1_000_000_000_000_000_000u128),
                lead: "alice".to_string(),
                revert_reads: false,
                fail_receipts: false,
                stall_receipts: false,
                accounts_requested: 0,
                balance_queries: 0,
                watchers: 0,
                block: 100,
                nonce: 0,
                pending: HashMap::new(),
                log_senders: Vec::new(),
            }),
        }
    }

    pub fn mumbai() -> Self {
        Self::new(0x13881)
    }

    pub fn with<F: FnOnce(&mut MockState)>(self, f: F) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn lead(&self) -> String {
        self.state.lock().unwrap().lead.clone()
    }

    fn lead_set_log(
        state: &MockState,
        contract: Address,
        from: Address,
        tx_hash: B256,
    ) -> LogEntry {
        LogEntry {
            address: contract,
            topics: vec![
                keccak256("LeadSet(address,address,uint256)".as_bytes()),
                from.into_word(),
                contract.into_word(),
            ],
            data: DynSolValue::Uint(U256::from(state.block), 256)
                .abi_encode()
                .into(),
            block_number: Some(state.block),
            tx_hash: Some(tx_hash),
        }
    }
}

#[async_trait]
impl ChainClient for MockChain {
    fn chain_id(&self) -> u64 {
        self.state.lock().unwrap().chain_id
    }

    fn has_signer(&self) -> bool {
        self.state.lock().unwrap().has_signer
    }

    async fn request_accounts(&self) -> LeadResult<Vec<Address>> {
        let mut state = self.state.lock().unwrap();
        state.accounts_requested += 1;
        if !state.has_signer {
            return Err(LeadError::WalletUnavailable);
        }
        if state.reject_accounts {
            return Err(LeadError::UserRejected("User rejected the request.".to_string()));
        }
        Ok(state.accounts.clone())
    }

    async fn get_balance(&self, _address: Address) -> LeadResult<U256> {
        let mut state = self.state.lock().unwrap();
        state.balance_queries += 1;
        Ok(state.balance)
    }

    async fn call(&self, _from: Option<Address>, _to: Address, input: Bytes) -> LeadResult<Bytes> {
        let state = self.state.lock().unwrap();
        if state.revert_reads {
            return Err(LeadError::CallReverted("execution reverted".to_string()));
        }
        if input.len() >= 4 && input[..4] == selector("getLead()") {
            let encoded = DynSolValue::Tuple(vec![DynSolValue::String(state.lead.clone())])
                .abi_encode_params();
            return Ok(encoded.into());
        }
        Err(LeadError::CallReverted("function selector not recognized".to_string()))
    }

    async fn send_transaction(
        &self,
        _from: Address,
        to: Address,
        input: Bytes,
    ) -> LeadResult<B256> {
        let mut state = self.state.lock().unwrap();
        if !state.has_signer {
            return Err(LeadError::WalletUnavailable);
        }
        if input.len() < 4 || input[..4] != selector("setLead(string)") {
            return Err(LeadError::CallReverted("function selector not recognized".to_string()));
        }
        let decoded = DynSolType::Tuple(vec![DynSolType::String])
            .abi_decode_params(&input[4..])
            .map_err(|e| LeadError::Abi(e.to_string()))?;
        let value = match decoded {
            DynSolValue::Tuple(values) => values
                .first()
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        };
        state.nonce += 1;
        let tx_hash = keccak256([input.as_ref(), &state.nonce.to_be_bytes()[..]].concat());
        state.pending.insert(tx_hash, (to, value));
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: B256, confirmations: u64) -> LeadResult<Receipt> {
        let stall = self.state.lock().unwrap().stall_receipts;
        if stall {
            futures::future::pending::<()>().await;
        }

        let mut state = self.state.lock().unwrap();
        let (contract, value) = state
            .pending
            .remove(&tx_hash)
            .ok_or_else(|| LeadError::NetworkError("unknown transaction".to_string()))?;
        state.block += confirmations.max(1);

        if state.fail_receipts {
            return Ok(Receipt {
                tx_hash,
                block_number: Some(state.block),
                gas_used: 21_000,
                success: false,
            });
        }

        state.lead = value;
        let sender = state.accounts.first().copied().unwrap_or(ACCOUNT);
        let log = Self::lead_set_log(&state, contract, sender, tx_hash);
        state
            .log_senders
            .retain(|tx| tx.unbounded_send(log.clone()).is_ok());

        Ok(Receipt {
            tx_hash,
            block_number: Some(state.block),
            gas_used: 45_000,
            success: true,
        })
    }

    async fn watch_logs(
        &self,
        _address: Address,
        _topic0: B256,
    ) -> LeadResult<BoxStream<'static, LogEntry>> {
        let (tx, rx) = mpsc::unbounded();
        let mut state = self.state.lock().unwrap();
        state.watchers += 1;
        state.log_senders.push(tx);
        Ok(rx.boxed())
    }
}
