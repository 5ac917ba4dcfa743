use alloy::dyn_abi::{DynSolValue, EventExt, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Event, Function, JsonAbi};
use alloy::primitives::{Address, B256};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::data::provider::ChainClient;
use crate::data::types::{ContractConfig, DecodedEvent, LogEntry, Receipt};
use crate::data::wallet::Signer;
use crate::error::{LeadError, LeadResult};

/// Contract address plus the interface parsed from human-readable signatures.
#[derive(Debug, Clone)]
pub struct ContractSpec {
    pub address: Address,
    pub abi: JsonAbi,
}

impl ContractSpec {
    pub fn from_config(config: &ContractConfig) -> LeadResult<Self> {
        let address: Address = config.address.parse().map_err(|e| {
            LeadError::Abi(format!("invalid contract address {}: {e}", config.address))
        })?;

        let methods: Vec<String> = config
            .method_signatures
            .iter()
            .map(|s| normalize_function_signature(s))
            .collect();
        let signatures = methods
            .iter()
            .chain(config.event_signatures.iter())
            .map(String::as_str);
        let abi = JsonAbi::parse(signatures).map_err(|e| LeadError::Abi(e.to_string()))?;

        Ok(Self { address, abi })
    }
}

const VISIBILITY: &[&str] = &["external", "public", "internal", "private"];

/// Rewrite ethers-style modifiers (`view external`) into the order the ABI
/// parser accepts: visibility, then state mutability. `nonpayable` is the
/// default and is dropped.
fn normalize_function_signature(signature: &str) -> String {
    let Some(params_end) = params_end(signature) else {
        return signature.to_string();
    };
    let (head, tail) = signature.split_at(params_end + 1);
    let (modifiers, returns) = match tail.find("returns") {
        Some(i) => tail.split_at(i),
        None => (tail, ""),
    };

    let (visibility, mutability): (Vec<&str>, Vec<&str>) = modifiers
        .split_whitespace()
        .filter(|m| *m != "nonpayable")
        .partition(|m| VISIBILITY.contains(m));

    let mut normalized = head.to_string();
    for modifier in visibility.iter().chain(mutability.iter()) {
        normalized.push(' ');
        normalized.push_str(modifier);
    }
    if !returns.is_empty() {
        normalized.push(' ');
        normalized.push_str(returns.trim());
    }
    normalized
}

/// Byte offset of the `)` closing the parameter list.
fn params_end(signature: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in signature.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Signer-bound handle to one deployed contract. Reads and writes both go
/// through it.
#[derive(Clone)]
pub struct ContractHandle {
    address: Address,
    abi: JsonAbi,
    signer: Signer,
}

impl ContractHandle {
    /// Bind the interface to an address and signer. Performs no I/O.
    pub fn open(address: Address, spec: &ContractSpec, signer: Signer) -> Self {
        Self {
            address,
            abi: spec.abi.clone(),
            signer,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn function(&self, method: &str, args: &[DynSolValue]) -> LeadResult<&Function> {
        let overloads = self
            .abi
            .function(method)
            .ok_or_else(|| LeadError::UnknownMethod(method.to_string()))?;
        overloads
            .iter()
            .find(|f| f.inputs.len() == args.len())
            .ok_or_else(|| LeadError::UnknownMethod(format!("{method}/{}", args.len())))
    }

    fn event(&self, name: &str) -> LeadResult<&Event> {
        self.abi
            .event(name)
            .and_then(|events| events.first())
            .ok_or_else(|| LeadError::UnknownEvent(name.to_string()))
    }

    /// Read-only call; never creates a transaction.
    pub async fn read(&self, method: &str, args: &[DynSolValue]) -> LeadResult<Vec<DynSolValue>> {
        let function = self.function(method, args)?;
        let input = function.abi_encode_input(args)?;
        let output = self
            .signer
            .client
            .call(Some(self.signer.address), self.address, input.into())
            .await?;
        Ok(function.abi_decode_output(&output, true)?)
    }

    /// Submit a state-changing call and return as soon as it is accepted.
    pub async fn write(&self, method: &str, args: &[DynSolValue]) -> LeadResult<TransactionHandle> {
        let function = self.function(method, args)?;
        let input = function.abi_encode_input(args)?;
        let tx_hash = self
            .signer
            .client
            .send_transaction(self.signer.address, self.address, input.into())
            .await?;
        tracing::info!(%tx_hash, method, contract = %self.address, "transaction submitted");
        Ok(TransactionHandle {
            tx_hash,
            client: self.signer.client.clone(),
        })
    }

    /// Invoke `handler` once per matching event observed from now on, in
    /// block order. Delivery stops when the returned subscription is dropped.
    pub async fn subscribe<F>(&self, event_name: &str, handler: F) -> LeadResult<Subscription>
    where
        F: Fn(DecodedEvent) + Send + 'static,
    {
        let event = self.event(event_name)?.clone();
        let mut logs = self
            .signer
            .client
            .watch_logs(self.address, event.selector())
            .await?;

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    next = logs.next() => match next {
                        Some(log) => match decode_log(&event, &log) {
                            Ok(decoded) => handler(decoded),
                            Err(e) => {
                                tracing::warn!(event = %event.name, error = %e, "undecodable log")
                            }
                        },
                        None => break,
                    },
                }
            }
        });

        Ok(Subscription { token, task })
    }
}

/// Decode a raw log against an event definition, pairing values with names.
pub fn decode_log(event: &Event, log: &LogEntry) -> LeadResult<DecodedEvent> {
    let decoded = event.decode_log_parts(log.topics.iter().copied(), &log.data, true)?;

    let mut indexed = decoded.indexed.into_iter();
    let mut body = decoded.body.into_iter();
    let mut fields = Vec::with_capacity(event.inputs.len());
    for input in &event.inputs {
        let value = if input.indexed {
            indexed.next()
        } else {
            body.next()
        };
        let value =
            value.ok_or_else(|| LeadError::Abi(format!("missing value for {}", input.name)))?;
        fields.push((input.name.clone(), value));
    }

    Ok(DecodedEvent {
        name: event.name.clone(),
        fields,
        block_number: log.block_number,
        tx_hash: log.tx_hash,
    })
}

/// A submitted, possibly unmined transaction.
pub struct TransactionHandle {
    pub tx_hash: B256,
    client: std::sync::Arc<dyn ChainClient>,
}

impl TransactionHandle {
    /// Wait for `confirmations` blocks; a failed status is an error.
    pub async fn wait_for_confirmation(&self, confirmations: u64) -> LeadResult<Receipt> {
        let receipt = self
            .client
            .wait_for_receipt(self.tx_hash, confirmations)
            .await?;
        if !receipt.success {
            return Err(LeadError::TransactionReverted {
                tx_hash: self.tx_hash,
            });
        }
        Ok(receipt)
    }
}

/// Live event listener. Cancelled on drop.
pub struct Subscription {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::data::mock::{ACCOUNT, MockChain};
    use crate::data::types::LeadSetEvent;

    fn handle(chain: &Arc<MockChain>) -> ContractHandle {
        let spec = ContractSpec::from_config(&ContractConfig::default()).unwrap();
        let signer = Signer {
            client: chain.clone(),
            address: ACCOUNT,
        };
        ContractHandle::open(spec.address, &spec, signer)
    }

    #[test]
    fn test_spec_from_default_config() {
        let spec = ContractSpec::from_config(&ContractConfig::default()).unwrap();
        assert_eq!(
            spec.address,
            alloy::primitives::address!("b0b72fb76a9390943a869ed2e837d183cd44f954")
        );
        assert!(spec.abi.function("getLead").is_some());
        assert!(spec.abi.function("setLead").is_some());
        let event = &spec.abi.event("LeadSet").unwrap()[0];
        assert_eq!(event.inputs.len(), 3);
        assert!(event.inputs[0].indexed);
        assert!(!event.inputs[2].indexed);
    }

    #[test]
    fn test_spec_rejects_bad_address() {
        let config = ContractConfig {
            address: "not-an-address".to_string(),
            ..ContractConfig::default()
        };
        assert!(matches!(
            ContractSpec::from_config(&config),
            Err(LeadError::Abi(_))
        ));
    }

    #[test]
    fn test_spec_rejects_bad_signature() {
        let config = ContractConfig {
            method_signatures: vec!["function (".to_string()],
            ..ContractConfig::default()
        };
        assert!(ContractSpec::from_config(&config).is_err());
    }

    #[test]
    fn test_spec_accepts_mutability_before_visibility() {
        let config = ContractConfig {
            method_signatures: vec![
                "function getLead() view external returns (string memory)".to_string(),
                "function setLead(string) nonpayable public returns (string)".to_string(),
            ],
            ..ContractConfig::default()
        };
        let spec = ContractSpec::from_config(&config).unwrap();
        let get_lead = &spec.abi.function("getLead").unwrap()[0];
        assert_eq!(get_lead.state_mutability, alloy::json_abi::StateMutability::View);
        assert_eq!(get_lead.outputs.len(), 1);
        assert!(spec.abi.function("setLead").is_some());
    }

    #[test]
    fn test_normalize_function_signature() {
        assert_eq!(
            normalize_function_signature(
                "function getLead() view external returns (string memory)"
            ),
            "function getLead() external view returns (string memory)"
        );
        assert_eq!(
            normalize_function_signature("function f((uint256,address) p) payable"),
            "function f((uint256,address) p) payable"
        );
        assert_eq!(normalize_function_signature("function ("), "function (");
    }

    #[tokio::test]
    async fn test_read_get_lead() {
        let chain = Arc::new(MockChain::mumbai());
        let result = handle(&chain).read("getLead", &[]).await.unwrap();
        assert_eq!(result, vec![DynSolValue::String("alice".to_string())]);
    }

    #[tokio::test]
    async fn test_read_unknown_method() {
        let chain = Arc::new(MockChain::mumbai());
        let err = handle(&chain).read("owner", &[]).await.unwrap_err();
        assert_eq!(err, LeadError::UnknownMethod("owner".to_string()));
    }

    #[tokio::test]
    async fn test_read_reverted() {
        let chain = Arc::new(MockChain::mumbai().with(|s| s.revert_reads = true));
        let err = handle(&chain).read("getLead", &[]).await.unwrap_err();
        assert!(matches!(err, LeadError::CallReverted(_)));
    }

    #[tokio::test]
    async fn test_read_after_confirmed_write() {
        let chain = Arc::new(MockChain::mumbai());
        let contract = handle(&chain);

        let before = contract.read("getLead", &[]).await.unwrap();
        assert_eq!(before, vec![DynSolValue::String("alice".to_string())]);

        let tx = contract
            .write("setLead", &[DynSolValue::String("bob".to_string())])
            .await
            .unwrap();
        // Nothing changes until the transaction is mined.
        assert_eq!(chain.lead(), "alice");

        let receipt = tx.wait_for_confirmation(1).await.unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.tx_hash, tx.tx_hash);

        let after = contract.read("getLead", &[]).await.unwrap();
        assert_eq!(after, vec![DynSolValue::String("bob".to_string())]);
    }

    #[tokio::test]
    async fn test_failed_receipt_is_reverted() {
        let chain = Arc::new(MockChain::mumbai().with(|s| s.fail_receipts = true));
        let contract = handle(&chain);
        let tx = contract
            .write("setLead", &[DynSolValue::String("bob".to_string())])
            .await
            .unwrap();
        let err = tx.wait_for_confirmation(1).await.unwrap_err();
        assert_eq!(err, LeadError::TransactionReverted { tx_hash: tx.tx_hash });
        assert_eq!(chain.lead(), "alice");
    }

    #[tokio::test]
    async fn test_write_without_signer() {
        let chain = Arc::new(MockChain::mumbai().with(|s| s.has_signer = false));
        let result = handle(&chain)
            .write("setLead", &[DynSolValue::String("bob".to_string())])
            .await;
        assert!(matches!(result, Err(LeadError::WalletUnavailable)));
    }

    #[tokio::test]
    async fn test_write_wrong_arity() {
        let chain = Arc::new(MockChain::mumbai());
        let result = handle(&chain).write("setLead", &[]).await;
        assert!(matches!(result, Err(LeadError::UnknownMethod(_))));
    }

    #[tokio::test]
    async fn test_subscribe_delivers_lead_set() {
        let chain = Arc::new(MockChain::mumbai());
        let contract = handle(&chain);
        let seen: Arc<Mutex<Vec<LeadSetEvent>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let subscription = contract
            .subscribe("LeadSet", move |event| {
                if let Some(lead_set) = LeadSetEvent::from_decoded(&event) {
                    sink.lock().unwrap().push(lead_set);
                }
            })
            .await
            .unwrap();
        assert!(subscription.is_active());

        let tx = contract
            .write("setLead", &[DynSolValue::String("carol".to_string())])
            .await
            .unwrap();
        tx.wait_for_confirmation(1).await.unwrap();

        for _ in 0..50 {
            if !seen.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].from, ACCOUNT);
        assert_eq!(seen[0].to, contract.address());
    }

    #[tokio::test]
    async fn test_subscribe_unknown_event() {
        let chain = Arc::new(MockChain::mumbai());
        let result = handle(&chain).subscribe("Transfer", |_| {}).await;
        assert!(matches!(result, Err(LeadError::UnknownEvent(_))));
    }

    #[tokio::test]
    async fn test_cancelled_subscription_stops() {
        let chain = Arc::new(MockChain::mumbai());
        let subscription = handle(&chain).subscribe("LeadSet", |_| {}).await.unwrap();
        subscription.cancel();
        for _ in 0..50 {
            if !subscription.is_active() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(!subscription.is_active());
    }

    #[tokio::test]
    async fn test_dropped_subscription_stops_delivery() {
        let chain = Arc::new(MockChain::mumbai());
        let contract = handle(&chain);
        let seen = Arc::new(Mutex::new(0usize));

        let sink = seen.clone();
        let subscription = contract
            .subscribe("LeadSet", move |_| *sink.lock().unwrap() += 1)
            .await
            .unwrap();
        drop(subscription);
        tokio::time::sleep(Duration::from_millis(20)).await;

        let tx = contract
            .write("setLead", &[DynSolValue::String("dave".to_string())])
            .await
            .unwrap();
        tx.wait_for_confirmation(1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(chain.lead(), "dave");
        assert_eq!(*seen.lock().unwrap(), 0);
    }
}
