pub mod chains;
pub mod contract;
#[cfg(test)]
pub mod mock;
pub mod provider;
pub mod types;
pub mod wallet;

use std::future::Future;
use std::sync::Arc;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Address;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::data::contract::{ContractHandle, ContractSpec, Subscription};
use crate::data::types::LeadSetEvent;
use crate::data::wallet::WalletConnector;
use crate::error::{LeadError, LeadResult};
use crate::events::{Action, AppEvent};
use crate::shell::Command;

const GET_LEAD: &str = "getLead";
const SET_LEAD: &str = "setLead";
const LEAD_SET: &str = "LeadSet";

/// Runs shell commands as background tasks and reports back over the event
/// channel. Every task runs under a child of one cancellation token.
pub struct LeadService {
    wallet: Arc<WalletConnector>,
    contract: Arc<ContractCache>,
    confirmations: u64,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    shutdown: CancellationToken,
}

impl LeadService {
    pub fn new(
        wallet: WalletConnector,
        spec: ContractSpec,
        confirmations: u64,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            wallet: Arc::new(wallet),
            contract: Arc::new(ContractCache::new(spec)),
            confirmations,
            event_tx,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn wallet(&self) -> &WalletConnector {
        &self.wallet
    }

    pub fn dispatch(&self, command: Command) {
        tracing::debug!(?command, "dispatch");
        let tx = self.event_tx.clone();
        let wallet = Arc::clone(&self.wallet);
        let contract = Arc::clone(&self.contract);

        match command {
            Command::Connect => self.spawn(Action::Connect, async move {
                let accounts = wallet.connect().await?;
                let _ = tx.send(AppEvent::AccountsGranted(accounts));
                Ok(())
            }),
            Command::RefreshBalance(account) => self.spawn(Action::RefreshBalance, async move {
                let wei = wallet.balance_of(account).await?;
                let _ = tx.send(AppEvent::BalanceLoaded { account, wei });
                Ok(())
            }),
            Command::ReadLead => self.spawn(Action::GetLead, async move {
                let handle = contract.get(&wallet, &tx).await?;
                let value = read_lead(&handle).await?;
                let _ = tx.send(AppEvent::LeadLoaded(value));
                Ok(())
            }),
            Command::WriteLead(value) => {
                let confirmations = self.confirmations;
                self.spawn(Action::SetLead, async move {
                    let handle = contract.get(&wallet, &tx).await?;
                    let pending = handle
                        .write(SET_LEAD, &[DynSolValue::String(value)])
                        .await?;
                    let _ = tx.send(AppEvent::LeadTxSubmitted(pending.tx_hash));
                    let receipt = pending.wait_for_confirmation(confirmations).await?;
                    let _ = tx.send(AppEvent::LeadTxConfirmed(receipt));
                    Ok(())
                })
            }
        }
    }

    fn spawn<F>(&self, action: Action, flow: F)
    where
        F: Future<Output = LeadResult<()>> + Send + 'static,
    {
        let token = self.shutdown.child_token();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            if let Err(error) = run_cancellable(&token, flow).await {
                let _ = tx.send(AppEvent::from_error(action, error));
            }
        });
    }

    /// Cancel every in-flight task and drop the event listener.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.contract.close().await;
    }
}

/// Resolve `flow`, or fail with `Cancelled` as soon as `token` fires.
pub async fn run_cancellable<T, F>(token: &CancellationToken, flow: F) -> LeadResult<T>
where
    F: Future<Output = LeadResult<T>>,
{
    tokio::select! {
        _ = token.cancelled() => Err(LeadError::Cancelled),
        result = flow => result,
    }
}

async fn read_lead(handle: &ContractHandle) -> LeadResult<String> {
    let values = handle.read(GET_LEAD, &[]).await?;
    values
        .first()
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| LeadError::Abi(format!("{GET_LEAD} did not return a string")))
}

/// The contract handle for this session, opened on first use.
///
/// The `LeadSet` listener is registered when the handle is opened and lives
/// as long as the handle, so repeated reads and writes never stack listeners.
struct ContractCache {
    spec: ContractSpec,
    open: Mutex<Option<OpenContract>>,
}

struct OpenContract {
    handle: ContractHandle,
    signer: Address,
    _subscription: Option<Subscription>,
}

impl ContractCache {
    fn new(spec: ContractSpec) -> Self {
        Self {
            spec,
            open: Mutex::new(None),
        }
    }

    async fn get(
        &self,
        wallet: &WalletConnector,
        event_tx: &mpsc::UnboundedSender<AppEvent>,
    ) -> LeadResult<ContractHandle> {
        let signer = wallet.signer().await?;

        let mut open = self.open.lock().await;
        if let Some(existing) = open.as_ref() {
            if existing.signer == signer.address {
                return Ok(existing.handle.clone());
            }
        }

        let signer_address = signer.address;
        let handle = ContractHandle::open(self.spec.address, &self.spec, signer);

        let tx = event_tx.clone();
        let subscription = match handle
            .subscribe(LEAD_SET, move |event| {
                if let Some(lead_set) = LeadSetEvent::from_decoded(&event) {
                    let _ = tx.send(AppEvent::LeadSetObserved(lead_set));
                }
            })
            .await
        {
            Ok(subscription) => Some(subscription),
            Err(e) => {
                tracing::warn!(error = %e, "could not subscribe to {LEAD_SET}");
                None
            }
        };

        tracing::info!(contract = %self.spec.address, signer = %signer_address, "contract opened");
        *open = Some(OpenContract {
            handle: handle.clone(),
            signer: signer_address,
            _subscription: subscription,
        });
        Ok(handle)
    }

    async fn close(&self) {
        self.open.lock().await.take();
    }
}
