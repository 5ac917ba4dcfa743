use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::providers::{PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use color_eyre::eyre::{Result, WrapErr};
use futures::stream::{self, BoxStream, StreamExt};

use crate::data::types::{LogEntry, Receipt};
use crate::error::{LeadError, LeadResult};

/// The node-facing seam: everything the wallet connector and the contract
/// gateway need from a JSON-RPC endpoint.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Chain id observed when the client connected.
    fn chain_id(&self) -> u64;

    /// Whether a signing key is attached.
    fn has_signer(&self) -> bool;

    /// Accounts the attached signer can act for.
    async fn request_accounts(&self) -> LeadResult<Vec<Address>>;

    async fn get_balance(&self, address: Address) -> LeadResult<U256>;

    /// `eth_call` against the latest block.
    async fn call(&self, from: Option<Address>, to: Address, input: Bytes) -> LeadResult<Bytes>;

    /// Sign and submit, returning once the node has accepted the hash.
    async fn send_transaction(&self, from: Address, to: Address, input: Bytes) -> LeadResult<B256>;

    async fn wait_for_receipt(&self, tx_hash: B256, confirmations: u64) -> LeadResult<Receipt>;

    /// Logs emitted by `address` with the given topic0, from now on.
    async fn watch_logs(
        &self,
        address: Address,
        topic0: B256,
    ) -> LeadResult<BoxStream<'static, LogEntry>>;
}

/// alloy-backed client over HTTP JSON-RPC.
///
/// Reads go through a plain provider; writes go through a second provider
/// carrying the local signer, so fills and signing happen client-side.
pub struct RpcClient {
    reader: Box<dyn Provider + Send + Sync>,
    writer: Option<Box<dyn Provider + Send + Sync>>,
    accounts: Vec<Address>,
    chain_id: u64,
}

impl RpcClient {
    /// Connect to a node and, if a private key is given, attach a signer.
    pub async fn connect(rpc_url: &str, private_key: Option<&str>) -> Result<Self> {
        let url: Url = rpc_url
            .parse()
            .wrap_err_with(|| format!("invalid RPC url {rpc_url}"))?;
        let reader = ProviderBuilder::new().on_http(url.clone());
        let chain_id = reader
            .get_chain_id()
            .await
            .wrap_err_with(|| format!("failed to query chain id from {rpc_url}"))?;

        let (writer, accounts) = match private_key {
            Some(key) => {
                let signer: PrivateKeySigner = key
                    .trim()
                    .trim_start_matches("0x")
                    .parse()
                    .wrap_err("failed to parse private key")?;
                let account = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .on_http(url);
                (
                    Some(Box::new(provider) as Box<dyn Provider + Send + Sync>),
                    vec![account],
                )
            }
            None => (None, Vec::new()),
        };

        tracing::info!(rpc_url, chain_id, signer = writer.is_some(), "rpc client connected");

        Ok(Self {
            reader: Box::new(reader),
            writer,
            accounts,
            chain_id,
        })
    }

    fn writer(&self) -> LeadResult<&(dyn Provider + Send + Sync)> {
        self.writer.as_deref().ok_or(LeadError::WalletUnavailable)
    }
}

#[async_trait]
impl ChainClient for RpcClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn has_signer(&self) -> bool {
        self.writer.is_some()
    }

    async fn request_accounts(&self) -> LeadResult<Vec<Address>> {
        self.writer()?;
        Ok(self.accounts.clone())
    }

    async fn get_balance(&self, address: Address) -> LeadResult<U256> {
        self.reader
            .get_balance(address)
            .await
            .map_err(LeadError::from_rpc)
    }

    async fn call(&self, from: Option<Address>, to: Address, input: Bytes) -> LeadResult<Bytes> {
        let mut tx = TransactionRequest::default().to(to).input(input.into());
        if let Some(from) = from {
            tx = tx.from(from);
        }
        self.reader.call(tx).await.map_err(LeadError::from_rpc)
    }

    async fn send_transaction(&self, from: Address, to: Address, input: Bytes) -> LeadResult<B256> {
        let tx = TransactionRequest::default()
            .from(from)
            .to(to)
            .input(input.into());
        let pending = self
            .writer()?
            .send_transaction(tx)
            .await
            .map_err(LeadError::from_rpc)?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: B256, confirmations: u64) -> LeadResult<Receipt> {
        let receipt = PendingTransactionBuilder::new(self.reader.root().clone(), tx_hash)
            .with_required_confirmations(confirmations)
            .get_receipt()
            .await
            .map_err(LeadError::from_pending)?;

        Ok(Receipt {
            tx_hash: receipt.transaction_hash(),
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
            success: receipt.status(),
        })
    }

    async fn watch_logs(
        &self,
        address: Address,
        topic0: B256,
    ) -> LeadResult<BoxStream<'static, LogEntry>> {
        let filter = Filter::new().address(address).event_signature(topic0);
        let poller = self
            .reader
            .watch_logs(&filter)
            .await
            .map_err(LeadError::from_rpc)?;

        let logs = poller
            .into_stream()
            .flat_map(stream::iter)
            .map(|log| LogEntry {
                address: log.address(),
                topics: log.topics().to_vec(),
                data: log.data().data.clone(),
                block_number: log.block_number,
                tx_hash: log.transaction_hash,
            });
        Ok(logs.boxed())
    }
}
