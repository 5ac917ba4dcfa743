use std::sync::Arc;

use alloy::primitives::{Address, U256};

use crate::data::provider::ChainClient;
use crate::data::types::NetworkConfig;
use crate::error::{LeadError, LeadResult};

/// A signing capability bound to one authorized account.
#[derive(Clone)]
pub struct Signer {
    pub client: Arc<dyn ChainClient>,
    pub address: Address,
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer").field("address", &self.address).finish()
    }
}

/// Wallet access gated on one expected network.
pub struct WalletConnector {
    client: Arc<dyn ChainClient>,
    network: NetworkConfig,
}

impl WalletConnector {
    pub fn new(client: Arc<dyn ChainClient>, network: NetworkConfig) -> Self {
        Self { client, network }
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn is_available(&self) -> bool {
        self.client.has_signer()
    }

    pub async fn request_accounts(&self) -> LeadResult<Vec<Address>> {
        if !self.is_available() {
            return Err(LeadError::WalletUnavailable);
        }
        self.client.request_accounts().await
    }

    pub fn current_chain_id(&self) -> u64 {
        self.client.chain_id()
    }

    pub fn read_provider(&self) -> Arc<dyn ChainClient> {
        Arc::clone(&self.client)
    }

    /// Signing handle for the first authorized account.
    pub async fn signer(&self) -> LeadResult<Signer> {
        let accounts = self.request_accounts().await?;
        let address = accounts
            .first()
            .copied()
            .ok_or(LeadError::WalletUnavailable)?;
        Ok(Signer {
            client: Arc::clone(&self.client),
            address,
        })
    }

    /// Request account access, refusing when the wallet sits on another chain.
    ///
    /// The chain check runs before the account request, so a mismatch never
    /// prompts the wallet. No network switch is attempted.
    pub async fn connect(&self) -> LeadResult<Vec<Address>> {
        if !self.is_available() {
            return Err(LeadError::WalletUnavailable);
        }

        let actual = self.current_chain_id();
        if actual != self.network.chain_id {
            return Err(LeadError::WrongNetwork {
                expected: self.network.chain_id,
                actual,
                message: self.network.mismatch_message(),
            });
        }

        let accounts = self.request_accounts().await?;
        tracing::info!(?accounts, chain_id = actual, "wallet connected");
        Ok(accounts)
    }

    pub async fn balance_of(&self, account: Address) -> LeadResult<U256> {
        self.read_provider().get_balance(account).await
    }
}
