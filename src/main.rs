mod app;
mod components;
mod config;
mod data;
mod error;
mod events;
mod logging;
mod shell;
mod theme;
mod utils;

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tokio::sync::mpsc;

use crate::app::App;
use crate::config::Config;
use crate::data::LeadService;
use crate::data::contract::ContractSpec;
use crate::data::provider::RpcClient;
use crate::data::types::ContractConfig;
use crate::data::wallet::WalletConnector;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::parse();
    let _log_guard = logging::init(&config.log_dir())?;

    let mut contract_config = match &config.contract {
        Some(path) => ContractConfig::load(path)?,
        None => ContractConfig::default(),
    };
    if let Some(network) = &config.network {
        contract_config.network = network.clone();
    }

    let network = data::chains::get_network_config(&contract_config.network).ok_or_else(|| {
        eyre!(
            "unknown network '{}' (supported: {})",
            contract_config.network,
            data::chains::supported_networks().join(", ")
        )
    })?;
    let rpc_url = config.rpc_url.clone().unwrap_or_else(|| network.rpc_url.clone());

    eprintln!("Connecting to {rpc_url}...");
    let client = RpcClient::connect(&rpc_url, config.private_key.as_deref()).await?;
    tracing::info!(network = %network.name, expected = network.chain_id, "expected network");

    let wallet = WalletConnector::new(Arc::new(client), network);
    let spec = ContractSpec::from_config(&contract_config)?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let service = LeadService::new(wallet, spec, config.confirmations, event_tx);
    let mut app = App::with_service(service, event_rx, config.tick_rate_ms);

    let terminal = ratatui::init();
    let result = app.run(terminal).await;
    ratatui::restore();

    result
}
