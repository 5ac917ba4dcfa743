use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "lead-tui", about = "Terminal client for the Lead contract")]
pub struct Config {
    /// RPC endpoint URL (defaults to the network preset's endpoint)
    #[arg(short, long, env = "LEAD_TUI_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Hex private key of the wallet; without it no wallet is available
    #[arg(long, env = "LEAD_TUI_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// JSON file with the contract address, ABI signatures and network
    #[arg(long)]
    pub contract: Option<PathBuf>,

    /// Expected network (mumbai, amoy, polygon, ethereum, sepolia, anvil)
    #[arg(long)]
    pub network: Option<String>,

    /// Confirmations to wait for before a write counts as successful
    #[arg(long, default_value = "1")]
    pub confirmations: u64,

    /// Tick rate in milliseconds for UI refresh
    #[arg(long, default_value = "100")]
    pub tick_rate_ms: u64,

    /// Directory for the rotating log file
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(default_log_dir)
    }
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lead-tui")
        .join("logs")
}
