use crate::data::types::NetworkConfig;

/// Get a network preset by name.
pub fn get_network_config(name: &str) -> Option<NetworkConfig> {
    match name.to_lowercase().as_str() {
        "mumbai" | "polygon-mumbai" => Some(NetworkConfig {
            name: "Mumbai Polygon".to_string(),
            display_name: "Polygon Mumbai testnet".to_string(),
            chain_id: 0x13881,
            rpc_url: "https://rpc-mumbai.maticvigil.com".to_string(),
            symbol: "MATIC".to_string(),
        }),
        "amoy" | "polygon-amoy" => Some(NetworkConfig {
            name: "Amoy Polygon".to_string(),
            display_name: "Polygon Amoy testnet".to_string(),
            chain_id: 80002,
            rpc_url: "https://rpc-amoy.polygon.technology".to_string(),
            symbol: "POL".to_string(),
        }),
        "polygon" | "matic" => Some(NetworkConfig {
            name: "Polygon".to_string(),
            display_name: "Polygon mainnet".to_string(),
            chain_id: 137,
            rpc_url: "https://polygon-rpc.com".to_string(),
            symbol: "POL".to_string(),
        }),
        "ethereum" | "eth" | "mainnet" => Some(NetworkConfig {
            name: "Ethereum".to_string(),
            display_name: "Ethereum mainnet".to_string(),
            chain_id: 1,
            rpc_url: "https://eth.merkle.io".to_string(),
            symbol: "ETH".to_string(),
        }),
        "sepolia" => Some(NetworkConfig {
            name: "Sepolia".to_string(),
            display_name: "Sepolia testnet".to_string(),
            chain_id: 11155111,
            rpc_url: "https://rpc.sepolia.org".to_string(),
            symbol: "ETH".to_string(),
        }),
        "anvil" | "local" => Some(NetworkConfig {
            name: "Anvil".to_string(),
            display_name: "local Anvil node".to_string(),
            chain_id: 31337,
            rpc_url: "http://127.0.0.1:8545".to_string(),
            symbol: "ETH".to_string(),
        }),
        _ => None,
    }
}

/// Return a list of all supported network names.
pub fn supported_networks() -> Vec<&'static str> {
    vec!["mumbai", "amoy", "polygon", "ethereum", "sepolia", "anvil"]
}
