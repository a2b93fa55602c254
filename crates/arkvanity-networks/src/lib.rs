//! ArkVanity Network Adapters
//!
//! Address-derivation parameter sets and the oracle that turns a passphrase
//! into an address under them.

pub mod traits;
pub mod ark;

// Re-exports
pub use traits::{AddressOracle, Candidate, DeriveError, NetworkParams};
pub use ark::{ArkOracle, DEFAULT_ENTROPY_BITS};

/// Get all built-in networks
pub fn all_networks() -> Vec<NetworkParams> {
    vec![ark::mainnet(), ark::devnet()]
}

/// Get a built-in network by name
pub fn get_network(name: &str) -> Option<NetworkParams> {
    match name.to_lowercase().as_str() {
        "mainnet" | "main" | "ark" => Some(ark::mainnet()),
        "devnet" | "dev" | "dark" => Some(ark::devnet()),
        _ => None,
    }
}
