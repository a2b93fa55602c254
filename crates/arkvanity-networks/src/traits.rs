//! Network parameters and the address oracle trait

use std::fmt;

use arkvanity_crypto::encoding::EncodingError;
use arkvanity_crypto::secp256k1::Secp256k1Error;
use arkvanity_crypto::{MnemonicError, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure inside the oracle. The search treats every variant as fatal.
#[derive(Error, Debug)]
pub enum DeriveError {
    #[error("Passphrase generation failed: {0}")]
    Passphrase(#[from] MnemonicError),
    #[error("Key derivation failed: {0}")]
    Key(#[from] Secp256k1Error),
    #[error("Address encoding failed: {0}")]
    Encoding(#[from] EncodingError),
}

/// Address-derivation parameters for one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Display name (e.g. "mainnet")
    pub name: String,
    /// Base58Check version byte of addresses
    pub address_version: u8,
    /// Base58Check version byte of exported private keys
    pub wif: u8,
}

impl NetworkParams {
    pub fn new(name: impl Into<String>, address_version: u8, wif: u8) -> Self {
        Self {
            name: name.into(),
            address_version,
            wif,
        }
    }
}

impl fmt::Display for NetworkParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (address version {}, WIF {})",
            self.name, self.address_version, self.wif
        )
    }
}

/// One randomly generated identity evaluated against a network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub passphrase: String,
    pub address: String,
}

/// Produces candidate identities: a passphrase and the address it derives to.
///
/// Implementations are shared by every worker task, so they must not hold
/// mutable state; all randomness comes from the `rng` each task passes in.
pub trait AddressOracle: Send + Sync {
    /// Draw a fresh passphrase from `rng`
    fn generate_passphrase(&self, rng: &mut dyn RngCore) -> Result<String, DeriveError>;

    /// Derive the textual address of `passphrase` under `network`
    fn derive_address(&self, passphrase: &str, network: &NetworkParams) -> Result<String, DeriveError>;

    /// Export the private key of `passphrase` in the network's native format
    fn export_key(&self, passphrase: &str, network: &NetworkParams) -> Result<String, DeriveError>;

    /// Characters an address can contain (for difficulty estimates)
    fn valid_address_chars(&self) -> &'static str;

    /// Generate one candidate for a single network
    fn derive(&self, rng: &mut dyn RngCore, network: &NetworkParams) -> Result<Candidate, DeriveError> {
        let passphrase = self.generate_passphrase(rng)?;
        let address = self.derive_address(&passphrase, network)?;
        Ok(Candidate { passphrase, address })
    }
}
