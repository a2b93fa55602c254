//! ARK-style passphrase wallets
//!
//! Passphrase: BIP39 mnemonic. Private key: SHA-256(passphrase).
//! Address: Base58Check(version || RIPEMD-160(compressed_pubkey)).

use crate::traits::{AddressOracle, DeriveError, NetworkParams};
use arkvanity_crypto::{
    encoding::{base58check_encode, wif_encode, BASE58_ALPHABET},
    generate_mnemonic,
    hash::ripemd160,
    validate_entropy_bits, RngCore, Secp256k1Keypair,
};

/// Default entropy for generated passphrases (12 words)
pub const DEFAULT_ENTROPY_BITS: usize = 128;

const ARK_MAINNET_VERSION: u8 = 23; // A prefix
const ARK_DEVNET_VERSION: u8 = 30; // D prefix
const ARK_WIF_VERSION: u8 = 170;

/// Mainnet parameters
pub fn mainnet() -> NetworkParams {
    NetworkParams::new("mainnet", ARK_MAINNET_VERSION, ARK_WIF_VERSION)
}

/// Devnet parameters
pub fn devnet() -> NetworkParams {
    NetworkParams::new("devnet", ARK_DEVNET_VERSION, ARK_WIF_VERSION)
}

/// Oracle generating BIP39 passphrases of a fixed entropy strength
#[derive(Debug, Clone, Copy)]
pub struct ArkOracle {
    entropy_bits: usize,
}

impl ArkOracle {
    /// Create an oracle, rejecting entropy strengths BIP39 cannot encode
    pub fn new(entropy_bits: usize) -> Result<Self, DeriveError> {
        validate_entropy_bits(entropy_bits)?;
        Ok(Self { entropy_bits })
    }

    pub fn entropy_bits(&self) -> usize {
        self.entropy_bits
    }
}

impl Default for ArkOracle {
    fn default() -> Self {
        Self {
            entropy_bits: DEFAULT_ENTROPY_BITS,
        }
    }
}

impl AddressOracle for ArkOracle {
    fn generate_passphrase(&self, rng: &mut dyn RngCore) -> Result<String, DeriveError> {
        Ok(generate_mnemonic(rng, self.entropy_bits)?)
    }

    fn derive_address(&self, passphrase: &str, network: &NetworkParams) -> Result<String, DeriveError> {
        let keypair = Secp256k1Keypair::from_passphrase(passphrase)?;
        let h160 = ripemd160(&keypair.public_key_compressed());
        Ok(base58check_encode(network.address_version, &h160))
    }

    fn export_key(&self, passphrase: &str, network: &NetworkParams) -> Result<String, DeriveError> {
        let keypair = Secp256k1Keypair::from_passphrase(passphrase)?;
        Ok(wif_encode(&keypair.private_key_bytes(), network.wif, true))
    }

    fn valid_address_chars(&self) -> &'static str {
        BASE58_ALPHABET
    }
}
