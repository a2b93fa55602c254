//! ArkVanity Crypto Primitives
//!
//! Low-level cryptographic operations for passphrase-derived addresses.

pub mod secp256k1;
pub mod hash;
pub mod encoding;
pub mod mnemonic;

pub use self::secp256k1::Secp256k1Keypair;
pub use self::mnemonic::{generate_mnemonic, validate_entropy_bits, MnemonicError};

// Re-export dependencies for use by other crates
pub use bs58;
pub use hex;
pub use rand_core::RngCore;
