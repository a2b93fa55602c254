//! Hash functions for address derivation

use sha2::{Sha256, Digest};
use ripemd::Ripemd160;

/// SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Double SHA-256 (Base58Check checksums)
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// RIPEMD-160 hash
///
/// ARK-style addresses hash the compressed public key with RIPEMD-160 directly,
/// without the SHA-256 pass Bitcoin's HASH160 applies first.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().into()
}
