//! secp256k1 keypairs derived from passphrases

use k256::{PublicKey, SecretKey};
use thiserror::Error;

use crate::hash::sha256;

#[derive(Error, Debug)]
pub enum Secp256k1Error {
    #[error("Invalid private key")]
    InvalidPrivateKey,
}

/// A secp256k1 keypair
#[derive(Clone)]
pub struct Secp256k1Keypair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl Secp256k1Keypair {
    /// Create from raw 32-byte private key
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, Secp256k1Error> {
        let secret_key = SecretKey::from_bytes(bytes.into())
            .map_err(|_| Secp256k1Error::InvalidPrivateKey)?;
        let public_key = secret_key.public_key();
        Ok(Self { secret_key, public_key })
    }

    /// Brain-wallet style derivation: the private key is SHA-256 of the passphrase
    pub fn from_passphrase(passphrase: &str) -> Result<Self, Secp256k1Error> {
        Self::from_bytes(&sha256(passphrase.as_bytes()))
    }

    /// Get the private key as bytes
    pub fn private_key_bytes(&self) -> [u8; 32] {
        self.secret_key.to_bytes().into()
    }

    /// Get the compressed public key (33 bytes: 0x02/0x03 || x)
    pub fn public_key_compressed(&self) -> [u8; 33] {
        use k256::elliptic_curve::sec1::ToEncodedPoint;
        let point = self.public_key.to_encoded_point(true);
        let mut result = [0u8; 33];
        result.copy_from_slice(point.as_bytes());
        result
    }
}
