//! BIP39 passphrase generation

use rand_core::RngCore;
use thiserror::Error;

/// Smallest entropy accepted for a generated passphrase (12 words)
pub const MIN_ENTROPY_BITS: usize = 128;
/// Largest entropy accepted for a generated passphrase (24 words)
pub const MAX_ENTROPY_BITS: usize = 256;

#[derive(Error, Debug)]
pub enum MnemonicError {
    #[error("Entropy must be a multiple of 32 between 128 and 256 bits, got {0}")]
    InvalidEntropy(usize),
    #[error("Mnemonic encoding failed: {0}")]
    Encoding(String),
}

/// Check an entropy strength before any passphrase is generated
pub fn validate_entropy_bits(bits: usize) -> Result<(), MnemonicError> {
    if !(MIN_ENTROPY_BITS..=MAX_ENTROPY_BITS).contains(&bits) || bits % 32 != 0 {
        return Err(MnemonicError::InvalidEntropy(bits));
    }
    Ok(())
}

/// Generate an English BIP39 mnemonic from `bits` of fresh entropy
pub fn generate_mnemonic(rng: &mut dyn RngCore, bits: usize) -> Result<String, MnemonicError> {
    validate_entropy_bits(bits)?;

    let mut entropy = [0u8; MAX_ENTROPY_BITS / 8];
    let entropy = &mut entropy[..bits / 8];
    rng.fill_bytes(entropy);

    let mnemonic = bip39::Mnemonic::from_entropy(entropy)
        .map_err(|e| MnemonicError::Encoding(e.to_string()))?;
    Ok(mnemonic.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_word_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        for (bits, words) in [(128, 12), (160, 15), (192, 18), (224, 21), (256, 24)] {
            let phrase = generate_mnemonic(&mut rng, bits).unwrap();
            assert_eq!(phrase.split(' ').count(), words, "{} bits", bits);
        }
    }

    #[test]
    fn test_generated_phrase_parses_back() {
        let mut rng = StdRng::seed_from_u64(42);
        let phrase = generate_mnemonic(&mut rng, 128).unwrap();
        assert!(bip39::Mnemonic::parse_normalized(&phrase).is_ok());
    }

    #[test]
    fn test_independent_draws_differ() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = generate_mnemonic(&mut rng, 128).unwrap();
        let b = generate_mnemonic(&mut rng, 128).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_entropy() {
        assert!(validate_entropy_bits(128).is_ok());
        assert!(validate_entropy_bits(256).is_ok());
        assert!(validate_entropy_bits(96).is_err());
        assert!(validate_entropy_bits(130).is_err());
        assert!(validate_entropy_bits(288).is_err());

        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            generate_mnemonic(&mut rng, 100),
            Err(MnemonicError::InvalidEntropy(100))
        ));
    }
}
