//! BIP-39 mnemonic ↔ entropy ↔ seed conversion.

use crate::{error::LocalSignerError, wordlist::ENGLISH_WORDLIST};
use alloc::{string::String, vec::Vec};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::{Digest, Sha256, Sha512};
use unicode_normalization::UnicodeNormalization;

const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];
const PBKDF2_ROUNDS: u32 = 2048;
const SEED_LEN: usize = 64;

/// Validates `words.len()` is a legal BIP-39 mnemonic length, looks each
/// word up in [`ENGLISH_WORDLIST`], and checks the trailing checksum bits
/// against SHA-256 of the recovered entropy.
pub fn to_entropy(words: &[&str]) -> Result<Vec<u8>, LocalSignerError> {
    if !VALID_WORD_COUNTS.contains(&words.len()) {
        return Err(LocalSignerError::InvalidWordCount(words.len()));
    }
    let mut bits = alloc::vec![false; words.len() * 11];
    for (i, word) in words.iter().enumerate() {
        let index = ENGLISH_WORDLIST
            .iter()
            .position(|w| *w == *word)
            .ok_or_else(|| LocalSignerError::InvalidMnemonicWord((*word).into()))?;
        for b in 0..11 {
            bits[i * 11 + b] = (index >> (10 - b)) & 1 == 1;
        }
    }

    let entropy_bits = words.len() * 11 * 32 / 33;
    let checksum_bits = words.len() * 11 - entropy_bits;

    let mut entropy = alloc::vec![0u8; entropy_bits / 8];
    for (i, byte) in entropy.iter_mut().enumerate() {
        for b in 0..8 {
            if bits[i * 8 + b] {
                *byte |= 1 << (7 - b);
            }
        }
    }

    let hash = Sha256::digest(&entropy);
    for b in 0..checksum_bits {
        let expected = (hash[b / 8] >> (7 - b % 8)) & 1 == 1;
        if bits[entropy_bits + b] != expected {
            return Err(LocalSignerError::InvalidMnemonicChecksum);
        }
    }
    Ok(entropy)
}

/// Inverse of [`to_entropy`]: appends the SHA-256 checksum bits and
/// renders the space-joined phrase.
pub fn from_entropy(entropy: &[u8]) -> Result<String, LocalSignerError> {
    let entropy_bits = entropy.len() * 8;
    if ![16, 20, 24, 28, 32].contains(&entropy.len()) {
        return Err(LocalSignerError::InvalidEntropyLength(entropy.len()));
    }
    let checksum_bits = entropy_bits / 32;
    let hash = Sha256::digest(entropy);

    let total_bits = entropy_bits + checksum_bits;
    let mut bits = alloc::vec![false; total_bits];
    for i in 0..entropy_bits {
        bits[i] = (entropy[i / 8] >> (7 - i % 8)) & 1 == 1;
    }
    for b in 0..checksum_bits {
        bits[entropy_bits + b] = (hash[b / 8] >> (7 - b % 8)) & 1 == 1;
    }

    let words = bits
        .chunks(11)
        .map(|chunk| {
            let index = chunk.iter().fold(0usize, |acc, bit| (acc << 1) | (*bit as usize));
            ENGLISH_WORDLIST[index]
        })
        .collect::<Vec<_>>();
    Ok(words.join(" "))
}

/// Derives the 64-byte BIP-32 seed from a mnemonic phrase and optional
/// passphrase: `PBKDF2-HMAC-SHA512(phrase, salt = "mnemonic" + passphrase,
/// 2048 rounds)`, after NFKD-normalizing both inputs per BIP-39.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> [u8; SEED_LEN] {
    let normalized_phrase: String = phrase.nfkd().collect();
    let mut salt: String = "mnemonic".into();
    salt.extend(passphrase.nfkd());

    let mut seed = [0u8; SEED_LEN];
    pbkdf2::<Hmac<Sha512>>(
        normalized_phrase.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ROUNDS,
        &mut seed,
    )
    .expect("PBKDF2-HMAC-SHA512 output length is always valid");
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entropy_roundtrips_through_mnemonic() {
        let entropy = [0u8; 16];
        let phrase = from_entropy(&entropy).unwrap();
        let words: Vec<&str> = phrase.split(' ').collect();
        assert_eq!(words.len(), 12);
        let recovered = to_entropy(&words).unwrap();
        assert_eq!(recovered, entropy);
    }

    #[test]
    fn rejects_unknown_word() {
        let words = ["abandon"; 11]
            .into_iter()
            .chain(core::iter::once("notaword"))
            .collect::<Vec<_>>();
        let err = to_entropy(&words).unwrap_err();
        assert!(matches!(err, LocalSignerError::InvalidMnemonicWord(_)));
    }

    #[test]
    fn rejects_bad_word_count() {
        let words = ["abandon"; 13];
        let err = to_entropy(&words).unwrap_err();
        assert!(matches!(err, LocalSignerError::InvalidWordCount(13)));
    }
}
