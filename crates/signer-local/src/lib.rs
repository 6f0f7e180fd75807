//! A local secp256k1 signer, BIP-32 HD derivation, and BIP-39 mnemonics.
//!
//! [`PrivateKeySigner`] is the concrete [`alloy_signer::Signer`]
//! implementation this workspace ships: it holds a raw private key in
//! memory and signs with it directly. [`MnemonicBuilder`] is the
//! ergonomic entry point most callers reach for, turning a word count,
//! language (English only, for now), derivation path and optional
//! passphrase into a [`PrivateKeySigner`].

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
pub mod hdwallet;
pub mod mnemonic;
mod wordlist;

pub use error::LocalSignerError;
pub use hdwallet::{EunuchNode, HdWalletNode, HARDENED_OFFSET};
pub use wordlist::ENGLISH_WORDLIST;

use alloc::string::{String, ToString};
use alloy_primitives::{Address, ChainId, Signature, B256};
use alloy_signer::{Error as SignerError, Signer, SignerSync};
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;

/// A signer backed by a single secp256k1 private key held in memory.
///
/// Signing uses `k256`'s RFC 6979 deterministic-nonce ECDSA
/// (`sign_prehash_recoverable`), then normalizes to low-S form per
/// [EIP-2](https://eips.ethereum.org/EIPS/eip-2) — the same
/// canonicalization [`alloy_primitives::Signature::normalize_s`] performs,
/// applied here so `r`/`s` are already canonical before the caller ever
/// sees them.
#[derive(Clone)]
pub struct PrivateKeySigner {
    signing_key: SigningKey,
    address: Address,
    chain_id: Option<ChainId>,
}

impl core::fmt::Debug for PrivateKeySigner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrivateKeySigner")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl PrivateKeySigner {
    /// Generates a new signer from system randomness.
    pub fn random() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        Self::from_signing_key(signing_key)
    }

    /// Builds a signer from a 32-byte private key.
    pub fn from_bytes(bytes: &B256) -> Result<Self, LocalSignerError> {
        let signing_key = SigningKey::from_slice(bytes.as_slice())?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Builds a signer from an [`HdWalletNode`]'s private key, as produced
    /// by [`HdWalletNode::derive_path`] or a [`MnemonicBuilder`].
    pub fn from_hd_node(node: &HdWalletNode) -> Result<Self, LocalSignerError> {
        Self::from_bytes(&node.private_key())
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = Address::from_public_key(signing_key.verifying_key());
        Self { signing_key, address, chain_id: None }
    }

    /// The raw 32-byte private key.
    pub fn to_bytes(&self) -> B256 {
        B256::from_slice(&self.signing_key.to_bytes())
    }

    /// Signs a 32-byte digest directly, with no EIP-191/EIP-712 prefixing.
    pub fn sign_hash(&self, hash: &B256) -> Result<Signature, LocalSignerError> {
        let (sig, recid) = self.signing_key.sign_prehash_recoverable(hash.as_slice())?;
        let sig = sig.normalize_s().unwrap_or(sig);
        Ok(Signature::from_bytes_and_parity(&sig.to_bytes(), recid.to_byte() as u64)?)
    }
}

impl SignerSync for PrivateKeySigner {
    fn sign_hash_sync(&self, hash: &B256) -> Result<Signature, SignerError> {
        self.sign_hash(hash).map_err(|e| match e {
            LocalSignerError::Signature(e) => SignerError::Signature(e),
            LocalSignerError::Ecdsa(e) => SignerError::Signature(e.into()),
            other => SignerError::Other(other.to_string()),
        })
    }

    fn chain_id_sync(&self) -> Option<ChainId> {
        self.chain_id
    }
}

impl Signer for PrivateKeySigner {
    fn address(&self) -> Address {
        self.address
    }

    fn set_chain_id(&mut self, chain_id: Option<ChainId>) {
        self.chain_id = chain_id;
    }
}

/// Builds a [`PrivateKeySigner`] from a BIP-39 mnemonic: word count,
/// optional explicit phrase, derivation path, and passphrase.
#[derive(Debug, Default)]
pub struct MnemonicBuilder {
    phrase: Option<String>,
    derivation_path: String,
    passphrase: String,
}

impl MnemonicBuilder {
    /// Starts a builder with the default Ethereum derivation path
    /// (`m/44'/60'/0'/0/0`) and no passphrase.
    pub fn new() -> Self {
        Self { phrase: None, derivation_path: "m/44'/60'/0'/0/0".into(), passphrase: String::new() }
    }

    /// Sets the mnemonic phrase directly (space-separated words).
    pub fn phrase<T: Into<String>>(mut self, phrase: T) -> Self {
        self.phrase = Some(phrase.into());
        self
    }

    /// Overrides the derivation path (default `m/44'/60'/0'/0/0`).
    pub fn derivation_path<T: Into<String>>(mut self, path: T) -> Self {
        self.derivation_path = path.into();
        self
    }

    /// Sets the BIP-39 passphrase (default empty).
    pub fn passphrase<T: Into<String>>(mut self, passphrase: T) -> Self {
        self.passphrase = passphrase.into();
        self
    }

    /// Builds the signer, validating the phrase's checksum and deriving
    /// down `derivation_path` from the BIP-32 master node.
    pub fn build(self) -> Result<PrivateKeySigner, LocalSignerError> {
        let phrase = self
            .phrase
            .ok_or_else(|| LocalSignerError::InvalidDerivationPath("no phrase set".to_string()))?;
        let words: alloc::vec::Vec<&str> = phrase.split_whitespace().collect();
        mnemonic::to_entropy(&words)?;
        let seed = mnemonic::mnemonic_to_seed(&phrase, &self.passphrase);
        let master = HdWalletNode::from_seed(&seed);
        let node = master.derive_path(&self.derivation_path)?;
        PrivateKeySigner::from_hd_node(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;

    #[test]
    fn sign_hash_is_deterministic() {
        let signer = PrivateKeySigner::from_bytes(&B256::from([0x11u8; 32])).unwrap();
        let hash = B256::from([0x22u8; 32]);
        let sig1 = signer.sign_hash(&hash).unwrap();
        let sig2 = signer.sign_hash(&hash).unwrap();
        assert_eq!(sig1, sig2);
        assert!(sig1.is_low_s());
    }

    #[test]
    fn address_matches_recovered_signer() {
        let signer = PrivateKeySigner::from_bytes(&B256::from([0x11u8; 32])).unwrap();
        let hash = B256::from([0x33u8; 32]);
        let sig = signer.sign_hash(&hash).unwrap();
        let recovered = sig.recover_address_from_prehash(hash).unwrap();
        assert_eq!(recovered, signer.address());
    }

    #[test]
    fn mnemonic_builder_produces_stable_address() {
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon \
                      abandon abandon abandon about";
        let signer1 = MnemonicBuilder::new().phrase(phrase).build().unwrap();
        let signer2 = MnemonicBuilder::new().phrase(phrase).build().unwrap();
        assert_eq!(signer1.address(), signer2.address());
    }

    #[test]
    fn mnemonic_builder_rejects_bad_checksum() {
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon \
                      abandon abandon abandon abandon";
        let err = MnemonicBuilder::new().phrase(phrase).build().unwrap_err();
        assert!(matches!(err, LocalSignerError::InvalidMnemonicChecksum));
    }

    #[test]
    fn hex_roundtrip_private_key() {
        let signer = PrivateKeySigner::from_bytes(&B256::from([0x44u8; 32])).unwrap();
        assert_eq!(hex::encode(signer.to_bytes().0), "44".repeat(32));
    }

    #[test]
    fn signed_message_recovers_to_known_address() {
        use core::str::FromStr;

        let key = B256::from_str(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let signer = PrivateKeySigner::from_bytes(&key).unwrap();
        assert_eq!(
            signer.address(),
            Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap()
        );

        let sig = signer.sign_message_sync(b"Hello World!").unwrap();
        let recovered = sig.recover_address_from_msg(b"Hello World!").unwrap();
        assert_eq!(recovered, signer.address());
    }
}
