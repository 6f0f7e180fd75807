use alloc::string::String;
use alloy_primitives::SignatureError;

/// Errors constructing a [`crate::PrivateKeySigner`], deriving an HD node,
/// or converting between a mnemonic and its entropy/seed.
#[derive(Debug, thiserror::Error)]
pub enum LocalSignerError {
    /// An ECDSA operation on the underlying key failed.
    #[error(transparent)]
    Signature(#[from] SignatureError),
    /// The raw key material didn't parse as a valid secp256k1 scalar.
    #[error(transparent)]
    Ecdsa(#[from] k256::ecdsa::Error),
    /// A BIP-32 derivation step produced an invalid child key (`IL + k_par
    /// ≡ 0 (mod n)` or `IL ≥ n`); per BIP-32 the caller should retry with
    /// the next index, which [`crate::hdwallet::HdWalletNode::derive_child`]
    /// already does internally up to a small retry budget.
    #[error("child key derivation produced an invalid key after retrying")]
    InvalidChildKey,
    /// A hardened derivation step (`index >= 2^31`) was requested on a node
    /// with no private key.
    #[error("cannot derive a hardened child without a private key")]
    HardenedWithoutPrivateKey,
    /// A derivation path string wasn't in `m/44'/60'/0'/0/0` form.
    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),
    /// A mnemonic word wasn't found in the wordlist.
    #[error("mnemonic word not in wordlist: {0}")]
    InvalidMnemonicWord(String),
    /// The mnemonic's trailing checksum bits didn't match its entropy.
    #[error("invalid mnemonic checksum")]
    InvalidMnemonicChecksum,
    /// The mnemonic didn't have 12, 15, 18, 21, or 24 words.
    #[error("invalid mnemonic word count: {0}")]
    InvalidWordCount(usize),
    /// The entropy byte length didn't correspond to a valid mnemonic word
    /// count (16, 20, 24, 28, or 32 bytes).
    #[error("invalid entropy length: {0} bytes")]
    InvalidEntropyLength(usize),
}
