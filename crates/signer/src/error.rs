use alloc::string::String;
use alloy_primitives::SignatureError;

/// Errors surfaced by a [`crate::Signer`]/[`crate::SignerSync`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying ECDSA operation failed.
    #[error(transparent)]
    Signature(#[from] SignatureError),
    /// A backend-specific error (e.g. HD derivation, mnemonic decoding)
    /// with no shared variant in this enum.
    #[error("{0}")]
    Other(String),
    /// The signer was asked to sign for a chain id it is pinned to a
    /// different one than, or vice versa.
    #[error("signer is pinned to chain id {signer}, but {requested} was requested")]
    ChainIdMismatch {
        /// The chain id the signer is pinned to.
        signer: u64,
        /// The chain id the caller asked for.
        requested: u64,
    },
    /// A signer implementation that only supports a subset of operations
    /// (e.g. no EIP-712 typed-data support) was asked for one it can't do.
    #[error("unsupported signer operation: {0}")]
    UnsupportedOperation(&'static str),
}
