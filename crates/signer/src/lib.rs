//! The signing seam other crates program against: [`Signer`] and
//! [`SignerSync`] describe "can produce an ECDSA signature over a digest
//! or message" without committing to how the key material is stored or
//! derived. [`crate::SignerSync`] carries the two primitive operations
//! every backend implements; [`Signer`] adds the address/chain-id
//! bookkeeping a transaction pipeline needs on top.
//!
//! `alloy-signer-local` is the one concrete implementation in this
//! workspace (`PrivateKeySigner`), but a hardware wallet or remote signer
//! would implement the same traits without this crate changing.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;

pub use error::Error;

use alloy_primitives::{eip191_hash_message, Address, ChainId, Signature, B256};

/// The narrow, synchronous signing primitive: given a 32-byte digest or an
/// arbitrary message, produce a [`Signature`]. No network I/O, no retries
/// — per the cores' single-threaded, pure design, every implementation is
/// expected to return immediately.
#[auto_impl::auto_impl(&, &mut, Box, Arc)]
pub trait SignerSync {
    /// Signs a 32-byte digest directly, with no prefixing.
    fn sign_hash_sync(&self, hash: &B256) -> Result<Signature, Error>;

    /// Signs a message after applying the EIP-191
    /// `"\x19Ethereum Signed Message:\n" + len + message` prefix.
    fn sign_message_sync(&self, message: &[u8]) -> Result<Signature, Error> {
        self.sign_hash_sync(&eip191_hash_message(message))
    }

    /// The chain id this signer is pinned to, if any. `None` means the
    /// signer will sign for any chain id a caller supplies.
    fn chain_id_sync(&self) -> Option<ChainId>;
}

/// A [`SignerSync`] that also knows its own address and can be pinned to a
/// chain id, the shape a transaction pipeline needs to fill in `from` and
/// apply EIP-155 without the caller re-deriving the address on every call.
#[auto_impl::auto_impl(&, &mut, Box, Arc)]
pub trait Signer: SignerSync {
    /// The address this signer signs as.
    fn address(&self) -> Address;

    /// The chain id this signer is pinned to, if any.
    fn chain_id(&self) -> Option<ChainId> {
        self.chain_id_sync()
    }

    /// Pins this signer to a chain id, or clears the pin with `None`.
    fn set_chain_id(&mut self, chain_id: Option<ChainId>);
}
