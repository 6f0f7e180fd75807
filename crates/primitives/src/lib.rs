//! Core Ethereum primitive types.
//!
//! This crate provides the fixed-width byte types, integer aliases, hex
//! helpers and the ECDSA [`Signature`] type shared by the ABI, RLP, eips,
//! signer and consensus crates. It has no async, I/O or transport
//! dependencies: every type here is a plain value.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bytes;
mod fixed;
#[cfg(feature = "rlp")]
mod rlp_impls;
mod signature;
pub mod utils;

pub use crate::bytes::Bytes;
pub use fixed::{Address, AddressError, TxKind, B256};
pub use signature::{to_eip155_v, Parity, Signature, SignatureError};
pub use utils::{eip191_hash_message, keccak256};

/// Chain identifier, as used by EIP-155 and onward.
pub type ChainId = u64;

/// 256-bit unsigned integer, backed by [`ruint::Uint`].
pub type U256 = ruint::Uint<256, 4>;

/// 64-bit unsigned integer in the same representation as the other `Uint`
/// aliases, used for parsing raw `v` values out of RLP/JSON.
pub type U64 = ruint::Uint<64, 1>;

pub use ruint::Uint;

/// Re-exported hex codec, matching the `hex` crate's public surface so
/// downstream crates can write `alloy_primitives::hex::encode(..)`.
pub mod hex {
    pub use hex::{decode, encode, FromHexError};

    /// Decodes a hex string, accepting an optional `0x` prefix.
    pub fn decode_prefixed<T: AsRef<str>>(s: T) -> Result<alloc::vec::Vec<u8>, FromHexError> {
        let s = s.as_ref();
        let s = s.strip_prefix("0x").unwrap_or(s);
        hex::decode(s)
    }
}
