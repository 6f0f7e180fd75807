//! Types defined by individual Ethereum Improvement Proposals that the
//! transaction pipeline needs but that don't belong in `alloy-primitives`:
//! the typed-transaction envelope tag (EIP-2718), access lists (EIP-2930),
//! blob transaction metadata (EIP-4844), and authorization lists (EIP-7702).

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod eip2718;
pub mod eip2930;
pub mod eip4844;
pub mod eip7702;

pub use eip2930::{AccessList, AccessListItem};
pub use eip7702::{Authorization, SignedAuthorization};
