//! Core Ethereum consensus types built on top of [`alloy_eips`] and
//! [`alloy_rlp`]: the five typed-transaction envelopes, the `Signed<T>`
//! wrapper that ties a transaction to its signature and cached hash, and the
//! event log codec that turns an [`alloy_json_abi::Event`] plus argument
//! values into topics and `data`.
//!
//! This crate does not talk to a node: no RPC client, no mempool, no state
//! access. It only knows how to serialize, hash, sign and recover.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod log;
mod signed;
pub mod transaction;

pub use log::{Log, LogCodecError, LogData};
pub use signed::{EncodedSigned, Signed};
pub use transaction::{
    eip1559::TxEip1559,
    eip2930::TxEip2930,
    eip4844::{TxEip4844, TxEip4844Variant, TxEip4844WithSidecar},
    eip7702::TxEip7702,
    envelope::TxEnvelope,
    legacy::TxLegacy,
    SignableTransaction, Transaction, TxType,
};
