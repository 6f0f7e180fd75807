//! Solidity contract ABI metadata: the typed JSON ABI item tree
//! (`Function`, `Event`, `Error`, ...) and the human-readable signature
//! parser that builds it without a `.json` artifact.
//!
//! This crate stops at the metadata layer: `Param::ty`/`components` carry
//! type information as strings, not an executable type tree. Resolving
//! those into something you can encode/decode values against is
//! `alloy-dyn-abi`'s job.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod items;
mod param;
pub mod parser;

pub use items::{AbiItem, Constructor, Error, Event, Fallback, Function, Receive, StateMutability};
pub use param::{EventParam, Param};
pub use parser::{parse_item, parse_items, ParseError};
