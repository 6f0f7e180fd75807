//! Runtime-resolved Solidity ABI encoding and decoding: [`DynSolType`] +
//! [`DynSolValue`] implement the head/tail layout against a type tree
//! built from [`alloy_json_abi`]'s `Param`s rather than compile-time
//! generics, so a caller that only has a signature string at runtime can
//! still encode/decode calls.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
mod options;
mod ty;
mod value;

pub use error::{DynAbiError, TypeParseError};
pub use options::{DecodeOptions, Endianness};
pub use ty::DynSolType;
pub use value::{
    decode_function_call, decode_params, encode_function_call, encode_params, encode_single,
    DynSolValue,
};
