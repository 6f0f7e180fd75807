//! Canonical Recursive Length Prefix (RLP) encoding and decoding.
//!
//! The wire format is the byte-oriented, length-prefixed scheme described in
//! the Ethereum yellow paper appendix B: every value is either a byte
//! string or a list of values, encoded with the shortest possible length
//! prefix. Decoders reject non-canonical encodings (see [`Error`]) to
//! resist the malleability attacks that motivated strict RLP in the first
//! place.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod decode;
mod encode;
mod error;
mod header;

pub use bytes::BufMut;
pub use decode::Decodable;
pub use encode::{length_of_length, Encodable};
pub use error::{Error, Result};
pub use header::Header;

use alloc::vec::Vec;

/// Fully materializes `value`'s RLP encoding into a fresh, owned buffer.
///
/// This is the convenience entry point mentioned in §4.1; callers with a
/// pre-allocated buffer should use [`Encodable::encode`] directly against a
/// `&mut dyn BufMut` to avoid the extra allocation.
pub fn encode<T: Encodable>(value: T) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.length());
    value.encode(&mut out);
    out
}

/// Decodes a complete RLP item of type `T` from `bytes`, requiring that the
/// entire input is consumed.
pub fn decode_exact<T: Decodable>(bytes: &[u8]) -> Result<T> {
    let mut buf = bytes;
    let value = T::decode(&mut buf)?;
    if !buf.is_empty() {
        return Err(Error::UnexpectedLength);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_the_empty_string() {
        assert_eq!(encode(String::new()), hex::decode("80").unwrap());
    }

    #[test]
    fn encodes_dog() {
        assert_eq!(encode(String::from("dog")), hex::decode("83646f67").unwrap());
    }

    #[test]
    fn encodes_the_empty_list() {
        assert_eq!(encode(Vec::<u64>::new()), hex::decode("c0").unwrap());
    }

    #[test]
    fn encodes_cat_dog_list() {
        let list = vec![String::from("cat"), String::from("dog")];
        assert_eq!(encode(list), hex::decode("c88363617483646f67").unwrap());
    }

    #[test]
    fn zero_encodes_as_empty_string() {
        assert_eq!(encode(0u64), hex::decode("80").unwrap());
    }

    #[test]
    fn small_integer_self_encodes() {
        assert_eq!(encode(15u64), hex::decode("0f").unwrap());
        assert_eq!(encode(1024u64), hex::decode("820400").unwrap());
    }

    #[test]
    fn roundtrips_u64_and_string() {
        let n = 0xdead_beefu64;
        assert_eq!(decode_exact::<u64>(&encode(n)).unwrap(), n);

        let s = String::from("hello rlp");
        assert_eq!(decode_exact::<String>(&encode(s.clone())).unwrap(), s);
    }

    #[test]
    fn rejects_non_canonical_length_prefix() {
        // 0x81 0x00 encodes a 1-byte string with value 0x00, which must be
        // encoded as the bare byte `0x00` instead.
        let bytes = [0x81, 0x00];
        assert_eq!(decode_exact::<Vec<u8>>(&bytes), Err(Error::NonCanonicalSize));
    }

    #[test]
    fn rejects_leading_zero_in_long_length() {
        // Length-of-length byte claims a long string, but the length field
        // itself has a leading zero byte.
        let bytes = [0xb8, 0x00];
        assert_eq!(decode_exact::<Vec<u8>>(&bytes), Err(Error::NonCanonicalSize));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = encode(42u64);
        bytes.push(0xff);
        assert_eq!(decode_exact::<u64>(&bytes), Err(Error::UnexpectedLength));
    }
}
