use crate::{BufMut, Error, Result};

const EMPTY_STRING_CODE: u8 = 0x80;
const STRING_LONG_CODE: u8 = 0xb7;
const LIST_SHORT_CODE: u8 = 0xc0;
const LIST_LONG_CODE: u8 = 0xf7;

/// A decoded (or to-be-encoded) RLP item header: whether it is a list, and
/// the length of its payload in bytes.
///
/// This does not itself represent the single-byte self-encoding of values
/// in `[0x00, 0x7f]` — that optimization is applied by the scalar
/// `Encodable`/`Decodable` impls before they ever construct a `Header`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// `true` if this is a list header, `false` if a string header.
    pub list: bool,
    /// Length of the payload that follows the header, in bytes.
    pub payload_length: usize,
    /// Set by [`Header::decode`] when an explicit prefix byte (as opposed
    /// to the single-byte self-encoding fast path) was consumed. Lets
    /// callers reject a length-1 string prefixed by `0x81` whose payload
    /// byte is itself `< 0x80` — that value should have used the bare
    /// single-byte form.
    pub(crate) via_prefix: bool,
}

impl Header {
    /// Builds a header for encoding: `via_prefix` only matters for headers
    /// produced by [`Header::decode`], so callers constructing one to encode
    /// (as transaction/access-list `Encodable` impls in other crates do)
    /// always get `false` here.
    pub const fn new(list: bool, payload_length: usize) -> Self {
        Self { list, payload_length, via_prefix: false }
    }

    /// Writes the header bytes (not the payload) to `out`.
    pub fn encode(&self, out: &mut dyn BufMut) {
        if self.payload_length < 56 {
            let code = if self.list { LIST_SHORT_CODE } else { EMPTY_STRING_CODE };
            out.put_u8(code + self.payload_length as u8);
        } else {
            let len_bytes = self.payload_length.to_be_bytes();
            let lead = len_bytes.iter().take_while(|&&b| b == 0).count();
            let len_of_len = len_bytes.len() - lead;
            let code = if self.list { LIST_LONG_CODE } else { STRING_LONG_CODE };
            out.put_u8(code + len_of_len as u8);
            out.put_slice(&len_bytes[lead..]);
        }
    }

    /// Length of the header itself, in bytes (not including the payload).
    pub const fn length(&self) -> usize {
        crate::length_of_length(self.payload_length)
    }

    /// Reads a header from the front of `buf`, advancing it past the
    /// header bytes. For single-byte strings (`buf[0] < 0x80`) `buf` is
    /// left untouched: the single byte is simultaneously the header and
    /// the entire payload, and callers slice it off themselves.
    pub fn decode(buf: &mut &[u8]) -> Result<Self> {
        let first = *buf.first().ok_or(Error::InputTooShort)?;

        if first < EMPTY_STRING_CODE {
            return Ok(Self { list: false, payload_length: 1, via_prefix: false });
        }

        *buf = &buf[1..];

        match first {
            EMPTY_STRING_CODE..=STRING_LONG_CODE => Ok(Self {
                list: false,
                payload_length: (first - EMPTY_STRING_CODE) as usize,
                via_prefix: true,
            }),
            b if b > STRING_LONG_CODE && b < LIST_SHORT_CODE => {
                let payload_length = Self::decode_long_length(buf, b - STRING_LONG_CODE)?;
                Ok(Self { list: false, payload_length, via_prefix: true })
            }
            LIST_SHORT_CODE..=LIST_LONG_CODE => Ok(Self {
                list: true,
                payload_length: (first - LIST_SHORT_CODE) as usize,
                via_prefix: true,
            }),
            b => {
                let payload_length = Self::decode_long_length(buf, b - LIST_LONG_CODE)?;
                Ok(Self { list: true, payload_length, via_prefix: true })
            }
        }
    }

    /// Reads the `len_of_len`-byte big-endian length that follows a
    /// long-form header tag, rejecting non-canonical encodings (leading
    /// zero byte, or a length that should have used the short form).
    fn decode_long_length(buf: &mut &[u8], len_of_len: u8) -> Result<usize> {
        let len_of_len = len_of_len as usize;
        if buf.len() < len_of_len {
            return Err(Error::InputTooShort);
        }
        let (len_bytes, rest) = buf.split_at(len_of_len);
        if len_bytes[0] == 0 {
            return Err(Error::NonCanonicalSize);
        }
        if len_of_len > core::mem::size_of::<usize>() {
            return Err(Error::Overflow);
        }
        let mut padded = [0u8; core::mem::size_of::<usize>()];
        padded[core::mem::size_of::<usize>() - len_of_len..].copy_from_slice(len_bytes);
        let len = usize::from_be_bytes(padded);
        if len < 56 {
            return Err(Error::NonCanonicalSize);
        }
        *buf = rest;
        Ok(len)
    }

    /// Slices `payload_length` payload bytes from `buf`, advancing it, after
    /// a header has already been decoded.
    pub(crate) fn take_payload<'a>(&self, buf: &mut &'a [u8]) -> Result<&'a [u8]> {
        if buf.len() < self.payload_length {
            return Err(Error::InputTooShort);
        }
        let (payload, rest) = buf.split_at(self.payload_length);
        *buf = rest;
        Ok(payload)
    }
}
