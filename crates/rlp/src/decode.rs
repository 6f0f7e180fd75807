use crate::{Error, Header, Result};
use alloc::{string::String, vec::Vec};

/// A value that can be reconstructed from a canonical RLP item.
pub trait Decodable: Sized {
    /// Decodes a single item from the front of `buf`, advancing it past the
    /// bytes consumed. Trailing bytes are left for the caller.
    fn decode(buf: &mut &[u8]) -> Result<Self>;
}

/// Reads a canonical RLP byte string from the front of `buf`, rejecting
/// list headers and non-canonical single-byte encodings.
pub fn decode_str<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8]> {
    let header = Header::decode(buf)?;
    if header.list {
        return Err(Error::UnexpectedList);
    }
    let via_prefix = header.via_prefix;
    let payload = header.take_payload(buf)?;
    if via_prefix && payload.len() == 1 && payload[0] < 0x80 {
        return Err(Error::NonCanonicalSize);
    }
    Ok(payload)
}

/// Reads an RLP list header from the front of `buf`, returning the payload
/// bytes that make up the list body.
pub fn decode_list_payload<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8]> {
    let header = Header::decode(buf)?;
    if !header.list {
        return Err(Error::UnexpectedString);
    }
    header.take_payload(buf)
}

impl Decodable for bool {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let bytes = decode_str(buf)?;
        match bytes {
            [] => Ok(false),
            [0x01] => Ok(true),
            _ => Err(Error::Custom("invalid RLP boolean")),
        }
    }
}

macro_rules! impl_uint_decodable {
    ($($t:ty),+ $(,)?) => {$(
        impl Decodable for $t {
            fn decode(buf: &mut &[u8]) -> Result<Self> {
                let bytes = decode_str(buf)?;
                if bytes.len() > core::mem::size_of::<$t>() {
                    return Err(Error::Overflow);
                }
                if !bytes.is_empty() && bytes[0] == 0 {
                    return Err(Error::NonCanonicalSize);
                }
                let mut padded = [0u8; core::mem::size_of::<$t>()];
                padded[core::mem::size_of::<$t>() - bytes.len()..].copy_from_slice(bytes);
                Ok(<$t>::from_be_bytes(padded))
            }
        }
    )+};
}

impl_uint_decodable!(u16, u32, u64, u128, usize);

impl<const BITS: usize, const LIMBS: usize> Decodable for ruint::Uint<BITS, LIMBS> {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let bytes = decode_str(buf)?;
        if !bytes.is_empty() && bytes[0] == 0 {
            return Err(Error::NonCanonicalSize);
        }
        Self::try_from_be_slice(bytes).ok_or(Error::Overflow)
    }
}

impl<const N: usize> Decodable for [u8; N] {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let bytes = decode_str(buf)?;
        bytes.try_into().map_err(|_| Error::UnexpectedFixedLength { expected: N, got: bytes.len() })
    }
}

impl Decodable for Vec<u8> {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        Ok(decode_str(buf)?.to_vec())
    }
}

impl Decodable for String {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let bytes = decode_str(buf)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| Error::Custom("invalid UTF-8 in RLP string"))
    }
}

impl<T: Decodable> Decodable for Option<T> {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        if let Some(&0x80) = buf.first() {
            let mut rest = *buf;
            rest = &rest[1..];
            *buf = rest;
            return Ok(None);
        }
        T::decode(buf).map(Some)
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let mut payload = decode_list_payload(buf)?;
        let mut values = Vec::new();
        while !payload.is_empty() {
            values.push(T::decode(&mut payload)?);
        }
        Ok(values)
    }
}

/// Decodes exactly `N` list elements of type `T`, rejecting lists of any
/// other length. Used for fixed-arity tuples (e.g. access-list entries)
/// that don't fit the `[T; N]`-as-byte-string impl above.
pub fn decode_array<T: Decodable, const N: usize>(buf: &mut &[u8]) -> Result<[T; N]>
where
    T: Copy + Default,
{
    let mut payload = decode_list_payload(buf)?;
    let mut out = [T::default(); N];
    for slot in out.iter_mut() {
        *slot = T::decode(&mut payload)?;
    }
    if !payload.is_empty() {
        return Err(Error::ListLengthMismatch { expected: N, got: N + 1 });
    }
    Ok(out)
}
