use crate::{BufMut, Header};
use alloc::{string::String, vec::Vec};

/// Returns the number of bytes a [`Header`] occupies for the given payload
/// length: one byte for payloads under 56 bytes, or `1 + n` for the
/// big-endian length-of-length encoding of longer payloads.
pub const fn length_of_length(payload_length: usize) -> usize {
    if payload_length < 56 {
        1
    } else {
        1 + (usize::BITS as usize / 8) - (payload_length.leading_zeros() as usize / 8)
    }
}

/// A value that can be encoded as an RLP item (a byte string or a list).
pub trait Encodable {
    /// Appends this value's RLP encoding to `out`.
    fn encode(&self, out: &mut dyn BufMut);

    /// Length in bytes of this value's complete RLP encoding.
    fn length(&self) -> usize;
}

/// Writes `bytes` as a canonical RLP byte string, applying the single-byte
/// self-encoding optimization when applicable.
pub fn encode_str(bytes: &[u8], out: &mut dyn BufMut) {
    if bytes.len() == 1 && bytes[0] < 0x80 {
        out.put_u8(bytes[0]);
    } else {
        Header { list: false, payload_length: bytes.len(), via_prefix: false }.encode(out);
        out.put_slice(bytes);
    }
}

/// Length of `bytes`'s canonical RLP byte-string encoding.
pub const fn str_length(bytes: &[u8]) -> usize {
    if bytes.len() == 1 && bytes[0] < 0x80 {
        1
    } else {
        length_of_length(bytes.len()) + bytes.len()
    }
}

/// Writes the RLP list header for a payload of `payload_length` bytes.
pub fn encode_list_header(payload_length: usize, out: &mut dyn BufMut) {
    Header { list: true, payload_length, via_prefix: false }.encode(out);
}

impl Encodable for bool {
    fn encode(&self, out: &mut dyn BufMut) {
        out.put_u8(if *self { 0x01 } else { 0x80 });
    }

    fn length(&self) -> usize {
        1
    }
}

macro_rules! impl_uint_encodable {
    ($($t:ty),+ $(,)?) => {$(
        impl Encodable for $t {
            fn encode(&self, out: &mut dyn BufMut) {
                let be = self.to_be_bytes();
                let lead = be.iter().take_while(|&&b| b == 0).count();
                encode_str(&be[lead..], out);
            }

            fn length(&self) -> usize {
                let be = self.to_be_bytes();
                let lead = be.iter().take_while(|&&b| b == 0).count();
                str_length(&be[lead..])
            }
        }
    )+};
}

impl_uint_encodable!(u16, u32, u64, u128, usize);

impl<const BITS: usize, const LIMBS: usize> Encodable for ruint::Uint<BITS, LIMBS> {
    fn encode(&self, out: &mut dyn BufMut) {
        let be = self.to_be_bytes_vec();
        let lead = be.iter().take_while(|&&b| b == 0).count();
        encode_str(&be[lead..], out);
    }

    fn length(&self) -> usize {
        let be = self.to_be_bytes_vec();
        let lead = be.iter().take_while(|&&b| b == 0).count();
        str_length(&be[lead..])
    }
}

impl Encodable for [u8] {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_str(self, out);
    }

    fn length(&self) -> usize {
        str_length(self)
    }
}

impl<const N: usize> Encodable for [u8; N] {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_str(self, out);
    }

    fn length(&self) -> usize {
        str_length(self)
    }
}

impl Encodable for Vec<u8> {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_str(self, out);
    }

    fn length(&self) -> usize {
        str_length(self)
    }
}

impl Encodable for str {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_str(self.as_bytes(), out);
    }

    fn length(&self) -> usize {
        str_length(self.as_bytes())
    }
}

impl Encodable for String {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_str(self.as_bytes(), out);
    }

    fn length(&self) -> usize {
        str_length(self.as_bytes())
    }
}

impl<T: Encodable> Encodable for Option<T> {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Some(value) => value.encode(out),
            None => out.put_u8(0x80),
        }
    }

    fn length(&self) -> usize {
        match self {
            Some(value) => value.length(),
            None => 1,
        }
    }
}

impl<T: Encodable> Encodable for &T {
    fn encode(&self, out: &mut dyn BufMut) {
        (**self).encode(out)
    }

    fn length(&self) -> usize {
        (**self).length()
    }
}

/// Encodes `values` as an RLP list, the behavior the blanket `Vec<T>`/`[T]`
/// impls below delegate to.
pub fn encode_list<T: Encodable>(values: &[T], out: &mut dyn BufMut) {
    let payload_length: usize = values.iter().map(Encodable::length).sum();
    encode_list_header(payload_length, out);
    for value in values {
        value.encode(out);
    }
}

/// Length of `values`'s RLP list encoding, header included.
pub fn list_length<T: Encodable>(values: &[T]) -> usize {
    let payload_length: usize = values.iter().map(Encodable::length).sum();
    length_of_length(payload_length) + payload_length
}

impl<T: Encodable> Encodable for Vec<T> {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_list(self, out)
    }

    fn length(&self) -> usize {
        list_length(self)
    }
}
