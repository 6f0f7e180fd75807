//! RLP impls for the primitive types, gated behind the `rlp` feature so
//! this crate stays usable without pulling in the codec for callers that
//! only need the value types (e.g. the ABI crates).

use crate::{Address, Bytes, Parity, Signature, TxKind, B256, U256};
use alloy_rlp::{BufMut, Decodable, Encodable, Result};

impl Encodable for Bytes {
    fn encode(&self, out: &mut dyn BufMut) {
        self.as_slice().encode(out)
    }

    fn length(&self) -> usize {
        self.as_slice().length()
    }
}

impl Decodable for Bytes {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        Ok(Self::from(<alloc::vec::Vec<u8>>::decode(buf)?))
    }
}

impl Encodable for Address {
    fn encode(&self, out: &mut dyn BufMut) {
        self.as_slice().encode(out)
    }

    fn length(&self) -> usize {
        self.as_slice().length()
    }
}

impl Decodable for Address {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let bytes = <[u8; 20]>::decode(buf)?;
        Ok(Self::new(bytes))
    }
}

impl Encodable for B256 {
    fn encode(&self, out: &mut dyn BufMut) {
        self.as_slice().encode(out)
    }

    fn length(&self) -> usize {
        self.as_slice().length()
    }
}

impl Decodable for B256 {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let bytes = <[u8; 32]>::decode(buf)?;
        Ok(Self::new(bytes))
    }
}

impl Encodable for TxKind {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Self::Create => out.put_u8(0x80),
            Self::Call(addr) => addr.encode(out),
        }
    }

    fn length(&self) -> usize {
        match self {
            Self::Create => 1,
            Self::Call(addr) => addr.length(),
        }
    }
}

impl Decodable for TxKind {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        if let Some(&0x80) = buf.first() {
            *buf = &buf[1..];
            return Ok(Self::Create);
        }
        Ok(Self::Call(Address::decode(buf)?))
    }
}

/// RLP-encodes `v` as whichever representation this `Parity` actually
/// carries: a bare `0`/`1` for typed-transaction/EIP-191 parity, the
/// legacy `27`/`28`, or the full EIP-155-inflated value. Callers that know
/// which form they want (e.g. a typed transaction always wants the bare
/// bit) should normalize with [`Signature::with_parity_bool`] first.
fn encode_v(v: &Parity, out: &mut dyn BufMut) {
    match *v {
        Parity::Parity(b) => (b as u64).encode(out),
        Parity::NonEip155(b) => (27 + b as u64).encode(out),
        Parity::Eip155(v) => v.encode(out),
    }
}

fn v_length(v: &Parity) -> usize {
    match *v {
        Parity::Parity(b) => (b as u64).length(),
        Parity::NonEip155(b) => (27 + b as u64).length(),
        Parity::Eip155(v) => v.length(),
    }
}

impl Signature {
    /// Length of this signature's `v`, `r`, `s` triple as it would appear
    /// appended to a transaction's RLP field list (no surrounding header).
    pub fn rlp_vrs_len(&self) -> usize {
        v_length(&self.v()) + self.r().length() + self.s().length()
    }

    /// Appends this signature's `v`, `r`, `s` fields to `out`, in that
    /// order, with no list header of their own.
    pub fn write_rlp_vrs(&self, out: &mut dyn BufMut) {
        encode_v(&self.v(), out);
        self.r().encode(out);
        self.s().encode(out);
    }

    /// Reads a trailing `v`, `r`, `s` triple from the front of `buf`, the
    /// inverse of [`Signature::write_rlp_vrs`].
    pub fn decode_rlp_vrs(buf: &mut &[u8]) -> Result<Self> {
        let v = Parity::from(u64::decode(buf)?);
        let r = U256::decode(buf)?;
        let s = U256::decode(buf)?;
        Ok(Self::from_rs_and_parity(r, s, v).expect("Parity is always a valid conversion target"))
    }
}
