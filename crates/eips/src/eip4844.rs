//! [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) blob transaction constants and sidecar
//! types.
//!
//! KZG commitment/proof *verification* is out of scope here (it needs a
//! trusted-setup file and the `c-kzg` FFI binding, neither of which this
//! crate pulls in); blobs, commitments and proofs are carried as opaque,
//! fixed-size byte arrays so a sidecar can still be built, RLP-encoded and
//! hashed into `blob_versioned_hashes`.

use alloc::vec::Vec;
use alloy_primitives::{keccak256, B256};
use alloy_rlp::{BufMut, Decodable, Encodable, Header};

/// Bytes per raw blob: 4096 field elements of 32 bytes each.
pub const BYTES_PER_BLOB: usize = 131_072;
/// Bytes in a KZG commitment (a compressed G1 point).
pub const BYTES_PER_COMMITMENT: usize = 48;
/// Bytes in a KZG proof (a compressed G1 point).
pub const BYTES_PER_PROOF: usize = 48;
/// Field elements per blob.
pub const FIELD_ELEMENTS_PER_BLOB: usize = 4_096;
/// Gas charged per blob, independent of `GASLIMIT`.
pub const DATA_GAS_PER_BLOB: u64 = 131_072;
/// Maximum blobs a single transaction may carry.
pub const MAX_BLOBS_PER_TRANSACTION: usize = 6;
/// The byte that a versioned hash's first byte must equal: "KZG to
/// versioned hash" version 1.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;

/// An opaque, fixed-size 48-byte value: a KZG commitment or proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bytes48(pub [u8; BYTES_PER_COMMITMENT]);

impl Bytes48 {
    /// Wraps a raw 48-byte array.
    pub const fn new(bytes: [u8; BYTES_PER_COMMITMENT]) -> Self {
        Self(bytes)
    }
}

impl Encodable for Bytes48 {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0.encode(out)
    }

    fn length(&self) -> usize {
        self.0.length()
    }
}

impl Decodable for Bytes48 {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self(Decodable::decode(buf)?))
    }
}

/// A single opaque 131072-byte blob of field-element data.
#[derive(Clone)]
pub struct Blob(pub alloc::boxed::Box<[u8; BYTES_PER_BLOB]>);

impl Blob {
    /// Wraps a raw blob buffer.
    pub fn new(bytes: alloc::boxed::Box<[u8; BYTES_PER_BLOB]>) -> Self {
        Self(bytes)
    }
}

impl core::fmt::Debug for Blob {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Blob").field(&alloy_primitives::hex::encode(&self.0[..32])).finish()
    }
}

impl PartialEq for Blob {
    fn eq(&self, other: &Self) -> bool {
        self.0[..] == other.0[..]
    }
}
impl Eq for Blob {}

/// Derives the versioned hash for a KZG commitment: `0x01 ||
/// keccak256(commitment)[1..]`.
pub fn kzg_to_versioned_hash(commitment: &Bytes48) -> B256 {
    let mut hash = keccak256(commitment.0);
    hash.0[0] = VERSIONED_HASH_VERSION_KZG;
    hash
}

/// The blobs, commitments and proofs that accompany an [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844)
/// transaction on the wire, kept separate from the transaction body itself
/// (only `blob_versioned_hashes` is part of the signed payload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobTransactionSidecar {
    /// The blobs themselves.
    pub blobs: Vec<Blob>,
    /// KZG commitments to each blob, one per entry in `blobs`.
    pub commitments: Vec<Bytes48>,
    /// KZG proofs for each commitment, one per entry in `blobs`.
    pub proofs: Vec<Bytes48>,
}

impl BlobTransactionSidecar {
    /// Creates a new sidecar from matching-length blob/commitment/proof
    /// vectors.
    pub fn new(blobs: Vec<Blob>, commitments: Vec<Bytes48>, proofs: Vec<Bytes48>) -> Self {
        Self { blobs, commitments, proofs }
    }

    /// Derives the versioned hashes for each commitment, in order.
    pub fn versioned_hashes(&self) -> impl Iterator<Item = B256> + '_ {
        self.commitments.iter().map(kzg_to_versioned_hash)
    }

    fn fields_len(&self) -> usize {
        self.blobs.length() + self.commitments.length() + self.proofs.length()
    }

    /// Encodes the sidecar's own RLP representation: `[blobs,
    /// commitments, proofs]`. Appended after the signed transaction body
    /// when gossiping a "transaction with sidecar" per EIP-4844 §Networking.
    pub fn encode_inner(&self, out: &mut dyn BufMut) {
        Header::new(true, self.fields_len()).encode(out);
        self.blobs.encode(out);
        self.commitments.encode(out);
        self.proofs.encode(out);
    }

    /// Length of [`Self::encode_inner`]'s output.
    pub fn encoded_inner_len(&self) -> usize {
        let payload_length = self.fields_len();
        alloy_rlp::length_of_length(payload_length) + payload_length
    }

    /// Decodes a sidecar written by [`Self::encode_inner`].
    pub fn decode_inner(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        Ok(Self {
            blobs: Decodable::decode(buf)?,
            commitments: Decodable::decode(buf)?,
            proofs: Decodable::decode(buf)?,
        })
    }
}

impl Encodable for Blob {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0[..].encode(out)
    }

    fn length(&self) -> usize {
        self.0[..].length()
    }
}

impl Decodable for Blob {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let bytes: Vec<u8> = Decodable::decode(buf)?;
        let boxed: alloc::boxed::Box<[u8; BYTES_PER_BLOB]> = bytes
            .into_boxed_slice()
            .try_into()
            .map_err(|_| alloy_rlp::Error::Custom("blob was not exactly BYTES_PER_BLOB bytes"))?;
        Ok(Self(boxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_hash_has_kzg_version_byte() {
        let commitment = Bytes48::new([0u8; BYTES_PER_COMMITMENT]);
        let hash = kzg_to_versioned_hash(&commitment);
        assert_eq!(hash.0[0], VERSIONED_HASH_VERSION_KZG);
    }

    #[test]
    fn bytes48_roundtrips_through_rlp() {
        let commitment = Bytes48::new([0x42u8; BYTES_PER_COMMITMENT]);
        let encoded = alloy_rlp::encode(&commitment);
        let decoded: Bytes48 = alloy_rlp::decode_exact(&encoded).unwrap();
        assert_eq!(decoded, commitment);
    }
}
