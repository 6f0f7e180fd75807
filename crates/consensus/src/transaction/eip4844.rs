//! [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) blob transactions, type byte `0x03`.

use crate::{signed::EncodedSigned, SignableTransaction, Signed, Transaction, TxType};
use alloc::vec::Vec;
use alloy_eips::eip2930::AccessList;
use alloy_eips::eip4844::{BlobTransactionSidecar, DATA_GAS_PER_BLOB};
use alloy_primitives::{keccak256, Bytes, ChainId, Signature, TxKind, B256, U256};
use alloy_rlp::{length_of_length, BufMut, Decodable, Encodable, Header};

/// An [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) transaction, either standalone (as
/// returned for historical transactions) or paired with its [`BlobTransactionSidecar`] (as sent
/// during the gossip stage and via `eth_sendRawTransaction`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxEip4844Variant {
    /// A standalone transaction with blob hashes and max blob fee, sidecar omitted.
    TxEip4844(TxEip4844),
    /// A transaction paired with the blob data, commitments and proofs it references.
    TxEip4844WithSidecar(TxEip4844WithSidecar),
}

impl From<TxEip4844> for TxEip4844Variant {
    fn from(tx: TxEip4844) -> Self {
        Self::TxEip4844(tx)
    }
}

impl From<(TxEip4844, BlobTransactionSidecar)> for TxEip4844Variant {
    fn from((tx, sidecar): (TxEip4844, BlobTransactionSidecar)) -> Self {
        Self::TxEip4844WithSidecar(TxEip4844WithSidecar::from_tx_and_sidecar(tx, sidecar))
    }
}

impl TxEip4844Variant {
    /// Access to the inner [`TxEip4844`], regardless of whether a sidecar is attached.
    pub const fn tx(&self) -> &TxEip4844 {
        match self {
            Self::TxEip4844(tx) => tx,
            Self::TxEip4844WithSidecar(tx) => tx.tx(),
        }
    }

    pub(crate) fn fields_len(&self) -> usize {
        self.tx().fields_len()
    }

    /// The RLP payload length inside the tx-type byte: transaction fields, signature, and (for
    /// the wrapped form) the sidecar's `[blobs, commitments, proofs]` sublist.
    fn signed_payload_len(&self, signature: &Signature) -> usize {
        let mut len = self.fields_len() + signature.rlp_vrs_len();
        if let Self::TxEip4844WithSidecar(tx) = self {
            len += tx.sidecar().encoded_inner_len();
        }
        len
    }

    /// Encodes as `0x03 || rlp([tx_fields, signature])`, with the sidecar's `[blobs, commitments,
    /// proofs]` folded into that same list when present — the network-transport "wrapped form" is
    /// not a second, outer RLP layer, just one more item in the same list.
    pub(crate) fn encode_with_signature(&self, signature: &Signature, out: &mut dyn BufMut) {
        let payload_length = self.signed_payload_len(signature);
        out.put_u8(TxType::Eip4844 as u8);
        Header::new(true, payload_length).encode(out);
        match self {
            Self::TxEip4844(tx) => {
                tx.encode_fields(out);
                signature.write_rlp_vrs(out);
            }
            Self::TxEip4844WithSidecar(tx) => {
                tx.tx().encode_fields(out);
                signature.write_rlp_vrs(out);
                tx.sidecar().encode_inner(out);
            }
        }
    }
}

impl Transaction for TxEip4844Variant {
    fn chain_id(&self) -> Option<ChainId> {
        Some(self.tx().chain_id)
    }

    fn nonce(&self) -> u64 {
        self.tx().nonce
    }

    fn gas_limit(&self) -> u64 {
        self.tx().gas_limit
    }

    fn gas_price(&self) -> Option<u128> {
        None
    }

    fn max_fee_per_gas(&self) -> Option<u128> {
        Some(self.tx().max_fee_per_gas)
    }

    fn max_priority_fee_per_gas(&self) -> Option<u128> {
        Some(self.tx().max_priority_fee_per_gas)
    }

    fn max_fee_per_blob_gas(&self) -> Option<u128> {
        Some(self.tx().max_fee_per_blob_gas)
    }

    fn to(&self) -> TxKind {
        self.tx().to
    }

    fn value(&self) -> U256 {
        self.tx().value
    }

    fn input(&self) -> &[u8] {
        &self.tx().input
    }

    fn access_list(&self) -> Option<&AccessList> {
        Some(&self.tx().access_list)
    }

    fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        Some(&self.tx().blob_versioned_hashes)
    }

    fn tx_type(&self) -> TxType {
        TxType::Eip4844
    }
}

impl SignableTransaction for TxEip4844Variant {
    fn set_chain_id(&mut self, chain_id: ChainId) {
        match self {
            Self::TxEip4844(tx) => tx.chain_id = chain_id,
            Self::TxEip4844WithSidecar(tx) => tx.tx.chain_id = chain_id,
        }
    }

    fn encode_for_signing(&self, out: &mut dyn BufMut) {
        self.tx().encode_for_signing(out);
    }

    fn payload_len_for_signature(&self) -> usize {
        self.tx().payload_len_for_signature()
    }

    fn into_signed(self, signature: Signature) -> Signed<Self> {
        // Typed transactions carry a bare y-parity bit; drop any EIP-155 chain id baked into `v`.
        let signature = signature.with_parity_bool();
        let mut buf = Vec::with_capacity(1 + self.signed_payload_len(&signature));
        self.encode_with_signature(&signature, &mut buf);
        let hash = keccak256(&buf);
        Signed::new_unchecked(self, signature, hash)
    }
}

impl EncodedSigned for TxEip4844Variant {
    fn encode_signed(&self, signature: &Signature, out: &mut dyn BufMut) {
        self.encode_with_signature(signature, out);
    }

    fn encoded_signed_len(&self, signature: &Signature) -> usize {
        let payload_length = self.signed_payload_len(signature);
        1 + length_of_length(payload_length) + payload_length
    }

    /// Tries to decode a trailing [`BlobTransactionSidecar`]; falls back to the
    /// sidecar-less historical-transaction form if that fails.
    fn decode_signed(buf: &mut &[u8]) -> alloy_rlp::Result<Signed<Self>> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        let tx = TxEip4844::decode_inner(buf)?;
        let signature = Signature::decode_rlp_vrs(buf)?;

        // A historical transaction has no sidecar; one freshly gossiped or submitted via
        // `eth_sendRawTransaction` does. Try the sidecar first and fall back if it's absent.
        let variant = match BlobTransactionSidecar::decode_inner(buf) {
            Ok(sidecar) => {
                Self::TxEip4844WithSidecar(TxEip4844WithSidecar::from_tx_and_sidecar(tx, sidecar))
            }
            Err(_) => Self::TxEip4844(tx),
        };

        let mut encoded = Vec::with_capacity(1 + header.payload_length);
        variant.encode_with_signature(&signature, &mut encoded);
        let hash = keccak256(&encoded);
        Ok(Signed::new_unchecked(variant, signature, hash))
    }
}

/// An [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) transaction without its
/// [`BlobTransactionSidecar`]: the form returned for historical transactions, where only
/// `blob_versioned_hashes` (not the blob data itself) survives in the signed payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TxEip4844 {
    /// Replay-protection chain id, mandatory for typed transactions.
    pub chain_id: ChainId,
    /// Sender's transaction count at the time this transaction was created.
    pub nonce: u64,
    /// Maximum gas this transaction may consume.
    pub gas_limit: u64,
    /// Also known as `GasFeeCap`: the absolute ceiling this sender will pay per unit gas.
    pub max_fee_per_gas: u128,
    /// Also known as `GasTipCap`: the priority fee paid to the block builder.
    pub max_priority_fee_per_gas: u128,
    /// The recipient. Blob transactions cannot create contracts, but the field stays `TxKind`
    /// to match the sibling envelopes; constructing one with `TxKind::Create` is a caller error.
    pub to: TxKind,
    /// Wei transferred to `to`.
    pub value: U256,
    /// Addresses and storage keys pre-warmed for this transaction.
    pub access_list: AccessList,
    /// Versioned hashes of the blobs this transaction references.
    pub blob_versioned_hashes: Vec<B256>,
    /// Also known as `BlobGasFeeCap`: the absolute ceiling paid per unit blob gas.
    pub max_fee_per_blob_gas: u128,
    /// Call data.
    pub input: Bytes,
}

impl TxEip4844 {
    /// The per-gas amount actually paid, given the block's `base_fee`.
    pub const fn effective_gas_price(&self, base_fee: Option<u64>) -> u128 {
        match base_fee {
            None => self.max_fee_per_gas,
            Some(base_fee) => {
                let tip = self.max_fee_per_gas.saturating_sub(base_fee as u128);
                if tip > self.max_priority_fee_per_gas {
                    self.max_priority_fee_per_gas + base_fee as u128
                } else {
                    self.max_fee_per_gas
                }
            }
        }
    }

    /// Total gas charged for carrying this transaction's blobs.
    pub fn blob_gas(&self) -> u64 {
        self.blob_versioned_hashes.len() as u64 * DATA_GAS_PER_BLOB
    }

    pub(crate) fn fields_len(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.max_priority_fee_per_gas.length()
            + self.max_fee_per_gas.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.0.length()
            + self.access_list.length()
            + self.max_fee_per_blob_gas.length()
            + self.blob_versioned_hashes.length()
    }

    pub(crate) fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.max_priority_fee_per_gas.encode(out);
        self.max_fee_per_gas.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.0.encode(out);
        self.access_list.encode(out);
        self.max_fee_per_blob_gas.encode(out);
        self.blob_versioned_hashes.encode(out);
    }

    pub(crate) fn decode_inner(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            chain_id: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
            max_priority_fee_per_gas: Decodable::decode(buf)?,
            max_fee_per_gas: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            access_list: Decodable::decode(buf)?,
            max_fee_per_blob_gas: Decodable::decode(buf)?,
            blob_versioned_hashes: Decodable::decode(buf)?,
        })
    }

    pub(crate) fn encode_for_signing(&self, out: &mut dyn BufMut) {
        out.put_u8(TxType::Eip4844 as u8);
        Header::new(true, self.fields_len()).encode(out);
        self.encode_fields(out);
    }

    pub(crate) fn payload_len_for_signature(&self) -> usize {
        let payload_length = self.fields_len();
        1 + length_of_length(payload_length) + payload_length
    }
}

impl Transaction for TxEip4844 {
    fn chain_id(&self) -> Option<ChainId> {
        Some(self.chain_id)
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    fn gas_price(&self) -> Option<u128> {
        None
    }

    fn max_fee_per_gas(&self) -> Option<u128> {
        Some(self.max_fee_per_gas)
    }

    fn max_priority_fee_per_gas(&self) -> Option<u128> {
        Some(self.max_priority_fee_per_gas)
    }

    fn max_fee_per_blob_gas(&self) -> Option<u128> {
        Some(self.max_fee_per_blob_gas)
    }

    fn to(&self) -> TxKind {
        self.to
    }

    fn value(&self) -> U256 {
        self.value
    }

    fn input(&self) -> &[u8] {
        &self.input
    }

    fn access_list(&self) -> Option<&AccessList> {
        Some(&self.access_list)
    }

    fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        Some(&self.blob_versioned_hashes)
    }

    fn tx_type(&self) -> TxType {
        TxType::Eip4844
    }
}

impl Encodable for TxEip4844 {
    fn encode(&self, out: &mut dyn BufMut) {
        Header::new(true, self.fields_len()).encode(out);
        self.encode_fields(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.fields_len();
        length_of_length(payload_length) + payload_length
    }
}

impl Decodable for TxEip4844 {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if header.payload_length > buf.len() {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        Self::decode_inner(buf)
    }
}

/// A [`TxEip4844`] paired with the [`BlobTransactionSidecar`] it references. This is the form
/// sent over the wire during the gossip stage and via `eth_sendRawTransaction`; historical
/// transactions returned by a node omit the sidecar and decode as a bare [`TxEip4844`] instead.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TxEip4844WithSidecar {
    tx: TxEip4844,
    sidecar: BlobTransactionSidecar,
}

impl TxEip4844WithSidecar {
    /// Pairs a transaction with its sidecar.
    pub const fn from_tx_and_sidecar(tx: TxEip4844, sidecar: BlobTransactionSidecar) -> Self {
        Self { tx, sidecar }
    }

    /// The wrapped transaction.
    pub const fn tx(&self) -> &TxEip4844 {
        &self.tx
    }

    /// The wrapped sidecar.
    pub const fn sidecar(&self) -> &BlobTransactionSidecar {
        &self.sidecar
    }

    /// Discards the sidecar, keeping only the transaction.
    pub fn into_tx(self) -> TxEip4844 {
        self.tx
    }

    /// Discards the transaction, keeping only the sidecar.
    pub fn into_sidecar(self) -> BlobTransactionSidecar {
        self.sidecar
    }

    /// Splits this value back into its transaction and sidecar.
    pub fn into_parts(self) -> (TxEip4844, BlobTransactionSidecar) {
        (self.tx, self.sidecar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_eips::eip4844::{Blob, Bytes48};
    use alloy_primitives::Address;

    fn sample_tx() -> TxEip4844 {
        TxEip4844 {
            chain_id: 1,
            nonce: 7,
            gas_limit: 30_000,
            max_fee_per_gas: 100,
            max_priority_fee_per_gas: 2,
            to: TxKind::Call(Address::new([0x22; 20])),
            value: U256::from(1_u64),
            access_list: Default::default(),
            blob_versioned_hashes: alloc::vec![B256::new([0x01; 32])],
            max_fee_per_blob_gas: 1,
            input: Bytes::new(),
        }
    }

    #[test]
    fn standalone_roundtrips_without_sidecar() {
        let tx = TxEip4844Variant::TxEip4844(sample_tx());
        let signed = tx.into_signed(Signature::test_signature());

        let mut encoded = Vec::new();
        signed.tx().encode_signed(signed.signature(), &mut encoded);
        let decoded = TxEip4844Variant::decode_signed(&mut &encoded[..]).unwrap();
        assert_eq!(decoded.tx(), signed.tx());
        assert!(matches!(decoded.tx(), TxEip4844Variant::TxEip4844(_)));
    }

    #[test]
    fn with_sidecar_roundtrips_and_recovers_sidecar() {
        let sidecar = BlobTransactionSidecar::new(
            alloc::vec![Blob::new(alloc::boxed::Box::new([0x11; alloy_eips::eip4844::BYTES_PER_BLOB]))],
            alloc::vec![Bytes48::new([0x22; 48])],
            alloc::vec![Bytes48::new([0x33; 48])],
        );
        let tx: TxEip4844Variant = (sample_tx(), sidecar.clone()).into();
        let signed = tx.into_signed(Signature::test_signature());

        let mut encoded = Vec::new();
        signed.tx().encode_signed(signed.signature(), &mut encoded);
        let decoded = TxEip4844Variant::decode_signed(&mut &encoded[..]).unwrap();
        match decoded.tx() {
            TxEip4844Variant::TxEip4844WithSidecar(tx) => {
                assert_eq!(tx.sidecar(), &sidecar);
            }
            TxEip4844Variant::TxEip4844(_) => panic!("expected sidecar to roundtrip"),
        }
    }

    #[test]
    fn unsigned_serialize_without_blobs_matches_reference_bytes() {
        use core::str::FromStr;

        let tx = TxEip4844 {
            chain_id: 1,
            nonce: 69,
            gas_limit: 0,
            max_fee_per_gas: 2_000_000_000,
            max_priority_fee_per_gas: 2_000_000_000,
            to: TxKind::Call(
                Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap(),
            ),
            value: U256::from(1_000_000_000_000_000_000u64),
            access_list: Default::default(),
            blob_versioned_hashes: alloc::vec![B256::ZERO],
            max_fee_per_blob_gas: 0,
            input: Bytes::new(),
        };

        let mut encoded = Vec::new();
        tx.encode_for_signing(&mut encoded);
        assert_eq!(
            alloy_primitives::hex::encode(&encoded),
            "03f8500145847735940084773594008094f39fd6e51aad88f6f4ce6ab8827279cfffb92266880de0b6b3a764000080c080e1a00000000000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn blob_gas_scales_with_hash_count() {
        let mut tx = sample_tx();
        tx.blob_versioned_hashes = alloc::vec![B256::ZERO, B256::ZERO, B256::ZERO];
        assert_eq!(tx.blob_gas(), 3 * DATA_GAS_PER_BLOB);
    }
}
