//! [EIP-2930](https://eips.ethereum.org/EIPS/eip-2930) transactions: a legacy-shaped body plus an
//! upfront [`AccessList`], type byte `0x01`.

use crate::{signed::EncodedSigned, SignableTransaction, Signed, Transaction, TxType};
use alloc::vec::Vec;
use alloy_eips::eip2718::EIP2930_TX_TYPE_ID;
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{keccak256, Bytes, ChainId, Signature, TxKind, U256};
use alloy_rlp::{length_of_length, BufMut, Decodable, Encodable, Header};

/// Transaction with an [`AccessList`] ([EIP-2930](https://eips.ethereum.org/EIPS/eip-2930)).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TxEip2930 {
    /// Replay-protection chain id, mandatory for typed transactions.
    pub chain_id: ChainId,
    /// Sender's transaction count at the time this transaction was created.
    pub nonce: u64,
    /// Wei paid per unit of gas.
    pub gas_price: u128,
    /// Maximum gas this transaction may consume.
    pub gas_limit: u64,
    /// Contract creation when absent.
    pub to: TxKind,
    /// Wei transferred to `to`, or the endowment for contract creation.
    pub value: U256,
    /// Addresses and storage keys pre-warmed for this transaction.
    pub access_list: AccessList,
    /// Init code (contract creation) or call data.
    pub input: Bytes,
}

impl TxEip2930 {
    fn fields_len(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.0.length()
            + self.access_list.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.0.encode(out);
        self.access_list.encode(out);
    }

    fn decode_inner(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            chain_id: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
            gas_price: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            access_list: Decodable::decode(buf)?,
        })
    }

    fn encode_with_signature_fields(&self, signature: &Signature, out: &mut dyn BufMut) {
        let payload_length = self.fields_len() + signature.rlp_vrs_len();
        Header::new(true, payload_length).encode(out);
        self.encode_fields(out);
        signature.write_rlp_vrs(out);
    }

    fn payload_len_with_signature_without_header(&self, signature: &Signature) -> usize {
        let payload_length = self.fields_len() + signature.rlp_vrs_len();
        1 + length_of_length(payload_length) + payload_length
    }

    fn payload_len_with_signature(&self, signature: &Signature) -> usize {
        let len = self.payload_len_with_signature_without_header(signature);
        length_of_length(len) + len
    }

    /// Parses a signed [EIP-2930](https://eips.ethereum.org/EIPS/eip-2930) transaction body (no
    /// leading type byte).
    pub fn decode_signed_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Signed<Self>> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        let tx = Self::decode_inner(buf)?;
        let signature = Signature::decode_rlp_vrs(buf)?;
        Ok(tx.into_signed(signature))
    }
}

impl Transaction for TxEip2930 {
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
        Some(self.gas_price)
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

    fn tx_type(&self) -> TxType {
        TxType::Eip2930
    }
}

impl SignableTransaction for TxEip2930 {
    fn set_chain_id(&mut self, chain_id: ChainId) {
        self.chain_id = chain_id;
    }

    fn encode_for_signing(&self, out: &mut dyn BufMut) {
        out.put_u8(EIP2930_TX_TYPE_ID);
        Header::new(true, self.fields_len()).encode(out);
        self.encode_fields(out);
    }

    fn payload_len_for_signature(&self) -> usize {
        let payload_length = self.fields_len();
        1 + length_of_length(payload_length) + payload_length
    }

    fn into_signed(self, signature: Signature) -> Signed<Self> {
        // EIP-2930 signatures carry a bare y-parity bit, never an EIP-155 `v`.
        let signature = signature.with_parity_bool();
        let mut buf = Vec::with_capacity(1 + self.fields_len() + signature.rlp_vrs_len());
        buf.put_u8(TxType::Eip2930 as u8);
        self.encode_with_signature_fields(&signature, &mut buf);
        let hash = keccak256(&buf);
        Signed::new_unchecked(self, signature, hash)
    }
}

impl EncodedSigned for TxEip2930 {
    fn encode_signed(&self, signature: &Signature, out: &mut dyn BufMut) {
        out.put_u8(EIP2930_TX_TYPE_ID);
        self.encode_with_signature_fields(signature, out);
    }

    fn encoded_signed_len(&self, signature: &Signature) -> usize {
        self.payload_len_with_signature(signature)
    }

    fn decode_signed(buf: &mut &[u8]) -> alloy_rlp::Result<Signed<Self>> {
        Self::decode_signed_fields(buf)
    }
}

impl Encodable for TxEip2930 {
    fn encode(&self, out: &mut dyn BufMut) {
        Header::new(true, self.fields_len()).encode(out);
        self.encode_fields(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.fields_len();
        length_of_length(payload_length) + payload_length
    }
}

impl Decodable for TxEip2930 {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if header.payload_length > buf.len() {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        Self::decode_inner(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TxEnvelope;
    use alloy_primitives::Address;

    #[test]
    fn test_decode_create() {
        let request = TxEip2930 {
            chain_id: 1,
            nonce: 0,
            gas_price: 1,
            gas_limit: 2,
            to: TxKind::Create,
            value: U256::from(3_u64),
            input: Bytes::from(alloc::vec![1, 2]),
            access_list: Default::default(),
        };
        let tx = request.into_signed(Signature::test_signature());

        let mut encoded = Vec::new();
        tx.tx().encode_signed(tx.signature(), &mut encoded);
        let decoded = TxEip2930::decode_signed_fields(&mut &encoded[..]).unwrap();
        assert_eq!(decoded.tx(), tx.tx());
    }

    #[test]
    fn test_decode_call_envelope_matches_expected_bytes() {
        let request = TxEip2930 {
            chain_id: 1,
            nonce: 0,
            gas_price: 1,
            gas_limit: 2,
            to: TxKind::Call(Address::default()),
            value: U256::from(3_u64),
            input: Bytes::from(alloc::vec![1, 2]),
            access_list: Default::default(),
        };
        let tx = request.into_signed(Signature::test_signature());
        let envelope = TxEnvelope::Eip2930(tx);

        let mut encoded = Vec::new();
        envelope.encode(&mut encoded);
        assert_eq!(encoded.len(), envelope.length());

        let decoded = TxEnvelope::decode(&mut &encoded[..]).unwrap();
        assert_eq!(decoded, envelope);
    }
}
