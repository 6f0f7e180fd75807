//! [EIP-7702](https://eips.ethereum.org/EIPS/eip-7702) set-code transactions, type byte `0x04`.

use crate::{signed::EncodedSigned, SignableTransaction, Signed, Transaction, TxType};
use alloc::vec::Vec;
use alloy_eips::eip2930::AccessList;
use alloy_eips::eip7702::SignedAuthorization;
use alloy_primitives::{keccak256, Address, Bytes, ChainId, Parity, Signature, TxKind, B256, U256};
use alloy_rlp::{length_of_length, BufMut, Decodable, Encodable, Header};

/// A set-code transaction ([EIP-7702](https://eips.ethereum.org/EIPS/eip-7702)): same shape as
/// [`TxEip1559`](crate::TxEip1559) plus an `authorization_list`. Unlike the other envelopes, it
/// cannot create a contract — `to` is a plain [`Address`], not a [`TxKind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TxEip7702 {
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
    /// The recipient. Set-code transactions always call into an existing account.
    pub to: Address,
    /// Wei transferred to `to`.
    pub value: U256,
    /// Addresses and storage keys pre-warmed for this transaction.
    pub access_list: AccessList,
    /// Authorizations that temporarily delegate an authority's code to another account.
    pub authorization_list: Vec<SignedAuthorization>,
    /// Call data.
    pub input: Bytes,
}

impl TxEip7702 {
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

    fn fields_len(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.max_priority_fee_per_gas.length()
            + self.max_fee_per_gas.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.0.length()
            + self.access_list.length()
            + self.authorization_list.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.max_priority_fee_per_gas.encode(out);
        self.max_fee_per_gas.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.0.encode(out);
        self.access_list.encode(out);
        self.authorization_list.encode(out);
    }

    fn decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
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
            authorization_list: Decodable::decode(buf)?,
        })
    }

    fn encode_with_signature_fields(&self, signature: &Signature, out: &mut dyn BufMut) {
        let payload_length = self.fields_len() + signature.rlp_vrs_len();
        Header::new(true, payload_length).encode(out);
        self.encode_fields(out);
        signature.write_rlp_vrs(out);
    }

    fn payload_len_with_signature(&self, signature: &Signature) -> usize {
        let payload_length = self.fields_len() + signature.rlp_vrs_len();
        1 + length_of_length(payload_length) + payload_length
    }

    /// Parses a signed [EIP-7702](https://eips.ethereum.org/EIPS/eip-7702) transaction body (no
    /// leading type byte). Rejects an EIP-155-inflated `v`: typed transactions only ever carry a
    /// bare y-parity bit.
    pub fn decode_signed_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Signed<Self>> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        let tx = Self::decode_fields(buf)?;
        let signature = Signature::decode_rlp_vrs(buf)?;
        if !matches!(signature.v(), Parity::Parity(_)) {
            return Err(alloy_rlp::Error::Custom("invalid parity for typed transaction"));
        }
        Ok(tx.into_signed(signature))
    }
}

impl Transaction for TxEip7702 {
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

    fn to(&self) -> TxKind {
        TxKind::Call(self.to)
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

    fn authorization_list(&self) -> Option<&[SignedAuthorization]> {
        Some(&self.authorization_list)
    }

    fn tx_type(&self) -> TxType {
        TxType::Eip7702
    }
}

impl SignableTransaction for TxEip7702 {
    fn set_chain_id(&mut self, chain_id: ChainId) {
        self.chain_id = chain_id;
    }

    fn encode_for_signing(&self, out: &mut dyn BufMut) {
        out.put_u8(TxType::Eip7702 as u8);
        Header::new(true, self.fields_len()).encode(out);
        self.encode_fields(out);
    }

    fn payload_len_for_signature(&self) -> usize {
        let payload_length = self.fields_len();
        1 + length_of_length(payload_length) + payload_length
    }

    fn into_signed(self, signature: Signature) -> Signed<Self> {
        // Typed transactions carry a bare y-parity bit; drop any EIP-155 chain id baked into `v`.
        let signature = signature.with_parity_bool();
        let mut buf = Vec::with_capacity(1 + self.fields_len() + signature.rlp_vrs_len());
        buf.put_u8(TxType::Eip7702 as u8);
        self.encode_with_signature_fields(&signature, &mut buf);
        let hash = keccak256(&buf);
        Signed::new_unchecked(self, signature, hash)
    }
}

impl EncodedSigned for TxEip7702 {
    fn encode_signed(&self, signature: &Signature, out: &mut dyn BufMut) {
        out.put_u8(TxType::Eip7702 as u8);
        self.encode_with_signature_fields(signature, out);
    }

    fn encoded_signed_len(&self, signature: &Signature) -> usize {
        self.payload_len_with_signature(signature)
    }

    fn decode_signed(buf: &mut &[u8]) -> alloy_rlp::Result<Signed<Self>> {
        Self::decode_signed_fields(buf)
    }
}

impl Encodable for TxEip7702 {
    fn encode(&self, out: &mut dyn BufMut) {
        Header::new(true, self.fields_len()).encode(out);
        self.encode_fields(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.fields_len();
        length_of_length(payload_length) + payload_length
    }
}

impl Decodable for TxEip7702 {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if header.payload_length > buf.len() {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        Self::decode_fields(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_eips::eip7702::Authorization;

    fn sample_tx() -> TxEip7702 {
        let auth = Authorization { chain_id: 1, address: Address::new([0x33; 20]), nonce: 0 }
            .into_signed(Signature::test_signature());
        TxEip7702 {
            chain_id: 1,
            nonce: 0,
            gas_limit: 21_000,
            max_fee_per_gas: 10,
            max_priority_fee_per_gas: 1,
            to: Address::new([0x11; 20]),
            value: U256::from(3_u64),
            access_list: Default::default(),
            authorization_list: alloc::vec![auth],
            input: Bytes::from(alloc::vec![1, 2]),
        }
    }

    #[test]
    fn encode_decode_roundtrips() {
        let tx = sample_tx();
        let signed = tx.clone().into_signed(Signature::test_signature());

        let mut encoded = Vec::new();
        signed.tx().encode_signed(signed.signature(), &mut encoded);
        assert_eq!(encoded.len(), signed.tx().encoded_signed_len(signed.signature()));

        let decoded = TxEip7702::decode_signed_fields(&mut &encoded[..]).unwrap();
        assert_eq!(decoded, signed);
    }

    #[test]
    fn rejects_eip155_inflated_v() {
        let tx = sample_tx();
        let signature = Signature::test_signature().with_chain_id(1);
        let mut buf = Vec::new();
        tx.encode_with_signature_fields(&signature, &mut buf);
        assert!(TxEip7702::decode_signed_fields(&mut &buf[..]).is_err());
    }
}
