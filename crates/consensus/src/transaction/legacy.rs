//! Pre-[EIP-2718](https://eips.ethereum.org/EIPS/eip-2718) transactions, with optional
//! [EIP-155](https://eips.ethereum.org/EIPS/eip-155) replay protection.

use crate::{signed::EncodedSigned, SignableTransaction, Signed, Transaction, TxType};
use alloc::vec::Vec;
use alloy_primitives::{keccak256, Bytes, ChainId, Parity, Signature, TxKind, U256};
use alloy_rlp::{length_of_length, BufMut, Decodable, Encodable, Header};

/// A legacy transaction: flat `gasPrice`, no access list, no typed-envelope
/// byte on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TxLegacy {
    /// `None` for a pre-[EIP-155](https://eips.ethereum.org/EIPS/eip-155) transaction.
    pub chain_id: Option<ChainId>,
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
    /// Init code (contract creation) or call data.
    pub input: Bytes,
}

impl TxLegacy {
    fn fields_len(&self) -> usize {
        self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.0.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.0.encode(out);
    }

    fn decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            nonce: Decodable::decode(buf)?,
            gas_price: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            chain_id: None,
        })
    }

    /// `{chainId, 0, 0}`, appended to the field list before hashing when
    /// [EIP-155](https://eips.ethereum.org/EIPS/eip-155) replay protection applies. Empty for a
    /// pre-EIP-155 transaction.
    fn encode_eip155_signing_fields(&self, out: &mut dyn BufMut) {
        if let Some(id) = self.chain_id {
            id.encode(out);
            0x00u8.encode(out);
            0x00u8.encode(out);
        }
    }

    fn eip155_fields_len(&self) -> usize {
        self.chain_id.map_or(0, |id| id.length() + 2)
    }

    fn encode_with_signature_fields(&self, signature: &Signature, out: &mut dyn BufMut) {
        let payload_length = self.fields_len() + signature.rlp_vrs_len();
        Header::new(true, payload_length).encode(out);
        self.encode_fields(out);
        signature.write_rlp_vrs(out);
    }

    fn encoded_len_with_signature(&self, signature: &Signature) -> usize {
        let payload_length = self.fields_len() + signature.rlp_vrs_len();
        Header::new(true, payload_length).length() + payload_length
    }

    /// Parses a signed legacy transaction, deriving `chain_id` back out of
    /// the EIP-155-inflated `v` if present.
    pub fn decode_signed_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Signed<Self>> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        let original_len = buf.len();

        let mut tx = Self::decode_fields(buf)?;
        let signature = Signature::decode_rlp_vrs(buf)?;
        tx.chain_id = signature.v().chain_id();

        if original_len - buf.len() != header.payload_length {
            return Err(alloy_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: original_len - buf.len(),
            });
        }

        Ok(tx.into_signed(signature))
    }
}

impl Transaction for TxLegacy {
    fn chain_id(&self) -> Option<ChainId> {
        self.chain_id
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

    fn tx_type(&self) -> TxType {
        TxType::Legacy
    }
}

impl SignableTransaction for TxLegacy {
    fn set_chain_id(&mut self, chain_id: ChainId) {
        self.chain_id = Some(chain_id);
    }

    fn encode_for_signing(&self, out: &mut dyn BufMut) {
        let payload_length = self.fields_len() + self.eip155_fields_len();
        Header::new(true, payload_length).encode(out);
        self.encode_fields(out);
        self.encode_eip155_signing_fields(out);
    }

    fn payload_len_for_signature(&self) -> usize {
        let payload_length = self.fields_len() + self.eip155_fields_len();
        Header::new(true, payload_length).length() + payload_length
    }

    fn into_signed(self, signature: Signature) -> Signed<Self> {
        let signature = match self.chain_id {
            Some(id) => signature.with_chain_id(id),
            None => signature.with_parity(Parity::NonEip155(signature.v().y_parity())),
        };
        let mut buf = Vec::with_capacity(self.encoded_len_with_signature(&signature));
        self.encode_with_signature_fields(&signature, &mut buf);
        let hash = keccak256(&buf);
        Signed::new_unchecked(self, signature, hash)
    }
}

impl EncodedSigned for TxLegacy {
    fn encode_signed(&self, signature: &Signature, out: &mut dyn BufMut) {
        self.encode_with_signature_fields(signature, out)
    }

    fn encoded_signed_len(&self, signature: &Signature) -> usize {
        self.encoded_len_with_signature(signature)
    }

    fn decode_signed(buf: &mut &[u8]) -> alloy_rlp::Result<Signed<Self>> {
        Self::decode_signed_fields(buf)
    }
}

impl Encodable for TxLegacy {
    fn encode(&self, out: &mut dyn BufMut) {
        self.encode_for_signing(out)
    }

    fn length(&self) -> usize {
        self.payload_len_for_signature()
    }
}

impl Decodable for TxLegacy {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if header.payload_length > buf.len() {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        let mut tx = Self::decode_fields(buf)?;
        if !buf.is_empty() {
            tx.chain_id = Some(Decodable::decode(buf)?);
            let _r: U256 = Decodable::decode(buf)?;
            let _s: U256 = Decodable::decode(buf)?;
        }
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256};
    use core::str::FromStr;

    #[test]
    fn recover_signer_legacy() {
        let signer = Address::from_str("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap();
        let hash =
            B256::from_str("0x62a8d1c80bb34482c213be073e27faf698a6225f1cdaf908a583d18674d51011")
                .unwrap();

        let tx = TxLegacy {
            chain_id: Some(1),
            nonce: 0x18,
            gas_price: 0xfa56ea00,
            gas_limit: 119902,
            to: TxKind::Call(Address::new([0x22; 20])),
            value: U256::from(0x1c6bf526340000u64),
            input: Bytes::from(alloy_primitives::hex::decode("f7d8c88300000000000000000000000000000000000000000000000000000000000cee6100000000000000000000000000000000000000000000000000000000000ac3e1").unwrap()),
        };

        let sig = Signature::from_scalars_and_parity(
            B256::from_str("0xd8019ae39403a4c0b49e98a0be4ed9ad0b1ba20f324fd6268c7455841deddd0d")
                .unwrap(),
            B256::from_str("0x6b965fe4e10018b00f2164edd002703627bebd5f009bf4d9f7641de46bb2dcf2")
                .unwrap(),
            37u64,
        )
        .unwrap();

        let signed_tx = tx.into_signed(sig);
        assert_eq!(*signed_tx.hash(), hash);
        assert_eq!(signed_tx.recover_signer().unwrap(), signer);
    }

    #[test]
    fn unsigned_serialize_matches_reference_bytes() {
        let tx = TxLegacy {
            chain_id: None,
            nonce: 69,
            gas_price: 2_000_000_000,
            gas_limit: 0,
            to: TxKind::Call(
                Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap(),
            ),
            value: U256::from(1_000_000_000_000_000_000u64),
            input: Bytes::new(),
        };

        let mut encoded = Vec::new();
        tx.encode_for_signing(&mut encoded);
        assert_eq!(
            alloy_primitives::hex::encode(&encoded),
            "e64584773594008094f39fd6e51aad88f6f4ce6ab8827279cfffb92266880de0b6b3a764000080"
        );
    }

    #[test]
    fn pre_eip155_roundtrips() {
        let tx = TxLegacy {
            chain_id: None,
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(Address::new([0x11; 20])),
            value: U256::from(1_000_000_000_000_000_000u64),
            input: Bytes::new(),
        };
        let sig = Signature::test_signature();
        let signed = tx.into_signed(sig);
        assert!(matches!(signed.signature().v(), Parity::NonEip155(_)));

        let mut encoded = Vec::new();
        signed.tx().encode_signed(signed.signature(), &mut encoded);
        let decoded = TxLegacy::decode_signed_fields(&mut &encoded[..]).unwrap();
        assert_eq!(decoded.tx(), signed.tx());
        assert_eq!(decoded.tx().chain_id, None);
    }
}
