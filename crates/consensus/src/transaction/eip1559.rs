//! [EIP-1559](https://eips.ethereum.org/EIPS/eip-1559) dynamic-fee transactions, type byte `0x02`.

use crate::{signed::EncodedSigned, SignableTransaction, Signed, Transaction, TxType};
use alloc::vec::Vec;
use alloy_eips::eip2718::EIP1559_TX_TYPE_ID;
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{keccak256, Bytes, ChainId, Signature, TxKind, U256};
use alloy_rlp::{length_of_length, BufMut, Decodable, Encodable, Header};

/// A transaction with a base-fee-relative priority fee ([EIP-1559](https://eips.ethereum.org/EIPS/eip-1559)).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TxEip1559 {
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
    /// Contract creation when absent.
    pub to: TxKind,
    /// Wei transferred to `to`, or the endowment for contract creation.
    pub value: U256,
    /// Addresses and storage keys pre-warmed for this transaction.
    pub access_list: AccessList,
    /// Init code (contract creation) or call data.
    pub input: Bytes,
}

impl TxEip1559 {
    /// The per-gas amount actually paid, given the block's `base_fee`: the
    /// smaller of `max_fee_per_gas` and `base_fee + max_priority_fee_per_gas`.
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
    }

    fn decode_inner(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
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
        let inner = 1 + length_of_length(payload_length) + payload_length;
        inner
    }

    /// Parses a signed [EIP-1559](https://eips.ethereum.org/EIPS/eip-1559) transaction body (no
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

impl Transaction for TxEip1559 {
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
        TxType::Eip1559
    }
}

impl SignableTransaction for TxEip1559 {
    fn set_chain_id(&mut self, chain_id: ChainId) {
        self.chain_id = chain_id;
    }

    fn encode_for_signing(&self, out: &mut dyn BufMut) {
        out.put_u8(EIP1559_TX_TYPE_ID);
        Header::new(true, self.fields_len()).encode(out);
        self.encode_fields(out);
    }

    fn payload_len_for_signature(&self) -> usize {
        let payload_length = self.fields_len();
        1 + length_of_length(payload_length) + payload_length
    }

    fn into_signed(self, signature: Signature) -> Signed<Self> {
        let signature = signature.with_parity_bool();
        let mut buf = Vec::with_capacity(1 + self.fields_len() + signature.rlp_vrs_len());
        buf.put_u8(TxType::Eip1559 as u8);
        self.encode_with_signature_fields(&signature, &mut buf);
        let hash = keccak256(&buf);
        Signed::new_unchecked(self, signature, hash)
    }
}

impl EncodedSigned for TxEip1559 {
    fn encode_signed(&self, signature: &Signature, out: &mut dyn BufMut) {
        out.put_u8(EIP1559_TX_TYPE_ID);
        self.encode_with_signature_fields(signature, out);
    }

    fn encoded_signed_len(&self, signature: &Signature) -> usize {
        let len = self.payload_len_with_signature(signature);
        length_of_length(len) + len
    }

    fn decode_signed(buf: &mut &[u8]) -> alloy_rlp::Result<Signed<Self>> {
        Self::decode_signed_fields(buf)
    }
}

impl Encodable for TxEip1559 {
    fn encode(&self, out: &mut dyn BufMut) {
        Header::new(true, self.fields_len()).encode(out);
        self.encode_fields(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.fields_len();
        length_of_length(payload_length) + payload_length
    }
}

impl Decodable for TxEip1559 {
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
    use alloy_primitives::{Address, B256};
    use core::str::FromStr;

    #[test]
    fn recover_signer_eip1559() {
        let signer = Address::from_str("0xdd6b8b3dc6b7ad97db52f08a275ff4483e024cea").unwrap();
        let hash =
            B256::from_str("0x0ec0b6a2df4d87424e5f6ad2a654e27aaeb7dac20ae9e8385cc09087ad532ee0")
                .unwrap();

        let tx = TxEip1559 {
            chain_id: 1,
            nonce: 0x42,
            gas_limit: 44_386,
            to: TxKind::Call(
                Address::from_str("0x6069a6c32cf691f5982febae4faf8a6f3ab2f0f6").unwrap(),
            ),
            value: U256::from(0_u64),
            input: Bytes::from(alloy_primitives::hex::decode("a22cb4650000000000000000000000005eee75727d804a2b13038928d36f8b188945a57a0000000000000000000000000000000000000000000000000000000000000000").unwrap()),
            max_fee_per_gas: 0x4a817c800,
            max_priority_fee_per_gas: 0x3b9aca00,
            access_list: Default::default(),
        };

        let sig = Signature::from_scalars_and_parity(
            B256::from_str("0x840cfc572845f5786e702984c2a582528cad4b49b2a10b9db1be7fca90058565")
                .unwrap(),
            B256::from_str("0x25e7109ceb98168d95b09b18bbf6b685130e0562f233877d492b94eee0c5b6d1")
                .unwrap(),
            false,
        )
        .unwrap();

        let signed = tx.into_signed(sig);
        assert_eq!(*signed.hash(), hash);
        assert_eq!(signed.recover_signer().unwrap(), signer);
    }

    #[test]
    fn unsigned_serialize_with_access_list_matches_reference_prefix() {
        use alloy_eips::eip2930::{AccessList, AccessListItem};

        let tx = TxEip1559 {
            chain_id: 1,
            nonce: 69,
            gas_limit: 21_001,
            max_fee_per_gas: 2_000_000_000,
            max_priority_fee_per_gas: 2_000_000_000,
            to: TxKind::Call(
                Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap(),
            ),
            value: U256::from(1_000_000_000_000_000_000u64),
            access_list: AccessList(alloc::vec![AccessListItem {
                address: Address::ZERO,
                storage_keys: alloc::vec![
                    B256::from_str(
                        "0x0000000000000000000000000000000000000000000000000000000000000001"
                    )
                    .unwrap(),
                    B256::from_str(
                        "0x0000000000000000000000000000000000000000000000000000000000000002"
                    )
                    .unwrap(),
                ],
            }]),
            input: Bytes::new(),
        };

        let mut encoded = Vec::new();
        tx.encode_for_signing(&mut encoded);
        assert!(alloy_primitives::hex::encode(&encoded)
            .starts_with("02f88b01458477359400847735940082520994"));
    }

    #[test]
    fn effective_gas_price_caps_at_max_fee() {
        let tx = TxEip1559 {
            max_fee_per_gas: 100,
            max_priority_fee_per_gas: 10,
            ..Default::default()
        };
        assert_eq!(tx.effective_gas_price(Some(95)), 100);
        assert_eq!(tx.effective_gas_price(Some(50)), 60);
        assert_eq!(tx.effective_gas_price(None), 100);
    }
}
