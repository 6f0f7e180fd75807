//! [`TxEnvelope`]: a signed transaction of any of the five supported types, dispatched on the
//! [EIP-2718](https://eips.ethereum.org/EIPS/eip-2718) type byte.

use crate::{
    signed::EncodedSigned, eip1559::TxEip1559, eip2930::TxEip2930, eip4844::TxEip4844Variant,
    eip7702::TxEip7702, legacy::TxLegacy, Signed, Transaction, TxType,
};
use alloy_eips::{eip2930::AccessList, eip7702::SignedAuthorization};
use alloy_primitives::{Address, ChainId, Signature, TxKind, B256, U256};
use alloy_rlp::{BufMut, Decodable, Encodable};

/// A signed transaction, of any of the five envelope types this crate supports. Distinguishing
/// byte on the wire: a leading RLP list byte (`>= 0xc0`) means [`TxEnvelope::Legacy`]; a leading
/// byte in `1..=4` is the [EIP-2718](https://eips.ethereum.org/EIPS/eip-2718) type tag for
/// everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxEnvelope {
    /// A signed legacy transaction.
    Legacy(Signed<TxLegacy>),
    /// A signed [EIP-2930](https://eips.ethereum.org/EIPS/eip-2930) transaction.
    Eip2930(Signed<TxEip2930>),
    /// A signed [EIP-1559](https://eips.ethereum.org/EIPS/eip-1559) transaction.
    Eip1559(Signed<TxEip1559>),
    /// A signed [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) transaction.
    Eip4844(Signed<TxEip4844Variant>),
    /// A signed [EIP-7702](https://eips.ethereum.org/EIPS/eip-7702) transaction.
    Eip7702(Signed<TxEip7702>),
}

impl From<Signed<TxLegacy>> for TxEnvelope {
    fn from(tx: Signed<TxLegacy>) -> Self {
        Self::Legacy(tx)
    }
}
impl From<Signed<TxEip2930>> for TxEnvelope {
    fn from(tx: Signed<TxEip2930>) -> Self {
        Self::Eip2930(tx)
    }
}
impl From<Signed<TxEip1559>> for TxEnvelope {
    fn from(tx: Signed<TxEip1559>) -> Self {
        Self::Eip1559(tx)
    }
}
impl From<Signed<TxEip4844Variant>> for TxEnvelope {
    fn from(tx: Signed<TxEip4844Variant>) -> Self {
        Self::Eip4844(tx)
    }
}
impl From<Signed<TxEip7702>> for TxEnvelope {
    fn from(tx: Signed<TxEip7702>) -> Self {
        Self::Eip7702(tx)
    }
}

impl TxEnvelope {
    /// The [EIP-2718](https://eips.ethereum.org/EIPS/eip-2718) type byte this envelope encodes
    /// as.
    pub const fn tx_type(&self) -> TxType {
        match self {
            Self::Legacy(_) => TxType::Legacy,
            Self::Eip2930(_) => TxType::Eip2930,
            Self::Eip1559(_) => TxType::Eip1559,
            Self::Eip4844(_) => TxType::Eip4844,
            Self::Eip7702(_) => TxType::Eip7702,
        }
    }

    /// The `keccak256` hash of this transaction's signed encoding.
    pub const fn tx_hash(&self) -> &B256 {
        match self {
            Self::Legacy(tx) => tx.hash(),
            Self::Eip2930(tx) => tx.hash(),
            Self::Eip1559(tx) => tx.hash(),
            Self::Eip4844(tx) => tx.hash(),
            Self::Eip7702(tx) => tx.hash(),
        }
    }

    /// The signature over this transaction.
    pub const fn signature(&self) -> &Signature {
        match self {
            Self::Legacy(tx) => tx.signature(),
            Self::Eip2930(tx) => tx.signature(),
            Self::Eip1559(tx) => tx.signature(),
            Self::Eip4844(tx) => tx.signature(),
            Self::Eip7702(tx) => tx.signature(),
        }
    }

    /// Recovers the sender's address from this envelope's signature and hash.
    pub fn recover_signer(&self) -> Result<Address, alloy_primitives::SignatureError> {
        match self {
            Self::Legacy(tx) => tx.recover_signer(),
            Self::Eip2930(tx) => tx.recover_signer(),
            Self::Eip1559(tx) => tx.recover_signer(),
            Self::Eip4844(tx) => tx.recover_signer(),
            Self::Eip7702(tx) => tx.recover_signer(),
        }
    }
}

impl Transaction for TxEnvelope {
    fn chain_id(&self) -> Option<ChainId> {
        match self {
            Self::Legacy(tx) => tx.tx().chain_id(),
            Self::Eip2930(tx) => tx.tx().chain_id(),
            Self::Eip1559(tx) => tx.tx().chain_id(),
            Self::Eip4844(tx) => tx.tx().chain_id(),
            Self::Eip7702(tx) => tx.tx().chain_id(),
        }
    }

    fn nonce(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.tx().nonce(),
            Self::Eip2930(tx) => tx.tx().nonce(),
            Self::Eip1559(tx) => tx.tx().nonce(),
            Self::Eip4844(tx) => tx.tx().nonce(),
            Self::Eip7702(tx) => tx.tx().nonce(),
        }
    }

    fn gas_limit(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.tx().gas_limit(),
            Self::Eip2930(tx) => tx.tx().gas_limit(),
            Self::Eip1559(tx) => tx.tx().gas_limit(),
            Self::Eip4844(tx) => tx.tx().gas_limit(),
            Self::Eip7702(tx) => tx.tx().gas_limit(),
        }
    }

    fn gas_price(&self) -> Option<u128> {
        match self {
            Self::Legacy(tx) => tx.tx().gas_price(),
            Self::Eip2930(tx) => tx.tx().gas_price(),
            Self::Eip1559(tx) => tx.tx().gas_price(),
            Self::Eip4844(tx) => tx.tx().gas_price(),
            Self::Eip7702(tx) => tx.tx().gas_price(),
        }
    }

    fn max_fee_per_gas(&self) -> Option<u128> {
        match self {
            Self::Legacy(tx) => tx.tx().max_fee_per_gas(),
            Self::Eip2930(tx) => tx.tx().max_fee_per_gas(),
            Self::Eip1559(tx) => tx.tx().max_fee_per_gas(),
            Self::Eip4844(tx) => tx.tx().max_fee_per_gas(),
            Self::Eip7702(tx) => tx.tx().max_fee_per_gas(),
        }
    }

    fn max_priority_fee_per_gas(&self) -> Option<u128> {
        match self {
            Self::Legacy(tx) => tx.tx().max_priority_fee_per_gas(),
            Self::Eip2930(tx) => tx.tx().max_priority_fee_per_gas(),
            Self::Eip1559(tx) => tx.tx().max_priority_fee_per_gas(),
            Self::Eip4844(tx) => tx.tx().max_priority_fee_per_gas(),
            Self::Eip7702(tx) => tx.tx().max_priority_fee_per_gas(),
        }
    }

    fn max_fee_per_blob_gas(&self) -> Option<u128> {
        match self {
            Self::Eip4844(tx) => tx.tx().max_fee_per_blob_gas(),
            _ => None,
        }
    }

    fn to(&self) -> TxKind {
        match self {
            Self::Legacy(tx) => tx.tx().to(),
            Self::Eip2930(tx) => tx.tx().to(),
            Self::Eip1559(tx) => tx.tx().to(),
            Self::Eip4844(tx) => tx.tx().to(),
            Self::Eip7702(tx) => tx.tx().to(),
        }
    }

    fn value(&self) -> U256 {
        match self {
            Self::Legacy(tx) => tx.tx().value(),
            Self::Eip2930(tx) => tx.tx().value(),
            Self::Eip1559(tx) => tx.tx().value(),
            Self::Eip4844(tx) => tx.tx().value(),
            Self::Eip7702(tx) => tx.tx().value(),
        }
    }

    fn input(&self) -> &[u8] {
        match self {
            Self::Legacy(tx) => tx.tx().input(),
            Self::Eip2930(tx) => tx.tx().input(),
            Self::Eip1559(tx) => tx.tx().input(),
            Self::Eip4844(tx) => tx.tx().input(),
            Self::Eip7702(tx) => tx.tx().input(),
        }
    }

    fn access_list(&self) -> Option<&AccessList> {
        match self {
            Self::Legacy(tx) => tx.tx().access_list(),
            Self::Eip2930(tx) => tx.tx().access_list(),
            Self::Eip1559(tx) => tx.tx().access_list(),
            Self::Eip4844(tx) => tx.tx().access_list(),
            Self::Eip7702(tx) => tx.tx().access_list(),
        }
    }

    fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        match self {
            Self::Eip4844(tx) => tx.tx().blob_versioned_hashes(),
            _ => None,
        }
    }

    fn authorization_list(&self) -> Option<&[SignedAuthorization]> {
        match self {
            Self::Eip7702(tx) => tx.tx().authorization_list(),
            _ => None,
        }
    }

    fn tx_type(&self) -> TxType {
        match self {
            Self::Legacy(_) => TxType::Legacy,
            Self::Eip2930(_) => TxType::Eip2930,
            Self::Eip1559(_) => TxType::Eip1559,
            Self::Eip4844(_) => TxType::Eip4844,
            Self::Eip7702(_) => TxType::Eip7702,
        }
    }
}

impl Encodable for TxEnvelope {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Self::Legacy(tx) => tx.encode(out),
            Self::Eip2930(tx) => tx.encode(out),
            Self::Eip1559(tx) => tx.encode(out),
            Self::Eip4844(tx) => tx.encode(out),
            Self::Eip7702(tx) => tx.encode(out),
        }
    }

    fn length(&self) -> usize {
        match self {
            Self::Legacy(tx) => tx.length(),
            Self::Eip2930(tx) => tx.length(),
            Self::Eip1559(tx) => tx.length(),
            Self::Eip4844(tx) => tx.length(),
            Self::Eip7702(tx) => tx.length(),
        }
    }
}

impl Decodable for TxEnvelope {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let first = *buf.first().ok_or(alloy_rlp::Error::InputTooShort)?;

        // Legacy transactions have no type byte: they begin directly with an RLP list header.
        if first >= 0xc0 {
            return Ok(Self::Legacy(TxLegacy::decode_signed_fields(buf)?));
        }

        let ty = TxType::try_from(first)?;
        *buf = &buf[1..];
        match ty {
            TxType::Legacy => Err(alloy_rlp::Error::Custom("unexpected legacy type byte")),
            TxType::Eip2930 => Ok(Self::Eip2930(TxEip2930::decode_signed(buf)?)),
            TxType::Eip1559 => Ok(Self::Eip1559(TxEip1559::decode_signed(buf)?)),
            TxType::Eip4844 => Ok(Self::Eip4844(TxEip4844Variant::decode_signed(buf)?)),
            TxType::Eip7702 => Ok(Self::Eip7702(TxEip7702::decode_signed(buf)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SignableTransaction;
    use alloy_primitives::{Bytes, U256};

    #[test]
    fn legacy_envelope_roundtrips() {
        let tx = TxLegacy {
            chain_id: Some(1),
            nonce: 0,
            gas_price: 1,
            gas_limit: 21_000,
            to: TxKind::Call(Address::new([0x01; 20])),
            value: U256::from(1_u64),
            input: Bytes::new(),
        };
        let envelope: TxEnvelope = tx.into_signed(Signature::test_signature()).into();

        let mut encoded = Vec::new();
        envelope.encode(&mut encoded);
        assert_eq!(encoded.len(), envelope.length());
        assert!(encoded[0] >= 0xc0);

        let decoded = TxEnvelope::decode(&mut &encoded[..]).unwrap();
        assert_eq!(decoded, envelope);
        assert_eq!(decoded.tx_type(), TxType::Legacy);
    }

    #[test]
    fn eip1559_envelope_roundtrips() {
        let tx = TxEip1559 {
            chain_id: 1,
            nonce: 0,
            gas_limit: 21_000,
            max_fee_per_gas: 100,
            max_priority_fee_per_gas: 1,
            to: TxKind::Call(Address::new([0x02; 20])),
            value: U256::from(5_u64),
            access_list: Default::default(),
            input: Bytes::new(),
        };
        let envelope: TxEnvelope = tx.into_signed(Signature::test_signature()).into();

        let mut encoded = Vec::new();
        envelope.encode(&mut encoded);
        assert_eq!(encoded[0], TxType::Eip1559 as u8);

        let decoded = TxEnvelope::decode(&mut &encoded[..]).unwrap();
        assert_eq!(decoded, envelope);
        assert_eq!(decoded.tx_type(), TxType::Eip1559);
        assert_eq!(decoded.recover_signer().unwrap(), envelope.recover_signer().unwrap());
    }
}
