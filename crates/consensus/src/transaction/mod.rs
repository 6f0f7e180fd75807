//! The five Ethereum transaction envelopes ([`legacy`], [`eip2930`],
//! [`eip1559`], [`eip4844`], [`eip7702`]), dispatched by [`envelope`], and the
//! [`Transaction`]/[`SignableTransaction`] traits they all implement.

pub mod eip1559;
pub mod eip2930;
pub mod eip4844;
pub mod eip7702;
pub mod envelope;
pub mod legacy;

use crate::Signed;
use alloc::vec::Vec;
use alloy_eips::{eip2930::AccessList, eip7702::SignedAuthorization};
use alloy_primitives::{keccak256, B256, ChainId, Signature, TxKind, U256};
use alloy_rlp::BufMut;

/// The [EIP-2718](https://eips.ethereum.org/EIPS/eip-2718) transaction type byte. `Legacy`
/// carries no byte on the wire — it is distinguished by the leading RLP list
/// byte (`>= 0xc0`) instead — but is still assigned `0` here, matching how
/// receipts and the wire format key off this discriminant.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TxType {
    /// Pre-[EIP-2718](https://eips.ethereum.org/EIPS/eip-2718) transaction.
    #[default]
    Legacy = 0,
    /// [EIP-2930](https://eips.ethereum.org/EIPS/eip-2930) transaction with an access list.
    Eip2930 = 1,
    /// [EIP-1559](https://eips.ethereum.org/EIPS/eip-1559) dynamic-fee transaction.
    Eip1559 = 2,
    /// [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) blob transaction.
    Eip4844 = 3,
    /// [EIP-7702](https://eips.ethereum.org/EIPS/eip-7702) authorization-list transaction.
    Eip7702 = 4,
}

impl TxType {
    /// Builds a [`TxType`] from an [EIP-2718](https://eips.ethereum.org/EIPS/eip-2718) type byte,
    /// rejecting anything not in `[0, 4]`.
    pub const fn try_from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Legacy),
            1 => Some(Self::Eip2930),
            2 => Some(Self::Eip1559),
            3 => Some(Self::Eip4844),
            4 => Some(Self::Eip7702),
            _ => None,
        }
    }
}

impl TryFrom<u8> for TxType {
    type Error = alloy_rlp::Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::try_from_u8(byte).ok_or(alloy_rlp::Error::Custom("unknown transaction type"))
    }
}

/// Read-only accessors shared by every transaction body (legacy and typed
/// alike). Mirrors the "formally T_x" fields of the Yellow Paper's
/// transaction tuple, generalized across [EIP-2930](https://eips.ethereum.org/EIPS/eip-2930),
/// [EIP-1559](https://eips.ethereum.org/EIPS/eip-1559), [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844)
/// and [EIP-7702](https://eips.ethereum.org/EIPS/eip-7702).
pub trait Transaction {
    /// `None` for pre-[EIP-155](https://eips.ethereum.org/EIPS/eip-155) legacy transactions; `Some`
    /// for everything else.
    fn chain_id(&self) -> Option<ChainId>;

    /// The sender's transaction count at the time this transaction was created.
    fn nonce(&self) -> u64;

    /// The maximum amount of gas this transaction may consume.
    fn gas_limit(&self) -> u64;

    /// The legacy/[EIP-2930](https://eips.ethereum.org/EIPS/eip-2930) flat gas price, or `None` for
    /// dynamic-fee transactions.
    fn gas_price(&self) -> Option<u128>;

    /// [EIP-1559](https://eips.ethereum.org/EIPS/eip-1559) `maxFeePerGas`, or `None` for legacy/
    /// [EIP-2930](https://eips.ethereum.org/EIPS/eip-2930) transactions.
    fn max_fee_per_gas(&self) -> Option<u128> {
        None
    }

    /// [EIP-1559](https://eips.ethereum.org/EIPS/eip-1559) `maxPriorityFeePerGas`, or `None` for
    /// legacy/[EIP-2930](https://eips.ethereum.org/EIPS/eip-2930) transactions.
    fn max_priority_fee_per_gas(&self) -> Option<u128> {
        None
    }

    /// [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) `maxFeePerBlobGas`, or `None` outside
    /// blob transactions.
    fn max_fee_per_blob_gas(&self) -> Option<u128> {
        None
    }

    /// `None` for contract creation, `Some(address)` for a call.
    fn to(&self) -> TxKind;

    /// Wei transferred to `to`, or the endowment for contract creation.
    fn value(&self) -> U256;

    /// Init code (contract creation) or call data.
    fn input(&self) -> &[u8];

    /// The transaction's [`AccessList`], for [EIP-2930](https://eips.ethereum.org/EIPS/eip-2930)
    /// and later.
    fn access_list(&self) -> Option<&AccessList> {
        None
    }

    /// [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) blob versioned hashes.
    fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        None
    }

    /// [EIP-7702](https://eips.ethereum.org/EIPS/eip-7702) authorization tuples.
    fn authorization_list(&self) -> Option<&[SignedAuthorization]> {
        None
    }

    /// The [EIP-2718](https://eips.ethereum.org/EIPS/eip-2718) type byte this transaction encodes
    /// as.
    fn tx_type(&self) -> TxType;
}

/// The signing half of [`Transaction`]: how to produce the bytes that get
/// hashed and signed, and how to attach a [`Signature`] to build a
/// [`Signed<Self>`].
pub trait SignableTransaction<S = Signature>: Transaction + Sized {
    /// Sets the chain id used for [EIP-155](https://eips.ethereum.org/EIPS/eip-155) replay
    /// protection. A no-op for transaction types that carry `chain_id` outside the signature.
    fn set_chain_id(&mut self, chain_id: ChainId);

    /// Writes the RLP payload that gets hashed and signed: the
    /// EIP-2718 type byte (if any) followed by the unsigned field list.
    fn encode_for_signing(&self, out: &mut dyn BufMut);

    /// Length of [`Self::encode_for_signing`]'s output.
    fn payload_len_for_signature(&self) -> usize;

    /// `keccak256` of [`Self::encode_for_signing`]'s output — the digest that gets signed.
    fn signature_hash(&self) -> B256 {
        let mut buf = Vec::with_capacity(self.payload_len_for_signature());
        self.encode_for_signing(&mut buf);
        keccak256(buf)
    }

    /// Attaches `signature`, computing and caching the signed-envelope hash.
    fn into_signed(self, signature: S) -> Signed<Self>;
}
