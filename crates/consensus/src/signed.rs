use crate::{SignableTransaction, Transaction};
use alloy_primitives::{Address, Signature, SignatureError, B256};
use alloy_rlp::{BufMut, Decodable, Encodable};

/// A transaction paired with the [`Signature`] that signs it and the
/// `keccak256` hash of its signed RLP encoding, computed once at
/// construction rather than recomputed on every access.
#[derive(Debug, Clone)]
pub struct Signed<T> {
    tx: T,
    signature: Signature,
    hash: B256,
}

impl<T> Signed<T> {
    /// Builds a `Signed<T>` from already-validated parts. Callers outside
    /// this crate reach this through [`SignableTransaction::into_signed`](crate::SignableTransaction::into_signed)
    /// or [`Transaction`](crate::Transaction)-specific `decode_signed`
    /// functions, which compute `hash` from `tx`/`signature` themselves; the
    /// name is a reminder that nothing here re-derives or checks that
    /// invariant.
    pub const fn new_unchecked(tx: T, signature: Signature, hash: B256) -> Self {
        Self { tx, signature, hash }
    }

    /// The wrapped transaction body.
    pub const fn tx(&self) -> &T {
        &self.tx
    }

    /// The signature over `tx`.
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The cached `keccak256` hash of this transaction's signed encoding.
    pub const fn hash(&self) -> &B256 {
        &self.hash
    }

    /// Splits this value back into its transaction, signature and hash.
    pub fn into_parts(self) -> (T, Signature, B256) {
        (self.tx, self.signature, self.hash)
    }
}

impl<T: SignableTransaction> Signed<T> {
    /// Recovers the sender's address from `signature` over `tx`'s sighash.
    ///
    /// Recovery must use [`SignableTransaction::signature_hash`], the digest
    /// the signer actually signed, not the cached `hash` — which is
    /// `keccak256` of the *signed* encoding and includes the signature
    /// itself.
    pub fn recover_signer(&self) -> Result<Address, SignatureError> {
        self.signature.recover_address_from_prehash(self.tx.signature_hash())
    }
}

impl<T: PartialEq> PartialEq for Signed<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tx == other.tx && self.signature == other.signature && self.hash == other.hash
    }
}
impl<T: Eq> Eq for Signed<T> {}

/// Blanket impl: a transaction type's own `encode_signed`/`decode_signed`
/// (reached through [`Transaction::tx_type`] dispatch in [`crate::TxEnvelope`])
/// does the real work; this just lets `Signed<T>` be encoded/decoded
/// directly when `T` is known statically.
pub trait EncodedSigned: Transaction + Sized {
    /// Writes this transaction's signed encoding, `signature` included.
    fn encode_signed(&self, signature: &Signature, out: &mut dyn BufMut);

    /// Length of [`Self::encode_signed`]'s output.
    fn encoded_signed_len(&self, signature: &Signature) -> usize;

    /// Parses a value written by [`Self::encode_signed`].
    fn decode_signed(buf: &mut &[u8]) -> alloy_rlp::Result<Signed<Self>>;
}

impl<T: EncodedSigned> Encodable for Signed<T> {
    fn encode(&self, out: &mut dyn BufMut) {
        self.tx.encode_signed(&self.signature, out)
    }

    fn length(&self) -> usize {
        self.tx.encoded_signed_len(&self.signature)
    }
}

impl<T: EncodedSigned> Decodable for Signed<T> {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        T::decode_signed(buf)
    }
}
