//! [EIP-7702](https://eips.ethereum.org/EIPS/eip-7702) authorization lists: a signed statement by
//! an EOA that its code should temporarily point at a given contract.

use alloy_primitives::{keccak256, Address, ChainId, Signature, B256, U256};
use alloy_rlp::{BufMut, Decodable, Encodable, Header};

/// The EIP-7702 "magic" byte prepended to an authorization's signing
/// payload, distinguishing it from other keccak-then-sign constructions.
pub const MAGIC: u8 = 0x05;

/// An unsigned authorization tuple: "let `address`'s code run at `nonce`
/// for chain `chain_id`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Authorization {
    /// Chain the authorization is valid on; `0` means any chain.
    pub chain_id: ChainId,
    /// The contract whose code the authority's account should delegate to.
    pub address: Address,
    /// The authority's nonce at the time of signing; the authorization is
    /// invalid once the authority's on-chain nonce no longer matches.
    pub nonce: u64,
}

impl Authorization {
    fn fields_len(&self) -> usize {
        self.chain_id.length() + self.address.length() + self.nonce.length()
    }

    /// The RLP-then-magic-prefixed digest a signer must sign: `keccak256(MAGIC ||
    /// rlp([chain_id, address, nonce]))`.
    pub fn signature_hash(&self) -> B256 {
        let mut buf = alloc::vec::Vec::with_capacity(1 + self.length());
        buf.push(MAGIC);
        self.encode(&mut buf);
        keccak256(buf)
    }

    /// Attaches `signature`, producing the signed authorization that goes
    /// on the wire inside a transaction's authorization list.
    pub fn into_signed(self, signature: Signature) -> SignedAuthorization {
        SignedAuthorization { inner: self, signature: signature.with_parity_bool() }
    }
}

impl Encodable for Authorization {
    fn encode(&self, out: &mut dyn BufMut) {
        Header::new(true, self.fields_len()).encode(out);
        self.chain_id.encode(out);
        self.address.encode(out);
        self.nonce.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.fields_len();
        alloy_rlp::length_of_length(payload_length) + payload_length
    }
}

impl Decodable for Authorization {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        Ok(Self {
            chain_id: Decodable::decode(buf)?,
            address: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
        })
    }
}

/// An [`Authorization`] together with the authority's signature over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedAuthorization {
    inner: Authorization,
    signature: Signature,
}

impl SignedAuthorization {
    /// The authorization tuple this signature covers.
    pub const fn authorization(&self) -> &Authorization {
        &self.inner
    }

    /// The authority's signature.
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Recovers the authorizing account's address.
    pub fn recover_authority(&self) -> Result<Address, alloy_primitives::SignatureError> {
        self.signature.recover_address_from_prehash(self.inner.signature_hash())
    }

    fn fields_len(&self) -> usize {
        self.inner.chain_id.length()
            + self.inner.address.length()
            + self.inner.nonce.length()
            + (self.signature.v().y_parity_byte() as u64).length()
            + self.signature.r().length()
            + self.signature.s().length()
    }
}

impl Encodable for SignedAuthorization {
    fn encode(&self, out: &mut dyn BufMut) {
        Header::new(true, self.fields_len()).encode(out);
        self.inner.chain_id.encode(out);
        self.inner.address.encode(out);
        self.inner.nonce.encode(out);
        (self.signature.v().y_parity_byte() as u64).encode(out);
        self.signature.r().encode(out);
        self.signature.s().encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.fields_len();
        alloy_rlp::length_of_length(payload_length) + payload_length
    }
}

impl Decodable for SignedAuthorization {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        let inner = Authorization {
            chain_id: Decodable::decode(buf)?,
            address: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
        };
        let y_parity = u64::decode(buf)?;
        let r = U256::decode(buf)?;
        let s = U256::decode(buf)?;
        let signature = Signature::from_rs_and_parity(r, s, y_parity != 0)
            .map_err(|_| alloy_rlp::Error::Custom("invalid authorization signature"))?;
        Ok(Self { inner, signature })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_roundtrips_through_rlp() {
        let auth = Authorization { chain_id: 1, address: Address::new([0x11; 20]), nonce: 7 };
        let encoded = alloy_rlp::encode(&auth);
        let decoded: Authorization = alloy_rlp::decode_exact(&encoded).unwrap();
        assert_eq!(decoded, auth);
    }

    #[test]
    fn signed_authorization_roundtrips_through_rlp() {
        let auth = Authorization { chain_id: 1, address: Address::new([0x11; 20]), nonce: 7 };
        let signed = auth.into_signed(Signature::test_signature());
        let encoded = alloy_rlp::encode(&signed);
        let decoded: SignedAuthorization = alloy_rlp::decode_exact(&encoded).unwrap();
        assert_eq!(decoded, signed);
    }
}
