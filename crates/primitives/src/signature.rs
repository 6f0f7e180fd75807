use crate::{eip191_hash_message, hex, Address, B256, U256};
use core::str::FromStr;

/// Applies [EIP-155](https://eips.ethereum.org/EIPS/eip-155) to a bare recovery bit.
#[inline]
pub const fn to_eip155_v(v: u8, chain_id: u64) -> u64 {
    (v as u64) + 35 + chain_id * 2
}

/// Errors constructing or recovering a [`Signature`].
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// The byte slice was the wrong length, or the scalars did not form a
    /// valid curve point.
    #[error("{0}")]
    FromBytes(&'static str),
    /// Error decoding a hex string.
    #[error(transparent)]
    FromHex(#[from] hex::FromHexError),
    /// The underlying `k256` ECDSA operation failed (invalid scalar,
    /// point at infinity during recovery, etc).
    #[error(transparent)]
    K256(#[from] k256::ecdsa::Error),
}

/// The parity of a signature, stored as whichever form the caller handed
/// us: an explicit (possibly [EIP-155](https://eips.ethereum.org/EIPS/eip-155)-encoded) `v`
/// value, a legacy 27/28 value, or a bare y-parity bit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Parity {
    /// Explicit `v` value, 35 or greater: EIP-155 replay-protected legacy signature.
    Eip155(u64),
    /// Legacy, non-EIP-155 `v`: 27 or 28.
    NonEip155(bool),
    /// Bare y-parity bit (typed transactions, EIP-191 messages).
    Parity(bool),
}

impl From<bool> for Parity {
    fn from(value: bool) -> Self {
        Self::Parity(value)
    }
}

impl From<u64> for Parity {
    fn from(value: u64) -> Self {
        match value {
            0 => Self::Parity(false),
            1 => Self::Parity(true),
            27 | 28 => Self::NonEip155((value - 27) != 0),
            _ => Self::Eip155(value),
        }
    }
}

impl From<u8> for Parity {
    fn from(value: u8) -> Self {
        Self::from(value as u64)
    }
}

impl Parity {
    /// Returns the chain id encoded in an EIP-155 `v` value, if any.
    pub const fn chain_id(&self) -> Option<u64> {
        match *self {
            Self::Eip155(mut v) if v >= 35 => {
                if v % 2 == 0 {
                    v -= 1;
                }
                Some((v - 35) / 2)
            }
            _ => None,
        }
    }

    /// Returns the y-parity as a bool.
    pub const fn y_parity(&self) -> bool {
        match self {
            Self::Eip155(v) if *v <= 34 => *v % 2 == 1,
            Self::Eip155(v) => (*v ^ 1) % 2 == 0,
            Self::NonEip155(b) | Self::Parity(b) => *b,
        }
    }

    /// Returns the y-parity as `0`/`1`.
    pub const fn y_parity_byte(&self) -> u8 {
        self.y_parity() as u8
    }

    /// Inverts the parity bit, preserving the EIP-155/legacy encoding.
    pub const fn inverted(&self) -> Self {
        match self {
            Self::Parity(b) => Self::Parity(!*b),
            Self::NonEip155(b) => Self::NonEip155(!*b),
            Self::Eip155(v) if *v <= 34 => Self::Eip155(if *v % 2 == 0 { *v - 1 } else { *v + 1 }),
            Self::Eip155(v) => Self::Eip155(*v ^ 1),
        }
    }

    /// Applies EIP-155 to this parity, given a chain id. A no-op for bare
    /// `Parity` values, since those carry no replay-protection information.
    pub const fn with_chain_id(self, chain_id: u64) -> Self {
        let bit = match self {
            Self::Eip155(v) => v % 2 == 0,
            Self::NonEip155(b) => b,
            Self::Parity(_) => return self,
        };
        Self::Eip155(to_eip155_v(bit as u8, chain_id))
    }

    /// Drops any EIP-155/legacy encoding, returning the bare y-parity.
    pub const fn to_parity_bool(self) -> Self {
        Self::Parity(self.y_parity())
    }

    /// Returns the `k256` recovery id for this parity.
    pub fn recid(&self) -> k256::ecdsa::RecoveryId {
        let byte = match self {
            Self::Eip155(_) => self.y_parity_byte(),
            Self::NonEip155(b) | Self::Parity(b) => *b as u8,
        };
        k256::ecdsa::RecoveryId::from_byte(byte).expect("y-parity bit is always 0 or 1")
    }
}

/// An Ethereum ECDSA (secp256k1) signature: `r`, `s` and a [`Parity`].
///
/// The signature is always stored in low-S canonical form once produced by
/// [`alloy_signer_local::PrivateKeySigner::sign_hash`]; values parsed from
/// the wire are not normalized automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    r: U256,
    s: U256,
    v: Parity,
}

impl Signature {
    /// Test-only fixed signature, used by transaction round-trip tests that
    /// only care about the serialization shape.
    #[doc(hidden)]
    pub fn test_signature() -> Self {
        Self::from_scalars_and_parity(
            B256::from_str("0x840cfc572845f5786e702984c2a582528cad4b49b2a10b9db1be7fca9005856")
                .unwrap(),
            B256::from_str("0x25e7109ceb98168d95b09b18bbf6b685130e0562f233877d492b94eee0c5b6d")
                .unwrap(),
            false,
        )
        .unwrap()
    }

    /// Builds a signature from `r`, `s` and anything convertible to a [`Parity`].
    pub fn from_rs_and_parity<P: Into<Parity>>(
        r: U256,
        s: U256,
        parity: P,
    ) -> Result<Self, SignatureError> {
        Ok(Self { r, s, v: parity.into() })
    }

    /// Builds a signature from 32-byte big-endian `r` and `s` scalars.
    pub fn from_scalars_and_parity<P: Into<Parity>>(
        r: B256,
        s: B256,
        parity: P,
    ) -> Result<Self, SignatureError> {
        Self::from_rs_and_parity(U256::from_be_bytes(r.0), U256::from_be_bytes(s.0), parity)
    }

    /// Parses a 65-byte `r || s || v` signature, as returned by `eth_sign`.
    pub fn from_bytes_and_parity<P: Into<Parity>>(
        bytes: &[u8],
        parity: P,
    ) -> Result<Self, SignatureError> {
        if bytes.len() < 64 {
            return Err(SignatureError::FromBytes("expected at least 64 bytes"));
        }
        let r = U256::from_be_slice(&bytes[..32]);
        let s = U256::from_be_slice(&bytes[32..64]);
        Self::from_rs_and_parity(r, s, parity)
    }

    /// Returns the `r` component.
    pub const fn r(&self) -> U256 {
        self.r
    }

    /// Returns the `s` component.
    pub const fn s(&self) -> U256 {
        self.s
    }

    /// Returns the parity/`v` component.
    pub const fn v(&self) -> Parity {
        self.v
    }

    /// Returns a new signature with the parity replaced.
    pub fn with_parity<P: Into<Parity>>(self, parity: P) -> Self {
        Self { v: parity.into(), ..self }
    }

    /// Applies [EIP-155](https://eips.ethereum.org/EIPS/eip-155) to this signature's `v`.
    pub fn with_chain_id(self, chain_id: u64) -> Self {
        self.with_parity(self.v.with_chain_id(chain_id))
    }

    /// Drops any EIP-155 replay-protection encoding, leaving a bare y-parity bit.
    pub fn with_parity_bool(self) -> Self {
        self.with_parity(self.v.to_parity_bool())
    }

    /// Returns `true` if `s <= n/2`, the canonical "low-S" form required by
    /// malleability-resistant signers.
    pub fn is_low_s(&self) -> bool {
        self.s <= secp256k1_half_order()
    }

    /// Normalizes this signature into low-S form, flipping the parity bit
    /// when `s` was in the upper half of the curve order.
    pub fn normalize_s(&self) -> Self {
        if self.is_low_s() {
            *self
        } else {
            Self { r: self.r, s: secp256k1_order() - self.s, v: self.v.inverted() }
        }
    }

    /// Returns the 65-byte `r || s || v` representation. `v` is emitted as
    /// the bare y-parity byte (`0x00`/`0x01`), matching the "Electrum"
    /// notation minus the `+27` offset.
    pub fn as_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        out[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        out[64] = self.v.y_parity_byte();
        out
    }

    /// Returns the compact 64-byte representation, packing the parity bit
    /// into the top bit of `s` (`yParityWithS`, per §3).
    pub fn as_compact_bytes(&self) -> [u8; 64] {
        let mut s = self.s;
        if self.v.y_parity() {
            s |= U256::from(1u8) << 255usize;
        }
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        out[32..].copy_from_slice(&s.to_be_bytes::<32>());
        out
    }

    fn to_k256(&self) -> Result<k256::ecdsa::Signature, SignatureError> {
        let normalized = self.normalize_s();
        k256::ecdsa::Signature::from_scalars(
            normalized.r.to_be_bytes::<32>(),
            normalized.s.to_be_bytes::<32>(),
        )
        .map_err(Into::into)
    }

    /// Recovers the signer's public key from this signature and a
    /// prehashed digest.
    pub fn recover_from_prehash(
        &self,
        prehash: B256,
    ) -> Result<k256::ecdsa::VerifyingKey, SignatureError> {
        let sig = self.to_k256()?;
        let recid = self.normalize_s().v.recid();
        k256::ecdsa::VerifyingKey::recover_from_prehash(prehash.as_slice(), &sig, recid)
            .map_err(Into::into)
    }

    /// Recovers the signer's [`Address`] from this signature and a
    /// prehashed digest.
    pub fn recover_address_from_prehash(&self, prehash: B256) -> Result<Address, SignatureError> {
        self.recover_from_prehash(prehash).map(|vk| Address::from_public_key(&vk))
    }

    /// Recovers the signer's [`Address`] after applying the EIP-191
    /// personal-message prefix to `msg`.
    pub fn recover_address_from_msg<T: AsRef<[u8]>>(
        &self,
        msg: T,
    ) -> Result<Address, SignatureError> {
        self.recover_address_from_prehash(eip191_hash_message(msg))
    }

    /// Standard ECDSA verification: does this signature validate against
    /// `prehash` for `verifying_key`?
    pub fn verify(
        &self,
        prehash: B256,
        verifying_key: &k256::ecdsa::VerifyingKey,
    ) -> Result<(), SignatureError> {
        use k256::ecdsa::signature::hazmat::PrehashVerifier;
        let sig = self.to_k256()?;
        verifying_key.verify_prehash(prehash.as_slice(), &sig).map_err(Into::into)
    }
}

impl FromStr for Signature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode_prefixed(s)?;
        if bytes.len() != 65 {
            return Err(SignatureError::FromBytes("expected exactly 65 bytes"));
        }
        Self::from_bytes_and_parity(&bytes[..64], bytes[64] as u64)
    }
}

impl<'a> TryFrom<&'a [u8]> for Signature {
    type Error = SignatureError;

    fn try_from(bytes: &'a [u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 65 {
            return Err(SignatureError::FromBytes("expected exactly 65 bytes"));
        }
        Self::from_bytes_and_parity(&bytes[..64], bytes[64] as u64)
    }
}

/// The secp256k1 curve order, `n`.
fn secp256k1_order() -> U256 {
    U256::from_str(
        "0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
    )
    .unwrap()
}

/// `n / 2`, the boundary for low-S canonicalization.
fn secp256k1_half_order() -> U256 {
    secp256k1_order() >> 1usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parity_eip155_roundtrip() {
        let v = to_eip155_v(1, 1);
        let p = Parity::from(v);
        assert_eq!(p.chain_id(), Some(1));
        assert!(p.y_parity());
    }

    #[test]
    fn signature_compact_roundtrip() {
        let sig = Signature::test_signature();
        let compact = sig.as_compact_bytes();
        let s = U256::from_be_slice(&compact[32..]);
        let y_parity = (s >> 255usize) & U256::from(1u8) == U256::from(1u8);
        assert_eq!(y_parity, sig.v().y_parity());
    }

    #[test]
    fn low_s_normalizes() {
        let sig = Signature::test_signature();
        assert!(sig.normalize_s().is_low_s());
    }
}
