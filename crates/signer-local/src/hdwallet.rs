//! BIP-32 hierarchical-deterministic key derivation over secp256k1.

use crate::error::LocalSignerError;
use alloc::{string::ToString, vec::Vec};
use alloy_primitives::{B256, U256};
use core::str::FromStr;
use hmac::{Hmac, Mac};
use k256::{
    elliptic_curve::{group::Group, sec1::ToEncodedPoint, PrimeField},
    AffinePoint, ProjectivePoint, PublicKey, Scalar,
};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Child indices `>= 2^31` are hardened: derivation mixes in the parent's
/// private key rather than its public key, so a hardened child cannot be
/// derived from an [`EunuchNode`] alone.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const MAX_DERIVE_RETRIES: u32 = 4;

fn secp256k1_order() -> U256 {
    U256::from_str("0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141").unwrap()
}

fn scalar_from_u256(value: U256) -> Scalar {
    Scalar::from_repr(value.to_be_bytes::<32>().into())
        .expect("caller validated value < secp256k1 order")
}

fn compress_pubkey(point: &AffinePoint) -> [u8; 33] {
    let encoded = point.to_encoded_point(true);
    let mut out = [0u8; 33];
    out.copy_from_slice(encoded.as_bytes());
    out
}

fn pubkey_from_priv(priv_key: &B256) -> [u8; 33] {
    let secret = k256::SecretKey::from_slice(priv_key.as_slice())
        .expect("caller validated the scalar during derivation");
    compress_pubkey(secret.public_key().as_affine())
}

/// Runs one HMAC-SHA512 step and splits the 64-byte output into `(IL, IR)`.
fn hmac_sha512_split(key: &[u8], data: &[u8]) -> (U256, B256) {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    let i = mac.finalize().into_bytes();
    let il = U256::from_be_slice(&i[..32]);
    let mut ir = [0u8; 32];
    ir.copy_from_slice(&i[32..]);
    (il, B256::from(ir))
}

/// A full HD node: private key, compressed public key, and chain code.
/// Can derive both hardened and non-hardened children.
#[derive(Clone)]
pub struct HdWalletNode {
    priv_key: B256,
    pub_key: [u8; 33],
    chain_code: B256,
}

/// A "watch-only" HD node with no private key, named for BIP-32's own
/// description of the "public-only" derivation path: it can derive
/// further non-hardened children but a hardened step is impossible
/// without the private key.
#[derive(Clone)]
pub struct EunuchNode {
    pub_key: [u8; 33],
    chain_code: B256,
}

impl HdWalletNode {
    /// Derives the master node from a BIP-39 seed (any length; BIP-32
    /// recommends 64 bytes, as produced by
    /// [`crate::mnemonic::mnemonic_to_seed`]).
    pub fn from_seed(seed: &[u8]) -> Self {
        let (il, ir) = hmac_sha512_split(b"Bitcoin seed", seed);
        let priv_key = B256::from(il.to_be_bytes::<32>());
        Self { pub_key: pubkey_from_priv(&priv_key), priv_key, chain_code: ir }
    }

    /// The 32-byte private key.
    pub const fn private_key(&self) -> B256 {
        self.priv_key
    }

    /// The 33-byte SEC1-compressed public key.
    pub const fn public_key(&self) -> [u8; 33] {
        self.pub_key
    }

    /// The 32-byte chain code.
    pub const fn chain_code(&self) -> B256 {
        self.chain_code
    }

    /// Drops the private key, producing a watch-only [`EunuchNode`] with
    /// the same public key and chain code.
    pub fn neuter(&self) -> EunuchNode {
        EunuchNode { pub_key: self.pub_key, chain_code: self.chain_code }
    }

    /// Derives child `index`, retrying with `index + 1` (per BIP-32) up to
    /// a small bound if the candidate key is invalid — astronomically
    /// unlikely in practice, but spec-mandated.
    pub fn derive_child(&self, index: u32) -> Result<Self, LocalSignerError> {
        let mut index = index;
        for _ in 0..MAX_DERIVE_RETRIES {
            let hardened = index >= HARDENED_OFFSET;
            let mut data = Vec::with_capacity(37);
            if hardened {
                data.push(0);
                data.extend_from_slice(self.priv_key.as_slice());
            } else {
                data.extend_from_slice(&self.pub_key);
            }
            data.extend_from_slice(&index.to_be_bytes());

            let (il, ir) = hmac_sha512_split(self.chain_code.as_slice(), &data);
            let n = secp256k1_order();
            if il >= n {
                index = index.checked_add(1).ok_or(LocalSignerError::InvalidChildKey)?;
                continue;
            }
            let parent = U256::from_be_bytes(self.priv_key.0);
            let mut child = il + parent;
            if child >= n {
                child -= n;
            }
            if child == U256::ZERO {
                index = index.checked_add(1).ok_or(LocalSignerError::InvalidChildKey)?;
                continue;
            }
            let priv_key = B256::from(child.to_be_bytes::<32>());
            return Ok(Self { pub_key: pubkey_from_priv(&priv_key), priv_key, chain_code: ir });
        }
        Err(LocalSignerError::InvalidChildKey)
    }

    /// Derives along a path like `m/44'/60'/0'/0/0` (`'` or `h` mark a
    /// hardened step).
    pub fn derive_path(&self, path: &str) -> Result<Self, LocalSignerError> {
        let mut node = self.clone();
        for index in parse_derivation_path(path)? {
            node = node.derive_child(index)?;
        }
        Ok(node)
    }
}

impl EunuchNode {
    /// The 33-byte SEC1-compressed public key.
    pub const fn public_key(&self) -> [u8; 33] {
        self.pub_key
    }

    /// The 32-byte chain code.
    pub const fn chain_code(&self) -> B256 {
        self.chain_code
    }

    /// Derives non-hardened child `index` via EC point addition, since no
    /// private key is available to mix in.
    pub fn derive_child(&self, index: u32) -> Result<Self, LocalSignerError> {
        if index >= HARDENED_OFFSET {
            return Err(LocalSignerError::HardenedWithoutPrivateKey);
        }
        let mut index = index;
        for _ in 0..MAX_DERIVE_RETRIES {
            let mut data = Vec::with_capacity(37);
            data.extend_from_slice(&self.pub_key);
            data.extend_from_slice(&index.to_be_bytes());

            let (il, ir) = hmac_sha512_split(self.chain_code.as_slice(), &data);
            let n = secp256k1_order();
            if il >= n || il == U256::ZERO {
                index = index.checked_add(1).ok_or(LocalSignerError::InvalidChildKey)?;
                continue;
            }
            let parent_point = ProjectivePoint::from(
                *PublicKey::from_sec1_bytes(&self.pub_key)
                    .map_err(|_| LocalSignerError::InvalidChildKey)?
                    .as_affine(),
            );
            let child_point = ProjectivePoint::GENERATOR * scalar_from_u256(il) + parent_point;
            if bool::from(child_point.is_identity()) {
                index = index.checked_add(1).ok_or(LocalSignerError::InvalidChildKey)?;
                continue;
            }
            let pub_key = compress_pubkey(&child_point.to_affine());
            return Ok(Self { pub_key, chain_code: ir });
        }
        Err(LocalSignerError::InvalidChildKey)
    }

    /// Derives along a path of only non-hardened steps.
    pub fn derive_path(&self, path: &str) -> Result<Self, LocalSignerError> {
        let mut node = self.clone();
        for index in parse_derivation_path(path)? {
            node = node.derive_child(index)?;
        }
        Ok(node)
    }
}

fn parse_derivation_path(path: &str) -> Result<Vec<u32>, LocalSignerError> {
    let path = path.strip_prefix("m/").or_else(|| path.strip_prefix("m")).unwrap_or(path);
    if path.is_empty() {
        return Ok(Vec::new());
    }
    path.split('/')
        .map(|segment| {
            let (digits, hardened) = match segment.strip_suffix(['\'', 'h', 'H']) {
                Some(d) => (d, true),
                None => (segment, false),
            };
            let index: u32 = digits
                .parse()
                .map_err(|_| LocalSignerError::InvalidDerivationPath(path.to_string()))?;
            if hardened {
                index.checked_add(HARDENED_OFFSET).ok_or_else(|| {
                    LocalSignerError::InvalidDerivationPath(path.to_string())
                })
            } else {
                Ok(index)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_node_derives_from_seed() {
        let seed = [0x5au8; 64];
        let master = HdWalletNode::from_seed(&seed);
        assert_eq!(master.public_key()[0] & 0xfe, 0x02);
    }

    #[test]
    fn hardened_path_matches_non_hardened_neuter_mismatch() {
        let seed = [0x5au8; 64];
        let master = HdWalletNode::from_seed(&seed);
        let eth_account = master.derive_path("m/44'/60'/0'/0/0").unwrap();
        let watch_only = master.derive_path("m/44'/60'/0'").unwrap().neuter();
        let via_watch_only = watch_only.derive_path("0/0").unwrap();
        assert_eq!(eth_account.public_key(), via_watch_only.public_key());
    }

    #[test]
    fn hardened_step_on_eunuch_node_rejected() {
        let seed = [0x5au8; 64];
        let watch_only = HdWalletNode::from_seed(&seed).neuter();
        let err = watch_only.derive_child(HARDENED_OFFSET).unwrap_err();
        assert!(matches!(err, LocalSignerError::HardenedWithoutPrivateKey));
    }

    #[test]
    fn parses_hardened_and_plain_segments() {
        let path = parse_derivation_path("m/44'/60'/0'/0/0").unwrap();
        assert_eq!(path, vec![44 + HARDENED_OFFSET, 60 + HARDENED_OFFSET, HARDENED_OFFSET, 0, 0]);
    }
}
