//! Hashing helpers.

use crate::fixed::B256;
use alloc::{format, vec::Vec};
use sha3::{Digest, Keccak256};

/// Computes the Keccak-256 digest of `bytes`.
///
/// This is the 256-bit Keccak variant used throughout Ethereum, distinct
/// from the NIST-standardized SHA-3.
pub fn keccak256<T: AsRef<[u8]>>(bytes: T) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(bytes.as_ref());
    let out = hasher.finalize();
    B256::from_slice(out.as_slice())
}

/// Applies the [EIP-191](https://eips.ethereum.org/EIPS/eip-191) personal-message prefix
/// (`"\x19Ethereum Signed Message:\n" || len(message) || message`) and hashes the result.
pub fn eip191_hash_message<T: AsRef<[u8]>>(message: T) -> B256 {
    let message = message.as_ref();
    let mut out: Vec<u8> = Vec::with_capacity(28 + message.len());
    out.extend_from_slice(format!("\x19Ethereum Signed Message:\n{}", message.len()).as_bytes());
    out.extend_from_slice(message);
    keccak256(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_empty() {
        let h = keccak256([]);
        assert_eq!(
            crate::hex::encode(h.0),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
