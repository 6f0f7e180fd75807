use crate::{hex, utils::keccak256};
use alloc::{format, string::String};
use core::{fmt, str::FromStr};

/// Error returned by [`Address::parse_checksummed`].
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    /// The string was not valid hex, or was the wrong length.
    #[error(transparent)]
    Hex(#[from] hex::FromHexError),
    /// The hex decoded to 20 bytes, but the mixed-case checksum did not
    /// match the [EIP-55](https://eips.ethereum.org/EIPS/eip-55) encoding.
    #[error("bad address checksum")]
    InvalidChecksum,
}

macro_rules! fixed_bytes {
    ($name:ident, $n:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub [u8; $n]);

        impl $name {
            /// The all-zero value.
            pub const ZERO: Self = Self([0u8; $n]);

            /// Wraps a raw byte array.
            pub const fn new(bytes: [u8; $n]) -> Self {
                Self(bytes)
            }

            /// Returns the inner bytes as a slice.
            pub const fn as_slice(&self) -> &[u8] {
                &self.0
            }

            /// Copies from a slice, requiring an exact length match.
            pub fn from_slice(slice: &[u8]) -> Self {
                let mut bytes = [0u8; $n];
                bytes.copy_from_slice(slice);
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $n]> for $name {
            fn from(value: [u8; $n]) -> Self {
                Self(value)
            }
        }

        impl From<$name> for [u8; $n] {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = hex::FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes = hex::decode_prefixed(s)?;
                if bytes.len() != $n {
                    return Err(hex::FromHexError::InvalidStringLength);
                }
                Ok(Self::from_slice(&bytes))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }
    };
}

fixed_bytes!(B256, 32, "A 32-byte hash, such as a keccak256 digest or a storage key.");

/// A 20-byte Ethereum account address.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Wraps a raw 20-byte array.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the inner bytes as a slice.
    pub const fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Copies from a slice, requiring an exact 20-byte length match.
    pub fn from_slice(slice: &[u8]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(slice);
        Self(bytes)
    }

    /// Derives the address that owns the given secp256k1 public key, per
    /// the Ethereum convention: the last 20 bytes of
    /// `keccak256(uncompressed_pubkey[1..])`.
    pub fn from_public_key(pubkey: &k256::ecdsa::VerifyingKey) -> Self {
        let uncompressed = pubkey.to_encoded_point(false);
        let hash = keccak256(&uncompressed.as_bytes()[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash.0[12..]);
        Self(bytes)
    }

    /// Encodes this address using its [EIP-55](https://eips.ethereum.org/EIPS/eip-55) mixed-case
    /// checksum, optionally mixed with an [EIP-1191] chain id.
    ///
    /// [EIP-1191]: https://eips.ethereum.org/EIPS/eip-1191
    pub fn to_checksum(&self, chain_id: Option<u64>) -> String {
        let lower = hex::encode(self.0);
        let to_hash = match chain_id {
            Some(id) => format!("{id}{lower}"),
            None => lower.clone(),
        };
        let hash = keccak256(to_hash.as_bytes());
        let hash_hex = hex::encode(hash.0);

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            // The i-th hex digit of the address is uppercased iff the i-th
            // nibble of keccak256(lower_hex) is >= 8.
            let nibble = u8::from_str_radix(&hash_hex[i..i + 1], 16).unwrap();
            if nibble >= 8 {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Parses a hex address string, verifying its EIP-55 checksum if the
    /// string has mixed case. All-lowercase or all-uppercase strings are
    /// accepted without a checksum check, matching common tooling.
    pub fn parse_checksummed(s: &str, chain_id: Option<u64>) -> Result<Self, AddressError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let has_mixed_case = stripped.chars().any(|c| c.is_ascii_uppercase())
            && stripped.chars().any(|c| c.is_ascii_lowercase());

        let addr = Self::from_str(stripped)?;
        if has_mixed_case && addr.to_checksum(chain_id) != format!("0x{stripped}") {
            return Err(AddressError::InvalidChecksum);
        }
        Ok(addr)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(value: [u8; 20]) -> Self {
        Self(value)
    }
}

impl From<Address> for [u8; 20] {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode_prefixed(s)?;
        if bytes.len() != 20 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        Ok(Self::from_slice(&bytes))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum(None))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum(None))
    }
}

/// The `to` field of a transaction: either a call to an existing account, or
/// `None` to signal contract creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TxKind {
    /// A contract creation transaction; `to` is the empty RLP string.
    #[default]
    Create,
    /// A call to the given account.
    Call(Address),
}

impl TxKind {
    /// Returns `true` for [`TxKind::Create`].
    pub const fn is_create(&self) -> bool {
        matches!(self, Self::Create)
    }

    /// Returns the callee address, if any.
    pub const fn to(&self) -> Option<&Address> {
        match self {
            Self::Create => None,
            Self::Call(addr) => Some(addr),
        }
    }

    /// Heuristic in-memory size.
    pub const fn size(&self) -> usize {
        core::mem::size_of::<Self>()
    }
}

impl From<Option<Address>> for TxKind {
    fn from(value: Option<Address>) -> Self {
        match value {
            Some(addr) => Self::Call(addr),
            None => Self::Create,
        }
    }
}

impl From<Address> for TxKind {
    fn from(value: Address) -> Self {
        Self::Call(value)
    }
}
