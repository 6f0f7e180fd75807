use alloc::vec::Vec;
use core::{fmt, ops::Deref, str::FromStr};

/// Thin wrapper around [`bytes::Bytes`] that formats as `0x`-prefixed hex
/// and parses the same way, matching the wire convention used across the
/// ABI, RLP and transaction codecs.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bytes(pub bytes::Bytes);

impl Bytes {
    /// Creates an empty `Bytes`.
    pub const fn new() -> Self {
        Self(bytes::Bytes::new())
    }

    /// Returns the byte slice.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(value: Vec<u8>) -> Self {
        Self(value.into())
    }
}

impl From<&[u8]> for Bytes {
    fn from(value: &[u8]) -> Self {
        Self(bytes::Bytes::copy_from_slice(value))
    }
}

impl<const N: usize> From<[u8; N]> for Bytes {
    fn from(value: [u8; N]) -> Self {
        Self(bytes::Bytes::copy_from_slice(&value))
    }
}

impl From<bytes::Bytes> for Bytes {
    fn from(value: bytes::Bytes) -> Self {
        Self(value)
    }
}

impl FromStr for Bytes {
    type Err = crate::hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::hex::decode_prefixed(s).map(Into::into)
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes(0x{})", crate::hex::encode(self.as_slice()))
    }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", crate::hex::encode(self.as_slice()))
    }
}
