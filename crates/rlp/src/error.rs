use core::fmt;

/// Result alias used throughout this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors that can occur while decoding RLP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The input ended before the declared length was satisfied.
    InputTooShort,
    /// A list's payload did not decode to exactly the declared length.
    ListLengthMismatch {
        /// Declared payload length.
        expected: usize,
        /// Bytes actually consumed.
        got: usize,
    },
    /// The decoded length did not match what the caller expected
    /// (trailing bytes, or a short read).
    UnexpectedLength,
    /// Expected a string header, found a list header (or vice versa).
    UnexpectedString,
    /// Expected a list header, found a string header.
    UnexpectedList,
    /// A length or integer used more bytes than the shortest possible
    /// encoding requires: e.g. a leading zero byte, or a long-form length
    /// tag where the short form would fit.
    NonCanonicalSize,
    /// An integer would not fit in the target width without truncation.
    Overflow,
    /// A fixed-size array or tuple decoded the wrong number of elements.
    UnexpectedFixedLength {
        /// Declared/expected length.
        expected: usize,
        /// Actual length found.
        got: usize,
    },
    /// A sum type's discriminant byte did not match any known variant.
    UnknownVariant,
    /// Recursion exceeded the bound implied by the target type's schema.
    RecursionLimitExceeded,
    /// Catch-all for codec-specific errors raised by downstream crates
    /// (e.g. invalid curve scalars reconstructed from RLP fields).
    Custom(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputTooShort => f.write_str("input too short"),
            Self::ListLengthMismatch { expected, got } => {
                write!(f, "list length mismatch: expected {expected}, decoded {got}")
            }
            Self::UnexpectedLength => f.write_str("unexpected length"),
            Self::UnexpectedString => f.write_str("unexpected string, expected list"),
            Self::UnexpectedList => f.write_str("unexpected list, expected string"),
            Self::NonCanonicalSize => f.write_str("non-canonical RLP length encoding"),
            Self::Overflow => f.write_str("integer overflow decoding RLP"),
            Self::UnexpectedFixedLength { expected, got } => {
                write!(f, "expected {expected} elements, got {got}")
            }
            Self::UnknownVariant => f.write_str("unknown enum variant tag"),
            Self::RecursionLimitExceeded => f.write_str("RLP recursion limit exceeded"),
            Self::Custom(msg) => f.write_str(msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
