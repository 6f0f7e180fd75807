use alloc::string::String;

/// An error resolving a [`crate::DynSolType`] from a type string and its
/// tuple components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeParseError {
    /// The type string isn't a recognized primitive, array, or `tuple`.
    #[error("invalid or unrecognized ABI type `{0}`")]
    InvalidType(String),
    /// An integer/bytes width wasn't a valid multiple, or an array length
    /// wasn't a valid number.
    #[error("invalid width or array length in `{0}`")]
    InvalidWidth(String),
}

/// An error encoding or decoding a value against a [`crate::DynSolType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DynAbiError {
    /// A value doesn't structurally match the type it's being encoded
    /// against (wrong variant, wrong tuple arity, wrong array length).
    #[error("value does not match type {0}")]
    TypeMismatch(String),
    /// An integer value doesn't fit in its declared bit width.
    #[error("integer overflows its declared width")]
    Overflow,
    /// A byte string exceeded `bytesN`'s declared capacity.
    #[error("byte string too long for its declared width")]
    BytesOverflow,
    /// The input was shorter than the read being attempted required.
    #[error("input buffer too short")]
    BufferUnderrun,
    /// An offset or length read from the input pointed outside the
    /// buffer.
    #[error("offset or length out of bounds")]
    OffsetOutOfBounds,
    /// The input exceeded the configured `max_bytes` DoS guard.
    #[error("input exceeds the configured maximum of {max} bytes")]
    ExceedsMaxBytes {
        /// The configured ceiling.
        max: usize,
    },
    /// `allow_junk_data` was false and bytes were left over after
    /// decoding.
    #[error("trailing bytes after decoding and allow_junk_data is false")]
    TrailingBytes,
    /// A `bool` word held a value other than `0` or `1`.
    #[error("invalid boolean word")]
    InvalidBool,
    /// A `string` value's bytes weren't valid UTF-8.
    #[error("invalid utf-8 in string value")]
    InvalidUtf8,
    /// A type string couldn't be resolved.
    #[error(transparent)]
    TypeParse(#[from] TypeParseError),
}
