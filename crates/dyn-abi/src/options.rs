/// Byte order for the handful of fixed-size values whose canonical
/// alignment within a 32-byte word is a convention rather than a rule
/// (`address` is right-aligned; `bytes20` is left-aligned, and callers
/// sometimes store one where the other is expected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    /// Right-aligned within the word (the ABI default).
    #[default]
    Big,
    /// Left-aligned, matching `bytesN`'s packing.
    Little,
}

/// Decoding options, mirrored by the event-log decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Upper bound on the input buffer's length, checked before any
    /// allocation happens; a DoS guard against unbounded offsets/lengths.
    pub max_bytes: usize,
    /// If `false` (the default), trailing bytes left over after decoding
    /// every parameter are rejected.
    pub allow_junk_data: bool,
    /// Alignment convention for `address` within its 32-byte word.
    pub bytes_endian: Endianness,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { max_bytes: 1024, allow_junk_data: false, bytes_endian: Endianness::Big }
    }
}
