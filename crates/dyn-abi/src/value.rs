use crate::{
    error::DynAbiError,
    options::{DecodeOptions, Endianness},
    ty::DynSolType,
};
use alloc::{string::String, vec, vec::Vec};
use alloy_primitives::{Address, U256};

const WORD: usize = 32;

/// A decoded or to-be-encoded ABI value, paired one-to-one with a
/// [`DynSolType`] node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynSolValue {
    /// `bool`.
    Bool(bool),
    /// `address`.
    Address(Address),
    /// `function`: 20-byte address then 4-byte selector.
    Function([u8; 24]),
    /// `uintN`: the raw value plus its declared bit width.
    Uint(U256, usize),
    /// `intN`: the full 256-bit two's-complement representation plus its
    /// declared bit width.
    Int(U256, usize),
    /// `bytesN`: the value left-aligned in a 32-byte buffer, plus `N`.
    FixedBytes([u8; 32], usize),
    /// `bytes`.
    Bytes(Vec<u8>),
    /// `string`.
    String(String),
    /// `T[]`.
    Array(Vec<DynSolValue>),
    /// `T[N]`.
    FixedArray(Vec<DynSolValue>),
    /// `tuple` / struct.
    Tuple(Vec<DynSolValue>),
    /// A named struct value; structurally identical to `Tuple`.
    CustomStruct {
        /// The struct's name.
        name: String,
        /// Field names, parallel to `tuple`.
        prop_names: Vec<String>,
        /// Field values.
        tuple: Vec<DynSolValue>,
    },
}

impl DynSolValue {
    /// Builds a `uintN` value, rejecting magnitudes that don't fit `bits`.
    pub fn uint(value: U256, bits: usize) -> Result<Self, DynAbiError> {
        if bits < 256 && value >= (U256::from(1u8) << bits) {
            return Err(DynAbiError::Overflow);
        }
        Ok(Self::Uint(value, bits))
    }

    /// Builds an `intN` value from a signed `i128`, rejecting magnitudes
    /// that don't fit `bits`.
    pub fn int_from_i128(value: i128, bits: usize) -> Result<Self, DynAbiError> {
        let magnitude = U256::from(value.unsigned_abs());
        let repr = if value >= 0 { magnitude } else { U256::ZERO.wrapping_sub(magnitude) };
        if sign_extend(repr, bits) != repr {
            return Err(DynAbiError::Overflow);
        }
        Ok(Self::Int(repr, bits))
    }

    /// Builds a `bytesN` value from up to 32 value bytes, zero-padded on
    /// the right.
    pub fn fixed_bytes(value: &[u8], size: usize) -> Result<Self, DynAbiError> {
        if value.len() != size || size == 0 || size > 32 {
            return Err(DynAbiError::BytesOverflow);
        }
        let mut buf = [0u8; 32];
        buf[..size].copy_from_slice(value);
        Ok(Self::FixedBytes(buf, size))
    }

    /// The type this value would be encoded/decoded against.
    pub fn as_type(&self) -> DynSolType {
        match self {
            Self::Bool(_) => DynSolType::Bool,
            Self::Address(_) => DynSolType::Address,
            Self::Function(_) => DynSolType::Function,
            Self::Uint(_, bits) => DynSolType::Uint(*bits),
            Self::Int(_, bits) => DynSolType::Int(*bits),
            Self::FixedBytes(_, size) => DynSolType::FixedBytes(*size),
            Self::Bytes(_) => DynSolType::Bytes,
            Self::String(_) => DynSolType::String,
            Self::Array(items) => {
                DynSolType::Array(alloc::boxed::Box::new(items.first().map_or(
                    DynSolType::Bytes,
                    DynSolValue::as_type,
                )))
            }
            Self::FixedArray(items) => DynSolType::FixedArray(
                alloc::boxed::Box::new(
                    items.first().map_or(DynSolType::Bytes, DynSolValue::as_type),
                ),
                items.len(),
            ),
            Self::Tuple(items) => DynSolType::Tuple(items.iter().map(DynSolValue::as_type).collect()),
            Self::CustomStruct { name, prop_names, tuple } => DynSolType::CustomStruct {
                name: name.clone(),
                prop_names: prop_names.clone(),
                tuple: tuple.iter().map(DynSolValue::as_type).collect(),
            },
        }
    }

    fn is_dynamic(&self) -> bool {
        match self {
            Self::Bool(_)
            | Self::Address(_)
            | Self::Function(_)
            | Self::Uint(..)
            | Self::Int(..)
            | Self::FixedBytes(..) => false,
            Self::Bytes(_) | Self::String(_) | Self::Array(_) => true,
            Self::FixedArray(items) => items.iter().any(DynSolValue::is_dynamic),
            Self::Tuple(items) => items.iter().any(DynSolValue::is_dynamic),
            Self::CustomStruct { tuple, .. } => tuple.iter().any(DynSolValue::is_dynamic),
        }
    }

    fn head_words(&self) -> usize {
        match self {
            Self::Bool(_)
            | Self::Address(_)
            | Self::Function(_)
            | Self::Uint(..)
            | Self::Int(..)
            | Self::FixedBytes(..)
            | Self::Bytes(_)
            | Self::String(_)
            | Self::Array(_) => 1,
            Self::FixedArray(items) => items.iter().map(DynSolValue::head_words).sum(),
            Self::Tuple(items) => items.iter().map(DynSolValue::head_words).sum(),
            Self::CustomStruct { tuple, .. } => tuple.iter().map(DynSolValue::head_words).sum(),
        }
    }

    fn encode_to(&self, out: &mut Vec<u8>, bytes_endian: Endianness) {
        match self {
            Self::Bool(b) => {
                let mut word = [0u8; 32];
                word[31] = *b as u8;
                out.extend_from_slice(&word);
            }
            Self::Address(addr) => out.extend_from_slice(&word_for_address(addr, bytes_endian)),
            Self::Function(bytes) => {
                let mut word = [0u8; 32];
                word[..24].copy_from_slice(bytes);
                out.extend_from_slice(&word);
            }
            Self::Uint(value, _) | Self::Int(value, _) => {
                out.extend_from_slice(&value.to_be_bytes_vec())
            }
            Self::FixedBytes(bytes, _) => out.extend_from_slice(bytes),
            Self::Bytes(bytes) => encode_length_prefixed(bytes, out),
            Self::String(s) => encode_length_prefixed(s.as_bytes(), out),
            Self::Array(items) => {
                out.extend_from_slice(&word_from_usize(items.len()));
                out.extend(encode_sequence(items, bytes_endian));
            }
            Self::FixedArray(items) => out.extend(encode_sequence(items, bytes_endian)),
            Self::Tuple(items) => out.extend(encode_sequence(items, bytes_endian)),
            Self::CustomStruct { tuple, .. } => out.extend(encode_sequence(tuple, bytes_endian)),
        }
    }
}

fn sign_extend(value: U256, bits: usize) -> U256 {
    if bits >= 256 {
        return value;
    }
    let sign_bit = U256::from(1u8) << (bits - 1);
    let mask = (U256::from(1u8) << bits) - U256::from(1u8);
    let truncated = value & mask;
    if truncated & sign_bit != U256::ZERO {
        truncated | !mask
    } else {
        truncated
    }
}

fn word_from_usize(n: usize) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[32 - core::mem::size_of::<usize>()..].copy_from_slice(&n.to_be_bytes());
    word
}

fn word_for_address(addr: &Address, endian: Endianness) -> [u8; 32] {
    let mut word = [0u8; 32];
    match endian {
        Endianness::Big => word[12..].copy_from_slice(addr.as_slice()),
        Endianness::Little => word[..20].copy_from_slice(addr.as_slice()),
    }
    word
}

fn encode_length_prefixed(data: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&word_from_usize(data.len()));
    out.extend_from_slice(data);
    let padding = (WORD - (data.len() % WORD)) % WORD;
    out.extend(core::iter::repeat(0u8).take(padding));
}

fn encode_sequence(values: &[DynSolValue], bytes_endian: Endianness) -> Vec<u8> {
    let head_words: Vec<usize> =
        values.iter().map(|v| if v.is_dynamic() { 1 } else { v.head_words() }).collect();
    let head_size_bytes = head_words.iter().sum::<usize>() * WORD;
    let mut head = Vec::with_capacity(head_size_bytes);
    let mut tail = Vec::new();
    for (value, _) in values.iter().zip(&head_words) {
        if value.is_dynamic() {
            let offset = head_size_bytes + tail.len();
            head.extend_from_slice(&word_from_usize(offset));
            value.encode_to(&mut tail, bytes_endian);
        } else {
            value.encode_to(&mut head, bytes_endian);
        }
    }
    head.extend(tail);
    head
}

/// Encodes a parameter list the way a Solidity call's argument tuple is
/// encoded: as a head/tail block with no outer offset wrapper of its own.
pub fn encode_params(values: &[DynSolValue]) -> Vec<u8> {
    encode_sequence(values, Endianness::Big)
}

/// Encodes a function/error call: the 4-byte selector followed by
/// [`encode_params`]'s output.
pub fn encode_function_call(selector: [u8; 4], values: &[DynSolValue]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + values.len() * WORD);
    out.extend_from_slice(&selector);
    out.extend(encode_params(values));
    out
}

/// Encodes a single value the way it would appear as one element of a
/// parameter list, with an explicit alignment for `address`/`bytes20`-like
/// values. Event-log topic encoding needs the endianness knob; ordinary
/// call encoding always wants [`Endianness::Big`] and goes through
/// [`encode_params`] instead.
pub fn encode_single(value: &DynSolValue, bytes_endian: Endianness) -> Vec<u8> {
    encode_sequence(core::slice::from_ref(value), bytes_endian)
}

struct Decoder<'a> {
    buf: &'a [u8],
    options: &'a DecodeOptions,
    high_water: usize,
}

impl<'a> Decoder<'a> {
    fn read_word(&mut self, at: usize) -> Result<[u8; 32], DynAbiError> {
        let end = at.checked_add(WORD).ok_or_else(|| {
            tracing::debug!(at, "abi decode: word offset overflowed usize");
            DynAbiError::OffsetOutOfBounds
        })?;
        let slice = self.buf.get(at..end).ok_or(DynAbiError::BufferUnderrun)?;
        self.high_water = self.high_water.max(end);
        let mut word = [0u8; 32];
        word.copy_from_slice(slice);
        Ok(word)
    }

    fn read_words(&mut self, at: usize, n: usize) -> Result<&'a [u8], DynAbiError> {
        let end = at.checked_add(n * WORD).ok_or(DynAbiError::OffsetOutOfBounds)?;
        let slice = self.buf.get(at..end).ok_or(DynAbiError::BufferUnderrun)?;
        self.high_water = self.high_water.max(end);
        Ok(slice)
    }

    fn read_length_prefixed(&mut self, at: usize) -> Result<&'a [u8], DynAbiError> {
        let len_word = self.read_word(at)?;
        let len = word_to_usize(&len_word)?;
        let data_start = at + WORD;
        let data_end = data_start.checked_add(len).ok_or(DynAbiError::OffsetOutOfBounds)?;
        let data = self.buf.get(data_start..data_end).ok_or(DynAbiError::BufferUnderrun)?;
        let padded_end = data_start + padded_len(len);
        self.high_water = self.high_water.max(padded_end.min(self.buf.len()).max(data_end));
        Ok(data)
    }

    fn decode_sequence(
        &mut self,
        types: &[DynSolType],
        region_start: usize,
    ) -> Result<Vec<DynSolValue>, DynAbiError> {
        let mut cursor = region_start;
        let mut out = Vec::with_capacity(types.len());
        for ty in types {
            if ty.is_dynamic() {
                let offset_word = self.read_word(cursor)?;
                let offset = word_to_usize(&offset_word)?;
                let target = region_start.checked_add(offset).ok_or_else(|| {
                    tracing::debug!(region_start, offset, "abi decode: offset overflowed usize");
                    DynAbiError::OffsetOutOfBounds
                })?;
                out.push(self.decode_value(ty, target)?);
                cursor += WORD;
            } else {
                out.push(self.decode_value(ty, cursor)?);
                cursor += ty.head_words() * WORD;
            }
        }
        Ok(out)
    }

    fn decode_value(&mut self, ty: &DynSolType, at: usize) -> Result<DynSolValue, DynAbiError> {
        match ty {
            DynSolType::Bool => {
                let word = self.read_word(at)?;
                match word[31] {
                    0 => Ok(DynSolValue::Bool(false)),
                    1 => Ok(DynSolValue::Bool(true)),
                    _ => Err(DynAbiError::InvalidBool),
                }
            }
            DynSolType::Address => {
                let word = self.read_word(at)?;
                let bytes = match self.options.bytes_endian {
                    Endianness::Big => &word[12..32],
                    Endianness::Little => &word[0..20],
                };
                Ok(DynSolValue::Address(Address::new(bytes.try_into().unwrap())))
            }
            DynSolType::Function => {
                let word = self.read_word(at)?;
                let mut bytes = [0u8; 24];
                bytes.copy_from_slice(&word[..24]);
                Ok(DynSolValue::Function(bytes))
            }
            DynSolType::Uint(bits) => {
                let word = self.read_word(at)?;
                let value = U256::from_be_bytes(word);
                if *bits < 256 && value >= (U256::from(1u8) << *bits) {
                    return Err(DynAbiError::Overflow);
                }
                Ok(DynSolValue::Uint(value, *bits))
            }
            DynSolType::Int(bits) => {
                let word = self.read_word(at)?;
                let value = U256::from_be_bytes(word);
                if sign_extend(value, *bits) != value {
                    return Err(DynAbiError::Overflow);
                }
                Ok(DynSolValue::Int(value, *bits))
            }
            DynSolType::FixedBytes(size) => {
                let word = self.read_word(at)?;
                Ok(DynSolValue::FixedBytes(word, *size))
            }
            DynSolType::Bytes => {
                let data = self.read_length_prefixed(at)?;
                Ok(DynSolValue::Bytes(data.to_vec()))
            }
            DynSolType::String => {
                let data = self.read_length_prefixed(at)?;
                String::from_utf8(data.to_vec())
                    .map(DynSolValue::String)
                    .map_err(|_| DynAbiError::InvalidUtf8)
            }
            DynSolType::Array(child) => {
                let len_word = self.read_word(at)?;
                let len = word_to_usize(&len_word)?;
                let types = vec![(**child).clone(); len];
                let values = self.decode_sequence(&types, at + WORD)?;
                Ok(DynSolValue::Array(values))
            }
            DynSolType::FixedArray(child, n) => {
                let types = vec![(**child).clone(); *n];
                let values = self.decode_sequence(&types, at)?;
                Ok(DynSolValue::FixedArray(values))
            }
            DynSolType::Tuple(components) => {
                let values = self.decode_sequence(components, at)?;
                Ok(DynSolValue::Tuple(values))
            }
            DynSolType::CustomStruct { name, prop_names, tuple } => {
                let values = self.decode_sequence(tuple, at)?;
                Ok(DynSolValue::CustomStruct {
                    name: name.clone(),
                    prop_names: prop_names.clone(),
                    tuple: values,
                })
            }
        }
    }
}

fn word_to_usize(word: &[u8; 32]) -> Result<usize, DynAbiError> {
    if word[..32 - core::mem::size_of::<usize>()].iter().any(|&b| b != 0) {
        return Err(DynAbiError::OffsetOutOfBounds);
    }
    let mut buf = [0u8; core::mem::size_of::<usize>()];
    buf.copy_from_slice(&word[32 - core::mem::size_of::<usize>()..]);
    Ok(usize::from_be_bytes(buf))
}

fn padded_len(len: usize) -> usize {
    (len + WORD - 1) / WORD * WORD
}

/// Decodes a parameter list previously produced by [`encode_params`].
pub fn decode_params(
    types: &[DynSolType],
    data: &[u8],
    options: &DecodeOptions,
) -> Result<Vec<DynSolValue>, DynAbiError> {
    if data.len() > options.max_bytes {
        tracing::debug!(len = data.len(), max = options.max_bytes, "abi decode: input exceeds max_bytes");
        return Err(DynAbiError::ExceedsMaxBytes { max: options.max_bytes });
    }
    let mut decoder = Decoder { buf: data, options, high_water: 0 };
    let values = decoder.decode_sequence(types, 0)?;
    if !options.allow_junk_data && decoder.high_water != data.len() {
        return Err(DynAbiError::TrailingBytes);
    }
    Ok(values)
}

/// Strips and validates a 4-byte selector, then decodes the remaining
/// parameters.
pub fn decode_function_call(
    expected_selector: [u8; 4],
    types: &[DynSolType],
    data: &[u8],
    options: &DecodeOptions,
) -> Result<Vec<DynSolValue>, DynAbiError> {
    let selector = data.get(..4).ok_or(DynAbiError::BufferUnderrun)?;
    if selector != expected_selector {
        return Err(DynAbiError::TypeMismatch("selector mismatch".into()));
    }
    decode_params(types, &data[4..], options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_hello_world_string() {
        let value = DynSolValue::String("Hello World".into());
        let encoded = encode_params(&[value]);
        let expected = concat!(
            "0000000000000000000000000000000000000000000000000000000000000020",
            "000000000000000000000000000000000000000000000000000000000000000b",
            "48656c6c6f20576f726c64000000000000000000000000000000000000000000",
        );
        assert_eq!(hex::encode(&encoded), expected);
    }

    #[test]
    fn string_roundtrips() {
        let value = DynSolValue::String("Hello World".into());
        let encoded = encode_params(&[value.clone()]);
        let decoded = decode_params(&[DynSolType::String], &encoded, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded, vec![value]);
    }

    #[test]
    fn uint_and_address_roundtrip() {
        let values = vec![
            DynSolValue::uint(U256::from(69u64), 256).unwrap(),
            DynSolValue::Address(Address::new([0x11; 20])),
        ];
        let encoded = encode_params(&values);
        let decoded =
            decode_params(&[DynSolType::Uint(256), DynSolType::Address], &encoded, &DecodeOptions::default())
                .unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn dynamic_array_roundtrips() {
        let values = vec![DynSolValue::Array(vec![
            DynSolValue::uint(U256::from(1u64), 256).unwrap(),
            DynSolValue::uint(U256::from(2u64), 256).unwrap(),
        ])];
        let encoded = encode_params(&values);
        let ty = DynSolType::Array(alloc::boxed::Box::new(DynSolType::Uint(256)));
        let decoded = decode_params(&[ty], &encoded, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn negative_int_roundtrips() {
        let value = DynSolValue::int_from_i128(-420, 256).unwrap();
        let encoded = encode_params(&[value.clone()]);
        let decoded = decode_params(&[DynSolType::Int(256)], &encoded, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded, vec![value]);
    }

    #[test]
    fn rejects_trailing_bytes_by_default() {
        let values = vec![DynSolValue::uint(U256::from(1u64), 256).unwrap()];
        let mut encoded = encode_params(&values);
        encoded.extend_from_slice(&[0xff; 32]);
        let err = decode_params(&[DynSolType::Uint(256)], &encoded, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err, DynAbiError::TrailingBytes);
    }

    #[test]
    fn rejects_input_over_max_bytes() {
        let options = DecodeOptions { max_bytes: 16, ..DecodeOptions::default() };
        let err = decode_params(&[DynSolType::Uint(256)], &[0u8; 32], &options).unwrap_err();
        assert_eq!(err, DynAbiError::ExceedsMaxBytes { max: 16 });
    }
}
