//! The event log codec: turns an [`alloy_json_abi::Event`] plus argument
//! values into the `(topics, data)` pair a transaction receipt carries, and
//! back.
//!
//! Topic 0 is `keccak256` of the event's canonical signature (already
//! implemented by [`Event::topic0`]); each indexed parameter after that
//! contributes one more topic word. Static primitives are padded/sign-extended
//! into the word directly, so they decode back out losslessly. Dynamic values
//! (`string`, `bytes`, indexed arrays and tuples) are hashed instead — the log
//! only ever carries their digest, never the original bytes, so decoding such
//! a topic can only hand back the opaque hash.

use alloc::{vec, vec::Vec};
use alloy_dyn_abi::{decode_params, encode_params, encode_single, DecodeOptions, DynSolType, DynSolValue, Endianness};
use alloy_json_abi::Event;
use alloy_primitives::{keccak256, Address, Bytes, B256};

/// Failures from [`LogData::encode_event`]/[`LogData::decode_event`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LogCodecError {
    /// An indexed parameter's `ty`/`components` could not be resolved to a
    /// type tree.
    #[error("unresolvable event parameter type: {0}")]
    UnresolvableType(alloy_dyn_abi::TypeParseError),
    /// The non-indexed parameters failed to ABI-decode from `data`.
    #[error("failed to decode log data: {0}")]
    DataDecode(alloy_dyn_abi::DynAbiError),
    /// The topic count did not match the event's indexed-parameter count
    /// (off by one for topic 0 on a non-anonymous event).
    #[error("expected {expected} topics, got {got}")]
    TopicCountMismatch {
        /// Topics the event's shape requires.
        expected: usize,
        /// Topics actually present.
        got: usize,
    },
    /// `topic0` did not match [`Event::topic0`] for a non-anonymous event.
    #[error("topic0 mismatch: log does not belong to this event")]
    Topic0Mismatch,
}

/// The body of a log: topics plus the ABI-encoded non-indexed data. Carries
/// no address — see [`Log`] for the full record a receipt stores.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogData {
    /// `topics[0]` is the event signature hash for a non-anonymous event;
    /// the rest are one word per indexed parameter.
    topics: Vec<B256>,
    /// The non-indexed parameters, ABI-encoded together as a tuple.
    data: Bytes,
}

impl LogData {
    /// Builds a log body from already-computed topics and data, with no
    /// validation against any [`Event`] shape.
    pub fn new_unchecked(topics: Vec<B256>, data: Bytes) -> Self {
        Self { topics, data }
    }

    /// The topic list, `topics[0]` (if present) being the event selector.
    pub fn topics(&self) -> &[B256] {
        &self.topics
    }

    /// The ABI-encoded non-indexed parameters.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Encodes `values` (one per entry in `event.inputs`, in declaration
    /// order) into this event's topics and data.
    ///
    /// Indexed static primitives are written as a single topic word,
    /// aligned per `bytes_endian` (matters only for `address`/`bytesN`
    /// mixing). Indexed `string`/`bytes` become `keccak256` of their raw
    /// bytes; indexed arrays, fixed arrays and tuples become `keccak256` of
    /// their ABI encoding — in both cases the topic can only ever be
    /// compared against a known pre-image, never decoded back.
    pub fn encode_event(
        event: &Event,
        values: &[DynSolValue],
        bytes_endian: Endianness,
    ) -> Result<Self, LogCodecError> {
        let mut topics = Vec::with_capacity(event.inputs.len() + 1);
        if let Some(topic0) = event.topic0() {
            topics.push(topic0);
        }

        let mut data_values = Vec::new();
        for (param, value) in event.inputs.iter().zip(values) {
            if param.indexed {
                topics.push(topic_word(value, bytes_endian));
            } else {
                data_values.push(value.clone());
            }
        }

        Ok(Self { topics, data: Bytes::from(encode_params(&data_values)) })
    }

    /// Recovers the non-indexed parameter values and, for each indexed
    /// static-typed parameter, its decoded value (`None` for a dynamic
    /// parameter, whose topic only ever carries a hash).
    ///
    /// Fails if `topics[0]` doesn't match [`Event::topic0`] (for a
    /// non-anonymous event) or if the topic count doesn't match the event's
    /// indexed-parameter count.
    pub fn decode_event(
        &self,
        event: &Event,
        options: &DecodeOptions,
    ) -> Result<Vec<Option<DynSolValue>>, LogCodecError> {
        let mut topics = self.topics.iter();
        if let Some(expected) = event.topic0() {
            match topics.next() {
                Some(got) if *got == expected => {}
                _ => return Err(LogCodecError::Topic0Mismatch),
            }
        }

        let indexed_count = event.indexed_params().count();
        let remaining = topics.len();
        if remaining != indexed_count {
            return Err(LogCodecError::TopicCountMismatch { expected: indexed_count, got: remaining });
        }

        let non_indexed_types: Vec<DynSolType> = event
            .non_indexed_params()
            .map(|p| DynSolType::parse(&p.ty, &p.components).map_err(LogCodecError::UnresolvableType))
            .collect::<Result<_, _>>()?;
        let mut data_values =
            decode_params(&non_indexed_types, &self.data, options).map_err(LogCodecError::DataDecode)?.into_iter();

        let mut out = Vec::with_capacity(event.inputs.len());
        for param in &event.inputs {
            if param.indexed {
                let topic = topics.next().expect("count checked above");
                let ty = DynSolType::parse(&param.ty, &param.components)
                    .map_err(LogCodecError::UnresolvableType)?;
                out.push(decode_topic(&ty, topic, options));
            } else {
                out.push(data_values.next());
            }
        }
        Ok(out)
    }
}

/// Computes one topic word for an indexed parameter's value.
fn topic_word(value: &DynSolValue, bytes_endian: Endianness) -> B256 {
    match value {
        DynSolValue::Bytes(bytes) => keccak256(bytes),
        DynSolValue::String(s) => keccak256(s.as_bytes()),
        DynSolValue::Array(_) | DynSolValue::FixedArray(_) | DynSolValue::Tuple(_) | DynSolValue::CustomStruct { .. } => {
            keccak256(encode_single(value, bytes_endian))
        }
        _ => B256::from_slice(&encode_single(value, bytes_endian)),
    }
}

/// Decodes a static-typed indexed parameter's topic word; returns `None` for
/// a dynamic type, whose topic is an opaque hash.
fn decode_topic(ty: &DynSolType, topic: &B256, options: &DecodeOptions) -> Option<DynSolValue> {
    if matches!(
        ty,
        DynSolType::Bytes
            | DynSolType::String
            | DynSolType::Array(_)
            | DynSolType::FixedArray(..)
            | DynSolType::Tuple(_)
            | DynSolType::CustomStruct { .. }
    ) {
        return None;
    }
    let mut word_options = *options;
    word_options.allow_junk_data = true;
    decode_params(core::slice::from_ref(ty), topic.as_slice(), &word_options)
        .ok()
        .and_then(|mut values| values.pop())
}

/// A full log record as carried by a transaction receipt: the emitting
/// contract's address plus its [`LogData`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Log<T = LogData> {
    /// The contract that emitted this log.
    pub address: Address,
    /// Topics and data.
    pub data: T,
}

impl<T> Log<T> {
    /// Pairs an address with already-built log data.
    pub const fn new_unchecked(address: Address, data: T) -> Self {
        Self { address, data }
    }
}

impl Log {
    /// Topics, `topics[0]` being the event selector for a non-anonymous
    /// event.
    pub fn topics(&self) -> &[B256] {
        self.data.topics()
    }

    /// The ABI-encoded non-indexed parameters.
    pub fn data(&self) -> &Bytes {
        self.data.data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_json_abi::EventParam;
    use alloy_primitives::U256;

    fn transfer_event() -> Event {
        Event {
            name: "Transfer".into(),
            inputs: vec![
                EventParam::new("from", "address", true),
                EventParam::new("to", "address", true),
                EventParam::new("value", "uint256", false),
            ],
            anonymous: false,
        }
    }

    #[test]
    fn encodes_and_decodes_a_transfer_log() {
        let event = transfer_event();
        let from = Address::new([0x11; 20]);
        let to = Address::new([0x22; 20]);
        let values = vec![
            DynSolValue::Address(from),
            DynSolValue::Address(to),
            DynSolValue::Uint(U256::from(1_000_u64), 256),
        ];

        let log = LogData::encode_event(&event, &values, Endianness::Big).unwrap();
        assert_eq!(log.topics().len(), 3);
        assert_eq!(log.topics()[0], event.topic0().unwrap());

        let decoded = log.decode_event(&event, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded[0], Some(DynSolValue::Address(from)));
        assert_eq!(decoded[1], Some(DynSolValue::Address(to)));
        assert_eq!(decoded[2], Some(DynSolValue::Uint(U256::from(1_000_u64), 256)));
    }

    #[test]
    fn indexed_string_is_opaque_on_decode() {
        let event = Event {
            name: "Named".into(),
            inputs: vec![EventParam::new("name", "string", true)],
            anonymous: false,
        };
        let values = vec![DynSolValue::String("hello".into())];
        let log = LogData::encode_event(&event, &values, Endianness::Big).unwrap();
        assert_eq!(log.topics()[1], keccak256(b"hello"));

        let decoded = log.decode_event(&event, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded[0], None);
    }

    #[test]
    fn rejects_topic0_mismatch() {
        let event = transfer_event();
        let mut log = LogData::encode_event(
            &event,
            &[
                DynSolValue::Address(Address::new([1; 20])),
                DynSolValue::Address(Address::new([2; 20])),
                DynSolValue::Uint(U256::ZERO, 256),
            ],
            Endianness::Big,
        )
        .unwrap();
        log.topics[0] = B256::ZERO;
        assert_eq!(
            log.decode_event(&event, &DecodeOptions::default()).unwrap_err(),
            LogCodecError::Topic0Mismatch
        );
    }

    #[test]
    fn encodes_mixed_indexed_topics_matching_reference_values() {
        use core::str::FromStr;

        let event = Event {
            name: "Foo".into(),
            inputs: vec![
                EventParam::new("a", "uint256", true),
                EventParam::new("b", "int256", true),
                EventParam::new("c", "bool", true),
                EventParam::new("d", "bytes5", true),
            ],
            anonymous: false,
        };
        let values = vec![
            DynSolValue::uint(U256::from(69_u64), 256).unwrap(),
            DynSolValue::int_from_i128(-420, 256).unwrap(),
            DynSolValue::Bool(true),
            DynSolValue::fixed_bytes(b"01234", 5).unwrap(),
        ];

        let log = LogData::encode_event(&event, &values, Endianness::Big).unwrap();
        assert_eq!(
            log.topics()[0],
            B256::from_str("0x08056cee0ec7df6d2ab8d10ab36f1ac8be153e2a0001198ef7b4c17dde75cbc4")
                .unwrap()
        );
        assert_eq!(
            log.topics()[1],
            B256::from_str("0x0000000000000000000000000000000000000000000000000000000000000045")
                .unwrap()
        );
        assert_eq!(
            log.topics()[2],
            B256::from_str("0xfffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe5c")
                .unwrap()
        );
        assert_eq!(
            log.topics()[3],
            B256::from_str("0x0000000000000000000000000000000000000000000000000000000000000001")
                .unwrap()
        );
        assert_eq!(
            log.topics()[4],
            B256::from_str("0x3031323334000000000000000000000000000000000000000000000000000000")
                .unwrap()
        );
    }

    #[test]
    fn anonymous_event_has_no_selector_topic() {
        let event = Event {
            name: "Anon".into(),
            inputs: vec![EventParam::new("x", "uint256", true)],
            anonymous: true,
        };
        let values = vec![DynSolValue::Uint(U256::from(7_u64), 256)];
        let log = LogData::encode_event(&event, &values, Endianness::Big).unwrap();
        assert_eq!(log.topics().len(), 1);
        let decoded = log.decode_event(&event, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded[0], Some(DynSolValue::Uint(U256::from(7_u64), 256)));
    }
}
