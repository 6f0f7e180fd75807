use crate::{EventParam, Param};
use alloc::{format, string::String, vec::Vec};
use alloy_primitives::{keccak256, B256};
use itertools::Itertools;

/// A function's declared state mutability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StateMutability {
    /// Reads no state, writes no state.
    Pure,
    /// May read state, writes no state.
    View,
    /// May read and write state; rejects non-zero `msg.value`.
    #[default]
    NonPayable,
    /// May read and write state; accepts `msg.value`.
    Payable,
}

/// A contract function.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    /// The function name.
    pub name: String,
    /// Input parameters, in declaration order.
    pub inputs: Vec<Param>,
    /// Output parameters, in declaration order.
    pub outputs: Vec<Param>,
    /// Declared state mutability.
    #[cfg_attr(feature = "serde", serde(rename = "stateMutability"))]
    pub state_mutability: StateMutability,
}

impl Function {
    /// The canonical signature string: `name(type1,type2,...)`, tuples
    /// expanded inline, per §4.2.
    pub fn signature(&self) -> String {
        format!(
            "{}({})",
            self.name,
            self.inputs.iter().map(Param::ty_signature).join(",")
        )
    }

    /// The 4-byte function selector: the first 4 bytes of
    /// `keccak256(signature)`.
    pub fn selector(&self) -> [u8; 4] {
        selector_of(&self.signature())
    }
}

/// A contract error (Solidity `error` declaration, used for revert reasons).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Error {
    /// The error name.
    pub name: String,
    /// Fields, in declaration order.
    pub inputs: Vec<Param>,
}

impl Error {
    /// See [`Function::signature`].
    pub fn signature(&self) -> String {
        format!(
            "{}({})",
            self.name,
            self.inputs.iter().map(Param::ty_signature).join(",")
        )
    }

    /// See [`Function::selector`].
    pub fn selector(&self) -> [u8; 4] {
        selector_of(&self.signature())
    }
}

/// A contract constructor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constructor {
    /// Input parameters, in declaration order.
    pub inputs: Vec<Param>,
    /// Declared state mutability (`payable` or `nonpayable`).
    #[cfg_attr(feature = "serde", serde(rename = "stateMutability"))]
    pub state_mutability: StateMutability,
}

/// A contract's fallback function.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fallback {
    /// Declared state mutability (`payable` or `nonpayable`).
    #[cfg_attr(feature = "serde", serde(rename = "stateMutability"))]
    pub state_mutability: StateMutability,
}

/// A contract's `receive` function.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Receive {
    /// Always `payable`: `receive` cannot be declared otherwise.
    #[cfg_attr(feature = "serde", serde(rename = "stateMutability"))]
    pub state_mutability: StateMutability,
}

/// A contract event declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// The event name.
    pub name: String,
    /// Parameters, in declaration order, each carrying its own `indexed`
    /// flag.
    pub inputs: Vec<EventParam>,
    /// `true` if the event omits the signature topic (topic 0), per
    /// Solidity's `anonymous` modifier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub anonymous: bool,
}

impl Event {
    /// See [`Function::signature`].
    pub fn signature(&self) -> String {
        format!(
            "{}({})",
            self.name,
            self.inputs.iter().map(EventParam::ty_signature).join(",")
        )
    }

    /// Topic 0: `keccak256(signature)`, or `None` for anonymous events.
    pub fn topic0(&self) -> Option<B256> {
        if self.anonymous {
            None
        } else {
            Some(keccak256(self.signature().as_bytes()))
        }
    }

    /// The subset of `inputs` that contribute a topic, in order.
    pub fn indexed_params(&self) -> impl Iterator<Item = &EventParam> {
        self.inputs.iter().filter(|p| p.indexed)
    }

    /// The subset of `inputs` that are ABI-encoded into the log's `data`
    /// field, in order.
    pub fn non_indexed_params(&self) -> impl Iterator<Item = &EventParam> {
        self.inputs.iter().filter(|p| !p.indexed)
    }
}

fn selector_of(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash.0[..4]);
    out
}

/// Any one item of a contract's JSON ABI.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum AbiItem {
    /// A function.
    Function(Function),
    /// An event.
    Event(Event),
    /// An error.
    Error(Error),
    /// The constructor.
    Constructor(Constructor),
    /// The fallback function.
    Fallback(Fallback),
    /// The `receive` function.
    Receive(Receive),
}

impl AbiItem {
    /// The item's name, if it has one (constructor/fallback/receive don't).
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Function(f) => Some(&f.name),
            Self::Event(e) => Some(&e.name),
            Self::Error(e) => Some(&e.name),
            Self::Constructor(_) | Self::Fallback(_) | Self::Receive(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_selector_matches_well_known_value() {
        let f = Function {
            name: "transfer".into(),
            inputs: Vec::from([Param::new("to", "address"), Param::new("value", "uint256")]),
            outputs: Vec::from([Param::new("", "bool")]),
            state_mutability: StateMutability::NonPayable,
        };
        assert_eq!(f.signature(), "transfer(address,uint256)");
        assert_eq!(alloy_primitives::hex::encode(f.selector()), "a9059cbb");
    }

    #[test]
    fn tuple_signature_expands_components() {
        let mut param = Param::new("p", "tuple");
        param.components = Vec::from([Param::new("a", "uint256"), Param::new("b", "address")]);
        assert_eq!(param.ty_signature(), "(uint256,address)");
    }

    #[test]
    fn anonymous_event_has_no_topic0() {
        let event = Event { name: "Foo".into(), inputs: Vec::new(), anonymous: true };
        assert_eq!(event.topic0(), None);
    }
}
