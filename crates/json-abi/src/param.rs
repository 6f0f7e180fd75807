use alloc::{format, string::String, vec::Vec};
use core::fmt;
use itertools::Itertools;

/// A single function/constructor/error parameter, or a non-indexed event
/// parameter.
///
/// `ty` is always the Solidity type string (`"uint256"`, `"bytes32[]"`,
/// `"tuple"` for a struct, ...); for tuples, `components` holds the
/// struct's fields in declaration order. This mirrors the shape contract
/// ABI JSON actually uses on the wire — resolving `ty`/`components` into an
/// executable type tree is `alloy-dyn-abi`'s job, not this crate's.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    /// The parameter's name; empty for unnamed parameters.
    pub name: String,
    /// The Solidity type string.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: String,
    /// Component fields, populated iff `ty` is `"tuple"` or a tuple array.
    #[cfg_attr(feature = "serde", serde(default))]
    pub components: Vec<Param>,
    /// The original user-facing type before struct names were resolved to
    /// `tuple`, e.g. `"struct Foo"`. Informational only.
    #[cfg_attr(feature = "serde", serde(rename = "internalType", default))]
    pub internal_type: Option<String>,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty_signature(), self.name)
    }
}

impl Param {
    /// Creates an unnamed, component-less parameter of a primitive type.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self { name: name.into(), ty: ty.into(), components: Vec::new(), internal_type: None }
    }

    /// Returns `true` if this is (an array of) tuples.
    pub fn is_tuple(&self) -> bool {
        self.ty == "tuple" || self.ty.starts_with("tuple[") || self.ty.starts_with("tuple[]")
    }

    /// Writes this parameter's canonical type, expanding tuple components
    /// inline and preserving any array suffix that followed `tuple` in
    /// `ty`, per §4.2's signature canonicalization rule.
    pub fn ty_signature(&self) -> String {
        if !self.is_tuple() {
            return self.ty.clone();
        }
        let suffix = &self.ty[5..]; // whatever followed "tuple"
        let inner = self.components.iter().map(Param::ty_signature).join(",");
        format!("({inner}){suffix}")
    }
}

/// An event parameter: a [`Param`] plus the `indexed` flag that decides
/// whether it contributes a topic or joins the log `data` field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventParam {
    /// The parameter's name; empty for unnamed parameters.
    pub name: String,
    /// The Solidity type string.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: String,
    /// Component fields, populated iff `ty` is `"tuple"` or a tuple array.
    #[cfg_attr(feature = "serde", serde(default))]
    pub components: Vec<Param>,
    /// Whether this parameter is part of the event's indexed topics.
    #[cfg_attr(feature = "serde", serde(default))]
    pub indexed: bool,
    /// See [`Param::internal_type`].
    #[cfg_attr(feature = "serde", serde(rename = "internalType", default))]
    pub internal_type: Option<String>,
}

impl EventParam {
    /// Creates an indexed or non-indexed event parameter.
    pub fn new(name: impl Into<String>, ty: impl Into<String>, indexed: bool) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            components: Vec::new(),
            indexed,
            internal_type: None,
        }
    }

    /// Returns `true` if this is (an array of) tuples.
    pub fn is_tuple(&self) -> bool {
        self.ty == "tuple" || self.ty.starts_with("tuple[")
    }

    /// Canonical type signature, see [`Param::ty_signature`].
    pub fn ty_signature(&self) -> String {
        if !self.is_tuple() {
            return self.ty.clone();
        }
        let suffix = &self.ty[5..];
        let inner = self.components.iter().map(Param::ty_signature).join(",");
        format!("({inner}){suffix}")
    }
}
