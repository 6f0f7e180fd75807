use crate::error::TypeParseError;
use alloc::{boxed::Box, format, string::String, vec::Vec};
use alloy_json_abi::Param;
use itertools::Itertools;

/// A Solidity ABI type, resolved from a [`Param`]'s `ty`/`components`
/// strings into a tree that can actually be encoded/decoded against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynSolType {
    /// `bool`.
    Bool,
    /// `address`.
    Address,
    /// `function`: a 20-byte address followed by a 4-byte selector.
    Function,
    /// `uintN`, `8 <= N <= 256`, `N % 8 == 0`.
    Uint(usize),
    /// `intN`, `8 <= N <= 256`, `N % 8 == 0`.
    Int(usize),
    /// `bytesN`, `1 <= N <= 32`.
    FixedBytes(usize),
    /// `bytes`.
    Bytes,
    /// `string`.
    String,
    /// `T[]`.
    Array(Box<DynSolType>),
    /// `T[N]`.
    FixedArray(Box<DynSolType>, usize),
    /// `(T1,T2,...)` / `tuple` with components.
    Tuple(Vec<DynSolType>),
    /// A named struct: a tuple that additionally carries the struct and
    /// field names for display purposes. Structurally identical to
    /// `Tuple` for encoding.
    CustomStruct {
        /// The struct's name.
        name: String,
        /// Field names, parallel to `tuple`.
        prop_names: Vec<String>,
        /// Field types.
        tuple: Vec<DynSolType>,
    },
}

impl DynSolType {
    /// Resolves a [`Param`] into its type tree.
    pub fn parse_param(param: &Param) -> Result<Self, TypeParseError> {
        Self::parse(&param.ty, &param.components)
    }

    /// Resolves a raw `ty` string plus its tuple `components` (empty for
    /// non-tuple types) into a type tree. Array suffixes are peeled from
    /// the right, matching Solidity's "rightmost bracket is outermost"
    /// convention: `uint256[2][3]` is an array of 3 `uint256[2]`s.
    pub fn parse(ty: &str, components: &[Param]) -> Result<Self, TypeParseError> {
        if let Some(ty) = ty.strip_suffix(']') {
            let open = ty.rfind('[').ok_or_else(|| TypeParseError::InvalidType(ty.into()))?;
            let inner = Self::parse(&ty[..open], components)?;
            let count_str = &ty[open + 1..];
            return if count_str.is_empty() {
                Ok(Self::Array(Box::new(inner)))
            } else {
                let n = count_str
                    .parse::<usize>()
                    .map_err(|_| TypeParseError::InvalidWidth(count_str.into()))?;
                Ok(Self::FixedArray(Box::new(inner), n))
            };
        }
        match ty {
            "address" => Ok(Self::Address),
            "bool" => Ok(Self::Bool),
            "string" => Ok(Self::String),
            "bytes" => Ok(Self::Bytes),
            "function" => Ok(Self::Function),
            "tuple" => {
                let tuple = components
                    .iter()
                    .map(DynSolType::parse_param)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Tuple(tuple))
            }
            _ => {
                if let Some(width) = ty.strip_prefix("uint") {
                    return parse_int_width(ty, width).map(Self::Uint);
                }
                if let Some(width) = ty.strip_prefix("int") {
                    return parse_int_width(ty, width).map(Self::Int);
                }
                if let Some(width) = ty.strip_prefix("bytes") {
                    let n = width
                        .parse::<usize>()
                        .map_err(|_| TypeParseError::InvalidWidth(ty.into()))?;
                    return if (1..=32).contains(&n) {
                        Ok(Self::FixedBytes(n))
                    } else {
                        Err(TypeParseError::InvalidWidth(ty.into()))
                    };
                }
                Err(TypeParseError::InvalidType(ty.into()))
            }
        }
    }

    /// `true` if this type's encoding needs an offset/tail (head/tail
    /// layout) rather than fitting entirely in the head.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Bool
            | Self::Address
            | Self::Function
            | Self::Uint(_)
            | Self::Int(_)
            | Self::FixedBytes(_) => false,
            Self::Bytes | Self::String | Self::Array(_) => true,
            Self::FixedArray(child, _) => child.is_dynamic(),
            Self::Tuple(components) => components.iter().any(Self::is_dynamic),
            Self::CustomStruct { tuple, .. } => tuple.iter().any(Self::is_dynamic),
        }
    }

    /// Number of 32-byte words this type occupies inline in a head, valid
    /// only for types where [`Self::is_dynamic`] is `false`.
    pub fn head_words(&self) -> usize {
        match self {
            Self::Bool
            | Self::Address
            | Self::Function
            | Self::Uint(_)
            | Self::Int(_)
            | Self::FixedBytes(_) => 1,
            Self::Bytes | Self::String | Self::Array(_) => 1,
            Self::FixedArray(child, n) => n * child.head_words(),
            Self::Tuple(components) | Self::CustomStruct { tuple: components, .. } => {
                components.iter().map(Self::head_words).sum()
            }
        }
    }

    /// The canonical type signature: `uint256`, `(uint256,address)[]`,
    /// etc., with tuples always expanded, matching §4.2's rule shared
    /// with selector/topic computation.
    pub fn sol_type_name(&self) -> String {
        match self {
            Self::Bool => "bool".into(),
            Self::Address => "address".into(),
            Self::Function => "function".into(),
            Self::Uint(bits) => format!("uint{bits}"),
            Self::Int(bits) => format!("int{bits}"),
            Self::FixedBytes(n) => format!("bytes{n}"),
            Self::Bytes => "bytes".into(),
            Self::String => "string".into(),
            Self::Array(child) => format!("{}[]", child.sol_type_name()),
            Self::FixedArray(child, n) => format!("{}[{n}]", child.sol_type_name()),
            Self::Tuple(components) | Self::CustomStruct { tuple: components, .. } => {
                format!("({})", components.iter().map(Self::sol_type_name).join(","))
            }
        }
    }
}

fn parse_int_width(full: &str, width: &str) -> Result<usize, TypeParseError> {
    let n = width.parse::<usize>().map_err(|_| TypeParseError::InvalidWidth(full.into()))?;
    if n >= 8 && n <= 256 && n % 8 == 0 {
        Ok(n)
    } else {
        Err(TypeParseError::InvalidWidth(full.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_array_outermost_last() {
        let ty = DynSolType::parse("uint256[2][3]", &[]).unwrap();
        assert_eq!(
            ty,
            DynSolType::FixedArray(
                Box::new(DynSolType::FixedArray(Box::new(DynSolType::Uint(256)), 2)),
                3
            )
        );
        assert_eq!(ty.sol_type_name(), "uint256[2][3]");
    }

    #[test]
    fn dynamic_array_of_static_elements_is_dynamic() {
        let ty = DynSolType::parse("address[]", &[]).unwrap();
        assert!(ty.is_dynamic());
    }

    #[test]
    fn fixed_array_of_static_elements_is_static() {
        let ty = DynSolType::parse("uint256[4]", &[]).unwrap();
        assert!(!ty.is_dynamic());
        assert_eq!(ty.head_words(), 4);
    }

    #[test]
    fn tuple_with_dynamic_component_is_dynamic() {
        let components =
            [Param::new("a", "uint256"), Param::new("b", "string")].into_iter().collect::<Vec<_>>();
        let ty = DynSolType::parse("tuple", &components).unwrap();
        assert!(ty.is_dynamic());
    }

    #[test]
    fn rejects_unknown_width() {
        assert!(DynSolType::parse("uint7", &[]).is_err());
        assert!(DynSolType::parse("bytes33", &[]).is_err());
    }
}
