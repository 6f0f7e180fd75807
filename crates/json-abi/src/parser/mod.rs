//! The human-readable signature parser: turns strings like
//! `"function transfer(address to, uint256 value) returns (bool)"` into
//! [`AbiItem`]s without going through a `.json` ABI file.

mod lexer;

use crate::{
    AbiItem, Constructor, Error, Event, EventParam, Fallback, Function, Param, Receive,
    StateMutability,
};
use alloc::{
    collections::BTreeMap,
    format,
    string::{String, ToString},
    vec::Vec,
};
use lexer::{Lexer, Token};

/// An error produced while parsing a human-readable signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A parameter declared a Solidity data-location keyword
    /// (`memory`/`calldata`/`storage`) where none is allowed.
    #[error("invalid data location `{0}`")]
    InvalidDataLocation(String),
    /// The parser expected one token and found another.
    #[error("unexpected token `{found}`, expected {expected}")]
    UnexpectedToken {
        /// What was actually found.
        found: String,
        /// What the grammar production expected.
        expected: String,
    },
    /// A parameter list entry had no type, e.g. a bare name.
    #[error("missing type declaration")]
    MissingTypeDeclaration,
    /// A `returns (...)` clause with no parameters.
    #[error("empty returns clause")]
    EmptyReturnParams,
    /// A type name that isn't a known primitive, array, tuple, or
    /// previously declared struct.
    #[error("invalid or unresolved type `{0}`")]
    InvalidType(String),
}

/// Declared struct names, populated by `struct` declarations seen earlier
/// in the same parse and consulted when a later item references one.
#[derive(Default)]
struct StructTable {
    structs: BTreeMap<String, Vec<Param>>,
}

impl StructTable {
    fn resolve(&self, ty: &str) -> Option<&[Param]> {
        self.structs.get(ty).map(Vec::as_slice)
    }
}

/// Either a parsed ABI item, or a `struct` declaration feeding the running
/// struct table (never surfaced to callers directly).
enum ParsedItem {
    Abi(AbiItem),
    Struct(String, Vec<Param>),
}

/// Parses a single human-readable item: a `function`, `event`, `error`,
/// `constructor`, `fallback`, or `receive` declaration.
///
/// `struct` declarations have no item of their own to return; use
/// [`parse_items`] for input batches that declare and then reference
/// structs.
pub fn parse_item(input: &str) -> Result<AbiItem, ParseError> {
    let structs = StructTable::default();
    let mut parser = Parser { lexer: Lexer::new(input), structs: &structs };
    match parser.parse()? {
        ParsedItem::Abi(item) => Ok(item),
        ParsedItem::Struct(name, _) => Err(ParseError::UnexpectedToken {
            found: "struct".to_string(),
            expected: format!("a function, event, error, constructor, fallback, or receive (struct {name} has no item of its own; use parse_items)"),
        }),
    }
}

/// Parses a sequence of declarations, resolving later `struct` references
/// against earlier ones in the same batch, per §4.3's "declared before
/// referencing items" rule. `struct` declarations are consumed into the
/// running table and do not appear in the returned list.
pub fn parse_items(inputs: &[&str]) -> Result<Vec<AbiItem>, ParseError> {
    let mut structs = StructTable::default();
    let mut out = Vec::with_capacity(inputs.len());
    for input in inputs {
        let mut parser = Parser { lexer: Lexer::new(input), structs: &structs };
        match parser.parse()? {
            ParsedItem::Abi(item) => out.push(item),
            ParsedItem::Struct(name, fields) => {
                structs.structs.insert(name, fields);
            }
        }
    }
    Ok(out)
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    structs: &'a StructTable,
}

const DATA_LOCATIONS: [&str; 3] = ["memory", "calldata", "storage"];
const VISIBILITIES: [&str; 4] = ["external", "public", "internal", "private"];

impl<'a> Parser<'a> {
    fn parse(&mut self) -> Result<ParsedItem, ParseError> {
        let head = self.expect_ident()?;
        match head.as_str() {
            "function" => self.parse_function().map(ParsedItem::Abi),
            "event" => self.parse_event().map(ParsedItem::Abi),
            "error" => self.parse_error_item().map(ParsedItem::Abi),
            "constructor" => self.parse_constructor().map(ParsedItem::Abi),
            "fallback" => self.parse_fallback().map(ParsedItem::Abi),
            "receive" => self.parse_receive().map(ParsedItem::Abi),
            "struct" => self.parse_struct_decl(),
            other => Err(ParseError::UnexpectedToken {
                found: other.to_string(),
                expected: "function, event, error, constructor, fallback, receive, or struct"
                    .to_string(),
            }),
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.lexer.next() {
            Token::Ident(s) => Ok(s),
            other => Err(ParseError::UnexpectedToken {
                found: other.to_string(),
                expected: "identifier".to_string(),
            }),
        }
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), ParseError> {
        let tok = self.lexer.next();
        if tok == expected {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken { found: tok.to_string(), expected: what.to_string() })
        }
    }

    fn parse_function(&mut self) -> Result<AbiItem, ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::LParen, "(")?;
        let inputs = self.parse_params()?;
        let mut state_mutability = StateMutability::NonPayable;
        loop {
            match self.lexer.peek() {
                Token::Ident(kw) if VISIBILITIES.contains(&kw.as_str()) => {
                    self.lexer.next();
                }
                Token::Ident(kw) if kw == "view" => {
                    self.lexer.next();
                    state_mutability = StateMutability::View;
                }
                Token::Ident(kw) if kw == "pure" => {
                    self.lexer.next();
                    state_mutability = StateMutability::Pure;
                }
                Token::Ident(kw) if kw == "payable" => {
                    self.lexer.next();
                    state_mutability = StateMutability::Payable;
                }
                Token::Ident(kw) if kw == "virtual" || kw == "override" => {
                    self.lexer.next();
                }
                _ => break,
            }
        }
        let outputs = if matches!(self.lexer.peek(), Token::Ident(kw) if kw == "returns") {
            self.lexer.next();
            self.expect(Token::LParen, "(")?;
            let outputs = self.parse_params()?;
            if outputs.is_empty() {
                return Err(ParseError::EmptyReturnParams);
            }
            outputs
        } else {
            Vec::new()
        };
        Ok(AbiItem::Function(Function { name, inputs, outputs, state_mutability }))
    }

    fn parse_event(&mut self) -> Result<AbiItem, ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::LParen, "(")?;
        let inputs = self.parse_event_params()?;
        let anonymous = matches!(self.lexer.peek(), Token::Ident(kw) if kw == "anonymous");
        if anonymous {
            self.lexer.next();
        }
        Ok(AbiItem::Event(Event { name, inputs, anonymous }))
    }

    fn parse_error_item(&mut self) -> Result<AbiItem, ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::LParen, "(")?;
        let inputs = self.parse_params()?;
        Ok(AbiItem::Error(Error { name, inputs }))
    }

    fn parse_constructor(&mut self) -> Result<AbiItem, ParseError> {
        self.expect(Token::LParen, "(")?;
        let inputs = self.parse_params()?;
        let mut state_mutability = StateMutability::NonPayable;
        if matches!(self.lexer.peek(), Token::Ident(kw) if kw == "payable") {
            self.lexer.next();
            state_mutability = StateMutability::Payable;
        }
        Ok(AbiItem::Constructor(Constructor { inputs, state_mutability }))
    }

    fn parse_fallback(&mut self) -> Result<AbiItem, ParseError> {
        self.expect(Token::LParen, "(")?;
        self.expect(Token::RParen, ")")?;
        let mut state_mutability = StateMutability::NonPayable;
        while matches!(self.lexer.peek(), Token::Ident(kw) if kw == "payable" || kw == "external")
        {
            if matches!(self.lexer.peek(), Token::Ident(kw) if kw == "payable") {
                state_mutability = StateMutability::Payable;
            }
            self.lexer.next();
        }
        Ok(AbiItem::Fallback(Fallback { state_mutability }))
    }

    fn parse_receive(&mut self) -> Result<AbiItem, ParseError> {
        self.expect(Token::LParen, "(")?;
        self.expect(Token::RParen, ")")?;
        while matches!(self.lexer.peek(), Token::Ident(kw) if kw == "payable" || kw == "external")
        {
            self.lexer.next();
        }
        Ok(AbiItem::Receive(Receive { state_mutability: StateMutability::Payable }))
    }

    fn parse_struct_decl(&mut self) -> Result<ParsedItem, ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::LBrace, "{")?;
        let mut fields = Vec::new();
        loop {
            if matches!(self.lexer.peek(), Token::RBrace) {
                self.lexer.next();
                break;
            }
            let (ty, components) = self.parse_type()?;
            let field_name = self.expect_ident()?;
            self.expect(Token::Semi, ";")?;
            fields.push(Param { name: field_name, ty, components, internal_type: None });
        }
        Ok(ParsedItem::Struct(name, fields))
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        if matches!(self.lexer.peek(), Token::RParen) {
            self.lexer.next();
            return Ok(params);
        }
        loop {
            let param = self.parse_param()?;
            params.push(param);
            match self.lexer.next() {
                Token::Comma => continue,
                Token::RParen => break,
                other => {
                    return Err(ParseError::UnexpectedToken {
                        found: other.to_string(),
                        expected: ", or )".to_string(),
                    })
                }
            }
        }
        Ok(params)
    }

    fn parse_event_params(&mut self) -> Result<Vec<EventParam>, ParseError> {
        let mut params = Vec::new();
        if matches!(self.lexer.peek(), Token::RParen) {
            self.lexer.next();
            return Ok(params);
        }
        loop {
            let (ty, components) = self.parse_type()?;
            let mut indexed = false;
            let mut name = String::new();
            loop {
                match self.lexer.peek() {
                    Token::Ident(kw) if kw == "indexed" => {
                        self.lexer.next();
                        indexed = true;
                    }
                    Token::Ident(kw) if DATA_LOCATIONS.contains(&kw.as_str()) => {
                        return Err(ParseError::InvalidDataLocation(kw));
                    }
                    Token::Ident(_) => {
                        name = self.expect_ident()?;
                    }
                    _ => break,
                }
            }
            params.push(EventParam { name, ty, components, indexed, internal_type: None });
            match self.lexer.next() {
                Token::Comma => continue,
                Token::RParen => break,
                other => {
                    return Err(ParseError::UnexpectedToken {
                        found: other.to_string(),
                        expected: ", or )".to_string(),
                    })
                }
            }
        }
        Ok(params)
    }

    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let (ty, components) = self.parse_type()?;
        let mut name = String::new();
        loop {
            match self.lexer.peek() {
                Token::Ident(kw) if DATA_LOCATIONS.contains(&kw.as_str()) => {
                    return Err(ParseError::InvalidDataLocation(kw));
                }
                Token::Ident(_) => {
                    name = self.expect_ident()?;
                }
                _ => break,
            }
        }
        Ok(Param { name, ty, components, internal_type: None })
    }

    /// Parses a type: a primitive keyword, a parenthesized tuple, or a
    /// previously declared struct name, followed by any number of array
    /// suffixes (`[]` or `[N]`).
    fn parse_type(&mut self) -> Result<(String, Vec<Param>), ParseError> {
        let (mut base, components) = match self.lexer.peek() {
            Token::LParen => {
                self.lexer.next();
                let inner = self.parse_params()?;
                (String::from("tuple"), inner)
            }
            Token::Ident(name) => {
                self.lexer.next();
                if name.is_empty() {
                    return Err(ParseError::MissingTypeDeclaration);
                }
                if let Some(fields) = self.structs.resolve(&name) {
                    (String::from("tuple"), fields.to_vec())
                } else if is_known_primitive(&name) {
                    (name, Vec::new())
                } else {
                    return Err(ParseError::InvalidType(name));
                }
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    found: other.to_string(),
                    expected: "a type".to_string(),
                })
            }
        };
        while matches!(self.lexer.peek(), Token::LBracket) {
            self.lexer.next();
            match self.lexer.next() {
                Token::RBracket => base.push_str("[]"),
                Token::Number(n) => {
                    self.expect(Token::RBracket, "]")?;
                    base.push('[');
                    base.push_str(&n.to_string());
                    base.push(']');
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        found: other.to_string(),
                        expected: "] or an array length".to_string(),
                    })
                }
            }
        }
        Ok((base, components))
    }
}

fn is_known_primitive(name: &str) -> bool {
    if matches!(name, "address" | "bool" | "string" | "bytes" | "tuple" | "function") {
        return true;
    }
    if let Some(width) = name.strip_prefix("uint").or_else(|| name.strip_prefix("int")) {
        return width.is_empty()
            || width.parse::<u32>().is_ok_and(|w| w > 0 && w <= 256 && w % 8 == 0);
    }
    if let Some(width) = name.strip_prefix("bytes") {
        return width.parse::<u32>().is_ok_and(|w| w > 0 && w <= 32);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_function() {
        let item = parse_item("function balanceOf(address owner) view returns (uint256)").unwrap();
        let AbiItem::Function(f) = item else { panic!("expected function") };
        assert_eq!(f.name, "balanceOf");
        assert_eq!(f.state_mutability, StateMutability::View);
        assert_eq!(f.signature(), "balanceOf(address)");
        assert_eq!(f.outputs[0].ty, "uint256");
    }

    #[test]
    fn parses_event_with_indexed_params() {
        let item =
            parse_item("event Transfer(address indexed from, address indexed to, uint256 value)")
                .unwrap();
        let AbiItem::Event(e) = item else { panic!("expected event") };
        assert_eq!(e.inputs.iter().filter(|p| p.indexed).count(), 2);
        assert!(!e.anonymous);
    }

    #[test]
    fn rejects_memory_data_location() {
        let err = parse_item("function f(uint256[] memory values)").unwrap_err();
        assert_eq!(err, ParseError::InvalidDataLocation("memory".to_string()));
    }

    #[test]
    fn rejects_empty_returns_clause() {
        let err = parse_item("function f() returns ()").unwrap_err();
        assert_eq!(err, ParseError::EmptyReturnParams);
    }

    #[test]
    fn resolves_struct_reference_to_tuple() {
        let items =
            parse_items(&["struct Point { uint256 x; uint256 y; }", "function move(Point p)"])
                .unwrap();
        assert_eq!(items.len(), 1);
        let AbiItem::Function(f) = &items[0] else { panic!("expected function") };
        assert_eq!(f.inputs[0].ty, "tuple");
        assert_eq!(f.inputs[0].ty_signature(), "(uint256,uint256)");
    }

    #[test]
    fn array_type_preserves_length_suffix() {
        let item = parse_item("function f(uint256[4] values)").unwrap();
        let AbiItem::Function(f) = item else { panic!("expected function") };
        assert_eq!(f.inputs[0].ty, "uint256[4]");
    }

    #[test]
    fn rejects_unresolved_type() {
        let err = parse_item("function f(Widget w)").unwrap_err();
        assert_eq!(err, ParseError::InvalidType("Widget".to_string()));
    }
}
