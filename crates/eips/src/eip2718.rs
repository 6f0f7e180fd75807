//! Typed transaction envelope (EIP-2718) type-byte constants.
//!
//! A typed transaction's wire form is `TransactionType || TransactionPayload`
//! where `TransactionType` is a single byte in `[0x00, 0x7f]`; legacy
//! transactions have no type byte and are disambiguated by the fact that
//! their RLP encoding always starts with a byte `>= 0xc0`.

/// EIP-2930 access-list transactions.
pub const EIP2930_TX_TYPE_ID: u8 = 0x01;
/// EIP-1559 dynamic-fee transactions.
pub const EIP1559_TX_TYPE_ID: u8 = 0x02;
/// EIP-4844 blob-carrying transactions.
pub const EIP4844_TX_TYPE_ID: u8 = 0x03;
/// EIP-7702 authorization-list transactions.
pub const EIP7702_TX_TYPE_ID: u8 = 0x04;

/// Returns `true` if `byte` is a valid, currently-defined transaction type
/// tag (excludes legacy, which has no tag byte at all).
pub const fn is_known_tx_type(byte: u8) -> bool {
    matches!(
        byte,
        EIP2930_TX_TYPE_ID | EIP1559_TX_TYPE_ID | EIP4844_TX_TYPE_ID | EIP7702_TX_TYPE_ID
    )
}
