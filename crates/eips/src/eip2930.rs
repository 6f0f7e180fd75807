//! [EIP-2930](https://eips.ethereum.org/EIPS/eip-2930) access lists.

use alloc::vec::Vec;
use alloy_primitives::{Address, B256};
use alloy_rlp::{BufMut, Decodable, Encodable, Header};
use core::mem;

/// A single entry of an [`AccessList`]: an address and the storage slots
/// within it that are pre-warmed for the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AccessListItem {
    /// Account addresses to be added into the `accessed_addresses` set.
    pub address: Address,
    /// Storage slots to be added into the `accessed_storage_keys` set.
    pub storage_keys: Vec<B256>,
}

impl AccessListItem {
    fn fields_len(&self) -> usize {
        self.address.length() + self.storage_keys.length()
    }

    /// Heuristic in-memory size.
    pub fn size(&self) -> usize {
        mem::size_of::<Address>() + self.storage_keys.capacity() * mem::size_of::<B256>()
    }
}

impl Encodable for AccessListItem {
    fn encode(&self, out: &mut dyn BufMut) {
        Header::new(true, self.fields_len()).encode(out);
        self.address.encode(out);
        self.storage_keys.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.fields_len();
        alloy_rlp::length_of_length(payload_length) + payload_length
    }
}

impl Decodable for AccessListItem {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        Ok(Self { address: Decodable::decode(buf)?, storage_keys: Decodable::decode(buf)? })
    }
}

/// A transaction-wide access list: addresses and storage keys the
/// transaction declares upfront, per [EIP-2930](https://eips.ethereum.org/EIPS/eip-2930).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AccessList(pub Vec<AccessListItem>);

impl AccessList {
    /// Returns the access list entries.
    pub fn iter(&self) -> core::slice::Iter<'_, AccessListItem> {
        self.0.iter()
    }

    /// Total number of storage keys across all entries, per the gas-cost
    /// accounting in EIP-2930.
    pub fn storage_keys_len(&self) -> usize {
        self.0.iter().map(|item| item.storage_keys.len()).sum()
    }

    /// Heuristic in-memory size.
    pub fn size(&self) -> usize {
        self.0.iter().map(AccessListItem::size).sum()
    }
}

impl FromIterator<AccessListItem> for AccessList {
    fn from_iter<T: IntoIterator<Item = AccessListItem>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Encodable for AccessList {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0.encode(out)
    }

    fn length(&self) -> usize {
        self.0.length()
    }
}

impl Decodable for AccessList {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self(Decodable::decode(buf)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_access_list_roundtrips() {
        let list = AccessList::default();
        let encoded = alloy_rlp::encode(&list);
        assert_eq!(encoded, hex::decode("c0").unwrap());
        let decoded: AccessList = alloy_rlp::decode_exact(&encoded).unwrap();
        assert_eq!(decoded, list);
    }

    #[test]
    fn access_list_item_roundtrips() {
        let item = AccessListItem {
            address: Address::new([0x11; 20]),
            storage_keys: Vec::from([B256::new([0x22; 32]), B256::new([0x33; 32])]),
        };
        let list = AccessList(Vec::from([item.clone()]));
        let encoded = alloy_rlp::encode(&list);
        let decoded: AccessList = alloy_rlp::decode_exact(&encoded).unwrap();
        assert_eq!(decoded.0, Vec::from([item]));
    }
}
