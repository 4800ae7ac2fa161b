use crate::{
    converters::{bytes_to_scalar, scalar_to_address, scalar_to_storage_key},
    rlp_utils::{RlpExt, RlpStreamExt},
    Address, Error, Result, H256,
};
use rlp::{Rlp, RlpStream};
use std::vec::IntoIter;

/// EIP-2930 access list: the addresses and storage slots a transaction plans to touch.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
pub struct AccessList(pub Vec<AccessListItem>);

impl AccessList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccessListItem> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_raw(self) -> Vec<(Address, Vec<H256>)> {
        self.0
            .into_iter()
            .map(|item| (item.address, item.storage_keys))
            .collect::<Vec<_>>()
    }

    /// Appends the list as `[[address, [storageKey, ...]], ...]`.
    pub fn rlp_append(&self, stream: &mut RlpStream) {
        stream.begin_list(self.0.len());
        for item in &self.0 {
            stream.begin_list(2);
            stream.append_bytes(item.address.as_bytes());
            stream.begin_list(item.storage_keys.len());
            for key in &item.storage_keys {
                stream.append_bytes(key.as_bytes());
            }
        }
    }

    /// Decodes the list appended by [`AccessList::rlp_append`].
    ///
    /// Addresses and storage keys are read as integers, so shorter byte strings are left padded.
    ///
    /// # Errors
    /// Fails if an entry isn't an `[address, [storageKey, ...]]` pair, or an address or storage
    /// key doesn't fit its width.
    pub fn rlp_decode(rlp: &Rlp) -> Result<Self> {
        let mut items = Vec::with_capacity(rlp.item_count()?);
        for entry in rlp.iter() {
            if !entry.is_list() || entry.item_count()? != 2 {
                return Err(Error::Structure(
                    "expected access list entries to be [address, storageKeys] pairs".into(),
                ));
            }
            let address = scalar_to_address(&bytes_to_scalar(entry.bytes_at(0)?))?;
            let keys = entry.list_item_at(1)?;
            let storage_keys = (0..keys.item_count()?)
                .map(|index| scalar_to_storage_key(&bytes_to_scalar(keys.bytes_at(index)?)))
                .collect::<Result<Vec<_>>>()?;
            items.push(AccessListItem { address, storage_keys });
        }
        Ok(Self(items))
    }
}

impl From<Vec<(Address, Vec<H256>)>> for AccessList {
    fn from(src: Vec<(Address, Vec<H256>)>) -> Self {
        Self(
            src.into_iter()
                .map(|(address, storage_keys)| AccessListItem { address, storage_keys })
                .collect(),
        )
    }
}

impl From<Vec<AccessListItem>> for AccessList {
    fn from(src: Vec<AccessListItem>) -> Self {
        Self(src)
    }
}

impl IntoIterator for AccessList {
    type Item = AccessListItem;
    type IntoIter = IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Access list item
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash)]
pub struct AccessListItem {
    /// Accessed address
    pub address: Address,
    /// Accessed storage keys
    pub storage_keys: Vec<H256>,
}
