//! Helpers on top of the `rlp` crate for the field shapes transactions use.
use crate::{
    converters::{bytes_to_scalar, scalar_to_address, scalar_to_bytes},
    Address, Bytes, Error, Result, Scalar,
};
use rlp::{Rlp, RlpStream};

pub trait RlpStreamExt {
    /// Appends a byte string to the end of stream, chainable.
    ///
    /// ```
    /// use rlp::RlpStream;
    /// use txcodec::rlp_utils::RlpStreamExt;
    /// let mut stream = RlpStream::new_list(2);
    /// stream.append_bytes(b"cat").append_bytes(&[]);
    /// let out = stream.out();
    /// assert_eq!(out, vec![0xc5, 0x83, b'c', b'a', b't', 0x80]);
    /// ```
    fn append_bytes(&mut self, bytes: &[u8]) -> &mut Self;

    /// Appends the minimal big-endian form of `value`, zero becomes the empty string.
    fn append_scalar(&mut self, value: &Scalar) -> &mut Self;

    /// Appends the 20 address bytes, or the empty string when there is no address.
    fn append_address_opt(&mut self, address: Option<&Address>) -> &mut Self;
}

impl RlpStreamExt for RlpStream {
    fn append_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.append_iter(bytes.iter().copied())
    }

    fn append_scalar(&mut self, value: &Scalar) -> &mut Self {
        self.append_bytes(&scalar_to_bytes(value))
    }

    fn append_address_opt(&mut self, address: Option<&Address>) -> &mut Self {
        match address {
            Some(address) => self.append_bytes(address.as_bytes()),
            None => self.append_bytes(&[]),
        }
    }
}

#[allow(clippy::missing_errors_doc)]
pub trait RlpExt<'a> {
    /// The byte string at `index`.
    fn bytes_at(&self, index: usize) -> Result<&'a [u8]>;

    /// The list at `index`.
    fn list_item_at(&self, index: usize) -> Result<Rlp<'a>>;

    fn scalar_at(&self, index: usize) -> Result<Scalar> {
        self.bytes_at(index).map(bytes_to_scalar)
    }

    fn data_at(&self, index: usize) -> Result<Bytes> {
        self.bytes_at(index).map(Bytes::from)
    }

    /// An empty string decodes as `None`, anything else is read as an integer that must fit in
    /// 160 bits.
    fn address_opt_at(&self, index: usize) -> Result<Option<Address>> {
        let bytes = self.bytes_at(index)?;
        if bytes.is_empty() {
            return Ok(None);
        }
        scalar_to_address(&bytes_to_scalar(bytes)).map(Some)
    }
}

impl<'a> RlpExt<'a> for Rlp<'a> {
    fn bytes_at(&self, index: usize) -> Result<&'a [u8]> {
        let item = self.at(index)?;
        if !item.is_data() {
            return Err(Error::Structure(format!(
                "expected item {index} to be a byte string but got a list"
            )));
        }
        Ok(item.data()?)
    }

    fn list_item_at(&self, index: usize) -> Result<Rlp<'a>> {
        let item = self.at(index)?;
        if !item.is_list() {
            return Err(Error::Structure(format!(
                "expected item {index} to be a list but got a byte string"
            )));
        }
        Ok(item)
    }
}

/// Opens `encoded` as a single top-level RLP list.
///
/// # Errors
/// Fails if `encoded` is a byte string instead of a list, or has bytes past the end of the list.
pub fn decode_list<'a>(encoded: &'a [u8], name: &str) -> Result<Rlp<'a>> {
    let rlp = Rlp::new(encoded);
    if !rlp.is_list() {
        return Err(Error::Structure(format!(
            "expected an encoded {name} transaction to be an RLP list of items"
        )));
    }
    let total = rlp.payload_info()?.total();
    if total != encoded.len() {
        return Err(Error::Structure(format!(
            "{} trailing bytes after the encoded {name} transaction",
            encoded.len().saturating_sub(total)
        )));
    }
    Ok(rlp)
}

/// Returns the item count of `rlp` if it is one of `expected`.
///
/// # Errors
/// Fails with [`Error::Structure`] for any other count.
pub fn expect_item_count(rlp: &Rlp, name: &str, expected: &[usize]) -> Result<usize> {
    let count = rlp.item_count()?;
    if !expected.contains(&count) {
        return Err(Error::Structure(format!(
            "expected an encoded {name} transaction to have {expected:?} items but it had {count}"
        )));
    }
    Ok(count)
}

/// Splits off the one byte type prefix of a typed transaction.
///
/// # Errors
/// Fails with [`Error::Structure`] if the first byte isn't `transaction_type`.
pub fn strip_type_prefix<'a>(
    encoded: &'a [u8],
    transaction_type: u8,
    name: &str,
) -> Result<&'a [u8]> {
    match encoded.split_first() {
        Some((first, payload)) if *first == transaction_type => Ok(payload),
        _ => Err(Error::Structure(format!(
            "expected an encoded {name} transaction to start with 0x{transaction_type:02x}"
        ))),
    }
}
