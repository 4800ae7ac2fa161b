//! Conversions between scalars, byte strings, hex text and checksum-cased addresses.
//!
//! Hex text is always lowercase and `0x` prefixed on output. On input the `0x` prefix is
//! mandatory, except for [`checksum_hex_to_address`] where it is optional.
use crate::{Address, Error, Result, Scalar, H256};
use num_bigint::BigInt;
use num_traits::Zero;
use txcodec_crypto::{Crypto, DefaultCrypto};

/// Minimal big-endian bytes of `value`, zero encodes as an empty byte string.
#[must_use]
pub fn scalar_to_bytes(value: &Scalar) -> Vec<u8> {
    if value.is_zero() {
        return Vec::new();
    }
    value.to_bytes_be()
}

/// Big-endian bytes of `value`, left padded to exactly `width` bytes.
///
/// # Errors
/// Returns [`Error::Range`] if `value` doesn't fit in `width` bytes.
pub fn scalar_to_bytes_padded(value: &Scalar, width: usize) -> Result<Vec<u8>> {
    let minimal = scalar_to_bytes(value);
    let Some(padding) = width.checked_sub(minimal.len()) else {
        return Err(Error::Range(format!("0x{value:x} does not fit in {width} bytes")));
    };
    let mut bytes = vec![0u8; padding];
    bytes.extend_from_slice(&minimal);
    Ok(bytes)
}

/// Narrows a signed integer to a [`Scalar`].
///
/// # Errors
/// Returns [`Error::Range`] if `value` is negative.
pub fn signed_to_scalar(value: &BigInt) -> Result<Scalar> {
    value
        .to_biguint()
        .ok_or_else(|| Error::Range(format!("{value} is negative")))
}

/// Big-endian unsigned interpretation of `bytes`, an empty slice is zero.
#[must_use]
pub fn bytes_to_scalar(bytes: &[u8]) -> Scalar {
    Scalar::from_bytes_be(bytes)
}

#[must_use]
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    const_hex::encode_prefixed(bytes)
}

/// Parses `0x` prefixed hex into bytes.
///
/// # Errors
/// Returns [`Error::Format`] if the prefix is missing, the digit count is odd or a character is
/// not a hex digit.
pub fn hex_to_bytes(text: &str) -> Result<Vec<u8>> {
    let digits = strip_hex_prefix(text)?;
    const_hex::decode(digits).map_err(|error| Error::Format(format!("{text}: {error}")))
}

/// Unpadded lowercase hex, zero renders as `0x0`.
#[must_use]
pub fn scalar_to_hex(value: &Scalar) -> String {
    format!("0x{value:x}")
}

/// Lowercase hex left padded with zeros to at least `width` bytes.
#[must_use]
pub fn scalar_to_hex_padded(value: &Scalar, width: usize) -> String {
    format!("0x{value:0digits$x}", digits = width * 2)
}

/// Parses `0x` prefixed hex into a scalar, `"0x"` alone is zero.
///
/// # Errors
/// Returns [`Error::Format`] if the prefix is missing or a character is not a hex digit.
pub fn hex_to_scalar(text: &str) -> Result<Scalar> {
    let digits = strip_hex_prefix(text)?;
    if digits.is_empty() {
        return Ok(Scalar::zero());
    }
    if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Format(format!("{text} contains non hex characters")));
    }
    Scalar::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| Error::Format(format!("{text} is not a hex number")))
}

/// Interprets `value` as an address.
///
/// # Errors
/// Returns [`Error::Range`] if `value >= 2^160`.
pub fn scalar_to_address(value: &Scalar) -> Result<Address> {
    let bytes = scalar_to_bytes_padded(value, Address::len_bytes())?;
    Ok(Address::from_slice(&bytes))
}

/// Interprets `value` as a 32-byte storage key.
///
/// # Errors
/// Returns [`Error::Range`] if `value >= 2^256`.
pub fn scalar_to_storage_key(value: &Scalar) -> Result<H256> {
    let bytes = scalar_to_bytes_padded(value, H256::len_bytes())?;
    Ok(H256::from_slice(&bytes))
}

/// Mixed-case checksum rendering of `address` ([EIP-55]).
///
/// The lowercase hex digits are hashed with Keccak-256. A letter at nibble position `i` is
/// uppercased iff bit `255 - 4i` of the hash is set, i.e. iff the `i`-th nibble of the hash is
/// 8 or greater.
///
/// [EIP-55]: https://eips.ethereum.org/EIPS/eip-55
#[must_use]
pub fn address_to_checksum_hex(address: &Address) -> String {
    let lowercase = const_hex::encode(address.as_bytes());
    let hash = DefaultCrypto::keccak256(lowercase.as_bytes());

    let mut checksummed = String::with_capacity(2 + lowercase.len());
    checksummed.push_str("0x");
    for (i, c) in lowercase.chars().enumerate() {
        let byte = hash[i / 2];
        let high_bit = if i % 2 == 0 { byte & 0x80 } else { byte & 0x08 };
        if high_bit == 0 {
            checksummed.push(c);
        } else {
            checksummed.push(c.to_ascii_uppercase());
        }
    }
    checksummed
}

/// Parses 40 hex digits, with or without `0x` prefix, into an address.
///
/// The checksum casing is not validated.
///
/// # Errors
/// Returns [`Error::Format`] if `text` isn't exactly 40 hex digits.
pub fn checksum_hex_to_address(text: &str) -> Result<Address> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    if digits.len() != 40 || !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Format(format!("{text} is not a 40 hex digit address")));
    }
    let mut address = Address::zero();
    const_hex::decode_to_slice(digits, address.as_bytes_mut())
        .map_err(|error| Error::Format(format!("{text}: {error}")))?;
    Ok(address)
}

fn strip_hex_prefix(text: &str) -> Result<&str> {
    text.strip_prefix("0x")
        .ok_or_else(|| Error::Format(format!("expected a 0x prefixed hex string but got {text}")))
}
