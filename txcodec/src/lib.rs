//! Codec and signing core for account-based ledger transactions.
//!
//! Four transaction generations are supported: legacy, [EIP-155] replay protected, [EIP-2930]
//! access list and [EIP-1559] dynamic fee transactions. Each one can be encoded to and decoded
//! from its RLP wire form, converted to and from its hex JSON form, signed and have its signer
//! recovered. [`Transaction`] wraps all of them and picks the right generation when decoding
//! raw bytes or an untagged JSON record.
//!
//! [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
//! [EIP-2930]: https://eips.ethereum.org/EIPS/eip-2930
//! [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
mod bytes;
pub mod converters;
mod error;
#[cfg(feature = "serde")]
pub mod json;
pub mod rlp_utils;
mod signing;
pub mod transactions;

pub use crate::bytes::Bytes;
pub use error::{Error, Result};
#[cfg(feature = "serde")]
pub use json::{deserialize_transaction, serialize_transaction, JsonTransaction};
pub use primitive_types::{H160, H256};
pub use signing::{address_for, derive_address, get_signer, sign_transaction, transaction_hash};
pub use transactions::{
    access_list::{AccessList, AccessListItem},
    eip1559::Eip1559Transaction,
    eip155::Eip155Transaction,
    eip2930::Eip2930Transaction,
    legacy::LegacyTransaction,
    signature::{LegacySignature, SignatureT, YParitySignature},
    signed_transaction::SignedTransaction,
    typed_transaction::{decode_transaction, encode_transaction, is_signed, Transaction},
    Generation, TransactionT,
};

/// Arbitrary precision, non-negative integer used for every numeric transaction field.
pub type Scalar = num_bigint::BigUint;

/// 160-bit account address.
pub type Address = H160;

/// Re-exports so downstream crates don't need to depend on the primitive crates directly.
pub mod ext {
    pub use bytes;
    pub use num_bigint;
    pub use primitive_types;
    pub use rlp;
    pub use txcodec_crypto as crypto;
}
