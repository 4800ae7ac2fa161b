pub mod access_list;
pub mod eip1559;
pub mod eip155;
pub mod eip2930;
pub mod legacy;
pub mod signature;
pub mod signed_transaction;
pub mod typed_transaction;

use crate::{Address, Result, Scalar, H256};
use access_list::AccessList;
use core::fmt::{Debug, Display, Formatter, Result as FmtResult};
use signature::SignatureT;
use txcodec_crypto::{Crypto, DefaultCrypto};

/// The four historical transaction formats.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Generation {
    Legacy,
    Eip155,
    Eip2930,
    Eip1559,
}

impl Generation {
    /// Tag used for this generation in the JSON form.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Eip155 => "155",
            Self::Eip2930 => "2930",
            Self::Eip1559 => "1559",
        }
    }

    /// EIP-2718 transaction type, prepended to the RLP payload of typed transactions.
    #[must_use]
    pub const fn transaction_type(self) -> Option<u8> {
        match self {
            Self::Legacy | Self::Eip155 => None,
            Self::Eip2930 => Some(eip2930::TRANSACTION_TYPE),
            Self::Eip1559 => Some(eip1559::TRANSACTION_TYPE),
        }
    }
}

impl Display for Generation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.tag())
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GasPrice {
    Legacy(Scalar),
    Eip1559 { max_priority_fee_per_gas: Scalar, max_fee_per_gas: Scalar },
}

/// Codec of one transaction generation.
pub trait TransactionT: Clone + PartialEq + Eq + Debug {
    /// Signature fields appended to the signed encoding.
    type Signature: SignatureT;

    const GENERATION: Generation;

    /// Encode the transaction, including the signature fields when `signature` is given.
    fn encode(&self, signature: Option<&Self::Signature>) -> Vec<u8>;

    /// Decode a signed or unsigned encoding of this generation.
    ///
    /// # Errors
    /// Fails if `encoded` doesn't have the item count and item shapes of this generation.
    fn decode(encoded: &[u8]) -> Result<(Self, Option<Self::Signature>)>;

    /// Signature fields for a recoverable signature over [`TransactionT::signing_hash`].
    fn signature_from_parts(&self, recovery_id: u8, r: Scalar, s: Scalar) -> Self::Signature;

    /// The hash of the transaction without signature
    fn signing_hash(&self) -> H256 {
        DefaultCrypto::keccak256(self.encode(None))
    }

    // Compute the tx-hash using the provided signature
    fn compute_tx_hash(&self, signature: &Self::Signature) -> H256 {
        DefaultCrypto::keccak256(self.encode(Some(signature)))
    }

    // chain id, is only None for Legacy Transactions
    fn chain_id(&self) -> Option<&Scalar>;
    fn nonce(&self) -> &Scalar;
    fn gas_price(&self) -> GasPrice;
    fn gas_limit(&self) -> &Scalar;
    fn to(&self) -> Option<Address>;
    fn value(&self) -> &Scalar;
    fn data(&self) -> &[u8];

    /// EIP-2930 access list
    fn access_list(&self) -> Option<&AccessList>;
}
