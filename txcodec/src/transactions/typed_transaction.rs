use super::{
    access_list::AccessList, eip1559, eip155::is_encoded_eip155, eip2930,
    signed_transaction::SignedTransaction, GasPrice, Generation, TransactionT,
};
use crate::{
    Address, Eip1559Transaction, Eip155Transaction, Eip2930Transaction, Error,
    LegacyTransaction, Result, Scalar, H256,
};
use txcodec_crypto::{Crypto, DefaultCrypto, Signer};

/// Runs `$body` with `$tx` bound to the unsigned payload of any variant.
macro_rules! with_payload {
    ($value:expr, $tx:ident => $body:expr) => {
        match $value {
            Transaction::Legacy($tx) => $body,
            Transaction::Eip155($tx) => $body,
            Transaction::Eip2930($tx) => $body,
            Transaction::Eip1559($tx) => $body,
            Transaction::SignedLegacy(signed) => {
                let $tx = signed.payload();
                $body
            },
            Transaction::SignedEip155(signed) => {
                let $tx = signed.payload();
                $body
            },
            Transaction::SignedEip2930(signed) => {
                let $tx = signed.payload();
                $body
            },
            Transaction::SignedEip1559(signed) => {
                let $tx = signed.payload();
                $body
            },
        }
    };
}

/// The [`Transaction`] enum represents every supported transaction, signed or not.
///
/// Its variants correspond to:
/// 1. Legacy (pre-EIP155) [`LegacyTransaction`]
/// 2. EIP155 (replay protected) [`Eip155Transaction`]
/// 3. EIP2930 (state access lists) [`Eip2930Transaction`]
/// 4. EIP1559 [`Eip1559Transaction`]
///
/// each one either unsigned or paired with its generation's signature.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "crate::JsonTransaction", try_from = "crate::JsonTransaction")
)]
pub enum Transaction {
    Legacy(LegacyTransaction),
    SignedLegacy(SignedTransaction<LegacyTransaction>),
    Eip155(Eip155Transaction),
    SignedEip155(SignedTransaction<Eip155Transaction>),
    Eip2930(Eip2930Transaction),
    SignedEip2930(SignedTransaction<Eip2930Transaction>),
    Eip1559(Eip1559Transaction),
    SignedEip1559(SignedTransaction<Eip1559Transaction>),
}

impl Transaction {
    #[must_use]
    pub const fn generation(&self) -> Generation {
        match self {
            Self::Legacy(_) | Self::SignedLegacy(_) => Generation::Legacy,
            Self::Eip155(_) | Self::SignedEip155(_) => Generation::Eip155,
            Self::Eip2930(_) | Self::SignedEip2930(_) => Generation::Eip2930,
            Self::Eip1559(_) | Self::SignedEip1559(_) => Generation::Eip1559,
        }
    }

    #[must_use]
    pub const fn is_signed(&self) -> bool {
        match self {
            Self::Legacy(_) | Self::Eip155(_) | Self::Eip2930(_) | Self::Eip1559(_) => false,
            Self::SignedLegacy(_) |
            Self::SignedEip155(_) |
            Self::SignedEip2930(_) |
            Self::SignedEip1559(_) => true,
        }
    }

    /// Wire encoding, with the type prefix for typed generations.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Legacy(tx) => tx.encode(None),
            Self::Eip155(tx) => tx.encode(None),
            Self::Eip2930(tx) => tx.encode(None),
            Self::Eip1559(tx) => tx.encode(None),
            Self::SignedLegacy(signed) => signed.encode(),
            Self::SignedEip155(signed) => signed.encode(),
            Self::SignedEip2930(signed) => signed.encode(),
            Self::SignedEip1559(signed) => signed.encode(),
        }
    }

    /// Decode a wire encoding, detecting its generation.
    ///
    /// The first byte of typed transactions is the transaction type ([EIP-2718]); legacy shaped
    /// transactions always start with a list marker (>= 0xc0) and are told apart by their
    /// signature slots.
    ///
    /// [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718
    ///
    /// # Errors
    /// Returns [`Error::EmptyInput`] for empty input, [`Error::Format`] for an unknown leading
    /// byte, and the generation's decoding error otherwise.
    pub fn decode(encoded: &[u8]) -> Result<Self> {
        let Some(&first) = encoded.first() else {
            return Err(Error::EmptyInput);
        };
        let generation = match first {
            eip1559::TRANSACTION_TYPE => Generation::Eip1559,
            eip2930::TRANSACTION_TYPE => Generation::Eip2930,
            first if first < 0xc0 => {
                return Err(Error::Format(format!("unknown transaction type 0x{first:02x}")))
            },
            _ if is_encoded_eip155(encoded)? => Generation::Eip155,
            _ => Generation::Legacy,
        };
        tracing::trace!(%generation, len = encoded.len(), "detected transaction generation");
        Self::decode_as(generation, encoded)
    }

    /// Decode a wire encoding of a known generation.
    ///
    /// # Errors
    /// Returns [`Error::EmptyInput`] for empty input, or the generation's decoding error.
    pub fn decode_as(generation: Generation, encoded: &[u8]) -> Result<Self> {
        if encoded.is_empty() {
            return Err(Error::EmptyInput);
        }
        match generation {
            Generation::Legacy => decode_with(encoded, Self::Legacy, Self::SignedLegacy),
            Generation::Eip155 => decode_with(encoded, Self::Eip155, Self::SignedEip155),
            Generation::Eip2930 => decode_with(encoded, Self::Eip2930, Self::SignedEip2930),
            Generation::Eip1559 => decode_with(encoded, Self::Eip1559, Self::SignedEip1559),
        }
    }

    /// Keccak-256 of the unsigned encoding, the digest that gets signed.
    #[must_use]
    pub fn signing_hash(&self) -> H256 {
        with_payload!(self, tx => tx.signing_hash())
    }

    /// Keccak-256 of [`Transaction::encode`]. For a signed transaction this is its network id.
    #[must_use]
    pub fn tx_hash(&self) -> H256 {
        match self {
            Self::SignedLegacy(signed) => signed.tx_hash(),
            Self::SignedEip155(signed) => signed.tx_hash(),
            Self::SignedEip2930(signed) => signed.tx_hash(),
            Self::SignedEip1559(signed) => signed.tx_hash(),
            unsigned => DefaultCrypto::keccak256(unsigned.encode()),
        }
    }

    /// Drop the signature fields, if any.
    #[must_use]
    pub fn to_unsigned(&self) -> Self {
        match self {
            Self::SignedLegacy(signed) => Self::Legacy(signed.payload().clone()),
            Self::SignedEip155(signed) => Self::Eip155(signed.payload().clone()),
            Self::SignedEip2930(signed) => Self::Eip2930(signed.payload().clone()),
            Self::SignedEip1559(signed) => Self::Eip1559(signed.payload().clone()),
            unsigned => unsigned.clone(),
        }
    }

    /// Sign the transaction, a signed transaction is returned unchanged.
    ///
    /// # Errors
    /// Returns [`Error::Signing`] if the signer fails.
    pub async fn sign<S>(self, signer: &S) -> Result<Self>
    where
        S: Signer + ?Sized,
    {
        let signed: Self = match self {
            Self::Legacy(tx) => SignedTransaction::sign(tx, signer).await?.into(),
            Self::Eip155(tx) => SignedTransaction::sign(tx, signer).await?.into(),
            Self::Eip2930(tx) => SignedTransaction::sign(tx, signer).await?.into(),
            Self::Eip1559(tx) => SignedTransaction::sign(tx, signer).await?.into(),
            signed @ (Self::SignedLegacy(_) |
            Self::SignedEip155(_) |
            Self::SignedEip2930(_) |
            Self::SignedEip1559(_)) => {
                tracing::debug!(generation = %signed.generation(), "transaction already signed");
                signed
            },
        };
        Ok(signed)
    }

    /// Address of the account that signed the transaction.
    ///
    /// # Errors
    /// Returns [`Error::Unsigned`] for an unsigned transaction and
    /// [`Error::UnrecoverableSignature`] if no public key can be recovered.
    pub fn recover_signer(&self) -> Result<Address> {
        match self {
            Self::SignedLegacy(signed) => signed.recover_signer(),
            Self::SignedEip155(signed) => signed.recover_signer(),
            Self::SignedEip2930(signed) => signed.recover_signer(),
            Self::SignedEip1559(signed) => signed.recover_signer(),
            Self::Legacy(_) | Self::Eip155(_) | Self::Eip2930(_) | Self::Eip1559(_) => {
                Err(Error::Unsigned)
            },
        }
    }

    // chain id, is only None for Legacy Transactions
    #[must_use]
    pub fn chain_id(&self) -> Option<&Scalar> {
        with_payload!(self, tx => tx.chain_id())
    }

    #[must_use]
    pub fn nonce(&self) -> &Scalar {
        with_payload!(self, tx => tx.nonce())
    }

    #[must_use]
    pub fn gas_price(&self) -> GasPrice {
        with_payload!(self, tx => tx.gas_price())
    }

    #[must_use]
    pub fn gas_limit(&self) -> &Scalar {
        with_payload!(self, tx => tx.gas_limit())
    }

    #[must_use]
    pub fn to(&self) -> Option<Address> {
        with_payload!(self, tx => tx.to())
    }

    #[must_use]
    pub fn value(&self) -> &Scalar {
        with_payload!(self, tx => tx.value())
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        with_payload!(self, tx => tx.data())
    }

    #[must_use]
    pub fn access_list(&self) -> Option<&AccessList> {
        with_payload!(self, tx => tx.access_list())
    }
}

fn decode_with<T: TransactionT>(
    encoded: &[u8],
    unsigned: fn(T) -> Transaction,
    signed: fn(SignedTransaction<T>) -> Transaction,
) -> Result<Transaction> {
    let (tx, signature) = T::decode(encoded)?;
    Ok(match signature {
        Some(signature) => signed(SignedTransaction::new(tx, signature)),
        None => unsigned(tx),
    })
}

impl From<LegacyTransaction> for Transaction {
    fn from(tx: LegacyTransaction) -> Self {
        Self::Legacy(tx)
    }
}

impl From<SignedTransaction<LegacyTransaction>> for Transaction {
    fn from(tx: SignedTransaction<LegacyTransaction>) -> Self {
        Self::SignedLegacy(tx)
    }
}

impl From<Eip155Transaction> for Transaction {
    fn from(tx: Eip155Transaction) -> Self {
        Self::Eip155(tx)
    }
}

impl From<SignedTransaction<Eip155Transaction>> for Transaction {
    fn from(tx: SignedTransaction<Eip155Transaction>) -> Self {
        Self::SignedEip155(tx)
    }
}

impl From<Eip2930Transaction> for Transaction {
    fn from(tx: Eip2930Transaction) -> Self {
        Self::Eip2930(tx)
    }
}

impl From<SignedTransaction<Eip2930Transaction>> for Transaction {
    fn from(tx: SignedTransaction<Eip2930Transaction>) -> Self {
        Self::SignedEip2930(tx)
    }
}

impl From<Eip1559Transaction> for Transaction {
    fn from(tx: Eip1559Transaction) -> Self {
        Self::Eip1559(tx)
    }
}

impl From<SignedTransaction<Eip1559Transaction>> for Transaction {
    fn from(tx: SignedTransaction<Eip1559Transaction>) -> Self {
        Self::SignedEip1559(tx)
    }
}

/// Wire encoding of `tx`.
#[must_use]
pub fn encode_transaction(tx: &Transaction) -> Vec<u8> {
    tx.encode()
}

/// Decode a wire encoding of any generation.
///
/// # Errors
/// See [`Transaction::decode`].
pub fn decode_transaction(encoded: &[u8]) -> Result<Transaction> {
    Transaction::decode(encoded)
}

#[must_use]
pub const fn is_signed(tx: &Transaction) -> bool {
    tx.is_signed()
}
