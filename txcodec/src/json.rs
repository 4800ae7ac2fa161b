//! All-hex JSON text form of a [`Transaction`].
//!
//! Every scalar is rendered as unpadded lowercase `0x` hex, addresses with checksum casing and
//! storage keys as 32-byte hex. Records carry no reliable generation tag, so reading one
//! classifies it by the fields it has: `maxFeePerGas` means EIP-1559, otherwise `accessList`
//! means EIP-2930, otherwise `chainId` or a `v` of at least 35 means EIP-155, and anything else
//! is a legacy transaction.
use crate::{
    converters::{
        address_to_checksum_hex, bytes_to_hex, checksum_hex_to_address, hex_to_bytes,
        hex_to_scalar, scalar_to_hex, scalar_to_storage_key,
    },
    transactions::{signed_transaction::SignedTransaction, GasPrice, TransactionT},
    AccessList, AccessListItem, Eip1559Transaction, Eip155Transaction, Eip2930Transaction, Error,
    Generation, LegacySignature, LegacyTransaction, Result, Scalar, Transaction,
    YParitySignature,
};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTransaction {
    /// Generation tag, written on output and ignored on input.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", skip_deserializing)]
    pub generation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<String>,

    /// Recipient address, `Some(None)` for contract creation (`null`) and `None` when absent.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub to: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// `[[address, [storage key, ...]], ...]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_list: Option<Vec<(String, Vec<String>)>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_parity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
}

impl JsonTransaction {
    /// Generation this record is read as.
    ///
    /// # Errors
    /// Returns [`Error::Format`] if `v` isn't a hex number.
    pub fn classify(&self) -> Result<Generation> {
        if self.max_fee_per_gas.is_some() {
            return Ok(Generation::Eip1559);
        }
        if self.access_list.is_some() {
            return Ok(Generation::Eip2930);
        }
        if self.chain_id.is_some() {
            return Ok(Generation::Eip155);
        }
        if let Some(v) = self.v.as_deref() {
            if hex_to_scalar(v)? >= Scalar::from(35u8) {
                return Ok(Generation::Eip155);
            }
        }
        Ok(Generation::Legacy)
    }

    fn set_legacy_signature(&mut self, signature: &LegacySignature) {
        self.v = Some(scalar_to_hex(&signature.v));
        self.r = Some(scalar_to_hex(&signature.r));
        self.s = Some(scalar_to_hex(&signature.s));
    }

    fn set_y_parity_signature(&mut self, signature: &YParitySignature) {
        self.y_parity = Some(scalar_to_hex(&signature.y_parity));
        self.r = Some(scalar_to_hex(&signature.r));
        self.s = Some(scalar_to_hex(&signature.s));
    }

    /// Signature fields, only when all three of them are present.
    fn signature_parts(&self, parity: Option<&str>) -> Result<Option<(Scalar, Scalar, Scalar)>> {
        let (Some(parity), Some(r), Some(s)) = (parity, self.r.as_deref(), self.s.as_deref())
        else {
            return Ok(None);
        };
        Ok(Some((hex_to_scalar(parity)?, hex_to_scalar(r)?, hex_to_scalar(s)?)))
    }

    fn legacy_signature(&self) -> Result<Option<LegacySignature>> {
        Ok(self.signature_parts(self.v.as_deref())?.map(|(v, r, s)| LegacySignature { v, r, s }))
    }

    fn y_parity_signature(&self) -> Result<Option<YParitySignature>> {
        Ok(self
            .signature_parts(self.y_parity.as_deref())?
            .map(|(y_parity, r, s)| YParitySignature { y_parity, r, s }))
    }

    fn to_address(&self) -> Result<Option<crate::Address>> {
        let to = self.to.as_ref().ok_or(Error::MissingField("to"))?;
        to.as_deref().map(checksum_hex_to_address).transpose()
    }

    fn data_bytes(&self) -> Result<crate::Bytes> {
        let data = self.data.as_deref().ok_or(Error::MissingField("data"))?;
        Ok(hex_to_bytes(data)?.into())
    }

    fn parsed_access_list(&self) -> Result<AccessList> {
        self.access_list
            .as_ref()
            .ok_or(Error::MissingField("accessList"))?
            .iter()
            .map(|(address, storage_keys)| {
                Ok(AccessListItem {
                    address: checksum_hex_to_address(address)?,
                    storage_keys: storage_keys
                        .iter()
                        .map(|key| scalar_to_storage_key(&hex_to_scalar(key)?))
                        .collect::<Result<Vec<_>>>()?,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(AccessList::from)
    }
}

/// Tells a `null` value (`Some(None)`) apart from an absent key (`None`, through `default`).
fn deserialize_present<'de, D, T>(
    deserializer: D,
) -> core::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn required_scalar(value: Option<&str>, name: &'static str) -> Result<Scalar> {
    hex_to_scalar(value.ok_or(Error::MissingField(name))?)
}

fn with_signature<T>(tx: T, signature: Option<T::Signature>) -> Transaction
where
    T: TransactionT,
    Transaction: From<T> + From<SignedTransaction<T>>,
{
    match signature {
        Some(signature) => SignedTransaction::new(tx, signature).into(),
        None => tx.into(),
    }
}

/// Render `tx` in the all-hex JSON form.
#[must_use]
pub fn serialize_transaction(tx: &Transaction) -> JsonTransaction {
    let mut json = JsonTransaction {
        generation: Some(tx.generation().tag().to_string()),
        chain_id: tx.chain_id().map(scalar_to_hex),
        nonce: Some(scalar_to_hex(tx.nonce())),
        gas_limit: Some(scalar_to_hex(tx.gas_limit())),
        to: Some(tx.to().as_ref().map(address_to_checksum_hex)),
        value: Some(scalar_to_hex(tx.value())),
        data: Some(bytes_to_hex(tx.data())),
        access_list: tx.access_list().map(|access_list| {
            access_list
                .iter()
                .map(|item| {
                    let keys = item.storage_keys.iter().map(|key| bytes_to_hex(key.as_bytes()));
                    (address_to_checksum_hex(&item.address), keys.collect())
                })
                .collect()
        }),
        ..JsonTransaction::default()
    };

    match tx.gas_price() {
        GasPrice::Legacy(gas_price) => json.gas_price = Some(scalar_to_hex(&gas_price)),
        GasPrice::Eip1559 { max_priority_fee_per_gas, max_fee_per_gas } => {
            json.max_priority_fee_per_gas = Some(scalar_to_hex(&max_priority_fee_per_gas));
            json.max_fee_per_gas = Some(scalar_to_hex(&max_fee_per_gas));
        },
    }

    match tx {
        Transaction::SignedLegacy(signed) => json.set_legacy_signature(signed.signature()),
        Transaction::SignedEip155(signed) => json.set_legacy_signature(signed.signature()),
        Transaction::SignedEip2930(signed) => json.set_y_parity_signature(signed.signature()),
        Transaction::SignedEip1559(signed) => json.set_y_parity_signature(signed.signature()),
        Transaction::Legacy(_) |
        Transaction::Eip155(_) |
        Transaction::Eip2930(_) |
        Transaction::Eip1559(_) => {},
    }
    json
}

/// Read a transaction from the all-hex JSON form, classifying it by the fields present.
///
/// Signature fields are only used when all three of them are present.
///
/// # Errors
/// Returns [`Error::MissingField`] if a field the classified generation requires is absent and
/// [`Error::Format`] or [`Error::Range`] for malformed values.
pub fn deserialize_transaction(json: &JsonTransaction) -> Result<Transaction> {
    let generation = json.classify()?;
    tracing::trace!(%generation, "classified json transaction");

    let nonce = required_scalar(json.nonce.as_deref(), "nonce")?;
    let gas_limit = required_scalar(json.gas_limit.as_deref(), "gasLimit")?;
    let value = required_scalar(json.value.as_deref(), "value")?;
    let to = json.to_address()?;
    let data = json.data_bytes()?;

    let tx = match generation {
        Generation::Legacy => {
            let tx = LegacyTransaction {
                nonce,
                gas_price: required_scalar(json.gas_price.as_deref(), "gasPrice")?,
                gas_limit,
                to,
                value,
                data,
            };
            with_signature(tx, json.legacy_signature()?)
        },
        Generation::Eip155 => {
            let tx = Eip155Transaction {
                chain_id: required_scalar(json.chain_id.as_deref(), "chainId")?,
                nonce,
                gas_price: required_scalar(json.gas_price.as_deref(), "gasPrice")?,
                gas_limit,
                to,
                value,
                data,
            };
            with_signature(tx, json.legacy_signature()?)
        },
        Generation::Eip2930 => {
            let tx = Eip2930Transaction {
                chain_id: required_scalar(json.chain_id.as_deref(), "chainId")?,
                nonce,
                gas_price: required_scalar(json.gas_price.as_deref(), "gasPrice")?,
                gas_limit,
                to,
                value,
                data,
                access_list: json.parsed_access_list()?,
            };
            with_signature(tx, json.y_parity_signature()?)
        },
        Generation::Eip1559 => {
            let tx = Eip1559Transaction {
                chain_id: required_scalar(json.chain_id.as_deref(), "chainId")?,
                nonce,
                max_priority_fee_per_gas: required_scalar(
                    json.max_priority_fee_per_gas.as_deref(),
                    "maxPriorityFeePerGas",
                )?,
                max_fee_per_gas: required_scalar(json.max_fee_per_gas.as_deref(), "maxFeePerGas")?,
                gas_limit,
                to,
                value,
                data,
                access_list: json.parsed_access_list()?,
            };
            with_signature(tx, json.y_parity_signature()?)
        },
    };
    Ok(tx)
}

impl From<&Transaction> for JsonTransaction {
    fn from(tx: &Transaction) -> Self {
        serialize_transaction(tx)
    }
}

impl From<Transaction> for JsonTransaction {
    fn from(tx: Transaction) -> Self {
        serialize_transaction(&tx)
    }
}

impl TryFrom<JsonTransaction> for Transaction {
    type Error = Error;

    fn try_from(json: JsonTransaction) -> Result<Self> {
        deserialize_transaction(&json)
    }
}
