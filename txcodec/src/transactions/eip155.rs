use super::{
    access_list::AccessList,
    signature::LegacySignature,
    GasPrice, Generation, TransactionT,
};
use crate::{
    rlp_utils::{decode_list, expect_item_count, RlpExt, RlpStreamExt},
    Address, Bytes, Error, Result, Scalar,
};
use num_traits::{CheckedSub, Zero};
use rlp::RlpStream;

const NAME: &str = "EIP-155";

/// Legacy shaped transaction with replay protection, introduced in the Spurious Dragon upgrade
/// via [EIP-155].
///
/// The chain id is carried in the `v, r, s` slots: `(chain_id, 0, 0)` while unsigned, and folded
/// into `v = 35 + 2 * chain_id + y_parity` once signed.
///
/// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Eip155Transaction {
    /// The chain ID of the transaction.
    pub chain_id: Scalar,

    /// The nonce of the transaction.
    pub nonce: Scalar,

    /// Gas price
    pub gas_price: Scalar,

    /// Supplied gas
    pub gas_limit: Scalar,

    /// Recipient address (None for contract creation)
    pub to: Option<Address>,

    /// Transferred value
    pub value: Scalar,

    /// The data of the transaction.
    pub data: Bytes,
}

/// Whether a legacy shaped encoding is an EIP-155 one.
///
/// A 9 item list is EIP-155 if its r and s are both zero (unsigned) or its v is at least 35
/// (signed). Anything else, including 6 item lists, is a legacy transaction.
pub(crate) fn is_encoded_eip155(encoded: &[u8]) -> Result<bool> {
    let rlp = decode_list(encoded, NAME)?;
    if rlp.item_count()? != 9 {
        return Ok(false);
    }
    if rlp.scalar_at(7)?.is_zero() && rlp.scalar_at(8)?.is_zero() {
        return Ok(true);
    }
    Ok(rlp.scalar_at(6)? >= Scalar::from(35u8))
}

impl TransactionT for Eip155Transaction {
    type Signature = LegacySignature;
    const GENERATION: Generation = Generation::Eip155;

    fn encode(&self, signature: Option<&LegacySignature>) -> Vec<u8> {
        let mut stream = RlpStream::new_list(9);
        stream
            .append_scalar(&self.nonce)
            .append_scalar(&self.gas_price)
            .append_scalar(&self.gas_limit)
            .append_address_opt(self.to.as_ref())
            .append_scalar(&self.value)
            .append_bytes(&self.data);

        match signature {
            Some(signature) => stream
                .append_scalar(&signature.v)
                .append_scalar(&signature.r)
                .append_scalar(&signature.s),
            None => stream.append_scalar(&self.chain_id).append_bytes(&[]).append_bytes(&[]),
        };
        stream.out().to_vec()
    }

    fn decode(encoded: &[u8]) -> Result<(Self, Option<LegacySignature>)> {
        let rlp = decode_list(encoded, NAME)?;
        expect_item_count(&rlp, NAME, &[9])?;

        let v = rlp.scalar_at(6)?;
        let r = rlp.scalar_at(7)?;
        let s = rlp.scalar_at(8)?;
        let (chain_id, signature) = if r.is_zero() && s.is_zero() {
            (v, None)
        } else {
            let Some(offset) = v.checked_sub(&Scalar::from(35u8)) else {
                return Err(Error::Structure(format!(
                    "expected v of a signed {NAME} transaction to be at least 35 but got {v}"
                )));
            };
            (offset >> 1u32, Some(LegacySignature { v, r, s }))
        };

        let tx = Self {
            chain_id,
            nonce: rlp.scalar_at(0)?,
            gas_price: rlp.scalar_at(1)?,
            gas_limit: rlp.scalar_at(2)?,
            to: rlp.address_opt_at(3)?,
            value: rlp.scalar_at(4)?,
            data: rlp.data_at(5)?,
        };
        Ok((tx, signature))
    }

    fn signature_from_parts(&self, recovery_id: u8, r: Scalar, s: Scalar) -> LegacySignature {
        let v = (&self.chain_id << 1u32) + 35u32 + u32::from(recovery_id);
        LegacySignature { v, r, s }
    }

    fn chain_id(&self) -> Option<&Scalar> {
        Some(&self.chain_id)
    }

    fn nonce(&self) -> &Scalar {
        &self.nonce
    }

    fn gas_price(&self) -> GasPrice {
        GasPrice::Legacy(self.gas_price.clone())
    }

    fn gas_limit(&self) -> &Scalar {
        &self.gas_limit
    }

    fn to(&self) -> Option<Address> {
        self.to
    }

    fn value(&self) -> &Scalar {
        &self.value
    }

    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn access_list(&self) -> Option<&AccessList> {
        None
    }
}
