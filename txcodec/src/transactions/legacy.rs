use super::{
    access_list::AccessList,
    signature::LegacySignature,
    GasPrice, Generation, TransactionT,
};
use crate::{
    rlp_utils::{decode_list, expect_item_count, RlpExt, RlpStreamExt},
    Address, Bytes, Result, Scalar,
};
use rlp::RlpStream;

const NAME: &str = "legacy";

/// Legacy transaction that use the transaction format existing before typed transactions were
/// introduced in EIP-2718. Legacy transactions don’t use access lists, replay protection or
/// incorporate EIP-1559 fee market changes.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct LegacyTransaction {
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

impl LegacyTransaction {
    fn rlp_append_fields(&self, stream: &mut RlpStream) {
        stream
            .append_scalar(&self.nonce)
            .append_scalar(&self.gas_price)
            .append_scalar(&self.gas_limit)
            .append_address_opt(self.to.as_ref())
            .append_scalar(&self.value)
            .append_bytes(&self.data);
    }
}

impl TransactionT for LegacyTransaction {
    type Signature = LegacySignature;
    const GENERATION: Generation = Generation::Legacy;

    fn encode(&self, signature: Option<&LegacySignature>) -> Vec<u8> {
        let mut stream = RlpStream::new_list(if signature.is_some() { 9 } else { 6 });
        self.rlp_append_fields(&mut stream);
        if let Some(signature) = signature {
            stream
                .append_scalar(&signature.v)
                .append_scalar(&signature.r)
                .append_scalar(&signature.s);
        }
        stream.out().to_vec()
    }

    fn decode(encoded: &[u8]) -> Result<(Self, Option<LegacySignature>)> {
        let rlp = decode_list(encoded, NAME)?;
        let items = expect_item_count(&rlp, NAME, &[6, 9])?;

        let tx = Self {
            nonce: rlp.scalar_at(0)?,
            gas_price: rlp.scalar_at(1)?,
            gas_limit: rlp.scalar_at(2)?,
            to: rlp.address_opt_at(3)?,
            value: rlp.scalar_at(4)?,
            data: rlp.data_at(5)?,
        };

        // If there are 9 items, then the last 3 are the signature
        let signature = if items == 9 {
            Some(LegacySignature {
                v: rlp.scalar_at(6)?,
                r: rlp.scalar_at(7)?,
                s: rlp.scalar_at(8)?,
            })
        } else {
            None
        };
        Ok((tx, signature))
    }

    fn signature_from_parts(&self, recovery_id: u8, r: Scalar, s: Scalar) -> LegacySignature {
        LegacySignature { v: Scalar::from(27 + u32::from(recovery_id)), r, s }
    }

    fn chain_id(&self) -> Option<&Scalar> {
        None
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
