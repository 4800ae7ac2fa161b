use super::{
    access_list::AccessList,
    signature::YParitySignature,
    GasPrice, Generation, TransactionT,
};
use crate::{
    rlp_utils::{decode_list, expect_item_count, strip_type_prefix, RlpExt, RlpStreamExt},
    Address, Bytes, Result, Scalar,
};
use rlp::RlpStream;

const NAME: &str = "EIP-2930";
pub(crate) const TRANSACTION_TYPE: u8 = 0x01;

/// Transactions with type 0x1 are transactions introduced in EIP-2930. They contain, along with
/// the legacy parameters, an access list which specifies an array of addresses and storage keys
/// that the transaction plans to access (an access list)
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Eip2930Transaction {
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

    /// Optional access list introduced in EIP-2930.
    pub access_list: AccessList,
}

impl TransactionT for Eip2930Transaction {
    type Signature = YParitySignature;
    const GENERATION: Generation = Generation::Eip2930;

    fn encode(&self, signature: Option<&YParitySignature>) -> Vec<u8> {
        let mut stream = RlpStream::new_list(if signature.is_some() { 11 } else { 8 });
        stream
            .append_scalar(&self.chain_id)
            .append_scalar(&self.nonce)
            .append_scalar(&self.gas_price)
            .append_scalar(&self.gas_limit)
            .append_address_opt(self.to.as_ref())
            .append_scalar(&self.value)
            .append_bytes(&self.data);
        self.access_list.rlp_append(&mut stream);
        if let Some(signature) = signature {
            stream
                .append_scalar(&signature.y_parity)
                .append_scalar(&signature.r)
                .append_scalar(&signature.s);
        }

        let mut encoded = vec![TRANSACTION_TYPE];
        encoded.extend_from_slice(&stream.out());
        encoded
    }

    fn decode(encoded: &[u8]) -> Result<(Self, Option<YParitySignature>)> {
        let payload = strip_type_prefix(encoded, TRANSACTION_TYPE, NAME)?;
        let rest = decode_list(payload, NAME)?;
        let items = expect_item_count(&rest, NAME, &[8, 11])?;

        let tx = Self {
            chain_id: rest.scalar_at(0)?,
            nonce: rest.scalar_at(1)?,
            gas_price: rest.scalar_at(2)?,
            gas_limit: rest.scalar_at(3)?,
            to: rest.address_opt_at(4)?,
            value: rest.scalar_at(5)?,
            data: rest.data_at(6)?,
            access_list: AccessList::rlp_decode(&rest.list_item_at(7)?)?,
        };
        let signature = if items == 11 {
            Some(YParitySignature {
                y_parity: rest.scalar_at(8)?,
                r: rest.scalar_at(9)?,
                s: rest.scalar_at(10)?,
            })
        } else {
            None
        };
        Ok((tx, signature))
    }

    fn signature_from_parts(&self, recovery_id: u8, r: Scalar, s: Scalar) -> YParitySignature {
        YParitySignature { y_parity: recovery_id.into(), r, s }
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
        Some(&self.access_list)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{Eip2930Transaction, TransactionT, YParitySignature};
    use crate::{AccessList, AccessListItem, Address, Bytes, Error, Scalar, H256};
    use hex_literal::hex;

    static RLP_EIP2930_UNSIGNED: &[u8] = &hex!("01f85d01198256788212349496216849c49358b10257cb55b28ea603c874b05e84deadbeef80f838f79496216849c49358b10257cb55b28ea603c874b05ee1a00000000000000000000000000000000000000000000000000000000000000001");
    static RLP_EIP2930_SIGNED: &[u8] = &hex!("01f8a001198256788212349496216849c49358b10257cb55b28ea603c874b05e84deadbeef80f838f79496216849c49358b10257cb55b28ea603c874b05ee1a0000000000000000000000000000000000000000000000000000000000000000101a086a26dc49aa2272abadb57a9f84b18815e166c6c087200e03474534607448eeea0412bf5003856d3e31779374048bdbee3644528c370475eeab729cf1530a0c436");

    pub fn build_eip2930() -> (Eip2930Transaction, YParitySignature) {
        let tx = Eip2930Transaction {
            chain_id: 1u8.into(),
            nonce: 0x19u32.into(),
            gas_price: 0x5678u32.into(),
            gas_limit: 0x1234u32.into(),
            to: Some(hex!("96216849c49358b10257cb55b28ea603c874b05e").into()),
            value: 0xdead_beefu32.into(),
            data: Bytes::new(),
            access_list: AccessList(vec![AccessListItem {
                address: Address::from(hex!("96216849c49358b10257cb55b28ea603c874b05e")),
                storage_keys: vec![H256::from_low_u64_be(1)],
            }]),
        };
        let signature = YParitySignature {
            y_parity: 1u8.into(),
            r: Scalar::from_bytes_be(&hex!(
                "86a26dc49aa2272abadb57a9f84b18815e166c6c087200e03474534607448eee"
            )),
            s: Scalar::from_bytes_be(&hex!(
                "412bf5003856d3e31779374048bdbee3644528c370475eeab729cf1530a0c436"
            )),
        };
        (tx, signature)
    }

    #[test]
    fn rlp_encode_unsigned_works() {
        let (tx, _) = build_eip2930();
        assert_eq!(tx.encode(None), RLP_EIP2930_UNSIGNED);
    }

    #[test]
    fn rlp_encode_signed_works() {
        let (tx, signature) = build_eip2930();
        assert_eq!(tx.encode(Some(&signature)), RLP_EIP2930_SIGNED);
    }

    #[test]
    fn rlp_decode_works() {
        let (expected_tx, expected_sig) = build_eip2930();
        assert_eq!(
            Eip2930Transaction::decode(RLP_EIP2930_UNSIGNED).unwrap(),
            (expected_tx.clone(), None)
        );
        assert_eq!(
            Eip2930Transaction::decode(RLP_EIP2930_SIGNED).unwrap(),
            (expected_tx, Some(expected_sig))
        );
    }

    #[test]
    fn compute_eip2930_tx_hash() {
        let (tx, signature) = build_eip2930();
        let expected =
            H256(hex!("b216aa5762487120f657ca3a2063001a0f262c917dc335435c69e095ec4d5a24"));
        assert_eq!(expected, tx.compute_tx_hash(&signature));
    }

    #[test]
    fn rlp_decode_rejects_bad_shapes() {
        // wrong type prefix
        let mut encoded = RLP_EIP2930_UNSIGNED.to_vec();
        encoded[0] = 0x02;
        assert!(matches!(Eip2930Transaction::decode(&encoded), Err(Error::Structure(_))));
        // type prefix only
        assert!(matches!(Eip2930Transaction::decode(&[0x01]), Err(Error::Structure(_))));
        // 9 items
        let encoded = hex!("01c9010203040580c08080");
        assert!(matches!(Eip2930Transaction::decode(&encoded), Err(Error::Structure(_))));
        // access list slot holds a byte string
        let encoded = hex!("01c80102030405808080");
        assert!(matches!(Eip2930Transaction::decode(&encoded), Err(Error::Structure(_))));
    }

    #[test]
    fn empty_access_list_works() {
        let tx = Eip2930Transaction { chain_id: 5u8.into(), ..Default::default() };
        let encoded = tx.encode(None);
        assert_eq!(encoded, hex!("01c805808080808080c0"));
        assert_eq!(Eip2930Transaction::decode(&encoded).unwrap(), (tx, None));
    }
}
