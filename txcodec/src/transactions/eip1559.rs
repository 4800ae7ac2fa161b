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

const NAME: &str = "EIP-1559";
pub(crate) const TRANSACTION_TYPE: u8 = 0x02;

/// Transactions with type 0x2 are transactions introduced in EIP-1559, included in Ethereum's
/// London fork. EIP-1559 addresses the network congestion and overpricing of transaction fees
/// caused by the historical fee market, in which users send transactions specifying a gas price
/// bid using a first-price auction mechanism.
///
/// EIP-1559 transactions don’t specify gas price, and instead use an in-protocol, dynamically
/// changing base fee per gas, adjusted at each block to manage network congestion.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Eip1559Transaction {
    /// The chain ID of the transaction.
    pub chain_id: Scalar,

    /// The nonce of the transaction.
    pub nonce: Scalar,

    /// Represents the maximum tx fee that will go to the miner as part of the user's
    /// fee payment. It serves 3 purposes:
    /// 1. Compensates miners for the uncle/ommer risk + fixed costs of including transaction in a
    /// block;
    /// 2. Allows users with high opportunity costs to pay a premium to miners;
    /// 3. In times where demand exceeds the available block space (i.e. 100% full, 30mm gas),
    /// this component allows first price auctions (i.e. the pre-1559 fee model) to happen on the
    /// priority fee.
    ///
    /// Incorporated as part of the London upgrade via [EIP-1559].
    ///
    /// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
    pub max_priority_fee_per_gas: Scalar,

    /// Represents the maximum amount that a user is willing to pay for their tx (inclusive of
    /// baseFeePerGas and maxPriorityFeePerGas). The difference between maxFeePerGas and
    /// baseFeePerGas + maxPriorityFeePerGas is “refunded” to the user.
    ///
    /// Incorporated as part of the London upgrade via [EIP-1559].
    ///
    /// [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559
    pub max_fee_per_gas: Scalar,

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

impl TransactionT for Eip1559Transaction {
    type Signature = YParitySignature;
    const GENERATION: Generation = Generation::Eip1559;

    fn encode(&self, signature: Option<&YParitySignature>) -> Vec<u8> {
        let mut stream = RlpStream::new_list(if signature.is_some() { 12 } else { 9 });
        stream
            .append_scalar(&self.chain_id)
            .append_scalar(&self.nonce)
            .append_scalar(&self.max_priority_fee_per_gas)
            .append_scalar(&self.max_fee_per_gas)
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
        let items = expect_item_count(&rest, NAME, &[9, 12])?;

        let tx = Self {
            chain_id: rest.scalar_at(0)?,
            nonce: rest.scalar_at(1)?,
            max_priority_fee_per_gas: rest.scalar_at(2)?,
            max_fee_per_gas: rest.scalar_at(3)?,
            gas_limit: rest.scalar_at(4)?,
            to: rest.address_opt_at(5)?,
            value: rest.scalar_at(6)?,
            data: rest.data_at(7)?,
            access_list: AccessList::rlp_decode(&rest.list_item_at(8)?)?,
        };
        let signature = if items == 12 {
            Some(YParitySignature {
                y_parity: rest.scalar_at(9)?,
                r: rest.scalar_at(10)?,
                s: rest.scalar_at(11)?,
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
        GasPrice::Eip1559 {
            max_priority_fee_per_gas: self.max_priority_fee_per_gas.clone(),
            max_fee_per_gas: self.max_fee_per_gas.clone(),
        }
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
    use super::{Eip1559Transaction, TransactionT, YParitySignature};
    use crate::{AccessList, AccessListItem, Address, Error, Scalar, H256};
    use hex_literal::hex;

    static RLP_EIP1559_SIGNED: &[u8] = &hex!("02f9037701758405f5e10085069b8cf27b8302db9d943fc91a3afd70395cd496c647d5a6cc9d4b2b7fad8832a767a9562d0000b902843593564c000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000000a0000000000000000000000000000000000000000000000000000000006547d41700000000000000000000000000000000000000000000000000000000000000020b000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000004000000000000000000000000000000000000000000000000000000000000000a00000000000000000000000000000000000000000000000000000000000000040000000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000032a767a9562d00000000000000000000000000000000000000000000000000000000000000000100000000000000000000000000000000000000000000000000000000000000000100000000000000000000000000000000000000000000000032a767a9562d000000000000000000000000000000000000000000000021b60af11987fa0670342f00000000000000000000000000000000000000000000000000000000000000a00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002bc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2000bb8b55ee890426341fe45ee6dc788d2d93d25b59063000000000000000000000000000000000000000000f87cf87a943fc91a3afd70395cd496c647d5a6cc9d4b2b7fadf863a00000000000000000000000000000000000000000000000000000000000000000a0a19fd53308a1c44a3ed22d3f20ed4229aa8909e0d0a90510ca482367ad42caa6a0ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff01a0bde8e920a9acce0c9950f112d02d457d517835297b2610b4d0bcd56df114010fa066ee7972cde2c5bd85fdb06aa358da04944b3ad5e56fe3e06d8fcb1137a52939");
    static RLP_EIP1559_UNSIGNED: &[u8] = &hex!("02f9033401758405f5e10085069b8cf27b8302db9d943fc91a3afd70395cd496c647d5a6cc9d4b2b7fad8832a767a9562d0000b902843593564c000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000000a0000000000000000000000000000000000000000000000000000000006547d41700000000000000000000000000000000000000000000000000000000000000020b000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000004000000000000000000000000000000000000000000000000000000000000000a00000000000000000000000000000000000000000000000000000000000000040000000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000032a767a9562d00000000000000000000000000000000000000000000000000000000000000000100000000000000000000000000000000000000000000000000000000000000000100000000000000000000000000000000000000000000000032a767a9562d000000000000000000000000000000000000000000000021b60af11987fa0670342f00000000000000000000000000000000000000000000000000000000000000a00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002bc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2000bb8b55ee890426341fe45ee6dc788d2d93d25b59063000000000000000000000000000000000000000000f87cf87a943fc91a3afd70395cd496c647d5a6cc9d4b2b7fadf863a00000000000000000000000000000000000000000000000000000000000000000a0a19fd53308a1c44a3ed22d3f20ed4229aa8909e0d0a90510ca482367ad42caa6a0ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff");

    pub fn build_eip1559() -> (Eip1559Transaction, YParitySignature) {
        let tx = Eip1559Transaction {
            chain_id: 1u8.into(),
            nonce: 117u8.into(),
            max_priority_fee_per_gas: 100_000_000u32.into(),
            max_fee_per_gas: 28_379_509_371u64.into(),
            gas_limit: 187_293u32.into(),
            to: Some(hex!("3fc91a3afd70395cd496c647d5a6cc9d4b2b7fad").into()),
            value: 3_650_000_000_000_000_000u64.into(),
            data: hex!("3593564c000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000000a0000000000000000000000000000000000000000000000000000000006547d41700000000000000000000000000000000000000000000000000000000000000020b000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000004000000000000000000000000000000000000000000000000000000000000000a00000000000000000000000000000000000000000000000000000000000000040000000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000032a767a9562d00000000000000000000000000000000000000000000000000000000000000000100000000000000000000000000000000000000000000000000000000000000000100000000000000000000000000000000000000000000000032a767a9562d000000000000000000000000000000000000000000000021b60af11987fa0670342f00000000000000000000000000000000000000000000000000000000000000a00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002bc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2000bb8b55ee890426341fe45ee6dc788d2d93d25b59063000000000000000000000000000000000000000000").into(),
            access_list: AccessList(vec![AccessListItem {
                address: Address::from(hex!("3fc91a3afd70395cd496c647d5a6cc9d4b2b7fad")),
                storage_keys: vec![
                    H256::zero(),
                    H256::from(hex!(
                        "a19fd53308a1c44a3ed22d3f20ed4229aa8909e0d0a90510ca482367ad42caa6"
                    )),
                    H256::from(hex!(
                        "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
                    )),
                ],
            }]),
        };
        let signature = YParitySignature {
            y_parity: 1u8.into(),
            r: Scalar::from_bytes_be(&hex!(
                "bde8e920a9acce0c9950f112d02d457d517835297b2610b4d0bcd56df114010f"
            )),
            s: Scalar::from_bytes_be(&hex!(
                "66ee7972cde2c5bd85fdb06aa358da04944b3ad5e56fe3e06d8fcb1137a52939"
            )),
        };
        (tx, signature)
    }

    #[test]
    fn rlp_encode_signed_works() {
        let (tx, sig) = build_eip1559();
        assert_eq!(tx.encode(Some(&sig)), RLP_EIP1559_SIGNED);
    }

    #[test]
    fn rlp_encode_unsigned_works() {
        let tx = build_eip1559().0;
        assert_eq!(tx.encode(None), RLP_EIP1559_UNSIGNED);
    }

    #[test]
    fn rlp_decode_signed_works() {
        let (expected_tx, expected_sig) = build_eip1559();
        let (actual_tx, actual_sig) = Eip1559Transaction::decode(RLP_EIP1559_SIGNED).unwrap();
        assert_eq!(expected_tx, actual_tx);
        assert_eq!(Some(expected_sig), actual_sig);
    }

    #[test]
    fn rlp_decode_unsigned_works() {
        let expected = build_eip1559().0;
        let (actual, signature) = Eip1559Transaction::decode(RLP_EIP1559_UNSIGNED).unwrap();
        assert_eq!(expected, actual);
        assert_eq!(signature, None);
    }

    #[test]
    fn compute_eip1559_sighash() {
        let tx = build_eip1559().0;
        let expected =
            H256(hex!("2fedc63a84e92359545438f62f816b374e316b3e15f3b2fd5705a7fc430c002e"));
        assert_eq!(expected, tx.signing_hash());
    }

    #[test]
    fn compute_eip1559_tx_hash() {
        let (tx, sig) = build_eip1559();
        let expected =
            H256(hex!("20a0f172aaeefc91c346fa0d43a9e56a1058a2a0c0c6fa8a2e9204f8047d1008"));
        assert_eq!(expected, tx.compute_tx_hash(&sig));
    }

    #[test]
    fn rlp_decode_rejects_bad_shapes() {
        // an EIP-2930 payload under the EIP-1559 prefix has the wrong item count
        let encoded = hex!("02c8010203040580c080");
        assert!(matches!(Eip1559Transaction::decode(&encoded), Err(Error::Structure(_))));
        // legacy list without a prefix
        let encoded = hex!("c6010203048080");
        assert!(matches!(Eip1559Transaction::decode(&encoded), Err(Error::Structure(_))));
        // access list slot holds a byte string
        let encoded = hex!("02c9010203040580808080");
        assert!(matches!(Eip1559Transaction::decode(&encoded), Err(Error::Structure(_))));
        // trailing bytes after the list
        let mut encoded = RLP_EIP1559_UNSIGNED.to_vec();
        encoded.extend_from_slice(&[0x80]);
        assert!(matches!(Eip1559Transaction::decode(&encoded), Err(Error::Structure(_))));
    }
}
