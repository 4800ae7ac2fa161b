use crate::{Error, PublicKey, RecoverableSignature, Signer, H256};
use async_trait::async_trait;
use core::fmt;
use hex_literal::hex;

/// `secp256k1n / 2`, the largest s-value accepted since EIP-2.
const SECP256K1_HALF_ORDER: H256 =
    H256(hex!("7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a0"));

/// An in-memory secp256k1 key pair.
pub struct Keypair {
    keypair: secp256k1::Keypair,
}

impl Keypair {
    /// Create a new private key from a slice of bytes.
    ///
    /// # Errors
    /// Returns `Err` if the slice is not 32 bytes or is not a valid secp256k1 scalar.
    pub fn from_bytes<I: AsRef<[u8]>>(bytes: I) -> Result<Self, Error> {
        Self::from_slice(bytes.as_ref())
    }

    /// Create a new private key from a slice of bytes.
    ///
    /// # Errors
    /// Returns `Err` if the slice is not 32 bytes or is not a valid secp256k1 scalar.
    pub fn from_slice(slice: &[u8]) -> Result<Self, Error> {
        let secret = secp256k1::SecretKey::from_slice(slice)?;
        let keypair = secret.keypair(secp256k1::SECP256K1);
        Ok(Self { keypair })
    }

    /// Sign a pre-hashed message.
    ///
    /// The nonce is derived deterministically (RFC 6979), so the same key and digest always
    /// produce the same signature.
    ///
    /// # Errors
    /// Returns `Err` if the produced signature is not in the canonical low-s form or its
    /// recovery id carries the x-coordinate overflow bit.
    pub fn sign_digest(&self, prehash: H256) -> Result<RecoverableSignature, Error> {
        let msg = secp256k1::Message::from_digest(prehash.0);
        let sig =
            secp256k1::SECP256K1.sign_ecdsa_recoverable(&msg, &self.keypair.secret_key());

        // The recovery id is a byte that is either 0, 1, 2 or 3 where the first bit indicates
        // if the y is even or odd, and the second bit indicates if an overflow occured or not.
        // reference: https://github.com/bitcoin-core/secp256k1/blob/v0.4.1/src/ecdsa_impl.h#L280-L285
        let (recovery_id, compact) = sig.serialize_compact();
        let recovery_id = recovery_id.to_i32();
        let recovery_id = u8::try_from(recovery_id)
            .ok()
            .filter(|id| *id <= 1)
            .ok_or_else(|| {
                tracing::warn!(recovery_id, "signature recovery id carries the overflow bit");
                Error::InvalidRecoveryId(recovery_id)
            })?;

        let r = H256::from_slice(&compact[..32]);
        let s = H256::from_slice(&compact[32..]);
        // - https://github.com/ethereum/EIPs/blob/master/EIPS/eip-2.md
        if s > SECP256K1_HALF_ORDER {
            tracing::warn!("signature s-value is not normalized");
            return Err(Error::HighS);
        }
        Ok(RecoverableSignature { r, s, recovery_id })
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair").field("address", &Signer::address(self)).finish_non_exhaustive()
    }
}

#[async_trait]
impl Signer for Keypair {
    type Error = Error;

    async fn sign_prehash(&self, prehash: H256) -> Result<RecoverableSignature, Self::Error> {
        self.sign_digest(prehash)
    }

    fn public_key(&self) -> PublicKey {
        PublicKey::from_uncompressed(self.keypair.public_key().serialize_uncompressed())
    }
}

#[cfg(test)]
mod tests {
    use super::Keypair;
    use crate::{Address, Crypto, DefaultCrypto, RecoverableSignature, Signer};
    use hex_literal::hex;

    #[tokio::test]
    async fn sign_ecdsa_works() {
        let test_cases: [([u8; 32], Address, &[u8], RecoverableSignature); 2] = [
            (
                hex!("fad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19"),
                hex!("96216849c49358b10257cb55b28ea603c874b05e").into(),
                hex!("e9808501ec5b05eb8301f6d194645d7d9f679a3b8aa4e7eedad709db14f6d3f44182dead808205398080").as_ref(),
                RecoverableSignature {
                    r: hex!("e138cf75eb34e837cf7cec412a89f48792e49f5a9c8693df722c7705584d813f")
                        .into(),
                    s: hex!("2a1ff44833e17fd7439b2aff374c6fbe9fb1d4353c84188f6467891dfce409c5")
                        .into(),
                    recovery_id: 1,
                },
            ),
            (
                hex!("349593acb529f4bd0cda7ac620fab960130e248fd18e55a08df70d87263cf5af"),
                hex!("2729b52d0214282beb1f37eb147f3ec32ad1da91").into(),
                hex!("e5198256788212349496216849c49358b10257cb55b28ea603c874b05e84deadbeef80018080").as_ref(),
                RecoverableSignature {
                    r: hex!("70611b6d9c5437004c9b7448c982a5f9e88cf32f949141f57ebd188d763123c0")
                        .into(),
                    s: hex!("017d8c488413794b0b0f0b918f8947e13e4faab39e04ba6901b2db436d92ff41")
                        .into(),
                    recovery_id: 0,
                },
            ),
        ];

        for (secret_key, expected_addr, msg, expected_sig) in test_cases {
            let prehash = DefaultCrypto::keccak256(msg);
            let wallet = Keypair::from_bytes(secret_key).unwrap();
            assert_eq!(wallet.address(), expected_addr);

            let signature = wallet.sign_prehash(prehash).await.unwrap();
            assert_eq!(signature, expected_sig);
            assert_eq!(signature, wallet.sign_digest(prehash).unwrap());

            let public_key = DefaultCrypto::secp256k1_ecdsa_recover(&signature, prehash).unwrap();
            assert_eq!(public_key, wallet.public_key());
            assert_eq!(expected_addr, public_key.address());
        }
    }

    #[test]
    fn invalid_secret_key_is_rejected() {
        assert!(Keypair::from_bytes([0u8; 32]).is_err());
        assert!(Keypair::from_bytes([1u8; 31]).is_err());
        assert!(Keypair::from_bytes([0xffu8; 32]).is_err());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let secret = hex!("349593acb529f4bd0cda7ac620fab960130e248fd18e55a08df70d87263cf5af");
        let wallet = Keypair::from_bytes(secret).unwrap();
        let debug = format!("{wallet:?}");
        assert!(!debug.contains("349593ac"));
        assert!(debug.contains("Keypair"));
    }
}
