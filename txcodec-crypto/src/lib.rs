//! Hash and elliptic curve primitives used by `txcodec`.
//!
//! - Keccak-256 through [`Crypto::keccak256`].
//! - secp256k1 public key recovery through [`Crypto::secp256k1_ecdsa_recover`].
//! - Deterministic (RFC 6979), low-s signing through the asynchronous [`Signer`] trait,
//!   implemented in-process by [`Keypair`].
mod error;
mod keypair;

pub use error::Error;
pub use keypair::Keypair;
pub use primitive_types::{H160 as Address, H256};

use async_trait::async_trait;
use core::fmt;

/// A recoverable ECDSA signature over a 32-byte message digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecoverableSignature {
    pub r: H256,
    pub s: H256,
    /// Parity of the y coordinate of the signature's ephemeral point, `0` or `1`.
    pub recovery_id: u8,
}

impl RecoverableSignature {
    /// `r ‖ s`, the 64-byte compact form.
    #[must_use]
    pub fn to_compact(&self) -> [u8; 64] {
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(self.r.as_bytes());
        compact[32..].copy_from_slice(self.s.as_bytes());
        compact
    }
}

/// Uncompressed secp256k1 public key: `0x04 ‖ X ‖ Y`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 65]);

impl PublicKey {
    #[must_use]
    pub const fn from_uncompressed(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// The account address controlled by this key: the low 160 bits of the
    /// Keccak-256 hash of `X ‖ Y`.
    #[must_use]
    pub fn address(&self) -> Address {
        let hash = DefaultCrypto::keccak256(&self.0[1..]);
        Address::from_slice(&hash.as_bytes()[12..])
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&const_hex::encode_prefixed(self.0)).finish()
    }
}

/// cryptographic hash function and secp256k1 ECDSA public key recovery
pub trait Crypto {
    type Error;

    fn keccak256_to(data: impl AsRef<[u8]>, output: &mut [u8; 32]);

    fn keccak256(data: impl AsRef<[u8]>) -> H256 {
        let mut hash = [0u8; 32];
        Self::keccak256_to(data, &mut hash);
        hash.into()
    }

    /// Recover the public key that produced `signature` over `message_hash`.
    ///
    /// # Errors
    /// Returns `Err` if the recovery id is invalid or no curve point recovers from the signature.
    fn secp256k1_ecdsa_recover(
        signature: &RecoverableSignature,
        message_hash: H256,
    ) -> Result<PublicKey, Self::Error>;
}

/// Keccak-256 from `sha3`, recovery from `libsecp256k1`.
pub struct DefaultCrypto;

impl Crypto for DefaultCrypto {
    type Error = Error;

    fn keccak256_to(data: impl AsRef<[u8]>, output: &mut [u8; 32]) {
        use sha3::Digest;
        let mut hasher = sha3::Keccak256::new();
        hasher.update(data);
        hasher.finalize_into(output.into());
    }

    fn keccak256(data: impl AsRef<[u8]>) -> H256 {
        use sha3::Digest;
        let hash: [u8; 32] = sha3::Keccak256::digest(data).into();
        hash.into()
    }

    fn secp256k1_ecdsa_recover(
        signature: &RecoverableSignature,
        message_hash: H256,
    ) -> Result<PublicKey, Self::Error> {
        let rid = libsecp256k1::RecoveryId::parse(signature.recovery_id)?;
        let sig = libsecp256k1::Signature::parse_overflowing_slice(&signature.to_compact())?;
        let msg = libsecp256k1::Message::parse(message_hash.as_fixed_bytes());
        let pubkey = libsecp256k1::recover(&msg, &sig, &rid)?;
        Ok(PublicKey(pubkey.serialize()))
    }
}

/// Produces recoverable signatures over message digests.
///
/// Signing is asynchronous so hardware wallets and remote signers can be used in place of an
/// in-memory [`Keypair`].
#[async_trait]
pub trait Signer: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sign the given 32-byte message digest.
    ///
    /// # Errors
    /// Returns `Err` if the digest can't be signed.
    async fn sign_prehash(&self, prehash: H256) -> Result<RecoverableSignature, Self::Error>;

    /// The public key whose private counterpart produces this signer's signatures.
    fn public_key(&self) -> PublicKey;

    fn address(&self) -> Address {
        self.public_key().address()
    }
}
