use super::{signature::SignatureT, TransactionT};
use crate::{converters::bytes_to_scalar, Address, Error, Result, H256};
use core::fmt::Debug;
use txcodec_crypto::{Crypto, DefaultCrypto, PublicKey, Signer};

/// A transaction payload together with its generation's signature fields.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SignedTransaction<T: TransactionT> {
    tx_hash: H256,
    payload: T,
    signature: T::Signature,
}

impl<T> SignedTransaction<T>
where
    T: TransactionT,
{
    pub fn new(payload: T, signature: T::Signature) -> Self {
        let tx_hash = payload.compute_tx_hash(&signature);
        Self { tx_hash, payload, signature }
    }

    /// Sign `payload` with `signer`.
    ///
    /// The signature is computed over [`TransactionT::signing_hash`] and folded into the
    /// generation's signature fields.
    ///
    /// # Errors
    /// Returns [`Error::Signing`] if the signer fails.
    pub async fn sign<S>(payload: T, signer: &S) -> Result<Self>
    where
        S: Signer + ?Sized,
    {
        let sighash = payload.signing_hash();
        tracing::debug!(generation = %T::GENERATION, ?sighash, "signing transaction");
        let signature = signer
            .sign_prehash(sighash)
            .await
            .map_err(|error| Error::Signing(Box::new(error)))?;
        let signature = payload.signature_from_parts(
            signature.recovery_id,
            bytes_to_scalar(signature.r.as_bytes()),
            bytes_to_scalar(signature.s.as_bytes()),
        );
        let signed = Self::new(payload, signature);
        tracing::debug!(
            generation = %T::GENERATION,
            tx_hash = ?signed.tx_hash,
            "transaction signed"
        );
        Ok(signed)
    }

    /// Decode a signed encoding of this generation.
    ///
    /// # Errors
    /// Returns [`Error::Unsigned`] if `encoded` is a valid but unsigned encoding.
    pub fn decode(encoded: &[u8]) -> Result<Self> {
        let (payload, signature) = T::decode(encoded)?;
        let signature = signature.ok_or(Error::Unsigned)?;
        Ok(Self::new(payload, signature))
    }

    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        self.payload.encode(Some(&self.signature))
    }

    /// Keccak-256 of the signed encoding, the network transaction id.
    #[must_use]
    pub const fn tx_hash(&self) -> H256 {
        self.tx_hash
    }

    #[must_use]
    pub const fn payload(&self) -> &T {
        &self.payload
    }

    #[must_use]
    pub const fn signature(&self) -> &T::Signature {
        &self.signature
    }

    /// Recover the public key of the signer
    /// # Errors
    /// Returns [`Error::UnrecoverableSignature`] if the signature is invalid
    pub fn compute_public_key<C>(&self) -> Result<PublicKey>
    where
        C: Crypto,
        C::Error: Debug,
    {
        let signature = self.signature.to_recoverable()?;
        C::secp256k1_ecdsa_recover(&signature, self.payload.signing_hash()).map_err(|error| {
            tracing::debug!(?error, tx_hash = ?self.tx_hash, "public key recovery failed");
            Error::UnrecoverableSignature
        })
    }

    /// Recovery the signer address
    /// # Errors
    /// Returns [`Error::UnrecoverableSignature`] if the signature is invalid
    pub fn recover_signer(&self) -> Result<Address> {
        self.compute_public_key::<DefaultCrypto>().map(|public_key| public_key.address())
    }
}
