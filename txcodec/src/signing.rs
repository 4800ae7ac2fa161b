//! Hash-then-sign over the unsigned encoding, and signer recovery.
use crate::{Address, Result, Transaction, H256};
use txcodec_crypto::{PublicKey, Signer};

/// Sign `tx` with `signer`, returning it unchanged if it is already signed.
///
/// # Errors
/// Returns [`crate::Error::Signing`] if the signer fails.
pub async fn sign_transaction<S>(tx: Transaction, signer: &S) -> Result<Transaction>
where
    S: Signer + ?Sized,
{
    tx.sign(signer).await
}

/// Recover the address that signed `tx`.
///
/// # Errors
/// Returns [`crate::Error::Unsigned`] if `tx` carries no signature and
/// [`crate::Error::UnrecoverableSignature`] if no public key can be recovered from it.
pub fn get_signer(tx: &Transaction) -> Result<Address> {
    tx.recover_signer()
}

/// Keccak-256 of the unsigned encoding of `tx`, whether or not `tx` is signed.
#[must_use]
pub fn transaction_hash(tx: &Transaction) -> H256 {
    tx.signing_hash()
}

/// Low 160 bits of the Keccak-256 of the uncompressed public key, without its `0x04` tag.
#[must_use]
pub fn derive_address(public_key: &PublicKey) -> Address {
    public_key.address()
}

/// Address controlled by `signer`.
#[must_use]
pub fn address_for<S>(signer: &S) -> Address
where
    S: Signer + ?Sized,
{
    derive_address(&signer.public_key())
}
