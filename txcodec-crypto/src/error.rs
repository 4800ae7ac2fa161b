/// Errors raised by the signing and recovery primitives.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("secp256k1 error: {0}")]
    Secp256k1(#[from] secp256k1::Error),

    #[error("public key recovery failed: {0:?}")]
    Recovery(libsecp256k1::Error),

    #[error("recovery id {0} is not a y-parity bit")]
    InvalidRecoveryId(i32),

    /// All signatures whose s-value is greater than secp256k1n/2 are rejected by the network.
    #[error("signature s-value is greater than half the curve order")]
    HighS,
}

impl From<libsecp256k1::Error> for Error {
    fn from(error: libsecp256k1::Error) -> Self {
        Self::Recovery(error)
    }
}
