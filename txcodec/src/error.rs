pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed hex text or address pattern.
    #[error("invalid format: {0}")]
    Format(String),

    /// A scalar is negative or too large for the requested width.
    #[error("value out of range: {0}")]
    Range(String),

    #[error("expected an encoded transaction but got an empty byte array")]
    EmptyInput,

    /// Item count, or the byte-string/list shape of an item, does not match the generation.
    #[error("invalid transaction structure: {0}")]
    Structure(String),

    #[error("no public key can be recovered from the signature")]
    UnrecoverableSignature,

    #[error("transaction is not signed")]
    Unsigned,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid rlp: {0}")]
    Rlp(rlp::DecoderError),

    #[error("signer failed: {0}")]
    Signing(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<rlp::DecoderError> for Error {
    fn from(error: rlp::DecoderError) -> Self {
        Self::Rlp(error)
    }
}
