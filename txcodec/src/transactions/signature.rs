use crate::{converters::scalar_to_bytes_padded, Error, Result, Scalar, H256};
use core::fmt::Debug;
use num_traits::{ToPrimitive, Zero};
use txcodec_crypto::RecoverableSignature;

/// Signature fields of a signed transaction.
pub trait SignatureT: Clone + PartialEq + Eq + Debug {
    /// The ECDSA signature r
    fn r(&self) -> &Scalar;

    /// The ECDSA signature s
    fn s(&self) -> &Scalar;

    /// Parity of the y-coordinate, as stored by this signature's generation.
    ///
    /// # Errors
    /// Returns [`Error::UnrecoverableSignature`] if the stored field can't carry a parity bit.
    fn recovery_id(&self) -> Result<u8>;

    /// The `(r, s, recovery id)` triple consumed by public key recovery.
    ///
    /// # Errors
    /// Returns [`Error::UnrecoverableSignature`] if r or s is wider than 256 bits or the recovery
    /// id is invalid.
    fn to_recoverable(&self) -> Result<RecoverableSignature> {
        let word = |value: &Scalar| {
            scalar_to_bytes_padded(value, 32)
                .map(|bytes| H256::from_slice(&bytes))
                .map_err(|_| Error::UnrecoverableSignature)
        };
        Ok(RecoverableSignature {
            r: word(self.r())?,
            s: word(self.s())?,
            recovery_id: self.recovery_id()?,
        })
    }
}

/// `v, r, s` signature of legacy and EIP-155 transactions.
///
/// `v` is `27 + y parity` for legacy transactions and `35 + 2 * chain_id + y parity` for
/// [EIP-155] ones.
///
/// [EIP-155]: https://eips.ethereum.org/EIPS/eip-155
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct LegacySignature {
    pub v: Scalar,
    pub r: Scalar,
    pub s: Scalar,
}

impl SignatureT for LegacySignature {
    fn r(&self) -> &Scalar {
        &self.r
    }

    fn s(&self) -> &Scalar {
        &self.s
    }

    /// Both offsets (27 and 35 + 2 * chain_id) are odd, so an even `v` means odd y.
    fn recovery_id(&self) -> Result<u8> {
        if (&self.v % 2u32).is_zero() {
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

/// `y_parity, r, s` signature of typed (EIP-2930 and EIP-1559) transactions.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct YParitySignature {
    pub y_parity: Scalar,
    pub r: Scalar,
    pub s: Scalar,
}

impl SignatureT for YParitySignature {
    fn r(&self) -> &Scalar {
        &self.r
    }

    fn s(&self) -> &Scalar {
        &self.s
    }

    fn recovery_id(&self) -> Result<u8> {
        self.y_parity.to_u8().filter(|parity| *parity <= 1).ok_or(Error::UnrecoverableSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::{LegacySignature, SignatureT, YParitySignature};
    use crate::{Error, Scalar};
    use num_traits::One;

    fn legacy(v: u64) -> LegacySignature {
        LegacySignature { v: v.into(), r: Scalar::one(), s: Scalar::one() }
    }

    #[test]
    fn legacy_recovery_id() {
        assert_eq!(legacy(27).recovery_id().unwrap(), 0);
        assert_eq!(legacy(28).recovery_id().unwrap(), 1);
        // EIP-155, chain id 1
        assert_eq!(legacy(37).recovery_id().unwrap(), 0);
        assert_eq!(legacy(38).recovery_id().unwrap(), 1);
        // EIP-155, chain id 1337
        assert_eq!(legacy(0xa96).recovery_id().unwrap(), 1);
    }

    #[test]
    fn y_parity_recovery_id() {
        let signature = |y_parity: u8| YParitySignature {
            y_parity: y_parity.into(),
            r: Scalar::one(),
            s: Scalar::one(),
        };
        assert_eq!(signature(0).recovery_id().unwrap(), 0);
        assert_eq!(signature(1).recovery_id().unwrap(), 1);
        assert!(matches!(signature(2).recovery_id(), Err(Error::UnrecoverableSignature)));
        assert!(matches!(signature(27).recovery_id(), Err(Error::UnrecoverableSignature)));
    }

    #[test]
    fn to_recoverable_rejects_wide_components() {
        let mut signature = legacy(27);
        signature.r = Scalar::one() << 256u32;
        assert!(matches!(signature.to_recoverable(), Err(Error::UnrecoverableSignature)));

        let recoverable = legacy(28).to_recoverable().unwrap();
        assert_eq!(recoverable.recovery_id, 1);
        assert_eq!(recoverable.r.to_low_u64_be(), 1);
    }
}
