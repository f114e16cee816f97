// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! The prime field shares live in.

use crate::{
    errors::{CallerError, InternalError, Result},
    parameters::Parameters,
    utils::{parse_decimal, to_decimal},
};
use libpaillier::unknown_order::BigNumber;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::error;

/// The modulus of the share field.
///
/// The prime is public. It is produced once by
/// [`FieldPrimeGenerator`](crate::FieldPrimeGenerator) and distributed to all
/// parties out of band; every share and reconstructed secret is interpreted
/// modulo the same value.
///
/// A serialized prime is its decimal string; deserialization applies the
/// same checks as [`Prime::from_decimal`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prime(BigNumber);

impl Prime {
    /// Wrap a number already known to be a usable modulus.
    pub(crate) fn new_unchecked(p: BigNumber) -> Self {
        Self(p)
    }

    /// Parse a prime from its decimal representation.
    ///
    /// Only cheap structural checks are applied (odd, at least 3); use
    /// [`Prime::check_parameters`] and [`Prime::is_safe_prime`] to validate a
    /// prime received from another party.
    pub fn from_decimal(s: &str) -> Result<Self> {
        let p = parse_decimal(s).ok_or_else(|| {
            error!("Prime is not a decimal integer");
            CallerError::MalformedPrime {
                reason: "not a decimal integer",
            }
        })?;
        if p < BigNumber::from_slice([3u8]) {
            error!("Prime must be at least 3");
            Err(CallerError::MalformedPrime {
                reason: "smaller than 3",
            })?
        }
        if p.to_bytes().last().map_or(true, |low| low & 1 == 0) {
            error!("Prime must be odd");
            Err(CallerError::MalformedPrime { reason: "even" })?
        }
        Ok(Self(p))
    }

    /// Decimal representation of the prime.
    pub fn to_decimal(&self) -> String {
        to_decimal(&self.0)
    }

    /// Number of significant bits.
    pub fn bit_length(&self) -> usize {
        self.0.bit_length()
    }

    /// Probabilistic check that both `p` and `(p - 1) / 2` are prime.
    pub fn is_safe_prime(&self) -> bool {
        self.0.is_prime() && (self.0.clone() >> 1).is_prime()
    }

    /// Check that the prime has the size the parameter set calls for.
    pub fn check_parameters(&self, params: &Parameters) -> Result<()> {
        if self.bit_length() != params.prime_bits() {
            error!(
                "Prime has {} bits, the parameter set requires {}",
                self.bit_length(),
                params.prime_bits()
            );
            Err(CallerError::MalformedPrime {
                reason: "bit length does not match the parameter set",
            })?
        }
        Ok(())
    }

    /// The prime as a number.
    pub(crate) fn modulus(&self) -> &BigNumber {
        &self.0
    }
}

impl AsRef<BigNumber> for Prime {
    fn as_ref(&self) -> &BigNumber {
        &self.0
    }
}

impl fmt::Display for Prime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

impl TryFrom<String> for Prime {
    type Error = InternalError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_decimal(&s)
    }
}

impl From<Prime> for String {
    fn from(prime: Prime) -> Self {
        prime.to_decimal()
    }
}

impl FromStr for Prime {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_decimal(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterSet;

    #[test]
    fn parse_toy_prime() -> Result<()> {
        let p: Prime = "7919".parse()?;
        assert_eq!(p.to_decimal(), "7919");
        assert_eq!(p.bit_length(), 13);
        assert!(p.0.is_prime());
        // 3959 = 37 * 107.
        assert!(!p.is_safe_prime());
        Ok(())
    }

    #[test]
    fn detect_safe_primes() -> Result<()> {
        assert!(Prime::from_decimal("23")?.is_safe_prime());
        assert!(Prime::from_decimal("2039")?.is_safe_prime());
        assert!(!Prime::from_decimal("9973")?.is_safe_prime());
        assert!(!Prime::from_decimal("21")?.is_safe_prime());
        Ok(())
    }

    #[test]
    fn reject_malformed_primes() {
        for bad in ["", "abc", "-7", "1", "2", "10"] {
            let err = Prime::from_decimal(bad).unwrap_err();
            assert!(
                matches!(
                    err,
                    InternalError::CallingApplicationMistake(CallerError::MalformedPrime { .. })
                ),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn deserialization_validates_the_prime() -> Result<()> {
        let p = Prime::from_decimal("2039")?;
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"2039\"");
        assert_eq!(serde_json::from_str::<Prime>(&json).unwrap(), p);

        for bad in ["\"0\"", "\"2040\"", "\"-7\"", "\"0x7f\"", "7919"] {
            assert!(serde_json::from_str::<Prime>(bad).is_err(), "{bad}");
        }
        Ok(())
    }

    #[test]
    fn toy_prime_does_not_fit_real_parameters() -> Result<()> {
        let p = Prime::from_decimal("7919")?;
        assert!(p.check_parameters(&ParameterSet::Shake128s.parameters()).is_err());
        Ok(())
    }
}
