// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Generation of the shared field prime.

use crate::{
    errors::{InternalError, Result},
    field::Prime,
    parameters::Parameters,
    utils::CRYPTOGRAPHIC_RETRY_MAX,
};
use libpaillier::unknown_order::BigNumber;
use tracing::{error, info, instrument, warn};

/// Produces safe primes sized for a parameter set.
///
/// Only the party bootstrapping a wallet runs this; everybody else receives
/// the prime out of band.
#[derive(Clone, Debug)]
pub struct FieldPrimeGenerator {
    bits: usize,
    retry_budget: usize,
}

impl FieldPrimeGenerator {
    /// A generator for primes of `3 × N × 8` bits.
    pub fn new(params: &Parameters) -> Self {
        Self {
            bits: params.prime_bits(),
            retry_budget: CRYPTOGRAPHIC_RETRY_MAX,
        }
    }

    /// Change how many candidates are drawn before giving up.
    ///
    /// Each draw from `BigNumber::safe_prime` already loops until it finds a
    /// safe prime; the budget bounds the candidates rejected here for their
    /// size or a failed primality recheck.
    pub fn with_retry_budget(mut self, retry_budget: usize) -> Self {
        self.retry_budget = retry_budget;
        self
    }

    /// Bit-length of the generated primes.
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Generate a safe prime.
    #[instrument(skip_all, err(Debug))]
    pub fn generate(&self) -> Result<Prime> {
        let prime = std::iter::repeat_with(|| BigNumber::safe_prime(self.bits))
            .take(self.retry_budget)
            .map(Prime::new_unchecked)
            .find(|candidate| self.accept(candidate))
            .ok_or_else(|| {
                error!(
                    "No {}-bit safe prime found in {} attempts",
                    self.bits, self.retry_budget
                );
                InternalError::PrimeGenerationFailed {
                    bits: self.bits,
                    attempts: self.retry_budget,
                }
            })?;
        info!("Generated a {}-bit safe prime", self.bits);
        Ok(prime)
    }

    fn accept(&self, candidate: &Prime) -> bool {
        let bits = candidate.bit_length();
        if bits != self.bits {
            warn!("Discarding prime candidate of {} bits", bits);
            return false;
        }
        if !candidate.is_safe_prime() {
            warn!("Discarding prime candidate that is not a safe prime");
            return false;
        }
        true
    }
}
