// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::{
    errors::Result,
    field::Prime,
    utils::{parse_field_element, to_decimal},
};
use libpaillier::unknown_order::BigNumber;
use rand::{CryptoRng, RngCore};
use std::fmt::Debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// One party's additive contribution to the wallet seed.
#[derive(Clone, ZeroizeOnDrop, PartialEq, Eq)]
pub struct BlindedShare {
    /// A BigNumber element in the range [0, p)
    x: BigNumber,
}

impl Debug for BlindedShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BlindedShare([redacted])")
    }
}

impl BlindedShare {
    /// Sample a contribution uniformly at random from `[0, p)`.
    pub fn random(prime: &Prime, rng: &mut (impl CryptoRng + RngCore)) -> Self {
        Self {
            x: BigNumber::from_rng(prime.modulus(), rng),
        }
    }

    /// The decimal form handed to the reconstructing party.
    pub fn to_decimal(&self) -> Zeroizing<String> {
        Zeroizing::new(to_decimal(&self.x))
    }

    /// Parse the decimal share found at `position` in the input.
    pub(crate) fn parse(s: &str, position: usize, prime: &Prime) -> Result<Self> {
        Ok(Self {
            x: parse_field_element(s, position, prime.modulus())?,
        })
    }

    /// Sum of all shares modulo the prime.
    pub(crate) fn sum(shares: &[Self], prime: &Prime) -> BigNumber {
        shares.iter().fold(BigNumber::zero(), |mut sum, share| {
            let next = sum.modadd(&share.x, prime.modulus());
            sum.zeroize();
            next
        })
    }
}

impl AsRef<BigNumber> for BlindedShare {
    fn as_ref(&self) -> &BigNumber {
        &self.x
    }
}
