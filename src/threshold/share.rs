// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::{errors::Result, field::Prime, utils::parse_field_element};
use libpaillier::unknown_order::BigNumber;
use std::fmt::Debug;
use zeroize::ZeroizeOnDrop;

/// A point `(x_i, f(x_i))` on the sharing polynomial.
#[derive(Clone, ZeroizeOnDrop, PartialEq, Eq)]
pub struct LabeledShare {
    #[zeroize(skip)]
    index: u32,
    /// A BigNumber element in the range [0, p)
    y: BigNumber,
}

impl Debug for LabeledShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabeledShare")
            .field("index", &self.index)
            .field("y", &"[redacted]")
            .finish()
    }
}

impl LabeledShare {
    pub(crate) fn parse(index: u32, s: &str, position: usize, prime: &Prime) -> Result<Self> {
        Ok(Self {
            index,
            y: parse_field_element(s, position, prime.modulus())?,
        })
    }

    /// The evaluation point `x_i`.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl AsRef<BigNumber> for LabeledShare {
    fn as_ref(&self) -> &BigNumber {
        &self.y
    }
}
