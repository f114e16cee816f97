// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::utils::minimal_bytes;
use libpaillier::unknown_order::BigNumber;
use std::fmt::Debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The secret recovered from a set of shares.
///
/// A seed is the minimal big-endian encoding of the reconstructed field
/// element. It is produced by
/// [`reconstruct_additive`](crate::keygen::reconstruct_additive) or
/// [`reconstruct_at_zero`](crate::threshold::reconstruct_at_zero) and consumed by
/// the [`SignatureOrchestrator`](crate::SignatureOrchestrator); the bytes are
/// wiped when the value is dropped, whichever way the consuming call exits.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed(Vec<u8>);

impl Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed([redacted])")
    }
}

impl Seed {
    /// Encode a reduced field element, wiping the number afterwards.
    pub(crate) fn from_field_element(mut value: BigNumber) -> Self {
        let seed = Self(minimal_bytes(&value));
        value.zeroize();
        seed
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the encoding in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the reconstructed value is zero.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
