// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Lagrange interpolation at zero for `t`-of-`n` Shamir shares.
//!
//! To sign, exactly `t` parties submit their labeled shares `(x_i, y_i)`.
//! The seed is recovered as
//!
//! ```text
//! f(0) = Σ L_i(0) · y_i (mod p),   L_i(0) = Π_{j≠i} (−x_j) / (x_i − x_j)
//! ```

mod share;

pub use share::LabeledShare;

use crate::{
    errors::{CallerError, InternalError, Result},
    field::Prime,
    seed::Seed,
    utils::bn_from_u32,
};
use libpaillier::unknown_order::BigNumber;
use std::collections::HashSet;
use tracing::{error, info, instrument};
use zeroize::Zeroize;

/// Compute the Lagrange coefficient of `index` evaluated at zero, with
/// `indices` the evaluation points of every share taking part.
///
/// `index` itself is skipped when it appears in `indices`.
pub fn lagrange_coefficient_at_zero(index: u32, indices: &[u32], prime: &Prime) -> Result<BigNumber> {
    let p = prime.modulus();
    let my_point = bn_from_u32(index).nmod(p);
    let mut numerator = BigNumber::one();
    let mut denominator = BigNumber::one();
    for point in indices.iter().filter(|&&j| j != index) {
        let point = bn_from_u32(*point).nmod(p);
        numerator = (&numerator * &(p - &point)).nmod(p);
        denominator = (&denominator * &(&my_point - &point).nmod(p)).nmod(p);
    }

    let inv = denominator.invert(p).ok_or_else(|| {
        error!(
            "Lagrange denominator for share index {} is not invertible",
            index
        );
        InternalError::NonInvertible { index }
    })?;
    Ok((&numerator * &inv).nmod(p))
}

/// Recover the seed from exactly `threshold` labeled shares.
///
/// Shares are `(index, decimal value)` pairs with distinct non-zero indices.
#[instrument(skip_all, err(Debug))]
pub fn reconstruct_at_zero(
    shares: &[(u32, impl AsRef<str>)],
    threshold: usize,
    prime: &Prime,
) -> Result<Seed> {
    if shares.is_empty() || shares.len() < threshold {
        error!(
            "Got {} shares for a threshold of {}",
            shares.len(),
            threshold
        );
        Err(CallerError::InsufficientShares {
            required: threshold.max(1),
            provided: shares.len(),
        })?
    }
    if shares.len() > threshold {
        error!(
            "Got {} shares for a threshold of {}",
            shares.len(),
            threshold
        );
        Err(CallerError::ShareCountMismatch {
            expected: threshold,
            provided: shares.len(),
        })?
    }

    let shares = shares
        .iter()
        .enumerate()
        .map(|(position, (index, value))| {
            LabeledShare::parse(*index, value.as_ref(), position, prime)
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(position) = shares.iter().position(|share| share.index() == 0) {
        error!("Share at position {} has index zero", position);
        Err(CallerError::MalformedShare {
            position,
            reason: "index zero is the secret itself",
        })?
    }
    let mut seen = HashSet::with_capacity(shares.len());
    if let Some(share) = shares.iter().find(|share| !seen.insert(share.index())) {
        error!("Share index {} appears more than once", share.index());
        Err(CallerError::DuplicateIndex {
            index: share.index(),
        })?
    }

    let p = prime.modulus();
    let indices: Vec<u32> = shares.iter().map(LabeledShare::index).collect();
    let mut secret = BigNumber::zero();
    for share in &shares {
        let mut coefficient = lagrange_coefficient_at_zero(share.index(), &indices, prime)?;
        let mut term = (&coefficient * share.as_ref()).nmod(p);
        let next = (&secret + &term).nmod(p);
        coefficient.zeroize();
        term.zeroize();
        secret.zeroize();
        secret = next;
    }

    info!(
        "Reconstructed seed from {} labeled shares at indices {:?}",
        shares.len(),
        indices
    );
    Ok(Seed::from_field_element(secret))
}
