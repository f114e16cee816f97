// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Reconstruction of the wallet seed during distributed key generation.
//!
//! Each of the `n` parties contributes a blinded share: a uniformly random
//! field element modulo the shared prime `p`. The wallet seed is the sum of
//! all contributions,
//!
//! ```text
//! seed = s_1 + s_2 + ... + s_n (mod p)
//! ```
//!
//! so no coalition of fewer than `n` parties learns anything about it. The
//! seed only exists for the duration of a single call; the
//! [`SignatureOrchestrator`](crate::SignatureOrchestrator) turns it into the
//! group public key and wipes it.

mod share;

pub use share::BlindedShare;

use crate::{
    errors::{CallerError, Result},
    field::Prime,
    seed::Seed,
};
use tracing::{error, info, instrument};

/// Recover the seed from every party's blinded share.
///
/// Shares are decimal strings in `[0, p)`; their order does not matter.
#[instrument(skip_all, err(Debug))]
pub fn reconstruct_additive(shares: &[impl AsRef<str>], prime: &Prime) -> Result<Seed> {
    if shares.is_empty() {
        error!("Additive reconstruction needs at least one share");
        Err(CallerError::InsufficientShares {
            required: 1,
            provided: 0,
        })?
    }

    let shares = shares
        .iter()
        .enumerate()
        .map(|(position, share)| BlindedShare::parse(share.as_ref(), position, prime))
        .collect::<Result<Vec<_>>>()?;

    let seed = Seed::from_field_element(BlindedShare::sum(&shares, prime));
    info!("Reconstructed seed from {} blinded shares", shares.len());
    Ok(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InternalError;
    use proptest::prelude::*;

    #[test]
    fn sums_shares_modulo_the_prime() -> Result<()> {
        let prime = Prime::from_decimal("9973")?;
        let seed = reconstruct_additive(&["100", "200", "300"], &prime)?;
        // 600 = 0x0258
        assert_eq!(seed.as_bytes(), &[0x02, 0x58]);
        Ok(())
    }

    #[test]
    fn a_single_share_is_the_seed() -> Result<()> {
        let prime = Prime::from_decimal("9973")?;
        let seed = reconstruct_additive(&[String::from("77")], &prime)?;
        assert_eq!(seed.as_bytes(), &[77]);
        Ok(())
    }

    #[test]
    fn shares_cancelling_out_give_an_empty_seed() -> Result<()> {
        let prime = Prime::from_decimal("9973")?;
        let seed = reconstruct_additive(&["9000", "973"], &prime)?;
        assert!(seed.is_empty());
        Ok(())
    }

    #[test]
    fn no_shares_is_insufficient() -> Result<()> {
        let prime = Prime::from_decimal("9973")?;
        let shares: [&str; 0] = [];
        assert_eq!(
            reconstruct_additive(&shares, &prime).unwrap_err(),
            InternalError::CallingApplicationMistake(CallerError::InsufficientShares {
                required: 1,
                provided: 0
            })
        );
        Ok(())
    }

    #[test]
    fn malformed_share_reports_its_position() -> Result<()> {
        let prime = Prime::from_decimal("9973")?;
        for (shares, position) in [
            (["1", "x2", "3"], 1),
            (["1", "2", "-3"], 2),
            (["9973", "2", "3"], 0),
            (["1", "", "3"], 1),
        ] {
            let err = reconstruct_additive(&shares, &prime).unwrap_err();
            assert!(
                matches!(
                    err,
                    InternalError::CallingApplicationMistake(CallerError::MalformedShare {
                        position: p,
                        ..
                    }) if p == position
                ),
                "{shares:?}: {err:?}"
            );
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn order_of_shares_does_not_matter(
            (shares, shuffled) in prop::collection::vec(0u32..9973, 1..12)
                .prop_flat_map(|shares| (Just(shares.clone()), Just(shares).prop_shuffle()))
        ) {
            let prime = Prime::from_decimal("9973").unwrap();
            let decimal = |values: &[u32]| values.iter().map(u32::to_string).collect::<Vec<_>>();
            let expected = shares.iter().map(|s| u64::from(*s)).sum::<u64>() % 9973;

            let first = reconstruct_additive(&decimal(&shares), &prime).unwrap();
            let second = reconstruct_additive(&decimal(&shuffled), &prime).unwrap();
            prop_assert_eq!(first.as_bytes(), second.as_bytes());

            let expected_bytes: Vec<u8> = expected
                .to_be_bytes()
                .into_iter()
                .skip_while(|b| *b == 0)
                .collect();
            prop_assert_eq!(first.as_bytes(), expected_bytes.as_slice());
        }
    }
}
