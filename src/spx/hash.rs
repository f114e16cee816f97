// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! SHAKE256 instantiation of the tweakable hash functions.

use super::address::Address;
use crate::parameters::Parameters;
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};
use zeroize::Zeroizing;

fn shake256(parts: &[&[u8]], out_len: usize) -> Vec<u8> {
    let mut hasher = Shake256::default();
    for part in parts {
        hasher.update(part);
    }
    let mut out = vec![0u8; out_len];
    hasher.finalize_xof().read(&mut out);
    out
}

/// Public context shared by every hash call under one key: the parameter
/// set and `PK.seed`.
pub(crate) struct Context<'a> {
    params: &'a Parameters,
    pk_seed: &'a [u8],
}

impl<'a> Context<'a> {
    pub(crate) fn new(params: &'a Parameters, pk_seed: &'a [u8]) -> Self {
        Self { params, pk_seed }
    }

    pub(crate) fn params(&self) -> &Parameters {
        self.params
    }

    pub(crate) fn n(&self) -> usize {
        self.params.n()
    }

    /// `F`, `H` and `T_l` coincide: `SHAKE256(PK.seed ‖ ADRS ‖ M)`.
    pub(crate) fn tweak(&self, adrs: &Address, input: &[u8]) -> Vec<u8> {
        shake256(&[self.pk_seed, adrs.as_bytes(), input], self.n())
    }

    /// `H(left ‖ right)` without building the concatenation.
    pub(crate) fn tweak_pair(&self, adrs: &Address, left: &[u8], right: &[u8]) -> Vec<u8> {
        shake256(&[self.pk_seed, adrs.as_bytes(), left, right], self.n())
    }

    /// Secret element generation: `SHAKE256(PK.seed ‖ ADRS ‖ SK.seed)`.
    pub(crate) fn prf(&self, sk_seed: &[u8], adrs: &Address) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(shake256(&[self.pk_seed, adrs.as_bytes(), sk_seed], self.n()))
    }

    /// Signature randomizer: `SHAKE256(SK.prf ‖ opt ‖ M)`.
    pub(crate) fn prf_msg(&self, sk_prf: &[u8], opt_rand: &[u8], message: &[u8]) -> Vec<u8> {
        shake256(&[sk_prf, opt_rand, message], self.n())
    }

    /// Message digest: `SHAKE256(R ‖ PK.seed ‖ PK.root ‖ M)`.
    pub(crate) fn h_msg(&self, randomizer: &[u8], pk_root: &[u8], message: &[u8]) -> Vec<u8> {
        shake256(
            &[randomizer, self.pk_seed, pk_root, message],
            self.params.digest_bytes(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterSet;

    #[test]
    fn outputs_have_parameter_lengths() {
        let params = ParameterSet::Shake192f.parameters();
        let pk_seed = [1u8; 24];
        let ctx = Context::new(&params, &pk_seed);
        let adrs = Address::default();

        assert_eq!(ctx.tweak(&adrs, b"x").len(), 24);
        assert_eq!(ctx.prf(&[2u8; 24], &adrs).len(), 24);
        assert_eq!(ctx.h_msg(&[0u8; 24], &[0u8; 24], b"m").len(), 42);
    }

    #[test]
    fn pair_hash_equals_hash_of_concatenation() {
        let params = ParameterSet::Shake128f.parameters();
        let pk_seed = [9u8; 16];
        let ctx = Context::new(&params, &pk_seed);
        let mut adrs = Address::default();
        adrs.set_layer(2);

        let left = [3u8; 16];
        let right = [4u8; 16];
        assert_eq!(
            ctx.tweak_pair(&adrs, &left, &right),
            ctx.tweak(&adrs, &[left, right].concat())
        );
    }

    #[test]
    fn address_separates_domains() {
        let params = ParameterSet::Shake128f.parameters();
        let pk_seed = [0u8; 16];
        let ctx = Context::new(&params, &pk_seed);
        let first = Address::default();
        let mut second = Address::default();
        second.set_hash(1);
        assert_ne!(ctx.tweak(&first, b"same"), ctx.tweak(&second, b"same"));
    }
}
