// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! SPHINCS+ with the SHAKE256 hash family.
//!
//! Keys are derived deterministically from a `3N`-byte seed split as
//! `SK.seed ‖ SK.prf ‖ PK.seed`, and signing uses `PK.seed` as the
//! randomizer input, so the same seed and message always produce the same
//! signature. That is what lets independently reconstructed seeds agree on
//! the group key.

mod address;
mod fors;
mod hash;
mod wots;
mod xmss;

use self::{
    address::{Address, AddressType},
    hash::Context,
};
use crate::{
    errors::{CallerError, InternalError, Result},
    parameters::Parameters,
    scheme::{Keypair, PublicKey, SecretKey, SignatureScheme},
    utils::ParseBytes,
};
use tracing::{error, instrument};
use zeroize::Zeroizing;

/// The SHAKE256 SPHINCS+ backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sphincs {
    params: Parameters,
}

impl Sphincs {
    pub fn new(params: Parameters) -> Self {
        Self { params }
    }
}

impl From<Parameters> for Sphincs {
    fn from(params: Parameters) -> Self {
        Self::new(params)
    }
}

fn be_integer(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}

fn low_bits(value: u64, bits: usize) -> u64 {
    if bits >= 64 {
        value
    } else {
        value & ((1u64 << bits) - 1)
    }
}

/// Split the message digest into the FORS message and the hypertree leaf it
/// is signed under.
fn split_digest<'a>(params: &Parameters, digest: &'a [u8]) -> Result<(&'a [u8], u64, u32)> {
    let mut parser = ParseBytes::new(digest);
    let message = parser.take_bytes(params.fors_message_bytes())?;
    let tree = be_integer(parser.take_bytes(params.tree_index_bytes())?);
    let leaf = be_integer(parser.take_bytes(params.leaf_index_bytes())?);
    Ok((
        message,
        low_bits(tree, params.tree_index_bits()),
        low_bits(leaf, params.tree_height()) as u32,
    ))
}

impl SignatureScheme for Sphincs {
    fn parameters(&self) -> &Parameters {
        &self.params
    }

    #[instrument(skip_all, err(Debug))]
    fn derive_keypair(&self, seed: &[u8]) -> Result<Keypair> {
        let n = self.params.n();
        let seed_bytes = self.params.seed_bytes();
        if seed.iter().all(|byte| *byte == 0) {
            error!("Refusing to derive a keypair from a zero seed");
            Err(InternalError::KeyDerivationFailed {
                reason: "seed is zero",
            })?
        }
        if seed.len() > seed_bytes {
            error!(
                "Seed has {} bytes, the parameter set takes at most {}",
                seed.len(),
                seed_bytes
            );
            Err(InternalError::KeyDerivationFailed {
                reason: "seed is longer than the parameter set allows",
            })?
        }

        // Shorter seeds are left-padded, matching their integer value.
        let mut material = Zeroizing::new(vec![0u8; seed_bytes]);
        material[seed_bytes - seed.len()..].copy_from_slice(seed);
        let (sk_seed, rest) = material.split_at(n);
        let (sk_prf, pk_seed) = rest.split_at(n);

        let ctx = Context::new(&self.params, pk_seed);
        let mut adrs = Address::default();
        adrs.set_layer(self.params.layers() as u32 - 1);
        let pk_root = xmss::node(
            &ctx,
            sk_seed,
            0,
            self.params.tree_height() as u32,
            &mut adrs,
        );

        let public = [pk_seed, pk_root.as_slice()].concat();
        let mut secret = Vec::with_capacity(self.params.secret_key_bytes());
        secret.extend_from_slice(sk_seed);
        secret.extend_from_slice(sk_prf);
        secret.extend_from_slice(&public);
        Ok(Keypair::new(
            PublicKey::from_bytes(public),
            SecretKey::from_bytes(secret),
        ))
    }

    fn sign(&self, message: &[u8], secret_key: &SecretKey) -> Result<Vec<u8>> {
        let n = self.params.n();
        let sk = secret_key.as_bytes();
        if sk.len() != self.params.secret_key_bytes() {
            error!(
                "Secret key has {} bytes, expected {}",
                sk.len(),
                self.params.secret_key_bytes()
            );
            Err(CallerError::MalformedInput {
                reason: "secret key has the wrong length",
            })?
        }
        let mut parser = ParseBytes::new(sk);
        let sk_seed = parser.take_bytes(n)?;
        let sk_prf = parser.take_bytes(n)?;
        let pk_seed = parser.take_bytes(n)?;
        let pk_root = parser.take_rest();

        let ctx = Context::new(&self.params, pk_seed);
        let randomizer = ctx.prf_msg(sk_prf, pk_seed, message);
        let digest = ctx.h_msg(&randomizer, pk_root, message);
        let (fors_message, tree, leaf) = split_digest(&self.params, &digest)?;

        let mut adrs = Address::default();
        adrs.set_tree(tree);
        adrs.set_type_and_clear(AddressType::ForsTree);
        adrs.set_keypair(leaf);
        let fors_signature = fors::sign(&ctx, fors_message, sk_seed, &mut adrs);
        let fors_pk = fors::pk_from_sig(&ctx, &fors_signature, fors_message, &mut adrs);
        let ht_signature = xmss::hypertree_sign(&ctx, &fors_pk, sk_seed, tree, leaf);

        let mut signature = randomizer;
        signature.extend(fors_signature);
        signature.extend(ht_signature);
        if signature.len() != self.params.signature_bytes() {
            error!(
                "Produced a {}-byte signature, expected {}",
                signature.len(),
                self.params.signature_bytes()
            );
            Err(InternalError::InternalInvariantFailed)?
        }
        Ok(signature)
    }

    fn verify(&self, signature: &[u8], message: &[u8], public_key: &PublicKey) -> bool {
        let n = self.params.n();
        let pk = public_key.as_bytes();
        if signature.len() != self.params.signature_bytes()
            || pk.len() != self.params.public_key_bytes()
        {
            return false;
        }
        let (pk_seed, pk_root) = pk.split_at(n);
        let (randomizer, rest) = signature.split_at(n);
        let (fors_signature, ht_signature) = rest.split_at(self.params.fors_bytes());

        let ctx = Context::new(&self.params, pk_seed);
        let digest = ctx.h_msg(randomizer, pk_root, message);
        let Ok((fors_message, tree, leaf)) = split_digest(&self.params, &digest) else {
            return false;
        };

        let mut adrs = Address::default();
        adrs.set_tree(tree);
        adrs.set_type_and_clear(AddressType::ForsTree);
        adrs.set_keypair(leaf);
        let fors_pk = fors::pk_from_sig(&ctx, fors_signature, fors_message, &mut adrs);
        xmss::hypertree_verify(&ctx, &fors_pk, ht_signature, tree, leaf, pk_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parameters::ParameterSet, utils::testing::init_testing};
    use rand::{Rng, RngCore};

    fn small() -> Sphincs {
        Sphincs::new(Parameters::custom(16, 6, 2, 4, 8).unwrap())
    }

    fn random_seed(rng: &mut impl RngCore, len: usize) -> Vec<u8> {
        let mut seed = vec![0u8; len];
        rng.fill_bytes(&mut seed);
        seed[0] |= 1;
        seed
    }

    #[test]
    fn sign_then_verify() -> Result<()> {
        let mut rng = init_testing();
        let scheme = small();
        let keypair = scheme.derive_keypair(&random_seed(&mut rng, 48))?;
        assert_eq!(keypair.public_key().as_bytes().len(), 32);

        let message = b"transfer 10 to alice";
        let signature = scheme.sign(message, keypair.secret_key())?;
        assert_eq!(signature.len(), scheme.parameters().signature_bytes());
        assert!(scheme.verify(&signature, message, keypair.public_key()));
        assert!(!scheme.verify(&signature, b"transfer 10 to mallory", keypair.public_key()));
        Ok(())
    }

    #[test]
    fn derivation_and_signing_are_deterministic() -> Result<()> {
        let mut rng = init_testing();
        let scheme = small();
        let seed = random_seed(&mut rng, 48);
        let first = scheme.derive_keypair(&seed)?;
        let second = scheme.derive_keypair(&seed)?;
        assert_eq!(first.public_key(), second.public_key());

        let message = b"same message";
        assert_eq!(
            scheme.sign(message, first.secret_key())?,
            scheme.sign(message, second.secret_key())?
        );

        let other = scheme.derive_keypair(&random_seed(&mut rng, 48))?;
        assert_ne!(first.public_key(), other.public_key());
        Ok(())
    }

    #[test]
    fn short_seeds_are_left_padded() -> Result<()> {
        let scheme = small();
        let mut padded = vec![0u8; 48];
        padded[46] = 0x12;
        padded[47] = 0x34;
        assert_eq!(
            scheme.derive_keypair(&[0x12, 0x34])?.public_key(),
            scheme.derive_keypair(&padded)?.public_key()
        );
        Ok(())
    }

    #[test]
    fn unusable_seeds_are_rejected() {
        let scheme = small();
        for seed in [vec![], vec![0u8; 10], vec![1u8; 49]] {
            let err = scheme.derive_keypair(&seed).unwrap_err();
            assert!(matches!(err, InternalError::KeyDerivationFailed { .. }));
        }
    }

    #[test]
    fn tampered_signatures_fail() -> Result<()> {
        let mut rng = init_testing();
        let scheme = small();
        let keypair = scheme.derive_keypair(&random_seed(&mut rng, 48))?;
        let message = b"message";
        let signature = scheme.sign(message, keypair.secret_key())?;

        for _ in 0..16 {
            let mut tampered = signature.clone();
            let position = rng.gen_range(0..tampered.len());
            tampered[position] ^= 1 << rng.gen_range(0..8);
            assert!(!scheme.verify(&tampered, message, keypair.public_key()));
        }

        assert!(!scheme.verify(&signature[1..], message, keypair.public_key()));
        let mut longer = signature.clone();
        longer.push(0);
        assert!(!scheme.verify(&longer, message, keypair.public_key()));

        let truncated_pk = PublicKey::from_bytes(&keypair.public_key().as_bytes()[1..]);
        assert!(!scheme.verify(&signature, message, &truncated_pk));
        Ok(())
    }

    #[test]
    fn wrong_secret_key_length_is_rejected() {
        let scheme = small();
        let result = scheme.sign(b"m", &SecretKey::from_bytes(vec![1u8; 63]));
        assert!(matches!(
            result,
            Err(InternalError::CallingApplicationMistake(
                CallerError::MalformedInput { .. }
            ))
        ));
    }

    #[test]
    fn shake_128f_round_trip() -> Result<()> {
        let mut rng = init_testing();
        let scheme = Sphincs::new(ParameterSet::Shake128f.parameters());
        let keypair = scheme.derive_keypair(&random_seed(&mut rng, 48))?;
        let signature = scheme.sign(b"wallet", keypair.secret_key())?;
        assert_eq!(signature.len(), 17088);
        assert!(scheme.verify(&signature, b"wallet", keypair.public_key()));
        Ok(())
    }
}
