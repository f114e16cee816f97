// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! FORS few-time signatures over the message digest.

use super::{
    address::{Address, AddressType},
    hash::Context,
    wots::base_2b,
    xmss::climb,
};
use zeroize::Zeroizing;

fn secret(ctx: &Context, sk_seed: &[u8], adrs: &Address, index: u32) -> Zeroizing<Vec<u8>> {
    let mut sk_adrs = *adrs;
    sk_adrs.set_type_and_clear(AddressType::ForsPrf);
    sk_adrs.set_keypair(adrs.keypair());
    sk_adrs.set_tree_index(index);
    ctx.prf(sk_seed, &sk_adrs)
}

pub(crate) fn node(
    ctx: &Context,
    sk_seed: &[u8],
    index: u32,
    height: u32,
    adrs: &mut Address,
) -> Vec<u8> {
    if height == 0 {
        let sk = secret(ctx, sk_seed, adrs, index);
        adrs.set_tree_height(0);
        adrs.set_tree_index(index);
        return ctx.tweak(adrs, &sk);
    }
    let left = node(ctx, sk_seed, 2 * index, height - 1, adrs);
    let right = node(ctx, sk_seed, 2 * index + 1, height - 1, adrs);
    adrs.set_tree_height(height);
    adrs.set_tree_index(index);
    ctx.tweak_pair(adrs, &left, &right)
}

/// For each tree, the revealed secret leaf and its authentication path.
pub(crate) fn sign(ctx: &Context, digest: &[u8], sk_seed: &[u8], adrs: &mut Address) -> Vec<u8> {
    let params = ctx.params();
    let height = params.fors_height();
    let mut signature = Vec::with_capacity(params.fors_bytes());
    for (tree, leaf) in base_2b(digest, height, params.fors_trees())
        .into_iter()
        .enumerate()
    {
        let offset = (tree as u32) << height;
        signature.extend_from_slice(&secret(ctx, sk_seed, adrs, offset + leaf));
        for j in 0..height {
            let sibling = (leaf >> j) ^ 1;
            let index = ((tree as u32) << (height - j)) + sibling;
            signature.extend(node(ctx, sk_seed, index, j as u32, adrs));
        }
    }
    signature
}

/// Compress the roots implied by a FORS signature into a FORS public key.
pub(crate) fn pk_from_sig(
    ctx: &Context,
    signature: &[u8],
    digest: &[u8],
    adrs: &mut Address,
) -> Vec<u8> {
    let params = ctx.params();
    let n = params.n();
    let height = params.fors_height();
    let mut roots = Vec::with_capacity(params.fors_trees() * n);
    for (tree, (leaf, tree_signature)) in base_2b(digest, height, params.fors_trees())
        .into_iter()
        .zip(signature.chunks((height + 1) * n))
        .enumerate()
    {
        let (sk, auth) = tree_signature.split_at(n);
        let index = ((tree as u32) << height) + leaf;
        adrs.set_tree_height(0);
        adrs.set_tree_index(index);
        let bottom = ctx.tweak(adrs, sk);
        roots.extend(climb(ctx, bottom, leaf, auth, adrs));
    }

    let mut roots_adrs = *adrs;
    roots_adrs.set_type_and_clear(AddressType::ForsRoots);
    roots_adrs.set_keypair(adrs.keypair());
    ctx.tweak(&roots_adrs, &roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::Parameters;

    #[test]
    fn signature_recovers_roots_of_every_tree() {
        let params = Parameters::custom(16, 6, 2, 4, 8).unwrap();
        let pk_seed = [7u8; 16];
        let sk_seed = [8u8; 16];
        let ctx = Context::new(&params, &pk_seed);
        let mut adrs = Address::default();
        adrs.set_tree(2);
        adrs.set_type_and_clear(AddressType::ForsTree);
        adrs.set_keypair(5);

        let mut roots = Vec::new();
        for tree in 0..params.fors_trees() as u32 {
            roots.extend(node(&ctx, &sk_seed, tree, params.fors_height() as u32, &mut { adrs }));
        }
        let mut roots_adrs = adrs;
        roots_adrs.set_type_and_clear(AddressType::ForsRoots);
        roots_adrs.set_keypair(5);
        let expected = ctx.tweak(&roots_adrs, &roots);

        let digest = [0x3cu8, 0x91, 0x07, 0xfe];
        let signature = sign(&ctx, &digest, &sk_seed, &mut { adrs });
        assert_eq!(signature.len(), params.fors_bytes());
        assert_eq!(pk_from_sig(&ctx, &signature, &digest, &mut { adrs }), expected);

        let other = [0x3du8, 0x91, 0x07, 0xfe];
        assert_ne!(pk_from_sig(&ctx, &signature, &other, &mut { adrs }), expected);
    }
}
