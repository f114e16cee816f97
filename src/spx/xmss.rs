// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! XMSS trees and the hypertree built from them.

use super::{
    address::{Address, AddressType},
    hash::Context,
    wots,
};

/// Root of the subtree of height `height` whose leftmost leaf is
/// `index · 2^height`.
pub(crate) fn node(
    ctx: &Context,
    sk_seed: &[u8],
    index: u32,
    height: u32,
    adrs: &mut Address,
) -> Vec<u8> {
    if height == 0 {
        adrs.set_type_and_clear(AddressType::WotsHash);
        adrs.set_keypair(index);
        return wots::pk_gen(ctx, sk_seed, adrs);
    }
    let left = node(ctx, sk_seed, 2 * index, height - 1, adrs);
    let right = node(ctx, sk_seed, 2 * index + 1, height - 1, adrs);
    adrs.set_type_and_clear(AddressType::Tree);
    adrs.set_tree_height(height);
    adrs.set_tree_index(index);
    ctx.tweak_pair(adrs, &left, &right)
}

/// WOTS+ signature of `message` under leaf `leaf`, followed by its
/// authentication path.
pub(crate) fn sign(
    ctx: &Context,
    message: &[u8],
    sk_seed: &[u8],
    leaf: u32,
    adrs: &mut Address,
) -> Vec<u8> {
    let height = ctx.params().tree_height();
    let mut auth = Vec::with_capacity(height * ctx.n());
    for j in 0..height {
        let sibling = (leaf >> j) ^ 1;
        auth.extend(node(ctx, sk_seed, sibling, j as u32, adrs));
    }

    adrs.set_type_and_clear(AddressType::WotsHash);
    adrs.set_keypair(leaf);
    let mut signature = wots::sign(ctx, message, sk_seed, adrs);
    signature.extend(auth);
    signature
}

/// Root implied by a tree signature.
pub(crate) fn pk_from_sig(
    ctx: &Context,
    leaf: u32,
    signature: &[u8],
    message: &[u8],
    adrs: &mut Address,
) -> Vec<u8> {
    let (wots_signature, auth) = signature.split_at(ctx.params().wots_bytes());
    adrs.set_type_and_clear(AddressType::WotsHash);
    adrs.set_keypair(leaf);
    let leaf_pk = wots::pk_from_sig(ctx, wots_signature, message, adrs);

    adrs.set_type_and_clear(AddressType::Tree);
    adrs.set_tree_index(leaf);
    climb(ctx, leaf_pk, leaf, auth, adrs)
}

/// Hash a leaf up an authentication path. FORS trees use the same walk.
pub(crate) fn climb(
    ctx: &Context,
    mut current: Vec<u8>,
    leaf: u32,
    auth: &[u8],
    adrs: &mut Address,
) -> Vec<u8> {
    for (k, sibling) in auth.chunks(ctx.n()).enumerate() {
        adrs.set_tree_height(k as u32 + 1);
        if (leaf >> k) & 1 == 0 {
            adrs.set_tree_index(adrs.tree_index() / 2);
            current = ctx.tweak_pair(adrs, &current, sibling);
        } else {
            adrs.set_tree_index((adrs.tree_index() - 1) / 2);
            current = ctx.tweak_pair(adrs, sibling, &current);
        }
    }
    current
}

fn split_tree_index(tree: u64, height: usize) -> (u64, u32) {
    let leaf = (tree & ((1u64 << height) - 1)) as u32;
    (tree >> height, leaf)
}

/// Sign with every layer of the hypertree, bottom layer first.
pub(crate) fn hypertree_sign(
    ctx: &Context,
    message: &[u8],
    sk_seed: &[u8],
    tree: u64,
    leaf: u32,
) -> Vec<u8> {
    let params = ctx.params();
    let mut adrs = Address::default();
    adrs.set_tree(tree);
    let mut signature = sign(ctx, message, sk_seed, leaf, &mut adrs);
    let mut root = pk_from_sig(ctx, leaf, &signature, message, &mut adrs);

    let mut tree = tree;
    for layer in 1..params.layers() {
        let (parent, parent_leaf) = split_tree_index(tree, params.tree_height());
        tree = parent;
        adrs.set_layer(layer as u32);
        adrs.set_tree(tree);
        let layer_signature = sign(ctx, &root, sk_seed, parent_leaf, &mut adrs);
        if layer + 1 < params.layers() {
            root = pk_from_sig(ctx, parent_leaf, &layer_signature, &root, &mut adrs);
        }
        signature.extend(layer_signature);
    }
    signature
}

/// Check a hypertree signature against the top-level root.
pub(crate) fn hypertree_verify(
    ctx: &Context,
    message: &[u8],
    signature: &[u8],
    tree: u64,
    leaf: u32,
    pk_root: &[u8],
) -> bool {
    let params = ctx.params();
    let layer_bytes = params.wots_bytes() + params.tree_height() * params.n();
    if signature.len() != params.layers() * layer_bytes {
        return false;
    }

    let mut adrs = Address::default();
    let mut tree = tree;
    let mut leaf = leaf;
    let mut node = message.to_vec();
    for (layer, layer_signature) in signature.chunks(layer_bytes).enumerate() {
        if layer > 0 {
            (tree, leaf) = split_tree_index(tree, params.tree_height());
        }
        adrs.set_layer(layer as u32);
        adrs.set_tree(tree);
        node = pk_from_sig(ctx, leaf, layer_signature, &node, &mut adrs);
    }
    node == pk_root
}
