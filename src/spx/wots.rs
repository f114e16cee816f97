// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! WOTS+ one-time signatures.

use super::{
    address::{Address, AddressType},
    hash::Context,
};
use crate::parameters::{LOG_W, W};
use zeroize::Zeroizing;

/// Split `input` into `out_len` big-endian integers of `b` bits each.
pub(crate) fn base_2b(input: &[u8], b: usize, out_len: usize) -> Vec<u32> {
    let mut bytes = input.iter();
    let mut total: u64 = 0;
    let mut bits = 0usize;
    let mut out = Vec::with_capacity(out_len);
    for _ in 0..out_len {
        while bits < b {
            total = (total << 8) | u64::from(*bytes.next().unwrap_or(&0));
            bits += 8;
        }
        bits -= b;
        out.push(((total >> bits) & ((1u64 << b) - 1)) as u32);
        total &= (1u64 << bits) - 1;
    }
    out
}

/// Message digits followed by checksum digits.
fn chain_lengths(ctx: &Context, message: &[u8]) -> Vec<u32> {
    let params = ctx.params();
    let len2 = params.wots_len2();
    let mut lengths = base_2b(message, LOG_W, params.wots_len1());

    let checksum: u32 = lengths.iter().map(|digit| (W as u32 - 1) - digit).sum();
    let checksum_bits = len2 * LOG_W;
    let shifted = checksum << ((8 - checksum_bits % 8) % 8);
    let checksum_bytes = shifted.to_be_bytes();
    let width = checksum_bits.div_ceil(8);
    lengths.extend(base_2b(&checksum_bytes[4 - width..], LOG_W, len2));
    lengths
}

fn chain(ctx: &Context, input: &[u8], start: u32, steps: u32, adrs: &mut Address) -> Vec<u8> {
    let mut value = Zeroizing::new(input.to_vec());
    for position in start..start + steps {
        adrs.set_hash(position);
        value = Zeroizing::new(ctx.tweak(adrs, &value));
    }
    std::mem::take(&mut *value)
}

fn secret_address(adrs: &Address) -> Address {
    let mut sk_adrs = *adrs;
    sk_adrs.set_type_and_clear(AddressType::WotsPrf);
    sk_adrs.set_keypair(adrs.keypair());
    sk_adrs
}

fn compress(ctx: &Context, chain_ends: &[u8], adrs: &Address) -> Vec<u8> {
    let mut pk_adrs = *adrs;
    pk_adrs.set_type_and_clear(AddressType::WotsPk);
    pk_adrs.set_keypair(adrs.keypair());
    ctx.tweak(&pk_adrs, chain_ends)
}

/// Compressed public key of the one-time key pair `adrs` points at.
pub(crate) fn pk_gen(ctx: &Context, sk_seed: &[u8], adrs: &mut Address) -> Vec<u8> {
    let len = ctx.params().wots_len();
    let mut sk_adrs = secret_address(adrs);
    let mut ends = Vec::with_capacity(len * ctx.n());
    for i in 0..len as u32 {
        sk_adrs.set_chain(i);
        let sk = ctx.prf(sk_seed, &sk_adrs);
        adrs.set_chain(i);
        ends.extend(chain(ctx, &sk, 0, W as u32 - 1, adrs));
    }
    compress(ctx, &ends, adrs)
}

/// Sign an `N`-byte message.
pub(crate) fn sign(ctx: &Context, message: &[u8], sk_seed: &[u8], adrs: &mut Address) -> Vec<u8> {
    let mut sk_adrs = secret_address(adrs);
    let mut signature = Vec::with_capacity(ctx.params().wots_bytes());
    for (i, steps) in chain_lengths(ctx, message).into_iter().enumerate() {
        sk_adrs.set_chain(i as u32);
        let sk = ctx.prf(sk_seed, &sk_adrs);
        adrs.set_chain(i as u32);
        signature.extend(chain(ctx, &sk, 0, steps, adrs));
    }
    signature
}

/// Recompute the compressed public key a signature commits to.
pub(crate) fn pk_from_sig(
    ctx: &Context,
    signature: &[u8],
    message: &[u8],
    adrs: &mut Address,
) -> Vec<u8> {
    let n = ctx.n();
    let mut ends = Vec::with_capacity(signature.len());
    for (i, (start, element)) in chain_lengths(ctx, message)
        .into_iter()
        .zip(signature.chunks(n))
        .enumerate()
    {
        adrs.set_chain(i as u32);
        ends.extend(chain(ctx, element, start, W as u32 - 1 - start, adrs));
    }
    compress(ctx, &ends, adrs)
}
