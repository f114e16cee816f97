// Copyright (c) Facebook, Inc. and its affiliates.
// Modifications Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::errors::{CallerError, InternalError, Result};
use libpaillier::unknown_order::BigNumber;
use tracing::error;
use zeroize::Zeroize;

pub(crate) const CRYPTOGRAPHIC_RETRY_MAX: usize = 500usize;

/// Helper type for splitting a byte array into consecutive slices.
pub(crate) struct ParseBytes<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ParseBytes<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> ParseBytes<'a> {
        ParseBytes { bytes, offset: 0 }
    }

    /// Take next `n` bytes from array.
    pub(crate) fn take_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let slice = self
            .bytes
            .get(self.offset..self.offset + n)
            .ok_or(CallerError::MalformedInput {
                reason: "input is too short",
            })?;
        self.offset += n;
        Ok(slice)
    }

    /// Take the rest of the bytes from the array.
    pub(crate) fn take_rest(&mut self) -> &'a [u8] {
        let rest = self.bytes.get(self.offset..).unwrap_or_default();
        self.offset = self.bytes.len();
        rest
    }
}

/// Convert a small unsigned integer into a [`BigNumber`].
pub(crate) fn bn_from_u32(x: u32) -> BigNumber {
    BigNumber::from_slice(x.to_be_bytes())
}

/// Minimal big-endian encoding of a non-negative number; zero encodes as
/// the empty string.
pub(crate) fn minimal_bytes(x: &BigNumber) -> Vec<u8> {
    let mut bytes = x.to_bytes();
    let leading = bytes.iter().take_while(|b| **b == 0).count();
    if leading > 0 {
        bytes[..leading].zeroize();
        bytes.drain(..leading);
    }
    bytes
}

/// Parse an unsigned decimal integer.
///
/// Only ASCII digits are accepted; signs, whitespace and empty strings are
/// rejected. The caller is responsible for zeroizing the result if it is
/// secret.
pub(crate) fn parse_decimal(s: &str) -> Option<BigNumber> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let ten = bn_from_u32(10);
    let mut acc = BigNumber::zero();
    for digit in s.bytes() {
        let next = &acc * &ten + bn_from_u32(u32::from(digit - b'0'));
        acc.zeroize();
        acc = next;
    }
    Some(acc)
}

/// Decimal representation of a non-negative number.
pub(crate) fn to_decimal(x: &BigNumber) -> String {
    x.to_string()
}

/// Parse a decimal field element in `[0, prime)`.
///
/// `position` names the input in the error returned on failure.
pub(crate) fn parse_field_element(
    s: &str,
    position: usize,
    prime: &BigNumber,
) -> Result<BigNumber> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        error!("Share at position {} is not a decimal integer", position);
        Err(CallerError::MalformedShare {
            position,
            reason: "not a decimal integer",
        })?
    }
    let digits = match s.trim_start_matches('0') {
        "" => "0",
        digits => digits,
    };
    if digits.len() > to_decimal(prime).len() {
        error!("Share at position {} is longer than the prime", position);
        Err(CallerError::MalformedShare {
            position,
            reason: "not reduced modulo the prime",
        })?
    }
    let mut value = parse_decimal(digits).ok_or(InternalError::InternalInvariantFailed)?;
    if &value >= prime {
        value.zeroize();
        error!("Share at position {} is not reduced modulo the prime", position);
        Err(CallerError::MalformedShare {
            position,
            reason: "not reduced modulo the prime",
        })?
    }
    Ok(value)
}


////////////////////////////
// Test Utility Functions //
////////////////////////////
