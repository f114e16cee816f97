// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Abstraction over the hash-based signature primitive.

use crate::{
    errors::{CallerError, Result},
    parameters::Parameters,
    utils::{minimal_bytes, parse_decimal, to_decimal},
};
use libpaillier::unknown_order::BigNumber;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A stateless hash-based signature scheme whose keypairs are derived
/// deterministically from a seed.
pub trait SignatureScheme {
    /// The parameters every length is computed from.
    fn parameters(&self) -> &Parameters;

    /// Derive the keypair belonging to `seed`.
    fn derive_keypair(&self, seed: &[u8]) -> Result<Keypair>;

    /// Produce the fixed-length signature of `message`.
    fn sign(&self, message: &[u8], secret_key: &SecretKey) -> Result<Vec<u8>>;

    /// Check a signature. Malformed and invalid signatures both yield `false`.
    fn verify(&self, signature: &[u8], message: &[u8], public_key: &PublicKey) -> bool;
}

/// The public half of a keypair.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(Vec<u8>);

impl Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PublicKey")
            .field(&hex::encode(&self.0))
            .finish()
    }
}

impl PublicKey {
    /// Wrap public key bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Interpret the key as a big-endian integer and print it in decimal.
    pub fn to_decimal(&self) -> String {
        to_decimal(&BigNumber::from_slice(&self.0))
    }

    /// Parse a decimal public key, restoring the leading zero bytes a
    /// `len`-byte key loses when printed as an integer.
    pub fn from_decimal(s: &str, len: usize) -> Result<Self> {
        let value = parse_decimal(s).ok_or_else(|| {
            error!("Public key is not a decimal integer");
            CallerError::MalformedInput {
                reason: "public key is not a decimal integer",
            }
        })?;
        let bytes = minimal_bytes(&value);
        if bytes.len() > len {
            error!(
                "Decimal public key needs {} bytes, keys have {}",
                bytes.len(),
                len
            );
            Err(CallerError::MalformedInput {
                reason: "public key is too large",
            })?
        }
        let mut padded = vec![0u8; len - bytes.len()];
        padded.extend_from_slice(&bytes);
        Ok(Self(padded))
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The secret half of a keypair. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Vec<u8>);

impl Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([redacted])")
    }
}

impl SecretKey {
    /// Take ownership of secret key bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A keypair derived from a seed.
#[derive(Debug)]
pub struct Keypair {
    public: PublicKey,
    secret: SecretKey,
}

impl Keypair {
    /// Pair up the two halves.
    pub fn new(public: PublicKey, secret: SecretKey) -> Self {
        Self { public, secret }
    }

    /// The public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// The secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    /// Keep the public key and wipe the secret key.
    pub fn into_public_key(self) -> PublicKey {
        self.public
    }
}
