// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::{
    errors::{CallerError, InternalError, Result},
    scheme::{Keypair, PublicKey, SignatureScheme},
    seed::Seed,
    spx::Sphincs,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

/// Output of a threshold signing run.
///
/// The signed message is the fixed-length signature prefix followed by the
/// message itself, the layout [`VerificationGateway`](super::VerificationGateway)
/// expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdSignature {
    signed_message: Vec<u8>,
    public_key: PublicKey,
}

impl ThresholdSignature {
    /// `signature prefix ‖ message`.
    pub fn signed_message(&self) -> &[u8] {
        &self.signed_message
    }

    /// The key the signature verifies under.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn into_parts(self) -> (Vec<u8>, PublicKey) {
        (self.signed_message, self.public_key)
    }
}

/// Drives the signature primitive with a reconstructed seed.
///
/// Both operations take the [`Seed`] by value; it is wiped when the call
/// returns, on success and on every error path.
#[derive(Clone, Debug, Default)]
pub struct SignatureOrchestrator<S: SignatureScheme = Sphincs> {
    scheme: S,
}

impl<S: SignatureScheme> SignatureOrchestrator<S> {
    pub fn new(scheme: S) -> Self {
        Self { scheme }
    }

    /// The underlying signature scheme.
    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    fn derive(&self, seed: Seed) -> Result<Keypair> {
        let keypair = self
            .scheme
            .derive_keypair(seed.as_bytes())
            .map_err(|err| match err {
                InternalError::KeyDerivationFailed { .. } => err,
                other => {
                    error!("Signature scheme failed to derive a keypair: {other}");
                    InternalError::KeyDerivationFailed {
                        reason: "signature scheme could not derive a keypair",
                    }
                }
            });
        drop(seed);
        keypair
    }

    /// Derive the group public key from a seed recovered during key
    /// generation.
    #[instrument(skip_all, err(Debug))]
    pub fn generate_group_key(&self, seed: Seed) -> Result<PublicKey> {
        let public_key = self.derive(seed)?.into_public_key();
        info!(
            "Derived group public key {}",
            hex::encode(public_key.as_bytes())
        );
        Ok(public_key)
    }

    /// Sign `message` with the keypair derived from a seed recovered from
    /// threshold shares.
    ///
    /// When `expected` is given, the derived public key must equal it; a
    /// mismatch means the shares or prime were wrong and no signature is
    /// produced.
    #[instrument(skip_all, err(Debug))]
    pub fn threshold_sign(
        &self,
        seed: Seed,
        message: &[u8],
        expected: Option<&PublicKey>,
    ) -> Result<ThresholdSignature> {
        let keypair = self.derive(seed)?;
        if let Some(expected) = expected {
            if keypair.public_key() != expected {
                error!(
                    "Derived public key {} does not match the wallet key {}",
                    hex::encode(keypair.public_key().as_bytes()),
                    hex::encode(expected.as_bytes())
                );
                Err(CallerError::PublicKeyMismatch)?
            }
        }

        let mut signed_message = self.scheme.sign(message, keypair.secret_key())?;
        signed_message.extend_from_slice(message);
        info!(
            "Produced a threshold signature over a {}-byte message",
            message.len()
        );
        Ok(ThresholdSignature {
            signed_message,
            public_key: keypair.into_public_key(),
        })
    }
}
