// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! String-level entry points for wallet services.
//!
//! Field elements, the prime and the group public key cross this boundary as
//! decimal strings; signed messages and signing-path public keys are raw
//! bytes.

use crate::{
    errors::{CallerError, Result},
    field::Prime,
    keygen::reconstruct_additive,
    parameters::Parameters,
    prime::FieldPrimeGenerator,
    scheme::{PublicKey, SignatureScheme},
    sign::{AuthorizationSet, SignatureOrchestrator, ThresholdSignature, VerificationGateway},
    spx::Sphincs,
    threshold::reconstruct_at_zero,
};
use tracing::{error, info, instrument, warn};

/// A multi-party wallet over one signature scheme.
#[derive(Clone, Debug)]
pub struct Wallet<S: SignatureScheme = Sphincs> {
    orchestrator: SignatureOrchestrator<S>,
    gateway: VerificationGateway<S>,
}

impl Wallet<Sphincs> {
    /// A wallet signing with SPHINCS+ under `params`.
    pub fn new(params: Parameters) -> Self {
        Self::with_scheme(Sphincs::new(params))
    }
}

impl Default for Wallet<Sphincs> {
    fn default() -> Self {
        Self::new(Parameters::default())
    }
}

impl<S: SignatureScheme + Clone> Wallet<S> {
    pub fn with_scheme(scheme: S) -> Self {
        Self {
            orchestrator: SignatureOrchestrator::new(scheme.clone()),
            gateway: VerificationGateway::new(scheme),
        }
    }

    pub fn parameters(&self) -> &Parameters {
        self.orchestrator.scheme().parameters()
    }

    pub fn orchestrator(&self) -> &SignatureOrchestrator<S> {
        &self.orchestrator
    }

    pub fn gateway(&self) -> &VerificationGateway<S> {
        &self.gateway
    }

    /// Generate a fresh field prime, in decimal.
    pub fn generate_prime(&self) -> Result<String> {
        let prime = FieldPrimeGenerator::new(self.parameters()).generate()?;
        Ok(prime.to_decimal())
    }

    fn parse_prime(&self, prime: &str) -> Result<Prime> {
        let prime = Prime::from_decimal(prime)?;
        if prime.bit_length() != self.parameters().prime_bits() {
            warn!(
                "Using a {}-bit prime where the parameter set calls for {} bits",
                prime.bit_length(),
                self.parameters().prime_bits()
            );
        }
        Ok(prime)
    }

    /// Run the reconstruction step of key generation and return the group
    /// public key in decimal.
    #[instrument(skip_all, err(Debug))]
    pub fn distributed_keygen(&self, shares: &[impl AsRef<str>], prime: &str) -> Result<String> {
        let prime = self.parse_prime(prime)?;
        let seed = reconstruct_additive(shares, &prime)?;
        let public_key = self.orchestrator.generate_group_key(seed)?;
        info!("Key generation finished with {} parties", shares.len());
        Ok(public_key.to_decimal())
    }

    /// Recover the seed from `threshold` labeled shares and sign `message`.
    ///
    /// With `expected_public_key` (decimal), the recovered key must be the
    /// wallet's key or no signature is produced.
    #[instrument(skip_all, err(Debug))]
    pub fn threshold_sign(
        &self,
        message: &[u8],
        shares: &[(u32, impl AsRef<str>)],
        threshold: usize,
        prime: &str,
        expected_public_key: Option<&str>,
    ) -> Result<ThresholdSignature> {
        let prime = self.parse_prime(prime)?;
        let expected = expected_public_key
            .map(|pk| PublicKey::from_decimal(pk, self.parameters().public_key_bytes()))
            .transpose()?;
        let seed = reconstruct_at_zero(shares, threshold, &prime)?;
        self.orchestrator
            .threshold_sign(seed, message, expected.as_ref())
    }

    /// Sign with the shares, prime and public key a set of parties agreed on.
    pub fn sign_authorized(
        &self,
        message: &[u8],
        authorizations: &AuthorizationSet,
    ) -> Result<ThresholdSignature> {
        let (Some(prime), Some(public_key)) = (authorizations.prime(), authorizations.public_key())
        else {
            error!("Cannot sign without any authorization");
            return Err(CallerError::InsufficientShares {
                required: 1,
                provided: 0,
            }
            .into());
        };
        self.threshold_sign(
            message,
            &authorizations.shares(),
            authorizations.threshold(),
            prime,
            Some(public_key),
        )
    }

    /// Verify `combined = signature prefix ‖ message`.
    pub fn verify(&self, combined: &[u8], message_len: usize, public_key: &[u8]) -> Result<bool> {
        self.gateway.verify(combined, message_len, public_key)
    }
}
