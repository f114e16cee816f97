// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Threshold reconstruction and hash-based signing for multi-party wallets.
//!
//! A group of parties jointly controls a post-quantum wallet whose signing
//! key is derived from a secret seed. The seed is a field element modulo a
//! shared safe prime `p` and never exists outside a single call:
//!
//! - **Key generation.** Every party contributes a blinded share; the seed is
//!   their sum modulo `p` ([`keygen::reconstruct_additive`]). The seed is
//!   turned into a SPHINCS+ keypair and only the public key is kept.
//! - **Signing.** Any `t` parties submit Shamir shares of the same seed;
//!   Lagrange interpolation at zero recovers it
//!   ([`threshold::reconstruct_at_zero`]). The derived public key is checked
//!   against the wallet's key before anything is signed.
//! - **Verification.** A [`VerificationGateway`] checks
//!   `signature prefix ‖ message` against a public key.
//!
//! The [`Wallet`] type bundles these steps behind the decimal-string
//! interface wallet services exchange.
//!
//! ## Secrets in memory
//! Shares, seeds and secret keys are wiped on drop. Call
//! [`enable_zeroize`] once at start-up so that GMP's internal buffers are
//! wiped as well.
//!
//! ## Parameters
//! The hash-based scheme is configured with a [`ParameterSet`]; the
//! `TSS_SPX_PARAMETER_SET` environment variable selects one with
//! [`ParameterSet::from_env`]. The field prime has `3 × N × 8` bits for
//! security parameter `N`.

pub mod errors;
mod field;
mod gmp_zeroize;
pub mod keygen;
mod parameters;
mod prime;
mod record;
mod scheme;
mod seed;
pub mod sign;
mod spx;
pub mod threshold;
mod utils;
mod wallet;

pub use errors::{CallerError, ErrorKind, InternalError, Result};
pub use field::Prime;
pub use gmp_zeroize::enable_zeroize;
pub use parameters::{ParameterSet, Parameters, PARAMETER_SET_ENV};
pub use prime::FieldPrimeGenerator;
pub use record::SignatureRecord;
pub use scheme::{Keypair, PublicKey, SecretKey, SignatureScheme};
pub use seed::Seed;
pub use sign::{
    Authorization, AuthorizationSet, SignatureOrchestrator, ThresholdSignature,
    VerificationGateway,
};
pub use spx::Sphincs;
pub use wallet::Wallet;
