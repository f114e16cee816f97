// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Turning a reconstructed seed into a group key or a signature, and
//! checking signatures produced that way.
//!
//! # Signing flow
//! - Parties that agreed to sign each submit an [`Authorization`] carrying
//!   their Shamir share, the field prime and the wallet public key. The
//!   [`AuthorizationSet`] makes sure they agree on the last two.
//! - The seed is recovered by Lagrange interpolation at zero
//!   ([`reconstruct_at_zero`](crate::threshold::reconstruct_at_zero)).
//! - The [`SignatureOrchestrator`] derives the keypair from the seed, checks
//!   the derived public key against the wallet's key, and signs. The seed and
//!   secret key are wiped before the call returns.
//! - Anybody holding the public key can check the result with the
//!   [`VerificationGateway`].

mod authorization;
mod orchestrator;
mod verify;

pub use authorization::{Authorization, AuthorizationSet};
pub use orchestrator::{SignatureOrchestrator, ThresholdSignature};
pub use verify::VerificationGateway;
