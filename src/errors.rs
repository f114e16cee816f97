// Copyright (c) 2022-2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Error types for share reconstruction and signing.
//!
//! Errors never carry secret material. They identify the failing input by
//! its position in the caller's sequence or by its share index.

use thiserror::Error;

/// The default Result type used in this crate.
pub type Result<T> = std::result::Result<T, InternalError>;

/// Errors raised by this crate.
#[derive(Clone, Eq, PartialEq, Error, Debug)]
pub enum InternalError {
    /// The calling application supplied invalid input.
    #[error("Caller error: {0}")]
    CallingApplicationMistake(#[from] CallerError),
    /// A Lagrange denominator is `0 (mod p)`.
    #[error("Lagrange denominator for share index {index} is not invertible modulo the prime")]
    NonInvertible {
        /// Index of the share whose basis coefficient could not be computed.
        index: u32,
    },
    /// The safe prime search ran out of attempts.
    #[error("failed to generate a {bits}-bit safe prime after {attempts} attempts")]
    PrimeGenerationFailed {
        /// Requested bit length.
        bits: usize,
        /// Number of attempts made.
        attempts: usize,
    },
    /// The signature primitive could not derive a keypair from the seed.
    #[error("keypair derivation failed: {reason}")]
    KeyDerivationFailed {
        /// What went wrong.
        reason: &'static str,
    },
    /// Represents some code assumption that was checked at runtime but failed
    /// to be true.
    #[error("Represents some code assumption that was checked at runtime but failed to be true")]
    InternalInvariantFailed,
}

/// Errors that are caused by incorrect behavior by the calling application.
#[derive(Clone, Eq, PartialEq, Error, Debug)]
pub enum CallerError {
    /// A share value could not be interpreted as a field element.
    #[error("share at position {position} is malformed: {reason}")]
    MalformedShare {
        /// Position of the share in the input sequence.
        position: usize,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// Not enough shares were supplied.
    #[error("{provided} shares supplied, at least {required} required")]
    InsufficientShares {
        /// Number of shares needed.
        required: usize,
        /// Number of shares supplied.
        provided: usize,
    },
    /// More shares were supplied than the declared threshold.
    #[error("{provided} shares supplied for a threshold of {expected}")]
    ShareCountMismatch {
        /// The declared threshold.
        expected: usize,
        /// Number of shares supplied.
        provided: usize,
    },
    /// Two shares in one reconstruction carry the same index.
    #[error("share index {index} appears more than once")]
    DuplicateIndex {
        /// The repeated index.
        index: u32,
    },
    /// The prime is not usable as a field modulus.
    #[error("malformed prime: {reason}")]
    MalformedPrime {
        /// What is wrong with it.
        reason: &'static str,
    },
    /// A byte blob or encoded value does not have the expected shape.
    #[error("malformed input: {reason}")]
    MalformedInput {
        /// What is wrong with it.
        reason: &'static str,
    },
    /// The key derived from the reconstructed seed is not the wallet's key.
    #[error("derived public key does not match the expected public key")]
    PublicKeyMismatch,
    /// The named parameter set is not known.
    #[error("unknown parameter set `{0}`")]
    UnknownParameterSet(String),
    /// A custom parameter combination is not supported.
    #[error("invalid parameters: {0}")]
    InvalidParameters(&'static str),
    /// A signing authorization disagrees with the ones collected before it.
    #[error("authorization at position {position} disagrees on the {field}")]
    InconsistentAuthorization {
        /// Position the authorization would have taken.
        position: usize,
        /// The field that differs.
        field: &'static str,
    },
}

/// Coarse classification of an [`InternalError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed, duplicate, insufficient or excess input.
    Input,
    /// A non-invertible denominator; the share set or prime is unusable.
    Arithmetic,
    /// The prime search ran out of attempts.
    PrimeGeneration,
    /// Keypair derivation failed.
    KeyDerivation,
    /// The recovered key is not the wallet's key.
    PublicKeyMismatch,
    /// A bug in this crate.
    Internal,
}

impl InternalError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            InternalError::CallingApplicationMistake(CallerError::PublicKeyMismatch) => {
                ErrorKind::PublicKeyMismatch
            }
            InternalError::CallingApplicationMistake(_) => ErrorKind::Input,
            InternalError::NonInvertible { .. } => ErrorKind::Arithmetic,
            InternalError::PrimeGenerationFailed { .. } => ErrorKind::PrimeGeneration,
            InternalError::KeyDerivationFailed { .. } => ErrorKind::KeyDerivation,
            InternalError::InternalInvariantFailed => ErrorKind::Internal,
        }
    }
}
