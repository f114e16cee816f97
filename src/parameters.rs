// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Signature scheme parameters.
//!
//! Every size used by this crate (signature length, key lengths, seed length,
//! bit-length of the field prime) is computed from a [`Parameters`] value, which
//! is normally selected once at startup from a named [`ParameterSet`].

use crate::errors::{CallerError, InternalError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::error;

/// Environment variable consulted by [`ParameterSet::from_env`].
pub const PARAMETER_SET_ENV: &str = "TSS_SPX_PARAMETER_SET";

/// Base-2 logarithm of the Winternitz parameter.
pub(crate) const LOG_W: usize = 4;

/// The Winternitz parameter.
pub(crate) const W: usize = 1 << LOG_W;

/// Named SHAKE parameter sets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterSet {
    /// 128-bit security, small signatures.
    #[default]
    Shake128s,
    /// 128-bit security, fast signing.
    Shake128f,
    /// 192-bit security, small signatures.
    Shake192s,
    /// 192-bit security, fast signing.
    Shake192f,
    /// 256-bit security, small signatures.
    Shake256s,
    /// 256-bit security, fast signing.
    Shake256f,
}

impl ParameterSet {
    /// Every supported parameter set.
    pub const ALL: [ParameterSet; 6] = [
        ParameterSet::Shake128s,
        ParameterSet::Shake128f,
        ParameterSet::Shake192s,
        ParameterSet::Shake192f,
        ParameterSet::Shake256s,
        ParameterSet::Shake256f,
    ];

    /// The identifier of this set.
    pub fn name(&self) -> &'static str {
        match self {
            ParameterSet::Shake128s => "shake-128s",
            ParameterSet::Shake128f => "shake-128f",
            ParameterSet::Shake192s => "shake-192s",
            ParameterSet::Shake192f => "shake-192f",
            ParameterSet::Shake256s => "shake-256s",
            ParameterSet::Shake256f => "shake-256f",
        }
    }

    /// The parameters of this set.
    pub fn parameters(&self) -> Parameters {
        let (n, full_height, layers, fors_height, fors_trees) = match self {
            ParameterSet::Shake128s => (16, 63, 7, 12, 14),
            ParameterSet::Shake128f => (16, 66, 22, 6, 33),
            ParameterSet::Shake192s => (24, 63, 7, 14, 17),
            ParameterSet::Shake192f => (24, 66, 22, 8, 33),
            ParameterSet::Shake256s => (32, 64, 8, 14, 22),
            ParameterSet::Shake256f => (32, 68, 17, 9, 35),
        };
        Parameters {
            n,
            full_height,
            layers,
            fors_height,
            fors_trees,
        }
    }

    /// Read the parameter set named by the `TSS_SPX_PARAMETER_SET`
    /// environment variable, or the default set if it is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(PARAMETER_SET_ENV) {
            Ok(name) => name.parse(),
            Err(_) => Ok(Self::default()),
        }
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterSet {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|set| set.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                error!("Unknown parameter set `{}`", wanted);
                CallerError::UnknownParameterSet(wanted.to_string()).into()
            })
    }
}

impl From<ParameterSet> for Parameters {
    fn from(set: ParameterSet) -> Self {
        set.parameters()
    }
}

/// Parameters of the hash-based signature scheme.
///
/// Deserialization goes through [`Parameters::custom`], so a deserialized
/// value satisfies the same constraints as a constructed one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawParameters")]
pub struct Parameters {
    /// Security parameter in bytes.
    n: usize,
    /// Total height of the hypertree.
    full_height: usize,
    /// Number of hypertree layers.
    layers: usize,
    /// Height of each FORS tree.
    fors_height: usize,
    /// Number of FORS trees.
    fors_trees: usize,
}

/// Unvalidated wire form of [`Parameters`].
#[derive(Deserialize)]
struct RawParameters {
    n: usize,
    full_height: usize,
    layers: usize,
    fors_height: usize,
    fors_trees: usize,
}

impl TryFrom<RawParameters> for Parameters {
    type Error = InternalError;

    fn try_from(raw: RawParameters) -> Result<Self> {
        Self::custom(
            raw.n,
            raw.full_height,
            raw.layers,
            raw.fors_height,
            raw.fors_trees,
        )
    }
}

impl Default for Parameters {
    fn default() -> Self {
        ParameterSet::default().parameters()
    }
}

impl Parameters {
    /// Build a non-standard parameter combination.
    ///
    /// Intended for testing with small trees; the named sets should be used
    /// for anything else.
    pub fn custom(
        n: usize,
        full_height: usize,
        layers: usize,
        fors_height: usize,
        fors_trees: usize,
    ) -> Result<Self> {
        let reason = if !(2..=64).contains(&n) {
            Some("security parameter must be between 2 and 64 bytes")
        } else if layers == 0 || full_height % layers != 0 {
            Some("layer count must divide the hypertree height")
        } else if !(1..=32).contains(&(full_height / layers)) {
            Some("subtree height must be between 1 and 32")
        } else if full_height - full_height / layers > 64 {
            Some("hypertree index must fit in 64 bits")
        } else if !(1..=24).contains(&fors_height) {
            Some("FORS tree height must be between 1 and 24")
        } else if fors_trees == 0 || (fors_trees as u64) << fors_height > u32::MAX as u64 {
            Some("FORS leaf indices must fit in 32 bits")
        } else {
            None
        };

        if let Some(reason) = reason {
            error!("Rejected custom parameters: {}", reason);
            Err(CallerError::InvalidParameters(reason))?
        }

        Ok(Self {
            n,
            full_height,
            layers,
            fors_height,
            fors_trees,
        })
    }

    /// Security parameter `N`, in bytes.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Total hypertree height `h`.
    pub fn full_height(&self) -> usize {
        self.full_height
    }

    /// Number of hypertree layers `d`.
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Height of one XMSS subtree, `h / d`.
    pub fn tree_height(&self) -> usize {
        self.full_height / self.layers
    }

    /// Height `a` of a FORS tree.
    pub fn fors_height(&self) -> usize {
        self.fors_height
    }

    /// Number `k` of FORS trees.
    pub fn fors_trees(&self) -> usize {
        self.fors_trees
    }

    /// Number of message chains in a WOTS+ signature.
    pub fn wots_len1(&self) -> usize {
        (8 * self.n).div_ceil(LOG_W)
    }

    /// Number of checksum chains in a WOTS+ signature.
    pub fn wots_len2(&self) -> usize {
        let max_checksum = self.wots_len1() * (W - 1);
        let floor_log2 = (usize::BITS - 1 - max_checksum.leading_zeros()) as usize;
        floor_log2 / LOG_W + 1
    }

    /// Total number of WOTS+ chains.
    pub fn wots_len(&self) -> usize {
        self.wots_len1() + self.wots_len2()
    }

    /// Size of a WOTS+ signature.
    pub fn wots_bytes(&self) -> usize {
        self.wots_len() * self.n
    }

    /// Size of a FORS signature.
    pub fn fors_bytes(&self) -> usize {
        self.fors_trees * (self.fors_height + 1) * self.n
    }

    /// Size of the signature prefix: `N·(1 + k·(a+1) + h + d·len)`.
    pub fn signature_bytes(&self) -> usize {
        self.n + self.fors_bytes() + self.layers * self.wots_bytes() + self.full_height * self.n
    }

    /// Size of a public key (`PK.seed ‖ PK.root`).
    pub fn public_key_bytes(&self) -> usize {
        2 * self.n
    }

    /// Size of a secret key (`SK.seed ‖ SK.prf ‖ PK.seed ‖ PK.root`).
    pub fn secret_key_bytes(&self) -> usize {
        4 * self.n
    }

    /// Size of the seed a keypair is derived from.
    pub fn seed_bytes(&self) -> usize {
        3 * self.n
    }

    /// Bit-length of the field prime, `3 × N × 8`.
    pub fn prime_bits(&self) -> usize {
        self.seed_bytes() * 8
    }

    /// Length of the message digest split into FORS indices and hypertree
    /// coordinates.
    pub fn digest_bytes(&self) -> usize {
        self.fors_message_bytes() + self.tree_index_bytes() + self.leaf_index_bytes()
    }

    pub(crate) fn fors_message_bytes(&self) -> usize {
        (self.fors_trees * self.fors_height).div_ceil(8)
    }

    pub(crate) fn tree_index_bits(&self) -> usize {
        self.full_height - self.tree_height()
    }

    pub(crate) fn tree_index_bytes(&self) -> usize {
        self.tree_index_bits().div_ceil(8)
    }

    pub(crate) fn leaf_index_bytes(&self) -> usize {
        self.tree_height().div_ceil(8)
    }

    /// Default group size: one party per hypertree layer.
    pub fn default_players(&self) -> usize {
        self.layers
    }

    /// Default threshold: all parties but one.
    pub fn default_threshold(&self) -> usize {
        self.layers.saturating_sub(1).max(1)
    }
}
