// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::errors::{CallerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{error, info};
use zeroize::ZeroizeOnDrop;

/// One party's consent to a signature: its Shamir share together with the
/// prime and wallet public key it believes are in use.
///
/// The prime and public key are decimal strings, as distributed during key
/// generation.
#[derive(Clone, ZeroizeOnDrop, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    #[zeroize(skip)]
    party: u32,
    shard: String,
    #[zeroize(skip)]
    prime: String,
    #[zeroize(skip)]
    public_key: String,
}

impl Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorization")
            .field("party", &self.party)
            .field("shard", &"[redacted]")
            .field("prime", &self.prime)
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl Authorization {
    pub fn new(
        party: u32,
        shard: impl Into<String>,
        prime: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        Self {
            party,
            shard: shard.into(),
            prime: prime.into(),
            public_key: public_key.into(),
        }
    }

    /// The party's share index.
    pub fn party(&self) -> u32 {
        self.party
    }

    pub fn prime(&self) -> &str {
        &self.prime
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub(crate) fn shard(&self) -> &str {
        &self.shard
    }
}

/// The authorizations collected for one signature.
///
/// Every authorization must name the same prime and public key as the first
/// one accepted, and each party may authorize once.
#[derive(Clone, Debug, Default)]
pub struct AuthorizationSet {
    authorizations: Vec<Authorization>,
}

impl AuthorizationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an authorization, rejecting it if it disagrees with the set.
    pub fn push(&mut self, authorization: Authorization) -> Result<()> {
        let position = self.authorizations.len();
        if let Some(first) = self.authorizations.first() {
            let field = if first.prime != authorization.prime {
                Some("prime")
            } else if first.public_key != authorization.public_key {
                Some("public key")
            } else {
                None
            };
            if let Some(field) = field {
                error!(
                    "Authorization from party {} disagrees on the {}",
                    authorization.party, field
                );
                Err(CallerError::InconsistentAuthorization { position, field })?
            }
        }
        if self
            .authorizations
            .iter()
            .any(|existing| existing.party == authorization.party)
        {
            error!("Party {} already authorized", authorization.party);
            Err(CallerError::DuplicateIndex {
                index: authorization.party,
            })?
        }

        info!(
            "Collected authorization {} from party {}",
            position + 1,
            authorization.party
        );
        self.authorizations.push(authorization);
        Ok(())
    }

    /// Number of authorizations collected; signing uses this as the
    /// threshold.
    pub fn threshold(&self) -> usize {
        self.authorizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authorizations.is_empty()
    }

    /// Parties that have authorized, in the order they arrived.
    pub fn parties(&self) -> Vec<u32> {
        self.authorizations.iter().map(Authorization::party).collect()
    }

    /// The agreed prime, once anybody has authorized.
    pub fn prime(&self) -> Option<&str> {
        self.authorizations.first().map(Authorization::prime)
    }

    /// The agreed public key, once anybody has authorized.
    pub fn public_key(&self) -> Option<&str> {
        self.authorizations.first().map(Authorization::public_key)
    }

    pub(crate) fn shares(&self) -> Vec<(u32, &str)> {
        self.authorizations
            .iter()
            .map(|authorization| (authorization.party, authorization.shard()))
            .collect()
    }

    /// Drop every authorization, wiping the shares.
    pub fn clear(&mut self) {
        self.authorizations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InternalError;

    #[test]
    fn consistent_authorizations_are_collected() -> Result<()> {
        let mut set = AuthorizationSet::new();
        assert!(set.is_empty());
        assert_eq!(set.prime(), None);

        set.push(Authorization::new(1, "55", "7919", "1234"))?;
        set.push(Authorization::new(2, "68", "7919", "1234"))?;
        assert_eq!(set.threshold(), 2);
        assert_eq!(set.parties(), vec![1, 2]);
        assert_eq!(set.prime(), Some("7919"));
        assert_eq!(set.public_key(), Some("1234"));
        assert_eq!(set.shares(), vec![(1, "55"), (2, "68")]);

        set.clear();
        assert!(set.is_empty());
        Ok(())
    }

    #[test]
    fn disagreeing_authorizations_are_rejected() -> Result<()> {
        let mut set = AuthorizationSet::new();
        set.push(Authorization::new(1, "55", "7919", "1234"))?;

        assert_eq!(
            set.push(Authorization::new(2, "68", "7907", "1234"))
                .unwrap_err(),
            InternalError::CallingApplicationMistake(CallerError::InconsistentAuthorization {
                position: 1,
                field: "prime"
            })
        );
        assert_eq!(
            set.push(Authorization::new(2, "68", "7919", "4321"))
                .unwrap_err(),
            InternalError::CallingApplicationMistake(CallerError::InconsistentAuthorization {
                position: 1,
                field: "public key"
            })
        );
        assert_eq!(
            set.push(Authorization::new(1, "56", "7919", "1234"))
                .unwrap_err(),
            InternalError::CallingApplicationMistake(CallerError::DuplicateIndex { index: 1 })
        );
        assert_eq!(set.threshold(), 1);
        Ok(())
    }

    #[test]
    fn debug_output_hides_the_shard() {
        let authorization = Authorization::new(3, "987654321", "7919", "1234");
        let debug = format!("{authorization:?}");
        assert!(!debug.contains("987654321"));
        assert!(debug.contains("[redacted]"));
    }
}
