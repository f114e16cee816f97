// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Portable JSON form of a threshold signature.
//!
//! ```json
//! { "mlen": 5, "pk": "<base64>", "Sig": "<base64 of prefix ‖ message>" }
//! ```

use crate::{
    errors::{CallerError, InternalError, Result},
    scheme::SignatureScheme,
    sign::{ThresholdSignature, VerificationGateway},
};
use serde::{Deserialize, Serialize};
use tracing::error;

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<T, S>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// A signed message with everything needed to check it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    #[serde(rename = "mlen")]
    message_len: u32,
    #[serde(rename = "pk", with = "base64_bytes")]
    public_key: Vec<u8>,
    #[serde(rename = "Sig", with = "base64_bytes")]
    signed_message: Vec<u8>,
}

impl SignatureRecord {
    /// Capture a signature over a `message_len`-byte message.
    pub fn new(signature: &ThresholdSignature, message_len: usize) -> Result<Self> {
        let message_len = u32::try_from(message_len)
            .ok()
            .filter(|len| *len as usize <= signature.signed_message().len())
            .ok_or_else(|| {
                error!(
                    "Message length {} does not fit the {}-byte signed message",
                    message_len,
                    signature.signed_message().len()
                );
                CallerError::MalformedInput {
                    reason: "message length exceeds the signed message",
                }
            })?;
        Ok(Self {
            message_len,
            public_key: signature.public_key().as_bytes().to_vec(),
            signed_message: signature.signed_message().to_vec(),
        })
    }

    pub fn message_len(&self) -> usize {
        self.message_len as usize
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn signed_message(&self) -> &[u8] {
        &self.signed_message
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| {
            error!("Failed to serialize signature record: {err}");
            InternalError::InternalInvariantFailed
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let record = serde_json::from_str(json).map_err(|err| {
            error!("Failed to parse signature record: {err}");
            CallerError::MalformedInput {
                reason: "signature record is not valid JSON",
            }
        })?;
        Ok(record)
    }

    /// Check the record with `gateway`.
    pub fn verify<S: SignatureScheme>(&self, gateway: &VerificationGateway<S>) -> Result<bool> {
        gateway.verify(&self.signed_message, self.message_len(), &self.public_key)
    }
}
