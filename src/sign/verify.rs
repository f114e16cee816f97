// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

use crate::{
    errors::{CallerError, Result},
    scheme::{PublicKey, SignatureScheme},
    spx::Sphincs,
    utils::ParseBytes,
};
use tracing::{debug, error, info, instrument, warn};

/// Checks signed messages produced by threshold signing.
#[derive(Clone, Debug, Default)]
pub struct VerificationGateway<S: SignatureScheme = Sphincs> {
    scheme: S,
}

impl<S: SignatureScheme> VerificationGateway<S> {
    pub fn new(scheme: S) -> Self {
        Self { scheme }
    }

    /// Verify `combined = signature prefix ‖ message`, where the message is
    /// `message_len` bytes long.
    ///
    /// Input that cannot be split is an error; a well-formed signature that
    /// does not verify is `Ok(false)`. Bytes past the declared message are
    /// ignored.
    #[instrument(skip_all, err(Debug))]
    pub fn verify(&self, combined: &[u8], message_len: usize, public_key: &[u8]) -> Result<bool> {
        let params = self.scheme.parameters();
        let signature_bytes = params.signature_bytes();
        if combined.len() < signature_bytes.saturating_add(message_len) {
            error!(
                "Signed message has {} bytes, expected at least {} + {}",
                combined.len(),
                signature_bytes,
                message_len
            );
            Err(CallerError::MalformedInput {
                reason: "signed message is shorter than signature plus message",
            })?
        }
        if public_key.len() != params.public_key_bytes() {
            error!(
                "Public key has {} bytes, expected {}",
                public_key.len(),
                params.public_key_bytes()
            );
            Err(CallerError::MalformedInput {
                reason: "public key has the wrong length",
            })?
        }

        let mut parser = ParseBytes::new(combined);
        let signature = parser.take_bytes(signature_bytes)?;
        let message = parser.take_bytes(message_len)?;
        let trailing = parser.take_rest().len();
        if trailing > 0 {
            debug!("Ignoring {} bytes after the message", trailing);
        }

        let valid = self
            .scheme
            .verify(signature, message, &PublicKey::from_bytes(public_key));
        if valid {
            info!("Signature over a {}-byte message verified", message_len);
        } else {
            warn!("Signature over a {}-byte message rejected", message_len);
        }
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::{ErrorKind, InternalError},
        parameters::Parameters,
        seed::Seed,
        sign::SignatureOrchestrator,
        utils::{bn_from_u32, testing::init_testing},
    };
    use rand::Rng;

    fn small() -> Sphincs {
        Sphincs::new(Parameters::custom(16, 6, 2, 4, 8).unwrap())
    }

    fn signed(message: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        let orchestrator = SignatureOrchestrator::new(small());
        let seed = Seed::from_field_element(bn_from_u32(0x5eed));
        let (signed_message, public_key) = orchestrator
            .threshold_sign(seed, message, None)?
            .into_parts();
        Ok((signed_message, public_key.as_bytes().to_vec()))
    }

    #[test]
    fn accepts_untouched_signature() -> Result<()> {
        let (combined, pk) = signed(b"withdraw")?;
        let gateway = VerificationGateway::new(small());
        assert!(gateway.verify(&combined, 8, &pk)?);

        let mut extended = combined.clone();
        extended.extend_from_slice(b"trailing");
        assert!(gateway.verify(&extended, 8, &pk)?);
        Ok(())
    }

    #[test]
    fn single_bit_flips_are_rejected() -> Result<()> {
        let mut rng = init_testing();
        let (combined, pk) = signed(b"withdraw")?;
        let gateway = VerificationGateway::new(small());
        let prefix = small().parameters().signature_bytes();

        // One flip in the prefix, one in the message, one in the key.
        let mut tampered = combined.clone();
        tampered[rng.gen_range(0..prefix)] ^= 1 << rng.gen_range(0..8);
        assert!(!gateway.verify(&tampered, 8, &pk)?);

        let mut tampered = combined.clone();
        tampered[prefix + rng.gen_range(0..8)] ^= 1 << rng.gen_range(0..8);
        assert!(!gateway.verify(&tampered, 8, &pk)?);

        let mut wrong_pk = pk.clone();
        let position = rng.gen_range(0..wrong_pk.len());
        wrong_pk[position] ^= 1 << rng.gen_range(0..8);
        assert!(!gateway.verify(&combined, 8, &wrong_pk)?);
        Ok(())
    }

    #[test]
    fn wrong_message_length_changes_the_verdict() -> Result<()> {
        let (combined, pk) = signed(b"withdraw")?;
        let gateway = VerificationGateway::new(small());
        assert!(!gateway.verify(&combined, 7, &pk)?);
        Ok(())
    }

    #[test]
    fn unsplittable_input_is_malformed() -> Result<()> {
        let (combined, pk) = signed(b"withdraw")?;
        let gateway = VerificationGateway::new(small());

        let err = gateway.verify(&combined, 9, &pk).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);

        let err = gateway.verify(&combined[..100], 0, &pk).unwrap_err();
        assert!(matches!(
            err,
            InternalError::CallingApplicationMistake(CallerError::MalformedInput { .. })
        ));

        let err = gateway.verify(&combined, 8, &pk[1..]).unwrap_err();
        assert!(matches!(
            err,
            InternalError::CallingApplicationMistake(CallerError::MalformedInput { .. })
        ));

        assert!(gateway.verify(&combined, usize::MAX, &pk).is_err());
        Ok(())
    }
}
