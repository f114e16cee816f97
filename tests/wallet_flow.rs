// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! End-to-end runs of key generation, threshold signing and verification
//! through the public wallet interface.

use libpaillier::unknown_order::BigNumber;
use rand::{rngs::StdRng, SeedableRng};
use tss_spx::{
    enable_zeroize, keygen::BlindedShare, Authorization, AuthorizationSet, ErrorKind, Parameters,
    Prime, Result, SignatureRecord, Wallet,
};

const PARTIES: u32 = 5;
const THRESHOLD: usize = 3;

struct Dealt {
    prime: String,
    blinded: Vec<String>,
    labeled: Vec<(u32, String)>,
}

fn wallet() -> Wallet {
    Wallet::new(Parameters::custom(16, 6, 2, 4, 8).unwrap())
}

/// Draw additive contributions for a fresh prime, then Shamir-share their sum
/// so both reconstruction paths recover the same seed.
fn deal(wallet: &Wallet, rng: &mut StdRng) -> Result<Dealt> {
    let prime = Prime::from_decimal(&wallet.generate_prime()?)?;
    let p = prime.as_ref();

    let blinded: Vec<BlindedShare> = (0..3).map(|_| BlindedShare::random(&prime, rng)).collect();
    let secret = blinded
        .iter()
        .fold(BigNumber::zero(), |acc, share| acc.modadd(share.as_ref(), p));

    let mut coefficients = vec![secret];
    coefficients.extend((1..THRESHOLD).map(|_| BigNumber::from_rng(p, rng)));
    let labeled = (1..=PARTIES)
        .map(|x| {
            let x_bn = BigNumber::from_slice(x.to_be_bytes());
            let y = coefficients
                .iter()
                .rev()
                .fold(BigNumber::zero(), |acc, coef| acc.modmul(&x_bn, p).modadd(coef, p));
            (x, y.to_string())
        })
        .collect();

    Ok(Dealt {
        prime: prime.to_decimal(),
        blinded: blinded.iter().map(|s| s.to_decimal().to_string()).collect(),
        labeled,
    })
}

fn setup() -> (Wallet, StdRng) {
    enable_zeroize();
    (wallet(), StdRng::from_seed([7u8; 32]))
}

#[test]
fn keygen_sign_verify() -> Result<()> {
    let (wallet, mut rng) = setup();
    let dealt = deal(&wallet, &mut rng)?;
    let public_key = wallet.distributed_keygen(&dealt.blinded, &dealt.prime)?;

    let message = b"send 1 coin to carol";
    for subset in [&dealt.labeled[..3], &dealt.labeled[2..], &dealt.labeled[1..4]] {
        let signature =
            wallet.threshold_sign(message, subset, THRESHOLD, &dealt.prime, Some(&public_key))?;
        assert_eq!(signature.public_key().to_decimal(), public_key);
        assert!(wallet.verify(
            signature.signed_message(),
            message.len(),
            signature.public_key().as_bytes()
        )?);
    }
    Ok(())
}

#[test]
fn tampering_is_detected() -> Result<()> {
    let (wallet, mut rng) = setup();
    let dealt = deal(&wallet, &mut rng)?;
    let message = b"send 1 coin to carol";
    let signature = wallet.threshold_sign(message, &dealt.labeled[..3], THRESHOLD, &dealt.prime, None)?;
    let pk = signature.public_key().as_bytes();
    let combined = signature.signed_message();

    let prefix_len = wallet.parameters().signature_bytes();
    for position in [0, prefix_len / 2, prefix_len - 1, prefix_len, combined.len() - 1] {
        let mut tampered = combined.to_vec();
        tampered[position] ^= 0x80;
        assert!(!wallet.verify(&tampered, message.len(), pk)?, "byte {position}");
    }

    let mut wrong_pk = pk.to_vec();
    wrong_pk[0] ^= 1;
    assert!(!wallet.verify(combined, message.len(), &wrong_pk)?);

    let err = wallet
        .verify(&combined[..prefix_len - 1], 0, pk)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
    Ok(())
}

#[test]
fn wrong_shares_or_counts_never_sign() -> Result<()> {
    let (wallet, mut rng) = setup();
    let dealt = deal(&wallet, &mut rng)?;
    let public_key = wallet.distributed_keygen(&dealt.blinded, &dealt.prime)?;

    let mut forged = dealt.labeled[..3].to_vec();
    forged[0].1 = "1".to_string();
    let err = wallet
        .threshold_sign(b"m", &forged, THRESHOLD, &dealt.prime, Some(&public_key))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PublicKeyMismatch);

    for count in [THRESHOLD - 1, THRESHOLD + 1] {
        let err = wallet
            .threshold_sign(
                b"m",
                &dealt.labeled[..count],
                THRESHOLD,
                &dealt.prime,
                Some(&public_key),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    // Dropping one additive contribution changes the key.
    let partial = wallet.distributed_keygen(&dealt.blinded[1..], &dealt.prime)?;
    assert_ne!(partial, public_key);
    Ok(())
}

#[test]
fn authorized_signature_exports_as_json() -> Result<()> {
    let (wallet, mut rng) = setup();
    let dealt = deal(&wallet, &mut rng)?;
    let public_key = wallet.distributed_keygen(&dealt.blinded, &dealt.prime)?;

    let mut authorizations = AuthorizationSet::new();
    for (party, shard) in &dealt.labeled[1..4] {
        authorizations.push(Authorization::new(
            *party,
            shard.clone(),
            dealt.prime.clone(),
            public_key.clone(),
        ))?;
    }
    let late = Authorization::new(5, dealt.labeled[4].1.clone(), "7919", public_key.clone());
    assert!(authorizations.push(late).is_err());

    let message = b"rotate guardians";
    let signature = wallet.sign_authorized(message, &authorizations)?;
    let json = SignatureRecord::new(&signature, message.len())?.to_json()?;

    let record = SignatureRecord::from_json(&json)?;
    assert_eq!(record.message_len(), message.len());
    assert!(record.verify(wallet.gateway())?);
    Ok(())
}
