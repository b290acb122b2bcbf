use base64::Engine;
use criterion::{criterion_group, criterion_main, Criterion};
use custodia::crypto::derivation::{derive_key, derive_password_key};
use custodia::crypto::keys::Ed25519KeyPair;
use custodia::crypto::signing::{sign, verify};
use custodia::envelope;
use custodia::ucan::{check_capability, create_upload_capability, parse_token, Action};
use custodia::{derive_encryption_key_pair, Identity};

fn crypto_benchmarks(c: &mut Criterion) {
    // 1. Key generation
    c.bench_function("ed25519_key_generation", |b| {
        b.iter(|| {
            Ed25519KeyPair::generate();
        });
    });

    // 2. Signing
    let key_pair = Ed25519KeyPair::generate();
    let message = b"The quick brown fox jumps over the lazy dog";
    c.bench_function("ed25519_sign", |b| {
        b.iter(|| {
            sign(key_pair.signing_key(), message);
        });
    });

    // 3. Verification
    let signature = sign(key_pair.signing_key(), message);
    c.bench_function("ed25519_verify", |b| {
        b.iter(|| {
            assert!(verify(key_pair.verifying_key(), message, &signature));
        });
    });

    // 4. Key derivation (HKDF)
    let ikm = [0u8; 32];
    c.bench_function("hkdf_derive_key", |b| {
        b.iter(|| {
            derive_key(&ikm, "custodia/bench/v1").unwrap();
        });
    });

    // 5. Password stretching (PBKDF2, the dominant unlock cost)
    let salt = [7u8; 16];
    c.bench_function("pbkdf2_password_key", |b| {
        b.iter(|| {
            derive_password_key(b"correct horse battery staple", &salt);
        });
    });

    // 6. X25519 derivation from a signing key
    let identity = Identity::generate();
    let secret = identity.secret_key_bytes();
    c.bench_function("x25519_derive_from_signing_key", |b| {
        b.iter(|| {
            derive_encryption_key_pair(secret.as_slice()).unwrap();
        });
    });
}

fn envelope_benchmarks(c: &mut Criterion) {
    let identity = Identity::generate();
    let encryption = identity.encryption_key_pair().unwrap();
    let recipient_b64 =
        base64::engine::general_purpose::STANDARD.encode(encryption.public_key_bytes());
    let plaintext = vec![0x5au8; 64 * 1024];

    c.bench_function("envelope_seal_64k", |b| {
        b.iter(|| {
            envelope::seal(&plaintext, &recipient_b64).unwrap();
        });
    });

    let payload = envelope::seal(&plaintext, &recipient_b64).unwrap();
    let recipient_secret = encryption.secret_key_bytes();
    c.bench_function("envelope_open_64k", |b| {
        b.iter(|| {
            envelope::open(&payload, recipient_secret.as_slice()).unwrap();
        });
    });
}

fn capability_benchmarks(c: &mut Criterion) {
    let identity = Identity::generate();

    c.bench_function("capability_issue", |b| {
        b.iter(|| {
            create_upload_capability(&identity, None).unwrap();
        });
    });

    let delegation = create_upload_capability(&identity, None).unwrap();
    c.bench_function("capability_parse_verify", |b| {
        b.iter(|| {
            parse_token(&delegation.token).unwrap();
        });
    });

    c.bench_function("capability_check", |b| {
        b.iter(|| {
            assert!(check_capability(&delegation.token, Action::Upload, None, None).allowed);
        });
    });
}

criterion_group!(
    benches,
    crypto_benchmarks,
    envelope_benchmarks,
    capability_benchmarks
);
criterion_main!(benches);
