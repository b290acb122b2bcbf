//! Integration test: full end-to-end evidence workflow.
//!
//! Tests the complete lifecycle:
//! 1. Create an identity
//! 2. Protect the signing key with a password
//! 3. Encrypt and decrypt a file through the hybrid envelope
//! 4. Self-issue an upload capability
//! 5. Delegate read access to another identity
//! 6. Verify scoping, expiration, and action binding

use custodia::envelope;
use custodia::keystore::KeyStore;
use custodia::ucan::{
    can_upload_evidence, check_capability, create_upload_capability, delegate_capability,
    issue_self_capability, Action, READ_CAPABILITY_TTL_SECS,
};
use custodia::{is_valid_did, Identity};

#[test]
fn evidence_flow_identity_to_delegation() {
    // ── Step 1: Alice creates an identity ───────────────────────────────
    let alice = Identity::generate();
    assert!(is_valid_did(alice.did().as_str()));

    let secret: [u8; 64] = alice.secret_key_bytes().as_slice().try_into().unwrap();
    let restored = Identity::restore(&secret);
    assert_eq!(restored.did(), alice.did(), "restore must reproduce the DID");

    // ── Step 2: her signing key goes into the store under "p1" ──────────
    let store = KeyStore::in_memory();
    store
        .store(alice.did(), alice.secret_key_bytes().as_slice(), "p1")
        .expect("storing the key should succeed");

    let unlocked = store
        .retrieve(alice.did(), "p1")
        .expect("retrieve should not error")
        .expect("correct password should unlock the key");
    assert_eq!(unlocked.as_slice(), alice.secret_key_bytes().as_slice());
    assert!(store.retrieve(alice.did(), "p2").unwrap().is_none());

    // ── Step 3: she encrypts a 10-byte file for herself ─────────────────
    let plaintext = b"ten bytes!";
    assert_eq!(plaintext.len(), 10);

    let encryption = alice.encryption_key_pair().unwrap();
    let recipient_b64 = {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(encryption.public_key_bytes())
    };

    let payload = envelope::seal(plaintext, &recipient_b64).expect("seal should succeed");
    assert_ne!(payload.encrypted_data.as_slice(), plaintext.as_slice());
    assert_eq!(payload.original_size, 10);

    let decrypted = envelope::open(&payload, encryption.secret_key_bytes().as_slice())
        .expect("open should succeed with her own key");
    assert_eq!(decrypted, plaintext);
    assert!(
        envelope::verify_content_hash(&decrypted, &payload.content_hash),
        "hash computed before encryption must match after decryption"
    );

    // ── Step 4: a self-issued upload capability authorizes uploads ──────
    let upload = create_upload_capability(&alice, None).unwrap();
    assert!(can_upload_evidence(&upload.token));
    assert_eq!(&upload.issuer, alice.did());
    assert_eq!(&upload.audience, alice.did());

    // ── Step 5: she delegates read access on "ev-1" to Bob ──────────────
    let bob = Identity::generate();
    let delegation = delegate_capability(
        &alice,
        bob.did(),
        Action::Read,
        "ev-1",
        READ_CAPABILITY_TTL_SECS,
    )
    .unwrap();

    let allowed = check_capability(&delegation.token, Action::Read, Some("ev-1"), Some(bob.did()));
    assert!(allowed.allowed, "Bob may read ev-1: {:?}", allowed.reason);

    let denied = check_capability(&delegation.token, Action::Read, Some("ev-2"), Some(bob.did()));
    assert!(!denied.allowed, "the delegation covers ev-1 only");

    // ── Step 6: expiration and action binding hold ──────────────────────
    let expired = issue_self_capability(&alice, Action::Read, None, -1).unwrap();
    let check = check_capability(&expired.token, Action::Read, None, None);
    assert!(!check.allowed);
    assert!(
        check.reason.as_deref().unwrap_or_default().contains("expired"),
        "reason should mention expiration: {:?}",
        check.reason
    );

    let upload_check = check_capability(&delegation.token, Action::Upload, Some("ev-1"), Some(bob.did()));
    assert!(
        !upload_check.allowed,
        "a read delegation never authorizes an upload"
    );
}

#[test]
fn tampered_ciphertext_never_decrypts() {
    let alice = Identity::generate();
    let encryption = alice.encryption_key_pair().unwrap();
    let recipient_b64 = {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(encryption.public_key_bytes())
    };

    let mut payload = envelope::seal(b"evidence bytes", &recipient_b64).unwrap();
    payload.encrypted_data[0] ^= 0x01;

    let result = envelope::open(&payload, encryption.secret_key_bytes().as_slice());
    assert!(result.is_err(), "flipped ciphertext byte must fail closed");
}

#[test]
fn stranger_cannot_open_or_exercise() {
    let alice = Identity::generate();
    let mallory = Identity::generate();

    // Mallory cannot decrypt a file sealed for Alice
    let alice_enc = alice.encryption_key_pair().unwrap();
    let recipient_b64 = {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(alice_enc.public_key_bytes())
    };
    let payload = envelope::seal(b"for alice only", &recipient_b64).unwrap();
    let mallory_enc = mallory.encryption_key_pair().unwrap();
    assert!(envelope::open(&payload, mallory_enc.secret_key_bytes().as_slice()).is_err());

    // Mallory cannot exercise a token delegated to Bob
    let bob = Identity::generate();
    let delegation = delegate_capability(&alice, bob.did(), Action::Read, "ev-1", 3600).unwrap();
    let check = check_capability(&delegation.token, Action::Read, Some("ev-1"), Some(mallory.did()));
    assert!(!check.allowed);
}
