//! Stress test: hundreds of identities stay distinct and every one
//! signs, verifies, and derives its encryption pair correctly.

use std::collections::HashSet;

use custodia::{derive_encryption_key_pair, is_valid_did, Identity};

#[test]
fn stress_500_identities_are_distinct_and_functional() {
    let identities: Vec<Identity> = (0..500).map(|_| Identity::generate()).collect();

    let dids: HashSet<String> = identities
        .iter()
        .map(|identity| identity.did().as_str().to_string())
        .collect();
    assert_eq!(dids.len(), 500, "every DID must be unique");

    for (i, identity) in identities.iter().enumerate() {
        assert!(is_valid_did(identity.did().as_str()), "identity {i}");

        let message = format!("payload {i}");
        let signature = identity.sign(message.as_bytes());
        assert!(
            Identity::verify(identity.did(), &signature, message.as_bytes()),
            "identity {i} signature should verify"
        );
    }

    // A signature from one identity never verifies under another's DID
    let signature = identities[0].sign(b"cross-check");
    assert!(!Identity::verify(identities[1].did(), &signature, b"cross-check"));
}

#[test]
fn stress_encryption_pairs_are_distinct_across_identities() {
    let mut public_keys = HashSet::new();
    for _ in 0..200 {
        let identity = Identity::generate();
        let secret = identity.secret_key_bytes();
        let pair = derive_encryption_key_pair(secret.as_slice()).unwrap();
        assert!(
            public_keys.insert(pair.public_key_bytes()),
            "derived X25519 keys must not collide"
        );
    }
}
