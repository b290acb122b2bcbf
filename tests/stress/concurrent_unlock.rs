//! Stress test: concurrent wrong-password attempts against one DID must
//! trip the lockout exactly like sequential ones — no interleaving may
//! race past the threshold.

use std::sync::Arc;

use custodia::keystore::KeyStore;
use custodia::{Identity, KeyStoreError};

#[test]
fn stress_concurrent_wrong_passwords_trip_lockout() {
    let store = Arc::new(KeyStore::in_memory());
    let identity = Identity::generate();
    store
        .store(identity.did(), identity.secret_key_bytes().as_slice(), "correct")
        .expect("store should succeed");

    let did = identity.did().clone();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            let did = did.clone();
            std::thread::spawn(move || {
                for j in 0..3 {
                    // Either a failed attempt or an already-active lockout
                    match store.retrieve(&did, &format!("wrong-{i}-{j}")) {
                        Ok(None) => {}
                        Err(KeyStoreError::RateLimited { .. }) => {}
                        other => panic!("unexpected outcome: {other:?}"),
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("no thread may panic");
    }

    // 24 failures worth of pressure: well past the 5-attempt threshold
    assert!(store.rate_limit_status(identity.did()) > 0);
    assert!(matches!(
        store.retrieve(identity.did(), "correct"),
        Err(KeyStoreError::RateLimited { .. })
    ));
}

#[test]
fn stress_lockout_is_per_did_under_contention() {
    let store = Arc::new(KeyStore::in_memory());
    let locked = Identity::generate();
    let free = Identity::generate();
    store
        .store(locked.did(), locked.secret_key_bytes().as_slice(), "a")
        .unwrap();
    store
        .store(free.did(), free.secret_key_bytes().as_slice(), "b")
        .unwrap();

    let did = locked.did().clone();
    let handles: Vec<_> = (0..6)
        .map(|i| {
            let store = store.clone();
            let did = did.clone();
            std::thread::spawn(move || {
                let _ = store.retrieve(&did, &format!("nope-{i}"));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(store.rate_limit_status(locked.did()) > 0);
    // The other DID is untouched and unlocks normally
    assert_eq!(store.rate_limit_status(free.did()), 0);
    assert!(store.retrieve(free.did(), "b").unwrap().is_some());
}
