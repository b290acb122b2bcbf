//! Cryptographic primitives: key pairs, signing, derivation, random
//! generation, and secret buffer hygiene.
//!
//! Higher-level modules (`identity`, `envelope`, `keystore`, `ucan`)
//! compose these primitives; nothing here knows about DIDs, files, or
//! capability tokens.

pub mod derivation;
pub mod keys;
pub mod random;
pub mod secret;
pub mod signing;

pub use keys::{ephemeral_x25519, Ed25519KeyPair, EncryptionKeyPair};
pub use secret::SecretBytes;
