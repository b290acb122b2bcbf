//! Encrypted key records and their persistence backends.
//!
//! A backend is a plain keyed blob store (get/put/delete/list by DID) —
//! the same shape as the browser-side object store this record format
//! was designed against. `MemoryBackend` serves tests and embedded use;
//! `FileBackend` writes one JSON file per DID:
//!
//! ```text
//! {base_dir}/
//! └── {did-multibase}.json    — { "version": 1, "record": { ... } }
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::KeyStoreError;
use crate::identity::Did;

const RECORD_FILE_VERSION: u32 = 1;

/// A signing key encrypted at rest under a password-derived key.
///
/// `salt` and `iv` are freshly random on every store operation, even
/// when overwriting an existing record for the same DID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedKeyRecord {
    /// Owner DID; also the lookup key.
    pub did: Did,
    /// PBKDF2 salt.
    pub salt: [u8; 16],
    /// ChaCha20-Poly1305 nonce.
    pub iv: [u8; 12],
    /// AEAD ciphertext of the 64-byte signing key.
    pub ciphertext: Vec<u8>,
    /// Creation time, Unix seconds.
    pub created_at: i64,
}

// Did and creation time only; never any ciphertext or KDF material.
impl std::fmt::Display for EncryptedKeyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "key record for {} created {}",
            self.did,
            crate::time::secs_to_rfc3339(self.created_at.max(0) as u64)
        )
    }
}

/// Wrapper written to disk for each record.
#[derive(Debug, Serialize, Deserialize)]
struct KeyRecordFile {
    version: u32,
    record: EncryptedKeyRecord,
}

/// Keyed persistence for encrypted key records.
///
/// Implementations must be safe to share across threads; operations on
/// different DIDs are independent and need no cross-record locking.
pub trait RecordBackend: Send + Sync {
    /// Insert or overwrite the record for its DID.
    fn put(&self, record: EncryptedKeyRecord) -> Result<(), KeyStoreError>;
    /// Fetch the record for a DID, if any.
    fn get(&self, did: &Did) -> Result<Option<EncryptedKeyRecord>, KeyStoreError>;
    /// Remove the record for a DID. Removing a missing record is not an error.
    fn delete(&self, did: &Did) -> Result<(), KeyStoreError>;
    /// List the DIDs of all stored records.
    fn dids(&self) -> Result<Vec<Did>, KeyStoreError>;
    /// Remove every record.
    fn clear(&self) -> Result<(), KeyStoreError>;
}

// ── In-memory backend ─────────────────────────────────────────────────────────

/// Mutex-guarded in-memory backend.
#[derive(Default)]
pub struct MemoryBackend {
    records: Mutex<HashMap<Did, EncryptedKeyRecord>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Did, EncryptedKeyRecord>> {
        // A poisoned lock only means another thread panicked mid-update;
        // the map itself is still a valid HashMap.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RecordBackend for MemoryBackend {
    fn put(&self, record: EncryptedKeyRecord) -> Result<(), KeyStoreError> {
        self.lock().insert(record.did.clone(), record);
        Ok(())
    }

    fn get(&self, did: &Did) -> Result<Option<EncryptedKeyRecord>, KeyStoreError> {
        Ok(self.lock().get(did).cloned())
    }

    fn delete(&self, did: &Did) -> Result<(), KeyStoreError> {
        self.lock().remove(did);
        Ok(())
    }

    fn dids(&self) -> Result<Vec<Did>, KeyStoreError> {
        Ok(self.lock().keys().cloned().collect())
    }

    fn clear(&self) -> Result<(), KeyStoreError> {
        self.lock().clear();
        Ok(())
    }
}

// ── Filesystem backend ────────────────────────────────────────────────────────

/// Filesystem-backed record store, one JSON file per DID.
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `base_dir`, creating it if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, KeyStoreError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// File path for a DID. The multibase body of a `did:key` is plain
    /// base58, so it is filesystem-safe as-is.
    fn record_path(&self, did: &Did) -> PathBuf {
        let name = did.as_str().rsplit(':').next().unwrap_or("invalid");
        self.base_dir.join(format!("{name}.json"))
    }

    /// Write atomically via a sibling temp file so a crash mid-write never
    /// leaves a truncated record visible.
    fn write_atomic(&self, path: &PathBuf, data: &[u8]) -> Result<(), KeyStoreError> {
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

impl RecordBackend for FileBackend {
    fn put(&self, record: EncryptedKeyRecord) -> Result<(), KeyStoreError> {
        let path = self.record_path(&record.did);
        let file = KeyRecordFile {
            version: RECORD_FILE_VERSION,
            record,
        };
        let json = serde_json::to_vec_pretty(&file)
            .map_err(|e| KeyStoreError::Serialization(e.to_string()))?;
        self.write_atomic(&path, &json)
    }

    fn get(&self, did: &Did) -> Result<Option<EncryptedKeyRecord>, KeyStoreError> {
        let path = self.record_path(did);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&path)?;
        let file: KeyRecordFile = serde_json::from_slice(&bytes)
            .map_err(|e| KeyStoreError::Serialization(format!("malformed record file: {e}")))?;
        Ok(Some(file.record))
    }

    fn delete(&self, did: &Did) -> Result<(), KeyStoreError> {
        let path = self.record_path(did);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn dids(&self) -> Result<Vec<Did>, KeyStoreError> {
        let mut out = Vec::new();
        for entry in std::fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = std::fs::read(&path)?;
            let file: KeyRecordFile = serde_json::from_slice(&bytes)
                .map_err(|e| KeyStoreError::Serialization(format!("malformed record file: {e}")))?;
            out.push(file.record.did);
        }
        Ok(out)
    }

    fn clear(&self) -> Result<(), KeyStoreError> {
        for did in self.dids()? {
            self.delete(&did)?;
        }
        Ok(())
    }
}
