//! Durable local storage collaborators.
//!
//! Two small contracts back the stores: per-user cart snapshots
//! ([`CartStorage`], owned exclusively by the cart store) and the single
//! persisted credential ([`CredentialStore`], owned by the session store).
//! Both are synchronous - a mutation and its durable write form one
//! non-preemptible section with no partial-write window observable to a
//! subsequent read in the same process.
//!
//! Each contract ships with an in-memory implementation and a JSON
//! file-backed implementation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use peachstand_core::{CartItem, StoredCredential, UserId};

/// Errors from durable local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored snapshot could not be decoded.
    #[error("corrupt stored snapshot: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable per-user cart storage.
///
/// `load` returns an empty cart for a user with no stored copy; only a
/// corrupt or unreadable copy is an error.
pub trait CartStorage: Send + Sync {
    /// Load the stored cart for `user_id`.
    fn load(&self, user_id: &UserId) -> Result<Vec<CartItem>, StorageError>;

    /// Replace the stored cart for `user_id` with a full snapshot.
    fn save(&self, user_id: &UserId, items: &[CartItem]) -> Result<(), StorageError>;

    /// Delete the stored cart for `user_id`.
    fn clear(&self, user_id: &UserId) -> Result<(), StorageError>;
}

/// Durable storage for the single persisted credential.
pub trait CredentialStore: Send + Sync {
    /// Load the persisted credential, if any.
    fn load(&self) -> Result<Option<StoredCredential>, StorageError>;

    /// Persist the credential, replacing any previous one.
    fn save(&self, credential: &StoredCredential) -> Result<(), StorageError>;

    /// Remove the persisted credential.
    fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// In-memory implementations
// =============================================================================

/// In-memory cart storage, keyed by user id.
#[derive(Debug, Default)]
pub struct MemoryCartStorage {
    carts: Mutex<HashMap<UserId, Vec<CartItem>>>,
}

impl MemoryCartStorage {
    /// Create an empty in-memory cart storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, Vec<CartItem>>> {
        self.carts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CartStorage for MemoryCartStorage {
    fn load(&self, user_id: &UserId) -> Result<Vec<CartItem>, StorageError> {
        Ok(self.lock().get(user_id).cloned().unwrap_or_default())
    }

    fn save(&self, user_id: &UserId, items: &[CartItem]) -> Result<(), StorageError> {
        self.lock().insert(user_id.clone(), items.to_vec());
        Ok(())
    }

    fn clear(&self, user_id: &UserId) -> Result<(), StorageError> {
        self.lock().remove(user_id);
        Ok(())
    }
}

/// In-memory credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credential: Mutex<Option<StoredCredential>>,
}

impl MemoryCredentialStore {
    /// Create an empty in-memory credential store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `credential`, for restore flows.
    #[must_use]
    pub fn with_credential(credential: StoredCredential) -> Self {
        Self {
            credential: Mutex::new(Some(credential)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<StoredCredential>> {
        self.credential
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<StoredCredential>, StorageError> {
        Ok(self.lock().clone())
    }

    fn save(&self, credential: &StoredCredential) -> Result<(), StorageError> {
        *self.lock() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.lock() = None;
        Ok(())
    }
}

// =============================================================================
// JSON file implementations
// =============================================================================

/// Map a user id to a filesystem-safe file name.
fn cart_file_name(user_id: &UserId) -> String {
    let safe: String = user_id
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("cart-{safe}.json")
}

/// Cart storage as one JSON file per user under a directory.
///
/// The durable analog of browser local storage: survives process restarts,
/// partitioned by user id so switching users never mixes carts.
#[derive(Debug, Clone)]
pub struct JsonCartStorage {
    dir: PathBuf,
}

impl JsonCartStorage {
    /// Create a cart storage rooted at `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, user_id: &UserId) -> PathBuf {
        self.dir.join(cart_file_name(user_id))
    }
}

impl CartStorage for JsonCartStorage {
    fn load(&self, user_id: &UserId) -> Result<Vec<CartItem>, StorageError> {
        let path = self.path_for(user_id);
        match fs::read(&path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, user_id: &UserId, items: &[CartItem]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(items)?;
        write_atomically(&self.path_for(user_id), &bytes)
    }

    fn clear(&self, user_id: &UserId) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(user_id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Credential persisted as a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonCredentialStore {
    path: PathBuf,
}

impl JsonCredentialStore {
    /// Create a credential store backed by `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }
}

impl CredentialStore for JsonCredentialStore {
    fn load(&self) -> Result<Option<StoredCredential>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, credential: &StoredCredential) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(credential)?;
        write_atomically(&self.path, &bytes)
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write via a temp file and rename, so a crash mid-write never leaves a
/// truncated snapshot behind.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use peachstand_core::{CategoryId, Price, Product, ProductId};

    fn item(id: &str, price: u64, count: u32) -> CartItem {
        CartItem::new(
            Product {
                id: ProductId::new(id),
                title: format!("Product {id}"),
                price: Price::new(price),
                category: CategoryId::new("misc"),
                image: String::new(),
                description: String::new(),
            },
            count,
        )
    }

    #[test]
    fn test_memory_cart_storage_roundtrip() {
        let storage = MemoryCartStorage::new();
        let user = UserId::new("u1");

        assert!(storage.load(&user).unwrap().is_empty());

        let items = vec![item("p1", 100, 2)];
        storage.save(&user, &items).unwrap();
        assert_eq!(storage.load(&user).unwrap(), items);

        storage.clear(&user).unwrap();
        assert!(storage.load(&user).unwrap().is_empty());
    }

    #[test]
    fn test_memory_cart_storage_partitions_by_user() {
        let storage = MemoryCartStorage::new();
        storage
            .save(&UserId::new("u1"), &[item("p1", 100, 1)])
            .unwrap();

        assert!(storage.load(&UserId::new("u2")).unwrap().is_empty());
    }

    #[test]
    fn test_json_cart_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonCartStorage::new(dir.path()).unwrap();
        let user = UserId::new("user@example.com");

        let items = vec![item("p1", 100, 2), item("p2", 250, 1)];
        storage.save(&user, &items).unwrap();
        assert_eq!(storage.load(&user).unwrap(), items);

        storage.clear(&user).unwrap();
        assert!(storage.load(&user).unwrap().is_empty());
        // clearing twice is fine
        storage.clear(&user).unwrap();
    }

    #[test]
    fn test_json_cart_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonCartStorage::new(dir.path()).unwrap();
        assert!(storage.load(&UserId::new("nobody")).unwrap().is_empty());
    }

    #[test]
    fn test_json_cart_storage_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonCartStorage::new(dir.path()).unwrap();
        let user = UserId::new("u1");
        fs::write(dir.path().join(cart_file_name(&user)), b"not json").unwrap();

        assert!(matches!(
            storage.load(&user),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn test_json_credential_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCredentialStore::new(dir.path().join("credential.json")).unwrap();

        assert!(store.load().unwrap().is_none());

        let credential = StoredCredential::new("tok-1", 7);
        store.save(&credential).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.expose_token(), "tok-1");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
