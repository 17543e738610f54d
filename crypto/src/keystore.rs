//! Per-user persistence of key pairs
//!
//! Every user owns exactly one [`KeyPair`], stored as JSON `{"publicKey": .., "privateKey": ..}`
//! under the storage key `<prefix><user id>`. The storage itself is a simple string-to-string
//! map behind the [`KeyStorage`] trait, with an in-memory and a directory-backed implementation.
//!
//! The private key is stored unencrypted. Whoever can read the storage can read the key.

use crate::{
    error::{CryptoError, Result},
    pair::KeyPair,
};
use anyhow::Context;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

pub const DEFAULT_KEY_PREFIX: &str = "e2ee_keys_";

/// Generate a fresh key pair from the operating system's RNG.
pub fn generate_key_pair() -> KeyPair {
    let pair = KeyPair::generate();
    tracing::debug!(public = %pair.pub_key(), "generated key pair");
    pair
}

/// A string-keyed storage area, in the spirit of a browser's local storage.
pub trait KeyStorage: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    /// Overwrites any existing value.
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyStorage for MemoryStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.write().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Stores every entry as a file inside one directory, named by [`FileStorage::file_name`].
///
/// The directory is created on first write. On Unix the files are only readable by the owner.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name of the entry for `key`: unpadded base64url of the key bytes.
    ///
    /// The encoding is injective and never yields `/` or a leading `.`, so every key maps to its
    /// own file inside `dir`.
    pub fn file_name(key: &str) -> anyhow::Result<String> {
        if key.is_empty() {
            anyhow::bail!("empty storage key");
        }
        Ok(base64::encode_config(key, base64::URL_SAFE_NO_PAD))
    }

    fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        Ok(self.dir.join(Self::file_name(key)?))
    }

    fn write_private(path: &Path, value: &str) -> std::io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()
    }
}

impl KeyStorage for FileStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => {
                tracing::trace!(path = %path.display(), "read key file");
                Ok(Some(s))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let name = Self::file_name(key)?;
        let path = self.dir.join(&name);
        fs::create_dir_all(&self.dir).with_context(|| format!("creating directory {}", self.dir.display()))?;
        // replaced atomically
        let tmp = self.dir.join(format!(".{}.tmp", name));
        Self::write_private(&tmp, value).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("renaming {} to {}", tmp.display(), path.display()))?;
        tracing::trace!(path = %path.display(), "wrote key file");
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("removing {}", path.display())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyStoreConfig {
    /// Prepended to the user id to form the storage key.
    pub key_prefix: String,
}

impl Default for KeyStoreConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_owned(),
        }
    }
}

/// Central entry point for managing users' key pairs.
#[derive(Debug)]
pub struct KeyStore<S> {
    storage: S,
    config: KeyStoreConfig,
}

impl<S: KeyStorage> KeyStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, KeyStoreConfig::default())
    }

    pub fn with_config(storage: S, config: KeyStoreConfig) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &KeyStoreConfig {
        &self.config
    }

    fn storage_key(&self, user_id: &str) -> Result<String> {
        if user_id.is_empty() {
            return Err(CryptoError::InvalidInput("empty user id".to_owned()));
        }
        Ok(format!("{}{}", self.config.key_prefix, user_id))
    }

    /// Persist `pair` as the key pair of `user_id`, replacing whatever was stored before.
    pub fn store_keys(&self, user_id: &str, pair: &KeyPair) -> Result<()> {
        let key = self.storage_key(user_id)?;
        let json = serde_json::to_string(pair)?;
        self.storage.set(&key, &json)?;
        tracing::debug!(user = user_id, public = %pair.pub_key(), "stored key pair");
        Ok(())
    }

    /// The key pair stored for `user_id`, if any.
    ///
    /// A stored entry that cannot be parsed is reported as an error rather than as absent, so
    /// that [`ensure_user_has_keys`](Self::ensure_user_has_keys) never silently replaces it.
    pub fn retrieve_keys(&self, user_id: &str) -> Result<Option<KeyPair>> {
        let key = self.storage_key(user_id)?;
        match self.storage.get(&key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Like [`retrieve_keys`](Self::retrieve_keys), but absence is an error.
    pub fn require_keys(&self, user_id: &str) -> Result<KeyPair> {
        self.retrieve_keys(user_id)?
            .ok_or_else(|| CryptoError::KeysNotFound(user_id.to_owned()))
    }

    /// Return the user's key pair, generating and storing one first if needed.
    pub fn ensure_user_has_keys(&self, user_id: &str) -> Result<KeyPair> {
        if let Some(pair) = self.retrieve_keys(user_id)? {
            return Ok(pair);
        }
        let pair = generate_key_pair();
        self.store_keys(user_id, &pair)?;
        Ok(pair)
    }

    pub fn remove_keys(&self, user_id: &str) -> Result<()> {
        let key = self.storage_key(user_id)?;
        self.storage.remove(&key)?;
        tracing::debug!(user = user_id, "removed key pair");
        Ok(())
    }
}
