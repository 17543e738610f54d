//! Key management, sealing and signing for end-to-end encrypted messages
//!
//! Every user has one Ed25519 key pair. The Ed25519 key signs, and the same key converted to
//! X25519 encrypts, so a single public key string identifies a user for both purposes.
//!
//! All operations are plain functions over explicit keys; the only state is the [`KeyStore`],
//! which persists one key pair per user.
//!
//! # Message flow
//!
//! ```rust
//! use crypto::{EncryptedEnvelope, KeyStore, MemoryStorage, MessageMetadata, Receipt, ReceiptPolicy};
//!
//! let store = KeyStore::new(MemoryStorage::new());
//! let alice = store.ensure_user_has_keys("alice")?;
//! let bob = store.ensure_user_has_keys("bob")?;
//!
//! let envelope = EncryptedEnvelope::seal(
//!     "hello",
//!     &alice,
//!     "bob",
//!     &bob.pub_key(),
//!     MessageMetadata::text("m1", "Alice"),
//! )?;
//!
//! let receipt = Receipt::receive_for_user(&store, "bob", &envelope, ReceiptPolicy::Reject);
//! assert_eq!(receipt.content(), Some("hello"));
//! assert!(receipt.is_verified());
//! # Ok::<(), crypto::CryptoError>(())
//! ```
//!
//! # Assumptions
//!
//! We assume that the `.as_bytes()` representation is and remains compatible between
//! `ed25519_dalek` and `x25519_dalek` so that we can use the same key pair for signing
//! and encryption.

mod dh;
mod envelope;
mod error;
mod keystore;
mod pair;
mod private;
mod public;
mod receipt;
mod sealed;
mod signature;

pub use envelope::{EncryptedEnvelope, MessageMetadata, MessageType};
pub use error::{CryptoError, Result};
pub use keystore::{
    generate_key_pair, FileStorage, KeyStorage, KeyStore, KeyStoreConfig, MemoryStorage, DEFAULT_KEY_PREFIX,
};
pub use pair::KeyPair;
pub use private::PrivateKey;
pub use public::PublicKey;
pub use receipt::{
    Receipt, ReceiptError, ReceiptPolicy, DECRYPTION_FAILED, KEYS_NOT_FOUND, KEYS_UNAVAILABLE, SIGNATURE_INVALID,
};
pub use sealed::{decrypt_message, encrypt_message, open, seal, EncryptedMessage, Sealed, NONCE_LENGTH};
pub use signature::{sign_message, verify_signature};
