//! What a recipient gets to see of an incoming envelope
//!
//! A receipt starts out `Decrypting` and ends in exactly one of `Verified`, `Unverified` or
//! `Error`. Text envelopes are checked in this order:
//!
//!  1. the signature must be well-formed, otherwise nothing is decrypted
//!  2. the ciphertext must authenticate under the sender's and recipient's keys
//!  3. the signature must verify over the recovered plaintext
//!
//! Content only leaves this module once step 3 passed, unless the policy is
//! [`ReceiptPolicy::ShowUnverified`]. File and image envelopes carry no cryptography and are
//! passed through as `Verified` with `verified_by_crypto: false`.
//!
//! Error states carry a [`ReceiptError`] and its fixed user-facing message. Which input was at
//! fault is only logged.

use crate::{
    envelope::EncryptedEnvelope,
    error::CryptoError,
    keystore::{KeyStorage, KeyStore},
    private::PrivateKey,
    sealed,
};
use serde::{Deserialize, Serialize};

pub const DECRYPTION_FAILED: &str = "Message could not be decrypted. You may not have the correct keys.";
pub const SIGNATURE_INVALID: &str = "Message signature could not be verified.";
pub const KEYS_NOT_FOUND: &str = "Encryption keys not found.";
pub const KEYS_UNAVAILABLE: &str = "Encryption keys could not be loaded.";

/// Why a receipt ended in `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReceiptError {
    DecryptionFailed,
    SignatureInvalid,
    KeysNotFound,
    /// Stored keys exist but cannot be read or parsed.
    KeysUnavailable,
}

impl ReceiptError {
    /// The fixed user-facing message for this reason.
    pub fn message(self) -> &'static str {
        match self {
            ReceiptError::DecryptionFailed => DECRYPTION_FAILED,
            ReceiptError::SignatureInvalid => SIGNATURE_INVALID,
            ReceiptError::KeysNotFound => KEYS_NOT_FOUND,
            ReceiptError::KeysUnavailable => KEYS_UNAVAILABLE,
        }
    }
}

/// How to treat a text message whose signature does not verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReceiptPolicy {
    /// Show an error and nothing of the content.
    Reject,
    /// Show the content, marked as unverified.
    ShowUnverified,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        ReceiptPolicy::Reject
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Receipt {
    Decrypting,
    #[serde(rename_all = "camelCase")]
    Verified {
        content: String,
        verified_by_crypto: bool,
    },
    Unverified {
        content: String,
    },
    Error {
        reason: ReceiptError,
        message: String,
    },
}

impl Default for Receipt {
    fn default() -> Self {
        Receipt::Decrypting
    }
}

impl Receipt {
    /// Process `envelope` for the holder of `recipient`.
    pub fn receive(envelope: &EncryptedEnvelope, recipient: &PrivateKey, policy: ReceiptPolicy) -> Self {
        Receipt::Decrypting.advance(envelope, recipient, policy)
    }

    /// Process `envelope` with the keys `user_id` has in `store`.
    pub fn receive_for_user<S: KeyStorage>(
        store: &KeyStore<S>,
        user_id: &str,
        envelope: &EncryptedEnvelope,
        policy: ReceiptPolicy,
    ) -> Self {
        match store.require_keys(user_id) {
            Ok(pair) => Self::receive(envelope, pair.private_key(), policy),
            Err(err) => {
                tracing::warn!(user = user_id, "cannot open envelope: {}", err);
                let reason = match err {
                    CryptoError::KeysNotFound(_) => ReceiptError::KeysNotFound,
                    _ => ReceiptError::KeysUnavailable,
                };
                Receipt::error(reason)
            }
        }
    }

    /// Move from `Decrypting` to a terminal state. Terminal states are returned unchanged.
    pub fn advance(self, envelope: &EncryptedEnvelope, recipient: &PrivateKey, policy: ReceiptPolicy) -> Self {
        if self.is_terminal() {
            return self;
        }
        let metadata = envelope.metadata();
        if !metadata.message_type.is_text() {
            return Receipt::Verified {
                content: envelope.ciphertext().to_owned(),
                verified_by_crypto: false,
            };
        }

        let parts = match envelope.sealed_parts() {
            Ok(parts) => parts,
            Err(err) => {
                tracing::debug!(message_id = %metadata.message_id, "malformed envelope: {}", err);
                return Receipt::error(ReceiptError::DecryptionFailed);
            }
        };
        if ed25519_dalek::Signature::try_from(&parts.signature[..]).is_err() {
            tracing::debug!(message_id = %metadata.message_id, "malformed signature");
            return Receipt::error(ReceiptError::SignatureInvalid);
        }

        let sender = envelope.sender_public_key();
        let plaintext = match sealed::open(&parts.ciphertext, &parts.nonce, &sender, recipient) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!(message_id = %metadata.message_id, "ciphertext does not authenticate");
                return Receipt::error(ReceiptError::DecryptionFailed);
            }
            Err(err) => {
                tracing::debug!(message_id = %metadata.message_id, "cannot open envelope: {}", err);
                return Receipt::error(ReceiptError::DecryptionFailed);
            }
        };
        let verified = sender.verify(&plaintext, &parts.signature);
        let content = match String::from_utf8(plaintext) {
            Ok(s) => s,
            Err(_) => {
                tracing::debug!(message_id = %metadata.message_id, "plaintext is not UTF-8");
                return Receipt::error(ReceiptError::DecryptionFailed);
            }
        };

        match (verified, policy) {
            (true, _) => Receipt::Verified {
                content,
                verified_by_crypto: true,
            },
            (false, ReceiptPolicy::ShowUnverified) => {
                tracing::warn!(message_id = %metadata.message_id, sender = %sender, "showing unverified message");
                Receipt::Unverified { content }
            }
            (false, ReceiptPolicy::Reject) => {
                tracing::warn!(message_id = %metadata.message_id, sender = %sender, "rejecting message with invalid signature");
                Receipt::error(ReceiptError::SignatureInvalid)
            }
        }
    }

    fn error(reason: ReceiptError) -> Self {
        Receipt::Error {
            reason,
            message: reason.message().to_owned(),
        }
    }

    /// The reason of an `Error` receipt.
    pub fn error_reason(&self) -> Option<ReceiptError> {
        match self {
            Receipt::Error { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Receipt::Decrypting)
    }

    /// Verified or unverified content, if any may be shown.
    pub fn content(&self) -> Option<&str> {
        match self {
            Receipt::Verified { content, .. } | Receipt::Unverified { content } => Some(content),
            _ => None,
        }
    }

    /// True only if the signature was checked and is valid.
    pub fn is_verified(&self) -> bool {
        matches!(
            self,
            Receipt::Verified {
                verified_by_crypto: true,
                ..
            }
        )
    }
}
