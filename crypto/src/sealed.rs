//! Authenticated public-key encryption between two key pairs.
//!
//! The sender's private key and the recipient's public key are converted to X25519 and combined
//! into a shared secret, from which HKDF-SHA256 derives the XChaCha20-Poly1305 key. Both public
//! keys are bound into the derivation, sender first, so the recipient recomputes the same key from
//! its own private key and the sender's public key. Every call draws a fresh 24 byte nonce from
//! the operating system.

use crate::{
    dh,
    error::{CryptoError, Result},
    private::PrivateKey,
    public::PublicKey,
};
use chacha20poly1305::{
    aead::{Aead, NewAead},
    Key, XChaCha20Poly1305, XNonce,
};
use hkdf::Hkdf;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Length of the per-message nonce.
pub const NONCE_LENGTH: usize = 24;

const BOX_INFO: &[u8] = b"courier-box/v1";

/// Ciphertext and nonce as produced by [`seal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_LENGTH],
}

/// Base64 rendition of [`Sealed`], as returned by [`encrypt_message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedMessage {
    pub encrypted_message: String,
    pub nonce: String,
}

impl From<Sealed> for EncryptedMessage {
    fn from(sealed: Sealed) -> Self {
        Self {
            encrypted_message: base64::encode(&sealed.ciphertext),
            nonce: base64::encode(sealed.nonce),
        }
    }
}

fn box_cipher(
    own_private: &PrivateKey,
    peer: &PublicKey,
    sender: &PublicKey,
    recipient: &PublicKey,
) -> Result<XChaCha20Poly1305> {
    let shared = dh::shared_secret(own_private, peer)?;
    let mut salt = [0u8; 64];
    salt[..32].copy_from_slice(sender.as_ref());
    salt[32..].copy_from_slice(recipient.as_ref());
    let hk = Hkdf::<Sha256>::new(Some(&salt[..]), &shared[..]);
    let mut key = Zeroizing::new([0u8; 32]);
    hk.expand(BOX_INFO, &mut key[..])
        .map_err(|_| CryptoError::InvalidInput("box key length".to_owned()))?;
    Ok(XChaCha20Poly1305::new(Key::from_slice(&key[..])))
}

/// Encrypt `plaintext` from `sender` to `recipient`.
pub fn seal(plaintext: &[u8], recipient: &PublicKey, sender: &PrivateKey) -> Result<Sealed> {
    let sender_public = sender.public_key();
    let cipher = box_cipher(sender, recipient, &sender_public, recipient)?;
    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce);
    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::InvalidInput("plaintext too long".to_owned()))?;
    Ok(Sealed { ciphertext, nonce })
}

/// Decrypt a message sealed by `sender` for the owner of `recipient`.
///
/// Returns `Ok(None)` if the ciphertext does not authenticate under these keys and this nonce.
/// Errors are reserved for keys that cannot be used at all.
pub fn open(
    ciphertext: &[u8],
    nonce: &[u8; NONCE_LENGTH],
    sender: &PublicKey,
    recipient: &PrivateKey,
) -> Result<Option<Vec<u8>>> {
    let recipient_public = recipient.public_key();
    let cipher = box_cipher(recipient, sender, sender, &recipient_public)?;
    Ok(cipher.decrypt(XNonce::from_slice(nonce), ciphertext).ok())
}

pub(crate) fn decode_nonce(nonce: &str) -> Result<[u8; NONCE_LENGTH]> {
    let bytes = base64::decode(nonce).map_err(|e| CryptoError::decoding("nonce", e))?;
    if bytes.len() != NONCE_LENGTH {
        return Err(CryptoError::decoding(
            "nonce",
            format!("expected {} bytes, received {}", NONCE_LENGTH, bytes.len()),
        ));
    }
    let mut res = [0u8; NONCE_LENGTH];
    res.copy_from_slice(&bytes);
    Ok(res)
}

/// Encrypt a text message; keys are given in their base64 form.
pub fn encrypt_message(
    plaintext: &str,
    recipient_public_key: &str,
    sender_private_key: &str,
) -> Result<EncryptedMessage> {
    let recipient = PublicKey::from_str(recipient_public_key)?;
    let sender = PrivateKey::from_str(sender_private_key)?;
    Ok(seal(plaintext.as_bytes(), &recipient, &sender)?.into())
}

/// Decrypt a text message produced by [`encrypt_message`].
///
/// Malformed base64 or keys yield an error, a message that fails authentication yields
/// `Ok(None)`. Callers usually turn the latter into [`CryptoError::DecryptionFailed`].
pub fn decrypt_message(
    ciphertext: &str,
    nonce: &str,
    sender_public_key: &str,
    recipient_private_key: &str,
) -> Result<Option<String>> {
    let ciphertext = base64::decode(ciphertext).map_err(|e| CryptoError::decoding("ciphertext", e))?;
    let nonce = decode_nonce(nonce)?;
    let sender = PublicKey::from_str(sender_public_key)?;
    let recipient = PrivateKey::from_str(recipient_private_key)?;
    let plaintext = open(&ciphertext, &nonce, &sender, &recipient)?;
    Ok(plaintext.and_then(|bytes| String::from_utf8(bytes).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyPair;
    use quickcheck_macros::quickcheck;

    fn flip(bytes: &mut [u8], bit: usize) {
        let bit = bit % (bytes.len() * 8);
        bytes[bit / 8] ^= 1 << (bit % 8);
    }

    #[quickcheck]
    fn must_roundtrip(plaintext: String) -> bool {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let sealed = encrypt_message(
            &plaintext,
            &bob.pub_key().to_string(),
            &alice.private_key().to_base64(),
        )
        .unwrap();
        let opened = decrypt_message(
            &sealed.encrypted_message,
            &sealed.nonce,
            &alice.pub_key().to_string(),
            &bob.private_key().to_base64(),
        )
        .unwrap();
        opened == Some(plaintext)
    }

    #[quickcheck]
    fn must_detect_ciphertext_tampering(plaintext: Vec<u8>, bit: usize) -> bool {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let mut sealed = seal(&plaintext, &bob.pub_key(), alice.private_key()).unwrap();
        flip(&mut sealed.ciphertext, bit);
        open(&sealed.ciphertext, &sealed.nonce, &alice.pub_key(), bob.private_key()).unwrap().is_none()
    }

    #[quickcheck]
    fn must_detect_nonce_tampering(plaintext: Vec<u8>, bit: usize) -> bool {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let mut sealed = seal(&plaintext, &bob.pub_key(), alice.private_key()).unwrap();
        flip(&mut sealed.nonce, bit);
        open(&sealed.ciphertext, &sealed.nonce, &alice.pub_key(), bob.private_key()).unwrap().is_none()
    }

    #[quickcheck]
    fn must_isolate_third_parties(plaintext: Vec<u8>) -> bool {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let eve = KeyPair::generate();
        let sealed = seal(&plaintext, &bob.pub_key(), alice.private_key()).unwrap();
        open(&sealed.ciphertext, &sealed.nonce, &alice.pub_key(), eve.private_key()).unwrap().is_none()
    }

    #[test]
    fn must_use_fresh_nonces() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let a = seal(b"same", &bob.pub_key(), alice.private_key()).unwrap();
        let b = seal(b"same", &bob.pub_key(), alice.private_key()).unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn must_not_open_with_wrong_sender() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let mallory = KeyPair::generate();
        let sealed = seal(b"hi bob", &bob.pub_key(), alice.private_key()).unwrap();
        let opened = open(&sealed.ciphertext, &sealed.nonce, &mallory.pub_key(), bob.private_key()).unwrap();
        assert_eq!(opened, None);
    }

    #[test]
    fn must_propagate_decoding_errors() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let err = encrypt_message("hi", "not base64!", &alice.private_key().to_base64()).unwrap_err();
        assert!(matches!(err, CryptoError::Decoding { what: "public key", .. }));

        let sealed = encrypt_message("hi", &bob.pub_key().to_string(), &alice.private_key().to_base64()).unwrap();
        let err = decrypt_message(
            &sealed.encrypted_message,
            &base64::encode([0u8; 12]),
            &alice.pub_key().to_string(),
            &bob.private_key().to_base64(),
        )
        .unwrap_err();
        assert!(matches!(err, CryptoError::Decoding { what: "nonce", .. }));

        let err = decrypt_message(
            "***",
            &sealed.nonce,
            &alice.pub_key().to_string(),
            &bob.private_key().to_base64(),
        )
        .unwrap_err();
        assert!(matches!(err, CryptoError::Decoding { what: "ciphertext", .. }));
    }

    #[test]
    fn ciphertext_carries_tag() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let sealed = seal(b"hello", &bob.pub_key(), alice.private_key()).unwrap();
        assert_eq!(sealed.ciphertext.len(), 5 + 16);
    }
}
