use crate::error::{CryptoError, Result};
use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Debug, Display};

/// A public key, which also serves as identifier for the corresponding private key
///
/// It consists of 32 octets which are the same bytes as the underlying `ed25519_dalek::PublicKey`.
/// Signatures are checked against it directly, and its Montgomery form is the X25519 key that
/// messages are sealed to.
///
/// The textual representation is plain standard base64 of the 32 bytes.
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct PublicKey(pub(crate) [u8; 32]);

impl Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", base64::encode(self.0))
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl std::str::FromStr for PublicKey {
    type Err = CryptoError;
    fn from_str(s: &str) -> Result<Self> {
        let v = base64::decode(s.trim()).map_err(|e| CryptoError::decoding("public key", e))?;
        Self::from_bytes(&v)
    }
}

impl PublicKey {
    /// Parse and validate a public key; the bytes must be a valid compressed Edwards point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ed25519_dalek::PUBLIC_KEY_LENGTH {
            return Err(CryptoError::decoding(
                "public key",
                format!(
                    "expected {} bytes, received {}",
                    ed25519_dalek::PUBLIC_KEY_LENGTH,
                    bytes.len()
                ),
            ));
        }
        let ed25519 = ed25519_dalek::PublicKey::from_bytes(bytes)
            .map_err(|_| CryptoError::decoding("public key", "not a point on the curve"))?;
        Ok(ed25519.into())
    }

    pub fn to_bytes(self) -> [u8; ed25519_dalek::PUBLIC_KEY_LENGTH] {
        self.0
    }

    /// Gets the underlying ed25519 public key for interop with rust crypto libs
    pub fn to_ed25519(self) -> Result<ed25519_dalek::PublicKey> {
        ed25519_dalek::PublicKey::from_bytes(&self.0[..]).map_err(|_| CryptoError::InvalidKey("public key"))
    }

    /// Check a detached Ed25519 signature over `message`.
    ///
    /// Malformed signatures simply fail verification. Uses the strict verification rules, which
    /// reject small-order keys and non-canonical signatures.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let signature = if let Ok(sig) = ed25519_dalek::Signature::try_from(signature) {
            sig
        } else {
            return false;
        };
        match self.to_ed25519() {
            Ok(key) => key.verify_strict(message, &signature).is_ok(),
            Err(_) => false,
        }
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<ed25519_dalek::PublicKey> for PublicKey {
    fn from(key: ed25519_dalek::PublicKey) -> Self {
        Self(*key.as_bytes())
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = PublicKey;
            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("PublicKey")
            }
            fn visit_str<E: serde::de::Error>(self, string: &str) -> std::result::Result<Self::Value, E> {
                use std::str::FromStr;
                PublicKey::from_str(string).map_err(serde::de::Error::custom)
            }
        }
        deserializer.deserialize_str(V)
    }
}
