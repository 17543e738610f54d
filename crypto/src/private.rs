use crate::{
    error::{CryptoError, Result},
    pair::KeyPair,
    public::PublicKey,
};
use rand::{rngs::OsRng, RngCore};
use std::fmt::{self, Debug};
use zeroize::Zeroize;

/// A Courier private key.
///
/// This is the 32 byte Ed25519 seed. The same seed signs messages directly and, after
/// conversion to X25519, serves as the secret for sealing.
///
/// The bytes are zeroed on drop, which is why this type is `Clone` but not `Copy`.
#[derive(Clone, Eq, PartialEq)]
pub struct PrivateKey(pub(crate) [u8; 32]);

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "secret")
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::str::FromStr for PrivateKey {
    type Err = CryptoError;
    fn from_str(s: &str) -> Result<Self> {
        let mut v = base64::decode(s.trim()).map_err(|e| CryptoError::decoding("private key", e))?;
        let res = Self::from_bytes(&v);
        v.zeroize();
        res
    }
}

impl From<&PrivateKey> for PublicKey {
    fn from(private: &PrivateKey) -> PublicKey {
        let public: ed25519_dalek::PublicKey = (&private.to_ed25519()).into();
        public.into()
    }
}

impl From<PrivateKey> for KeyPair {
    fn from(private: PrivateKey) -> KeyPair {
        let public = PublicKey::from(&private);
        KeyPair { public, private }
    }
}

impl PrivateKey {
    pub fn generate() -> Self {
        let mut seed = [0u8; ed25519_dalek::SECRET_KEY_LENGTH];
        OsRng.fill_bytes(&mut seed);
        let key = Self(seed);
        seed.zeroize();
        key
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ed25519_dalek::SECRET_KEY_LENGTH {
            return Err(CryptoError::decoding(
                "private key",
                format!(
                    "expected {} bytes, received {}",
                    ed25519_dalek::SECRET_KEY_LENGTH,
                    bytes.len()
                ),
            ));
        }
        let mut res = [0u8; ed25519_dalek::SECRET_KEY_LENGTH];
        res.copy_from_slice(bytes);
        Ok(Self(res))
    }

    pub fn to_bytes(&self) -> [u8; ed25519_dalek::SECRET_KEY_LENGTH] {
        self.0
    }

    /// Standard base64 with padding, the format used in storage and on the wire.
    pub fn to_base64(&self) -> String {
        base64::encode(self.0)
    }

    pub fn public_key(&self) -> PublicKey {
        self.into()
    }

    pub(crate) fn to_ed25519(&self) -> ed25519_dalek::SecretKey {
        // length is checked on construction
        match ed25519_dalek::SecretKey::from_bytes(&self.0) {
            Ok(secret) => secret,
            Err(_) => unreachable!("32 bytes are always a valid ed25519 seed"),
        }
    }
}
