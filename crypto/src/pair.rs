use crate::{
    error::{CryptoError, Result},
    private::PrivateKey,
    public::PublicKey,
};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Debug},
    str::FromStr,
};

/// A user's key pair, used both for signing and for sealing messages.
///
/// Serializes as `{"publicKey": "<base64>", "privateKey": "<base64>"}`, which is also the
/// persisted format of the [`KeyStore`](crate::KeyStore).
#[derive(Clone, Deserialize, Serialize)]
#[serde(try_from = "KeyPairJson", into = "KeyPairJson")]
pub struct KeyPair {
    pub(crate) public: PublicKey,
    pub(crate) private: PrivateKey,
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public == other.public
    }
}
impl Eq for KeyPair {}

impl Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair").field("public", &self.public).finish()
    }
}

impl KeyPair {
    pub fn generate() -> Self {
        PrivateKey::generate().into()
    }

    pub fn pub_key(&self) -> PublicKey {
        self.public
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    /// Detached Ed25519 signature over `message`.
    pub fn sign(&self, message: &[u8]) -> [u8; ed25519_dalek::SIGNATURE_LENGTH] {
        let secret_key = self.private.to_ed25519();
        let public = ed25519_dalek::PublicKey::from(&secret_key);
        ed25519_dalek::ExpandedSecretKey::from(&secret_key)
            .sign(message, &public)
            .to_bytes()
    }
}

#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyPairJson {
    public_key: String,
    private_key: String,
}

impl From<KeyPair> for KeyPairJson {
    fn from(kp: KeyPair) -> Self {
        Self {
            public_key: kp.public.to_string(),
            private_key: kp.private.to_base64(),
        }
    }
}

impl TryFrom<KeyPairJson> for KeyPair {
    type Error = CryptoError;
    fn try_from(json: KeyPairJson) -> Result<Self> {
        let private = PrivateKey::from_str(&json.private_key)?;
        let public = PublicKey::from_str(&json.public_key)?;
        let pair = KeyPair::from(private);
        if pair.public != public {
            return Err(CryptoError::InvalidKey("key pair: public key does not match private key"));
        }
        Ok(pair)
    }
}
