use crate::{
    error::{CryptoError, Result},
    pair::KeyPair,
    private::PrivateKey,
    public::PublicKey,
};
use std::str::FromStr;

/// Detached signature over the UTF-8 bytes of `plaintext`, as base64.
///
/// The signing key pair is expanded from the raw private key, so the matching verification key
/// is the same public key that messages are sealed to.
pub fn sign_message(plaintext: &str, private_key: &str) -> Result<String> {
    let pair = KeyPair::from(PrivateKey::from_str(private_key)?);
    Ok(base64::encode(pair.sign(plaintext.as_bytes())))
}

/// Check a signature produced by [`sign_message`].
///
/// Any input that cannot be decoded counts as an invalid signature.
pub fn verify_signature(plaintext: &str, signature: &str, public_key: &str) -> bool {
    let signature = match base64::decode(signature) {
        Ok(sig) => sig,
        Err(e) => {
            tracing::debug!("signature is not base64: {}", e);
            return false;
        }
    };
    match PublicKey::from_str(public_key) {
        Ok(key) => key.verify(plaintext.as_bytes(), &signature),
        Err(e) => {
            tracing::debug!("cannot verify signature: {}", e);
            false
        }
    }
}

pub(crate) fn decode_signature(signature: &str) -> Result<Vec<u8>> {
    base64::decode(signature).map_err(|e| CryptoError::decoding("signature", e))
}
