use crate::{
    error::{CryptoError, Result},
    private::PrivateKey,
    public::PublicKey,
};
use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha512};
use zeroize::{Zeroize, Zeroizing};

/// Construct a X25519 secret key from a Courier private key (an Ed25519 seed).
///
/// An Ed25519 public key is derived off the left half of the SHA512 of the seed, hence the
/// matching X25519 secret must do the same to yield the Montgomery form of the same public key.
///
/// See also [Ed25519 to Curve25519](https://libsodium.gitbook.io/doc/advanced/ed25519-curve25519)
pub(crate) fn to_x25519_secret(private: &PrivateKey) -> x25519_dalek::StaticSecret {
    let mut curve25519_sk: [u8; 32] = [0; 32];
    let mut hash = Sha512::digest(&private.0);
    curve25519_sk.copy_from_slice(&hash.as_slice()[..32]);
    hash.as_mut_slice().zeroize();
    let sk = x25519_dalek::StaticSecret::from(curve25519_sk); // Copy
    curve25519_sk.zeroize();
    sk
}

/// Construct a X25519 public key from a Courier public key.
pub(crate) fn to_x25519_public(pk: &PublicKey) -> Result<x25519_dalek::PublicKey> {
    let point = CompressedEdwardsY(pk.to_bytes())
        .decompress()
        .ok_or(CryptoError::InvalidKey("public key"))?;
    Ok(x25519_dalek::PublicKey::from(point.to_montgomery().0))
}

/// Static-static Diffie-Hellman between our private key and a peer's public key.
///
/// An all-zero result means the peer key has small order; such a secret is refused.
pub(crate) fn shared_secret(private: &PrivateKey, peer: &PublicKey) -> Result<Zeroizing<[u8; 32]>> {
    let secret = to_x25519_secret(private);
    let peer = to_x25519_public(peer)?;
    let shared = Zeroizing::new(*secret.diffie_hellman(&peer).as_bytes());
    if shared.iter().all(|b| *b == 0) {
        return Err(CryptoError::InvalidKey("public key"));
    }
    Ok(shared)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn montgomery_conversion_matches_secret() {
        let private = PrivateKey::generate();
        let derived = x25519_dalek::PublicKey::from(&to_x25519_secret(&private));
        let converted = to_x25519_public(&private.public_key()).unwrap();
        assert_eq!(derived.as_bytes(), converted.as_bytes());
    }

    #[test]
    fn shared_secret_is_symmetric() {
        let alice = PrivateKey::generate();
        let bob = PrivateKey::generate();
        let ab = shared_secret(&alice, &bob.public_key()).unwrap();
        let ba = shared_secret(&bob, &alice.public_key()).unwrap();
        assert_eq!(*ab, *ba);
    }

    #[test]
    fn must_refuse_small_order_peer() {
        // the Edwards identity point encodes as 1 followed by zeros and has small order
        let mut identity = [0u8; 32];
        identity[0] = 1;
        let peer = PublicKey(identity);
        let private = PrivateKey::generate();
        assert_eq!(
            shared_secret(&private, &peer).unwrap_err(),
            CryptoError::InvalidKey("public key")
        );
    }
}
