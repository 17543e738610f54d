use crate::{
    error::{CryptoError, Result},
    pair::KeyPair,
    public::PublicKey,
    sealed::{self, Sealed, NONCE_LENGTH},
    signature::decode_signature,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    File,
    Image,
}

impl MessageType {
    pub fn is_text(self) -> bool {
        self == MessageType::Text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    pub message_id: String,
    pub message_type: MessageType,
    pub sender_name: String,
    pub has_attachments: bool,
}

impl MessageMetadata {
    pub fn text(message_id: impl Into<String>, sender_name: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            message_type: MessageType::Text,
            sender_name: sender_name.into(),
            has_attachments: false,
        }
    }

    pub fn attachment(
        message_id: impl Into<String>,
        sender_name: impl Into<String>,
        message_type: MessageType,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            message_type,
            sender_name: sender_name.into(),
            has_attachments: true,
        }
    }
}

/// Everything a recipient needs to authenticate and read one message.
///
/// Text messages carry base64 ciphertext, nonce and a detached signature over the plaintext.
/// File and image messages carry their payload reference verbatim in `ciphertext` and leave
/// `nonce` and `signature` empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedEnvelope {
    ciphertext: String,
    nonce: String,
    signature: String,
    sender_public_key: PublicKey,
    recipient_id: String,
    timestamp: DateTime<Utc>,
    metadata: MessageMetadata,
}

/// The binary parts of a text envelope.
pub(crate) struct SealedParts {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_LENGTH],
    pub signature: Vec<u8>,
}

impl EncryptedEnvelope {
    /// Sign `plaintext` with the sender's key, then seal it for `recipient`.
    pub fn seal(
        plaintext: &str,
        sender: &KeyPair,
        recipient_id: impl Into<String>,
        recipient: &PublicKey,
        metadata: MessageMetadata,
    ) -> Result<Self> {
        if !metadata.message_type.is_text() {
            return Err(CryptoError::InvalidInput(format!(
                "cannot seal a {:?} message, use an attachment envelope",
                metadata.message_type
            )));
        }
        let signature = sender.sign(plaintext.as_bytes());
        let Sealed { ciphertext, nonce } = sealed::seal(plaintext.as_bytes(), recipient, sender.private_key())?;
        let envelope = Self {
            ciphertext: base64::encode(&ciphertext),
            nonce: base64::encode(nonce),
            signature: base64::encode(signature),
            sender_public_key: sender.pub_key(),
            recipient_id: recipient_id.into(),
            timestamp: Utc::now(),
            metadata,
        };
        tracing::debug!(
            message_id = %envelope.metadata.message_id,
            recipient = %envelope.recipient_id,
            "sealed envelope"
        );
        Ok(envelope)
    }

    /// A file or image message, transmitted without encryption.
    pub fn attachment(
        payload: impl Into<String>,
        sender: &PublicKey,
        recipient_id: impl Into<String>,
        metadata: MessageMetadata,
    ) -> Result<Self> {
        if metadata.message_type.is_text() {
            return Err(CryptoError::InvalidInput(
                "text messages must be sealed".to_owned(),
            ));
        }
        Ok(Self {
            ciphertext: payload.into(),
            nonce: String::new(),
            signature: String::new(),
            sender_public_key: *sender,
            recipient_id: recipient_id.into(),
            timestamp: Utc::now(),
            metadata,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn sender_public_key(&self) -> PublicKey {
        self.sender_public_key
    }

    pub fn recipient_id(&self) -> &str {
        &self.recipient_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn metadata(&self) -> &MessageMetadata {
        &self.metadata
    }

    pub(crate) fn sealed_parts(&self) -> Result<SealedParts> {
        let ciphertext =
            base64::decode(&self.ciphertext).map_err(|e| CryptoError::decoding("ciphertext", e))?;
        let nonce = sealed::decode_nonce(&self.nonce)?;
        let signature = decode_signature(&self.signature)?;
        Ok(SealedParts {
            ciphertext,
            nonce,
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello() -> (KeyPair, KeyPair, EncryptedEnvelope) {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let envelope = EncryptedEnvelope::seal(
            "hello",
            &alice,
            "bob",
            &bob.pub_key(),
            MessageMetadata::text("m1", "Alice"),
        )
        .unwrap();
        (alice, bob, envelope)
    }

    #[test]
    fn must_serialize_camel_case() {
        let (alice, _, envelope) = hello();
        let json: serde_json::Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();
        assert_eq!(json["senderPublicKey"], alice.pub_key().to_string());
        assert_eq!(json["recipientId"], "bob");
        assert_eq!(json["metadata"]["messageId"], "m1");
        assert_eq!(json["metadata"]["messageType"], "text");
        assert_eq!(json["metadata"]["senderName"], "Alice");
        assert_eq!(json["metadata"]["hasAttachments"], false);
        assert!(json["timestamp"].is_string());

        let back = EncryptedEnvelope::from_json(&envelope.to_json().unwrap()).unwrap();
        assert_eq!(back, envelope);
    }

    #[test]
    fn must_carry_valid_parts() {
        let (alice, _, envelope) = hello();
        let parts = envelope.sealed_parts().unwrap();
        assert_eq!(parts.signature.len(), 64);
        assert_eq!(parts.ciphertext.len(), "hello".len() + 16);
        assert!(alice.pub_key().verify(b"hello", &parts.signature));
        assert_ne!(envelope.ciphertext(), "hello");
    }

    #[test]
    fn must_refuse_sealing_attachments() {
        let alice = KeyPair::generate();
        let err = EncryptedEnvelope::seal(
            "x",
            &alice,
            "bob",
            &alice.pub_key(),
            MessageMetadata::attachment("m2", "Alice", MessageType::File),
        )
        .unwrap_err();
        assert!(matches!(err, CryptoError::InvalidInput(_)));

        let err = EncryptedEnvelope::attachment("x", &alice.pub_key(), "bob", MessageMetadata::text("m3", "Alice"))
            .unwrap_err();
        assert!(matches!(err, CryptoError::InvalidInput(_)));
    }

    #[test]
    fn must_reject_bad_sender_key_on_parse() {
        let (_, _, envelope) = hello();
        let mut json: serde_json::Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();
        json["senderPublicKey"] = "broken".into();
        assert!(matches!(
            EncryptedEnvelope::from_json(&json.to_string()).unwrap_err(),
            CryptoError::Serialization(_)
        ));
    }
}
