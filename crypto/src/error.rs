use derive_more::{Display, Error};

pub type Result<T, E = CryptoError> = std::result::Result<T, E>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Input that is not valid base64 or has the wrong length.
    #[display(fmt = "cannot decode {}: {}", what, reason)]
    Decoding { what: &'static str, reason: String },
    /// Bytes that decode fine but are not a usable key.
    #[display(fmt = "invalid {}", _0)]
    InvalidKey(#[error(ignore)] &'static str),
    #[display(fmt = "Failed to decrypt message")]
    DecryptionFailed,
    #[display(fmt = "Encryption keys not found for user `{}`", _0)]
    KeysNotFound(#[error(ignore)] String),
    #[display(fmt = "invalid input: {}", _0)]
    InvalidInput(#[error(ignore)] String),
    #[display(fmt = "key storage error: {}", _0)]
    Storage(#[error(ignore)] String),
    #[display(fmt = "serialization error: {}", _0)]
    Serialization(#[error(ignore)] String),
}

impl CryptoError {
    pub(crate) fn decoding(what: &'static str, reason: impl ToString) -> Self {
        Self::Decoding {
            what,
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for CryptoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for CryptoError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(format!("{:#}", err))
    }
}
