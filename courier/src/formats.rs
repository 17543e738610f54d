#![allow(clippy::upper_case_acronyms)]
use crypto::CryptoError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

pub type CourierResult<T> = Result<T, CourierError>;

pub fn cr_err<T>(code: CourierCode, message: String) -> CourierResult<T> {
    Err(CourierError { code, message })
}

pub trait CourierResultExt<T> {
    fn cr_err(self, code: CourierCode) -> CourierResult<T>;
    fn cr_invalid_input(self) -> CourierResult<T>;
    fn cr_err_ctx(self, code: CourierCode, ctx: impl Into<String>) -> CourierResult<T>;
}

impl<T, E: Display> CourierResultExt<T> for Result<T, E> {
    fn cr_err(self, code: CourierCode) -> CourierResult<T> {
        self.map_err(|e| CourierError {
            code,
            message: e.to_string(),
        })
    }
    fn cr_invalid_input(self) -> CourierResult<T> {
        self.cr_err(CourierCode::ERR_INVALID_INPUT)
    }
    fn cr_err_ctx(self, code: CourierCode, ctx: impl Into<String>) -> CourierResult<T> {
        self.map_err(move |e| CourierError::new(code, format!("{} ({})", ctx.into(), e)))
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum CourierCode {
    ERR_IO,
    ERR_INTERNAL_ERROR,
    ERR_INVALID_INPUT,
    ERR_KEYS_NOT_FOUND,
    ERR_DECRYPTION_FAILED,
    ERR_SIGNATURE_INVALID,
}

impl CourierCode {
    pub fn with_message(self, message: impl Into<String>) -> CourierError {
        CourierError {
            code: self,
            message: message.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CourierError {
    code: CourierCode,
    message: String,
}

impl std::error::Error for CourierError {}

impl CourierError {
    pub fn new(code: CourierCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(CourierCode::ERR_INTERNAL_ERROR, message)
    }
    pub fn code(&self) -> CourierCode {
        self.code
    }
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<CryptoError> for CourierError {
    fn from(err: CryptoError) -> Self {
        let code = match err {
            CryptoError::Decoding { .. } | CryptoError::InvalidKey(_) | CryptoError::InvalidInput(_) => {
                CourierCode::ERR_INVALID_INPUT
            }
            CryptoError::DecryptionFailed => CourierCode::ERR_DECRYPTION_FAILED,
            CryptoError::KeysNotFound(_) => CourierCode::ERR_KEYS_NOT_FOUND,
            CryptoError::Storage(_) => CourierCode::ERR_IO,
            CryptoError::Serialization(_) => CourierCode::ERR_INVALID_INPUT,
        };
        code.with_message(err.to_string())
    }
}

impl From<std::io::Error> for CourierError {
    fn from(err: std::io::Error) -> Self {
        CourierCode::ERR_IO.with_message(err.to_string())
    }
}

impl Display for CourierError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        use CourierCode::*;
        match self.code {
            ERR_INTERNAL_ERROR => write!(f, "[ERR_INTERNAL_ERROR] Error: internal error. message: {}", self.message),
            ERR_IO => write!(f, "[ERR_IO] Error: {}", self.message),
            ERR_INVALID_INPUT => write!(f, "[ERR_INVALID_INPUT] Error: {}", self.message),
            ERR_KEYS_NOT_FOUND => write!(
                f,
                "[ERR_KEYS_NOT_FOUND] Error: {}. To create keys, run courier keys generate.",
                self.message
            ),
            ERR_DECRYPTION_FAILED => write!(f, "[ERR_DECRYPTION_FAILED] Error: {}", self.message),
            ERR_SIGNATURE_INVALID => write!(f, "[ERR_SIGNATURE_INVALID] Error: {}", self.message),
        }
    }
}

/// The JSON shape of every command's output when `--json` is given.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
#[allow(non_camel_case_types)]
pub enum CourierCliResult<T: Serialize> {
    OK { code: String, result: T },
    ERROR(CourierError),
}

const OK: &str = "OK";

impl<T: Serialize> From<CourierResult<T>> for CourierCliResult<T> {
    fn from(res: CourierResult<T>) -> Self {
        match res {
            Ok(result) => CourierCliResult::OK {
                code: OK.to_owned(),
                result,
            },
            Err(err) => CourierCliResult::ERROR(err),
        }
    }
}
