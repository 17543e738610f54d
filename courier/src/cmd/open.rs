use crate::{
    cmd::{file_or_stdin, CourierCommand, StoreOpts},
    formats::{CourierCode, CourierResult, CourierResultExt},
};
use chrono::{DateTime, Utc};
use crypto::{EncryptedEnvelope, PublicKey, Receipt, ReceiptError, ReceiptPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    message_id: String,
    sender_name: String,
    sender_public_key: PublicKey,
    timestamp: DateTime<Utc>,
    receipt: Receipt,
}

pub struct Open();
impl CourierCommand for Open {
    type Opt = OpenOpts;
    type Output = Output;
    fn run(opts: Self::Opt) -> CourierResult<Self::Output> {
        let store = opts.store.open()?;
        let json = file_or_stdin(opts.file.as_deref())?;
        let envelope = EncryptedEnvelope::from_json(&json).cr_invalid_input()?;
        let policy = if opts.show_unverified {
            ReceiptPolicy::ShowUnverified
        } else {
            ReceiptPolicy::Reject
        };
        let receipt = Receipt::receive_for_user(&store, &opts.user, &envelope, policy);
        if let Receipt::Error { reason, message } = &receipt {
            return Err(error_code(*reason).with_message(message.clone()));
        }
        let metadata = envelope.metadata();
        Ok(Output {
            message_id: metadata.message_id.clone(),
            sender_name: metadata.sender_name.clone(),
            sender_public_key: envelope.sender_public_key(),
            timestamp: envelope.timestamp(),
            receipt,
        })
    }
    fn pretty(result: Self::Output) -> String {
        let status = match &result.receipt {
            Receipt::Verified {
                verified_by_crypto: true,
                ..
            } => "verified",
            Receipt::Verified { .. } => "attachment, not signed",
            _ => "UNVERIFIED",
        };
        format!(
            "From {} ({}) at {}, {}:\n{}",
            result.sender_name,
            result.sender_public_key,
            result.timestamp.to_rfc3339(),
            status,
            result.receipt.content().unwrap_or_default()
        )
    }
}

fn error_code(reason: ReceiptError) -> CourierCode {
    match reason {
        ReceiptError::DecryptionFailed => CourierCode::ERR_DECRYPTION_FAILED,
        ReceiptError::SignatureInvalid => CourierCode::ERR_SIGNATURE_INVALID,
        ReceiptError::KeysNotFound => CourierCode::ERR_KEYS_NOT_FOUND,
        ReceiptError::KeysUnavailable => CourierCode::ERR_IO,
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct OpenOpts {
    /// User whose key pair opens the message
    #[arg(long = "as", value_name = "USER")]
    user: String,
    /// Show the content of messages whose signature does not verify, marked as unverified
    #[arg(long)]
    show_unverified: bool,
    /// File containing the envelope JSON; read from stdin when omitted
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
    #[command(flatten)]
    store: StoreOpts,
}
