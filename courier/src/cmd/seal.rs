use crate::{
    cmd::{arg_or_stdin, CourierCommand, StoreOpts},
    formats::{CourierCode, CourierResult},
};
use crypto::{EncryptedEnvelope, MessageMetadata, PublicKey};

pub struct Seal();
impl CourierCommand for Seal {
    type Opt = SealOpts;
    type Output = EncryptedEnvelope;
    fn run(opts: Self::Opt) -> CourierResult<Self::Output> {
        let SealOpts {
            from,
            to,
            recipient,
            sender_name,
            message_id,
            message,
            store,
        } = opts;
        let sender = store.open()?.require_keys(&from)?;
        let message = arg_or_stdin(message)?;
        if message.is_empty() {
            return Err(CourierCode::ERR_INVALID_INPUT.with_message("refusing to seal an empty message"));
        }
        let message_id = message_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let sender_name = sender_name.unwrap_or_else(|| from.clone());
        let metadata = MessageMetadata::text(message_id, sender_name);
        Ok(EncryptedEnvelope::seal(&message, &sender, recipient, &to, metadata)?)
    }
    fn pretty(result: Self::Output) -> String {
        result.to_json().unwrap_or_else(|e| e.to_string())
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct SealOpts {
    /// User whose key pair signs and seals the message
    #[arg(long, value_name = "USER")]
    from: String,
    /// Public key of the recipient (base64)
    #[arg(long, value_name = "PUBKEY")]
    to: PublicKey,
    /// Recipient id recorded in the envelope
    #[arg(long, value_name = "ID")]
    recipient: String,
    /// Display name of the sender [default: the value of --from]
    #[arg(long)]
    sender_name: Option<String>,
    /// Message id [default: a random UUID]
    #[arg(long)]
    message_id: Option<String>,
    /// The message text; read from stdin when omitted
    #[arg(value_name = "MESSAGE")]
    message: Option<String>,
    #[command(flatten)]
    store: StoreOpts,
}
