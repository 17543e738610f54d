use crate::{
    cmd::{CourierCommand, StoreOpts},
    formats::CourierResult,
};
use crypto::{generate_key_pair, PublicKey};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    user: String,
    public_key: PublicKey,
    created: bool,
}

pub struct KeysGenerate();
impl CourierCommand for KeysGenerate {
    type Opt = GenerateOpts;
    type Output = Output;
    fn run(opts: Self::Opt) -> CourierResult<Self::Output> {
        let store = opts.store.open()?;
        let (pair, created) = if opts.force {
            let pair = generate_key_pair();
            store.store_keys(&opts.user, &pair)?;
            (pair, true)
        } else {
            let existed = store.retrieve_keys(&opts.user)?.is_some();
            (store.ensure_user_has_keys(&opts.user)?, !existed)
        };
        Ok(Output {
            user: opts.user,
            public_key: pair.pub_key(),
            created,
        })
    }
    fn pretty(result: Self::Output) -> String {
        if result.created {
            format!(
                "Generated a new key pair for {}\nThe public key is: {}",
                result.user, result.public_key
            )
        } else {
            format!(
                "{} already has a key pair\nThe public key is: {}",
                result.user, result.public_key
            )
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenerateOpts {
    /// User to create the key pair for
    #[arg(value_name = "USER")]
    user: String,
    /// Replace an existing key pair. Messages sealed to the old key can no longer be opened.
    #[arg(long)]
    force: bool,
    #[command(flatten)]
    store: StoreOpts,
}
