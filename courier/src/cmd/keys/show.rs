use crate::{
    cmd::{CourierCommand, StoreOpts},
    formats::CourierResult,
};
use crypto::PublicKey;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    user: String,
    public_key: PublicKey,
}

pub struct KeysShow();
impl CourierCommand for KeysShow {
    type Opt = ShowOpts;
    type Output = Output;
    fn run(opts: Self::Opt) -> CourierResult<Self::Output> {
        let pair = opts.store.open()?.require_keys(&opts.user)?;
        Ok(Output {
            user: opts.user,
            public_key: pair.pub_key(),
        })
    }
    fn pretty(result: Self::Output) -> String {
        result.public_key.to_string()
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ShowOpts {
    #[arg(value_name = "USER")]
    user: String,
    #[command(flatten)]
    store: StoreOpts,
}
