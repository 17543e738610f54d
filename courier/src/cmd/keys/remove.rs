use crate::{
    cmd::{CourierCommand, StoreOpts},
    formats::CourierResult,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    user: String,
    removed: bool,
}

pub struct KeysRemove();
impl CourierCommand for KeysRemove {
    type Opt = RemoveOpts;
    type Output = Output;
    fn run(opts: Self::Opt) -> CourierResult<Self::Output> {
        let store = opts.store.open()?;
        // a corrupt entry counts as present
        let removed = !matches!(store.retrieve_keys(&opts.user), Ok(None));
        store.remove_keys(&opts.user)?;
        Ok(Output {
            user: opts.user,
            removed,
        })
    }
    fn pretty(result: Self::Output) -> String {
        if result.removed {
            format!("Removed the key pair of {}", result.user)
        } else {
            format!("{} has no key pair", result.user)
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct RemoveOpts {
    #[arg(value_name = "USER")]
    user: String,
    #[command(flatten)]
    store: StoreOpts,
}
