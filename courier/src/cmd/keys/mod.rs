mod generate;
mod remove;
mod show;

use crate::cmd::CourierCommand;
use generate::GenerateOpts;
use remove::RemoveOpts;
use show::ShowOpts;

#[derive(clap::Subcommand, Debug, Clone)]
/// manage users' key pairs
pub enum KeysOpts {
    /// Create a key pair for a user unless one exists, and print its public key
    Generate(GenerateOpts),
    /// Print the public key of a user
    Show(ShowOpts),
    /// Delete the key pair of a user
    Remove(RemoveOpts),
}

pub fn run(opts: KeysOpts, json: bool) -> i32 {
    match opts {
        KeysOpts::Generate(opt) => generate::KeysGenerate::output(opt, json),
        KeysOpts::Show(opt) => show::KeysShow::output(opt, json),
        KeysOpts::Remove(opt) => remove::KeysRemove::output(opt, json),
    }
}
