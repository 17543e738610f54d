use crate::formats::{CourierCliResult, CourierCode, CourierError, CourierResult, CourierResultExt};
use crypto::{FileStorage, KeyStore, KeyStoreConfig, DEFAULT_KEY_PREFIX};
use serde::Serialize;
use std::{
    io::Read,
    path::{Path, PathBuf},
};

pub mod keys;
pub mod open;
pub mod seal;

/// Returns the data directory for courier. Does not create the folders!
/// https://docs.rs/dirs/4.0.0/dirs/fn.config_dir.html
pub(crate) fn get_data_dir() -> CourierResult<PathBuf> {
    let data_dir = dirs::config_dir().ok_or_else(|| CourierError::internal("Can't get user's config dir"))?;

    Ok(data_dir.join("courier"))
}

#[derive(clap::Args, Debug, Clone)]
pub struct StoreOpts {
    /// Directory holding the users' key pairs [default: <config dir>/courier/keys]
    #[arg(long, env = "COURIER_STORE")]
    store: Option<PathBuf>,
    /// Prefix of the per-user entries in the key directory
    #[arg(long, env = "COURIER_KEY_PREFIX", default_value = DEFAULT_KEY_PREFIX, hide = true)]
    key_prefix: String,
}

impl StoreOpts {
    pub fn open(&self) -> CourierResult<KeyStore<FileStorage>> {
        let dir = match &self.store {
            Some(dir) => dir.clone(),
            None => get_data_dir()?.join("keys"),
        };
        tracing::debug!(dir = %dir.display(), "using key directory");
        let config = KeyStoreConfig {
            key_prefix: self.key_prefix.clone(),
        };
        Ok(KeyStore::with_config(FileStorage::new(dir), config))
    }
}

/// Take `arg` if given, otherwise read all of stdin without its final line break.
pub(crate) fn arg_or_stdin(arg: Option<String>) -> CourierResult<String> {
    if let Some(arg) = arg {
        return Ok(arg);
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .cr_err_ctx(CourierCode::ERR_IO, "reading stdin")?;
    Ok(strip_line_break(buf))
}

/// Remove one trailing `\n` or `\r\n`.
fn strip_line_break(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

/// Read `path` if given, otherwise all of stdin.
pub(crate) fn file_or_stdin(path: Option<&Path>) -> CourierResult<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).cr_err_ctx(CourierCode::ERR_IO, format!("reading {}", path.display()))
        }
        None => arg_or_stdin(None),
    }
}

pub trait CourierCommand {
    type Opt;
    type Output: Serialize;
    fn run(opts: Self::Opt) -> CourierResult<Self::Output>;
    fn pretty(result: Self::Output) -> String;
    /// Run the command and print its outcome, returning the process exit code.
    fn output(opts: Self::Opt, json: bool) -> i32 {
        let item = Self::run(opts);
        let exit = if item.is_ok() { 0 } else { 1 };
        if json {
            match serde_json::to_string(&CourierCliResult::<Self::Output>::from(item)) {
                Ok(s) => println!("{}", s),
                Err(err) => {
                    eprintln!("{}", CourierError::internal(err.to_string()));
                    return 1;
                }
            }
        } else {
            match item {
                Ok(r) => println!("{}", Self::pretty(r)),
                Err(err) => eprintln!("{}", err),
            }
        }
        exit
    }
}
