use clap::{ArgAction, Parser};
use courierlib::{
    cmd::{
        keys::{self, KeysOpts},
        open::{Open, OpenOpts},
        seal::{Seal, SealOpts},
        CourierCommand,
    },
    logging::setup_logger_with_level,
};

#[derive(clap::Parser, Clone, Debug)]
#[command(
    name = "courier",
    about = "Seal, sign and open end-to-end encrypted messages",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
struct Opt {
    #[command(subcommand)]
    command: CommandsOpt,
    /// Format output as JSON
    #[arg(long, short, global = true)]
    json: bool,
    /// Set verbosity
    #[arg(short, global = true, action = ArgAction::Count)]
    verbosity: u8,
}

#[derive(clap::Subcommand, Debug, Clone)]
enum CommandsOpt {
    #[command(subcommand, arg_required_else_help(true))]
    Keys(KeysOpts),
    /// Sign a message and seal it for one recipient, printing the envelope JSON
    Seal(SealOpts),
    /// Open an envelope, checking its signature before showing the content
    Open(OpenOpts),
}

fn main() -> anyhow::Result<()> {
    let Opt {
        command,
        json,
        verbosity,
    } = Opt::parse();
    setup_logger_with_level(verbosity);

    let exit = match command {
        CommandsOpt::Keys(opts) => keys::run(opts, json),
        CommandsOpt::Seal(opts) => Seal::output(opts, json),
        CommandsOpt::Open(opts) => Open::output(opts, json),
    };
    if exit != 0 {
        std::process::exit(exit);
    }
    Ok(())
}
