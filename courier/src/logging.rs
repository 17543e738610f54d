use std::io;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber for the given number of `-v` flags.
///
/// Without any flag, `RUST_LOG` is honoured and falls back to `error`. Logs go to stderr so they
/// never mix with command output.
pub fn setup_logger_with_level(verbosity: u8) {
    let directives = if verbosity == 0 {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "error".to_owned())
    } else {
        match verbosity {
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
        .to_owned()
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(directives))
        .with_writer(io::stderr)
        .finish();
    // a subscriber may already be installed, e.g. in tests
    tracing::subscriber::set_global_default(subscriber).ok();
}
