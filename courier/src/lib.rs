//! Command line front end for sealing and opening end-to-end encrypted messages.
pub mod cmd;
pub mod formats;
pub mod logging;
