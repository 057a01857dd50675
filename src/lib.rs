// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) parses arguments and hands them to `ui::run`.
//
// Module responsibilities:
// - `config`: The one-line config file holding the PocketBase collection URL.
// - `api`: Encapsulates HTTP interactions with the PocketBase collection
//   (probe, upload + link write-back, list, delete) and the record shapes.
// - `cli`: The clap definition of commands and flags.
// - `ui`: Command handlers. Resolves config, runs API calls behind a
//   spinner and prints the results.
// - `error`: Error taxonomy shared by `config` and `api`.
// - `logging`: env_logger setup driven by `-v` and `RUST_LOG`.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod ui;

pub use error::{CmdimError, Result};
