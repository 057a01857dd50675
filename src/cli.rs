// Command-line surface. Flags inside a command are not mutually exclusive;
// `ui::run` evaluates each one that is present, in declaration order.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use clap_complete::Shell;

use crate::config::CONFIG_ENV;

#[derive(Parser, Debug)]
#[command(
    name = "cmdim",
    author,
    version,
    about = "CMDIM is a CLI tool to upload files to a PocketBase Instance and get a link to the file."
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Use this config file instead of ~/.cmdim.
    #[arg(long, env = CONFIG_ENV, value_name = "PATH", value_hint = ValueHint::FilePath, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configure the url of PocketBase Instance
    Config(ConfigArgs),
    /// Check if the PocketBase Instance is running
    Check,
    /// Upload a file to the PocketBase Instance
    Files(FilesArgs),
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Set the url of the PocketBase Instance
    #[arg(short, long, value_name = "URL", value_hint = ValueHint::Url)]
    pub set: Option<String>,

    /// Get the url of the PocketBase Instance
    #[arg(short, long)]
    pub get: bool,

    /// Get the path of the PocketBase Instance Config
    #[arg(short, long)]
    pub path: bool,
}

#[derive(Args, Debug, Default)]
pub struct FilesArgs {
    /// Upload a file to the PocketBase Instance
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub upload: Option<PathBuf>,

    /// List all files in the PocketBase Instance
    #[arg(short, long)]
    pub list: bool,

    /// Delete a file from the PocketBase Instance
    #[arg(short, long, value_name = "ID")]
    pub delete: Option<String>,
}

impl ConfigArgs {
    pub fn is_empty(&self) -> bool {
        self.set.is_none() && !self.get && !self.path
    }
}
