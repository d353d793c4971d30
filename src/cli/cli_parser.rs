use crate::cli::{Commands, HELP_TEMPLATE};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    // Obtain during build time, not runtime
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
#[command(
    after_help = HELP_TEMPLATE.replace("%BINARY_NAME%", env!("CARGO_PKG_NAME"))
)]
pub struct Cli {
    /// The hash file to operate on.
    #[arg(
        value_name = "hash_file",
        help = "Path to the hash file. Only `store` creates the file if it does not exist."
    )]
    pub hash_file: PathBuf,

    /// Force header syncs through to stable storage.
    #[arg(long, global = true)]
    pub sync: bool,

    #[command(subcommand)]
    pub command: Commands,
}
