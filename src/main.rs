use clap::Parser;
use native_hash_file::cli::{Cli, execute_command};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = execute_command(&cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
