use crate::cli::{Cli, Commands};
use crate::error::Result;
use crate::hash_index::{HashFile, HashFileOptions};
use crate::utils::{format_bytes, verify_file_existence};
use std::io::{self, Write};

/// Executes a parsed CLI command against the hash file.
///
/// Read-only commands (`info`, `dump`, `lookup`) and `clear` refuse to create
/// a missing file; `store` creates it on demand. Every mutating command syncs
/// the header before the file is closed.
///
/// # References
/// - [`Commands`](crate::cli::Commands): Defines the available CLI commands.
/// - [`HashFile`](crate::hash_index::HashFile): The underlying hash index.
pub fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Info => {
            let hash_file = HashFile::open_existing(&cli.hash_file)?;

            let file_size = hash_file.file_size()?;
            let capacity = hash_file.bucket_count() as u64 * hash_file.bucket_size() as u64;

            println!("\n{:=^50}", " HASH FILE INFO ");
            println!("{:<25} {:?}", "HASH FILE:", cli.hash_file);
            println!("{:-<50}", ""); // Separator

            println!("{:<25} {}", "TOTAL SIZE:", format_bytes(file_size));
            println!("{:<25} {}", "BUCKET COUNT:", hash_file.bucket_count());
            println!("{:<25} {}", "BUCKET SIZE:", hash_file.bucket_size());
            println!("{:<25} {} bytes", "RECORD SIZE:", hash_file.record_size());
            println!(
                "{:<25} {}",
                "OVERFLOW BUCKETS:",
                hash_file.overflow_bucket_count()?
            );
            println!("{:<25} {}", "ITEM COUNT:", hash_file.item_count());
            println!(
                "{:<25} {:.2}",
                "LOAD:",
                hash_file.item_count() as f64 / capacity as f64
            );

            println!("{:=<50}", ""); // Footer

            hash_file.close()
        }

        Commands::Dump => {
            let hash_file = HashFile::open_existing(&cli.hash_file)?;

            let stdout = io::stdout();
            let mut stdout_handle = stdout.lock();
            hash_file.dump_contents(&mut stdout_handle)?;
            stdout_handle.flush()?;

            hash_file.close()
        }

        Commands::Store { id, target } => {
            let mut hash_file = HashFileOptions::new()
                .force_sync(cli.sync)
                .open(&cli.hash_file)?;

            let hash = target.resolve();
            hash_file.store_id(hash, *id)?;
            hash_file.sync()?;

            println!("Stored ID {} under hash {:#010x}", id, hash);

            hash_file.close()
        }

        Commands::Lookup { target } => {
            let hash_file = HashFile::open_existing(&cli.hash_file)?;
            let hash = target.resolve();

            let ids = hash_file.lookup_ids(hash)?;
            if ids.is_empty() {
                eprintln!("Error: No IDs stored under hash {:#010x}", hash);
                std::process::exit(1);
            }

            for id in ids {
                println!("{}", id);
            }

            hash_file.close()
        }

        Commands::Clear => {
            verify_file_existence(&cli.hash_file)?;

            let mut hash_file = HashFileOptions::new()
                .force_sync(cli.sync)
                .create(false)
                .open(&cli.hash_file)?;

            let removed = hash_file.item_count();
            hash_file.clear()?;
            hash_file.sync()?;

            println!("Cleared {} items.", removed);

            hash_file.close()
        }
    }
}
