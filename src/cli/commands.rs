use crate::utils::{compute_key_hash, parse_hash};
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the geometry and size of the hash file
    Info,

    /// Print every normal and overflow bucket
    Dump,

    /// Store an ID under a hash code
    Store {
        /// The dictionary ID to store (must be non-zero)
        #[arg(allow_negative_numbers = true)]
        id: i32,

        #[command(flatten)]
        target: HashTarget,
    },

    /// List the IDs stored under a hash code
    Lookup {
        #[command(flatten)]
        target: HashTarget,
    },

    /// Remove all stored IDs
    Clear,
}

/// Selects a hash code either directly or by hashing a key.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct HashTarget {
    /// Raw 32-bit hash code, decimal or `0x`-prefixed hex
    #[arg(long, value_parser = parse_hash, allow_hyphen_values = true)]
    pub hash: Option<i32>,

    /// Key to hash with XXH3 (folded to 32 bits)
    #[arg(long)]
    pub key: Option<String>,
}

impl HashTarget {
    pub fn resolve(&self) -> i32 {
        match (&self.hash, &self.key) {
            (Some(hash), _) => *hash,
            (None, Some(key)) => compute_key_hash(key.as_bytes()),
            (None, None) => compute_key_hash(b""),
        }
    }
}
