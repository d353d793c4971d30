//! Persistent hash index for a native RDF store.
//!
//! A [`HashFile`] maps 32-bit hash codes of RDF terms (or statement keys) to
//! non-zero integer dictionary IDs. It stores only the IDs, never the values
//! they stand for, so a lookup returns *candidate* IDs that the caller must
//! still compare against the actual value.
//!
//! ```
//! use native_hash_file::HashFile;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut hash_file = HashFile::open(&dir.path().join("values.hash")).unwrap();
//!
//! hash_file.store_id(42, 1).unwrap();
//! hash_file.store_id(42, 2).unwrap();
//! hash_file.sync().unwrap();
//!
//! let mut ids = hash_file.lookup_ids(42).unwrap();
//! ids.sort();
//! assert_eq!(ids, vec![1, 2]);
//! assert!(hash_file.lookup_ids(43).unwrap().is_empty());
//! ```

pub mod cli;

pub mod error;
pub use error::{HashFileError, Result};

pub mod hash_index;
pub use hash_index::*;

pub mod utils;
