use crate::error::Result;
use crate::hash_index::HashFile;
use crate::hash_index::constants::{INIT_BUCKET_COUNT, INIT_BUCKET_SIZE};
use std::path::Path;

/// Options controlling how a [`HashFile`] is opened.
///
/// Modeled on `std::fs::OpenOptions`. The initial geometry is only used when
/// the target file is empty; an existing header always takes precedence.
///
/// ```
/// use native_hash_file::HashFileOptions;
///
/// let dir = tempfile::tempdir().unwrap();
/// let hash_file = HashFileOptions::new()
///     .force_sync(true)
///     .initial_bucket_count(16)
///     .initial_bucket_size(4)
///     .open(&dir.path().join("values.hash"))
///     .unwrap();
///
/// assert_eq!(hash_file.bucket_count(), 16);
/// assert_eq!(hash_file.bucket_size(), 4);
/// assert_eq!(hash_file.record_size(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashFileOptions {
    pub(crate) force_sync: bool,
    pub(crate) create: bool,
    pub(crate) initial_bucket_count: u32,
    pub(crate) initial_bucket_size: u32,
}

impl Default for HashFileOptions {
    fn default() -> Self {
        Self {
            force_sync: false,
            create: true,
            initial_bucket_count: INIT_BUCKET_COUNT,
            initial_bucket_size: INIT_BUCKET_SIZE,
        }
    }
}

impl HashFileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces `sync()` to flush file contents to stable storage.
    pub fn force_sync(&mut self, force_sync: bool) -> &mut Self {
        self.force_sync = force_sync;
        self
    }

    /// Creates the file when it does not exist (default `true`).
    pub fn create(&mut self, create: bool) -> &mut Self {
        self.create = create;
        self
    }

    /// Number of normal buckets written into a freshly created file.
    ///
    /// # Panics
    /// If `bucket_count` is `0` or exceeds `i32::MAX`.
    pub fn initial_bucket_count(&mut self, bucket_count: u32) -> &mut Self {
        assert!(
            bucket_count > 0 && bucket_count <= i32::MAX as u32,
            "bucket count must be in 1..=i32::MAX"
        );
        self.initial_bucket_count = bucket_count;
        self
    }

    /// Slots per bucket for a freshly created file.
    ///
    /// # Panics
    /// If `bucket_size` is `0` or exceeds `i32::MAX`.
    pub fn initial_bucket_size(&mut self, bucket_size: u32) -> &mut Self {
        assert!(
            bucket_size > 0 && bucket_size <= i32::MAX as u32,
            "bucket size must be in 1..=i32::MAX"
        );
        self.initial_bucket_size = bucket_size;
        self
    }

    pub fn open(&self, path: &Path) -> Result<HashFile> {
        HashFile::open_with_options(path, self)
    }
}
