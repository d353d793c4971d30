use thiserror::Error;

pub type Result<T> = std::result::Result<T, HashFileError>;

#[derive(Error, Debug)]
pub enum HashFileError {
    /// Underlying read, write, truncate or remove failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is non-empty but cannot hold a complete header.
    #[error("file too short to be a compatible hash file ({len} bytes)")]
    FileTooShort { len: u64 },

    #[error("file doesn't contain compatible hash file data")]
    InvalidMagic,

    #[error("unable to read hash file; it uses a newer file format (version {0})")]
    NewerVersion(u8),

    #[error("unable to read hash file; invalid file format version: {0}")]
    UnsupportedVersion(u8),

    /// Header declares a bucket count or bucket size that is not positive.
    #[error("invalid hash file geometry: bucket count {bucket_count}, bucket size {bucket_size}")]
    InvalidGeometry { bucket_count: i32, bucket_size: i32 },

    #[error("invalid hash file item count: {0}")]
    InvalidItemCount(i32),

    /// The file ends before the normal bucket region declared by the header.
    #[error("hash file truncated: bucket table needs {table_size} bytes, file has {file_len}")]
    TableTruncated { table_size: u64, file_len: u64 },

    /// Storing another item would overflow the item count or require more
    /// than `i32::MAX` buckets. Nothing is written.
    #[error("hash file is full: {item_count} items in {bucket_count} buckets")]
    CapacityExceeded { item_count: u32, bucket_count: u32 },

    /// ID 0 marks an empty slot and can never be stored.
    #[error("ID 0 is reserved for empty slots")]
    ReservedId,
}

impl HashFileError {
    /// Returns `true` for errors raised while validating the file header.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            HashFileError::FileTooShort { .. }
                | HashFileError::InvalidMagic
                | HashFileError::NewerVersion(_)
                | HashFileError::UnsupportedVersion(_)
                | HashFileError::InvalidGeometry { .. }
                | HashFileError::InvalidItemCount(_)
                | HashFileError::TableTruncated { .. }
        )
    }
}
