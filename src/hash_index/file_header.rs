use crate::error::{HashFileError, Result};
use crate::hash_index::constants::*;

/// Fixed 16-byte header at the start of every hash file.
///
/// ## Layout (big-endian)
///
/// - **Offset `0` → `3`**: magic number `"nhf"`
/// - **Offset `3`**: file format version
/// - **Offset `4` → `8`**: number of normal (non-overflow) buckets
/// - **Offset `8` → `12`**: number of slots per bucket
/// - **Offset `12` → `16`**: number of stored items
///
/// Only `bucket_count` and `item_count` change over the lifetime of a file;
/// `bucket_size` is fixed when the file is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub bucket_count: u32,
    pub bucket_size: u32,
    pub item_count: u32,
}

impl FileHeader {
    pub fn new(bucket_count: u32, bucket_size: u32, item_count: u32) -> Self {
        Self {
            bucket_count,
            bucket_size,
            item_count,
        }
    }

    /// Size in bytes of one bucket record for this geometry.
    #[inline]
    pub fn record_size(&self) -> usize {
        ITEM_SIZE * self.bucket_size as usize + OVERFLOW_LINK_SIZE
    }

    /// End of the normal bucket region, or `None` if it does not fit in a `u64`.
    pub fn table_size(&self) -> Option<u64> {
        (self.bucket_count as u64)
            .checked_mul(self.record_size() as u64)
            .and_then(|size| size.checked_add(HEADER_LENGTH))
    }

    /// Checks that a file of `file_len` bytes holds every normal bucket this
    /// header declares.
    pub fn validate_file_len(&self, file_len: u64) -> Result<()> {
        let table_size = self.table_size().ok_or(HashFileError::InvalidGeometry {
            bucket_count: self.bucket_count as i32,
            bucket_size: self.bucket_size as i32,
        })?;

        if table_size > file_len {
            return Err(HashFileError::TableTruncated {
                table_size,
                file_len,
            });
        }

        Ok(())
    }

    /// Encodes the header, always stamping the current magic and format version.
    #[inline]
    pub fn serialize(&self) -> [u8; HEADER_LENGTH as usize] {
        let mut buf = [0u8; HEADER_LENGTH as usize];

        buf[MAGIC_RANGE].copy_from_slice(&MAGIC_NUMBER);
        buf[VERSION_OFFSET] = FILE_FORMAT_VERSION;
        buf[BUCKET_COUNT_RANGE].copy_from_slice(&self.bucket_count.to_be_bytes());
        buf[BUCKET_SIZE_RANGE].copy_from_slice(&self.bucket_size.to_be_bytes());
        buf[ITEM_COUNT_RANGE].copy_from_slice(&self.item_count.to_be_bytes());

        buf
    }

    /// Decodes and validates a header.
    ///
    /// The checks run in a fixed order: length, magic number, newer version,
    /// any other version, the bucket geometry, and finally the item count.
    /// Nothing is returned unless every check passes.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LENGTH as usize {
            return Err(HashFileError::FileTooShort {
                len: data.len() as u64,
            });
        }

        if data[MAGIC_RANGE] != MAGIC_NUMBER {
            return Err(HashFileError::InvalidMagic);
        }

        let version = data[VERSION_OFFSET];
        if version > FILE_FORMAT_VERSION {
            return Err(HashFileError::NewerVersion(version));
        } else if version != FILE_FORMAT_VERSION {
            return Err(HashFileError::UnsupportedVersion(version));
        }

        let bucket_count = read_i32(data, BUCKET_COUNT_RANGE.start);
        let bucket_size = read_i32(data, BUCKET_SIZE_RANGE.start);
        let item_count = read_i32(data, ITEM_COUNT_RANGE.start);

        if bucket_count <= 0 || bucket_size <= 0 {
            return Err(HashFileError::InvalidGeometry {
                bucket_count,
                bucket_size,
            });
        }

        if item_count < 0 {
            return Err(HashFileError::InvalidItemCount(item_count));
        }

        Ok(Self {
            bucket_count: bucket_count as u32,
            bucket_size: bucket_size as u32,
            item_count: item_count as u32,
        })
    }
}

#[inline]
fn read_i32(data: &[u8], at: usize) -> i32 {
    i32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}
