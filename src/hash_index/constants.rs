use std::ops::Range;

/// Magic number "Native Hash File". The first three bytes of every hash file.
pub const MAGIC_NUMBER: [u8; 3] = *b"nhf";

/// File format version, stored as the fourth byte of the header.
pub const FILE_FORMAT_VERSION: u8 = 1;

/// Header layout: magic (3), version (1), bucket count (4), bucket size (4), item count (4).
pub const HEADER_LENGTH: u64 = 16;
pub const MAGIC_RANGE: Range<usize> = 0..3;
pub const VERSION_OFFSET: usize = 3;
pub const BUCKET_COUNT_RANGE: Range<usize> = 4..8;
pub const BUCKET_SIZE_RANGE: Range<usize> = 8..12;
pub const ITEM_COUNT_RANGE: Range<usize> = 12..16;

/// Size of one slot: 32-bit hash followed by 32-bit ID.
pub const ITEM_SIZE: usize = 8;

/// Trailing overflow link of every bucket record.
pub const OVERFLOW_LINK_SIZE: usize = 4;

pub const INIT_BUCKET_COUNT: u32 = 64;
pub const INIT_BUCKET_SIZE: u32 = 8;

/// Fixed load factor; the table doubles once `item_count` reaches this share of capacity.
pub const LOAD_FACTOR: f64 = 0.75;

/// Reserved ID marking an empty slot.
pub const EMPTY_ID: i32 = 0;

/// File name prefix of the side file that holds overflow buckets during a rehash.
pub const REHASH_FILE_PREFIX: &str = "rehash_";
