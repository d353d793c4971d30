use crate::error::{HashFileError, Result};
use crate::hash_index::constants::*;
use crate::hash_index::positional_io::{read_exact_at, read_up_to_at, write_all_at};
use crate::hash_index::{Bucket, FileHeader, HashFileOptions, IdIterator};
use crate::utils::{prefix_file_name, verify_file_existence};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Upper bound on the number of empty records written per call when
/// initializing or doubling the normal bucket region.
const EMPTY_BUCKET_BATCH: u64 = 1024;

/// Persistent hash index mapping 32-bit hash codes to dictionary IDs.
///
/// The file consists of a 16-byte [`FileHeader`], `bucket_count` normal
/// bucket records, and any number of overflow bucket records appended after
/// the normal region. Overflow buckets are numbered `1..=N` in allocation
/// order and are linked from full buckets through the trailing overflow
/// field of each record.
///
/// The index only filters by hash: [`HashFile::lookup`] yields every stored
/// ID whose hash matches, and callers must compare the actual values to
/// resolve collisions.
///
/// # Concurrency
/// No internal locking is performed. Writers take `&mut self`, so the borrow
/// checker already rules out a lookup running concurrently with an insert or
/// a growth pass on the same handle.
///
/// # Durability
/// Header counters are only persisted by [`HashFile::sync`]. A failure in the
/// middle of a growth pass can leave the file torn; there is no journal.
#[derive(Debug)]
pub struct HashFile {
    file: File,
    path: PathBuf,
    force_sync: bool,

    /// Number of normal (non-overflow) buckets.
    bucket_count: u32,

    /// Number of slots per bucket; fixed at creation.
    bucket_size: u32,

    /// Number of occupied slots across normal and overflow buckets.
    item_count: u32,

    /// `ITEM_SIZE * bucket_size + OVERFLOW_LINK_SIZE`
    record_size: usize,
}

impl HashFile {
    /// Opens (or creates) a hash file with default options.
    ///
    /// An empty file is initialized with `64` buckets of `8` slots each;
    /// otherwise the header is read and validated.
    ///
    /// # Returns:
    /// - `Ok(HashFile)` on success.
    /// - `Err(HashFileError)` if the file cannot be opened or its header is
    ///   not a compatible hash file header.
    pub fn open(path: &Path) -> Result<Self> {
        HashFileOptions::new().open(path)
    }

    /// Opens (or creates) a hash file, optionally forcing every [`HashFile::sync`]
    /// through to stable storage.
    pub fn open_with_sync(path: &Path, force_sync: bool) -> Result<Self> {
        HashFileOptions::new().force_sync(force_sync).open(path)
    }

    /// Opens an **existing** hash file without creating it.
    ///
    /// # Returns:
    /// - `Err(HashFileError::Io)` with `NotFound` if the file does not exist,
    ///   or `InvalidInput` if the path is not a regular file.
    pub fn open_existing(path: &Path) -> Result<Self> {
        verify_file_existence(path)?;
        HashFileOptions::new().create(false).open(path)
    }

    pub(crate) fn open_with_options(path: &Path, options: &HashFileOptions) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(options.create)
            .open(path)?;

        let file_len = file.metadata()?.len();

        if file_len == 0 {
            let mut hash_file = Self {
                file,
                path: path.to_path_buf(),
                force_sync: options.force_sync,
                bucket_count: options.initial_bucket_count,
                bucket_size: options.initial_bucket_size,
                item_count: 0,
                record_size: 0,
            };
            hash_file.record_size = hash_file.header().record_size();

            hash_file.write_empty_buckets(HEADER_LENGTH, hash_file.bucket_count as u64)?;
            hash_file.sync()?;

            debug!(
                "Created hash file {} with {} buckets of {} slots.",
                path.display(),
                hash_file.bucket_count,
                hash_file.bucket_size
            );

            return Ok(hash_file);
        }

        let header = Self::read_file_header(&file)?;

        debug!(
            "Opened hash file {}: {} buckets of {} slots, {} items.",
            path.display(),
            header.bucket_count,
            header.bucket_size,
            header.item_count
        );

        Ok(Self {
            file,
            path: path.to_path_buf(),
            force_sync: options.force_sync,
            bucket_count: header.bucket_count,
            bucket_size: header.bucket_size,
            item_count: header.item_count,
            record_size: header.record_size(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bucket_count(&self) -> u32 {
        self.bucket_count
    }

    pub fn bucket_size(&self) -> u32 {
        self.bucket_size
    }

    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Current size of the file in bytes, overflow buckets included.
    pub fn file_size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Number of overflow buckets currently allocated past the normal region.
    pub fn overflow_bucket_count(&self) -> Result<u64> {
        let overflow_bytes = self.file_size()?.saturating_sub(self.table_size());
        Ok(overflow_bytes / self.record_size as u64)
    }

    /// Returns a lazy iterator over the IDs stored under `hash`.
    ///
    /// No I/O happens until the first call to `next()`. The iterator walks the
    /// bucket for `hash` and then its overflow chain, yielding every ID whose
    /// stored hash equals `hash`. IDs are not deduplicated and their order is
    /// unspecified.
    pub fn lookup(&self, hash: i32) -> IdIterator<'_> {
        IdIterator::new(self, hash)
    }

    /// Collects every ID stored under `hash`.
    pub fn lookup_ids(&self, hash: i32) -> Result<Vec<i32>> {
        self.lookup(hash).collect()
    }

    /// Stores `id` under `hash`.
    ///
    /// The ID is placed in the first empty slot of the hash's bucket chain,
    /// allocating a new overflow bucket if every bucket in the chain is full.
    /// If the insertion pushes `item_count` to `LOAD_FACTOR` of the table's
    /// slot capacity, the number of buckets is doubled before returning.
    ///
    /// The index does not deduplicate: storing the same pair twice yields the
    /// ID twice from [`HashFile::lookup`].
    ///
    /// # Returns:
    /// - `Err(HashFileError::ReservedId)` if `id` is `0`. Nothing is written.
    /// - `Err(HashFileError::CapacityExceeded)` if the item count would pass
    ///   `i32::MAX`, or if the insertion would require more than `i32::MAX`
    ///   buckets. Nothing is written.
    /// - `Err(HashFileError::Io)` on any read or write failure.
    pub fn store_id(&mut self, hash: i32, id: i32) -> Result<()> {
        if id == EMPTY_ID {
            return Err(HashFileError::ReservedId);
        }

        let item_count = self
            .item_count
            .checked_add(1)
            .filter(|&count| count <= i32::MAX as u32)
            .ok_or_else(|| self.capacity_exceeded())?;

        let needs_growth = item_count as f64 >= LOAD_FACTOR * self.slot_capacity() as f64;
        if needs_growth && self.grown_bucket_count().is_none() {
            return Err(self.capacity_exceeded());
        }

        let bucket_offset = self.bucket_offset(hash);
        self.store_at(bucket_offset, hash, id)?;

        self.item_count = item_count;

        if needs_growth {
            self.increase_hash_table()?;
        }

        Ok(())
    }

    /// Removes every stored ID and discards all overflow buckets.
    ///
    /// The bucket count is left unchanged.
    pub fn clear(&mut self) -> Result<()> {
        self.file.set_len(self.table_size())?;
        self.write_empty_buckets(HEADER_LENGTH, self.bucket_count as u64)?;
        self.item_count = 0;

        debug!("Cleared hash file {}.", self.path.display());
        Ok(())
    }

    /// Writes the bucket count, bucket size and item count to the file header.
    ///
    /// When the file was opened with `force_sync`, file contents are also
    /// flushed to stable storage.
    pub fn sync(&mut self) -> Result<()> {
        write_all_at(&self.file, &self.header().serialize(), 0)?;

        if self.force_sync {
            self.file.sync_data()?;
        }

        Ok(())
    }

    /// Closes the file.
    ///
    /// Consuming `self` makes any further operation on the handle a compile
    /// error. The header is **not** written; call [`HashFile::sync`] first to
    /// persist the counters.
    pub fn close(self) -> Result<()> {
        if self.force_sync {
            self.file.sync_all()?;
        }

        debug!("Closed hash file {}.", self.path.display());
        Ok(())
    }

    /// Writes a human-readable listing of every normal and overflow bucket.
    ///
    /// Intended for debugging; the output format is not stable.
    pub fn dump_contents<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "*** hash file contents ***")?;

        writeln!(out, "bucket_count={}", self.bucket_count)?;
        writeln!(out, "bucket_size={}", self.bucket_size)?;
        writeln!(out, "item_count={}", self.item_count)?;

        let mut bucket = self.new_bucket();

        writeln!(out, "---Buckets---")?;

        for bucket_no in 0..self.bucket_count as u64 {
            self.read_bucket(self.normal_offset(bucket_no), &mut bucket)?;
            self.dump_bucket(out, bucket_no + 1, &bucket)?;
        }

        writeln!(out, "---Overflow Buckets---")?;

        for overflow_id in 1..=self.overflow_bucket_count()? {
            self.read_bucket(self.overflow_offset(overflow_id as u32), &mut bucket)?;
            self.dump_bucket(out, overflow_id, &bucket)?;
        }

        writeln!(out, "*** end of hash file contents ***")?;
        writeln!(out)?;

        Ok(())
    }

    fn dump_bucket<W: Write>(&self, out: &mut W, bucket_no: u64, bucket: &Bucket) -> Result<()> {
        write!(out, "Bucket {}: ", bucket_no)?;

        for slot in 0..bucket.bucket_size() {
            if slot > 0 {
                write!(out, " ")?;
            }
            write!(out, "[{:08x},{}]", bucket.hash_at(slot), bucket.id_at(slot))?;
        }

        writeln!(out, "---> {}", bucket.overflow_id())?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Bucket store
    // ---------------------------------------------------------------------

    #[inline]
    fn header(&self) -> FileHeader {
        FileHeader::new(self.bucket_count, self.bucket_size, self.item_count)
    }

    #[inline]
    fn slot_capacity(&self) -> u64 {
        self.bucket_count as u64 * self.bucket_size as u64
    }

    /// End of the normal bucket region.
    #[inline]
    fn table_size(&self) -> u64 {
        HEADER_LENGTH + self.bucket_count as u64 * self.record_size as u64
    }

    /// Bucket count after one doubling, if it stays within `i32::MAX`.
    #[inline]
    fn grown_bucket_count(&self) -> Option<u32> {
        self.bucket_count
            .checked_mul(2)
            .filter(|&count| count <= i32::MAX as u32)
    }

    fn capacity_exceeded(&self) -> HashFileError {
        HashFileError::CapacityExceeded {
            item_count: self.item_count,
            bucket_count: self.bucket_count,
        }
    }

    pub(crate) fn new_bucket(&self) -> Bucket {
        Bucket::empty(self.bucket_size as usize)
    }

    #[inline]
    fn normal_offset(&self, bucket_no: u64) -> u64 {
        HEADER_LENGTH + bucket_no * self.record_size as u64
    }

    /// Offset of the normal bucket for `hash`. Negative hashes wrap to a
    /// non-negative bucket number.
    #[inline]
    pub(crate) fn bucket_offset(&self, hash: i32) -> u64 {
        let bucket_no = (hash as i64).rem_euclid(self.bucket_count as i64) as u64;
        self.normal_offset(bucket_no)
    }

    /// Offset of the overflow bucket with the given 1-based ID.
    #[inline]
    pub(crate) fn overflow_offset(&self, overflow_id: u32) -> u64 {
        self.normal_offset(self.bucket_count as u64 + overflow_id as u64 - 1)
    }

    pub(crate) fn read_bucket(&self, offset: u64, bucket: &mut Bucket) -> Result<()> {
        read_exact_at(&self.file, bucket.as_mut_bytes(), offset)?;
        Ok(())
    }

    fn write_bucket(&self, offset: u64, bucket: &Bucket) -> Result<()> {
        write_all_at(&self.file, bucket.as_bytes(), offset)?;
        Ok(())
    }

    /// Appends one empty record and returns its 1-based overflow ID.
    fn allocate_overflow_bucket(&self) -> Result<u32> {
        let offset = self.file_size()?;
        self.write_empty_buckets(offset, 1)?;

        let record_no = (offset - HEADER_LENGTH) / self.record_size as u64;
        let overflow_id = (record_no - self.bucket_count as u64 + 1) as u32;

        trace!("Allocated overflow bucket {} at offset {}.", overflow_id, offset);
        Ok(overflow_id)
    }

    fn write_empty_buckets(&self, offset: u64, count: u64) -> Result<()> {
        let record_size = self.record_size as u64;
        let batch = count.min(EMPTY_BUCKET_BATCH);
        let zeros = vec![0u8; (batch * record_size) as usize];

        let mut written = 0;
        while written < count {
            let n = (count - written).min(batch);
            write_all_at(
                &self.file,
                &zeros[..(n * record_size) as usize],
                offset + written * record_size,
            )?;
            written += n;
        }

        Ok(())
    }

    fn read_file_header(file: &File) -> Result<FileHeader> {
        let mut buf = [0u8; HEADER_LENGTH as usize];
        let len = read_up_to_at(file, &mut buf, 0)?;
        let header = FileHeader::deserialize(&buf[..len])?;

        header.validate_file_len(file.metadata()?.len())?;

        Ok(header)
    }

    // ---------------------------------------------------------------------
    // Insertion / growth
    // ---------------------------------------------------------------------

    /// Stores the pair in the first empty slot of the chain starting at
    /// `bucket_offset`, extending the chain with a new overflow bucket when
    /// the chain is full. Does not touch `item_count`.
    fn store_at(&self, mut bucket_offset: u64, hash: i32, id: i32) -> Result<()> {
        let mut bucket = self.new_bucket();

        loop {
            self.read_bucket(bucket_offset, &mut bucket)?;

            if let Some(slot) = bucket.find_empty_slot() {
                bucket.set_slot(slot, hash, id);
                return self.write_bucket(bucket_offset, &bucket);
            }

            let mut overflow_id = bucket.overflow_id();

            if overflow_id == 0 {
                overflow_id = self.allocate_overflow_bucket()?;

                bucket.set_overflow_id(overflow_id);
                self.write_bucket(bucket_offset, &bucket)?;
            }

            bucket_offset = self.overflow_offset(overflow_id);
        }
    }

    /// Doubles the number of buckets and rehashes the stored items.
    ///
    /// Overflow buckets are first moved aside into a `rehash_` side file and
    /// the file is truncated to the old normal region, which is then doubled.
    /// Items in normal buckets either stay put or move to bucket
    /// `i + old_bucket_count`; both buckets are written at most once. Items
    /// from the side file are then re-inserted through the regular chain
    /// search, which may allocate fresh overflow buckets.
    fn increase_hash_table(&mut self) -> Result<()> {
        let start_time = Instant::now();

        let old_bucket_count = self.bucket_count;
        let new_bucket_count = self
            .grown_bucket_count()
            .ok_or_else(|| self.capacity_exceeded())?;

        let old_table_size = self.table_size();
        let old_file_size = self.file_size()?;

        debug!(
            "Increasing hash table {} from {} to {} buckets...",
            self.path.display(),
            old_bucket_count,
            new_bucket_count
        );

        // Move any overflow buckets out of the way
        let side_file = if old_file_size > old_table_size {
            Some(self.move_overflow_buckets(old_table_size, old_file_size)?)
        } else {
            None
        };

        self.file.set_len(old_table_size)?;
        self.write_empty_buckets(old_table_size, old_bucket_count as u64)?;
        self.bucket_count = new_bucket_count;

        self.rehash_normal_buckets(old_bucket_count)?;

        if let Some((tmp_path, tmp_file)) = side_file {
            self.rehash_overflow_buckets(&tmp_file)?;

            drop(tmp_file);
            if let Err(e) = fs::remove_file(&tmp_path) {
                warn!(
                    "Failed to remove rehash file {}: {}",
                    tmp_path.display(),
                    e
                );
            }
        }

        info!(
            "Rehashed {} items into {} buckets in {:?}.",
            self.item_count,
            self.bucket_count,
            start_time.elapsed()
        );

        Ok(())
    }

    /// Copies `[from, to)` into a fresh side file next to the hash file.
    fn move_overflow_buckets(&self, from: u64, to: u64) -> Result<(PathBuf, File)> {
        let tmp_path = prefix_file_name(&self.path, REHASH_FILE_PREFIX);

        let mut tmp_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;

        let mut source = &self.file;
        source.seek(SeekFrom::Start(from))?;
        let copied = io::copy(&mut source.take(to - from), &mut tmp_file)?;

        if copied != to - from {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("moved {} of {} overflow bytes", copied, to - from),
            )
            .into());
        }

        debug!(
            "Moved {} overflow buckets to {}.",
            copied / self.record_size as u64,
            tmp_path.display()
        );

        Ok((tmp_path, tmp_file))
    }

    /// Splits each of the first `old_bucket_count` buckets between itself and
    /// its sibling `i + old_bucket_count`, and drops stale overflow links.
    fn rehash_normal_buckets(&self, old_bucket_count: u32) -> Result<()> {
        let mut bucket = self.new_bucket();
        let mut new_bucket = self.new_bucket();

        for bucket_no in 0..old_bucket_count as u64 {
            let bucket_offset = self.normal_offset(bucket_no);
            self.read_bucket(bucket_offset, &mut bucket)?;

            let mut bucket_changed = false;
            let mut moved = 0;
            let mut new_bucket_offset = 0;

            for slot in 0..bucket.bucket_size() {
                if bucket.is_slot_empty(slot) {
                    continue;
                }

                let hash = bucket.hash_at(slot);
                let new_offset = self.bucket_offset(hash);

                if new_offset != bucket_offset {
                    debug_assert_eq!(
                        new_offset,
                        self.normal_offset(bucket_no + old_bucket_count as u64)
                    );

                    new_bucket.set_slot(moved, hash, bucket.id_at(slot));
                    moved += 1;

                    bucket.clear_slot(slot);
                    bucket_changed = true;
                    new_bucket_offset = new_offset;
                }
            }

            if moved > 0 {
                self.write_bucket(new_bucket_offset, &new_bucket)?;
                new_bucket.reset();
            }

            // Overflow buckets are being discarded
            if bucket.overflow_id() != 0 {
                bucket.set_overflow_id(0);
                bucket_changed = true;
            }

            if bucket_changed {
                self.write_bucket(bucket_offset, &bucket)?;
            }
        }

        Ok(())
    }

    /// Re-inserts every item held in the side file under the new geometry.
    fn rehash_overflow_buckets(&self, tmp_file: &File) -> Result<()> {
        let record_size = self.record_size as u64;
        let tmp_file_size = tmp_file.metadata()?.len();
        let mut bucket = self.new_bucket();

        let mut offset = 0;
        while offset + record_size <= tmp_file_size {
            read_exact_at(tmp_file, bucket.as_mut_bytes(), offset)?;

            for (_, hash, id) in bucket.occupied() {
                self.store_at(self.bucket_offset(hash), hash, id)?;
            }

            offset += record_size;
        }

        Ok(())
    }
}
