use crate::error::Result;
use crate::hash_index::{Bucket, HashFile};
use std::iter::FusedIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// The initial bucket has not been read yet.
    Unstarted,
    /// Next slot to inspect in the current bucket.
    Slot(usize),
    Exhausted,
}

/// Iterator over the IDs stored under one hash code.
///
/// Walks the normal bucket for the query hash and then its overflow chain,
/// one record at a time. The iterator owns its bucket buffer and never
/// aliases the writer's buffers; borrowing the [`HashFile`] keeps inserts
/// and growth out while it is alive.
///
/// ## Behavior:
/// - **Lazy**: the first bucket is read on the first call to `next()`.
/// - **Exact hash match only**: a yielded ID may still belong to a different
///   value with a colliding hash.
/// - **Empty slots are skipped**, so a query for hash `0` never yields the
///   reserved ID `0`.
/// - **Fused**: after the end of the chain, or after an I/O error has been
///   yielded, every further call returns `None`.
pub struct IdIterator<'a> {
    hash_file: &'a HashFile,
    query_hash: i32,
    bucket: Bucket,
    bucket_offset: u64,
    cursor: Cursor,
}

impl<'a> IdIterator<'a> {
    pub(crate) fn new(hash_file: &'a HashFile, query_hash: i32) -> Self {
        Self {
            hash_file,
            query_hash,
            bucket: hash_file.new_bucket(),
            bucket_offset: hash_file.bucket_offset(query_hash),
            cursor: Cursor::Unstarted,
        }
    }

    /// The hash code this iterator matches against.
    pub fn query_hash(&self) -> i32 {
        self.query_hash
    }

    fn load_bucket(&mut self, offset: u64) -> Result<()> {
        self.bucket_offset = offset;
        self.hash_file.read_bucket(offset, &mut self.bucket)
    }
}

impl Iterator for IdIterator<'_> {
    type Item = Result<i32>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let slot = match self.cursor {
                Cursor::Exhausted => return None,
                Cursor::Unstarted => {
                    if let Err(e) = self.load_bucket(self.bucket_offset) {
                        self.cursor = Cursor::Exhausted;
                        return Some(Err(e));
                    }
                    0
                }
                Cursor::Slot(slot) => slot,
            };

            for slot in slot..self.bucket.bucket_size() {
                if self.bucket.hash_at(slot) == self.query_hash && !self.bucket.is_slot_empty(slot)
                {
                    self.cursor = Cursor::Slot(slot + 1);
                    return Some(Ok(self.bucket.id_at(slot)));
                }
            }

            // Current bucket exhausted, continue with its overflow bucket
            let overflow_id = self.bucket.overflow_id();
            if overflow_id == 0 {
                self.cursor = Cursor::Exhausted;
                return None;
            }

            let offset = self.hash_file.overflow_offset(overflow_id);
            if let Err(e) = self.load_bucket(offset) {
                self.cursor = Cursor::Exhausted;
                return Some(Err(e));
            }
            self.cursor = Cursor::Slot(0);
        }
    }
}

impl FusedIterator for IdIterator<'_> {}
