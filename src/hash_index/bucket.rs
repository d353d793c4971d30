use crate::hash_index::constants::*;

/// In-memory staging buffer for one on-disk bucket record.
///
/// ## Record Layout
///
/// - **Offset `0` → `8 × bucket_size`**: `bucket_size` slots, each a big-endian
///   `(hash: i32, id: i32)` pair
/// - **Last `4` bytes**: 1-based ID of the next overflow bucket, or `0` if none
///
/// A slot is empty iff its ID field is `0`.
///
/// The buffer owns its bytes; a `Bucket` is never shared between the writer
/// and a lookup in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    bytes: Vec<u8>,
    bucket_size: usize,
}

impl Bucket {
    /// Creates a zero-filled record (all slots empty, no overflow link).
    pub fn empty(bucket_size: usize) -> Self {
        Self {
            bytes: vec![0u8; ITEM_SIZE * bucket_size + OVERFLOW_LINK_SIZE],
            bucket_size,
        }
    }

    #[inline]
    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    #[inline]
    pub fn record_size(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable view used to read a record straight from disk into the buffer.
    #[inline]
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Zero-fills the buffer so it can be reused for another record.
    #[inline]
    pub fn reset(&mut self) {
        self.bytes.fill(0);
    }

    #[inline]
    pub fn hash_at(&self, slot: usize) -> i32 {
        self.get_int(ITEM_SIZE * slot)
    }

    #[inline]
    pub fn id_at(&self, slot: usize) -> i32 {
        self.get_int(ITEM_SIZE * slot + 4)
    }

    #[inline]
    pub fn is_slot_empty(&self, slot: usize) -> bool {
        self.id_at(slot) == EMPTY_ID
    }

    #[inline]
    pub fn set_slot(&mut self, slot: usize, hash: i32, id: i32) {
        self.put_int(ITEM_SIZE * slot, hash);
        self.put_int(ITEM_SIZE * slot + 4, id);
    }

    #[inline]
    pub fn clear_slot(&mut self, slot: usize) {
        self.set_slot(slot, 0, EMPTY_ID);
    }

    /// Index of the first slot whose ID is `0`.
    pub fn find_empty_slot(&self) -> Option<usize> {
        (0..self.bucket_size).find(|&slot| self.is_slot_empty(slot))
    }

    /// 1-based ID of the next overflow bucket in the chain (`0` terminates).
    #[inline]
    pub fn overflow_id(&self) -> u32 {
        self.get_int(ITEM_SIZE * self.bucket_size) as u32
    }

    #[inline]
    pub fn set_overflow_id(&mut self, overflow_id: u32) {
        self.put_int(ITEM_SIZE * self.bucket_size, overflow_id as i32);
    }

    /// Iterates `(slot, hash, id)` for every occupied slot.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, i32, i32)> + '_ {
        (0..self.bucket_size)
            .filter(|&slot| !self.is_slot_empty(slot))
            .map(|slot| (slot, self.hash_at(slot), self.id_at(slot)))
    }

    #[inline]
    fn get_int(&self, at: usize) -> i32 {
        i32::from_be_bytes([
            self.bytes[at],
            self.bytes[at + 1],
            self.bytes[at + 2],
            self.bytes[at + 3],
        ])
    }

    #[inline]
    fn put_int(&mut self, at: usize, value: i32) {
        self.bytes[at..at + 4].copy_from_slice(&value.to_be_bytes());
    }
}
