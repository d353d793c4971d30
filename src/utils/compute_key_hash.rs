use xxhash_rust::xxh3::xxh3_64;

/// Computes a 32-bit hash code for a key using XXH3.
///
/// The 64-bit XXH3 digest is folded into 32 bits by XOR-ing its halves, so
/// every input bit still influences the result. Used by the CLI to address
/// the index by a string key instead of a raw hash code.
///
/// # Examples
///
/// ```
/// use native_hash_file::utils::compute_key_hash;
///
/// assert_eq!(compute_key_hash(b"abc"), compute_key_hash(b"abc"));
/// assert_ne!(compute_key_hash(b"abc"), compute_key_hash(b"abd"));
/// ```
#[inline]
pub fn compute_key_hash(key: &[u8]) -> i32 {
    let digest = xxh3_64(key);
    ((digest >> 32) ^ digest) as u32 as i32
}
