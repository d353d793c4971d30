/// Parses a 32-bit hash code given on the command line.
///
/// Accepts signed decimal (`42`, `-7`) and `0x`-prefixed hexadecimal
/// (`0xffffffff`), the latter being the form used by hash file dumps.
/// Hex values are read as the raw 32-bit pattern, so `0xffffffff` is `-1`.
///
/// # Examples
///
/// ```
/// use native_hash_file::utils::parse_hash;
///
/// assert_eq!(parse_hash("42"), Ok(42));
/// assert_eq!(parse_hash("-7"), Ok(-7));
/// assert_eq!(parse_hash("0x2A"), Ok(42));
/// assert_eq!(parse_hash("0xffffffff"), Ok(-1));
/// assert!(parse_hash("0x1ffffffff").is_err());
/// assert!(parse_hash("forty-two").is_err());
/// ```
pub fn parse_hash(hash_str: &str) -> Result<i32, String> {
    let hash_str = hash_str.trim().to_lowercase();

    if let Some(hex) = hash_str.strip_prefix("0x") {
        return u32::from_str_radix(hex, 16)
            .map(|n| n as i32)
            .map_err(|_| format!("Failed to parse hex hash: {}", hash_str));
    }

    hash_str
        .parse::<i32>()
        .map_err(|_| format!("Failed to parse hash: {}", hash_str))
}
