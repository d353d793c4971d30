/// Formats a byte count for the `info` listing.
///
/// Sizes below 1 KiB are shown as raw bytes; larger sizes use the largest
/// binary unit (KB, MB, GB, TB) that keeps the value at or above `1.00`.
///
/// # Examples
/// ```
/// use native_hash_file::utils::format_bytes;
///
/// assert_eq!(format_bytes(1_104), "1.08 KB");
/// assert_eq!(format_bytes(68), "68 bytes");
/// assert_eq!(format_bytes(4_368), "4.27 KB");
/// assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MB");
/// assert_eq!(format_bytes(5 * 1024 * 1024 * 1024 * 1024), "5.00 TB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} bytes", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", value, UNITS[unit])
}
