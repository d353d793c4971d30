use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Prepends `prefix` to the file name of `path`, keeping it in the same directory.
///
/// The result stays next to `path`, on the same filesystem, which is where
/// the rehash side file is created.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use native_hash_file::utils::prefix_file_name;
///
/// let path = Path::new("/data/values.hash");
/// assert_eq!(
///     prefix_file_name(path, "rehash_"),
///     PathBuf::from("/data/rehash_values.hash")
/// );
///
/// let bare = Path::new("values.hash");
/// assert_eq!(prefix_file_name(bare, "rehash_"), PathBuf::from("rehash_values.hash"));
/// ```
pub fn prefix_file_name(path: &Path, prefix: &str) -> PathBuf {
    let mut file_name = OsString::from(prefix);
    if let Some(name) = path.file_name() {
        file_name.push(name);
    }

    path.with_file_name(file_name)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_non_utf8_file_name_is_kept_exact() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("/data").join(OsStr::from_bytes(b"val\xffues.hash"));
        let prefixed = prefix_file_name(&path, "rehash_");

        assert_eq!(prefixed.parent(), Some(Path::new("/data")));
        assert_eq!(
            prefixed.file_name().unwrap().as_bytes(),
            b"rehash_val\xffues.hash"
        );
    }
}
