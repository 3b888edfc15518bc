// Key helpers shared by the address model and the listing engine
use crate::storage::constants::PATH_SEPARATOR;

/// A key ending with the separator marks a pseudo-directory with no content.
pub fn is_folder_marker(key: &str) -> bool {
    key.ends_with(PATH_SEPARATOR)
}

/// Parent folder of a key, with its trailing '/'. Keys without a separator
/// live at the bucket root, whose folder is "".
///
/// `parent_folder("a/b/c.txt") == "a/b/"`, `parent_folder("c.txt") == ""`.
pub fn parent_folder(key: &str) -> String {
    let trimmed = key.strip_suffix(PATH_SEPARATOR).unwrap_or(key);
    match trimmed.rfind(PATH_SEPARATOR) {
        Some(idx) => trimmed[..=idx].to_string(),
        None => String::new(),
    }
}
