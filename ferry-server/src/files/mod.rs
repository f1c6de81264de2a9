//! Storage root management and directory listing

use std::path::{Path, PathBuf};

use crate::constants::{ERR_CANONICALIZE_STORAGE_ROOT, ERR_CREATE_STORAGE_ROOT};

pub mod path;

pub use path::{PathError, resolve_request_path};

/// Initialize the storage root directory
///
/// Creates the directory if needed and returns its canonicalized path,
/// ready for use with `resolve_request_path()`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or canonicalized.
pub fn init_storage_root(root: &Path) -> Result<PathBuf, String> {
    std::fs::create_dir_all(root)
        .map_err(|e| format!("{}{}: {}", ERR_CREATE_STORAGE_ROOT, root.display(), e))?;

    // Canonicalize for security - resolve_request_path() relies on an
    // absolute root for its starts_with() check
    root.canonicalize()
        .map_err(|e| format!("{}{}", ERR_CANONICALIZE_STORAGE_ROOT, e))
}

/// List the regular files directly under the storage root
///
/// Non-recursive; directories and other non-file entries are skipped.
/// Names are sorted so repeated listings are identical.
pub async fn list_storage_root(root: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(root).await?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names.sort();
    Ok(names)
}

/// Format a file listing for the peer
///
/// 1-based numbered entries with a trailing count line; `(No files found)`
/// stands in for the entries when the root is empty.
#[must_use]
pub fn format_listing(label: &str, names: &[String]) -> String {
    let mut listing = format!("Files in {}:\n", label);

    if names.is_empty() {
        listing.push_str("(No files found)");
    } else {
        for (index, name) in names.iter().enumerate() {
            listing.push_str(&format!("{}. {}\n", index + 1, name));
        }
        // Drop the final newline so the blank line before the total is single
        listing.pop();
    }

    listing.push_str(&format!("\n\nTotal: {} file(s)", names.len()));
    listing
}

/// Display label for the storage root (its directory name)
#[must_use]
pub fn root_label(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_init_storage_root_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("storage");

        assert!(!root.exists());
        let canonical = init_storage_root(&root).unwrap();
        assert!(canonical.is_absolute());
        assert!(canonical.exists());
    }

    #[test]
    fn test_init_storage_root_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("storage");

        init_storage_root(&root).unwrap();
        init_storage_root(&root).unwrap();
        assert!(root.exists());
    }

    #[tokio::test]
    async fn test_list_skips_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        std::fs::write(root.join("a.txt"), b"a").unwrap();
        std::fs::write(root.join("b.txt"), b"b").unwrap();
        std::fs::create_dir(root.join("subdir")).unwrap();

        let names = list_storage_root(root).await.unwrap();
        assert_eq!(names, vec!["a.txt".to_string(), "b.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        std::fs::write(root.join("zebra"), b"").unwrap();
        std::fs::write(root.join("apple"), b"").unwrap();
        std::fs::write(root.join("mango"), b"").unwrap();

        let names = list_storage_root(root).await.unwrap();
        assert_eq!(names, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_format_listing_empty() {
        let listing = format_listing("Data", &[]);
        assert_eq!(listing, "Files in Data:\n(No files found)\n\nTotal: 0 file(s)");
    }

    #[test]
    fn test_format_listing_numbered() {
        let names = vec!["alpha.bin".to_string(), "beta.txt".to_string()];
        let listing = format_listing("Data", &names);
        assert_eq!(
            listing,
            "Files in Data:\n1. alpha.bin\n2. beta.txt\n\nTotal: 2 file(s)"
        );
    }

    #[test]
    fn test_root_label_uses_directory_name() {
        assert_eq!(root_label(Path::new("/srv/ferry/Data")), "Data");
    }
}
