//! Safe path resolution inside the storage root
//!
//! Every file-touching request passes through [`resolve_request_path`]; no
//! handler builds a file-system path any other way.

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::constants::ERR_INVALID_FILE_PATH;

/// Error type for path resolution failures
///
/// Sandbox rejections are recoverable: the handler reports them to the peer
/// and the session continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Empty/blank name, no usable final segment, or escape from the root
    InvalidPath,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath => write!(f, "{}", ERR_INVALID_FILE_PATH),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for io::Error {
    fn from(e: PathError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    }
}

/// Resolve a client-supplied file name against the storage root
///
/// Directory components are stripped: only the final path segment of
/// `raw_name` is kept, then joined to the root. Two layers of defense:
///
/// 1. The stripped name must be a single normal component (no `..`, no
///    root/prefix component, not empty or blank)
/// 2. The joined result must still start with the storage root
///
/// # Arguments
///
/// * `storage_root` - The sandbox directory. **Must** be an absolute,
///   canonical path (e.g. from `fs::canonicalize()`).
/// * `raw_name` - The untrusted file name from the wire
///
/// # Errors
///
/// Returns `InvalidPath` if the root is not absolute, the name is empty or
/// blank, the name has no usable final segment, or the result would escape
/// the root.
#[must_use = "path resolution result should be used"]
pub fn resolve_request_path(storage_root: &Path, raw_name: &str) -> Result<PathBuf, PathError> {
    if !storage_root.is_absolute() {
        return Err(PathError::InvalidPath);
    }

    let trimmed = raw_name.trim();
    if trimmed.is_empty() {
        return Err(PathError::InvalidPath);
    }

    // Keep only the final path segment ("a/b/c.txt" -> "c.txt").
    // file_name() is None for "..", "/", and trailing-separator paths.
    let file_name = Path::new(trimmed)
        .file_name()
        .ok_or(PathError::InvalidPath)?;

    // Layer 1: the segment must be exactly one normal component
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => return Err(PathError::InvalidPath),
    }

    let candidate = storage_root.join(file_name);

    // Layer 2: final guard against escapes
    if !candidate.starts_with(storage_root) {
        return Err(PathError::InvalidPath);
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;

    fn setup_root() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize");
        (temp_dir, root)
    }

    #[test]
    fn test_plain_name() {
        let (_temp, root) = setup_root();

        let resolved = resolve_request_path(&root, "report.txt").unwrap();
        assert_eq!(resolved, root.join("report.txt"));
    }

    #[test]
    fn test_directory_components_stripped() {
        let (_temp, root) = setup_root();

        let resolved = resolve_request_path(&root, "some/dir/report.txt").unwrap();
        assert_eq!(resolved, root.join("report.txt"));
    }

    #[test]
    fn test_traversal_keeps_final_segment() {
        let (_temp, root) = setup_root();

        // "../etc/passwd" sheds its directories; only "passwd" survives
        let resolved = resolve_request_path(&root, "../etc/passwd").unwrap();
        assert_eq!(resolved, root.join("passwd"));
        assert!(resolved.starts_with(&root));
    }

    #[test]
    fn test_absolute_path_keeps_final_segment() {
        let (_temp, root) = setup_root();

        let resolved = resolve_request_path(&root, "/etc/passwd").unwrap();
        assert_eq!(resolved, root.join("passwd"));
    }

    #[test]
    fn test_reject_empty_and_blank() {
        let (_temp, root) = setup_root();

        assert_eq!(resolve_request_path(&root, ""), Err(PathError::InvalidPath));
        assert_eq!(
            resolve_request_path(&root, "   "),
            Err(PathError::InvalidPath)
        );
        assert_eq!(
            resolve_request_path(&root, "\t"),
            Err(PathError::InvalidPath)
        );
    }

    #[test]
    fn test_reject_no_final_segment() {
        let (_temp, root) = setup_root();

        assert_eq!(
            resolve_request_path(&root, ".."),
            Err(PathError::InvalidPath)
        );
        assert_eq!(
            resolve_request_path(&root, "/"),
            Err(PathError::InvalidPath)
        );
        assert_eq!(
            resolve_request_path(&root, "a/.."),
            Err(PathError::InvalidPath)
        );
        assert_eq!(
            resolve_request_path(&root, "."),
            Err(PathError::InvalidPath)
        );
    }

    #[test]
    fn test_reject_relative_root() {
        let result = resolve_request_path(Path::new("relative/root"), "file.txt");
        assert_eq!(result, Err(PathError::InvalidPath));
    }

    #[test]
    fn test_name_is_trimmed() {
        let (_temp, root) = setup_root();

        let resolved = resolve_request_path(&root, "  notes.txt  ").unwrap();
        assert_eq!(resolved, root.join("notes.txt"));
    }

    #[test]
    fn test_resolution_never_escapes_root() {
        let (_temp, root) = setup_root();

        for name in [
            "../../outside",
            "../sibling/file",
            "/abs/file",
            "dir/../../file",
            "..\\windows\\style",
        ] {
            match resolve_request_path(&root, name) {
                Ok(path) => assert!(path.starts_with(&root), "{} escaped the root", name),
                Err(PathError::InvalidPath) => {}
            }
        }
    }
}
