//! Scratch directories for tests.

use std::path::{Path, PathBuf};

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Creates a temporary directory with a specific prefix.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}

/// Create `dir/sub` (and parents) and return it.
pub fn nested_dir(dir: &Path, sub: &str) -> PathBuf {
    let path = dir.join(sub);
    std::fs::create_dir_all(&path).expect("Failed to create nested test directory");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_test_dir() {
        let dir = temp_test_dir();
        assert!(dir.path().exists());
        // Dir is cleaned up when dropped
    }

    #[test]
    fn test_temp_test_dir_with_prefix() {
        let dir = temp_test_dir_with_prefix("tide_test_");
        let path_str = dir.path().to_string_lossy();
        assert!(path_str.contains("tide_test_"));
    }

    #[test]
    fn test_nested_dir() {
        let dir = temp_test_dir();
        let nested = nested_dir(dir.path(), "fes/ocean_tide");
        assert!(nested.is_dir());
        assert!(nested.ends_with("fes/ocean_tide"));
    }
}
