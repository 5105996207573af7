//! Recursive copy of addon sources

use std::fs;
use std::path::Path;

use crate::error::{IoResultExt, Result};

/// Copy a single file, replacing any existing file at `dest`
///
/// The parent of `dest` must already exist.
pub fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    fs::copy(source, dest).at(dest)?;
    Ok(())
}

/// Copy a directory tree into `dest`, merging with anything already there
///
/// The parent of `dest` must already exist.
pub fn copy_directory(source: &Path, dest: &Path) -> Result<()> {
    if !dest.is_dir() {
        fs::create_dir(dest).at(dest)?;
    }

    copy_directory_contents(source, dest)
}

fn copy_directory_contents(source: &Path, dest: &Path) -> Result<()> {
    for entry in fs::read_dir(source).at(source)? {
        let entry = entry.at(source)?;
        let path = entry.path();
        let dest_path = dest.join(entry.file_name());

        if path.is_dir() {
            copy_directory(&path, &dest_path)?;
        } else if path.is_file() {
            copy_file(&path, &dest_path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_directory_nested() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");

        let subdir = src.join("subdir");
        fs::create_dir_all(&subdir).unwrap();
        fs::write(src.join("root.txt"), "root").unwrap();
        fs::write(subdir.join("nested.txt"), "nested").unwrap();

        copy_directory(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("root.txt")).unwrap(), "root");
        assert_eq!(fs::read_to_string(dst.join("subdir/nested.txt")).unwrap(), "nested");
    }

    #[test]
    fn test_copy_directory_empty() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir(&src).unwrap();

        copy_directory(&src, &dst).unwrap();

        assert!(dst.is_dir());
    }

    #[test]
    fn test_copy_directory_requires_parent() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir(&src).unwrap();

        assert!(copy_directory(&src, &tmp.path().join("missing/dst")).is_err());
    }
}
