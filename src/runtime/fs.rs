//! File system operations (read, write, directory, glob).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self, contents))]
    pub(crate) fn write_impl(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents)
            .with_context(|| format!("Failed to write to file {}", path.display()))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn create_dir_all_impl(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn exists_impl(&self, path: &Path) -> bool {
        path.exists()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn glob_impl(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let paths = glob::glob(pattern)
            .with_context(|| format!("Invalid glob pattern: {}", pattern))?;

        // Unreadable directories are skipped rather than failing the whole search
        let mut matches: Vec<PathBuf> = paths.filter_map(|entry| entry.ok()).collect();
        matches.sort();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_write_and_read() {
        let dir = tempdir().unwrap();
        let runtime = RealRuntime;
        let nested = dir.path().join("etc/rpm");
        let file = nested.join("macros.dbpath");

        runtime.create_dir_all(&nested).unwrap();
        runtime.write(&file, b"%_dbpath /var/lib/rpm\n").unwrap();

        assert!(runtime.exists(&file));
        assert_eq!(
            runtime.read_to_string(&file).unwrap(),
            "%_dbpath /var/lib/rpm\n"
        );
    }

    #[test]
    fn test_real_runtime_read_missing_file_names_path() {
        let dir = tempdir().unwrap();
        let runtime = RealRuntime;
        let missing = dir.path().join("missing.json");

        let err = runtime.read_to_string(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_real_runtime_glob_recursive() {
        let dir = tempdir().unwrap();
        let runtime = RealRuntime;
        let keys = dir.path().join("usr/share/distribution-gpg-keys/amazon-linux");
        runtime.create_dir_all(&keys).unwrap();
        runtime
            .write(&keys.join("RPM-GPG-KEY-amazon-linux-2023"), b"key")
            .unwrap();

        let pattern = format!(
            "{}/usr/share/distribution-gpg-keys/**/RPM-GPG-KEY-amazon-linux-2023",
            dir.path().display()
        );
        let found = runtime.glob(&pattern).unwrap();

        assert_eq!(found, vec![keys.join("RPM-GPG-KEY-amazon-linux-2023")]);
    }

    #[test]
    fn test_real_runtime_glob_no_match() {
        let dir = tempdir().unwrap();
        let runtime = RealRuntime;
        let pattern = format!("{}/**/nothing-here", dir.path().display());

        assert!(runtime.glob(&pattern).unwrap().is_empty());
    }

    #[test]
    fn test_real_runtime_glob_invalid_pattern() {
        let runtime = RealRuntime;
        assert!(runtime.glob("/tmp/[unclosed").is_err());
    }
}
