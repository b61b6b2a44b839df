//! Runtime abstraction for system operations.
//!
//! Installers and package-manager drivers never touch the host directly;
//! everything goes through [`Runtime`] so the policy code can be exercised
//! against a mock.
//!
//! # Structure
//!
//! - `fs` - File system operations (read, write, directory, glob)
//! - `env` - Host directories and privilege information
//! - `process` - Running external programs

mod env;
mod fs;
mod process;

use anyhow::Result;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // File System
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;

    /// Expand a shell-style glob pattern, returning matches in sorted order.
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>>;

    // Directories
    fn config_dir(&self) -> Option<PathBuf>;

    // Privilege
    fn is_privileged(&self) -> bool;

    // Processes
    /// Run `program` with `args` and wait for it. A non-zero exit status is an error.
    fn run(&self, program: &str, args: &[String]) -> Result<()>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        self.glob_impl(pattern)
    }

    fn config_dir(&self) -> Option<PathBuf> {
        self.config_dir_impl()
    }

    fn is_privileged(&self) -> bool {
        self.is_privileged_impl()
    }

    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        self.run_impl(program, args)
    }
}
