//! GPG key discovery for RPM repositories.

use anyhow::{Result, anyhow};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

use crate::context::Context;
use crate::error::Error;
use crate::runtime::Runtime;

/// Resolves a well-known GPG key name to the URLs the package manager should
/// verify packages against.
#[cfg_attr(test, mockall::automock)]
pub trait KeyLookup: Send + Sync {
    /// Find `key`, returning one or more key URLs. `fallback` is the remote
    /// location to use when the key is not available locally.
    fn find_key(&self, context: &Context, key: &str, fallback: &str) -> Result<Vec<String>>;
}

/// Looks for keys shipped by `distribution-gpg-keys` or dropped into the
/// package-manager tree, falling back to a remote URL when allowed.
pub struct RpmKeyFinder {
    runtime: Arc<dyn Runtime>,
}

impl RpmKeyFinder {
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self { runtime }
    }

    /// Directories searched for keys, in order.
    fn search_dirs(context: &Context) -> [PathBuf; 2] {
        [
            context
                .config
                .tools_root
                .join("usr/share/distribution-gpg-keys"),
            context.pkgmngr().join("etc/pki/rpm-gpg"),
        ]
    }

    fn find_local(&self, dir: &Path, key: &str) -> Result<Option<PathBuf>> {
        let pattern = format!("{}/**/{}", glob::Pattern::escape(&dir.to_string_lossy()), key);
        Ok(self.runtime.glob(&pattern)?.into_iter().next())
    }

    fn file_url(path: &Path) -> Result<String> {
        Url::from_file_path(path)
            .map(String::from)
            .map_err(|()| anyhow!("GPG key path is not absolute: {}", path.display()))
    }
}

impl KeyLookup for RpmKeyFinder {
    fn find_key(&self, context: &Context, key: &str, fallback: &str) -> Result<Vec<String>> {
        for dir in Self::search_dirs(context) {
            if let Some(path) = self.find_local(&dir, key)? {
                debug!("Found GPG key {} at {}", key, path.display());
                return Ok(vec![Self::file_url(&path)?]);
            }
        }

        if context.config.repository_key_fetch {
            info!("GPG key {} not installed locally, using {}", key, fallback);
            return Ok(vec![fallback.to_string()]);
        }

        Err(Error::GpgKeyNotFound {
            key: key.to_string(),
        }
        .into())
    }
}
