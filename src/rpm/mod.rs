//! RPM-family building blocks shared by every RPM-based installer.
//!
//! - [`RpmRepository`] - one package repository and its trust material
//! - [`setup_rpm`] - rpm macro configuration for the package-manager tree
//! - [`KeyLookup`] / [`RpmKeyFinder`] - GPG key discovery

mod gpg;

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::Context;
use crate::runtime::Runtime;

pub use gpg::{KeyLookup, RpmKeyFinder};

#[cfg(test)]
pub use gpg::MockKeyLookup;

/// A package repository as understood by the RPM package-manager driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpmRepository {
    /// Repository identifier, unique within one repository list
    pub id: String,
    /// Access configuration: either `baseurl=<url>` or `mirrorlist=<url>`
    pub url: String,
    /// GPG key URLs used to verify packages from this repository
    pub gpgurls: Vec<String>,
    pub enabled: bool,
}

impl RpmRepository {
    /// Create an enabled repository.
    pub fn new(id: impl Into<String>, url: impl Into<String>, gpgurls: &[String]) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            gpgurls: gpgurls.to_vec(),
            enabled: true,
        }
    }

    /// Mark the repository as disabled by default.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl fmt::Display for RpmRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {}",
            self.id,
            if self.enabled { "enabled" } else { "disabled" },
            self.url
        )
    }
}

/// Point rpm at `dbpath` by writing `etc/rpm/macros.dbpath` into the
/// package-manager tree. Safe to call repeatedly.
pub fn setup_rpm<R: Runtime + ?Sized>(runtime: &R, context: &Context, dbpath: &str) -> Result<()> {
    let macros_dir = context.pkgmngr().join("etc/rpm");
    runtime.create_dir_all(&macros_dir)?;

    let macros = macros_dir.join("macros.dbpath");
    debug!("Setting rpm database path to {} in {}", dbpath, macros.display());
    runtime.write(&macros, format!("%_dbpath {}\n", dbpath).as_bytes())
}
