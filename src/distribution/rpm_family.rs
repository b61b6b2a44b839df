//! Behaviour shared by RPM-based installers.

use anyhow::Result;
use std::sync::Arc;

use crate::context::Context;
use crate::dnf::PackageManager;
use crate::rpm::{KeyLookup, RpmRepository, setup_rpm};
use crate::runtime::Runtime;

/// Shared setup/install plumbing for RPM-based distributions.
///
/// Variants embed one of these and supply only their own policy
/// (repositories, keys, architecture names).
pub struct RpmFamily {
    runtime: Arc<dyn Runtime>,
    package_manager: Arc<dyn PackageManager>,
    keys: Arc<dyn KeyLookup>,
}

impl RpmFamily {
    pub fn new(
        runtime: Arc<dyn Runtime>,
        package_manager: Arc<dyn PackageManager>,
        keys: Arc<dyn KeyLookup>,
    ) -> Self {
        Self {
            runtime,
            package_manager,
            keys,
        }
    }

    pub fn find_gpgkey(&self, context: &Context, key: &str, fallback: &str) -> Result<Vec<String>> {
        self.keys.find_key(context, key, fallback)
    }

    /// Configure the rpm database location, then register `repositories`.
    pub fn setup(
        &self,
        context: &Context,
        dbpath: &str,
        repositories: &[RpmRepository],
        filelists: bool,
    ) -> Result<()> {
        setup_rpm(self.runtime.as_ref(), context, dbpath)?;
        self.package_manager.setup(context, repositories, filelists)
    }

    pub fn install(&self, context: &Context, packages: &[&str], apivfs: bool) -> Result<()> {
        let packages: Vec<String> = packages.iter().map(|p| p.to_string()).collect();
        self.package_manager.install(context, &packages, apivfs)
    }
}
