//! Installer registry.
//!
//! Maps [`Distribution`] identifiers to the installer that builds them.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::{AmazonLinux, Distribution, Installer, RpmFamily};
use crate::dnf::Dnf;
use crate::rpm::RpmKeyFinder;
use crate::runtime::Runtime;

/// Registry of distribution installers.
///
/// The registry allows:
/// - Registering installers by distribution
/// - Resolving the installer for a distribution or distribution name
/// - Listing everything that can be built
pub struct InstallerRegistry {
    installers: HashMap<Distribution, Arc<dyn Installer>>,
}

impl InstallerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            installers: HashMap::new(),
        }
    }

    /// Create a registry with every built-in installer, wired to `dnf` and
    /// the local GPG key search on `runtime`.
    pub fn with_defaults(runtime: Arc<dyn Runtime>) -> Self {
        let dnf = Arc::new(Dnf::new(runtime.clone()));
        let keys = Arc::new(RpmKeyFinder::new(runtime.clone()));

        let mut registry = Self::new();
        registry.register(Arc::new(AmazonLinux::new(RpmFamily::new(
            runtime, dnf, keys,
        ))));
        registry
    }

    /// Register an installer for its distribution.
    ///
    /// If an installer is already registered for that distribution, it will be replaced.
    pub fn register(&mut self, installer: Arc<dyn Installer>) {
        let distribution = installer.distribution();
        self.installers.insert(distribution, installer);
    }

    /// Get a registered installer by distribution.
    pub fn get(&self, distribution: Distribution) -> Option<&Arc<dyn Installer>> {
        self.installers.get(&distribution)
    }

    /// Check if an installer is registered for a distribution.
    pub fn has(&self, distribution: Distribution) -> bool {
        self.installers.contains_key(&distribution)
    }

    pub fn len(&self) -> usize {
        self.installers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installers.is_empty()
    }

    /// Resolve the installer for a distribution.
    ///
    /// Returns an error if no installer is registered for it.
    pub fn resolve(&self, distribution: Distribution) -> Result<&Arc<dyn Installer>> {
        self.installers
            .get(&distribution)
            .with_context(|| format!("No installer registered for distribution: {}", distribution))
    }

    /// Resolve the installer for a distribution name (case-insensitive).
    pub fn resolve_name(&self, name: &str) -> Result<&Arc<dyn Installer>> {
        self.resolve(name.parse()?)
    }

    /// All registered installers, ordered by distribution.
    pub fn installers(&self) -> Vec<&Arc<dyn Installer>> {
        let mut distributions: Vec<_> = self.installers.keys().copied().collect();
        distributions.sort();
        distributions
            .into_iter()
            .filter_map(|d| self.installers.get(&d))
            .collect()
    }
}

impl Default for InstallerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
