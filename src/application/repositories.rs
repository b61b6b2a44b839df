//! Repositories use case - show which repositories a build would use.

use std::path::PathBuf;

use anyhow::Result;

use crate::config::Config;
use crate::context::Context;
use crate::distribution::InstallerRegistry;
use crate::rpm::RpmRepository;

/// Repositories action - resolves the repository list without installing anything.
pub struct RepositoriesAction<'a> {
    registry: &'a InstallerRegistry,
}

impl<'a> RepositoriesAction<'a> {
    pub fn new(registry: &'a InstallerRegistry) -> Self {
        Self { registry }
    }

    /// Repositories for `config`, as the installer would register them.
    pub fn list(&self, config: Config, workspace: PathBuf) -> Result<Vec<RpmRepository>> {
        let installer = self.registry.resolve(config.distribution)?;
        let root = workspace.join("root");
        let context = Context::resolve(installer.as_ref(), config, root, workspace)?;
        installer.repositories(&context)
    }
}
