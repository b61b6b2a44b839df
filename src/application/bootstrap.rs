//! Bootstrap use case - materialize a minimal root filesystem.

use std::path::PathBuf;

use anyhow::Result;
use log::{info, warn};

use crate::config::Config;
use crate::context::Context;
use crate::distribution::InstallerRegistry;
use crate::runtime::Runtime;

/// Bootstrap action - runs `setup` then `install` for the configured distribution.
pub struct BootstrapAction<'a, R: Runtime + ?Sized> {
    registry: &'a InstallerRegistry,
    runtime: &'a R,
}

impl<'a, R: Runtime + ?Sized> BootstrapAction<'a, R> {
    pub fn new(registry: &'a InstallerRegistry, runtime: &'a R) -> Self {
        Self { registry, runtime }
    }

    /// Bootstrap `root`, using `workspace` for package-manager state.
    ///
    /// Returns the context the build ran with.
    pub fn run(&self, config: Config, root: PathBuf, workspace: PathBuf) -> Result<Context> {
        let installer = self.registry.resolve(config.distribution)?;

        if !self.runtime.is_privileged() {
            warn!(
                "Not running as root, installing into {} will likely fail",
                root.display()
            );
        }

        let context = Context::resolve(installer.as_ref(), config, root, workspace)?;
        info!(
            "Bootstrapping {} {} ({}) into {}",
            installer.pretty_name(),
            context.release,
            context.basearch,
            context.root.display()
        );

        installer.setup(&context)?;
        installer.install(&context)?;

        info!(
            "Bootstrapped {} into {}",
            installer.pretty_name(),
            context.root.display()
        );
        Ok(context)
    }
}
