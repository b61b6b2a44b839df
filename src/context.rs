//! Per-run build context.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::distribution::Installer;

/// Everything an installer needs to know about the current build run.
///
/// Created once per run by [`Context::resolve`]; installers and drivers only
/// ever read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub config: Config,
    /// The release being built (requested, or the installer's default)
    pub release: String,
    /// The target architecture in the distribution's own naming (e.g. "aarch64")
    pub basearch: String,
    /// The image root the package manager installs into
    pub root: PathBuf,
    /// Scratch directory for package-manager configuration and caches
    pub workspace: PathBuf,
}

impl Context {
    /// Resolve release and native architecture for `installer` and build a context.
    ///
    /// Fails if the installer does not support the configured architecture.
    pub fn resolve(
        installer: &dyn Installer,
        config: Config,
        root: impl Into<PathBuf>,
        workspace: impl Into<PathBuf>,
    ) -> Result<Self> {
        let release = config
            .release()
            .unwrap_or(installer.default_release())
            .to_string();
        let basearch = installer.architecture(config.architecture)?.to_string();

        Ok(Self {
            config,
            release,
            basearch,
            root: root.into(),
            workspace: workspace.into(),
        })
    }

    /// Package-manager configuration tree (e.g. `etc/dnf`, `etc/yum.repos.d`).
    pub fn pkgmngr(&self) -> PathBuf {
        self.workspace.join("pkgmngr")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.workspace.join("cache")
    }

    /// Path of `relative` inside the image root.
    pub fn root_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative.as_ref().strip_prefix("/").unwrap_or(relative.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Architecture;
    use crate::distribution::MockInstaller;
    use crate::error::Error;
    use mockall::predicate::eq;

    fn mock_installer() -> MockInstaller {
        let mut installer = MockInstaller::new();
        installer.expect_default_release().return_const("latest");
        installer
            .expect_architecture()
            .with(eq(Architecture::Arm64))
            .returning(|_| Ok("aarch64"));
        installer
            .expect_architecture()
            .with(eq(Architecture::Ppc64Le))
            .returning(|arch| {
                Err(Error::Unsupported(format!("Architecture {} is not supported", arch)).into())
            });
        installer
    }

    #[test]
    fn test_resolve_uses_default_release() {
        let installer = mock_installer();
        let config = Config {
            architecture: Architecture::Arm64,
            ..Default::default()
        };

        let context = Context::resolve(&installer, config, "/image", "/work").unwrap();

        assert_eq!(context.release, "latest");
        assert_eq!(context.basearch, "aarch64");
        assert_eq!(context.pkgmngr(), PathBuf::from("/work/pkgmngr"));
        assert_eq!(context.cache_dir(), PathBuf::from("/work/cache"));
    }

    #[test]
    fn test_resolve_keeps_requested_release() {
        let installer = mock_installer();
        let config = Config {
            architecture: Architecture::Arm64,
            release: Some("2023.6.20241010".into()),
            ..Default::default()
        };

        let context = Context::resolve(&installer, config, "/image", "/work").unwrap();
        assert_eq!(context.release, "2023.6.20241010");
    }

    #[test]
    fn test_resolve_unsupported_architecture() {
        let installer = mock_installer();
        let config = Config {
            architecture: Architecture::Ppc64Le,
            ..Default::default()
        };

        let err = Context::resolve(&installer, config, "/image", "/work").unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Unsupported(_))));
    }

    #[test]
    fn test_root_path_strips_leading_slash() {
        let installer = mock_installer();
        let config = Config {
            architecture: Architecture::Arm64,
            ..Default::default()
        };
        let context = Context::resolve(&installer, config, "/image", "/work").unwrap();

        assert_eq!(context.root_path("/proc"), PathBuf::from("/image/proc"));
        assert_eq!(context.root_path("dev"), PathBuf::from("/image/dev"));
    }
}
