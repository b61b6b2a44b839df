//! Package-manager drivers.
//!
//! Installers describe *what* to install and from *where*; a
//! [`PackageManager`] knows how to hand that to the actual tool.

mod config;

use anyhow::Result;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use crate::context::Context;
use crate::rpm::RpmRepository;
use crate::runtime::Runtime;

pub use config::{render_dnf_conf, render_repo_file};

/// A package-manager driver.
#[cfg_attr(test, mockall::automock)]
pub trait PackageManager: Send + Sync {
    /// Register `repositories` with the package manager. When `filelists` is
    /// false, file list metadata is not downloaded.
    fn setup(&self, context: &Context, repositories: &[RpmRepository], filelists: bool) -> Result<()>;

    /// Install `packages` into the image root. When `apivfs` is true, `/proc`,
    /// `/sys` and `/dev` are mounted in the root for the duration of the install.
    fn install(&self, context: &Context, packages: &[String], apivfs: bool) -> Result<()>;
}

/// API filesystems mounted into the root when `apivfs` is requested:
/// (mount arguments, target relative to the root).
const APIVFS: [(&[&str], &str); 3] = [
    (&["-t", "proc", "proc"], "proc"),
    (&["-t", "sysfs", "sysfs"], "sys"),
    (&["--bind", "/dev"], "dev"),
];

/// Drives `dnf` on the host.
pub struct Dnf {
    runtime: Arc<dyn Runtime>,
}

impl Dnf {
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self { runtime }
    }

    pub fn conf_path(context: &Context) -> PathBuf {
        context.pkgmngr().join("etc/dnf/dnf.conf")
    }

    pub fn repos_dir(context: &Context) -> PathBuf {
        context.pkgmngr().join("etc/yum.repos.d")
    }

    /// Full `dnf` argument list for installing `packages`.
    pub fn install_args(context: &Context, packages: &[String]) -> Vec<String> {
        let mut args = vec![
            "--assumeyes".to_string(),
            format!("--installroot={}", context.root.display()),
            format!("--releasever={}", context.release),
            format!("--forcearch={}", context.basearch),
            format!("--config={}", Self::conf_path(context).display()),
            format!("--setopt=reposdir={}", Self::repos_dir(context).display()),
            format!(
                "--setopt=cachedir={}",
                context.cache_dir().join("dnf").display()
            ),
            "--setopt=install_weak_deps=0".to_string(),
            "install".to_string(),
        ];
        args.extend(packages.iter().cloned());
        args
    }

    /// Run `f` with the API filesystems mounted in the root, unmounting
    /// whatever was mounted afterwards even when `f` or a later mount fails.
    fn with_apivfs(&self, context: &Context, f: impl FnOnce() -> Result<()>) -> Result<()> {
        let mut mounted = Vec::new();
        let mut result = Ok(());

        for (options, target) in APIVFS {
            let dest = context.root_path(target);
            let mount = self.runtime.create_dir_all(&dest).and_then(|_| {
                let mut args: Vec<String> = options.iter().map(|o| o.to_string()).collect();
                args.push(dest.display().to_string());
                self.runtime.run("mount", &args)
            });

            if let Err(err) = mount {
                result = Err(err);
                break;
            }
            mounted.push(dest);
        }

        if result.is_ok() {
            result = f();
        }

        for dest in mounted.iter().rev() {
            if let Err(err) = self.runtime.run("umount", &[dest.display().to_string()]) {
                warn!("Failed to unmount {}: {:#}", dest.display(), err);
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }

        result
    }
}

impl PackageManager for Dnf {
    fn setup(&self, context: &Context, repositories: &[RpmRepository], filelists: bool) -> Result<()> {
        let conf = Self::conf_path(context);
        let repos_dir = Self::repos_dir(context);

        if let Some(parent) = conf.parent() {
            self.runtime.create_dir_all(parent)?;
        }
        self.runtime.create_dir_all(&repos_dir)?;

        self.runtime
            .write(&conf, render_dnf_conf(filelists).as_bytes())?;

        let repo_file = repos_dir.join("rootstrap.repo");
        for repo in repositories {
            debug!("Registering repository {}", repo);
        }
        self.runtime
            .write(&repo_file, render_repo_file(repositories).as_bytes())?;

        info!(
            "Configured {} repositories in {}",
            repositories.len(),
            repo_file.display()
        );
        Ok(())
    }

    fn install(&self, context: &Context, packages: &[String], apivfs: bool) -> Result<()> {
        self.runtime.create_dir_all(&context.root)?;

        let args = Self::install_args(context, packages);
        info!(
            "Installing {} into {}",
            packages.join(" "),
            context.root.display()
        );

        if apivfs {
            self.with_apivfs(context, || self.runtime.run("dnf", &args))
        } else {
            self.runtime.run("dnf", &args)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::runtime::MockRuntime;
    use mockall::Sequence;
    use mockall::predicate::eq;
    use std::path::Path;

    fn context() -> Context {
        Context {
            config: Config::default(),
            release: "latest".into(),
            basearch: "aarch64".into(),
            root: PathBuf::from("/image"),
            workspace: PathBuf::from("/work"),
        }
    }

    fn repositories() -> Vec<RpmRepository> {
        let keys = vec!["file:///key".to_string()];
        vec![
            RpmRepository::new("base", "baseurl=https://m/$basearch", &keys),
            RpmRepository::new("source", "baseurl=https://m/SRPMS", &keys).disabled(),
        ]
    }

    #[test]
    fn test_install_args() {
        let args = Dnf::install_args(&context(), &["filesystem".to_string()]);

        assert_eq!(
            args,
            vec![
                "--assumeyes",
                "--installroot=/image",
                "--releasever=latest",
                "--forcearch=aarch64",
                "--config=/work/pkgmngr/etc/dnf/dnf.conf",
                "--setopt=reposdir=/work/pkgmngr/etc/yum.repos.d",
                "--setopt=cachedir=/work/cache/dnf",
                "--setopt=install_weak_deps=0",
                "install",
                "filesystem",
            ]
        );
    }

    #[test_log::test]
    fn test_setup_writes_conf_and_repo_file() {
        let mut runtime = MockRuntime::new();
        runtime.expect_create_dir_all().returning(|_| Ok(()));
        runtime
            .expect_write()
            .withf(|path, contents| {
                path == Path::new("/work/pkgmngr/etc/dnf/dnf.conf")
                    && !String::from_utf8_lossy(contents).contains("filelists")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        runtime
            .expect_write()
            .withf(|path, contents| {
                let contents = String::from_utf8_lossy(contents);
                path == Path::new("/work/pkgmngr/etc/yum.repos.d/rootstrap.repo")
                    && contents.contains("[base]")
                    && contents.contains("[source]")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let dnf = Dnf::new(Arc::new(runtime));
        dnf.setup(&context(), &repositories(), false).unwrap();
    }

    #[test]
    fn test_setup_with_filelists() {
        let mut runtime = MockRuntime::new();
        runtime.expect_create_dir_all().returning(|_| Ok(()));
        runtime
            .expect_write()
            .withf(|path, contents| {
                path == Path::new("/work/pkgmngr/etc/dnf/dnf.conf")
                    && String::from_utf8_lossy(contents)
                        .contains("optional_metadata_types=filelists")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        runtime
            .expect_write()
            .withf(|path, _| path == Path::new("/work/pkgmngr/etc/yum.repos.d/rootstrap.repo"))
            .times(1)
            .returning(|_, _| Ok(()));

        let dnf = Dnf::new(Arc::new(runtime));
        dnf.setup(&context(), &repositories(), true).unwrap();
    }

    #[test_log::test]
    fn test_install_without_apivfs_runs_dnf_only() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_create_dir_all()
            .with(eq(PathBuf::from("/image")))
            .returning(|_| Ok(()));
        runtime
            .expect_run()
            .withf(|program, args| {
                program == "dnf" && args.last().map(String::as_str) == Some("filesystem")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let dnf = Dnf::new(Arc::new(runtime));
        dnf.install(&context(), &["filesystem".to_string()], false)
            .unwrap();
    }

    #[test]
    fn test_install_with_apivfs_mounts_and_unmounts_in_order() {
        let mut runtime = MockRuntime::new();
        let mut seq = Sequence::new();
        runtime.expect_create_dir_all().returning(|_| Ok(()));

        for target in ["/image/proc", "/image/sys", "/image/dev"] {
            runtime
                .expect_run()
                .withf(move |program, args| {
                    program == "mount" && args.last().map(String::as_str) == Some(target)
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(()));
        }
        runtime
            .expect_run()
            .withf(|program, _| program == "dnf")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        for target in ["/image/dev", "/image/sys", "/image/proc"] {
            runtime
                .expect_run()
                .withf(move |program, args| program == "umount" && args == [target.to_string()])
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(()));
        }

        let dnf = Dnf::new(Arc::new(runtime));
        dnf.install(&context(), &["bash".to_string()], true).unwrap();
    }

    #[test]
    fn test_install_failure_still_unmounts() {
        let mut runtime = MockRuntime::new();
        runtime.expect_create_dir_all().returning(|_| Ok(()));
        runtime
            .expect_run()
            .withf(|program, _| program == "mount")
            .times(3)
            .returning(|_, _| Ok(()));
        runtime
            .expect_run()
            .withf(|program, _| program == "dnf")
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("dnf failed with exit status: 1")));
        runtime
            .expect_run()
            .withf(|program, _| program == "umount")
            .times(3)
            .returning(|_, _| Ok(()));

        let dnf = Dnf::new(Arc::new(runtime));
        let err = dnf
            .install(&context(), &["bash".to_string()], true)
            .unwrap_err();
        assert!(err.to_string().contains("dnf failed"));
    }

    #[test]
    fn test_partial_mount_failure_unmounts_mounted() {
        let mut runtime = MockRuntime::new();
        runtime.expect_create_dir_all().returning(|_| Ok(()));
        runtime
            .expect_run()
            .withf(|program, args| {
                program == "mount" && args.last().map(String::as_str) == Some("/image/proc")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        runtime
            .expect_run()
            .withf(|program, args| {
                program == "mount" && args.last().map(String::as_str) == Some("/image/sys")
            })
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("mount failed")));
        runtime
            .expect_run()
            .withf(|program, args| program == "umount" && args == ["/image/proc".to_string()])
            .times(1)
            .returning(|_, _| Ok(()));

        let dnf = Dnf::new(Arc::new(runtime));
        let err = dnf
            .install(&context(), &["bash".to_string()], true)
            .unwrap_err();
        assert!(err.to_string().contains("mount failed"));
    }
}
