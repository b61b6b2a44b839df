//! Amazon Linux 2023.

use anyhow::Result;
use log::debug;

use super::{Distribution, Installer, RpmFamily, join_mirror};
use crate::config::Architecture;
use crate::context::Context;
use crate::error::Error;
use crate::rpm::RpmRepository;

const GPG_KEY: &str = "RPM-GPG-KEY-amazon-linux-2023";
const GPG_KEY_URL: &str = "https://raw.githubusercontent.com/rpm-software-management/distribution-gpg-keys/refs/heads/main/keys/amazon-linux/RPM-GPG-KEY-amazon-linux-2023";
const CDN_MIRRORLIST: &str = "mirrorlist=https://cdn.amazonlinux.com/al2023/core/mirrors/$releasever";

/// Installer for Amazon Linux 2023, built on the shared RPM-family plumbing.
pub struct AmazonLinux {
    rpm: RpmFamily,
}

impl AmazonLinux {
    pub fn new(rpm: RpmFamily) -> Self {
        Self { rpm }
    }
}

impl Installer for AmazonLinux {
    fn distribution(&self) -> Distribution {
        Distribution::Amazon
    }

    fn pretty_name(&self) -> &'static str {
        "Amazon Linux 2023"
    }

    fn default_release(&self) -> &'static str {
        "latest"
    }

    fn filesystem(&self) -> &'static str {
        "ext4"
    }

    fn setup(&self, context: &Context) -> Result<()> {
        let repositories = self.repositories(context)?;
        self.rpm
            .setup(context, "/var/lib/rpm", &repositories, false)
    }

    fn install(&self, context: &Context) -> Result<()> {
        self.rpm.install(context, &["filesystem"], false)
    }

    fn repositories(&self, context: &Context) -> Result<Vec<RpmRepository>> {
        if context.config.snapshot().is_some() {
            return Err(Error::Unsupported(format!(
                "Snapshot= is not supported for {}",
                self.pretty_name()
            ))
            .into());
        }

        let gpgurls = self.rpm.find_gpgkey(context, GPG_KEY, GPG_KEY_URL)?;

        if let Some(local_mirror) = context.config.local_mirror() {
            debug!("Using local mirror {}", local_mirror);
            return Ok(vec![RpmRepository::new(
                "base",
                format!("baseurl={}", local_mirror),
                &gpgurls,
            )]);
        }

        let repositories = if let Some(mirror) = context.config.mirror() {
            let url = format!("baseurl={}", join_mirror(mirror, "core/mirrors/$releasever"));
            vec![
                RpmRepository::new("base", format!("{url}/$basearch"), &gpgurls),
                RpmRepository::new("debug", format!("{url}/debuginfo/$basearch"), &gpgurls)
                    .disabled(),
                RpmRepository::new("source", format!("{url}/SRPMS"), &gpgurls).disabled(),
            ]
        } else {
            let url = CDN_MIRRORLIST;
            vec![
                RpmRepository::new("base", format!("{url}/$basearch/mirror.list"), &gpgurls),
                RpmRepository::new(
                    "debug",
                    format!("{url}/debuginfo/$basearch/mirror.list"),
                    &gpgurls,
                )
                .disabled(),
                RpmRepository::new("source", format!("{url}/SRPMS/mirror.list"), &gpgurls)
                    .disabled(),
            ]
        };

        Ok(repositories)
    }

    fn architecture(&self, arch: Architecture) -> Result<&'static str> {
        let native = match arch {
            Architecture::Arm64 => Some("aarch64"),
            Architecture::X86_64 => Some("x86_64"),
            _ => None,
        };

        native.ok_or_else(|| {
            Error::Unsupported(format!(
                "Architecture {} is not supported by {}",
                arch,
                self.pretty_name()
            ))
            .into()
        })
    }
}
