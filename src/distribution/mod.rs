//! Distribution installer abstraction.
//!
//! Every supported distribution is an [`Installer`]: a stateless policy object
//! that knows the distribution's repositories, GPG keys, and architecture
//! naming, and delegates the actual package installation to a
//! [`PackageManager`](crate::dnf::PackageManager). The orchestrator picks one
//! through the [`InstallerRegistry`] by [`Distribution`].

mod amazonlinux;
mod registry;
mod rpm_family;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::Architecture;
use crate::context::Context;
use crate::error::Error;
use crate::rpm::RpmRepository;

pub use amazonlinux::AmazonLinux;
pub use registry::InstallerRegistry;
pub use rpm_family::RpmFamily;

/// Distribution identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    Fedora,
    Centos,
    Rhel,
    Alma,
    Rocky,
    #[default]
    Amazon,
}

impl Distribution {
    pub const ALL: [Distribution; 6] = [
        Distribution::Fedora,
        Distribution::Centos,
        Distribution::Rhel,
        Distribution::Alma,
        Distribution::Rocky,
        Distribution::Amazon,
    ];

    /// Comma separated list of every known name, for diagnostics.
    pub fn names() -> String {
        Distribution::ALL
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distribution::Fedora => write!(f, "fedora"),
            Distribution::Centos => write!(f, "centos"),
            Distribution::Rhel => write!(f, "rhel"),
            Distribution::Alma => write!(f, "alma"),
            Distribution::Rocky => write!(f, "rocky"),
            Distribution::Amazon => write!(f, "amazon"),
        }
    }
}

impl FromStr for Distribution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fedora" => Ok(Distribution::Fedora),
            "centos" => Ok(Distribution::Centos),
            "rhel" => Ok(Distribution::Rhel),
            "alma" => Ok(Distribution::Alma),
            "rocky" => Ok(Distribution::Rocky),
            "amazon" | "amazonlinux" => Ok(Distribution::Amazon),
            _ => Err(Error::UnknownDistribution(s.to_string())),
        }
    }
}

/// The contract every distribution installer implements.
///
/// Implementations carry no per-build state: every method is a function of
/// its arguments, so the same installer serves any number of build runs.
/// Unsupported configurations fail with
/// [`Error::Unsupported`](crate::error::Error::Unsupported).
#[cfg_attr(test, mockall::automock)]
pub trait Installer: Send + Sync {
    /// Registry key.
    fn distribution(&self) -> Distribution;

    /// Human readable name, used in diagnostics.
    fn pretty_name(&self) -> &'static str;

    /// Release built when none is requested.
    fn default_release(&self) -> &'static str;

    /// Default root filesystem type.
    fn filesystem(&self) -> &'static str;

    /// Prepare package-manager state and register the repositories.
    fn setup(&self, context: &Context) -> Result<()>;

    /// Install the minimal package set into the image root.
    fn install(&self, context: &Context) -> Result<()>;

    /// Repositories for this build, in registration order.
    ///
    /// Recomputed on every call; identical contexts yield identical lists.
    fn repositories(&self, context: &Context) -> Result<Vec<RpmRepository>>;

    /// Translate `arch` into the distribution's native architecture name.
    fn architecture(&self, arch: Architecture) -> Result<&'static str>;
}

/// Join `link` onto `mirror`, treating the mirror as a directory.
///
/// ```
/// use rootstrap::distribution::join_mirror;
///
/// assert_eq!(
///     join_mirror("https://example.org/al/", "/core/mirrors"),
///     "https://example.org/al/core/mirrors"
/// );
/// ```
pub fn join_mirror(mirror: &str, link: &str) -> String {
    format!(
        "{}/{}",
        mirror.strip_suffix('/').unwrap_or(mirror),
        link.strip_prefix('/').unwrap_or(link)
    )
}
