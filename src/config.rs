//! Build configuration.
//!
//! [`Config`] is the read-only bundle every installer consumes. It can be
//! loaded from a JSON file and then overridden from the command line via
//! [`Overrides`].

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::distribution::Distribution;
use crate::runtime::Runtime;

/// Target architecture, in the build system's own naming.
///
/// Distributions translate these into their native names via
/// [`Installer::architecture`](crate::distribution::Installer::architecture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Architecture {
    Alpha,
    Arc,
    Arm,
    Arm64,
    Ia64,
    Loongarch64,
    MipsLe,
    Mips64Le,
    Parisc,
    Ppc,
    Ppc64,
    Ppc64Le,
    Riscv32,
    Riscv64,
    S390,
    S390x,
    Tilegx,
    X86,
    X86_64,
}

impl Architecture {
    pub const ALL: [Architecture; 19] = [
        Architecture::Alpha,
        Architecture::Arc,
        Architecture::Arm,
        Architecture::Arm64,
        Architecture::Ia64,
        Architecture::Loongarch64,
        Architecture::MipsLe,
        Architecture::Mips64Le,
        Architecture::Parisc,
        Architecture::Ppc,
        Architecture::Ppc64,
        Architecture::Ppc64Le,
        Architecture::Riscv32,
        Architecture::Riscv64,
        Architecture::S390,
        Architecture::S390x,
        Architecture::Tilegx,
        Architecture::X86,
        Architecture::X86_64,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Alpha => "alpha",
            Architecture::Arc => "arc",
            Architecture::Arm => "arm",
            Architecture::Arm64 => "arm64",
            Architecture::Ia64 => "ia64",
            Architecture::Loongarch64 => "loongarch64",
            Architecture::MipsLe => "mips-le",
            Architecture::Mips64Le => "mips64-le",
            Architecture::Parisc => "parisc",
            Architecture::Ppc => "ppc",
            Architecture::Ppc64 => "ppc64",
            Architecture::Ppc64Le => "ppc64-le",
            Architecture::Riscv32 => "riscv32",
            Architecture::Riscv64 => "riscv64",
            Architecture::S390 => "s390",
            Architecture::S390x => "s390x",
            Architecture::Tilegx => "tilegx",
            Architecture::X86 => "x86",
            Architecture::X86_64 => "x86-64",
        }
    }

    /// The architecture this binary was compiled for.
    pub fn native() -> Self {
        // std reports "powerpc64" for both endiannesses
        if cfg!(all(target_arch = "powerpc64", target_endian = "little")) {
            return Architecture::Ppc64Le;
        }
        Self::from_host(std::env::consts::ARCH)
    }

    /// Map a Rust `target_arch` name, defaulting to x86-64 when it is unknown.
    fn from_host(arch: &str) -> Self {
        arch.parse().unwrap_or_else(|_| {
            warn!(
                "Unrecognised host architecture {}, defaulting to {}",
                arch,
                Architecture::X86_64
            );
            Architecture::X86_64
        })
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('_', "-");

        // uname-style aliases
        let normalized = match normalized.as_str() {
            "aarch64" => "arm64",
            "amd64" => "x86-64",
            "i386" | "i686" => "x86",
            "loong64" => "loongarch64",
            "powerpc" => "ppc",
            "powerpc64" => "ppc64",
            "ppc64le" => "ppc64-le",
            other => other,
        };

        Architecture::ALL
            .into_iter()
            .find(|arch| arch.as_str() == normalized)
            .ok_or_else(|| anyhow::anyhow!("Unknown architecture: {}", s))
    }
}

/// Read-only build configuration consumed by installers.
///
/// Optional string settings follow "truthy" semantics: an empty string is
/// treated the same as an unset value. Use the accessor methods rather than
/// the raw fields when making decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub distribution: Distribution,
    /// Requested release (None = the installer's default release)
    pub release: Option<String>,
    pub architecture: Architecture,
    /// Base URL replacing the distribution's default CDN
    pub mirror: Option<String>,
    /// Local repository overriding all remote repositories
    pub local_mirror: Option<String>,
    /// Historical snapshot selector
    pub snapshot: Option<String>,
    /// Fall back to remote GPG key URLs when a key is not installed locally
    pub repository_key_fetch: bool,
    /// Root under which `usr/share/distribution-gpg-keys` is searched
    pub tools_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            distribution: Distribution::default(),
            release: None,
            architecture: Architecture::native(),
            mirror: None,
            local_mirror: None,
            snapshot: None,
            repository_key_fetch: true,
            tools_root: PathBuf::from("/"),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Config {
    pub fn release(&self) -> Option<&str> {
        non_empty(&self.release)
    }

    pub fn mirror(&self) -> Option<&str> {
        non_empty(&self.mirror)
    }

    pub fn local_mirror(&self) -> Option<&str> {
        non_empty(&self.local_mirror)
    }

    pub fn snapshot(&self) -> Option<&str> {
        non_empty(&self.snapshot)
    }

    /// Default location of the configuration file: `<config_dir>/rootstrap/config.json`.
    pub fn default_path<R: Runtime + ?Sized>(runtime: &R) -> Option<PathBuf> {
        runtime
            .config_dir()
            .map(|dir| dir.join("rootstrap").join("config.json"))
    }

    /// Load configuration from a JSON file.
    pub fn load<R: Runtime + ?Sized>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load the explicitly requested file, else the default file if it exists,
    /// else built-in defaults.
    pub fn load_or_default<R: Runtime + ?Sized>(runtime: &R, path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(runtime, path);
        }

        match Self::default_path(runtime) {
            Some(path) if runtime.exists(&path) => {
                debug!("Loading config from {}", path.display());
                Self::load(runtime, &path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Command-line overrides applied on top of a loaded [`Config`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub distribution: Option<Distribution>,
    pub release: Option<String>,
    pub architecture: Option<Architecture>,
    pub mirror: Option<String>,
    pub local_mirror: Option<String>,
    pub snapshot: Option<String>,
    pub no_key_fetch: bool,
    pub tools_root: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(distribution) = self.distribution {
            config.distribution = distribution;
        }
        if let Some(architecture) = self.architecture {
            config.architecture = architecture;
        }
        if let Some(tools_root) = self.tools_root {
            config.tools_root = tools_root;
        }
        if self.no_key_fetch {
            config.repository_key_fetch = false;
        }
        config.release = self.release.or(config.release);
        config.mirror = self.mirror.or(config.mirror);
        config.local_mirror = self.local_mirror.or(config.local_mirror);
        config.snapshot = self.snapshot.or(config.snapshot);
        config
    }
}
