use anyhow::Result;
use clap::Parser;
use rootstrap::application::{BootstrapAction, RepositoriesAction};
use rootstrap::config::{Architecture, Config, Overrides};
use rootstrap::distribution::{Distribution, InstallerRegistry};
use rootstrap::runtime::RealRuntime;
use std::path::PathBuf;
use std::sync::Arc;

/// rootstrap - bootstrap minimal distribution root filesystems
///
/// Resolves the package repositories, GPG keys and architecture naming for a
/// distribution and drives its package manager to populate an image root.
///
/// Examples:
///   rootstrap repositories --json          # Show the repositories that would be used
///   rootstrap install --root /tmp/al2023   # Install a minimal Amazon Linux 2023 tree
#[derive(Parser, Debug)]
#[command(author, version = env!("ROOTSTRAP_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to <config dir>/rootstrap/config.json if present)
    #[arg(long, env = "ROOTSTRAP_CONFIG", value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Distribution to build
    #[arg(long, short = 'd', env = "ROOTSTRAP_DISTRIBUTION", global = true)]
    distribution: Option<Distribution>,

    /// Release to build (defaults to the distribution's default release)
    #[arg(long, short = 'r', env = "ROOTSTRAP_RELEASE", global = true)]
    release: Option<String>,

    /// Target architecture (defaults to the host architecture)
    #[arg(long, short = 'a', env = "ROOTSTRAP_ARCHITECTURE", global = true)]
    architecture: Option<Architecture>,

    /// Mirror base URL replacing the distribution's default CDN
    #[arg(long, short = 'm', env = "ROOTSTRAP_MIRROR", value_name = "URL", global = true)]
    mirror: Option<String>,

    /// Local repository overriding all remote repositories
    #[arg(long, env = "ROOTSTRAP_LOCAL_MIRROR", value_name = "PATH", global = true)]
    local_mirror: Option<String>,

    /// Historical package snapshot to build from
    #[arg(long, env = "ROOTSTRAP_SNAPSHOT", global = true)]
    snapshot: Option<String>,

    /// Fail instead of fetching GPG keys that are not installed locally
    #[arg(long, env = "ROOTSTRAP_NO_KEY_FETCH", global = true)]
    no_key_fetch: bool,

    /// Root under which usr/share/distribution-gpg-keys is searched
    #[arg(long, env = "ROOTSTRAP_TOOLS_ROOT", value_name = "PATH", global = true)]
    tools_root: Option<PathBuf>,

    /// Scratch directory for package-manager configuration and caches
    #[arg(long, short = 'w', env = "ROOTSTRAP_WORKSPACE", value_name = "PATH", global = true)]
    workspace: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List the distributions that can be built
    Distributions,

    /// Show the package repositories a build would use
    Repositories(RepositoriesArgs),

    /// Install a minimal root filesystem
    Install(InstallArgs),
}

#[derive(clap::Args, Debug)]
pub struct RepositoriesArgs {
    /// Print the repositories as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Directory to install into
    #[arg(long, value_name = "PATH")]
    pub root: PathBuf,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            distribution: self.distribution,
            release: self.release.clone(),
            architecture: self.architecture,
            mirror: self.mirror.clone(),
            local_mirror: self.local_mirror.clone(),
            snapshot: self.snapshot.clone(),
            no_key_fetch: self.no_key_fetch,
            tools_root: self.tools_root.clone(),
        }
    }

    fn workspace(&self) -> PathBuf {
        self.workspace
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("rootstrap"))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = Arc::new(RealRuntime);

    let config = cli
        .overrides()
        .apply(Config::load_or_default(runtime.as_ref(), cli.config.as_deref())?);
    let registry = InstallerRegistry::with_defaults(runtime.clone());

    match &cli.command {
        Commands::Distributions => {
            for installer in registry.installers() {
                println!(
                    "{:<10} {:<20} release={} filesystem={}",
                    installer.distribution(),
                    installer.pretty_name(),
                    installer.default_release(),
                    installer.filesystem()
                );
            }
        }
        Commands::Repositories(args) => {
            let repositories = RepositoriesAction::new(&registry).list(config, cli.workspace())?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&repositories)?);
            } else {
                for repo in &repositories {
                    println!("{}", repo);
                }
            }
        }
        Commands::Install(args) => {
            BootstrapAction::new(&registry, runtime.as_ref()).run(
                config,
                args.root.clone(),
                cli.workspace(),
            )?;
        }
    }
    Ok(())
}
