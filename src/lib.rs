//! Distribution installers for building OS images.
//!
//! An [`Installer`](distribution::Installer) carries everything that is
//! specific to one Linux distribution: which repositories to use, which GPG
//! keys to trust, and what the distribution calls each CPU architecture. The
//! package installation itself is delegated to a
//! [`PackageManager`](dnf::PackageManager) driver.

pub mod application;
pub mod config;
pub mod context;
pub mod distribution;
pub mod dnf;
pub mod error;
pub mod rpm;
pub mod runtime;
