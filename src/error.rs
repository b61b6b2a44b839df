//! Typed errors raised by installers and their collaborators.
//!
//! Everything else in the crate returns `anyhow::Result`; these variants are
//! carried inside `anyhow::Error` so callers can recover them with
//! `downcast_ref::<Error>()`.

use thiserror::Error;

use crate::distribution::Distribution;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested configuration cannot be built for this distribution.
    #[error("{0}")]
    Unsupported(String),

    /// The name does not match any known distribution.
    #[error("Unknown distribution: {}. Expected one of: {}.", .0, Distribution::names())]
    UnknownDistribution(String),

    /// A GPG key was not found locally and fetching it remotely is disabled.
    #[error("{key} GPG key not found in /usr/share/distribution-gpg-keys")]
    GpgKeyNotFound { key: String },
}
