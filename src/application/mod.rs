//! Application layer - Use cases that coordinate installers.
//!
//! This layer sits between the CLI and the distribution installers: it picks
//! the installer for the configured distribution, builds the per-run
//! [`Context`](crate::context::Context), and drives the installer's operations
//! in order.

mod bootstrap;
mod repositories;

pub use bootstrap::BootstrapAction;
pub use repositories::RepositoriesAction;
