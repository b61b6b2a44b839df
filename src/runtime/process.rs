//! Running external programs.

use anyhow::{Context, Result, bail};
use log::debug;
use std::process::Command;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn run_impl(&self, program: &str, args: &[String]) -> Result<()> {
        debug!("Running {} {}", program, args.join(" "));

        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to execute {}", program))?;

        if !status.success() {
            bail!("{} failed with {}", program, status);
        }

        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};

    #[test]
    fn test_run_success() {
        let runtime = RealRuntime;
        runtime.run("true", &[]).unwrap();
    }

    #[test]
    fn test_run_non_zero_exit_is_error() {
        let runtime = RealRuntime;
        let err = runtime.run("false", &[]).unwrap_err();
        assert!(err.to_string().contains("false failed"));
    }

    #[test]
    fn test_run_missing_program_is_error() {
        let runtime = RealRuntime;
        let err = runtime
            .run("rootstrap-definitely-not-a-program", &["--help".into()])
            .unwrap_err();
        assert!(err.to_string().contains("Failed to execute"));
    }
}
