pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;

use anyhow::Result;

use crate::core::env::{Environment, SystemEnvironment};

/// Run one backup as described by the command line.
///
/// Returns whether a commit was created.
///
/// # Errors
/// Returns the resolution or backup failure; a [`error::Error`] can be
/// recovered with `downcast_ref` to pick an exit code.
pub fn run(cli: &cli::Cli) -> Result<bool> {
    run_with_env(cli, &SystemEnvironment)
}

/// [`run`] with explicit process lookups.
///
/// # Errors
/// See [`run`].
pub fn run_with_env(cli: &cli::Cli, env: &dyn Environment) -> Result<bool> {
    let ctx = app::context::AppContext::from_cli(cli, env)?;
    let made = crate::core::backup::backup_repository(&ctx.repo_root, &ctx.config)?;
    Ok(made)
}
