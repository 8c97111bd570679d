use std::{path::Path, sync::Mutex};

use anyhow::{Context, Result};

use crate::config::Verbosity;

// Global guard to keep the file appender alive
static FILE_APPENDER_GUARD: Mutex<Option<tracing_appender::non_blocking::WorkerGuard>> =
    Mutex::new(None);

/// Flush and close the log file appender.
/// Must run before `std::process::exit`, which skips destructors.
pub fn flush_logs() {
    if let Ok(mut guard_holder) = FILE_APPENDER_GUARD.lock()
        && let Some(guard) = guard_holder.take()
    {
        drop(guard);
    }
}

fn filter(verbosity: Verbosity) -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| verbosity.filter().to_string())
}

/// Initialize console tracing. `RUST_LOG` (if set) takes precedence.
pub fn init_tracing(verbosity: Verbosity) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let fmt_layer = fmt::layer().with_target(false);
    let filter_layer =
        EnvFilter::try_new(filter(verbosity)).context("invalid RUST_LOG / filter")?;

    // Allow re-init to be a no-op in tests
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();

    Ok(())
}

/// Initialize console tracing plus a daily-rotated `autobackup.log` in `log_dir`.
pub fn init_tracing_with_file(log_dir: &Path, verbosity: Verbosity) -> Result<()> {
    use tracing_appender::rolling;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let filter_layer =
        EnvFilter::try_new(filter(verbosity)).context("invalid RUST_LOG / filter")?;

    let file_appender = rolling::daily(log_dir, "autobackup.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Store the guard globally to keep it alive for the program duration
    if let Ok(mut guard_holder) = FILE_APPENDER_GUARD.lock() {
        *guard_holder = Some(guard);
    }

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(non_blocking);
    let console_layer = fmt::layer().with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    Ok(())
}
