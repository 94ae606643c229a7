//! Logging infrastructure for CFO.
//!
//! Structured logging on top of the `tracing` ecosystem:
//!
//! - JSON lines written to `~/.cfo/logs/cfo.log` (rotated daily)
//! - Compact console output on stderr
//! - `--verbose` switches the default level from INFO to DEBUG
//! - `RUST_LOG` overrides both
//!
//! ## Example
//!
//! ```no_run
//! use cfo_core::logging;
//!
//! let _guard = logging::init_logging(None, false).expect("logging init");
//!
//! tracing::info!("cfo started");
//! tracing::debug!(tool = "forecast", "running tool");
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::error::{CfoError, Result};

/// Guard that must be held to ensure log flushing on shutdown.
///
/// Keep this alive for the lifetime of the application.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the CFO logging system.
///
/// # Arguments
///
/// * `log_dir` - Optional custom log directory. Defaults to `~/.cfo/logs/`
/// * `verbose` - If true, sets log level to DEBUG. Otherwise uses INFO.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir).map_err(|e| CfoError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "cfo.log");
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "cfo={default_level},cfo_core={default_level},cfo_analyzer={default_level}"
        ))
    });

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_span_list(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::debug!(log_dir = %log_dir.display(), verbose, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Initialize minimal console-only logging for tests.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Base directory for CFO state: `~/.cfo/`
pub fn cfo_home() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CfoError::Internal {
        message: "could not determine home directory".into(),
    })?;

    Ok(home.join(".cfo"))
}

/// Get the default log directory path: `~/.cfo/logs/`
pub fn default_log_dir() -> Result<PathBuf> {
    Ok(cfo_home()?.join("logs"))
}

/// Record one external tool invocation.
///
/// # Example
///
/// ```ignore
/// log_tool_run!("forecast", exit_code = 0, duration_ms = 412);
/// log_tool_run!("parse_bills", exit_code = 2, error = "unknown provider");
/// ```
#[macro_export]
macro_rules! log_tool_run {
    ($tool_name:expr, $($field:tt)*) => {
        tracing::info!(
            target: "cfo::tool",
            tool = $tool_name,
            $($field)*,
            "tool run"
        )
    };
}
