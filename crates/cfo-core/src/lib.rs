//! # cfo-core
//!
//! Core errors, logging and configuration shared by the CFO crates.
//!
//! This crate provides:
//! - [`CfoError`] - Error type for every CFO operation
//! - [`logging`] - Tracing setup and log location helpers
//! - [`config`] - Where the tools live and how to run them
//!
//! ## Example
//!
//! ```no_run
//! use cfo_core::{CfoConfig, logging};
//!
//! fn main() -> cfo_core::Result<()> {
//!     let _guard = logging::init_logging(None, false)?;
//!
//!     let root = std::path::Path::new(".");
//!     let config = CfoConfig::discover(root)?;
//!     tracing::info!(scripts = %config.resolved_scripts_dir(root).display(), "ready");
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;

// Re-export main types for convenience
pub use config::{CfoConfig, ToolScripts};
pub use error::{CfoError, Result};
pub use logging::{LogGuard, init_logging};
