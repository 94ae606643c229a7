//! Error types for CFO operations.
//!
//! [`CfoError`] covers every failure the facade can surface. A tool that ran
//! and failed is [`CfoError::ExternalTool`]; a tool that exited 0 but left an
//! artifact we cannot use is [`CfoError::MalformedOutput`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`CfoError`].
pub type Result<T> = std::result::Result<T, CfoError>;

/// Error type for all CFO operations.
///
/// Nothing here is retried automatically. Every error propagates to the
/// caller unchanged.
#[derive(Debug, Error)]
pub enum CfoError {
    // =========================================================================
    // External Tool Errors
    // =========================================================================
    /// The external tool ran and exited with a non-zero status
    #[error("{tool} exited with code {exit_code:?}: {stderr}")]
    ExternalTool {
        tool: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The external tool could not be started
    #[error("Failed to start {tool} ({program})")]
    ToolSpawn {
        tool: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool did not finish within the configured deadline
    #[error("{tool} timed out after {timeout_secs}s")]
    ToolTimeout { tool: String, timeout_secs: u64 },

    /// The tool's JSON artifact is missing, unreadable or lacks a required field
    #[error("Malformed output from {tool} at {path}: {message}")]
    MalformedOutput {
        tool: String,
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// A caller-supplied parameter was rejected before any tool ran
    #[error("Invalid {parameter}: {message}")]
    InvalidInput { parameter: String, message: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration file not found
    #[error("Configuration not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file is invalid YAML or fails validation
    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error with context
    #[error("I/O error {operation}: {path}")]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (bug in CFO)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CfoError {
    // =========================================================================
    // Constructor helpers for common error patterns
    // =========================================================================

    /// Create an ExternalTool error from an exit status and captured stderr
    pub fn external_tool(
        tool: impl Into<String>,
        exit_code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Create a MalformedOutput error
    pub fn malformed_output(
        tool: impl Into<String>,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedOutput {
            tool: tool.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a ConfigInvalid error
    pub fn config_invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Error classification helpers
    // =========================================================================

    /// Returns true if an external tool failed to run to a successful exit
    pub fn is_tool_error(&self) -> bool {
        matches!(
            self,
            Self::ExternalTool { .. } | Self::ToolSpawn { .. } | Self::ToolTimeout { .. }
        )
    }

    /// Returns true if the tool's artifact could not be used
    pub fn is_malformed_output(&self) -> bool {
        matches!(self, Self::MalformedOutput { .. })
    }

    /// Returns true if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigNotFound { .. } | Self::ConfigInvalid { .. })
    }

    /// Returns actionable guidance for the user
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::ToolSpawn { .. } => Some(
                "Check that the interpreter is installed and scripts_dir points at the CFO scripts",
            ),
            Self::ToolTimeout { .. } => Some("Raise timeout_secs in the CFO configuration"),
            Self::MalformedOutput { .. } => {
                Some("Run the tool by hand with --format json to inspect its output")
            }
            Self::ConfigInvalid { .. } => Some("Check YAML syntax and field values"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_tool_error() {
        let err = CfoError::external_tool("analyze_costs", Some(2), "no such directory");
        assert!(err.to_string().contains("analyze_costs"));
        assert!(err.to_string().contains("no such directory"));
        assert!(err.is_tool_error());
        assert!(!err.is_malformed_output());
    }

    #[test]
    fn test_malformed_output_error() {
        let err = CfoError::malformed_output(
            "analyze_costs",
            "/tmp/cfo-x/analysis.json",
            "missing field `total_estimated_cost`",
        );
        assert!(err.is_malformed_output());
        assert!(!err.is_tool_error());
        assert!(err.to_string().contains("total_estimated_cost"));
        assert!(err.guidance().is_some());
    }

    #[test]
    fn test_config_classification() {
        let missing = CfoError::ConfigNotFound {
            path: "/home/user/.cfo/config.yaml".into(),
            source: None,
        };
        assert!(missing.is_config_error());
        assert!(CfoError::config_invalid("x.yaml", "bad").is_config_error());
        assert!(!CfoError::internal("bug").is_config_error());
    }

    #[test]
    fn test_timeout_guidance() {
        let err = CfoError::ToolTimeout {
            tool: "forecast".into(),
            timeout_secs: 30,
        };
        assert!(err.is_tool_error());
        assert_eq!(err.guidance(), Some("Raise timeout_secs in the CFO configuration"));
    }
}
