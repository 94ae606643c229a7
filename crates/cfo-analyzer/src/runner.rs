//! Running the external CFO tools.
//!
//! Every tool follows the same contract: it accepts `--format json --output
//! <path>`, exits 0 after writing a JSON document to `<path>`, and exits
//! non-zero otherwise. [`ToolRunner`] gives each run its own temporary
//! directory, so concurrent runs never share an output file.

use cfo_core::{CfoConfig, CfoError, Result, log_tool_run};
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, instrument};

/// The external programs the facade delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalTool {
    /// Scans a codebase and estimates monthly cloud cost
    CostAnalyzer,
    /// Parses a provider billing export
    BillingParser,
    /// Projects costs forward in time
    Forecaster,
}

impl ExternalTool {
    /// Stable name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CostAnalyzer => "analyze_costs",
            Self::BillingParser => "parse_bills",
            Self::Forecaster => "forecast",
        }
    }
}

impl std::fmt::Display for ExternalTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Launches tool scripts and loads their JSON output.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    scripts_dir: PathBuf,
    interpreter: Option<String>,
    scripts: cfo_core::ToolScripts,
    timeout: Option<Duration>,
}

impl ToolRunner {
    /// Build a runner from configuration, resolving paths against `project_root`.
    pub fn from_config(config: &CfoConfig, project_root: &Path) -> Self {
        Self {
            scripts_dir: config.resolved_scripts_dir(project_root),
            interpreter: config.interpreter.clone(),
            scripts: config.tools.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Directory the scripts are loaded from.
    pub fn scripts_dir(&self) -> &Path {
        &self.scripts_dir
    }

    /// Full path of the script backing `tool`.
    pub fn script_path(&self, tool: ExternalTool) -> PathBuf {
        let name = match tool {
            ExternalTool::CostAnalyzer => &self.scripts.analyzer,
            ExternalTool::BillingParser => &self.scripts.billing_parser,
            ExternalTool::Forecaster => &self.scripts.forecaster,
        };
        self.scripts_dir.join(name)
    }

    /// Full argument vector (program first) for a run writing to `output`.
    pub fn command_line(
        &self,
        tool: ExternalTool,
        args: &[OsString],
        output: &Path,
    ) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(args.len() + 6);
        if let Some(interpreter) = &self.interpreter {
            argv.push(OsString::from(interpreter));
        }
        argv.push(self.script_path(tool).into_os_string());
        argv.extend(args.iter().cloned());
        argv.push("--format".into());
        argv.push("json".into());
        argv.push("--output".into());
        argv.push(output.as_os_str().to_os_string());
        argv
    }

    /// Run `tool` with `args` and deserialize the JSON it writes.
    #[instrument(level = "info", skip_all, fields(tool = %tool))]
    pub async fn run_json<T: DeserializeOwned>(
        &self,
        tool: ExternalTool,
        args: Vec<OsString>,
    ) -> Result<T> {
        let workdir = tempfile::Builder::new()
            .prefix("cfo-")
            .tempdir()
            .map_err(|e| CfoError::io("creating output directory", std::env::temp_dir(), e))?;
        let output_path = workdir.path().join(format!("{}.json", tool.name()));

        let argv = self.command_line(tool, &args, &output_path);
        self.execute(tool, &argv).await?;

        load_json(tool, &output_path)
    }

    async fn execute(&self, tool: ExternalTool, argv: &[OsString]) -> Result<()> {
        let (program, rest) = argv
            .split_first()
            .ok_or_else(|| CfoError::internal("empty tool command line"))?;

        let mut cmd = Command::new(program);
        cmd.args(rest).kill_on_drop(true);

        debug!(?argv, "executing tool");
        let started = Instant::now();

        let output = match self.timeout {
            Some(limit) => match timeout(limit, cmd.output()).await {
                Ok(result) => result,
                Err(_) => {
                    let duration_ms = started.elapsed().as_millis() as u64;
                    log_tool_run!(tool.name(), timed_out = true, duration_ms);
                    return Err(CfoError::ToolTimeout {
                        tool: tool.name().into(),
                        timeout_secs: limit.as_secs(),
                    });
                }
            },
            None => cmd.output().await,
        };

        let output: Output = output.map_err(|e| CfoError::ToolSpawn {
            tool: tool.name().into(),
            program: program.to_string_lossy().into_owned(),
            source: e,
        })?;

        let duration_ms = started.elapsed().as_millis() as u64;
        log_tool_run!(tool.name(), exit_code = ?output.status.code(), duration_ms);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(
                "{} failed with status {}: stderr={}",
                tool,
                output.status,
                stderr.trim()
            );
            return Err(CfoError::external_tool(
                tool.name(),
                output.status.code(),
                stderr.trim(),
            ));
        }

        Ok(())
    }
}

/// Read and deserialize a tool's JSON artifact.
pub fn load_json<T: DeserializeOwned>(tool: ExternalTool, path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        let message = if e.kind() == std::io::ErrorKind::NotFound {
            "tool exited successfully but wrote no output file".to_string()
        } else {
            format!("could not read output file: {e}")
        };
        CfoError::malformed_output(tool.name(), path, message)
    })?;

    serde_json::from_str(&content)
        .map_err(|e| CfoError::malformed_output(tool.name(), path, e.to_string()))
}
