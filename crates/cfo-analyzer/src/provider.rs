//! The cost-analysis capability behind the facade.
//!
//! [`CostProvider`] is the seam between [`CostAnalyzer`](crate::CostAnalyzer)
//! and whatever actually computes costs. [`ScriptProvider`] runs the CFO
//! scripts as subprocesses; tests and embedders can supply their own.

use async_trait::async_trait;
use cfo_core::{CfoConfig, Result};
use std::ffi::OsString;
use std::path::Path;
use tracing::info;

use crate::models::{
    AnalysisReport, BillingAnalysis, BillingProvider, ForecastReport, ForecastRequest,
};
use crate::runner::{ExternalTool, ToolRunner};

/// Something that can analyze codebases, parse bills and forecast spend.
///
/// Implementations can use different backends:
/// - External scripts ([`ScriptProvider`])
/// - An in-process library
/// - Canned responses for testing
#[async_trait]
pub trait CostProvider: Send + Sync {
    /// Estimate the cloud cost of the codebase rooted at `root`.
    async fn analyze(&self, root: &Path) -> Result<AnalysisReport>;

    /// Parse a billing export. Neither the file nor the provider is checked here.
    async fn parse_billing(
        &self,
        file: &Path,
        provider: &BillingProvider,
    ) -> Result<BillingAnalysis>;

    /// Project monthly costs forward.
    async fn forecast(&self, request: &ForecastRequest) -> Result<ForecastReport>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Provider backed by the CFO command-line scripts.
#[derive(Debug, Clone)]
pub struct ScriptProvider {
    runner: ToolRunner,
}

impl ScriptProvider {
    /// Create a provider around an existing runner.
    pub fn new(runner: ToolRunner) -> Self {
        Self { runner }
    }

    /// Create a provider from configuration.
    pub fn from_config(config: &CfoConfig, project_root: &Path) -> Self {
        let runner = ToolRunner::from_config(config, project_root);
        info!(scripts_dir = %runner.scripts_dir().display(), "using CFO scripts");
        Self::new(runner)
    }

    /// The underlying runner.
    pub fn runner(&self) -> &ToolRunner {
        &self.runner
    }
}

/// Command-line arguments for the analyzer.
pub fn analyze_args(root: &Path) -> Vec<OsString> {
    vec!["--project-root".into(), root.as_os_str().to_os_string()]
}

/// Command-line arguments for the billing parser.
pub fn billing_args(file: &Path, provider: &BillingProvider) -> Vec<OsString> {
    vec![
        "--file".into(),
        file.as_os_str().to_os_string(),
        "--provider".into(),
        provider.as_str().into(),
    ]
}

/// Command-line arguments for the forecaster.
pub fn forecast_args(request: &ForecastRequest) -> Vec<OsString> {
    vec![
        "--base-cost".into(),
        request.base_cost.to_string().into(),
        "--months".into(),
        request.months.to_string().into(),
        "--growth-rate".into(),
        request.growth_rate.to_string().into(),
    ]
}

#[async_trait]
impl CostProvider for ScriptProvider {
    async fn analyze(&self, root: &Path) -> Result<AnalysisReport> {
        self.runner
            .run_json(ExternalTool::CostAnalyzer, analyze_args(root))
            .await
    }

    async fn parse_billing(
        &self,
        file: &Path,
        provider: &BillingProvider,
    ) -> Result<BillingAnalysis> {
        self.runner
            .run_json(ExternalTool::BillingParser, billing_args(file, provider))
            .await
    }

    async fn forecast(&self, request: &ForecastRequest) -> Result<ForecastReport> {
        self.runner
            .run_json(ExternalTool::Forecaster, forecast_args(request))
            .await
    }

    fn name(&self) -> &str {
        "scripts"
    }
}
