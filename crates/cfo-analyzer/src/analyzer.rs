//! The analyzer facade.
//!
//! [`CostAnalyzer`] turns high-level requests into provider calls and shapes
//! the results. Every call runs to completion before returning; failures are
//! returned as-is, with no retry and no partial result.

use cfo_core::{CfoConfig, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::alert::ThresholdCheck;
use crate::delta::CostDelta;
use crate::models::{
    BillingAnalysis, BillingProvider, CostAnalysisResult, ForecastReport, ForecastRequest,
};
use crate::provider::{CostProvider, ScriptProvider};

/// Facade over a [`CostProvider`].
#[derive(Debug)]
pub struct CostAnalyzer<P = ScriptProvider> {
    provider: P,
    project_root: PathBuf,
}

impl CostAnalyzer<ScriptProvider> {
    /// Analyzer running the CFO scripts for the project at `project_root`.
    pub fn from_config(config: &CfoConfig, project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let provider = ScriptProvider::from_config(config, &project_root);
        Self::new(provider, project_root)
    }
}

impl<P: CostProvider> CostAnalyzer<P> {
    /// Create an analyzer around any provider.
    pub fn new(provider: P, project_root: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            project_root: project_root.into(),
        }
    }

    /// Root analyzed when no directory is given.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The backing provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Analyze a codebase for cloud service usage and estimated cost.
    ///
    /// `root` defaults to the project root.
    #[instrument(level = "info", skip(self), fields(provider = self.provider.name()))]
    pub async fn analyze_codebase(&self, root: Option<&Path>) -> Result<CostAnalysisResult> {
        let root = root.unwrap_or(self.project_root.as_path());
        let report = self.provider.analyze(root).await?;
        let result = CostAnalysisResult::from(report);

        info!(
            total_cost = result.total_cost,
            services = result.service_count,
            "codebase analyzed"
        );
        Ok(result)
    }

    /// Parse a billing export. The result is passed through unmodified.
    #[instrument(level = "info", skip(self), fields(provider = self.provider.name()))]
    pub async fn parse_billing_data(
        &self,
        billing_file: &Path,
        billing_provider: &BillingProvider,
    ) -> Result<BillingAnalysis> {
        if !billing_provider.is_known() {
            debug!(%billing_provider, "passing unrecognized provider to the billing parser");
        }
        let billing = self.provider.parse_billing(billing_file, billing_provider).await?;
        info!(total_cost = billing.total_cost, "billing parsed");
        Ok(billing)
    }

    /// Project costs forward. Parameters are validated before the forecaster runs.
    #[instrument(level = "info", skip(self), fields(provider = self.provider.name()))]
    pub async fn forecast_costs(&self, request: ForecastRequest) -> Result<ForecastReport> {
        request.validate()?;
        let forecast = self.provider.forecast(&request).await?;
        info!(
            total_projected = forecast.total_projected,
            periods = forecast.forecast_periods.len(),
            "forecast generated"
        );
        Ok(forecast)
    }

    /// Compare estimated costs and services between two versions of a codebase.
    #[instrument(level = "info", skip(self), fields(provider = self.provider.name()))]
    pub async fn cost_delta(&self, before_dir: &Path, after_dir: &Path) -> Result<CostDelta> {
        let before = self.provider.analyze(before_dir).await?;
        let after = self.provider.analyze(after_dir).await?;

        let delta = CostDelta::compute(&before, &after);
        info!(
            delta = delta.delta,
            pct_change = delta.pct_change,
            new_services = delta.new_services.len(),
            removed_services = delta.removed_services.len(),
            "cost delta computed"
        );
        Ok(delta)
    }

    /// Analyze the project root and compare its total against `threshold`.
    pub async fn check_threshold(&self, threshold: f64) -> Result<ThresholdCheck> {
        let result = self.analyze_codebase(None).await?;
        Ok(ThresholdCheck::evaluate(result.total_cost, threshold))
    }
}
