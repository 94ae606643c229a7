//! Data models for tool results.
//!
//! Each tool writes one JSON document. The structs here name the fields the
//! facade reads; required fields have no serde default, so a document missing
//! one fails to deserialize instead of reading as zero. Fields we do not name
//! are kept in `extra` and serialized back out unchanged.

use cfo_core::{CfoError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fields a tool emitted that have no typed counterpart.
pub type ExtraFields = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Codebase analysis
// ============================================================================

/// Raw output of the codebase cost analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Estimated monthly cost across all detected services (USD)
    pub total_estimated_cost: f64,

    /// Cost per cloud provider
    pub by_provider: BTreeMap<String, f64>,

    /// Cost per service category (compute, storage, ...)
    pub by_category: BTreeMap<String, f64>,

    /// Every service the analyzer detected
    pub services: Vec<DetectedService>,

    /// Cost-saving suggestions, most important first
    pub recommendations: Vec<String>,

    /// When the analysis ran
    pub timestamp: String,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl AnalysisReport {
    /// Identity pairs of all detected services.
    pub fn service_keys(&self) -> impl Iterator<Item = ServiceKey> + '_ {
        self.services.iter().map(DetectedService::key)
    }
}

/// One cloud service found in the codebase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedService {
    /// Cloud provider (e.g., "aws")
    pub provider: String,

    /// Service name (e.g., "s3")
    pub service: String,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl DetectedService {
    /// Identity of this service for delta computation.
    pub fn key(&self) -> ServiceKey {
        ServiceKey::new(&self.provider, &self.service)
    }
}

/// (provider, service) identity used when comparing two analyses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServiceKey {
    pub provider: String,
    pub service: String,
}

impl ServiceKey {
    pub fn new(provider: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            service: service.into(),
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.service)
    }
}

/// Summary of a codebase cost analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysisResult {
    /// Total estimated monthly cost (USD)
    pub total_cost: f64,

    /// Cost per provider
    pub by_provider: BTreeMap<String, f64>,

    /// Cost per category
    pub by_category: BTreeMap<String, f64>,

    /// Number of detected services
    pub service_count: usize,

    /// Cost-saving suggestions
    pub recommendations: Vec<String>,

    /// Timestamp as reported by the analyzer
    pub timestamp: String,
}

impl CostAnalysisResult {
    /// First recommendation, if any.
    pub fn top_recommendation(&self) -> Option<&str> {
        self.recommendations.first().map(String::as_str)
    }

    /// Provider names in report order.
    pub fn providers(&self) -> Vec<&str> {
        self.by_provider.keys().map(String::as_str).collect()
    }

    /// Timestamp parsed as RFC 3339, or as a naive ISO date-time taken to be UTC.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

impl From<&AnalysisReport> for CostAnalysisResult {
    fn from(report: &AnalysisReport) -> Self {
        Self {
            total_cost: report.total_estimated_cost,
            by_provider: report.by_provider.clone(),
            by_category: report.by_category.clone(),
            service_count: report.services.len(),
            recommendations: report.recommendations.clone(),
            timestamp: report.timestamp.clone(),
        }
    }
}

impl From<AnalysisReport> for CostAnalysisResult {
    fn from(report: AnalysisReport) -> Self {
        Self {
            total_cost: report.total_estimated_cost,
            service_count: report.services.len(),
            by_provider: report.by_provider,
            by_category: report.by_category,
            recommendations: report.recommendations,
            timestamp: report.timestamp,
        }
    }
}

// ============================================================================
// Billing
// ============================================================================

/// Cloud provider whose billing export is being parsed.
///
/// Anything outside the known set is passed through to the parser as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BillingProvider {
    #[default]
    Aws,
    Gcp,
    Azure,
    Other(String),
}

impl BillingProvider {
    /// Identifier passed on the parser's command line.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Aws => "aws",
            Self::Gcp => "gcp",
            Self::Azure => "azure",
            Self::Other(name) => name,
        }
    }

    /// Whether this is one of the providers the parser documents.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for BillingProvider {
    fn from(s: &str) -> Self {
        match s {
            "aws" => Self::Aws,
            "gcp" => Self::Gcp,
            "azure" => Self::Azure,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::str::FromStr for BillingProvider {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for BillingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the billing parser.
///
/// Only `total_cost` is required. Everything else the parser wrote, nulls
/// included, stays in `extra` exactly as emitted; the accessors read from it
/// and return `None` for anything absent or not of the expected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingAnalysis {
    /// Actual billed total for the period (USD)
    pub total_cost: f64,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl BillingAnalysis {
    /// First day covered by the export.
    pub fn period_start(&self) -> Option<&str> {
        self.extra.get("period_start")?.as_str()
    }

    /// Last day covered by the export.
    pub fn period_end(&self) -> Option<&str> {
        self.extra.get("period_end")?.as_str()
    }

    /// Trend classification ("increasing", "stable", ...), if reported.
    pub fn trend(&self) -> Option<&str> {
        self.extra.get("trends")?.get("trend")?.as_str()
    }
}

// ============================================================================
// Forecast
// ============================================================================

/// Default number of months to project.
pub const DEFAULT_FORECAST_MONTHS: u32 = 6;

/// Default monthly growth rate (10%).
pub const DEFAULT_GROWTH_RATE: f64 = 0.10;

/// Parameters for a cost forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Current monthly cost baseline (USD)
    pub base_cost: f64,

    /// Number of months to project
    pub months: u32,

    /// Monthly growth rate as a fraction (0.10 = 10%)
    pub growth_rate: f64,
}

impl ForecastRequest {
    /// Create a request with the default horizon and growth rate.
    pub fn new(base_cost: f64) -> Self {
        Self {
            base_cost,
            months: DEFAULT_FORECAST_MONTHS,
            growth_rate: DEFAULT_GROWTH_RATE,
        }
    }

    /// Set the number of months.
    pub fn with_months(mut self, months: u32) -> Self {
        self.months = months;
        self
    }

    /// Set the monthly growth rate.
    pub fn with_growth_rate(mut self, growth_rate: f64) -> Self {
        self.growth_rate = growth_rate;
        self
    }

    /// Reject parameters no forecaster can sensibly project.
    ///
    /// Negative growth is allowed (shrinking spend); a rate of -100% or
    /// lower is not.
    pub fn validate(&self) -> Result<()> {
        if !self.base_cost.is_finite() || self.base_cost < 0.0 {
            return Err(CfoError::invalid_input(
                "base_cost",
                format!("must be a non-negative amount, got {}", self.base_cost),
            ));
        }
        if self.months == 0 {
            return Err(CfoError::invalid_input("months", "must be at least 1"));
        }
        if !self.growth_rate.is_finite() || self.growth_rate <= -1.0 {
            return Err(CfoError::invalid_input(
                "growth_rate",
                format!("must be greater than -1.0, got {}", self.growth_rate),
            ));
        }
        Ok(())
    }
}

/// Output of the forecaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    /// Baseline the projection started from (USD/month)
    pub base_monthly_cost: f64,

    /// Sum of all projected periods (USD)
    pub total_projected: f64,

    /// Monthly growth rate used
    pub growth_rate: f64,

    /// One entry per projected month, in order
    pub forecast_periods: Vec<ForecastPeriod>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl ForecastReport {
    /// First projected month.
    pub fn first_period(&self) -> Option<&ForecastPeriod> {
        self.forecast_periods.first()
    }

    /// Last projected month.
    pub fn last_period(&self) -> Option<&ForecastPeriod> {
        self.forecast_periods.last()
    }
}

/// A single projected month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPeriod {
    /// Month label as emitted by the forecaster (e.g., "2026-11")
    pub month: String,

    /// Projected cost for that month (USD)
    pub projected_cost: f64,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANALYSIS_JSON: &str = r#"{
        "total_estimated_cost": 412.5,
        "by_provider": {"aws": 400.0, "vercel": 12.5},
        "by_category": {"compute": 300.0, "storage": 112.5},
        "services": [
            {"provider": "aws", "service": "ec2", "file": "infra/main.tf"},
            {"provider": "aws", "service": "s3"},
            {"provider": "vercel", "service": "hosting"}
        ],
        "recommendations": ["Use reserved instances for ec2", "Enable S3 lifecycle rules"],
        "timestamp": "2026-10-16T09:30:00.123456",
        "project_root": "/repo"
    }"#;

    #[test]
    fn test_analysis_report_to_result() {
        let report: AnalysisReport = serde_json::from_str(ANALYSIS_JSON).unwrap();
        assert_eq!(report.extra.get("project_root").unwrap(), "/repo");
        assert_eq!(report.services[0].extra.get("file").unwrap(), "infra/main.tf");

        let result = CostAnalysisResult::from(&report);
        assert!((result.total_cost - 412.5).abs() < f64::EPSILON);
        assert_eq!(result.service_count, 3);
        assert_eq!(result.providers(), vec!["aws", "vercel"]);
        assert_eq!(result.top_recommendation(), Some("Use reserved instances for ec2"));
        assert_eq!(result, CostAnalysisResult::from(report));
    }

    #[test]
    fn test_analysis_missing_total_is_an_error() {
        let json = r#"{"by_provider": {}, "by_category": {}, "services": [],
                       "recommendations": [], "timestamp": "2026-10-16T00:00:00"}"#;
        let err = serde_json::from_str::<AnalysisReport>(json).unwrap_err();
        assert!(err.to_string().contains("total_estimated_cost"));
    }

    #[test]
    fn test_parsed_timestamp() {
        let report: AnalysisReport = serde_json::from_str(ANALYSIS_JSON).unwrap();
        let mut result = CostAnalysisResult::from(report);
        let ts = result.parsed_timestamp().unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-10-16T09:30:00.123456+00:00");

        result.timestamp = "2026-10-16T09:30:00+02:00".into();
        assert_eq!(
            result.parsed_timestamp().unwrap().to_rfc3339(),
            "2026-10-16T07:30:00+00:00"
        );

        result.timestamp = "last tuesday".into();
        assert!(result.parsed_timestamp().is_none());
    }

    #[test]
    fn test_billing_provider_passthrough() {
        assert_eq!(BillingProvider::default(), BillingProvider::Aws);
        assert_eq!("gcp".parse::<BillingProvider>().unwrap(), BillingProvider::Gcp);

        let oracle = BillingProvider::from("oracle");
        assert!(!oracle.is_known());
        assert_eq!(oracle.as_str(), "oracle");
        assert_eq!(BillingProvider::Azure.to_string(), "azure");
    }

    #[test]
    fn test_billing_analysis_keeps_unknown_fields() {
        let json = r#"{
            "total_cost": 1234.56,
            "period_start": "2026-09-01",
            "period_end": "2026-09-30",
            "trends": {"trend": "increasing", "change_pct": 12.0},
            "by_service": {"AmazonEC2": 900.0}
        }"#;
        let billing: BillingAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(billing.trend(), Some("increasing"));
        assert_eq!(billing.period_start(), Some("2026-09-01"));
        assert_eq!(billing.period_end(), Some("2026-09-30"));
        assert!(billing.extra.contains_key("by_service"));

        let round: serde_json::Value = serde_json::to_value(&billing).unwrap();
        let original: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(round, original);
    }

    #[test]
    fn test_billing_analysis_keeps_nulls() {
        let json = r#"{"total_cost": 10.0, "period_start": null,
                       "trends": {"trend": null, "change_pct": 1.0}}"#;
        let billing: BillingAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(billing.period_start(), None);
        assert_eq!(billing.trend(), None);

        let round: serde_json::Value = serde_json::to_value(&billing).unwrap();
        let original: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(round, original);
        assert!(round["period_start"].is_null());
        assert!(round["trends"]["trend"].is_null());
    }

    #[test]
    fn test_billing_analysis_tolerates_unexpected_shapes() {
        let json = r#"{"total_cost": 10.0, "trends": "stable", "period_end": 20260930}"#;
        let billing: BillingAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(billing.trend(), None);
        assert_eq!(billing.period_end(), None);
        assert_eq!(billing.extra["trends"], "stable");

        let round: serde_json::Value = serde_json::to_value(&billing).unwrap();
        assert_eq!(round, serde_json::from_str::<serde_json::Value>(json).unwrap());
    }

    #[test]
    fn test_billing_analysis_without_trends() {
        let billing: BillingAnalysis = serde_json::from_str(r#"{"total_cost": 10.0}"#).unwrap();
        assert_eq!(billing.trend(), None);
        assert!(billing.period_end().is_none());
    }

    #[test]
    fn test_billing_analysis_requires_total() {
        let err = serde_json::from_str::<BillingAnalysis>(r#"{"period_start": "2026-09-01"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("total_cost"));
    }

    #[test]
    fn test_forecast_request_defaults() {
        let request = ForecastRequest::new(250.0);
        assert_eq!(request.months, 6);
        assert!((request.growth_rate - 0.10).abs() < f64::EPSILON);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_forecast_request_validation() {
        assert!(ForecastRequest::new(0.0).validate().is_ok());
        assert!(ForecastRequest::new(100.0).with_growth_rate(-0.05).validate().is_ok());

        let err = ForecastRequest::new(100.0).with_months(0).validate().unwrap_err();
        assert!(
            matches!(err, CfoError::InvalidInput { ref parameter, .. } if parameter == "months")
        );

        assert!(ForecastRequest::new(-1.0).validate().is_err());
        assert!(ForecastRequest::new(f64::NAN).validate().is_err());
        assert!(ForecastRequest::new(100.0).with_growth_rate(-1.0).validate().is_err());
        assert!(
            ForecastRequest::new(100.0)
                .with_growth_rate(f64::INFINITY)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_forecast_first_and_last_period() {
        let json = r#"{
            "base_monthly_cost": 250.0,
            "total_projected": 2188.97,
            "growth_rate": 0.15,
            "forecast_periods": [
                {"month": "2026-11", "projected_cost": 287.5},
                {"month": "2026-12", "projected_cost": 330.63},
                {"month": "2027-04", "projected_cost": 578.27}
            ]
        }"#;
        let forecast: ForecastReport = serde_json::from_str(json).unwrap();
        assert_eq!(forecast.first_period().unwrap().month, "2026-11");
        assert_eq!(forecast.last_period().unwrap().month, "2027-04");

        let empty = ForecastReport {
            forecast_periods: vec![],
            ..forecast
        };
        assert!(empty.first_period().is_none());
    }
}
