//! Example scenarios and human-readable report printing.
//!
//! Each scenario reports its own failure and the walkthrough carries on.

use std::io::{self, Write};
use std::path::Path;

use cfo_analyzer::{
    BillingAnalysis, CostAnalysisResult, CostAnalyzer, CostDelta, CostProvider, ForecastReport,
    ForecastRequest, ThresholdCheck,
};
use cfo_core::CfoError;
use tracing::warn;

const RULE: &str =
    "================================================================================";

/// Baseline used by the forecast scenario (USD/month).
const DEMO_BASE_COST: f64 = 250.0;

/// Monthly growth used by the forecast scenario.
const DEMO_GROWTH_RATE: f64 = 0.15;

/// Run the four example scenarios in order, writing the report to `out`.
///
/// Only write failures on `out` end the walkthrough early.
pub async fn run<P: CostProvider, W: Write>(
    analyzer: &CostAnalyzer<P>,
    sample_bill: &Path,
    threshold: f64,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "CFO Programmatic Analysis Example")?;
    writeln!(out, "{RULE}")?;

    writeln!(out, "\n1. Analyzing codebase for cloud costs...")?;
    match analyzer.analyze_codebase(None).await {
        Ok(result) => print_analysis(out, &result)?,
        Err(e) => report_error(out, "analysis", &e)?,
    }

    writeln!(out, "\n2. Parsing billing data...")?;
    if sample_bill.exists() {
        match analyzer.parse_billing_data(sample_bill, &Default::default()).await {
            Ok(billing) => print_billing(out, &billing)?,
            Err(e) => report_error(out, "billing", &e)?,
        }
    } else {
        writeln!(out, "   (Sample billing data not found)")?;
    }

    writeln!(out, "\n3. Generating 6-month cost forecast...")?;
    let request = ForecastRequest::new(DEMO_BASE_COST)
        .with_months(6)
        .with_growth_rate(DEMO_GROWTH_RATE);
    match analyzer.forecast_costs(request).await {
        Ok(forecast) => print_forecast(out, &forecast)?,
        Err(e) => report_error(out, "forecast", &e)?,
    }

    writeln!(out, "\n4. Cost threshold check...")?;
    match analyzer.check_threshold(threshold).await {
        Ok(check) => print_threshold(out, &check)?,
        Err(e) => report_error(out, "threshold check", &e)?,
    }

    writeln!(out, "\n{RULE}")?;
    writeln!(out, "Analysis complete!")?;
    writeln!(out, "{RULE}")
}

fn report_error<W: Write>(out: &mut W, step: &str, e: &CfoError) -> io::Result<()> {
    warn!(step, error = %e, "scenario failed");
    writeln!(out, "   Error: {}", e)
}

pub fn print_analysis<W: Write>(out: &mut W, result: &CostAnalysisResult) -> io::Result<()> {
    writeln!(out, "   Total Estimated Cost: ${:.2}/month", result.total_cost)?;
    writeln!(out, "   Services Found: {}", result.service_count)?;
    writeln!(out, "   Providers: {}", result.providers().join(", "))?;
    match result.parsed_timestamp() {
        Some(ts) => writeln!(out, "   Analyzed At: {}", ts.format("%Y-%m-%d %H:%M UTC"))?,
        None => writeln!(out, "   Analyzed At: {}", result.timestamp)?,
    }

    if let Some(top) = result.top_recommendation() {
        writeln!(out, "\n   Top Recommendation:")?;
        writeln!(out, "   - {}", top)?;
    }
    Ok(())
}

pub fn print_billing<W: Write>(out: &mut W, billing: &BillingAnalysis) -> io::Result<()> {
    writeln!(out, "   Actual Total Cost: ${:.2}", billing.total_cost)?;
    writeln!(
        out,
        "   Billing Period: {} to {}",
        billing.period_start().unwrap_or("?"),
        billing.period_end().unwrap_or("?")
    )?;
    writeln!(out, "   Trend: {}", billing.trend().unwrap_or("unknown"))
}

pub fn print_forecast<W: Write>(out: &mut W, forecast: &ForecastReport) -> io::Result<()> {
    writeln!(out, "   Base Monthly Cost: ${:.2}", forecast.base_monthly_cost)?;
    writeln!(
        out,
        "   {}-Month Projection: ${:.2}",
        forecast.forecast_periods.len(),
        forecast.total_projected
    )?;
    writeln!(out, "   Growth Rate: {:.1}%/month", forecast.growth_rate * 100.0)?;

    if let (Some(first), Some(last)) = (forecast.first_period(), forecast.last_period()) {
        writeln!(out, "\n   {}: ${:.2}", first.month, first.projected_cost)?;
        writeln!(out, "   {}: ${:.2}", last.month, last.projected_cost)?;
    }
    Ok(())
}

pub fn print_delta<W: Write>(out: &mut W, delta: &CostDelta) -> io::Result<()> {
    writeln!(out, "   Before: ${:.2}/month", delta.before_cost)?;
    writeln!(out, "   After:  ${:.2}/month", delta.after_cost)?;
    let direction = if delta.is_increase() {
        "increase"
    } else if delta.delta < 0.0 {
        "decrease"
    } else {
        "no change"
    };
    writeln!(
        out,
        "   Delta:  ${:+.2} ({:+.1}%, {})",
        delta.delta, delta.pct_change, direction
    )?;

    if !delta.has_service_changes() {
        return writeln!(out, "   Services unchanged");
    }
    for service in &delta.new_services {
        writeln!(out, "   + {}", service)?;
    }
    for service in &delta.removed_services {
        writeln!(out, "   - {}", service)?;
    }
    Ok(())
}

pub fn print_threshold<W: Write>(out: &mut W, check: &ThresholdCheck) -> io::Result<()> {
    if check.is_exceeded() {
        writeln!(
            out,
            "   ⚠️  WARNING: Costs (${:.2}) exceed threshold (${:.2}) by ${:.2}",
            check.total_cost,
            check.threshold,
            check.overage()
        )
    } else {
        writeln!(
            out,
            "   ✅ Costs (${:.2}) within threshold (${:.2})",
            check.total_cost, check.threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cfo_analyzer::{
        AnalysisReport, BillingProvider, DetectedService, ForecastPeriod, ServiceKey,
    };
    use std::collections::{BTreeMap, BTreeSet};

    /// Provider whose analyzer fails unless a total is configured.
    struct StubProvider {
        analysis_total: Option<f64>,
    }

    #[async_trait]
    impl CostProvider for StubProvider {
        async fn analyze(&self, _root: &Path) -> cfo_core::Result<AnalysisReport> {
            let total = self
                .analysis_total
                .ok_or_else(|| CfoError::external_tool("analyze_costs", Some(1), "scan failed"))?;
            Ok(AnalysisReport {
                total_estimated_cost: total,
                by_provider: BTreeMap::from([("aws".to_string(), total)]),
                by_category: BTreeMap::new(),
                services: vec![DetectedService {
                    provider: "aws".into(),
                    service: "ec2".into(),
                    extra: Default::default(),
                }],
                recommendations: vec!["Use spot instances".into()],
                timestamp: "2026-10-16T09:30:00".into(),
                extra: Default::default(),
            })
        }

        async fn parse_billing(
            &self,
            _file: &Path,
            _provider: &BillingProvider,
        ) -> cfo_core::Result<BillingAnalysis> {
            Ok(serde_json::from_str(
                r#"{"total_cost": 321.0, "period_start": "2026-09-01", "period_end": null}"#,
            )
            .unwrap())
        }

        async fn forecast(&self, request: &ForecastRequest) -> cfo_core::Result<ForecastReport> {
            let periods = (1..=request.months)
                .map(|i| ForecastPeriod {
                    month: format!("2026-{:02}", i + 4),
                    projected_cost: request.base_cost * (1.0 + request.growth_rate).powi(i as i32),
                    extra: Default::default(),
                })
                .collect::<Vec<_>>();
            Ok(ForecastReport {
                base_monthly_cost: request.base_cost,
                total_projected: periods.iter().map(|p| p.projected_cost).sum(),
                growth_rate: request.growth_rate,
                forecast_periods: periods,
                extra: Default::default(),
            })
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    async fn run_to_string(analysis_total: Option<f64>, threshold: f64) -> String {
        let analyzer = CostAnalyzer::new(StubProvider { analysis_total }, "/repo");
        let mut out = Vec::new();
        run(&analyzer, Path::new("/nonexistent/sample-bill.csv"), threshold, &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_failed_step_does_not_stop_later_steps() {
        let output = run_to_string(None, 1000.0).await;

        let analysis = output.find("1. Analyzing").unwrap();
        let forecast = output.find("3. Generating").unwrap();
        let first_error = output.find("   Error: ").unwrap();
        assert!(analysis < first_error && first_error < forecast);

        assert!(output.contains("(Sample billing data not found)"));
        assert!(output.contains("Base Monthly Cost: $250.00"));
        assert!(output.contains("6-Month Projection: $"));
        assert!(output.contains("2026-05: $287.50"));
        // threshold check reruns the failing analysis
        assert_eq!(output.matches("   Error: ").count(), 2);
        assert!(output.contains("Analysis complete!"));
    }

    #[tokio::test]
    async fn test_walkthrough_with_working_tools() {
        let output = run_to_string(Some(412.5), 1000.0).await;

        assert!(!output.contains("Error:"));
        assert!(output.contains("Total Estimated Cost: $412.50/month"));
        assert!(output.contains("Analyzed At: 2026-10-16 09:30 UTC"));
        assert!(output.contains("- Use spot instances"));
        assert!(output.contains("within threshold ($1000.00)"));
    }

    #[test]
    fn test_threshold_banners() {
        let mut out = Vec::new();
        print_threshold(&mut out, &ThresholdCheck::evaluate(1200.0, 1000.0)).unwrap();
        let exceeded = String::from_utf8(out).unwrap();
        assert!(exceeded.contains("WARNING: Costs ($1200.00) exceed threshold ($1000.00)"));
        assert!(exceeded.contains("by $200.00"));

        let mut out = Vec::new();
        print_threshold(&mut out, &ThresholdCheck::evaluate(800.0, 1000.0)).unwrap();
        let within = String::from_utf8(out).unwrap();
        assert!(within.contains("Costs ($800.00) within threshold ($1000.00)"));
        assert!(!within.contains("WARNING"));
    }

    #[test]
    fn test_billing_with_missing_period_end() {
        let billing: BillingAnalysis =
            serde_json::from_str(r#"{"total_cost": 99.0, "period_end": null}"#).unwrap();
        let mut out = Vec::new();
        print_billing(&mut out, &billing).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Billing Period: ? to ?"));
        assert!(text.contains("Trend: unknown"));
    }

    #[test]
    fn test_delta_report() {
        let delta = CostDelta {
            before_cost: 100.0,
            after_cost: 150.0,
            delta: 50.0,
            pct_change: 50.0,
            new_services: BTreeSet::from([ServiceKey::new("aws", "lambda")]),
            removed_services: BTreeSet::new(),
        };
        let mut out = Vec::new();
        print_delta(&mut out, &delta).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Delta:  $+50.00 (+50.0%, increase)"));
        assert!(text.contains("+ aws/lambda"));

        let unchanged = CostDelta {
            after_cost: 100.0,
            delta: 0.0,
            pct_change: 0.0,
            new_services: BTreeSet::new(),
            ..delta
        };
        let mut out = Vec::new();
        print_delta(&mut out, &unchanged).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("no change"));
        assert!(text.contains("Services unchanged"));
    }
}
