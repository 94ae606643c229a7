//! Programmatic access to the CFO cost tools.
//!
//! This crate wraps three external programs (a codebase cost analyzer, a
//! billing export parser and a cost forecaster) behind a typed facade.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │    CostAnalyzer      │
//! │ (analyze, billing,   │
//! │  forecast, delta)    │
//! └──────────┬───────────┘
//!            │ CostProvider
//!            ▼
//! ┌──────────────────────┐
//! │   ScriptProvider     │
//! │   └─ ToolRunner      │
//! └──────────┬───────────┘
//!            │ --format json --output <tmp>
//!            ▼
//! ┌──────────────────────┐
//! │  analyze_costs.py    │
//! │  parse_bills.py      │
//! │  forecast.py         │
//! └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cfo_analyzer::{CostAnalyzer, ForecastRequest};
//! use cfo_core::CfoConfig;
//!
//! #[tokio::main]
//! async fn main() -> cfo_core::Result<()> {
//!     let root = std::path::Path::new("/path/to/project");
//!     let config = CfoConfig::discover(root)?;
//!     let analyzer = CostAnalyzer::from_config(&config, root);
//!
//!     let result = analyzer.analyze_codebase(None).await?;
//!     println!("Total Estimated Cost: ${:.2}/month", result.total_cost);
//!
//!     let forecast = analyzer
//!         .forecast_costs(ForecastRequest::new(result.total_cost).with_growth_rate(0.15))
//!         .await?;
//!     println!("6-Month Projection: ${:.2}", forecast.total_projected);
//!
//!     Ok(())
//! }
//! ```

pub mod alert;
pub mod analyzer;
pub mod delta;
pub mod models;
pub mod provider;
pub mod runner;

// Re-export main types for convenience
pub use alert::{AlertStatus, ThresholdCheck};
pub use analyzer::CostAnalyzer;
pub use delta::CostDelta;
pub use models::{
    AnalysisReport, BillingAnalysis, BillingProvider, CostAnalysisResult, DetectedService,
    ForecastPeriod, ForecastReport, ForecastRequest, ServiceKey,
};
pub use provider::{CostProvider, ScriptProvider};
pub use runner::{ExternalTool, ToolRunner};
