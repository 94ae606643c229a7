//! Comparing two codebase analyses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{AnalysisReport, ServiceKey};

/// Change in estimated cost and service inventory between two analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostDelta {
    /// Estimated monthly cost of the baseline
    pub before_cost: f64,

    /// Estimated monthly cost of the modified codebase
    pub after_cost: f64,

    /// `after_cost - before_cost`
    pub delta: f64,

    /// Percentage change relative to the baseline; 0 when the baseline is 0
    pub pct_change: f64,

    /// Services present after but not before
    pub new_services: BTreeSet<ServiceKey>,

    /// Services present before but not after
    pub removed_services: BTreeSet<ServiceKey>,
}

impl CostDelta {
    /// Compare a baseline analysis with a later one.
    pub fn compute(before: &AnalysisReport, after: &AnalysisReport) -> Self {
        let before_services: BTreeSet<ServiceKey> = before.service_keys().collect();
        let after_services: BTreeSet<ServiceKey> = after.service_keys().collect();

        Self::from_parts(
            before.total_estimated_cost,
            after.total_estimated_cost,
            &before_services,
            &after_services,
        )
    }

    /// Build a delta from totals and service sets.
    pub fn from_parts(
        before_cost: f64,
        after_cost: f64,
        before_services: &BTreeSet<ServiceKey>,
        after_services: &BTreeSet<ServiceKey>,
    ) -> Self {
        let delta = after_cost - before_cost;

        Self {
            before_cost,
            after_cost,
            delta,
            pct_change: pct_change(before_cost, delta),
            new_services: after_services.difference(before_services).cloned().collect(),
            removed_services: before_services.difference(after_services).cloned().collect(),
        }
    }

    /// True if the modified codebase is estimated to cost more.
    pub fn is_increase(&self) -> bool {
        self.delta > 0.0
    }

    /// True if any service appeared or disappeared.
    pub fn has_service_changes(&self) -> bool {
        !self.new_services.is_empty() || !self.removed_services.is_empty()
    }
}

/// Percentage change of `delta` against `baseline`; a zero baseline reports 0%.
pub fn pct_change(baseline: f64, delta: f64) -> f64 {
    if baseline > 0.0 {
        delta / baseline * 100.0
    } else {
        0.0
    }
}
