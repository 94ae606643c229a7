//! Monthly cost threshold check.

use serde::{Deserialize, Serialize};

/// Outcome of comparing a cost against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Cost is strictly above the threshold
    Exceeded,
    /// Cost is at or below the threshold
    WithinThreshold,
}

/// A cost compared against an alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCheck {
    pub total_cost: f64,
    pub threshold: f64,
    pub status: AlertStatus,
}

impl ThresholdCheck {
    /// Compare `total_cost` against `threshold`.
    pub fn evaluate(total_cost: f64, threshold: f64) -> Self {
        let status = if total_cost > threshold {
            AlertStatus::Exceeded
        } else {
            AlertStatus::WithinThreshold
        };

        Self {
            total_cost,
            threshold,
            status,
        }
    }

    /// True if the threshold was exceeded.
    pub fn is_exceeded(&self) -> bool {
        self.status == AlertStatus::Exceeded
    }

    /// How far above the threshold the cost is (0 when within).
    pub fn overage(&self) -> f64 {
        (self.total_cost - self.threshold).max(0.0)
    }
}
