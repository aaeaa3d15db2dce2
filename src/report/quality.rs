//! Quality classification: threshold tables applied to a `KpiSet`.
//!
//! The classifier does no computation beyond table lookup. Undefined KPIs
//! (`None`) propagate to `None` verdicts; no default grade is substituted.

use crate::domain::{KpiSet, QualityReport, QualityThresholds};

/// Map the KPIs to qualitative verdicts via the threshold tables.
pub fn classify(kpis: &KpiSet, thresholds: &QualityThresholds) -> QualityReport {
    QualityReport {
        r_squared: kpis
            .r_squared
            .map(|v| thresholds.r_squared.grade(v).to_string()),
        rel_rmse: kpis
            .rel_rmse_pct
            .map(|v| thresholds.rel_rmse.grade(v).to_string()),
        bias: kpis
            .bias_ratio
            .map(|v| thresholds.bias_ratio.grade(v).to_string()),
        coverage: kpis
            .within_2sigma_pct
            .map(|v| thresholds.within_2sigma.grade(v).to_string()),
    }
}
