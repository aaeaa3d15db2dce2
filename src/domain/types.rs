//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for comparisons across runs
//!
//! Everything downstream of the sanitizer treats these as read-only: each
//! pipeline stage creates its output once and hands it to the next stage.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default number of breakpoints for the primary spline fit.
pub const DEFAULT_BREAKPOINT_COUNT: usize = 30;

/// Default smoothing penalty for the near-interpolation fallback.
///
/// Chosen close to zero so the fallback behaves almost like an interpolant
/// while keeping the penalized system solvable.
pub const DEFAULT_NEAR_INTERP_PENALTY: f64 = 1e-10;

/// Default smoothing parameter for the last-resort discrete smoother.
pub const DEFAULT_FIXED_SMOOTH_PENALTY: f64 = 0.001;

/// One observation: an `(x, y)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

/// A sanitized, ordered sequence of samples.
///
/// Invariants (established by the sanitizer, relied on everywhere else):
/// - x strictly increasing, no duplicates
/// - no NaN/Inf in either coordinate
///
/// An empty dataset is a valid (degenerate) value; downstream stages reject
/// it explicitly rather than assuming content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub samples: Vec<Sample>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.y).collect()
    }

    /// `(min(x), max(x))`, using the sort invariant. `None` when empty.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some((first.x, last.x))
    }

    /// `(min(y), max(y))`. `None` when empty.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for s in &self.samples {
            min_y = min_y.min(s.y);
            max_y = max_y.max(s.y);
        }
        if self.samples.is_empty() {
            None
        } else {
            Some((min_y, max_y))
        }
    }

    /// Summary stats for reporting. `None` when empty.
    pub fn stats(&self) -> Option<DatasetStats> {
        let (x_min, x_max) = self.x_range()?;
        let (y_min, y_max) = self.y_range()?;
        Some(DatasetStats {
            n_points: self.len(),
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

/// Summary stats about the samples actually used for fitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// An ordered set of breakpoints spanning the dataset's x-range.
///
/// Invariants: strictly increasing, count >= 2, first == min(x),
/// last == max(x). Owned by a single pipeline run and discarded after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakpointSet {
    pub values: Vec<f64>,
}

impl BreakpointSet {
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Number of spline segments implied by the breakpoints.
    pub fn segment_count(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    pub fn first(&self) -> f64 {
        self.values[0]
    }

    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }
}

/// Which fitting strategy produced a result.
///
/// The order of variants mirrors the escalation order of the fit engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMethod {
    /// Least-squares cubic spline constrained to the breakpoints.
    LsqSpline,
    /// Penalized spline with knots at the data sites and a tiny penalty.
    NearInterp,
    /// Discrete second-difference smoother with a fixed penalty.
    FixedSmoother,
}

impl FitMethod {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            FitMethod::LsqSpline => "LSQ cubic spline",
            FitMethod::NearInterp => "near-interpolation smoother",
            FitMethod::FixedSmoother => "fixed-penalty smoother",
        }
    }
}

/// Output of the fit engine.
///
/// `fitted` holds one value per dataset sample, in dataset order. The engine
/// guarantees every value is finite before constructing this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    pub method: FitMethod,
    pub fitted: Vec<f64>,
}

/// One row of the row-aligned result stream handed to plotting and export.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResidualRow {
    pub x: f64,
    pub y_obs: f64,
    pub y_fit: f64,
    /// `y_obs - y_fit`.
    pub residual: f64,
}

/// Scalar fit-quality metrics.
///
/// Metrics whose denominator can be zero are `Option<f64>`: `None` is the
/// documented "undefined" sentinel (constant y, perfect fit, constant
/// residuals). NaN/Inf are never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSet {
    pub n: usize,
    /// Sum of squared residuals.
    pub se: f64,
    /// Residual 2-norm, `sqrt(se)`.
    pub norm2: f64,
    /// `sqrt(se / n)`.
    pub rmse: f64,
    /// Coefficient of determination. `None` when y is constant.
    pub r_squared: Option<f64>,
    /// RMSE as a percentage of the y-range. `None` when y is constant.
    pub rel_rmse_pct: Option<f64>,
    /// `|mean(residual)| / rmse`. `None` for a perfect fit (rmse == 0).
    pub bias_ratio: Option<f64>,
    pub residual_mean: f64,
    pub residual_std: f64,
    pub residual_min: f64,
    pub residual_max: f64,
    pub residual_median_abs: f64,
    /// Percentage of standardized residuals within +/-2 sigma.
    /// `None` when the residual spread is zero.
    pub within_2sigma_pct: Option<f64>,
}

/// Qualitative verdicts derived from a `KpiSet`.
///
/// A `None` verdict means the underlying KPI was undefined; the classifier
/// propagates that instead of substituting a default grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub r_squared: Option<String>,
    pub rel_rmse: Option<String>,
    pub bias: Option<String>,
    pub coverage: Option<String>,
}

/// Direction of a threshold comparison in a grade band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandOrder {
    /// The value must be strictly greater than the cutoff to earn the label.
    Above,
    /// The value must be strictly less than the cutoff to earn the label.
    Below,
}

/// One `(cutoff, label)` entry of a grade scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub cutoff: f64,
    pub label: String,
}

/// A declarative, ordered threshold table for one metric.
///
/// Bands are checked in order; the first strict comparison that holds wins,
/// otherwise `fallback` applies. Keeping the rules as data keeps the
/// classifier itself generic and lets callers override the whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeScale {
    pub order: BandOrder,
    pub bands: Vec<GradeBand>,
    pub fallback: String,
}

impl GradeScale {
    fn band(order: BandOrder, cutoffs: &[(f64, &str)], fallback: &str) -> Self {
        Self {
            order,
            bands: cutoffs
                .iter()
                .map(|&(cutoff, label)| GradeBand {
                    cutoff,
                    label: label.to_string(),
                })
                .collect(),
            fallback: fallback.to_string(),
        }
    }

    /// Look up the label for `value`. Comparisons are strict, so a value
    /// sitting exactly on a cutoff falls through to the next band.
    pub fn grade(&self, value: f64) -> &str {
        for band in &self.bands {
            let hit = match self.order {
                BandOrder::Above => value > band.cutoff,
                BandOrder::Below => value < band.cutoff,
            };
            if hit {
                return &band.label;
            }
        }
        &self.fallback
    }
}

/// The full set of classifier threshold tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityThresholds {
    pub r_squared: GradeScale,
    pub rel_rmse: GradeScale,
    pub bias_ratio: GradeScale,
    pub within_2sigma: GradeScale,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            r_squared: GradeScale::band(
                BandOrder::Above,
                &[
                    (0.95, "Excellent"),
                    (0.90, "Good"),
                    (0.80, "Acceptable"),
                    (0.70, "Moderate"),
                ],
                "Poor",
            ),
            rel_rmse: GradeScale::band(
                BandOrder::Below,
                &[(5.0, "Excellent"), (10.0, "Good"), (15.0, "Acceptable")],
                "Poor",
            ),
            bias_ratio: GradeScale::band(
                BandOrder::Below,
                &[(0.05, "no systematic bias"), (0.10, "minor bias")],
                "significant bias",
            ),
            within_2sigma: GradeScale::band(
                BandOrder::Above,
                &[(93.0, "good (expected ~95%)")],
                "check for outliers",
            ),
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Number of breakpoints for the primary fit (>= 2).
    pub breakpoint_count: usize,
    /// Smoothing penalty for the near-interpolation fallback.
    pub near_interp_penalty: f64,
    /// Smoothing parameter for the last-resort smoother.
    pub fixed_smooth_penalty: f64,
    /// Classifier threshold tables.
    pub thresholds: QualityThresholds,

    /// Show top-N worst-fitting samples.
    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_report: Option<PathBuf>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            breakpoint_count: DEFAULT_BREAKPOINT_COUNT,
            near_interp_penalty: DEFAULT_NEAR_INTERP_PENALTY,
            fixed_smooth_penalty: DEFAULT_FIXED_SMOOTH_PENALTY,
            thresholds: QualityThresholds::default(),
            top_n: 10,
            plot: true,
            plot_width: 100,
            plot_height: 25,
            export_results: None,
            export_report: None,
        }
    }
}

/// A saved fit report (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFile {
    pub tool: String,
    pub method: FitMethod,
    pub stats: DatasetStats,
    pub breakpoint_count: usize,
    pub kpis: KpiSet,
    pub quality: QualityReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_ranges_use_sort_invariant() {
        let ds = Dataset {
            samples: vec![
                Sample { x: 0.0, y: 3.0 },
                Sample { x: 1.0, y: -1.0 },
                Sample { x: 2.0, y: 2.0 },
            ],
        };
        assert_eq!(ds.x_range(), Some((0.0, 2.0)));
        assert_eq!(ds.y_range(), Some((-1.0, 3.0)));
        assert!(Dataset::default().x_range().is_none());
    }

    #[test]
    fn breakpoint_segment_count() {
        let bp = BreakpointSet {
            values: vec![0.0, 1.0, 2.0],
        };
        assert_eq!(bp.count(), 3);
        assert_eq!(bp.segment_count(), 2);
    }

    #[test]
    fn grade_scale_comparisons_are_strict() {
        let scale = QualityThresholds::default().r_squared;
        assert_eq!(scale.grade(0.96), "Excellent");
        assert_eq!(scale.grade(0.95), "Good");
        assert_eq!(scale.grade(0.5), "Poor");
    }
}
