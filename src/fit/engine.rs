//! The fit engine: an ordered fallback chain over the strategies.
//!
//! The chain is an explicit list, not nested error handling: each strategy
//! is attempted in order, any failure escalates unconditionally to the next
//! stage (no retry within a stage), and the first strategy whose output
//! passes the finiteness post-check wins. Exhausting the chain is fatal and
//! reports every stage's failure reason.

use crate::domain::{BreakpointSet, Dataset, FitConfig, FitMethod, FitResult};
use crate::error::AppError;
use crate::fit::strategies::{FitFailure, fixed_smoother, lsq_spline, near_interp_spline};

/// Escalation order of the fallback chain.
pub const STRATEGY_CHAIN: [FitMethod; 3] = [
    FitMethod::LsqSpline,
    FitMethod::NearInterp,
    FitMethod::FixedSmoother,
];

/// Run the fallback chain and return the first successful fit.
pub fn fit_dataset(
    dataset: &Dataset,
    breakpoints: &BreakpointSet,
    config: &FitConfig,
) -> Result<FitResult, AppError> {
    if dataset.len() < 2 {
        return Err(AppError::degenerate(format!(
            "Need at least 2 samples to fit (got {}).",
            dataset.len()
        )));
    }

    let mut failures: Vec<(FitMethod, String)> = Vec::new();

    for method in STRATEGY_CHAIN {
        match run_strategy(method, dataset, breakpoints, config) {
            Ok(fitted) => match validate_fitted(&fitted, dataset.len()) {
                Ok(()) => return Ok(FitResult { method, fitted }),
                Err(reason) => failures.push((method, reason)),
            },
            Err(failure) => failures.push((method, failure.reason)),
        }
    }

    let detail: Vec<String> = failures
        .iter()
        .map(|(method, reason)| format!("{}: {reason}", method.display_name()))
        .collect();
    Err(AppError::numeric(format!(
        "All fitting strategies failed. {}",
        detail.join(" | ")
    )))
}

fn run_strategy(
    method: FitMethod,
    dataset: &Dataset,
    breakpoints: &BreakpointSet,
    config: &FitConfig,
) -> Result<Vec<f64>, FitFailure> {
    match method {
        FitMethod::LsqSpline => lsq_spline(dataset, breakpoints),
        FitMethod::NearInterp => near_interp_spline(dataset, config.near_interp_penalty),
        FitMethod::FixedSmoother => fixed_smoother(dataset, config.fixed_smooth_penalty),
    }
}

/// Post-check applied to every winning candidate: right length, all finite.
fn validate_fitted(fitted: &[f64], n: usize) -> Result<(), String> {
    if fitted.len() != n {
        return Err(format!(
            "Fitted length {} does not match sample count {n}.",
            fitted.len()
        ));
    }
    if let Some(bad) = fitted.iter().position(|v| !v.is_finite()) {
        return Err(format!("Non-finite fitted value at index {bad}."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SampleSpec, generate_sample, sanitize};
    use crate::fit::breakpoints::uniform_breakpoints;

    fn sine_dataset(count: usize) -> Dataset {
        let spec = SampleSpec {
            count,
            ..SampleSpec::default()
        };
        sanitize(&generate_sample(&spec).unwrap())
    }

    #[test]
    fn chain_order_is_fixed() {
        assert_eq!(
            STRATEGY_CHAIN,
            [
                FitMethod::LsqSpline,
                FitMethod::NearInterp,
                FitMethod::FixedSmoother
            ]
        );
    }

    #[test]
    fn primary_strategy_wins_on_healthy_data() {
        let ds = sine_dataset(100);
        let bp = uniform_breakpoints(&ds, 30).unwrap();
        let fit = fit_dataset(&ds, &bp, &FitConfig::default()).unwrap();

        assert_eq!(fit.method, FitMethod::LsqSpline);
        assert_eq!(fit.fitted.len(), ds.len());
        assert!(fit.fitted.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn fewer_samples_than_breakpoints_escalates_to_fallback_a() {
        // 12 samples cannot support 32 basis functions; the site-knot
        // penalized spline should pick it up.
        let ds = sine_dataset(12);
        let bp = uniform_breakpoints(&ds, 30).unwrap();
        let fit = fit_dataset(&ds, &bp, &FitConfig::default()).unwrap();

        assert_eq!(fit.method, FitMethod::NearInterp);
        assert!(fit.fitted.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn broken_fallback_a_escalates_to_fallback_b() {
        let ds = sine_dataset(12);
        let bp = uniform_breakpoints(&ds, 30).unwrap();
        // A NaN penalty makes Fallback A unsolvable, forcing the chain all
        // the way to the discrete smoother.
        let config = FitConfig {
            near_interp_penalty: f64::NAN,
            ..FitConfig::default()
        };
        let fit = fit_dataset(&ds, &bp, &config).unwrap();

        assert_eq!(fit.method, FitMethod::FixedSmoother);
        assert!(fit.fitted.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn exhausted_chain_is_fatal_and_names_every_stage() {
        let ds = sine_dataset(12);
        let bp = uniform_breakpoints(&ds, 30).unwrap();
        let config = FitConfig {
            near_interp_penalty: f64::NAN,
            fixed_smooth_penalty: f64::NAN,
            ..FitConfig::default()
        };
        let err = fit_dataset(&ds, &bp, &config).unwrap_err();

        assert_eq!(err.exit_code(), 4);
        let msg = err.to_string();
        for method in STRATEGY_CHAIN {
            assert!(msg.contains(method.display_name()), "missing stage in: {msg}");
        }
    }

    #[test]
    fn single_sample_dataset_is_rejected_up_front() {
        let ds = sanitize(&[(1.0, 1.0)]);
        let bp = BreakpointSet {
            values: vec![0.0, 1.0],
        };
        let err = fit_dataset(&ds, &bp, &FitConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
