//! Residual and KPI computation.
//!
//! All metrics are deterministic pure functions of `(Dataset, FitResult)`.
//! Metrics whose denominator can vanish (constant y, perfect fit, constant
//! residuals) come back as `None` rather than NaN/Inf, so nothing undefined
//! ever reaches the classifier.

use crate::domain::{Dataset, FitResult, KpiSet, ResidualRow};
use crate::error::AppError;

/// Compute the row-aligned `(x, y_obs, y_fit, residual)` stream.
pub fn compute_residuals(
    dataset: &Dataset,
    fit: &FitResult,
) -> Result<Vec<ResidualRow>, AppError> {
    if fit.fitted.len() != dataset.len() {
        return Err(AppError::numeric(format!(
            "Fitted length {} does not match sample count {}.",
            fit.fitted.len(),
            dataset.len()
        )));
    }

    let mut out = Vec::with_capacity(dataset.len());
    for (s, &y_fit) in dataset.samples.iter().zip(&fit.fitted) {
        if !y_fit.is_finite() {
            return Err(AppError::numeric(
                "Non-finite fitted value during residual computation.",
            ));
        }
        out.push(ResidualRow {
            x: s.x,
            y_obs: s.y,
            y_fit,
            residual: s.y - y_fit,
        });
    }
    Ok(out)
}

/// Derive the full KPI record from the residual rows.
pub fn compute_kpis(rows: &[ResidualRow]) -> Result<KpiSet, AppError> {
    let n = rows.len();
    if n == 0 {
        return Err(AppError::degenerate("Cannot compute KPIs with no samples."));
    }
    let n_f = n as f64;

    let se: f64 = rows.iter().map(|r| r.residual * r.residual).sum();
    let norm2 = se.sqrt();
    let rmse = (se / n_f).sqrt();

    let mean_y: f64 = rows.iter().map(|r| r.y_obs).sum::<f64>() / n_f;
    let tss: f64 = rows.iter().map(|r| (r.y_obs - mean_y).powi(2)).sum();
    let r_squared = if tss > 0.0 { Some(1.0 - se / tss) } else { None };

    let (y_min, y_max) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, r| {
        (acc.0.min(r.y_obs), acc.1.max(r.y_obs))
    });
    let y_range = y_max - y_min;
    let rel_rmse_pct = if y_range > 0.0 {
        Some(100.0 * rmse / y_range)
    } else {
        None
    };

    let residual_mean: f64 = rows.iter().map(|r| r.residual).sum::<f64>() / n_f;
    let bias_ratio = if rmse > 0.0 {
        Some(residual_mean.abs() / rmse)
    } else {
        None
    };

    // Population std (denominator n).
    let residual_std = (rows
        .iter()
        .map(|r| (r.residual - residual_mean).powi(2))
        .sum::<f64>()
        / n_f)
        .sqrt();

    let (residual_min, residual_max) = rows
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |acc, r| {
            (acc.0.min(r.residual), acc.1.max(r.residual))
        });

    let mut abs: Vec<f64> = rows.iter().map(|r| r.residual.abs()).collect();
    let residual_median_abs = median_mut(&mut abs).unwrap_or(0.0);

    let within_2sigma_pct = if residual_std > 0.0 {
        let inside = rows
            .iter()
            .filter(|r| ((r.residual - residual_mean) / residual_std).abs() <= 2.0)
            .count();
        Some(100.0 * inside as f64 / n_f)
    } else {
        None
    };

    Ok(KpiSet {
        n,
        se,
        norm2,
        rmse,
        r_squared,
        rel_rmse_pct,
        bias_ratio,
        residual_mean,
        residual_std,
        residual_min,
        residual_max,
        residual_median_abs,
        within_2sigma_pct,
    })
}

fn median_mut(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitMethod, Sample};

    fn dataset(pairs: &[(f64, f64)]) -> Dataset {
        Dataset {
            samples: pairs.iter().map(|&(x, y)| Sample { x, y }).collect(),
        }
    }

    fn fit(values: &[f64]) -> FitResult {
        FitResult {
            method: FitMethod::LsqSpline,
            fitted: values.to_vec(),
        }
    }

    #[test]
    fn residual_rows_are_row_aligned() {
        let ds = dataset(&[(0.0, 1.0), (1.0, 2.0)]);
        let rows = compute_residuals(&ds, &fit(&[0.5, 2.5])).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].residual, 0.5);
        assert_eq!(rows[1].residual, -0.5);
    }

    #[test]
    fn length_mismatch_is_fatal() {
        let ds = dataset(&[(0.0, 1.0), (1.0, 2.0)]);
        let err = compute_residuals(&ds, &fit(&[0.5])).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn se_and_rmse_match_their_definitions() {
        let ds = dataset(&[(0.0, 1.0), (1.0, 3.0), (2.0, 0.0)]);
        let rows = compute_residuals(&ds, &fit(&[0.0, 1.0, 1.0])).unwrap();
        let kpis = compute_kpis(&rows).unwrap();

        let expected_se = 1.0 + 4.0 + 1.0;
        assert_eq!(kpis.se, expected_se);
        assert_eq!(kpis.norm2, expected_se.sqrt());
        assert_eq!(kpis.rmse, (expected_se / 3.0).sqrt());
    }

    #[test]
    fn perfect_fit_flags_undefined_ratios() {
        let ds = dataset(&[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        let rows = compute_residuals(&ds, &fit(&[1.0, 2.0, 3.0])).unwrap();
        let kpis = compute_kpis(&rows).unwrap();

        assert_eq!(kpis.se, 0.0);
        assert_eq!(kpis.r_squared, Some(1.0));
        assert_eq!(kpis.bias_ratio, None);
        assert_eq!(kpis.within_2sigma_pct, None);
    }

    #[test]
    fn constant_y_flags_undefined_variance_metrics() {
        let ds = dataset(&[(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)]);
        let rows = compute_residuals(&ds, &fit(&[4.0, 5.0, 6.0])).unwrap();
        let kpis = compute_kpis(&rows).unwrap();

        assert_eq!(kpis.r_squared, None);
        assert_eq!(kpis.rel_rmse_pct, None);
        assert!(kpis.bias_ratio.is_some());
    }

    #[test]
    fn within_two_sigma_counts_standardized_residuals() {
        // Residuals: nine small, one huge -> the huge one is the only outlier.
        let pairs: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 0.0)).collect();
        let ds = dataset(&pairs);
        let mut fitted = vec![0.1; 10];
        fitted[9] = 10.0;
        let rows = compute_residuals(&ds, &fit(&fitted)).unwrap();
        let kpis = compute_kpis(&rows).unwrap();

        assert_eq!(kpis.within_2sigma_pct, Some(90.0));
    }

    #[test]
    fn empty_rows_are_rejected() {
        assert_eq!(compute_kpis(&[]).unwrap_err().exit_code(), 3);
    }
}
