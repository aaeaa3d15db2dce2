//! Dataset sanitization.
//!
//! Raw `(x, y)` input can contain NaN/Inf, duplicate x values, and arbitrary
//! ordering. The sanitizer normalizes it in three steps:
//!
//! 1. drop any pair where either coordinate is non-finite
//! 2. deduplicate by x, keeping the **first** occurrence in input order
//!    (later duplicate observations at the same x are discarded, not averaged)
//! 3. sort ascending by x, carrying y along
//!
//! An empty result is a valid degenerate output; rejecting it is the
//! pipeline's job, not the sanitizer's.

use std::collections::HashSet;

use crate::domain::{Dataset, Sample};

/// Normalize raw pairs into a `Dataset` satisfying the dataset invariants.
pub fn sanitize(raw: &[(f64, f64)]) -> Dataset {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut samples: Vec<Sample> = Vec::with_capacity(raw.len());

    for &(x, y) in raw {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        // Dedup by value: -0.0 and 0.0 are the same x.
        let key = (if x == 0.0 { 0.0f64 } else { x }).to_bits();
        if seen.insert(key) {
            samples.push(Sample { x, y });
        }
    }

    samples.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

    Dataset { samples }
}
