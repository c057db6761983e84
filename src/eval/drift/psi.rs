//! Population Stability Index.
//!
//! PSI = Σ (cur% - ref%) * ln(cur% / ref%) over bins derived from reference
//! quantiles. Proportions are clamped to `[MIN_PROPORTION, 1.0]` so empty
//! bins never produce a zero division or `ln(0)`.

use std::collections::BTreeMap;

use super::statistical::{bin_counts, percentile, sorted};
use crate::error::{Error, Result};

/// Default number of bins
pub const DEFAULT_BINS: usize = 10;

/// Largest bin count accepted from configuration
pub const MAX_BINS: usize = 1_000;

/// Lower clamp applied to every bin proportion
pub const MIN_PROPORTION: f64 = 0.001;

/// Quantile-derived breakpoints splitting the real line into half-open bins.
///
/// Bin 0 is `(-inf, b0]`, bin i is `(b[i-1], b[i]]` and the last bin is
/// `(b[k-1], +inf)`. Breakpoints are strictly increasing.
#[derive(Clone, Debug, PartialEq)]
pub struct BinPartition {
    breakpoints: Vec<f64>,
}

impl BinPartition {
    /// Derive the partition from reference quantiles.
    ///
    /// Falls back to quantiles of the pooled reference and current values
    /// when fewer than two distinct reference breakpoints survive.
    pub fn fit(reference: &[f64], current: &[f64], bin_count: usize) -> Self {
        let breakpoints = Self::quantile_breakpoints(&sorted(reference), bin_count);
        if breakpoints.len() >= 2 {
            return Self { breakpoints };
        }
        let mut pooled = reference.to_vec();
        pooled.extend_from_slice(current);
        Self {
            breakpoints: Self::quantile_breakpoints(&sorted(&pooled), bin_count),
        }
    }

    /// `bin_count - 1` interior quantiles at 1/bin_count, 2/bin_count, …, deduplicated.
    ///
    /// The bin count is capped at one more than the number of values.
    fn quantile_breakpoints(sorted_values: &[f64], bin_count: usize) -> Vec<f64> {
        if sorted_values.is_empty() {
            return Vec::new();
        }
        let bin_count = bin_count.min(sorted_values.len().saturating_add(1));
        let mut breakpoints: Vec<f64> = (1..bin_count)
            .map(|i| percentile(sorted_values, i as f64 / bin_count as f64))
            .collect();
        breakpoints.dedup();
        breakpoints
    }

    /// Interior breakpoints
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// Number of bins, including both unbounded tails
    pub fn n_bins(&self) -> usize {
        self.breakpoints.len() + 1
    }

    /// Clamped bin proportions of `values` under this partition
    pub fn proportions(&self, values: &[f64]) -> Vec<f64> {
        let total = values.len() as f64;
        bin_counts(values, &self.breakpoints)
            .into_iter()
            .map(|count| clamp_proportion(count as f64 / total))
            .collect()
    }
}

fn clamp_proportion(p: f64) -> f64 {
    p.clamp(MIN_PROPORTION, 1.0)
}

/// PSI of two aligned proportion vectors (already clamped)
pub fn psi_from_proportions(reference: &[f64], current: &[f64]) -> f64 {
    reference
        .iter()
        .zip(current)
        .map(|(&r, &c)| (c - r) * (c / r).ln())
        .sum()
}

/// Numeric values with NaN/infinite cells removed
pub fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Population stability index between two numeric samples.
///
/// Non-finite values are ignored. Fails with `InvalidInput` when either
/// sample has no finite values or `bin_count` is zero.
pub fn compute_psi(reference: &[f64], current: &[f64], bin_count: usize) -> Result<f64> {
    if bin_count == 0 {
        return Err(Error::InvalidInput("bin count must be positive".to_string()));
    }
    let reference = finite_values(reference);
    let current = finite_values(current);
    if reference.is_empty() {
        return Err(Error::InvalidInput("reference distribution is empty".to_string()));
    }
    if current.is_empty() {
        return Err(Error::InvalidInput("current distribution is empty".to_string()));
    }

    let partition = BinPartition::fit(&reference, &current, bin_count);
    let psi = psi_from_proportions(
        &partition.proportions(&reference),
        &partition.proportions(&current),
    );
    Ok(psi.max(0.0))
}

/// Population stability index between two categorical samples.
///
/// Every category seen in either sample is its own bin.
pub fn compute_categorical_psi(reference: &[String], current: &[String]) -> Result<f64> {
    if reference.is_empty() {
        return Err(Error::InvalidInput("reference distribution is empty".to_string()));
    }
    if current.is_empty() {
        return Err(Error::InvalidInput("current distribution is empty".to_string()));
    }

    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for value in reference {
        counts.entry(value.as_str()).or_default().0 += 1;
    }
    for value in current {
        counts.entry(value.as_str()).or_default().1 += 1;
    }

    let n_ref = reference.len() as f64;
    let n_cur = current.len() as f64;
    let (ref_props, cur_props): (Vec<f64>, Vec<f64>) = counts
        .values()
        .map(|&(r, c)| {
            (
                clamp_proportion(r as f64 / n_ref),
                clamp_proportion(c as f64 / n_cur),
            )
        })
        .unzip();

    Ok(psi_from_proportions(&ref_props, &cur_props).max(0.0))
}
