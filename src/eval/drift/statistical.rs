//! Statistical helper functions for drift detection.

/// Count samples per bin, where bin `i` is `(breakpoints[i-1], breakpoints[i]]`
/// and the outer bins extend to -inf and +inf.
///
/// `breakpoints` must be sorted ascending.
pub fn bin_counts(data: &[f64], breakpoints: &[f64]) -> Vec<usize> {
    let mut counts = vec![0; breakpoints.len() + 1];
    for &val in data {
        counts[breakpoints.partition_point(|&b| b < val)] += 1;
    }
    counts
}

/// Percentile of sorted data with linear interpolation between closest ranks.
///
/// `q` is a fraction in `[0, 1]`. Returns NaN for empty input.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Two-sample Kolmogorov-Smirnov statistic: the largest gap between the
/// empirical CDFs of two sorted samples.
pub fn ks_statistic(sorted_a: &[f64], sorted_b: &[f64]) -> f64 {
    if sorted_a.is_empty() || sorted_b.is_empty() {
        return 0.0;
    }
    let n1 = sorted_a.len() as f64;
    let n2 = sorted_b.len() as f64;

    let mut d_max = 0.0f64;
    let mut i = 0usize;
    let mut j = 0usize;
    while i < sorted_a.len() && j < sorted_b.len() {
        let x = sorted_a[i].min(sorted_b[j]);
        while i < sorted_a.len() && sorted_a[i] <= x {
            i += 1;
        }
        while j < sorted_b.len() && sorted_b[j] <= x {
            j += 1;
        }
        d_max = d_max.max((i as f64 / n1 - j as f64 / n2).abs());
    }
    d_max
}

/// Asymptotic p-value for a two-sample KS statistic with sample sizes `n1`, `n2`.
pub fn ks_two_sample_p_value(d: f64, n1: usize, n2: usize) -> f64 {
    if n1 == 0 || n2 == 0 {
        return 1.0;
    }
    let n_eff = (n1 as f64 * n2 as f64) / (n1 + n2) as f64;
    ks_p_value(d * n_eff.sqrt())
}

/// Approximate p-value for KS statistic using Kolmogorov distribution
pub fn ks_p_value(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    // Asymptotic approximation: P(D > d) ≈ 2 * sum_{k=1}^∞ (-1)^{k+1} * exp(-2 * k^2 * λ^2)
    let mut p = 0.0;
    for k in 1..=100 {
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let term = sign * (-2.0 * f64::from(k).powi(2) * lambda.powi(2)).exp();
        p += term;
        if term.abs() < 1e-10 {
            break;
        }
    }
    (2.0 * p).clamp(0.0, 1.0)
}

/// Sort a copy of the data ascending (NaN-free input expected)
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut out = data.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}
