//! Rolling sample standard deviation.
//!
//! STD(n)[i] = sqrt(sum((x[i-j] - mean)^2 for j in 0..n) / (n - 1))
//! Warmup: first (n-1) positions are NaN. A window of 1 has no spread
//! estimate and is NaN everywhere.

pub fn stddev(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window < 2 {
        return out;
    }

    for (i, slice) in values.windows(window).enumerate() {
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance = slice
            .iter()
            .map(|x| {
                let diff = x - mean;
                diff * diff
            })
            .sum::<f64>()
            / (window - 1) as f64;
        out[i + window - 1] = variance.sqrt();
    }

    out
}
