//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(x[i-n+1..=i]). Warmup: first (n-1) positions are NaN.

pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 {
        return out;
    }

    for (i, slice) in values.windows(window).enumerate() {
        out[i + window - 1] = slice.iter().sum::<f64>() / window as f64;
    }

    out
}
