//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first value, then EMA[i] = x[i]*k + EMA[i-1]*(1-k).
//! No warmup. Leading NaNs stay NaN until the first value seeds the average;
//! later NaNs repeat the previous average.

pub fn ema(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if window == 0 {
        out.resize(values.len(), f64::NAN);
        return out;
    }

    let k = 2.0 / (window as f64 + 1.0);
    let mut state: Option<f64> = None;

    for &x in values {
        let next = match state {
            None if x.is_nan() => None,
            None => Some(x),
            Some(prev) if x.is_nan() => Some(prev),
            Some(prev) => Some(x * k + prev * (1.0 - k)),
        };
        state = next;
        out.push(next.unwrap_or(f64::NAN));
    }

    out
}
