//! Rolling-window kernels behind `sma`, `ema` and `std`.
//!
//! Each kernel takes a slice of values sharing the frame index and returns a
//! vector of the same length. Positions without enough history are NaN.

pub mod ema;
pub mod sma;
pub mod stddev;

pub use ema::ema;
pub use sma::sma;
pub use stddev::stddev;

/// Coerce a window argument to a positive integer, truncating toward zero.
pub fn window_length(raw: f64) -> Option<usize> {
    if !raw.is_finite() {
        return None;
    }
    let truncated = raw.trunc();
    if truncated < 1.0 || truncated > usize::MAX as f64 {
        return None;
    }
    Some(truncated as usize)
}
