//! Result normalization.
//!
//! A number evaluated over a frame with data becomes a constant series on
//! the shared index. Without data there is no index to broadcast onto, so
//! the number is returned as-is. Series results already sit on the index.

use crate::domain::error::FormulaError;
use crate::domain::namespace::Value;
use crate::domain::series::{SeriesFrame, SeriesPoint, TimeSeries};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Series(TimeSeries),
    Scalar(f64),
}

impl Outcome {
    /// The raw values, one per index position (a single value for a scalar).
    pub fn values(&self) -> Vec<f64> {
        match self {
            Outcome::Series(points) => points.iter().map(|p| p.value).collect(),
            Outcome::Scalar(v) => vec![*v],
        }
    }
}

pub fn normalize(
    value: Value<'_>,
    frame: &SeriesFrame,
    has_series: bool,
) -> Result<Outcome, FormulaError> {
    match value {
        Value::Scalar(v) if has_series => Ok(Outcome::Series(
            frame
                .index
                .iter()
                .map(|&ts| SeriesPoint::new(ts, v))
                .collect(),
        )),
        Value::Scalar(v) => Ok(Outcome::Scalar(v)),
        Value::Series(values) => {
            if values.len() != frame.len() {
                return Err(FormulaError::evaluation(format!(
                    "result has {} values but the index has {}",
                    values.len(),
                    frame.len()
                )));
            }
            Ok(Outcome::Series(
                frame
                    .index
                    .iter()
                    .zip(values.iter())
                    .map(|(&ts, &v)| SeriesPoint::new(ts, v))
                    .collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn index(n: usize) -> Vec<NaiveDateTime> {
        (0..n)
            .map(|i| {
                NaiveDate::from_ymd_opt(2024, 3, 1 + i as u32)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn scalar_broadcasts_over_index() {
        let frame = SeriesFrame::new(index(3)).with_column("A", vec![1.0, 2.0, 3.0]);
        let outcome = normalize(Value::Scalar(100.0), &frame, true).unwrap();
        match outcome {
            Outcome::Series(points) => {
                assert_eq!(points.len(), 3);
                assert!(points.iter().all(|p| p.value == 100.0));
                assert_eq!(points[1].timestamp, frame.index[1]);
            }
            Outcome::Scalar(_) => panic!("expected series"),
        }
    }

    #[test]
    fn scalar_without_series_stays_scalar() {
        let frame = SeriesFrame::default();
        let outcome = normalize(Value::Scalar(42.0), &frame, false).unwrap();
        assert_eq!(outcome, Outcome::Scalar(42.0));
        assert_eq!(outcome.values(), vec![42.0]);
    }

    #[test]
    fn series_zips_with_index() {
        let frame = SeriesFrame::new(index(2)).with_column("A", vec![1.0, 2.0]);
        let outcome = normalize(Value::series(vec![7.0, f64::NAN]), &frame, true).unwrap();
        let values = outcome.values();
        assert_eq!(values[0], 7.0);
        assert!(values[1].is_nan());
    }

    #[test]
    fn series_length_mismatch_is_rejected() {
        let frame = SeriesFrame::new(index(2)).with_column("A", vec![1.0, 2.0]);
        let err = normalize(Value::series(vec![1.0]), &frame, true).unwrap_err();
        assert!(matches!(err, FormulaError::Evaluation { .. }));
    }
}
