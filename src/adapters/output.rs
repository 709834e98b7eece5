//! Outcome serialization.
//!
//! Points whose value is NaN or infinite are dropped. Timestamps render at
//! minute resolution for intraday intervals and as plain dates otherwise.

use crate::domain::error::TickcalcError;
use crate::domain::normalize::Outcome;
use std::io::Write;

const DATE_FORMAT: &str = "%Y-%m-%d";
const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "web", derive(serde::Serialize))]
pub struct Row {
    pub t: String,
    pub value: f64,
}

/// Minute and hour intervals (`1m`, `5m`, `1h`) keep the time of day.
pub fn time_format(interval: &str) -> &'static str {
    let interval = interval.trim();
    if interval.ends_with('m') || interval.ends_with('h') {
        MINUTE_FORMAT
    } else {
        DATE_FORMAT
    }
}

/// Finite points of `outcome`. A scalar yields one row with an empty `t`.
pub fn rows(outcome: &Outcome, interval: &str) -> Vec<Row> {
    match outcome {
        Outcome::Series(points) => {
            let format = time_format(interval);
            points
                .iter()
                .filter(|p| p.value.is_finite())
                .map(|p| Row {
                    t: p.timestamp.format(format).to_string(),
                    value: p.value,
                })
                .collect()
        }
        Outcome::Scalar(v) if v.is_finite() => vec![Row {
            t: String::new(),
            value: *v,
        }],
        Outcome::Scalar(_) => Vec::new(),
    }
}

pub fn write_csv<W: Write>(writer: W, rows: &[Row]) -> Result<(), TickcalcError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["t", "value"])
        .map_err(std::io::Error::from)?;
    for row in rows {
        wtr.write_record([row.t.as_str(), row.value.to_string().as_str()])
            .map_err(std::io::Error::from)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::SeriesPoint;
    use chrono::NaiveDate;

    fn point(day: u32, hour: u32, value: f64) -> SeriesPoint {
        let ts = NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap();
        SeriesPoint::new(ts, value)
    }

    #[test]
    fn time_format_by_interval() {
        assert_eq!(time_format("1d"), DATE_FORMAT);
        assert_eq!(time_format("1wk"), DATE_FORMAT);
        assert_eq!(time_format("1mo"), DATE_FORMAT);
        assert_eq!(time_format("5m"), MINUTE_FORMAT);
        assert_eq!(time_format("1h"), MINUTE_FORMAT);
    }

    #[test]
    fn rows_skip_non_finite_values() {
        let outcome = Outcome::Series(vec![
            point(2, 9, f64::NAN),
            point(3, 9, 1.5),
            point(4, 9, f64::INFINITY),
            point(5, 9, -2.0),
        ]);
        let rows = rows(&outcome, "1d");
        assert_eq!(
            rows,
            vec![
                Row {
                    t: "2024-01-03".into(),
                    value: 1.5
                },
                Row {
                    t: "2024-01-05".into(),
                    value: -2.0
                },
            ]
        );
    }

    #[test]
    fn intraday_rows_keep_minutes() {
        let outcome = Outcome::Series(vec![point(2, 14, 3.0)]);
        assert_eq!(rows(&outcome, "1h")[0].t, "2024-01-02 14:30");
    }

    #[test]
    fn scalar_rows() {
        assert_eq!(rows(&Outcome::Scalar(4.0), "1d").len(), 1);
        assert!(rows(&Outcome::Scalar(f64::NAN), "1d").is_empty());
    }

    #[test]
    fn csv_has_header_and_rows() {
        let outcome = Outcome::Series(vec![point(2, 0, 100.0), point(3, 0, 100.25)]);
        let mut buf = Vec::new();
        write_csv(&mut buf, &rows(&outcome, "1d")).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "t,value\n2024-01-02,100\n2024-01-03,100.25\n");
    }

    #[test]
    fn csv_for_empty_rows_is_header_only() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "t,value\n");
    }
}
