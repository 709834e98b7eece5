//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row naming at
//! least a `date` and a `close` column (`date,open,high,low,close,volume`).
//! Dates are `%Y-%m-%d` or `%Y-%m-%d %H:%M[:%S]`. Blank closes read as NaN.

use crate::domain::error::TickcalcError;
use crate::domain::series::SeriesPoint;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> Result<PathBuf, TickcalcError> {
        let valid = !symbol.is_empty()
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '^' | '='));
        if !valid {
            return Err(TickcalcError::Data {
                reason: format!("invalid symbol '{}'", symbol),
            });
        }
        Ok(self.base_path.join(format!("{}.csv", symbol)))
    }
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TickcalcError> {
    let value = value.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(ts);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TickcalcError::Data {
            reason: format!("invalid date format: '{}'", value),
        })
}

fn parse_close(value: &str) -> Result<f64, TickcalcError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(f64::NAN);
    }
    value.parse().map_err(|e| TickcalcError::Data {
        reason: format!("invalid close value '{}': {}", value, e),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_closes(&self, symbol: &str) -> Result<Vec<SeriesPoint>, TickcalcError> {
        let path = self.csv_path(symbol)?;
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TickcalcError::NoData {
                symbol: symbol.to_string(),
            },
            _ => TickcalcError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            },
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| TickcalcError::Data {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| TickcalcError::Data {
                    reason: format!("missing {} column in {}", name, path.display()),
                })
        };
        let date_col = column("date")?;
        let close_col = column("close")?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TickcalcError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let timestamp = parse_timestamp(record.get(date_col).ok_or_else(|| {
                TickcalcError::Data {
                    reason: "missing date value".into(),
                }
            })?)?;
            let close = parse_close(record.get(close_col).unwrap_or(""))?;

            points.push(SeriesPoint::new(timestamp, close));
        }

        points.sort_by_key(|p| p.timestamp);
        points.dedup_by(|later, kept| {
            if later.timestamp == kept.timestamp {
                *kept = *later;
                true
            } else {
                false
            }
        });
        Ok(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TickcalcError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TickcalcError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TickcalcError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
