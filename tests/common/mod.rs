#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tickcalc::domain::error::TickcalcError;
use tickcalc::domain::series::{SeriesFrame, SeriesPoint};
use tickcalc::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<SeriesPoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, symbol: &str, points: Vec<SeriesPoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_closes(&self, symbol: &str) -> Result<Vec<SeriesPoint>, TickcalcError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TickcalcError::Data {
                reason: reason.clone(),
            });
        }
        self.data
            .get(symbol)
            .cloned()
            .ok_or_else(|| TickcalcError::NoData {
                symbol: symbol.to_string(),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, TickcalcError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn ts(value: &str) -> NaiveDateTime {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn point(day: &str, value: f64) -> SeriesPoint {
    SeriesPoint::new(ts(day), value)
}

/// `count` consecutive daily closes starting at `start_date`, rising by 1.
pub fn generate_points(start_date: &str, count: usize, start_price: f64) -> Vec<SeriesPoint> {
    let start = ts(start_date);
    (0..count)
        .map(|i| SeriesPoint::new(start + chrono::Duration::days(i as i64), start_price + i as f64))
        .collect()
}

/// A frame with a daily index starting 2024-01-01 and the given columns.
pub fn frame(columns: &[(&str, Vec<f64>)]) -> SeriesFrame {
    let len = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
    let index = (0..len)
        .map(|i| ts("2024-01-01") + chrono::Duration::days(i as i64))
        .collect();
    columns
        .iter()
        .fold(SeriesFrame::new(index), |frame, (name, values)| {
            frame.with_column(*name, values.clone())
        })
}

/// Write `<dir>/<symbol>.csv` with `date,open,high,low,close,volume` rows.
pub fn write_symbol_csv(dir: &Path, symbol: &str, closes: &[(&str, f64)]) {
    let mut file = std::fs::File::create(dir.join(format!("{symbol}.csv"))).unwrap();
    writeln!(file, "date,open,high,low,close,volume").unwrap();
    for (day, close) in closes {
        writeln!(file, "{day},{o},{h},{l},{close},1000", o = close - 1.0, h = close + 1.0, l = close - 2.0).unwrap();
    }
}

pub fn write_config(dir: &Path, data_dir: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("tickcalc.ini");
    std::fs::write(
        &path,
        format!("[data]\ndir = {}\n\n{}", data_dir.display(), extra),
    )
    .unwrap();
    path
}
