//! Date-range selection for a calculation.
//!
//! Presets (`5d`, `1mo`, `1y`, `ytd`, `max`, ...) are resolved against the
//! aligned index, anchored at its last timestamp. `Nd` counts distinct
//! trading dates present in the index; `Nmo` and `Ny` step back calendar
//! months. A custom range is an inclusive pair of dates.

use crate::domain::error::TickcalcError;
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    Days(u32),
    Months(u32),
    Years(u32),
    YearToDate,
    Max,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl RangeSpec {
    /// Build from the request shape: a preset name, or `custom` with both dates.
    pub fn from_parts(
        range: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, TickcalcError> {
        if range.trim().eq_ignore_ascii_case("custom") {
            let (Some(start), Some(end)) = (start, end) else {
                return Err(TickcalcError::InvalidRange {
                    reason: "custom range requires both start and end dates".to_string(),
                });
            };
            return Self::custom(parse_date(start)?, parse_date(end)?);
        }
        range.parse()
    }

    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self, TickcalcError> {
        if start > end {
            return Err(TickcalcError::InvalidRange {
                reason: format!("start {} is after end {}", start, end),
            });
        }
        Ok(RangeSpec::Custom { start, end })
    }

    /// Inclusive `[start, end]` bounds over `index`, or `None` when the
    /// index is empty.
    pub fn resolve(&self, index: &[NaiveDateTime]) -> Option<(NaiveDateTime, NaiveDateTime)> {
        if let RangeSpec::Custom { start, end } = self {
            return Some((start.and_time(NaiveTime::MIN), end_of_day(*end)));
        }

        let first = *index.first()?;
        let last = *index.last()?;
        let last_date = last.date();

        let start = match self {
            RangeSpec::Days(n) => nth_last_date(index, *n as usize).and_time(NaiveTime::MIN),
            RangeSpec::Months(n) => months_back(last_date, *n),
            RangeSpec::Years(n) => months_back(last_date, n.saturating_mul(12)),
            RangeSpec::YearToDate => NaiveDate::from_ymd_opt(last_date.year(), 1, 1)
                .map(|d| d.and_time(NaiveTime::MIN))
                .unwrap_or(first),
            RangeSpec::Max | RangeSpec::Custom { .. } => first,
        };

        Some((start.max(first), last))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, TickcalcError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| TickcalcError::InvalidRange {
        reason: format!("invalid date '{}': {}", value, e),
    })
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59).unwrap_or(date.and_time(NaiveTime::MIN))
}

fn months_back(date: NaiveDate, months: u32) -> NaiveDateTime {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
}

fn nth_last_date(index: &[NaiveDateTime], n: usize) -> NaiveDate {
    let mut seen = 0;
    let mut current = None;
    for ts in index.iter().rev() {
        let date = ts.date();
        if current != Some(date) {
            if seen == n {
                break;
            }
            seen += 1;
            current = Some(date);
        }
    }
    current.unwrap_or(NaiveDate::MIN)
}

impl FromStr for RangeSpec {
    type Err = TickcalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        let invalid = || TickcalcError::InvalidRange {
            reason: format!(
                "unknown range '{}' (expected e.g. 5d, 1mo, 6mo, 1y, ytd, max, custom)",
                s
            ),
        };

        match trimmed.as_str() {
            "ytd" => return Ok(RangeSpec::YearToDate),
            "max" => return Ok(RangeSpec::Max),
            _ => {}
        }

        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (count, unit) = trimmed.split_at(split);
        let count: u32 = count.parse().map_err(|_| invalid())?;
        if count == 0 {
            return Err(invalid());
        }

        match unit {
            "d" => Ok(RangeSpec::Days(count)),
            "mo" => Ok(RangeSpec::Months(count)),
            "y" => Ok(RangeSpec::Years(count)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeSpec::Days(n) => write!(f, "{}d", n),
            RangeSpec::Months(n) => write!(f, "{}mo", n),
            RangeSpec::Years(n) => write!(f, "{}y", n),
            RangeSpec::YearToDate => write!(f, "ytd"),
            RangeSpec::Max => write!(f, "max"),
            RangeSpec::Custom { start, end } => write!(f, "{}..{}", start, end),
        }
    }
}
