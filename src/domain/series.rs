//! Time series points and the aligned frame handed to the calculator.
//!
//! A `SeriesFrame` is one shared timestamp index plus any number of named
//! columns, each holding exactly one value per index position. Alignment
//! builds the frame from raw per-symbol histories: the index is the sorted
//! union of every timestamp, and gaps are forward-filled then back-filled.

use chrono::NaiveDateTime;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// An evaluation result laid over the shared index.
pub type TimeSeries = Vec<SeriesPoint>;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesFrame {
    pub index: Vec<NaiveDateTime>,
    pub columns: Vec<Column>,
}

impl SeriesFrame {
    pub fn new(index: Vec<NaiveDateTime>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push(Column {
            name: name.into(),
            values,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.index.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.index.last().copied()
    }

    /// Align raw histories onto the union of their timestamps.
    pub fn align(histories: Vec<(String, Vec<SeriesPoint>)>) -> Self {
        let index = build_unified_timeline(&histories);

        let columns = histories
            .into_iter()
            .map(|(name, points)| {
                let by_time: HashMap<NaiveDateTime, f64> =
                    points.iter().map(|p| (p.timestamp, p.value)).collect();
                let mut values: Vec<f64> = index
                    .iter()
                    .map(|ts| by_time.get(ts).copied().unwrap_or(f64::NAN))
                    .collect();
                forward_fill(&mut values);
                back_fill(&mut values);
                Column { name, values }
            })
            .collect();

        Self { index, columns }
    }

    /// Keep only index positions within `[start, end]`, inclusive.
    pub fn slice(&self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let from = self.index.partition_point(|ts| *ts < start);
        let to = self.index.partition_point(|ts| *ts <= end).max(from);

        Self {
            index: self.index[from..to].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values[from..to].to_vec(),
                })
                .collect(),
        }
    }
}

pub fn build_unified_timeline(histories: &[(String, Vec<SeriesPoint>)]) -> Vec<NaiveDateTime> {
    let unique: BTreeSet<NaiveDateTime> = histories
        .iter()
        .flat_map(|(_, points)| points.iter().map(|p| p.timestamp))
        .collect();
    unique.into_iter().collect()
}

pub fn forward_fill(values: &mut [f64]) {
    let mut last = f64::NAN;
    for v in values.iter_mut() {
        if v.is_nan() {
            *v = last;
        } else {
            last = *v;
        }
    }
}

pub fn back_fill(values: &mut [f64]) {
    let mut next = f64::NAN;
    for v in values.iter_mut().rev() {
        if v.is_nan() {
            *v = next;
        } else {
            next = *v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(date: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn point(date: &str, value: f64) -> SeriesPoint {
        SeriesPoint::new(ts(date), value)
    }

    #[test]
    fn unified_timeline_merges_and_sorts() {
        let histories = vec![
            (
                "A".to_string(),
                vec![point("2024-01-03", 3.0), point("2024-01-01", 1.0)],
            ),
            (
                "B".to_string(),
                vec![point("2024-01-02", 2.0), point("2024-01-03", 3.0)],
            ),
        ];
        let timeline = build_unified_timeline(&histories);
        assert_eq!(
            timeline,
            vec![ts("2024-01-01"), ts("2024-01-02"), ts("2024-01-03")]
        );
    }

    #[test]
    fn align_forward_then_back_fills() {
        let histories = vec![
            (
                "A".to_string(),
                vec![point("2024-01-01", 10.0), point("2024-01-03", 30.0)],
            ),
            (
                "B".to_string(),
                vec![point("2024-01-02", 200.0), point("2024-01-04", 400.0)],
            ),
        ];
        let frame = SeriesFrame::align(histories);

        assert_eq!(frame.len(), 4);
        assert_eq!(frame.column("A").unwrap(), &[10.0, 10.0, 30.0, 30.0]);
        assert_eq!(frame.column("B").unwrap(), &[200.0, 200.0, 200.0, 400.0]);
    }

    #[test]
    fn align_fills_nan_values_from_source() {
        let histories = vec![(
            "A".to_string(),
            vec![
                point("2024-01-01", f64::NAN),
                point("2024-01-02", 2.0),
                point("2024-01-03", f64::NAN),
            ],
        )];
        let frame = SeriesFrame::align(histories);
        assert_eq!(frame.column("A").unwrap(), &[2.0, 2.0, 2.0]);
    }

    #[test]
    fn align_empty_histories() {
        let frame = SeriesFrame::align(vec![]);
        assert!(frame.is_empty());
        assert!(frame.columns.is_empty());
    }

    #[test]
    fn slice_is_inclusive() {
        let frame = SeriesFrame::new(vec![
            ts("2024-01-01"),
            ts("2024-01-02"),
            ts("2024-01-03"),
            ts("2024-01-04"),
        ])
        .with_column("A", vec![1.0, 2.0, 3.0, 4.0]);

        let sliced = frame.slice(ts("2024-01-02"), ts("2024-01-03"));
        assert_eq!(sliced.index, vec![ts("2024-01-02"), ts("2024-01-03")]);
        assert_eq!(sliced.column("A").unwrap(), &[2.0, 3.0]);
    }

    #[test]
    fn slice_outside_range_is_empty() {
        let frame =
            SeriesFrame::new(vec![ts("2024-01-01")]).with_column("A", vec![1.0]);
        let sliced = frame.slice(ts("2025-01-01"), ts("2025-12-31"));
        assert!(sliced.is_empty());
        assert_eq!(sliced.column("A").unwrap().len(), 0);
    }

    #[test]
    fn slice_inverted_bounds_is_empty() {
        let frame = SeriesFrame::new(vec![ts("2024-01-01"), ts("2024-01-02")])
            .with_column("A", vec![1.0, 2.0]);
        let sliced = frame.slice(ts("2024-01-02"), ts("2024-01-01"));
        assert!(sliced.is_empty());
    }

    #[test]
    fn fills_leave_all_nan_column_untouched() {
        let mut values = vec![f64::NAN, f64::NAN];
        forward_fill(&mut values);
        back_fill(&mut values);
        assert!(values.iter().all(|v| v.is_nan()));
    }
}
