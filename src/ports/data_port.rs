//! Data access port trait.

use crate::domain::error::TickcalcError;
use crate::domain::series::SeriesPoint;
use chrono::NaiveDateTime;

pub trait DataPort {
    /// Full closing-price history for `symbol`, sorted by timestamp.
    ///
    /// Returns `TickcalcError::NoData` when the store has no such symbol;
    /// any other error means the store itself failed.
    fn fetch_closes(&self, symbol: &str) -> Result<Vec<SeriesPoint>, TickcalcError>;

    fn list_symbols(&self) -> Result<Vec<String>, TickcalcError>;

    /// First timestamp, last timestamp and row count, or `None` when empty.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, TickcalcError> {
        let points = self.fetch_closes(symbol)?;
        Ok(match (points.first(), points.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp, points.len())),
            _ => None,
        })
    }
}
