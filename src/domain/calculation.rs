//! Calculation pipeline.
//!
//! Ties the pure calculator to a data store: extract the tickers an
//! expression mentions, fetch their closes, align them on a shared index,
//! cut the requested range and evaluate.

use crate::domain::calculator::calculate;
use crate::domain::error::{FormulaError, TickcalcError};
use crate::domain::normalize::Outcome;
use crate::domain::range::RangeSpec;
use crate::domain::series::{SeriesFrame, SeriesPoint};
use crate::domain::tickers::extract_tickers;
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub equation: String,
    pub range: RangeSpec,
    pub interval: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub outcome: Outcome,
    /// Symbols that had data and were bound into the namespace.
    pub symbols: Vec<String>,
}

pub fn run_calculation(
    data_port: &dyn DataPort,
    request: &CalculationRequest,
    default_symbol: &str,
) -> Result<Calculation, TickcalcError> {
    let mut requested =
        extract_tickers(&request.equation).map_err(|e| TickcalcError::from(FormulaError::from(e)))?;
    if requested.is_empty() {
        requested.push(default_symbol.to_string());
    }

    let mut histories: Vec<(String, Vec<SeriesPoint>)> = Vec::new();

    for symbol in &requested {
        let points = match data_port.fetch_closes(symbol) {
            Ok(points) => points,
            Err(TickcalcError::NoData { .. }) => {
                tracing::warn!(symbol = %symbol, "skipping symbol (not in data store)");
                continue;
            }
            Err(e) => return Err(e),
        };

        if points.is_empty() {
            tracing::warn!(symbol = %symbol, "skipping symbol (no rows)");
            continue;
        }

        tracing::debug!(symbol = %symbol, rows = points.len(), "fetched closes");
        histories.push((symbol.clone(), points));
    }

    if histories.is_empty() {
        return Err(TickcalcError::NoData {
            symbol: requested.join(", "),
        });
    }

    let aligned = SeriesFrame::align(histories);
    let symbols: Vec<String> = aligned.column_names().into_iter().map(str::to_string).collect();
    let no_data = || TickcalcError::NoData {
        symbol: symbols.join(", "),
    };

    let (start, end) = request.range.resolve(&aligned.index).ok_or_else(no_data)?;
    let frame = aligned.slice(start, end);
    if frame.is_empty() {
        return Err(no_data());
    }

    tracing::info!(
        equation = %request.equation,
        range = %request.range,
        symbols = symbols.len(),
        rows = frame.len(),
        first = ?frame.first_timestamp(),
        last = ?frame.last_timestamp(),
        "evaluating"
    );

    let outcome = calculate(&frame, &request.equation)?;
    Ok(Calculation { outcome, symbols })
}
