//! Formula calculator entry point.
//!
//! `calculate` is pure: it builds a namespace from the frame, parses the
//! expression, evaluates it and normalizes the result. It performs no I/O,
//! keeps no state between calls, and is safe to call from many threads.

use crate::domain::error::FormulaError;
use crate::domain::expr_eval;
use crate::domain::expr_parser;
use crate::domain::namespace::Namespace;
use crate::domain::normalize::{normalize, Outcome};
use crate::domain::series::SeriesFrame;

pub fn calculate(frame: &SeriesFrame, expression: &str) -> Result<Outcome, FormulaError> {
    let namespace = Namespace::build(frame)?;
    let expr = expr_parser::parse(expression)?;
    let value = expr_eval::evaluate(&expr, &namespace)?;
    normalize(value, frame, namespace.has_series())
}
