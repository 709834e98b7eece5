//! Core domain types and logic.

pub mod error;
pub mod function;
pub mod indicator;
pub mod expr;
pub mod expr_parser;
pub mod namespace;
pub mod expr_eval;
pub mod normalize;
pub mod calculator;
pub mod series;
pub mod tickers;
pub mod range;
pub mod calculation;
pub mod settings;
