//! Ticker extraction from a raw expression.
//!
//! Symbols are the free identifiers of the parsed expression that look like
//! market tickers: two or more characters, an uppercase first letter, and
//! only uppercase letters or digits after it. Callee names never count.

use crate::domain::error::ParseError;
use crate::domain::expr_parser;
use crate::domain::function;

pub fn is_ticker(name: &str) -> bool {
    let mut chars = name.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    first_ok
        && name.len() >= 2
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        && !function::is_reserved(name)
}

/// Distinct ticker symbols in order of first appearance.
pub fn extract_tickers(expression: &str) -> Result<Vec<String>, ParseError> {
    let expr = expr_parser::parse(expression)?;
    Ok(expr
        .identifiers()
        .into_iter()
        .filter(|name| is_ticker(name))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_in_order_of_appearance() {
        let tickers = extract_tickers("sin(AAPL) + sma(TSLA, 20) * pi").unwrap();
        assert_eq!(tickers, vec!["AAPL", "TSLA"]);
    }

    #[test]
    fn deduplicates() {
        let tickers = extract_tickers("AAPL / AAPL + MSFT - AAPL").unwrap();
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn ignores_time_constants_and_lowercase() {
        let tickers = extract_tickers("t^2 + e + pi + x + aapl").unwrap();
        assert!(tickers.is_empty());
    }

    #[test]
    fn ignores_single_letters() {
        let tickers = extract_tickers("A + B").unwrap();
        assert!(tickers.is_empty());
    }

    #[test]
    fn accepts_digits_after_first_letter() {
        let tickers = extract_tickers("N225 + 2").unwrap();
        assert_eq!(tickers, vec!["N225"]);
    }

    #[test]
    fn callee_names_are_not_tickers() {
        let tickers = extract_tickers("FOO(SPY)").unwrap();
        assert_eq!(tickers, vec!["SPY"]);
    }

    #[test]
    fn propagates_parse_errors() {
        assert!(extract_tickers("AAPL +").is_err());
    }

    #[test]
    fn is_ticker_shape() {
        assert!(is_ticker("SPY"));
        assert!(is_ticker("QQQ3"));
        assert!(!is_ticker("S"));
        assert!(!is_ticker("Spy"));
        assert!(!is_ticker("3M"));
        assert!(!is_ticker("BRK_B"));
    }
}
