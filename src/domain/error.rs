//! Domain error types.

/// A parse error with position information for expression parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let column = input
            .get(..self.position)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(self.position);
        let caret = " ".repeat(column) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// The only two ways a formula evaluation can fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormulaError {
    #[error("unknown identifier '{name}'")]
    UnknownIdentifier { name: String },

    #[error("evaluation error: {message}")]
    Evaluation { message: String },
}

impl FormulaError {
    pub fn unknown(name: impl Into<String>) -> Self {
        FormulaError::UnknownIdentifier { name: name.into() }
    }

    pub fn evaluation(message: impl Into<String>) -> Self {
        FormulaError::Evaluation {
            message: message.into(),
        }
    }
}

impl From<ParseError> for FormulaError {
    fn from(err: ParseError) -> Self {
        FormulaError::evaluation(err.to_string())
    }
}

/// Top-level error type for tickcalc.
#[derive(Debug, thiserror::Error)]
pub enum TickcalcError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error("invalid range: {reason}")]
    InvalidRange { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TickcalcError> for std::process::ExitCode {
    fn from(err: &TickcalcError) -> Self {
        let code: u8 = match err {
            TickcalcError::Io(_) => 1,
            TickcalcError::ConfigParse { .. }
            | TickcalcError::ConfigMissing { .. }
            | TickcalcError::ConfigInvalid { .. } => 2,
            TickcalcError::Data { .. } => 3,
            TickcalcError::Formula(_) => 4,
            TickcalcError::NoData { .. } | TickcalcError::InvalidRange { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_points_at_position() {
        let err = ParseError {
            message: "expected expression, found ')'".into(),
            position: 4,
        };
        let ctx = err.display_with_context("A + )");
        let lines: Vec<&str> = ctx.lines().collect();
        assert_eq!(lines[0], "A + )");
        assert_eq!(lines[1], "    ^");
        assert!(lines[2].contains("position 4"));
    }

    #[test]
    fn parse_error_becomes_evaluation_error() {
        let err: FormulaError = ParseError {
            message: "unexpected end of input".into(),
            position: 3,
        }
        .into();
        match err {
            FormulaError::Evaluation { message } => {
                assert!(message.contains("unexpected end of input"));
                assert!(message.contains("position 3"));
            }
            _ => panic!("expected Evaluation error"),
        }
    }

    #[test]
    fn unknown_identifier_display() {
        let err = FormulaError::unknown("AAPL");
        assert_eq!(err.to_string(), "unknown identifier 'AAPL'");
    }

    #[test]
    fn formula_error_converts_to_top_level() {
        let err: TickcalcError = FormulaError::evaluation("division by zero").into();
        assert!(matches!(err, TickcalcError::Formula(_)));
        assert_eq!(err.to_string(), "evaluation error: division by zero");
    }
}
