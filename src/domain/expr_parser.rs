//! Formula expression parser.
//!
//! Recursive descent parser for the arithmetic grammar. Converts text to an
//! `Expr` tree with meaningful error messages including character offset and
//! expected/found tokens.
//!
//! Precedence, lowest first: `+ -`, `* /`, unary `- +`, `** ^`.
//! Power is right-associative and binds tighter than a leading minus, so
//! `-2**2` is `-(2**2)` while `2**-1` is allowed.
//!
//! Two limits keep the tree shallow enough to walk recursively: nesting
//! (parentheses, calls, unary chains) is capped at `MAX_DEPTH`, and every
//! tree level, including the left-deep `a + b + c ...` chains built in a
//! loop, is charged against a `MAX_HEIGHT` budget.

use crate::domain::error::ParseError;
use crate::domain::expr::{BinaryOp, Expr};

const MAX_DEPTH: usize = 64;
const MAX_HEIGHT: usize = 256;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
    height: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
            height: 0,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(ParseError {
                message: format!("expected '{}', found '{}'", expected, ch),
                position: self.pos,
            }),
            None => Err(ParseError {
                message: format!("expected '{}', found end of input", expected),
                position: self.pos,
            }),
        }
    }

    fn consume_exact(&mut self, s: &str) -> bool {
        if self.remaining().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError {
                message: format!("expression nested deeper than {} levels", MAX_DEPTH),
                position: self.pos,
            });
        }
        self.grow()
    }

    fn ascend(&mut self) {
        self.depth -= 1;
        self.height -= 1;
    }

    fn grow(&mut self) -> Result<(), ParseError> {
        self.height += 1;
        if self.height > MAX_HEIGHT {
            return Err(ParseError {
                message: format!(
                    "expression too long: more than {} levels of operations",
                    MAX_HEIGHT
                ),
                position: self.pos,
            });
        }
        Ok(())
    }

    fn describe_next(&self) -> String {
        self.peek()
            .map(|c| format!("'{}'", c))
            .unwrap_or_else(|| "end of input".to_string())
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;
        let mut digits = 0;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits += 1;
                self.advance();
            } else {
                break;
            }
        }

        if self.peek() == Some('.') {
            self.advance();
            while let Some(ch) = self.peek() {
                if ch.is_ascii_digit() {
                    digits += 1;
                    self.advance();
                } else {
                    break;
                }
            }
        }

        if digits == 0 {
            return Err(ParseError {
                message: "expected number".to_string(),
                position: start,
            });
        }

        // Exponent only counts when digits follow, so `2e` leaves the `e` alone.
        let rest = self.remaining().as_bytes();
        if matches!(rest.first(), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(rest.get(1), Some(b'+' | b'-')));
            if rest.get(1 + sign).is_some_and(u8::is_ascii_digit) {
                self.pos += 1 + sign;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let num_str = &self.input[start..self.pos];
        num_str.parse::<f64>().map_err(|_| ParseError {
            message: format!("invalid number: {}", num_str),
            position: start,
        })
    }

    fn parse_identifier(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect_char('(')?;
        let mut args = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.advance();
            return Ok(args);
        }

        args.push(self.parse_expr()?);
        loop {
            self.skip_whitespace();
            if self.peek() == Some(')') {
                self.advance();
                break;
            }
            self.expect_char(',')?;
            args.push(self.parse_expr()?);
        }

        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        self.skip_whitespace();

        match self.peek() {
            Some(ch) if ch.is_ascii_digit() || ch == '.' => Ok(Expr::Number(self.parse_number()?)),
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                let name = self.parse_identifier();
                self.skip_whitespace();
                if self.peek() == Some('(') {
                    let args = self.parse_arguments()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            Some('(') => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect_char(')')?;
                Ok(inner)
            }
            _ => Err(ParseError {
                message: format!("expected expression, found {}", self.describe_next()),
                position: self.pos,
            }),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_primary()?;
        self.skip_whitespace();
        if self.consume_exact("**") || self.consume_exact("^") {
            let exponent = self.parse_unary()?;
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        self.skip_whitespace();
        self.descend()?;

        let expr = match self.peek() {
            Some('-') => {
                self.advance();
                Expr::Neg(Box::new(self.parse_unary()?))
            }
            Some('+') => {
                self.advance();
                self.parse_unary()?
            }
            _ => self.parse_power()?,
        };

        self.ascend();
        Ok(expr)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        let height = self.height;
        loop {
            self.skip_whitespace();
            let op = if self.remaining().starts_with("**") {
                break;
            } else if self.consume_exact("*") {
                BinaryOp::Mul
            } else if self.consume_exact("/") {
                BinaryOp::Div
            } else {
                break;
            };
            self.grow()?;
            let rhs = self.parse_unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        self.height = height;
        Ok(lhs)
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_term()?;
        let height = self.height;
        loop {
            self.skip_whitespace();
            let op = if self.consume_exact("+") {
                BinaryOp::Add
            } else if self.consume_exact("-") {
                BinaryOp::Sub
            } else {
                break;
            };
            self.grow()?;
            let rhs = self.parse_term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        self.height = height;
        Ok(lhs)
    }

    fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(ParseError {
                message: format!("unexpected input after expression: '{}'", self.remaining()),
                position: self.pos,
            });
        }
        Ok(expr)
    }
}

pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(input);
    parser.parse()
}
