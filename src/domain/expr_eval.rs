//! Expression evaluation engine.
//!
//! Evaluates an `Expr` against a `Namespace` in a single pass.
//!
//! # Evaluation Semantics
//!
//! - Series with series: elementwise by index position
//! - Series with number, number with series: the number is broadcast
//! - Number with number: plain arithmetic
//! - A zero divisor, zero to a negative power, or an infinite result from
//!   finite operands fails the whole evaluation; NaN operands propagate
//! - Calls resolve only to registry functions, checked for arity first;
//!   arguments are evaluated left to right before any window check

use crate::domain::error::FormulaError;
use crate::domain::expr::{BinaryOp, Expr};
use crate::domain::function::{Function, FunctionKind};
use crate::domain::indicator;
use crate::domain::namespace::{Binding, Namespace, Value};

pub fn evaluate<'n>(expr: &Expr, namespace: &'n Namespace<'_>) -> Result<Value<'n>, FormulaError> {
    match expr {
        Expr::Number(v) => Ok(Value::Scalar(*v)),
        Expr::Ident(name) => resolve_value(name, namespace),
        Expr::Neg(inner) => {
            let value = evaluate(inner, namespace)?;
            Ok(map_value(&value, |x| -x))
        }
        Expr::Binary { op, lhs, rhs } => {
            let left = evaluate(lhs, namespace)?;
            let right = evaluate(rhs, namespace)?;
            combine(&left, &right, |a, b| apply_operator(*op, a, b))
        }
        Expr::Call { name, args } => match namespace.resolve(name) {
            Some(Binding::Function(function)) => call(function, args, namespace),
            Some(_) => Err(FormulaError::evaluation(format!(
                "'{}' is not a function",
                name
            ))),
            None => Err(FormulaError::unknown(name.as_str())),
        },
    }
}

fn resolve_value<'n>(name: &str, namespace: &'n Namespace<'_>) -> Result<Value<'n>, FormulaError> {
    match namespace.resolve(name) {
        Some(Binding::Value(value)) => Ok(value),
        Some(Binding::Constant(constant)) => Ok(Value::Scalar(constant.value())),
        Some(Binding::Function(function)) => Err(FormulaError::evaluation(format!(
            "function '{}' must be called, e.g. {}{}",
            function,
            function,
            function.signature()
        ))),
        None => Err(FormulaError::unknown(name)),
    }
}

fn call<'n>(
    function: Function,
    args: &[Expr],
    namespace: &'n Namespace<'_>,
) -> Result<Value<'n>, FormulaError> {
    if args.len() != function.arity() {
        return Err(FormulaError::evaluation(format!(
            "{}{} takes {} argument{}, got {}",
            function,
            function.signature(),
            function.arity(),
            if function.arity() == 1 { "" } else { "s" },
            args.len()
        )));
    }

    match function.kind() {
        FunctionKind::Unary => {
            let value = evaluate(&args[0], namespace)?;
            Ok(map_value(&value, |x| {
                function.apply_unary(x).unwrap_or(f64::NAN)
            }))
        }
        FunctionKind::Binary => {
            let a = evaluate(&args[0], namespace)?;
            let b = evaluate(&args[1], namespace)?;
            combine(&a, &b, |x, y| {
                Ok(function.apply_binary(x, y).unwrap_or(f64::NAN))
            })
        }
        FunctionKind::Windowed => {
            let input = evaluate(&args[0], namespace)?;
            let window = window_argument(function, evaluate(&args[1], namespace)?)?;
            match input {
                // Constant input has nothing to smooth; hand it back as-is.
                Value::Scalar(v) => Ok(Value::Scalar(v)),
                Value::Series(values) => {
                    let out = match function {
                        Function::Sma => indicator::sma(&values, window),
                        Function::Ema => indicator::ema(&values, window),
                        _ => indicator::stddev(&values, window),
                    };
                    Ok(Value::series(out))
                }
            }
        }
    }
}

fn window_argument(function: Function, value: Value<'_>) -> Result<usize, FormulaError> {
    match value {
        Value::Scalar(raw) => indicator::window_length(raw).ok_or_else(|| {
            FormulaError::evaluation(format!(
                "window for {}() must be a positive integer, got {}",
                function, raw
            ))
        }),
        other => Err(FormulaError::evaluation(format!(
            "window for {}() must be a number, got a {}",
            function,
            other.type_name()
        ))),
    }
}

fn apply_operator(op: BinaryOp, a: f64, b: f64) -> Result<f64, FormulaError> {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(FormulaError::evaluation("division by zero"));
            }
            a / b
        }
        BinaryOp::Pow => {
            if a == 0.0 && b < 0.0 {
                return Err(FormulaError::evaluation("zero raised to a negative power"));
            }
            a.powf(b)
        }
    };

    if result.is_infinite() && a.is_finite() && b.is_finite() {
        return Err(FormulaError::evaluation(format!(
            "numeric overflow in {} {} {}",
            a, op, b
        )));
    }
    Ok(result)
}

fn map_value(value: &Value<'_>, f: impl Fn(f64) -> f64) -> Value<'static> {
    match value {
        Value::Scalar(x) => Value::Scalar(f(*x)),
        Value::Series(values) => Value::series(values.iter().map(|&x| f(x)).collect()),
    }
}

fn combine(
    left: &Value<'_>,
    right: &Value<'_>,
    f: impl Fn(f64, f64) -> Result<f64, FormulaError>,
) -> Result<Value<'static>, FormulaError> {
    match (left, right) {
        (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(f(*a, *b)?)),
        (Value::Series(a), Value::Scalar(b)) => {
            let out = a.iter().map(|&x| f(x, *b)).collect::<Result<Vec<_>, _>>()?;
            Ok(Value::series(out))
        }
        (Value::Scalar(a), Value::Series(b)) => {
            let out = b.iter().map(|&y| f(*a, y)).collect::<Result<Vec<_>, _>>()?;
            Ok(Value::series(out))
        }
        (Value::Series(a), Value::Series(b)) => {
            if a.len() != b.len() {
                return Err(FormulaError::evaluation(format!(
                    "series length mismatch ({} vs {})",
                    a.len(),
                    b.len()
                )));
            }
            let out = a
                .iter()
                .zip(b.iter())
                .map(|(&x, &y)| f(x, y))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::series(out))
        }
    }
}
