//! Per-call identifier bindings.
//!
//! A `Namespace` is built fresh for every evaluation from a `SeriesFrame`.
//! It exposes the function registry, the constants, one binding per frame
//! column, and the time index `t`. Nothing else is reachable.

use crate::domain::error::FormulaError;
use crate::domain::function::{self, Constant, Function};
use crate::domain::series::SeriesFrame;
use std::borrow::Cow;
use std::collections::HashMap;

/// Name of the synthetic time-index variable.
pub const TIME_VARIABLE: &str = "t";

/// An intermediate evaluation value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Scalar(f64),
    Series(Cow<'a, [f64]>),
}

impl Value<'_> {
    pub fn series(values: Vec<f64>) -> Self {
        Value::Series(Cow::Owned(values))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "number",
            Value::Series(_) => "series",
        }
    }
}

/// What an identifier resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding<'a> {
    Value(Value<'a>),
    Function(Function),
    Constant(Constant),
}

#[derive(Debug)]
pub struct Namespace<'a> {
    series: HashMap<&'a str, &'a [f64]>,
    time: Value<'static>,
    len: usize,
}

impl<'a> Namespace<'a> {
    /// Bind every column of `frame` plus `t`.
    ///
    /// With no columns there is no timeline, and `t` is the scalar `0`.
    pub fn build(frame: &'a SeriesFrame) -> Result<Self, FormulaError> {
        let len = frame.len();
        let mut series = HashMap::with_capacity(frame.columns.len());

        for column in &frame.columns {
            let name = column.name.as_str();
            if name == TIME_VARIABLE || function::is_reserved(name) {
                return Err(FormulaError::evaluation(format!(
                    "series name '{}' collides with a reserved identifier",
                    name
                )));
            }
            if column.values.len() != len {
                return Err(FormulaError::evaluation(format!(
                    "series '{}' has {} values but the index has {}",
                    name,
                    column.values.len(),
                    len
                )));
            }
            if series.insert(name, column.values.as_slice()).is_some() {
                return Err(FormulaError::evaluation(format!(
                    "series '{}' supplied more than once",
                    name
                )));
            }
        }

        let time = if series.is_empty() {
            Value::Scalar(0.0)
        } else {
            Value::series((0..len).map(|i| i as f64).collect())
        };

        Ok(Self { series, time, len })
    }

    /// Whether any data series is bound, i.e. whether a timeline exists.
    pub fn has_series(&self) -> bool {
        !self.series.is_empty()
    }

    /// Length of the shared index.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn resolve(&self, name: &str) -> Option<Binding<'_>> {
        if let Some(function) = Function::from_name(name) {
            return Some(Binding::Function(function));
        }
        if let Some(constant) = Constant::from_name(name) {
            return Some(Binding::Constant(constant));
        }
        if name == TIME_VARIABLE {
            let value = match &self.time {
                Value::Scalar(v) => Value::Scalar(*v),
                Value::Series(values) => Value::Series(Cow::Borrowed(values.as_ref())),
            };
            return Some(Binding::Value(value));
        }
        self.series
            .get(name)
            .map(|values| Binding::Value(Value::Series(Cow::Borrowed(*values))))
    }
}
