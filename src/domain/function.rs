//! Function whitelist registry.
//!
//! The set of callables and constants an expression can reach is a closed
//! enumeration. Lookup is by name only; there is no way to add, remove, or
//! replace an entry at runtime.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Log,
    Log10,
    Exp,
    Sqrt,
    Abs,
    Max,
    Min,
    Sma,
    Ema,
    Std,
}

/// How a function consumes its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// `f(x)`, position-wise.
    Unary,
    /// `f(a, b)`, position-wise with broadcasting.
    Binary,
    /// `f(series, window)`, trailing window.
    Windowed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constant {
    Pi,
    E,
}

impl Function {
    pub const ALL: [Function; 13] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Log,
        Function::Log10,
        Function::Exp,
        Function::Sqrt,
        Function::Abs,
        Function::Max,
        Function::Min,
        Function::Sma,
        Function::Ema,
        Function::Std,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let function = match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "log" => Function::Log,
            "log10" => Function::Log10,
            "exp" => Function::Exp,
            "sqrt" => Function::Sqrt,
            "abs" => Function::Abs,
            "max" => Function::Max,
            "min" => Function::Min,
            "sma" => Function::Sma,
            "ema" => Function::Ema,
            "std" => Function::Std,
            _ => return None,
        };
        Some(function)
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Log => "log",
            Function::Log10 => "log10",
            Function::Exp => "exp",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
            Function::Max => "max",
            Function::Min => "min",
            Function::Sma => "sma",
            Function::Ema => "ema",
            Function::Std => "std",
        }
    }

    pub fn kind(self) -> FunctionKind {
        match self {
            Function::Sin
            | Function::Cos
            | Function::Tan
            | Function::Log
            | Function::Log10
            | Function::Exp
            | Function::Sqrt
            | Function::Abs => FunctionKind::Unary,
            Function::Max | Function::Min => FunctionKind::Binary,
            Function::Sma | Function::Ema | Function::Std => FunctionKind::Windowed,
        }
    }

    pub fn arity(self) -> usize {
        match self.kind() {
            FunctionKind::Unary => 1,
            FunctionKind::Binary | FunctionKind::Windowed => 2,
        }
    }

    pub fn signature(self) -> &'static str {
        match self.kind() {
            FunctionKind::Unary => "(x)",
            FunctionKind::Binary => "(a, b)",
            FunctionKind::Windowed => "(series, window)",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Function::Sin => "sine",
            Function::Cos => "cosine",
            Function::Tan => "tangent",
            Function::Log => "natural logarithm",
            Function::Log10 => "base-10 logarithm",
            Function::Exp => "e raised to x",
            Function::Sqrt => "square root",
            Function::Abs => "absolute value",
            Function::Max => "position-wise maximum",
            Function::Min => "position-wise minimum",
            Function::Sma => "simple moving average",
            Function::Ema => "exponential moving average, alpha = 2/(window+1)",
            Function::Std => "rolling sample standard deviation",
        }
    }

    /// Elementwise kernel for unary functions. Returns `None` for other kinds.
    pub fn apply_unary(self, x: f64) -> Option<f64> {
        let y = match self {
            Function::Sin => x.sin(),
            Function::Cos => x.cos(),
            Function::Tan => x.tan(),
            Function::Log => x.ln(),
            Function::Log10 => x.log10(),
            Function::Exp => x.exp(),
            Function::Sqrt => x.sqrt(),
            Function::Abs => x.abs(),
            _ => return None,
        };
        Some(y)
    }

    /// Elementwise kernel for binary functions. NaN in either operand wins,
    /// unlike `f64::max`/`f64::min`.
    pub fn apply_binary(self, a: f64, b: f64) -> Option<f64> {
        if !matches!(self, Function::Max | Function::Min) {
            return None;
        }
        if a.is_nan() || b.is_nan() {
            return Some(f64::NAN);
        }
        Some(match self {
            Function::Max => a.max(b),
            _ => a.min(b),
        })
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Constant {
    pub const ALL: [Constant; 2] = [Constant::Pi, Constant::E];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Constant::Pi),
            "e" => Some(Constant::E),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

/// True for any name owned by the registry (functions and constants).
pub fn is_reserved(name: &str) -> bool {
    Function::from_name(name).is_some() || Constant::from_name(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for function in Function::ALL {
            assert_eq!(Function::from_name(function.name()), Some(function));
        }
        for constant in Constant::ALL {
            assert_eq!(Constant::from_name(constant.name()), Some(constant));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(Function::from_name("SMA"), None);
        assert_eq!(Constant::from_name("PI"), None);
    }

    #[test]
    fn unregistered_names() {
        for name in ["eval", "exec", "open", "pow", "__import__", "round", ""] {
            assert!(Function::from_name(name).is_none(), "{name} should not resolve");
            assert!(!is_reserved(name));
        }
    }

    #[test]
    fn arities() {
        assert_eq!(Function::Sqrt.arity(), 1);
        assert_eq!(Function::Max.arity(), 2);
        assert_eq!(Function::Ema.arity(), 2);
    }

    #[test]
    fn constants_are_double_precision() {
        assert_eq!(Constant::Pi.value(), std::f64::consts::PI);
        assert_eq!(Constant::E.value(), std::f64::consts::E);
    }

    #[test]
    fn unary_kernels() {
        assert_eq!(Function::Abs.apply_unary(-3.0), Some(3.0));
        assert_eq!(Function::Log.apply_unary(1.0), Some(0.0));
        assert_eq!(Function::Log10.apply_unary(1000.0), Some(3.0));
        assert!(Function::Sqrt.apply_unary(f64::NAN).unwrap().is_nan());
        assert!(Function::Sqrt.apply_unary(-1.0).unwrap().is_nan());
        assert_eq!(Function::Log.apply_unary(0.0), Some(f64::NEG_INFINITY));
        assert_eq!(Function::Max.apply_unary(1.0), None);
    }

    #[test]
    fn binary_kernels_propagate_nan() {
        assert_eq!(Function::Max.apply_binary(1.0, 2.0), Some(2.0));
        assert_eq!(Function::Min.apply_binary(1.0, 2.0), Some(1.0));
        assert!(Function::Max.apply_binary(f64::NAN, 2.0).unwrap().is_nan());
        assert!(Function::Min.apply_binary(1.0, f64::NAN).unwrap().is_nan());
        assert_eq!(Function::Sma.apply_binary(1.0, 2.0), None);
    }

    #[test]
    fn reserved_names() {
        assert!(is_reserved("sin"));
        assert!(is_reserved("pi"));
        assert!(is_reserved("e"));
        assert!(!is_reserved("t"));
        assert!(!is_reserved("AAPL"));
    }
}
