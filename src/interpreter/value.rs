use super::{environment::Environment, error::RuntimeErrorKind};
use crate::parser::statement::FunctionDecl;
use compact_str::{CompactString, CompactStringExt};
use std::rc::Rc;

/// A function implemented by the host.
pub trait NativeFunction: std::fmt::Debug {
    fn get_name(&self) -> &'static str;
    fn arity(&self) -> usize;
    fn call(&self, arguments: &[LoxValue]) -> Result<LoxValue, RuntimeErrorKind>;
}

/// A user-defined function together with the scope it was declared in.
pub struct Function {
    declaration: Rc<FunctionDecl>,
    closure: Environment,
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Environment) -> Self {
        Self {
            declaration,
            closure,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.declaration.parameters.len()
    }

    pub fn declaration(&self) -> &FunctionDecl {
        &self.declaration
    }

    pub fn closure(&self) -> &Environment {
        &self.closure
    }
}

// The closure usually contains the function itself.
impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name())
            .field("arity", &self.arity())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum LoxValue {
    Number(f64),
    String(CompactString),
    Nil,
    Bool(bool),
    NativeFunction(Rc<dyn NativeFunction>),
    Function(Rc<Function>),
}

impl std::fmt::Display for LoxValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Nil => write!(f, "nil"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::NativeFunction(_) => write!(f, "<native fn>"),
            Self::Function(fun) => write!(f, "<fn {}>", fun.name()),
        }
    }
}

impl PartialEq for LoxValue {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl LoxValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            LoxValue::Number(_) => "number",
            LoxValue::String(_) => "string",
            LoxValue::Nil => "nil",
            LoxValue::Bool(_) => "boolean",
            LoxValue::NativeFunction(_) | LoxValue::Function(_) => "function",
        }
    }
}

// Unary operators
impl LoxValue {
    pub fn is_truthy(&self) -> bool {
        !matches!(self, LoxValue::Bool(false) | LoxValue::Nil)
    }

    pub fn logical_not(&self) -> LoxValue {
        LoxValue::Bool(!self.is_truthy())
    }

    pub fn numeric_negate(&self) -> Result<LoxValue, RuntimeErrorKind> {
        match self {
            LoxValue::Number(v) => Ok(LoxValue::Number(-v)),
            v => Err(RuntimeErrorKind::NonNumeric(v.clone())),
        }
    }
}

impl LoxValue {
    // Arithmetic + string concatenation
    pub fn add(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        match (self, other) {
            (LoxValue::Number(lhs), LoxValue::Number(rhs)) => Ok(LoxValue::Number(lhs + rhs)),
            (LoxValue::String(lhs), LoxValue::String(rhs)) => {
                Ok(LoxValue::String([lhs, rhs].concat_compact()))
            }
            (lhs, rhs) => Err(RuntimeErrorKind::NonAddable(lhs.clone(), rhs.clone())),
        }
    }

    pub fn subtract(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        self.numeric_binary(other, |lhs, rhs| LoxValue::Number(lhs - rhs))
    }

    pub fn multiply(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        self.numeric_binary(other, |lhs, rhs| LoxValue::Number(lhs * rhs))
    }

    /// Division by zero evaluates to `nil`.
    pub fn divide(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        self.numeric_binary(other, |lhs, rhs| {
            if rhs == 0.0 {
                LoxValue::Nil
            } else {
                LoxValue::Number(lhs / rhs)
            }
        })
    }

    // Comparison
    pub fn less_than(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        self.numeric_binary(other, |lhs, rhs| LoxValue::Bool(lhs < rhs))
    }

    pub fn less_than_or_equal(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        self.numeric_binary(other, |lhs, rhs| LoxValue::Bool(lhs <= rhs))
    }

    pub fn greater_than(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        self.numeric_binary(other, |lhs, rhs| LoxValue::Bool(lhs > rhs))
    }

    pub fn greater_than_or_equal(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        self.numeric_binary(other, |lhs, rhs| LoxValue::Bool(lhs >= rhs))
    }

    fn numeric_binary(
        &self,
        other: &LoxValue,
        operation: impl FnOnce(f64, f64) -> LoxValue,
    ) -> Result<LoxValue, RuntimeErrorKind> {
        match (self, other) {
            (LoxValue::Number(lhs), LoxValue::Number(rhs)) => Ok(operation(*lhs, *rhs)),
            (lhs, rhs) => Err(RuntimeErrorKind::NonNumerics(lhs.clone(), rhs.clone())),
        }
    }

    // Equality
    pub fn is_equal(&self, other: &LoxValue) -> bool {
        match (self, other) {
            (LoxValue::Number(lhs), LoxValue::Number(rhs)) => lhs == rhs,
            (LoxValue::String(lhs), LoxValue::String(rhs)) => lhs == rhs,
            (LoxValue::Nil, LoxValue::Nil) => true,
            (LoxValue::Bool(lhs), LoxValue::Bool(rhs)) => lhs == rhs,
            (LoxValue::Function(lhs), LoxValue::Function(rhs)) => Rc::ptr_eq(lhs, rhs),
            (LoxValue::NativeFunction(lhs), LoxValue::NativeFunction(rhs)) => {
                std::ptr::addr_eq(Rc::as_ptr(lhs), Rc::as_ptr(rhs))
            }
            _ => false,
        }
    }
}
