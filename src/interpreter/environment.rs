use super::{
    error::{RuntimeError, RuntimeErrorKind},
    native::NativeClock,
    value::{LoxValue, NativeFunction},
};
use crate::token::Token;
use compact_str::{CompactString, ToCompactString};
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// A scope of variable bindings. Clones share the same scope.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Rc<RefCell<EnvironmentImpl>>,
}

#[derive(Debug)]
struct EnvironmentImpl {
    values: HashMap<CompactString, LoxValue>,
    parent: Option<Environment>,
}

impl Environment {
    /// Creates a global scope seeded with the native functions.
    pub fn new() -> Self {
        let mut globals = HashMap::new();

        // Inject native functions here
        {
            let clock = NativeClock;

            globals.insert(
                clock.get_name().to_compact_string(),
                LoxValue::NativeFunction(Rc::new(clock)),
            );
        }

        Self {
            inner: Rc::new(RefCell::new(EnvironmentImpl {
                values: globals,
                parent: None,
            })),
        }
    }

    pub fn new_scope(&self) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EnvironmentImpl {
                values: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Binds `name` in this scope, replacing any earlier binding in the same scope.
    pub fn define(&self, name: &str, value: LoxValue) {
        self.inner
            .borrow_mut()
            .values
            .insert(name.to_compact_string(), value);
    }

    pub fn get(&self, name: &Token) -> Result<LoxValue, RuntimeError> {
        self.access(&name.lexeme).ok_or_else(|| undefined(name))
    }

    /// Rebinds an existing variable in the nearest scope that has one.
    pub fn assign(&self, name: &Token, value: LoxValue) -> Result<(), RuntimeError> {
        match self.inner.borrow_mut().assign(&name.lexeme, value) {
            Ok(()) => Ok(()),
            Err(()) => Err(undefined(name)),
        }
    }

    fn access(&self, name: &str) -> Option<LoxValue> {
        self.inner.borrow().access(name)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentImpl {
    fn access(&self, name: &str) -> Option<LoxValue> {
        if let Some(value) = self.values.get(name) {
            Some(value.clone())
        } else if let Some(ref parent) = self.parent {
            parent.access(name)
        } else {
            None
        }
    }

    fn assign(&mut self, name: &str, value: LoxValue) -> Result<(), ()> {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            Ok(())
        } else if let Some(ref parent) = self.parent {
            parent.inner.borrow_mut().assign(name, value)
        } else {
            Err(())
        }
    }
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError {
        kind: RuntimeErrorKind::UndefinedVariable(name.lexeme.clone()),
        token: name.clone(),
    }
}
