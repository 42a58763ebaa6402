use super::{
    error::RuntimeErrorKind,
    value::{LoxValue, NativeFunction},
};
use std::time::{SystemTime, UNIX_EPOCH};

/// `clock()`: seconds since the Unix epoch.
#[derive(Debug)]
pub struct NativeClock;

impl NativeFunction for NativeClock {
    fn get_name(&self) -> &'static str {
        "clock"
    }

    fn arity(&self) -> usize {
        0
    }

    fn call(&self, _arguments: &[LoxValue]) -> Result<LoxValue, RuntimeErrorKind> {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs_f64())
            .unwrap_or_default();
        Ok(LoxValue::Number(seconds))
    }
}
