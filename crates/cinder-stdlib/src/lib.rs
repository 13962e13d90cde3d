mod arithmetic;
mod comparison;
mod io;
mod list;
mod matrix;
mod predicates;
mod rational;
mod string;

use cinder_core::{intern, CinderError, Env, NativeFn, Value};

/// Bind the whole builtin catalogue into `env`.
pub fn register_stdlib(env: &Env) {
    io::register(env);
    predicates::register(env);
    list::register(env);
    arithmetic::register(env);
    comparison::register(env);
    string::register(env);
    rational::register(env);
    matrix::register(env);
}

pub fn register_fn(
    env: &Env,
    name: &str,
    f: impl Fn(&[Value]) -> Result<Value, CinderError> + 'static,
) {
    env.define(intern(name), Value::builtin(NativeFn::new(name, f)));
}

/// Extract a double from a number or rational argument.
pub(crate) fn number_arg(value: &Value) -> Result<f64, CinderError> {
    value
        .as_number()
        .ok_or_else(|| CinderError::type_error("number", value.type_name()))
}

/// 2^63, the first double past `i64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Extract a whole number, for builtins that only make sense on integers.
/// Values outside the `i64` range are rejected rather than saturated.
pub(crate) fn integer_arg(name: &str, value: &Value) -> Result<i64, CinderError> {
    let n = number_arg(value)?;
    if n.fract() != 0.0 || !n.is_finite() {
        return Err(CinderError::type_error(
            format!("integer for {name}"),
            value.to_string(),
        ));
    }
    if !(-I64_LIMIT..I64_LIMIT).contains(&n) {
        return Err(CinderError::math(format!(
            "{name}: {value} is outside the 64-bit integer range"
        )));
    }
    Ok(n as i64)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Call a registered builtin by name against a fresh stdlib environment.
    pub fn call(name: &str, args: &[Value]) -> Result<Value, CinderError> {
        let env = Env::new();
        register_stdlib(&env);
        match env.get_str(name) {
            Some(Value::Builtin(f)) => f.call(args),
            other => panic!("{name} is not a builtin: {other:?}"),
        }
    }

    pub fn num(n: f64) -> Value {
        Value::Number(n)
    }

    pub fn list(items: &[f64]) -> Value {
        Value::list(items.iter().map(|n| Value::Number(*n)).collect())
    }
}
