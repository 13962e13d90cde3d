use cinder_core::{check_arity, resolve, CinderError, Env, Value};

use crate::register_fn;

fn string_arg<'a>(name: &str, value: &'a Value) -> Result<&'a str, CinderError> {
    value
        .as_str()
        .ok_or_else(|| CinderError::type_error(format!("string for {name}"), value.type_name()))
}

/// Parse a decimal literal; anything else, including `inf` and `nan` spellings, is rejected.
fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let numeric = !text.is_empty()
        && text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if numeric {
        text.parse().ok()
    } else {
        None
    }
}

pub fn register(env: &Env) {
    register_fn(env, "string-append", |args| {
        let mut out = String::new();
        for arg in args {
            out.push_str(string_arg("string-append", arg)?);
        }
        Ok(Value::string(&out))
    });

    register_fn(env, "string-length", |args| {
        check_arity!(args, "string-length", 1);
        let s = string_arg("string-length", &args[0])?;
        Ok(Value::Number(s.chars().count() as f64))
    });

    register_fn(env, "number->string", |args| {
        check_arity!(args, "number->string", 1);
        match &args[0] {
            v @ (Value::Number(_) | Value::Rational(_)) => Ok(Value::string(&v.to_string())),
            other => Err(CinderError::type_error("number", other.type_name())),
        }
    });

    // Returns #f when the text is not a number.
    register_fn(env, "string->number", |args| {
        check_arity!(args, "string->number", 1);
        let s = string_arg("string->number", &args[0])?;
        Ok(parse_number(s).map_or(Value::Bool(false), Value::Number))
    });

    register_fn(env, "symbol->string", |args| {
        check_arity!(args, "symbol->string", 1);
        match &args[0] {
            Value::Symbol(s) => Ok(Value::string(&resolve(*s))),
            other => Err(CinderError::type_error("symbol", other.type_name())),
        }
    });

    register_fn(env, "string->symbol", |args| {
        check_arity!(args, "string->symbol", 1);
        Ok(Value::symbol(string_arg("string->symbol", &args[0])?))
    });
}
