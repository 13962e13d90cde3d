use cinder_core::{check_arity, CinderError, Env, Rational, Value};

use crate::{integer_arg, register_fn};

fn rational_arg(name: &str, value: &Value) -> Result<Rational, CinderError> {
    match value {
        Value::Rational(r) => Ok(*r),
        Value::Number(_) => Ok(Rational::from_integer(integer_arg(name, value)?)),
        other => Err(CinderError::type_error("rational", other.type_name())),
    }
}

pub fn register(env: &Env) {
    register_fn(env, "rational", |args| {
        check_arity!(args, "rational", 1..=2);
        let num = integer_arg("rational", &args[0])?;
        let den = match args.get(1) {
            Some(d) => integer_arg("rational", d)?,
            None => 1,
        };
        Ok(Value::Rational(Rational::new(num, den)?))
    });

    register_fn(env, "numerator", |args| {
        check_arity!(args, "numerator", 1);
        Ok(Value::Number(
            rational_arg("numerator", &args[0])?.numerator() as f64,
        ))
    });

    register_fn(env, "denominator", |args| {
        check_arity!(args, "denominator", 1);
        Ok(Value::Number(
            rational_arg("denominator", &args[0])?.denominator() as f64,
        ))
    });

    register_fn(env, "exact->inexact", |args| {
        check_arity!(args, "exact->inexact", 1);
        match &args[0] {
            Value::Rational(r) => Ok(Value::Number(r.to_f64())),
            v @ Value::Number(_) => Ok(v.clone()),
            other => Err(CinderError::type_error("number", other.type_name())),
        }
    });

    register_fn(env, "inexact->exact", |args| {
        check_arity!(args, "inexact->exact", 1);
        match &args[0] {
            v @ Value::Rational(_) => Ok(v.clone()),
            Value::Number(n) => Ok(Value::Rational(Rational::from_f64(*n)?)),
            other => Err(CinderError::type_error("number", other.type_name())),
        }
    });
}
