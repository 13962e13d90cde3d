use cinder_core::{check_arity, CinderError, Env, Value};

use crate::{number_arg, register_fn};

/// Chain a numeric comparison over adjacent pairs of arguments.
fn compare_chain(name: &'static str, env: &Env, cmp: fn(f64, f64) -> bool) {
    register_fn(env, name, move |args| {
        check_arity!(args, name, 2..);
        let nums = args.iter().map(number_arg).collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Bool(nums.windows(2).all(|w| cmp(w[0], w[1]))))
    });
}

/// `=` between two rationals compares exactly; anything else by double value.
fn num_eq(a: &Value, b: &Value) -> Result<bool, CinderError> {
    match (a, b) {
        (Value::Rational(x), Value::Rational(y)) => Ok(x == y),
        _ => Ok(number_arg(a)? == number_arg(b)?),
    }
}

fn integer_value(value: &Value) -> Result<Option<i64>, CinderError> {
    match value {
        Value::Rational(r) if r.is_integer() => Ok(Some(r.numerator())),
        Value::Rational(_) => Ok(None),
        other => {
            let n = number_arg(other)?;
            Ok((n.is_finite() && n.fract() == 0.0).then_some(n as i64))
        }
    }
}

pub fn register(env: &Env) {
    register_fn(env, "=", |args| {
        check_arity!(args, "=", 2..);
        for w in args.windows(2) {
            if !num_eq(&w[0], &w[1])? {
                return Ok(Value::Bool(false));
            }
        }
        Ok(Value::Bool(true))
    });
    compare_chain("<", env, |a, b| a < b);
    compare_chain(">", env, |a, b| a > b);
    compare_chain("<=", env, |a, b| a <= b);
    compare_chain(">=", env, |a, b| a >= b);

    register_fn(env, "even?", |args| {
        check_arity!(args, "even?", 1);
        Ok(Value::Bool(integer_value(&args[0])?.is_some_and(|n| n % 2 == 0)))
    });

    register_fn(env, "odd?", |args| {
        check_arity!(args, "odd?", 1);
        Ok(Value::Bool(integer_value(&args[0])?.is_some_and(|n| n % 2 != 0)))
    });

    register_fn(env, "zero?", |args| {
        check_arity!(args, "zero?", 1);
        Ok(Value::Bool(match &args[0] {
            Value::Rational(r) => r.is_zero(),
            other => number_arg(other)? == 0.0,
        }))
    });

    register_fn(env, "eq?", |args| {
        check_arity!(args, "eq?", 2);
        Ok(Value::Bool(args[0].ptr_eq(&args[1])))
    });

    register_fn(env, "equal?", |args| {
        check_arity!(args, "equal?", 2);
        Ok(Value::Bool(args[0] == args[1]))
    });

    register_fn(env, "not", |args| {
        check_arity!(args, "not", 1);
        Ok(Value::Bool(!args[0].is_truthy()))
    });
}
