use cinder_core::{check_arity, Env, Value};

use crate::register_fn;

fn register_predicate(env: &Env, name: &'static str, pred: fn(&Value) -> bool) {
    register_fn(env, name, move |args| {
        check_arity!(args, name, 1);
        Ok(Value::Bool(pred(&args[0])))
    });
}

pub fn register(env: &Env) {
    register_predicate(env, "atom?", |v| {
        matches!(
            v,
            Value::Bool(_)
                | Value::Number(_)
                | Value::Rational(_)
                | Value::String(_)
                | Value::Nil
                | Value::Symbol(_)
        )
    });
    register_predicate(env, "boolean?", |v| matches!(v, Value::Bool(_)));
    register_predicate(env, "integer?", |v| match v {
        Value::Number(n) => n.is_finite() && n.fract() == 0.0,
        Value::Rational(r) => r.is_integer(),
        _ => false,
    });
    register_predicate(env, "list?", Value::is_proper_list);
    register_predicate(env, "number?", |v| {
        matches!(v, Value::Number(_) | Value::Rational(_))
    });
    register_predicate(env, "null?", Value::is_nil);
    register_predicate(env, "pair?", |v| matches!(v, Value::Pair(_)));
    register_predicate(env, "procedure?", Value::is_procedure);
    register_predicate(env, "string?", |v| matches!(v, Value::String(_)));
    register_predicate(env, "symbol?", |v| matches!(v, Value::Symbol(_)));
    register_predicate(env, "rational?", |v| matches!(v, Value::Rational(_)));
    register_predicate(env, "matrix?", |v| matches!(v, Value::Matrix(_)));
}
