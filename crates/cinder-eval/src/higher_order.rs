use cinder_core::{check_arity, CinderError, Env, Value, WeakEnv};
use cinder_stdlib::register_fn;

use crate::eval::{apply, eval};

fn list_arg(value: &Value, name: &str) -> Result<Vec<Value>, CinderError> {
    value.to_vec().ok_or_else(|| {
        CinderError::type_error(format!("proper list for {name}"), value.type_name())
    })
}

fn procedure_arg<'a>(value: &'a Value, name: &str) -> Result<&'a Value, CinderError> {
    if value.is_procedure() {
        Ok(value)
    } else {
        Err(CinderError::type_error(
            format!("procedure for {name}"),
            value.type_name(),
        ))
    }
}

/// Bind the builtins that call back into the evaluator.
pub fn register(env: &Env) {
    let root: WeakEnv = env.downgrade();
    register_fn(env, "eval", move |args| {
        check_arity!(args, "eval", 1);
        let env = root
            .upgrade()
            .ok_or_else(|| CinderError::bug("eval: root environment dropped"))?;
        eval(&args[0], &env)
    });

    register_fn(env, "apply", |args| {
        check_arity!(args, "apply", 2);
        let proc = procedure_arg(&args[0], "apply")?;
        apply(proc, &list_arg(&args[1], "apply")?)
    });

    register_fn(env, "map", |args| {
        check_arity!(args, "map", 2);
        let proc = procedure_arg(&args[0], "map")?;
        let mapped = list_arg(&args[1], "map")?
            .iter()
            .map(|item| apply(proc, std::slice::from_ref(item)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::list(mapped))
    });

    register_fn(env, "filter", |args| {
        check_arity!(args, "filter", 2);
        let pred = procedure_arg(&args[0], "filter")?;
        let mut kept = Vec::new();
        for item in list_arg(&args[1], "filter")? {
            if apply(pred, std::slice::from_ref(&item))?.is_truthy() {
                kept.push(item);
            }
        }
        Ok(Value::list(kept))
    });

    // Right fold: (reduce f '(a b c)) is (f a (f b c)).
    register_fn(env, "reduce", |args| {
        check_arity!(args, "reduce", 2);
        let proc = procedure_arg(&args[0], "reduce")?;
        let mut items = list_arg(&args[1], "reduce")?;
        let mut acc = items
            .pop()
            .ok_or_else(|| CinderError::eval("reduce: empty list"))?;
        for item in items.into_iter().rev() {
            acc = apply(proc, &[item, acc])?;
        }
        Ok(acc)
    });
}
