use std::rc::Rc;

use hashbrown::HashMap;

use cinder_core::{intern, resolve, CinderError, Closure, Env, Spur, Value};

use crate::eval::{self, EvalResult};

/// A special form handler receives its operands unevaluated.
pub type SpecialFormFn = fn(&[Value], &Env) -> EvalResult;

/// Every reserved name the evaluator dispatches on, with its handler.
pub const SPECIAL_FORMS: &[(&str, SpecialFormFn)] = &[
    ("quote", eval_quote),
    ("if", eval_if),
    ("and", eval_and),
    ("or", eval_or),
    ("cond", eval_cond),
    ("lambda", eval_lambda),
    ("define", eval_define),
    ("let", eval_let),
    ("begin", eval_begin),
    ("quasiquote", eval_quasiquote),
];

thread_local! {
    static REGISTRY: HashMap<Spur, (&'static str, SpecialFormFn)> = SPECIAL_FORMS
        .iter()
        .map(|&(name, handler)| (intern(name), (name, handler)))
        .collect();
}

/// Look up the handler for a symbol, if it names a special form.
pub fn lookup(name: Spur) -> Option<(&'static str, SpecialFormFn)> {
    REGISTRY.with(|r| r.get(&name).copied())
}

/// Evaluate forms in order, returning the last value (`()` when there are none).
pub fn eval_sequence(body: &[Value], env: &Env) -> EvalResult {
    let mut result = Value::Nil;
    for expr in body {
        result = eval::eval(expr, env)?;
    }
    Ok(result)
}

fn is_symbol(value: &Value, name: &str) -> bool {
    value.as_symbol_spur().is_some_and(|s| s == intern(name))
}

fn eval_quote(args: &[Value], _env: &Env) -> EvalResult {
    if args.len() != 1 {
        return Err(CinderError::arity("quote", "1", args.len()));
    }
    Ok(args[0].clone())
}

fn eval_if(args: &[Value], env: &Env) -> EvalResult {
    if args.len() < 2 || args.len() > 3 {
        return Err(CinderError::arity("if", "2 or 3", args.len()));
    }
    if eval::eval(&args[0], env)?.is_truthy() {
        eval::eval(&args[1], env)
    } else if args.len() == 3 {
        eval::eval(&args[2], env)
    } else {
        Ok(Value::Nil)
    }
}

fn eval_and(args: &[Value], env: &Env) -> EvalResult {
    let mut result = Value::Bool(true);
    for expr in args {
        result = eval::eval(expr, env)?;
        if !result.is_truthy() {
            return Ok(result);
        }
    }
    Ok(result)
}

fn eval_or(args: &[Value], env: &Env) -> EvalResult {
    let mut result = Value::Bool(false);
    for expr in args {
        result = eval::eval(expr, env)?;
        if result.is_truthy() {
            return Ok(result);
        }
    }
    Ok(result)
}

fn eval_cond(args: &[Value], env: &Env) -> EvalResult {
    if args.is_empty() {
        return Err(CinderError::arity("cond", "1+", 0));
    }
    for (i, clause) in args.iter().enumerate() {
        let items = clause
            .to_vec()
            .filter(|items| !items.is_empty())
            .ok_or_else(|| CinderError::eval(format!("cond clause must be a non-empty list: {clause}")))?;
        if is_symbol(&items[0], "else") {
            if i != args.len() - 1 {
                return Err(CinderError::eval("cond: else clause must be last"));
            }
            if items.len() == 1 {
                return Err(CinderError::eval("cond: else clause needs a body"));
            }
            return eval_sequence(&items[1..], env);
        }
        let test = eval::eval(&items[0], env)?;
        if test.is_truthy() {
            if items.len() == 1 {
                return Ok(test);
            }
            return eval_sequence(&items[1..], env);
        }
    }
    Err(CinderError::eval("cond: no clause matched"))
}

/// Parse a parameter list: `()` or a proper list of symbols.
fn parse_params(form: &str, params: &Value) -> Result<Vec<Spur>, CinderError> {
    let items = params.to_vec().ok_or_else(|| {
        CinderError::eval(format!("{form}: parameters must be a proper list, got {params}"))
    })?;
    items
        .iter()
        .map(|p| {
            p.as_symbol_spur().ok_or_else(|| {
                CinderError::eval(format!("{form}: parameter must be a symbol, got {p}"))
            })
        })
        .collect()
}

fn make_closure(params: Vec<Spur>, body: &[Value], env: &Env, name: Option<Spur>) -> Value {
    Value::Closure(Rc::new(Closure {
        params,
        body: body.to_vec(),
        env: env.clone(),
        name,
    }))
}

fn eval_lambda(args: &[Value], env: &Env) -> EvalResult {
    if args.len() < 2 {
        return Err(CinderError::arity("lambda", "2+", args.len()));
    }
    let params = parse_params("lambda", &args[0])?;
    Ok(make_closure(params, &args[1..], env, None))
}

fn eval_define(args: &[Value], env: &Env) -> EvalResult {
    if args.len() < 2 {
        return Err(CinderError::arity("define", "2+", args.len()));
    }
    match &args[0] {
        Value::Symbol(name) => {
            if args.len() != 2 {
                return Err(CinderError::arity("define", "2", args.len()));
            }
            let val = eval::eval(&args[1], env)?;
            env.define(*name, val);
            Ok(Value::Nil)
        }
        // (define (name params...) body...)
        Value::Pair(sig) => {
            let name = sig.car.as_symbol_spur().ok_or_else(|| {
                CinderError::eval(format!("define: procedure name must be a symbol, got {}", sig.car))
            })?;
            let params = parse_params(&resolve(name), &sig.cdr)?;
            env.define(name, make_closure(params, &args[1..], env, Some(name)));
            Ok(Value::Nil)
        }
        other => Err(CinderError::eval(format!(
            "define: expected a symbol or (name params...), got {other}"
        ))),
    }
}

fn eval_let(args: &[Value], env: &Env) -> EvalResult {
    if args.len() < 2 {
        return Err(CinderError::arity("let", "2+", args.len()));
    }
    let bindings = args[0]
        .to_vec()
        .ok_or_else(|| CinderError::eval("let: bindings must be a list"))?;
    let mut names = Vec::with_capacity(bindings.len());
    let mut values = Vec::with_capacity(bindings.len());
    for binding in &bindings {
        let pair = binding.to_vec().filter(|b| b.len() == 2);
        let (name, init) = match pair.as_deref() {
            Some([Value::Symbol(name), init]) => (*name, init),
            _ => {
                return Err(CinderError::eval(format!(
                    "let: malformed binding {binding}, expected (name expr)"
                )))
            }
        };
        names.push(name);
        values.push(eval::eval(init, env)?);
    }
    let frame = env.create_child(&names, &values)?;
    eval_sequence(&args[1..], &frame)
}

fn eval_begin(args: &[Value], env: &Env) -> EvalResult {
    if args.is_empty() {
        return Err(CinderError::arity("begin", "1+", 0));
    }
    eval_sequence(args, env)
}

/// Single-level substitution: immediate `(unquote x)` elements are replaced by the value of `x`.
fn eval_quasiquote(args: &[Value], env: &Env) -> EvalResult {
    if args.len() != 1 {
        return Err(CinderError::arity("quasiquote", "1", args.len()));
    }
    let template = &args[0];
    if !matches!(template, Value::Pair(_)) {
        return Ok(template.clone());
    }
    let (items, tail) = template.split_list();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item.as_pair() {
            Some(p) if is_symbol(&p.car, "unquote") => {
                let operands = item.to_vec().unwrap_or_default();
                if operands.len() != 2 {
                    return Err(CinderError::arity(
                        "unquote",
                        "1",
                        operands.len().saturating_sub(1),
                    ));
                }
                out.push(eval::eval(&operands[1], env)?);
            }
            _ => out.push(item),
        }
    }
    Ok(Value::list_with_tail(out, tail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_resolves_every_form() {
        for &(name, _) in SPECIAL_FORMS {
            let (found, _) = lookup(intern(name)).unwrap();
            assert_eq!(found, name);
        }
        assert!(lookup(intern("car")).is_none());
        assert!(lookup(intern("set!")).is_none());
    }

    #[test]
    fn test_eval_sequence_empty_is_nil() {
        assert_eq!(eval_sequence(&[], &Env::new()).unwrap(), Value::Nil);
    }
}
