use std::rc::Rc;

use cinder_core::{resolve, CinderError, Closure, Env, Pair, Value};
use cinder_reader::{read_many, tokenize, Parser};

use crate::{higher_order, special_forms};

pub type EvalResult = Result<Value, CinderError>;

/// The interpreter holds the root environment.
pub struct Interpreter {
    pub global_env: Rc<Env>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_stdlib(true)
    }

    /// Build a root frame, optionally without the builtin catalogue.
    /// The higher-order utilities (`eval`, `apply`, `map`, ...) are always bound.
    pub fn with_stdlib(stdlib: bool) -> Self {
        let env = Env::new();
        if stdlib {
            cinder_stdlib::register_stdlib(&env);
        }
        higher_order::register(&env);
        Interpreter {
            global_env: Rc::new(env),
        }
    }

    pub fn eval(&self, expr: &Value) -> EvalResult {
        eval(expr, &self.global_env)
    }

    pub fn eval_str(&self, input: &str) -> EvalResult {
        eval_string(input, &self.global_env)
    }

    pub fn evaluate(&self, input: &str) -> EvalResult {
        evaluate(input, &self.global_env)
    }
}

/// Evaluate every form in a string, returning the last value.
pub fn eval_string(input: &str, env: &Env) -> EvalResult {
    let exprs = read_many(input)?;
    let mut result = Value::Nil;
    for expr in &exprs {
        tracing::debug!(form = %expr, "eval");
        result = eval(expr, env)?;
    }
    Ok(result)
}

/// Tokenize, parse exactly one form and evaluate it.
pub fn evaluate(input: &str, env: &Env) -> EvalResult {
    let mut parser = Parser::new(tokenize(input)?);
    let expr = parser.parse()?;
    if let Some(span) = parser.next_span() {
        return Err(CinderError::syntax("unexpected input after expression", span));
    }
    eval(&expr, env)
}

/// Evaluate a value in an environment.
pub fn eval(expr: &Value, env: &Env) -> EvalResult {
    match expr {
        Value::Bool(_)
        | Value::Number(_)
        | Value::Rational(_)
        | Value::Matrix(_)
        | Value::String(_)
        | Value::Builtin(_)
        | Value::Closure(_) => Ok(expr.clone()),
        Value::Nil => Err(CinderError::eval("evaluating nil is prohibited")),
        Value::Symbol(name) => env.lookup(*name),
        Value::Pair(pair) => eval_pair(pair, env),
    }
}

fn eval_pair(pair: &Pair, env: &Env) -> EvalResult {
    let mut head = pair.car.clone();
    while let Value::Pair(inner) = &head {
        let reduced = eval_pair(inner, env)?;
        head = reduced;
    }

    let operands = pair.cdr.to_vec().ok_or_else(|| {
        CinderError::eval(format!("malformed call form: ({head} . {})", pair.cdr))
    })?;

    let proc = match &head {
        Value::Symbol(name) => {
            if let Some((form, handler)) = special_forms::lookup(*name) {
                tracing::trace!(form, "special form");
                return handler(&operands, env);
            }
            env.lookup(*name)?
        }
        other => other.clone(),
    };

    let args = operands
        .iter()
        .map(|operand| eval(operand, env))
        .collect::<Result<Vec<_>, _>>()?;
    apply(&proc, &args)
}

/// Apply a procedure value to already-evaluated arguments.
pub fn apply(proc: &Value, args: &[Value]) -> EvalResult {
    match proc {
        Value::Builtin(native) => native.call(args),
        Value::Closure(closure) => apply_closure(closure, args),
        other => Err(CinderError::eval(format!("not a procedure: {other}"))),
    }
}

fn apply_closure(closure: &Closure, args: &[Value]) -> EvalResult {
    let name = closure
        .name
        .map(resolve)
        .unwrap_or_else(|| "lambda".to_string());
    tracing::trace!(procedure = %name, argc = args.len(), "apply closure");
    let frame = closure
        .env
        .create_child(&closure.params, args)
        .map_err(|e| match e {
            CinderError::Arity { expected, got, .. } => CinderError::arity(name, expected, got),
            other => other,
        })?;
    special_forms::eval_sequence(&closure.body, &frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_core::ErrorKind;

    fn run(input: &str) -> EvalResult {
        Interpreter::new().eval_str(input)
    }

    #[test]
    fn test_self_evaluating() {
        assert_eq!(run("42").unwrap(), Value::Number(42.0));
        assert_eq!(run("\"s\"").unwrap(), Value::string("s"));
        assert_eq!(run("#f").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_evaluating_nil_is_an_error() {
        let interp = Interpreter::new();
        let err = interp.eval(&Value::Nil).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lisp);
        assert!(err.to_string().contains("nil"));
        assert!(run("()").is_err());
    }

    #[test]
    fn test_head_reduction() {
        assert_eq!(run("((lambda (x) (* x x)) 7)").unwrap(), Value::Number(49.0));
        assert_eq!(
            run("(define (adder n) (lambda (x) (+ x n))) ((adder 2) 3)").unwrap(),
            Value::Number(5.0)
        );
    }

    #[test]
    fn test_dotted_call_is_an_error() {
        let err = run("(+ 1 . 2)").unwrap_err();
        assert!(matches!(err, CinderError::Eval(_)));
    }

    #[test]
    fn test_not_a_procedure() {
        let err = run("(1 2 3)").unwrap_err();
        assert!(err.to_string().contains("not a procedure"));
    }

    #[test]
    fn test_closure_arity_names_procedure() {
        match run("(define (f a b) a) (f 1)").unwrap_err() {
            CinderError::Arity { name, got, .. } => {
                assert_eq!(name, "f");
                assert_eq!(got, 1);
            }
            other => panic!("expected arity error, got {other:?}"),
        }
    }

    #[test]
    fn test_evaluate_single_form() {
        let interp = Interpreter::new();
        assert_eq!(interp.evaluate("(+ 1 2)").unwrap(), Value::Number(3.0));
        assert!(matches!(
            interp.evaluate("1 2"),
            Err(CinderError::Syntax { .. })
        ));
        assert!(matches!(
            interp.evaluate(""),
            Err(CinderError::Syntax { .. })
        ));
    }

    #[test]
    fn test_without_stdlib_higher_order_still_bound() {
        let interp = Interpreter::with_stdlib(false);
        assert!(interp.global_env.get_str("map").is_some());
        assert!(interp.global_env.get_str("car").is_none());
    }
}
