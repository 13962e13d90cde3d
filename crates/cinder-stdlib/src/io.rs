use std::io::Write;

use cinder_core::{check_arity, CinderError, Env, Value};

use crate::register_fn;

fn write_displayed(args: &[Value]) {
    let mut out = std::io::stdout().lock();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            let _ = write!(out, " ");
        }
        let _ = write!(out, "{}", arg.display_string());
    }
    let _ = out.flush();
}

/// Render `error` arguments into one message: strings raw, everything else printed.
pub(crate) fn error_message(args: &[Value]) -> String {
    args.iter()
        .map(Value::display_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validate an `exit` argument: an integer in 0..=255.
pub(crate) fn exit_code(args: &[Value]) -> Result<i32, CinderError> {
    check_arity!(args, "exit", 0..=1);
    let Some(arg) = args.first() else {
        return Ok(0);
    };
    let n = arg
        .as_number()
        .ok_or_else(|| CinderError::type_error("number", arg.type_name()))?;
    if n.fract() != 0.0 || !(0.0..=255.0).contains(&n) {
        return Err(CinderError::eval(format!(
            "exit: code must be an integer between 0 and 255, got {arg}"
        )));
    }
    Ok(n as i32)
}

pub fn register(env: &Env) {
    register_fn(env, "display", |args| {
        write_displayed(args);
        Ok(Value::Nil)
    });

    register_fn(env, "displayln", |args| {
        write_displayed(args);
        println!();
        Ok(Value::Nil)
    });

    register_fn(env, "newline", |args| {
        check_arity!(args, "newline", 0);
        println!();
        Ok(Value::Nil)
    });

    // One printed representation per line.
    register_fn(env, "print", |args| {
        let mut out = std::io::stdout().lock();
        for arg in args {
            let _ = writeln!(out, "{arg}");
        }
        Ok(Value::Nil)
    });

    register_fn(env, "error", |args| {
        if args.is_empty() {
            return Err(CinderError::eval("error called with no message"));
        }
        Err(CinderError::User(error_message(args)))
    });

    register_fn(env, "exit", |args| {
        let code = exit_code(args)?;
        tracing::debug!(code, "exit requested");
        Err(CinderError::Exit(code))
    });
}
