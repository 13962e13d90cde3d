#![allow(dead_code)]

use cinder::{CinderError, ErrorKind, Interpreter, Value};

/// Evaluate in a fresh interpreter
pub fn eval(input: &str) -> Value {
    let interp = Interpreter::new();
    interp
        .eval_str(input)
        .unwrap_or_else(|e| panic!("eval failed for `{input}`: {e}"))
}

/// Evaluate and render with `Display`
pub fn eval_to_string(input: &str) -> String {
    eval(input).to_string()
}

/// Evaluate in a fresh interpreter, expecting an error
pub fn eval_err(input: &str) -> CinderError {
    let interp = Interpreter::new();
    match interp.eval_str(input) {
        Ok(v) => panic!("expected error for `{input}`, got {v}"),
        Err(e) => e,
    }
}

/// Assert the error category of a failing input
pub fn assert_err_kind(input: &str, kind: ErrorKind) {
    let err = eval_err(input);
    assert_eq!(err.kind(), kind, "wrong error kind for `{input}`: {err}");
}

/// Generate one test per row, comparing the printed result.
///
/// Usage:
/// ```ignore
/// eval_tests! {
///     test_name: "(+ 1 2)" => "3",
/// }
/// ```
///
/// This generates `test_name_prints` test functions.
#[macro_export]
macro_rules! eval_tests {
    ($($name:ident : $input:expr => $expected:expr),* $(,)?) => {
        $(
            paste::paste! {
                #[test]
                fn [<$name _prints>]() {
                    let result = common::eval_to_string($input);
                    assert_eq!(result, $expected, "input: {}", $input);
                }
            }
        )*
    };
}

/// Generate one test per row, checking the error category.
///
/// This generates `test_name_fails` test functions.
#[macro_export]
macro_rules! eval_err_tests {
    ($($name:ident : $input:expr => $kind:expr),* $(,)?) => {
        $(
            paste::paste! {
                #[test]
                fn [<$name _fails>]() {
                    common::assert_err_kind($input, $kind);
                }
            }
        )*
    };
}
