//! Cinder — a small Lisp with exact rationals and matrices.
//!
//! This module provides the embedding API for the Cinder interpreter.
//!
//! # Quick Start
//!
//! ```no_run
//! use cinder::{Interpreter, InterpreterBuilder, Value};
//!
//! let interp = InterpreterBuilder::new().build();
//! let result = interp.eval_str("(+ 1 2)").unwrap();
//! assert_eq!(result, Value::Number(3.0));
//! ```

use std::rc::Rc;

pub mod config;
pub mod runner;
pub mod source;

// Re-export core types.
pub use cinder_core::{
    intern, resolve, with_resolved, CinderError, Env, ErrorKind, Matrix, Rational, Span, Value,
};
pub use cinder_reader::{read, read_many, tokenize};

/// Result of evaluating a Cinder expression.
pub type EvalResult = Result<Value>;

pub type Result<T> = std::result::Result<T, CinderError>;

/// Builder for configuring and constructing an [`Interpreter`].
///
/// By default the builtin catalogue is enabled.
pub struct InterpreterBuilder {
    stdlib: bool,
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpreterBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self { stdlib: true }
    }

    /// Enable or disable the builtin catalogue (default: `true`).
    ///
    /// `eval`, `apply`, `map`, `filter` and `reduce` are bound either way.
    pub fn with_stdlib(mut self, enable: bool) -> Self {
        self.stdlib = enable;
        self
    }

    /// Disable the builtin catalogue.
    pub fn without_stdlib(self) -> Self {
        self.with_stdlib(false)
    }

    /// Build the [`Interpreter`] with the configured options.
    pub fn build(self) -> Interpreter {
        tracing::debug!(stdlib = self.stdlib, "building interpreter");
        Interpreter {
            inner: cinder_eval::Interpreter::with_stdlib(self.stdlib),
        }
    }
}

/// A Cinder interpreter instance.
///
/// Use [`InterpreterBuilder`] for fine-grained control, or call
/// [`Interpreter::new`] for a default interpreter with the stdlib enabled.
pub struct Interpreter {
    inner: cinder_eval::Interpreter,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    /// Create an [`InterpreterBuilder`] for fine-grained configuration.
    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// Evaluate a single parsed [`Value`] expression.
    ///
    /// Definitions (`define`) persist across calls.
    pub fn eval(&self, expr: &Value) -> EvalResult {
        self.inner.eval(expr)
    }

    /// Parse and evaluate a string containing one or more expressions,
    /// returning the value of the last one.
    ///
    /// Definitions persist across calls, so you can define a procedure in
    /// one call and use it in the next.
    pub fn eval_str(&self, input: &str) -> EvalResult {
        self.inner.eval_str(input)
    }

    /// Parse exactly one expression and evaluate it. Trailing input is a
    /// syntax error.
    pub fn evaluate(&self, input: &str) -> EvalResult {
        self.inner.evaluate(input)
    }

    /// Register a native procedure that can be called from Cinder code.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cinder::{CinderError, Interpreter, Value};
    ///
    /// let interp = Interpreter::new();
    /// interp.register_fn("square", |args: &[Value]| match args {
    ///     [Value::Number(n)] => Ok(Value::Number(n * n)),
    ///     _ => Err(CinderError::eval("square expects one number")),
    /// });
    /// ```
    pub fn register_fn<F>(&self, name: &str, f: F)
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        cinder_stdlib::register_fn(&self.inner.global_env, name, f);
    }

    /// Return a reference to the global environment.
    pub fn global_env(&self) -> &Rc<Env> {
        &self.inner.global_env
    }
}
