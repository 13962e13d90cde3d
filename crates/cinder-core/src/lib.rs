pub mod env;
pub mod error;
pub mod matrix;
pub mod rational;
pub mod value;

pub use env::{Env, WeakEnv};
pub use error::{CinderError, ErrorKind, Span};
pub use lasso::Spur;
pub use matrix::Matrix;
pub use rational::Rational;
pub use value::{
    format_number, intern, resolve, with_resolved, Closure, NativeFn, NativeFnInner, Pair, Value,
};
