mod eval;
mod higher_order;
pub mod special_forms;

pub use eval::{apply, eval, eval_string, evaluate, EvalResult, Interpreter};
