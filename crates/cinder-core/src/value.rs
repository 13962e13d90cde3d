use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lasso::{Rodeo, Spur};

use crate::env::Env;
use crate::error::CinderError;
use crate::matrix::Matrix;
use crate::rational::Rational;

thread_local! {
    static INTERNER: RefCell<Rodeo> = RefCell::new(Rodeo::default());
}

/// Intern a string, returning a Spur key.
pub fn intern(s: &str) -> Spur {
    INTERNER.with(|r| r.borrow_mut().get_or_intern(s))
}

/// Resolve a Spur key back to a String.
pub fn resolve(spur: Spur) -> String {
    INTERNER.with(|r| r.borrow().resolve(&spur).to_string())
}

/// Resolve a Spur and call f with the &str, avoiding allocation.
pub fn with_resolved<F, R>(spur: Spur, f: F) -> R
where
    F: FnOnce(&str) -> R,
{
    INTERNER.with(|r| {
        let interner = r.borrow();
        f(interner.resolve(&spur))
    })
}

/// A native function callable from Cinder.
pub type NativeFnInner = dyn Fn(&[Value]) -> Result<Value, CinderError>;

pub struct NativeFn {
    pub name: String,
    pub func: Box<NativeFnInner>,
}

impl NativeFn {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&[Value]) -> Result<Value, CinderError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Box::new(f),
        }
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, CinderError> {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native-fn {}>", self.name)
    }
}

/// A user-defined procedure: parameter names, body forms and the frame it closed over.
pub struct Closure {
    pub params: Vec<Spur>,
    pub body: Vec<Value>,
    pub env: Env,
    pub name: Option<Spur>,
}

impl fmt::Debug for Closure {
    // The captured frame may contain this closure; don't walk it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(|p| resolve(*p)).collect();
        match self.name {
            Some(name) => write!(f, "<closure {} ({})>", resolve(name), params.join(" ")),
            None => write!(f, "<closure ({})>", params.join(" ")),
        }
    }
}

/// A cons cell. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Pair {
    pub car: Value,
    pub cdr: Value,
}

impl Drop for Pair {
    // Unlink the cdr chain in a loop; recursive drops overflow on long lists.
    fn drop(&mut self) {
        let mut next = std::mem::replace(&mut self.cdr, Value::Nil);
        while let Value::Pair(rc) = next {
            match Rc::try_unwrap(rc) {
                Ok(mut pair) => next = std::mem::replace(&mut pair.cdr, Value::Nil),
                Err(_) => break,
            }
        }
    }
}

/// Structural equality, walking the cdr chain iteratively.
fn pairs_equal(mut a: &Rc<Pair>, mut b: &Rc<Pair>) -> bool {
    loop {
        if Rc::ptr_eq(a, b) {
            return true;
        }
        if a.car != b.car {
            return false;
        }
        match (&a.cdr, &b.cdr) {
            (Value::Pair(x), Value::Pair(y)) => {
                a = x;
                b = y;
            }
            (x, y) => return x == y,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Rational(Rational),
    Matrix(Rc<Matrix>),
    String(Rc<String>),
    Symbol(Spur),
    Nil,
    Pair(Rc<Pair>),
    Builtin(Rc<NativeFn>),
    Closure(Rc<Closure>),
}

impl Value {
    pub fn symbol(s: &str) -> Value {
        Value::Symbol(intern(s))
    }

    pub fn string(s: &str) -> Value {
        Value::String(Rc::new(s.to_string()))
    }

    pub fn number(n: f64) -> Value {
        Value::Number(n)
    }

    pub fn cons(car: Value, cdr: Value) -> Value {
        Value::Pair(Rc::new(Pair { car, cdr }))
    }

    pub fn builtin(native: NativeFn) -> Value {
        Value::Builtin(Rc::new(native))
    }

    /// Build a proper list from the given elements.
    pub fn list(items: Vec<Value>) -> Value {
        Value::list_with_tail(items, Value::Nil)
    }

    /// Build a list whose final cdr is `tail`; a non-nil tail yields a dotted list.
    pub fn list_with_tail(items: Vec<Value>, tail: Value) -> Value {
        items
            .into_iter()
            .rev()
            .fold(tail, |acc, item| Value::cons(item, acc))
    }

    /// Collect the elements of a proper list. `None` for dotted lists and non-lists.
    pub fn to_vec(&self) -> Option<Vec<Value>> {
        let (items, tail) = self.split_list();
        match tail {
            Value::Nil => Some(items),
            _ => None,
        }
    }

    /// Walk the spine, returning the elements and whatever ends it.
    pub fn split_list(&self) -> (Vec<Value>, Value) {
        let mut items = Vec::new();
        let mut cur = self.clone();
        loop {
            match cur {
                Value::Pair(p) => {
                    items.push(p.car.clone());
                    cur = p.cdr.clone();
                }
                other => return (items, other),
            }
        }
    }

    pub fn is_proper_list(&self) -> bool {
        let mut cur = self;
        loop {
            match cur {
                Value::Nil => return true,
                Value::Pair(p) => cur = &p.cdr,
                _ => return false,
            }
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Rational(_) => "rational",
            Value::Matrix(_) => "matrix",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Nil => "nil",
            Value::Pair(_) => "pair",
            Value::Builtin(_) => "builtin",
            Value::Closure(_) => "procedure",
        }
    }

    /// Only `#f` is false.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_procedure(&self) -> bool {
        matches!(self, Value::Builtin(_) | Value::Closure(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Rational(r) => Some(r.to_f64()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol_spur(&self) -> Option<Spur> {
        match self {
            Value::Symbol(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<&Pair> {
        match self {
            Value::Pair(p) => Some(p),
            _ => None,
        }
    }

    /// Identity comparison: `eq?` semantics.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::String(a), Value::String(b)) => Rc::ptr_eq(a, b),
            (Value::Matrix(a), Value::Matrix(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => Rc::ptr_eq(a, b),
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            _ => self == other,
        }
    }

    /// Human-readable rendering used by `display`: strings without quotes.
    pub fn display_string(&self) -> String {
        match self {
            Value::String(s) => s.to_string(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Rational(a), Value::Rational(b)) => a == b,
            (Value::Number(a), Value::Rational(b)) | (Value::Rational(b), Value::Number(a)) => {
                *a == b.to_f64()
            }
            (Value::Matrix(a), Value::Matrix(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Pair(a), Value::Pair(b)) => pairs_equal(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => Rc::ptr_eq(a, b),
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Render a double the way the printer does: integral values carry no decimal point.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "+nan.0".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "+inf.0" } else { "-inf.0" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{n}")
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for ch in s.chars() {
        match ch {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '\r' => write!(f, "\\r")?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "()"),
            Value::Bool(true) => write!(f, "#t"),
            Value::Bool(false) => write!(f, "#f"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Rational(r) => write!(f, "{r}"),
            Value::Matrix(m) => write!(f, "{m}"),
            Value::String(s) => write_escaped(f, s),
            Value::Symbol(s) => with_resolved(*s, |name| write!(f, "{name}")),
            Value::Pair(_) => {
                let (items, tail) = self.split_list();
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                if !tail.is_nil() {
                    write!(f, " . {tail}")?;
                }
                write!(f, ")")
            }
            Value::Builtin(_) | Value::Closure(_) => write!(f, "#<procedure>"),
        }
    }
}
