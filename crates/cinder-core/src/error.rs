use std::fmt;

/// Check arity of a native function's arguments, returning `CinderError::Arity` on mismatch.
///
/// # Forms
///
/// ```ignore
/// check_arity!(args, "fn-name", 2);        // exactly 2
/// check_arity!(args, "fn-name", 1..=3);    // 1 to 3 inclusive
/// check_arity!(args, "fn-name", 2..);      // 2 or more
/// ```
#[macro_export]
macro_rules! check_arity {
    ($args:expr, $name:expr, $exact:literal) => {
        if $args.len() != $exact {
            return Err($crate::CinderError::arity(
                $name,
                stringify!($exact),
                $args.len(),
            ));
        }
    };
    ($args:expr, $name:expr, $lo:literal ..= $hi:literal) => {
        if $args.len() < $lo || $args.len() > $hi {
            return Err($crate::CinderError::arity(
                $name,
                concat!(stringify!($lo), "-", stringify!($hi)),
                $args.len(),
            ));
        }
    };
    ($args:expr, $name:expr, $lo:literal ..) => {
        if $args.len() < $lo {
            return Err($crate::CinderError::arity(
                $name,
                concat!(stringify!($lo), "+"),
                $args.len(),
            ));
        }
    };
}

/// A 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn point(line: usize, col: usize) -> Self {
        Span { line, col }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// The five error categories an embedder has to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Lexing or parsing failed.
    Syntax,
    /// Runtime fault in user code: unbound variable, arity, type, `error` calls.
    Lisp,
    /// Numeric domain fault in rational or matrix arithmetic.
    Math,
    /// Input layer fault: unreadable file, unbalanced input, open block comment.
    File,
    /// An interpreter invariant was violated.
    Bug,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "SyntaxError"),
            ErrorKind::Lisp => write!(f, "LispError"),
            ErrorKind::Math => write!(f, "MathError"),
            ErrorKind::File => write!(f, "FileError"),
            ErrorKind::Bug => write!(f, "BugError"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CinderError {
    #[error("Syntax error at {span}: {message}")]
    Syntax { message: String, span: Span },

    #[error("Eval error: {0}")]
    Eval(String),

    #[error("Unbound variable: {0}")]
    Unbound(String),

    #[error("Arity error: {name} expects {expected} args, got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("Type error: expected {expected}, got {got}")]
    Type { expected: String, got: String },

    /// Raised by the `error` builtin.
    #[error("{0}")]
    User(String),

    #[error("Math error: {0}")]
    Math(String),

    #[error("File error: {0}")]
    File(String),

    #[error("Interpreter bug: {0}")]
    Bug(String),

    /// Raised by the `exit` builtin. The host stops evaluating and exits with the code.
    #[error("exit requested with code {0}")]
    Exit(i32),
}

impl CinderError {
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        CinderError::Syntax {
            message: message.into(),
            span,
        }
    }

    pub fn eval(msg: impl Into<String>) -> Self {
        CinderError::Eval(msg.into())
    }

    pub fn type_error(expected: impl Into<String>, got: impl Into<String>) -> Self {
        CinderError::Type {
            expected: expected.into(),
            got: got.into(),
        }
    }

    pub fn arity(name: impl Into<String>, expected: impl Into<String>, got: usize) -> Self {
        CinderError::Arity {
            name: name.into(),
            expected: expected.into(),
            got,
        }
    }

    pub fn math(msg: impl Into<String>) -> Self {
        CinderError::Math(msg.into())
    }

    pub fn file(msg: impl Into<String>) -> Self {
        CinderError::File(msg.into())
    }

    pub fn bug(msg: impl Into<String>) -> Self {
        CinderError::Bug(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CinderError::Syntax { .. } => ErrorKind::Syntax,
            CinderError::Eval(_)
            | CinderError::Unbound(_)
            | CinderError::Arity { .. }
            | CinderError::Type { .. }
            | CinderError::User(_)
            | CinderError::Exit(_) => ErrorKind::Lisp,
            CinderError::Math(_) => ErrorKind::Math,
            CinderError::File(_) => ErrorKind::File,
            CinderError::Bug(_) => ErrorKind::Bug,
        }
    }

    pub fn is_bug(&self) -> bool {
        self.kind() == ErrorKind::Bug
    }

    /// The requested process exit code, if this is an `exit` request rather than a fault.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CinderError::Exit(code) => Some(*code),
            _ => None,
        }
    }
}
