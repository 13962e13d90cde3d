//! Drives whole programs and REPL input through an [`Interpreter`].

use std::io::Write;
use std::path::Path;

use crate::source::{is_complete, scan_forms, split_forms, strip_comments};
use crate::{CinderError, Interpreter, Result, Value};

/// A top-level form that failed during a file run.
#[derive(Debug)]
pub struct FormFailure {
    pub line: usize,
    pub error: CinderError,
}

/// Outcome of running every top-level form of a program.
#[derive(Debug, Default)]
pub struct FileReport {
    pub forms: usize,
    pub failures: Vec<FormFailure>,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, name: &str, line: usize, error: CinderError, err_out: &mut dyn Write) {
        if error.is_bug() {
            tracing::error!(file = name, line, %error, "interpreter bug");
        } else {
            tracing::warn!(file = name, line, kind = %error.kind(), %error, "form failed");
        }
        let _ = writeln!(err_out, "Error: {name}:{line}: {error}");
        self.failures.push(FormFailure { line, error });
    }
}

/// Evaluate each top-level form of `text` in order.
///
/// A failing or malformed form is reported to `err_out` and the run
/// continues with the next one. A form left open at the end of the text is
/// reported after everything before it has run. An unterminated block
/// comment aborts the run, and an `(exit n)` stops it with
/// [`CinderError::Exit`].
pub fn run_source(
    interp: &Interpreter,
    name: &str,
    text: &str,
    err_out: &mut dyn Write,
) -> Result<FileReport> {
    let stripped = strip_comments(text)?;
    let scanned = scan_forms(&stripped);
    let mut report = FileReport {
        forms: scanned.forms.len(),
        failures: Vec::new(),
    };

    for form in scanned.forms {
        match interp.eval_str(&form.text) {
            Ok(_) => {}
            Err(error) if error.exit_code().is_some() => return Err(error),
            Err(error) => report.fail(name, form.line, error, err_out),
        }
    }
    if let Some((line, error)) = scanned.unclosed {
        report.forms += 1;
        report.fail(name, line, error, err_out);
    }
    Ok(report)
}

/// Read a program from disk and run it with [`run_source`].
pub fn run_file(interp: &Interpreter, path: &Path, err_out: &mut dyn Write) -> Result<FileReport> {
    let name = path.display().to_string();
    let text = std::fs::read_to_string(path)
        .map_err(|e| CinderError::file(format!("cannot read {name}: {e}")))?;
    tracing::debug!(file = %name, bytes = text.len(), "running file");
    let report = run_source(interp, &name, &text, err_out)?;
    tracing::debug!(
        file = %name,
        forms = report.forms,
        failures = report.failures.len(),
        "file finished"
    );
    Ok(report)
}

/// Evaluate a complete chunk of REPL input, returning the value of every
/// top-level form in it. Stops at the first error.
pub fn eval_input(interp: &Interpreter, input: &str) -> Result<Vec<Value>> {
    let stripped = strip_comments(input)?;
    split_forms(&stripped)?
        .iter()
        .map(|form| interp.eval_str(&form.text))
        .collect()
}

/// What the REPL should do after a line was pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    /// Keep reading with the continuation prompt.
    Incomplete,
    /// Only whitespace and comments so far.
    Empty,
    /// A complete chunk ready to evaluate.
    Complete(String),
}

/// Accumulates REPL lines until the pending text is balanced.
#[derive(Debug, Default)]
pub struct ReplBuffer {
    pending: String,
}

impl ReplBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line. An extra `)` discards the buffer and returns the error.
    pub fn push_line(&mut self, line: &str) -> Result<ReplInput> {
        if !self.pending.is_empty() {
            self.pending.push('\n');
        }
        self.pending.push_str(line);

        match is_complete(&self.pending) {
            Ok(false) => Ok(ReplInput::Incomplete),
            Ok(true) => {
                let input = std::mem::take(&mut self.pending);
                let blank = strip_comments(&input)
                    .map(|s| s.trim().is_empty())
                    .unwrap_or(false);
                if blank {
                    Ok(ReplInput::Empty)
                } else {
                    Ok(ReplInput::Complete(input))
                }
            }
            Err(e) => {
                self.pending.clear();
                Err(e)
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn run(text: &str) -> (FileReport, String) {
        let interp = Interpreter::new();
        let mut err = Vec::new();
        let report = run_source(&interp, "test.cin", text, &mut err).unwrap();
        (report, String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_run_source_continues_after_error() {
        let interp = Interpreter::new();
        let mut err = Vec::new();
        let text = "(define x 1)\n(car '())\n(define y (+ x 1))\n";
        let report = run_source(&interp, "prog.cin", text, &mut err).unwrap();
        assert_eq!(report.forms, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].line, 2);
        assert_eq!(report.failures[0].error.kind(), ErrorKind::Lisp);
        assert_eq!(interp.eval_str("y").unwrap(), Value::Number(2.0));
        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("Error: prog.cin:2:"), "{err}");
    }

    #[test]
    fn test_run_source_success() {
        let (report, err) = run("; comment\n#| block\n|#\n(define (sq x) (* x x))\n(sq 4)");
        assert!(report.is_success());
        assert_eq!(report.forms, 2);
        assert!(err.is_empty());
    }

    #[test]
    fn test_unclosed_form_runs_what_precedes_it() {
        let interp = Interpreter::new();
        let mut err = Vec::new();
        let report = run_source(&interp, "bad.cin", "(define x 1)\n(+ 1 2", &mut err).unwrap();
        assert_eq!(report.forms, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].line, 2);
        assert_eq!(report.failures[0].error.kind(), ErrorKind::File);
        assert_eq!(interp.eval_str("x").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_unterminated_block_comment_aborts() {
        let interp = Interpreter::new();
        let mut err = Vec::new();
        let result = run_source(&interp, "bad.cin", "(define x 1) #| open", &mut err);
        assert!(matches!(result, Err(CinderError::File(_))));
    }

    #[test]
    fn test_exit_stops_the_run() {
        let interp = Interpreter::new();
        let mut err = Vec::new();
        let text = "(define x 1)\n(exit 4)\n(define x 2)\n";
        let result = run_source(&interp, "exit.cin", text, &mut err);
        assert_eq!(result.unwrap_err().exit_code(), Some(4));
        assert_eq!(interp.eval_str("x").unwrap(), Value::Number(1.0));
        assert!(err.is_empty());
    }

    #[test]
    fn test_run_file_missing() {
        let interp = Interpreter::new();
        let mut err = Vec::new();
        let result = run_file(&interp, Path::new("/definitely/not/here.cin"), &mut err);
        assert!(matches!(result, Err(CinderError::File(_))));
    }

    #[test]
    fn test_eval_input_returns_each_value() {
        let interp = Interpreter::new();
        let values = eval_input(&interp, "(define a 2) (* a 3) 'done").unwrap();
        assert_eq!(
            values,
            vec![Value::Nil, Value::Number(6.0), Value::symbol("done")]
        );
        assert!(eval_input(&interp, "(foo)").is_err());
    }

    #[test]
    fn test_repl_buffer_multiline() {
        let mut buf = ReplBuffer::new();
        assert_eq!(buf.push_line("(define (f x)").unwrap(), ReplInput::Incomplete);
        assert!(buf.is_pending());
        assert_eq!(
            buf.push_line("  (* x 2))").unwrap(),
            ReplInput::Complete("(define (f x)\n  (* x 2))".into())
        );
        assert!(!buf.is_pending());
    }

    #[test]
    fn test_repl_buffer_empty_and_errors() {
        let mut buf = ReplBuffer::new();
        assert_eq!(buf.push_line("   ").unwrap(), ReplInput::Empty);
        assert_eq!(buf.push_line("; just a note").unwrap(), ReplInput::Empty);
        assert!(buf.push_line("1)").is_err());
        assert!(!buf.is_pending());
        assert_eq!(buf.push_line("\"open").unwrap(), ReplInput::Incomplete);
        buf.clear();
        assert!(!buf.is_pending());
    }
}
