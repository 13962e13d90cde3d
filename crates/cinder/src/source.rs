//! Text-level preparation of program source before it reaches the reader:
//! comment removal, paren balance checks and splitting into top-level forms.

use cinder_core::CinderError;

/// One top-level form and the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub text: String,
    pub line: usize,
}

/// Remove `;` line comments and `#| ... |#` block comments, leaving string literals intact.
///
/// Newlines inside block comments are kept so line numbers stay meaningful.
pub fn strip_comments(text: &str) -> Result<String, CinderError> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    let mut line = 1;
    let mut in_string = false;

    while i < chars.len() {
        let ch = chars[i];
        if in_string {
            out.push(ch);
            if ch == '\\' {
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                    i += 1;
                }
            } else if ch == '"' {
                in_string = false;
            }
            if ch == '\n' {
                line += 1;
            }
            i += 1;
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
                i += 1;
            }
            ';' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '#' if chars.get(i + 1) == Some(&'|') => {
                let start_line = line;
                i += 2;
                out.push(' ');
                loop {
                    match (chars.get(i), chars.get(i + 1)) {
                        (Some('|'), Some('#')) => {
                            i += 2;
                            break;
                        }
                        (Some('\n'), _) => {
                            out.push('\n');
                            line += 1;
                            i += 1;
                        }
                        (Some(_), _) => i += 1,
                        (None, _) => {
                            return Err(CinderError::file(format!(
                                "unterminated block comment starting at line {start_line}"
                            )))
                        }
                    }
                }
            }
            '\n' => {
                line += 1;
                out.push(ch);
                i += 1;
            }
            _ => {
                out.push(ch);
                i += 1;
            }
        }
    }
    Ok(out)
}

/// Scan state of comment-free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Balance {
    depth: usize,
    in_string: bool,
}

fn balance(text: &str) -> Result<Balance, CinderError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;
    let mut line = 1;
    for ch in text.chars() {
        if ch == '\n' {
            line += 1;
        }
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match ch {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    CinderError::file(format!("unexpected ')' at line {line}"))
                })?;
            }
            _ => {}
        }
    }
    Ok(Balance { depth, in_string })
}

/// Number of currently open parentheses, ignoring those inside strings.
/// An extra `)` is a file error.
pub fn paren_depth(text: &str) -> Result<usize, CinderError> {
    balance(text).map(|b| b.depth)
}

/// True when `text` has no open list, string or block comment left.
///
/// Used by the REPL to decide whether to keep reading lines.
pub fn is_complete(text: &str) -> Result<bool, CinderError> {
    let stripped = match strip_comments(text) {
        Ok(s) => s,
        Err(CinderError::File(_)) => return Ok(false),
        Err(e) => return Err(e),
    };
    let b = balance(&stripped)?;
    Ok(b.depth == 0 && !b.in_string)
}

fn is_form_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | '\'' | '`' | ',')
}

/// Top-level forms of a text, plus the form left open at its end, if any.
#[derive(Debug, Default)]
pub struct ScannedForms {
    pub forms: Vec<Form>,
    /// Line where the unclosed form starts and the file error describing it.
    pub unclosed: Option<(usize, CinderError)>,
}

/// Split comment-free text into its top-level forms.
///
/// A form left open at the end of the text is a file error.
pub fn split_forms(text: &str) -> Result<Vec<Form>, CinderError> {
    let scanned = scan_forms(text);
    match scanned.unclosed {
        Some((_, error)) => Err(error),
        None => Ok(scanned.forms),
    }
}

/// Like [`split_forms`], but keeps the forms that precede an unclosed one.
///
/// A stray `)` becomes a form of its own so the reader reports it and the
/// forms after it are still returned.
pub fn scan_forms(text: &str) -> ScannedForms {
    let chars: Vec<char> = text.chars().collect();
    let mut forms = Vec::new();
    let mut i = 0;
    let mut line = 1;

    let skip_whitespace = |i: &mut usize, line: &mut usize| {
        while *i < chars.len() && chars[*i].is_whitespace() {
            if chars[*i] == '\n' {
                *line += 1;
            }
            *i += 1;
        }
    };

    loop {
        skip_whitespace(&mut i, &mut line);
        if i >= chars.len() {
            break;
        }
        let start = i;
        let start_line = line;

        while i < chars.len() && matches!(chars[i], '\'' | '`' | ',') {
            i += 1;
            skip_whitespace(&mut i, &mut line);
        }

        match chars.get(i) {
            None => {}
            Some('(') => {
                let mut depth = 0usize;
                let mut in_string = false;
                let mut escape = false;
                loop {
                    let Some(&ch) = chars.get(i) else {
                        let error = CinderError::file(format!(
                            "unbalanced parentheses: form starting at line {start_line} is not closed"
                        ));
                        return ScannedForms {
                            forms,
                            unclosed: Some((start_line, error)),
                        };
                    };
                    i += 1;
                    if ch == '\n' {
                        line += 1;
                    }
                    if escape {
                        escape = false;
                    } else if in_string {
                        match ch {
                            '\\' => escape = true,
                            '"' => in_string = false,
                            _ => {}
                        }
                    } else {
                        match ch {
                            '"' => in_string = true,
                            '(' => depth += 1,
                            ')' => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
            Some(')') => i += 1,
            Some('"') => {
                i += 1;
                let mut escape = false;
                loop {
                    let Some(&ch) = chars.get(i) else {
                        let error = CinderError::file(format!(
                            "unterminated string starting at line {start_line}"
                        ));
                        return ScannedForms {
                            forms,
                            unclosed: Some((start_line, error)),
                        };
                    };
                    i += 1;
                    if ch == '\n' {
                        line += 1;
                    }
                    if escape {
                        escape = false;
                    } else if ch == '\\' {
                        escape = true;
                    } else if ch == '"' {
                        break;
                    }
                }
            }
            Some(_) => {
                while i < chars.len() && !is_form_delimiter(chars[i]) {
                    i += 1;
                }
            }
        }

        forms.push(Form {
            text: chars[start..i].iter().collect(),
            line: start_line,
        });
    }
    ScannedForms {
        forms,
        unclosed: None,
    }
}
