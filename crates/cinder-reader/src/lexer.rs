use cinder_core::{CinderError, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    Dot,
    Quote,
    Quasiquote,
    Unquote,
    Number(f64),
    Bool(bool),
    String(String),
    Identifier(String),
}

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Characters that end an identifier or number.
fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '.' | '\'' | '`' | ',' | '"')
}

fn is_identifier_char(ch: char) -> bool {
    !is_delimiter(ch) && !ch.is_control()
}

fn ends_token(next: Option<&char>) -> bool {
    match next {
        None => true,
        Some(&c) => is_delimiter(c) || c.is_control(),
    }
}

pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, CinderError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    let mut line = 1;
    let mut col = 1;

    while i < chars.len() {
        let ch = chars[i];
        let span = Span { line, col };

        let single = match ch {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '\'' => Some(Token::Quote),
            '`' => Some(Token::Quasiquote),
            ',' => Some(Token::Unquote),
            _ => None,
        };
        if let Some(token) = single {
            tokens.push(SpannedToken { token, span });
            i += 1;
            col += 1;
            continue;
        }

        match ch {
            '\n' => {
                line += 1;
                col = 1;
                i += 1;
            }
            c if c.is_whitespace() => {
                col += 1;
                i += 1;
            }

            '"' => {
                let mut s = String::new();
                i += 1;
                col += 1;
                loop {
                    let Some(&c) = chars.get(i) else {
                        return Err(CinderError::syntax("unterminated string", span));
                    };
                    i += 1;
                    col += 1;
                    match c {
                        '"' => break,
                        '\\' => {
                            let Some(&esc) = chars.get(i) else {
                                return Err(CinderError::syntax("unterminated string", span));
                            };
                            i += 1;
                            col += 1;
                            s.push(match esc {
                                'n' => '\n',
                                't' => '\t',
                                'r' => '\r',
                                other => other,
                            });
                            if esc == '\n' {
                                line += 1;
                                col = 1;
                            }
                        }
                        '\n' => {
                            line += 1;
                            col = 1;
                            s.push('\n');
                        }
                        other => s.push(other),
                    }
                }
                tokens.push(SpannedToken {
                    token: Token::String(s),
                    span,
                });
            }

            '#' => {
                let start = i;
                i += 1;
                while i < chars.len() && is_identifier_char(chars[i]) {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let token = match text.as_str() {
                    "#t" | "#true" => Token::Bool(true),
                    "#f" | "#false" => Token::Bool(false),
                    _ => {
                        return Err(CinderError::syntax(
                            format!("unknown # syntax: {text}"),
                            span,
                        ))
                    }
                };
                col += i - start;
                tokens.push(SpannedToken { token, span });
            }

            '.' if ends_token(chars.get(i + 1)) => {
                tokens.push(SpannedToken {
                    token: Token::Dot,
                    span,
                });
                i += 1;
                col += 1;
            }

            _ if starts_number(&chars[i..]) => {
                let len = number_len(&chars[i..]);
                let text: String = chars[i..i + len].iter().collect();
                if !ends_token(chars.get(i + len)) {
                    return Err(CinderError::syntax(
                        format!("invalid number literal starting with '{text}'"),
                        span,
                    ));
                }
                let n: f64 = text.parse().map_err(|_| {
                    CinderError::syntax(format!("invalid number literal: {text}"), span)
                })?;
                tokens.push(SpannedToken {
                    token: Token::Number(n),
                    span,
                });
                i += len;
                col += len;
            }

            c if is_identifier_char(c) && !matches!(c, '[' | ']' | '{' | '}' | ';' | '|') => {
                let start = i;
                while i < chars.len() && is_identifier_char(chars[i]) {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                col += i - start;
                tokens.push(SpannedToken {
                    token: Token::Identifier(name),
                    span,
                });
            }

            other => {
                return Err(CinderError::syntax(
                    format!("unexpected character: {other:?}"),
                    span,
                ));
            }
        }
    }

    Ok(tokens)
}

/// An optional sign followed by a digit, or by a `.` and a digit.
fn starts_number(chars: &[char]) -> bool {
    let body = match chars.first() {
        Some('+') | Some('-') => &chars[1..],
        _ => chars,
    };
    match body {
        [d, ..] if d.is_ascii_digit() => true,
        ['.', d, ..] if d.is_ascii_digit() => true,
        _ => false,
    }
}

fn number_len(chars: &[char]) -> usize {
    let mut i = 0;
    if matches!(chars.first(), Some('+') | Some('-')) {
        i += 1;
    }
    while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("('a `b ,c)"),
            vec![
                Token::LParen,
                Token::Quote,
                Token::Identifier("a".into()),
                Token::Quasiquote,
                Token::Identifier("b".into()),
                Token::Unquote,
                Token::Identifier("c".into()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("42 -3 +1.5 .5 1."),
            vec![
                Token::Number(42.0),
                Token::Number(-3.0),
                Token::Number(1.5),
                Token::Number(0.5),
                Token::Number(1.0),
            ]
        );
    }

    #[test]
    fn test_bare_signs_are_identifiers() {
        assert_eq!(
            kinds("+ - -x"),
            vec![
                Token::Identifier("+".into()),
                Token::Identifier("-".into()),
                Token::Identifier("-x".into()),
            ]
        );
    }

    #[test]
    fn test_bad_numbers() {
        assert!(matches!(tokenize("1.2.3"), Err(CinderError::Syntax { .. })));
        assert!(matches!(tokenize("12abc"), Err(CinderError::Syntax { .. })));
    }

    #[test]
    fn test_dot() {
        assert_eq!(
            kinds("(a . b)"),
            vec![
                Token::LParen,
                Token::Identifier("a".into()),
                Token::Dot,
                Token::Identifier("b".into()),
                Token::RParen,
            ]
        );
        assert_eq!(kinds("(a .)")[2], Token::Dot);
    }

    #[test]
    fn test_booleans() {
        assert_eq!(
            kinds("#t #f #true #false"),
            vec![
                Token::Bool(true),
                Token::Bool(false),
                Token::Bool(true),
                Token::Bool(false),
            ]
        );
        assert!(tokenize("#x").is_err());
        assert!(tokenize("#").is_err());
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            kinds(r#""a\"b\\c\nd\te\rf\q""#),
            vec![Token::String("a\"b\\c\nd\te\rfq".into())]
        );
        assert!(matches!(
            tokenize("\"open"),
            Err(CinderError::Syntax { .. })
        ));
    }

    #[test]
    fn test_identifier_stops_at_delimiters() {
        assert_eq!(
            kinds("foo\"s\""),
            vec![Token::Identifier("foo".into()), Token::String("s".into())]
        );
        assert_eq!(
            kinds("list->string?"),
            vec![Token::Identifier("list->string?".into())]
        );
    }

    #[test]
    fn test_rejected_leading_characters() {
        for input in ["[", "]", "{", "}", ";", "|", "\u{7}"] {
            assert!(
                matches!(tokenize(input), Err(CinderError::Syntax { .. })),
                "expected syntax error for {input:?}"
            );
        }
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("(a\n  bc)").unwrap();
        assert_eq!(tokens[0].span, Span::point(1, 1));
        assert_eq!(tokens[1].span, Span::point(1, 2));
        assert_eq!(tokens[2].span, Span::point(2, 3));
        assert_eq!(tokens[3].span, Span::point(2, 5));
    }
}
