use std::collections::VecDeque;
use std::rc::Rc;

use cinder_core::{CinderError, Span, Value};

use crate::lexer::{tokenize, SpannedToken, Token};

/// Recursive-descent parser that consumes tokens from the front of its queue.
pub struct Parser {
    tokens: VecDeque<SpannedToken>,
    last_span: Span,
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Parser {
            tokens: tokens.into(),
            last_span: Span::point(1, 1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Position of the next unconsumed token.
    pub fn next_span(&self) -> Option<Span> {
        self.tokens.front().map(|t| t.span)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.front().map(|t| &t.token)
    }

    /// Position of the next token, or of the last consumed one at end of input.
    fn span(&self) -> Span {
        self.tokens
            .front()
            .map(|t| t.span)
            .unwrap_or(self.last_span)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.pop_front();
        if let Some(t) = &tok {
            self.last_span = t.span;
        }
        tok
    }

    /// Consume exactly one expression.
    pub fn parse(&mut self) -> Result<Value, CinderError> {
        let span = self.span();
        let Some(SpannedToken { token, span }) = self.advance() else {
            return Err(CinderError::syntax("unexpected end of input", span));
        };
        match token {
            Token::Number(n) => Ok(Value::Number(n)),
            Token::Bool(b) => Ok(Value::Bool(b)),
            Token::String(s) => Ok(Value::String(Rc::new(s))),
            Token::Identifier(name) => Ok(Value::symbol(&name)),
            Token::Quote => self.parse_prefixed("quote"),
            Token::Quasiquote => self.parse_prefixed("quasiquote"),
            Token::Unquote => self.parse_prefixed("unquote"),
            Token::LParen => self.parse_tails(span),
            Token::RParen => Err(CinderError::syntax("unexpected ')'", span)),
            Token::Dot => Err(CinderError::syntax("unexpected '.'", span)),
        }
    }

    fn parse_prefixed(&mut self, name: &str) -> Result<Value, CinderError> {
        let inner = self.parse()?;
        Ok(Value::list(vec![Value::symbol(name), inner]))
    }

    /// Parse list elements after an opening paren, up to and including the matching `)`.
    fn parse_tails(&mut self, open: Span) -> Result<Value, CinderError> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(CinderError::syntax(
                        format!("missing ')' for list opened at {open}"),
                        self.span(),
                    ))
                }
                Some(Token::RParen) => {
                    self.advance();
                    return Ok(Value::list(items));
                }
                Some(Token::Dot) => {
                    let dot_span = self.span();
                    self.advance();
                    if items.is_empty() {
                        return Err(CinderError::syntax(
                            "'.' cannot start a list",
                            dot_span,
                        ));
                    }
                    if matches!(self.peek(), Some(Token::RParen) | None) {
                        return Err(CinderError::syntax(
                            "expected an element after '.'",
                            self.span(),
                        ));
                    }
                    let tail = self.parse()?;
                    return match self.advance() {
                        Some(SpannedToken {
                            token: Token::RParen,
                            ..
                        }) => Ok(Value::list_with_tail(items, tail)),
                        Some(t) => Err(CinderError::syntax(
                            "expected ')' after the element following '.'",
                            t.span,
                        )),
                        None => Err(CinderError::syntax(
                            format!("missing ')' for list opened at {open}"),
                            self.span(),
                        )),
                    };
                }
                Some(_) => items.push(self.parse()?),
            }
        }
    }
}

/// Read the first s-expression from a string.
pub fn read(input: &str) -> Result<Value, CinderError> {
    let mut parser = Parser::new(tokenize(input)?);
    parser.parse()
}

/// Read all s-expressions from a string.
pub fn read_many(input: &str) -> Result<Vec<Value>, CinderError> {
    let mut parser = Parser::new(tokenize(input)?);
    let mut exprs = Vec::new();
    while !parser.is_empty() {
        exprs.push(parser.parse()?);
    }
    Ok(exprs)
}
