//! Hand-rolled lexer for the condition DSL.

use crate::error::{ExprError, ExprResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Path(String),
    Str(String),
    Num(f64),
    True,
    False,
    Null,
    And,
    Or,
    Not,
    LParen,
    RParen,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Eof,
}

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    src: &'a str,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            chars: src.char_indices().peekable(),
            src,
        }
    }

    pub fn tokenize(mut self) -> ExprResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok == Token::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn next_token(&mut self) -> ExprResult<Token> {
        self.skip_whitespace();
        let Some(&(pos, c)) = self.chars.peek() else {
            return Ok(Token::Eof);
        };

        match c {
            '(' => {
                self.chars.next();
                Ok(Token::LParen)
            }
            ')' => {
                self.chars.next();
                Ok(Token::RParen)
            }
            '!' => {
                self.chars.next();
                if matches!(self.chars.peek(), Some((_, '='))) {
                    self.chars.next();
                    Ok(Token::Ne)
                } else {
                    Ok(Token::Not)
                }
            }
            '=' => {
                self.chars.next();
                if matches!(self.chars.peek(), Some((_, '='))) {
                    self.chars.next();
                    Ok(Token::Eq)
                } else {
                    Err(ExprError::UnexpectedChar('=', pos))
                }
            }
            '>' => {
                self.chars.next();
                if matches!(self.chars.peek(), Some((_, '='))) {
                    self.chars.next();
                    Ok(Token::Ge)
                } else {
                    Ok(Token::Gt)
                }
            }
            '<' => {
                self.chars.next();
                if matches!(self.chars.peek(), Some((_, '='))) {
                    self.chars.next();
                    Ok(Token::Le)
                } else {
                    Ok(Token::Lt)
                }
            }
            '&' => {
                self.chars.next();
                if matches!(self.chars.peek(), Some((_, '&'))) {
                    self.chars.next();
                    Ok(Token::And)
                } else {
                    Err(ExprError::UnexpectedChar('&', pos))
                }
            }
            '|' => {
                self.chars.next();
                if matches!(self.chars.peek(), Some((_, '|'))) {
                    self.chars.next();
                    Ok(Token::Or)
                } else {
                    Err(ExprError::UnexpectedChar('|', pos))
                }
            }
            '\'' | '"' => self.read_string(c),
            c if c.is_ascii_digit() || (c == '-' && self.peek_is_digit_after_minus()) => {
                self.read_number()
            }
            c if is_ident_start(c) => Ok(self.read_ident_or_keyword()),
            other => Err(ExprError::UnexpectedChar(other, pos)),
        }
    }

    fn peek_is_digit_after_minus(&self) -> bool {
        let mut it = self.chars.clone();
        it.next();
        matches!(it.peek(), Some((_, c)) if c.is_ascii_digit())
    }

    fn read_string(&mut self, quote: char) -> ExprResult<Token> {
        self.chars.next(); // consume opening quote
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some((_, c)) if c == quote => return Ok(Token::Str(s)),
                Some((_, '\\')) => {
                    if let Some((_, esc)) = self.chars.next() {
                        s.push(match esc {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            other => other,
                        });
                    } else {
                        return Err(ExprError::UnterminatedString);
                    }
                }
                Some((_, c)) => s.push(c),
                None => return Err(ExprError::UnterminatedString),
            }
        }
    }

    fn read_number(&mut self) -> ExprResult<Token> {
        let start = self.chars.peek().map_or(0, |(i, _)| *i);
        if matches!(self.chars.peek(), Some((_, '-'))) {
            self.chars.next();
        }
        let mut end = start;
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                end = i + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        let text = &self.src[start..end];
        text.parse::<f64>()
            .map(Token::Num)
            .map_err(|_| ExprError::Unexpected {
                expected: "number",
                found: text.to_string(),
            })
    }

    fn read_ident_or_keyword(&mut self) -> Token {
        let start = self.chars.peek().map_or(0, |(i, _)| *i);
        let mut end = start;
        while let Some(&(i, c)) = self.chars.peek() {
            if is_ident_continue(c) {
                end = i + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        let text = &self.src[start..end];
        match text {
            "true" => Token::True,
            "false" => Token::False,
            "null" => Token::Null,
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            other => Token::Path(other.to_string()),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}
