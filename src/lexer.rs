//! Tokenizer for calculator expressions.
//!
//! The scanner walks the input character by character and either produces a
//! flat list of arithmetic tokens or rejects the input. Rejection happens in
//! one of two flavors: [`EvalError::Disallowed`] when the character opens a
//! construct the sandbox forbids (names, strings, comparisons, containers),
//! and [`EvalError::Malformed`] for characters that no expression could
//! contain. Classifying at scan time means forbidden input is refused before
//! any parsing or evaluation is attempted.

use crate::eval::{EvalError, Number};

/// One lexical unit of an arithmetic expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// An integer or float literal.
    Number(Number),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    DoubleStar,
    /// `/`
    Slash,
    /// `//`
    DoubleSlash,
    /// `%`
    Percent,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
}

/// Scan `input` into tokens, rejecting anything outside the sandbox.
pub fn scan(input: &str) -> Result<Vec<Token>, EvalError> {
    Scanner::new(input).scan_all()
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(input: &str) -> Self {
        Scanner {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.peek_char();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn scan_all(mut self) -> Result<Vec<Token>, EvalError> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.read_char();
                continue;
            }
            tokens.push(self.scan_token(ch)?);
        }
        Ok(tokens)
    }

    fn scan_token(&mut self, ch: char) -> Result<Token, EvalError> {
        match ch {
            '0'..='9' => self.scan_number(),
            '.' => match self.chars.get(self.pos + 1) {
                Some(c) if c.is_ascii_digit() => self.scan_number(),
                Some(c) if c.is_alphabetic() || *c == '_' => {
                    Err(disallowed("attribute access ('.')"))
                }
                _ => Err(malformed_char('.')),
            },
            '+' => {
                self.read_char();
                Ok(Token::Plus)
            }
            '-' => {
                self.read_char();
                Ok(Token::Minus)
            }
            '*' => {
                self.read_char();
                if self.peek_char() == Some('*') {
                    self.read_char();
                    Ok(Token::DoubleStar)
                } else {
                    Ok(Token::Star)
                }
            }
            '/' => {
                self.read_char();
                if self.peek_char() == Some('/') {
                    self.read_char();
                    Ok(Token::DoubleSlash)
                } else {
                    Ok(Token::Slash)
                }
            }
            '%' => {
                self.read_char();
                Ok(Token::Percent)
            }
            '(' => {
                self.read_char();
                Ok(Token::OpenParen)
            }
            ')' => {
                self.read_char();
                Ok(Token::CloseParen)
            }
            _ => Err(self.classify_rejected(ch)),
        }
    }

    /// Decide whether a non-arithmetic character is a forbidden construct
    /// or plain garbage. Names are read in full so the message can show
    /// which one was refused.
    fn classify_rejected(&mut self, ch: char) -> EvalError {
        if ch.is_alphabetic() || ch == '_' {
            let mut name = String::new();
            while let Some(c) = self.peek_char() {
                if c.is_alphanumeric() || c == '_' {
                    name.push(c);
                    self.read_char();
                } else {
                    break;
                }
            }
            return disallowed(&format!("name reference '{name}'"));
        }
        match ch {
            '\'' | '"' => disallowed("string literal"),
            ',' => disallowed("argument list or tuple (',')"),
            '[' | ']' => disallowed("subscript or list ('[')"),
            '{' | '}' => disallowed("set or dict ('{')"),
            '<' | '>' | '=' | '!' => disallowed(&format!("comparison operator ('{ch}')")),
            '&' | '|' | '^' | '~' => disallowed(&format!("bitwise operator ('{ch}')")),
            _ => malformed_char(ch),
        }
    }

    fn scan_number(&mut self) -> Result<Token, EvalError> {
        let start = self.pos;
        let mut is_float = false;
        while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
            self.read_char();
        }
        if self.peek_char() == Some('.') {
            is_float = true;
            self.read_char();
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                self.read_char();
            }
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            // Only commit to an exponent when digits actually follow,
            // so `2e` is reported as the name scan would report it.
            let mut lookahead = self.pos + 1;
            if matches!(self.chars.get(lookahead), Some('+' | '-')) {
                lookahead += 1;
            }
            if matches!(self.chars.get(lookahead), Some(c) if c.is_ascii_digit()) {
                is_float = true;
                self.pos = lookahead + 1;
                while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                    self.read_char();
                }
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if is_float {
            let value = text
                .parse::<f64>()
                .map_err(|_| EvalError::Malformed(format!("bad number literal '{text}'")))?;
            Ok(Token::Number(Number::Float(value)))
        } else {
            let value = text
                .parse::<i64>()
                .map_err(|_| EvalError::Malformed(format!("integer literal '{text}' out of range")))?;
            Ok(Token::Number(Number::Int(value)))
        }
    }
}

fn disallowed(what: &str) -> EvalError {
    EvalError::Disallowed(what.to_string())
}

fn malformed_char(ch: char) -> EvalError {
    EvalError::Malformed(format!("unexpected character '{ch}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scans_operators_and_numbers() {
        let tokens = scan("2 + 3*(4 ** 5) // 6 % 7 / 8 - 9").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(Number::Int(2)),
                Token::Plus,
                Token::Number(Number::Int(3)),
                Token::Star,
                Token::OpenParen,
                Token::Number(Number::Int(4)),
                Token::DoubleStar,
                Token::Number(Number::Int(5)),
                Token::CloseParen,
                Token::DoubleSlash,
                Token::Number(Number::Int(6)),
                Token::Percent,
                Token::Number(Number::Int(7)),
                Token::Slash,
                Token::Number(Number::Int(8)),
                Token::Minus,
                Token::Number(Number::Int(9)),
            ]
        );
    }

    #[test]
    fn test_scans_float_forms() {
        assert_eq!(
            scan("1.5 .5 5. 2e3 1.5E-2").unwrap(),
            vec![
                Token::Number(Number::Float(1.5)),
                Token::Number(Number::Float(0.5)),
                Token::Number(Number::Float(5.0)),
                Token::Number(Number::Float(2000.0)),
                Token::Number(Number::Float(0.015)),
            ]
        );
    }

    #[test]
    fn test_empty_input_scans_to_no_tokens() {
        assert_eq!(scan("").unwrap(), vec![]);
        assert_eq!(scan("   \t ").unwrap(), vec![]);
    }

    #[test]
    fn test_names_are_disallowed_with_the_name_in_the_message() {
        match scan("__import__('os')") {
            Err(EvalError::Disallowed(msg)) => assert!(msg.contains("__import__")),
            other => panic!("expected disallowed, got {other:?}"),
        }
        match scan("2 + x") {
            Err(EvalError::Disallowed(msg)) => assert!(msg.contains("'x'")),
            other => panic!("expected disallowed, got {other:?}"),
        }
    }

    #[test]
    fn test_sandbox_punctuation_is_disallowed() {
        for input in ["'s'", "\"s\"", "a,b", "[1]", "{1}", "1<2", "1=2", "1|2", "~1"] {
            assert!(
                matches!(scan(input), Err(EvalError::Disallowed(_))),
                "expected disallowed for {input:?}"
            );
        }
    }

    #[test]
    fn test_garbage_characters_are_malformed() {
        for input in ["2 @ 3", "#", "1 $ 2", "?", ";"] {
            assert!(
                matches!(scan(input), Err(EvalError::Malformed(_))),
                "expected malformed for {input:?}"
            );
        }
    }

    #[test]
    fn test_huge_integer_literal_is_malformed() {
        assert!(matches!(
            scan("99999999999999999999999999"),
            Err(EvalError::Malformed(_))
        ));
    }

    #[test]
    fn test_exponent_without_digits_reads_as_name() {
        // `2e` is a number followed by a name, and names are refused.
        assert!(matches!(scan("2e"), Err(EvalError::Disallowed(_))));
    }
}
