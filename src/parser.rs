//! Recursive descent parser for calculator expressions.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/' | '//' | '%') factor)*
//! factor := ('+' | '-') factor | power
//! power  := atom ('**' factor)?
//! atom   := NUMBER | '(' expr ')'
//! ```
//!
//! `**` is right associative and binds tighter than a unary minus on its
//! left, so `2**3**2` is 512 and `-2**2` is -4.

use crate::eval::{EvalError, Number};
use crate::lexer::Token;

/// A parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Number),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

/// Parse a token stream into a single expression tree.
///
/// The whole stream must be consumed; leftover tokens make the input
/// malformed rather than silently ignored.
pub fn parse(tokens: Vec<Token>) -> Result<Expr, EvalError> {
    let mut builder = AstBuilder::new(tokens);
    if builder.peek().is_none() {
        return Err(EvalError::Malformed("empty expression".to_string()));
    }
    let expr = builder.expr()?;
    match builder.peek() {
        None => Ok(expr),
        Some(token) => Err(EvalError::Malformed(format!(
            "unexpected token '{}'",
            describe(token)
        ))),
    }
}

/// Nesting bound for the descent. Parentheses, unary signs, and exponents
/// each cost one level; input past the bound is rejected rather than
/// allowed to exhaust the parser's stack.
const MAX_NESTING: usize = 200;

struct AstBuilder {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl AstBuilder {
    fn new(tokens: Vec<Token>) -> Self {
        AstBuilder {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn consume(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.term()?;
        while let Some(op) = match self.peek() {
            Some(Token::Plus) => Some(BinOp::Add),
            Some(Token::Minus) => Some(BinOp::Sub),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.factor()?;
        while let Some(op) = match self.peek() {
            Some(Token::Star) => Some(BinOp::Mul),
            Some(Token::Slash) => Some(BinOp::Div),
            Some(Token::DoubleSlash) => Some(BinOp::FloorDiv),
            Some(Token::Percent) => Some(BinOp::Mod),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    // Every recursion cycle in the grammar passes through here, so this
    // one check bounds the descent and the depth of the resulting tree.
    fn factor(&mut self) -> Result<Expr, EvalError> {
        if self.depth >= MAX_NESTING {
            return Err(EvalError::Malformed(format!(
                "nested deeper than {MAX_NESTING} levels"
            )));
        }
        self.depth += 1;
        let result = match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.factor().map(|operand| unary(UnaryOp::Plus, operand))
            }
            Some(Token::Minus) => {
                self.pos += 1;
                self.factor().map(|operand| unary(UnaryOp::Minus, operand))
            }
            _ => self.power(),
        };
        self.depth -= 1;
        result
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        let base = self.atom()?;
        if self.peek() == Some(Token::DoubleStar) {
            self.pos += 1;
            // The exponent re-enters at factor so `2**-3` parses and the
            // operator chains right to left.
            let exponent = self.factor()?;
            return Ok(binary(BinOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, EvalError> {
        match self.consume() {
            Some(Token::Number(value)) => Ok(Expr::Literal(value)),
            Some(Token::OpenParen) => {
                let inner = self.expr()?;
                match self.consume() {
                    Some(Token::CloseParen) => Ok(inner),
                    Some(token) => Err(EvalError::Malformed(format!(
                        "expected ')', found '{}'",
                        describe(token)
                    ))),
                    None => Err(EvalError::Malformed("missing closing ')'".to_string())),
                }
            }
            Some(token) => Err(EvalError::Malformed(format!(
                "unexpected token '{}'",
                describe(token)
            ))),
            None => Err(EvalError::Malformed(
                "unexpected end of expression".to_string(),
            )),
        }
    }
}

fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::Unary {
        op,
        operand: Box::new(operand),
    }
}

fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn describe(token: Token) -> String {
    match token {
        Token::Number(n) => n.to_string(),
        Token::Plus => "+".to_string(),
        Token::Minus => "-".to_string(),
        Token::Star => "*".to_string(),
        Token::DoubleStar => "**".to_string(),
        Token::Slash => "/".to_string(),
        Token::DoubleSlash => "//".to_string(),
        Token::Percent => "%".to_string(),
        Token::OpenParen => "(".to_string(),
        Token::CloseParen => ")".to_string(),
    }
}
