//! `evaluate_math_expression`: numeric expression evaluation.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := '-' unary | '+' unary | power
//! power   := primary ('^' unary)?
//! primary := number | ident | ident '(' expr ')' | '(' expr ')'
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus, so
//! `-2^2 == -4` and `2^3^2 == 512`.
//!
//! Every level of recursion passes through `unary`, which caps the nesting
//! depth at [`MAX_DEPTH`].

use crate::tools::{parse_args, ToolHandler, ToolName};
use crate::types::ToolResponseEnvelope;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::f64::consts;
use tracing::warn;

/// Deepest nesting of parentheses, signs, exponents or calls accepted.
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MathError {
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NotFinite,

    #[error("empty expression")]
    Empty,

    #[error("expression nests deeper than {0} levels")]
    TooDeep(usize),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Num(n) => n.to_string(),
            Token::Ident(s) => s.clone(),
            Token::Op(c) => c.to_string(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, MathError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Scientific notation: 1e3, 2.5E-4
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let n = text
                    .parse::<f64>()
                    .map_err(|_| MathError::InvalidNumber(text.clone()))?;
                tokens.push(Token::Num(n));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push(Token::Op(c));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            other => return Err(MathError::UnexpectedChar(other, i)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn expect(&mut self, want: Token) -> Result<(), MathError> {
        match self.next() {
            Some(tok) if tok == want => Ok(()),
            Some(tok) => Err(MathError::UnexpectedToken(tok.describe())),
            None => Err(MathError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> Result<f64, MathError> {
        let mut value = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, MathError> {
        let mut value = self.unary()?;
        while let Some(Token::Op(op @ ('*' | '/' | '%'))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                '*' => value * rhs,
                _ if rhs == 0.0 => return Err(MathError::DivisionByZero),
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, MathError> {
        if self.depth >= MAX_DEPTH {
            return Err(MathError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<f64, MathError> {
        match self.peek() {
            Some(Token::Op('-')) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Op('+')) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, MathError> {
        let base = self.primary()?;
        if let Some(Token::Op('^')) = self.peek() {
            self.pos += 1;
            let exp = self.unary()?;
            return Ok(base.powf(exp));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, MathError> {
        match self.next() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::LParen) => {
                let v = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(v)
            }
            Some(Token::Ident(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.pos += 1;
                    let arg = self.expr()?;
                    self.expect(Token::RParen)?;
                    apply_function(&name, arg)
                } else {
                    constant(&name)
                }
            }
            Some(tok) => Err(MathError::UnexpectedToken(tok.describe())),
            None => Err(MathError::UnexpectedEnd),
        }
    }
}

fn constant(name: &str) -> Result<f64, MathError> {
    match name {
        "pi" | "PI" => Ok(consts::PI),
        "e" | "E" => Ok(consts::E),
        "tau" => Ok(consts::TAU),
        _ => Err(MathError::UnknownIdentifier(name.to_string())),
    }
}

fn apply_function(name: &str, x: f64) -> Result<f64, MathError> {
    let v = match name {
        "sqrt" => x.sqrt(),
        "abs" => x.abs(),
        "ln" => x.ln(),
        "log" => x.log10(),
        "exp" => x.exp(),
        "sin" => x.sin(),
        "cos" => x.cos(),
        "tan" => x.tan(),
        "floor" => x.floor(),
        "ceil" => x.ceil(),
        "round" => x.round(),
        _ => return Err(MathError::UnknownIdentifier(name.to_string())),
    };
    Ok(v)
}

/// Evaluate a numeric expression.
pub fn evaluate(expression: &str) -> Result<f64, MathError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(MathError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(MathError::UnexpectedToken(tok.describe()));
    }
    if !value.is_finite() {
        return Err(MathError::NotFinite);
    }
    Ok(value)
}

/// Render a result the way a person would write it: integral values
/// without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        // Normalizes -0 to 0.
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MathArgs {
    equation: String,
}

/// Handler for [`ToolName::EvaluateMathExpression`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MathHandler;

#[async_trait]
impl ToolHandler for MathHandler {
    fn tool(&self) -> ToolName {
        ToolName::EvaluateMathExpression
    }

    async fn call(&self, args: &Map<String, Value>, name: &str) -> Result<ToolResponseEnvelope> {
        let args: MathArgs = match parse_args(args) {
            Ok(a) => a,
            Err(e) => {
                warn!("Invalid math arguments: {}", e);
                return Ok(ToolResponseEnvelope::new(
                    name,
                    std::iter::empty::<(String, Value)>(),
                    format!("Error: invalid arguments for {}: {}", name, e),
                ));
            }
        };

        let content = match evaluate(&args.equation) {
            Ok(v) => format_number(v),
            Err(e) => {
                warn!("Failed to evaluate '{}': {}", args.equation, e);
                format!("Error evaluating expression: {}", e)
            }
        };

        Ok(ToolResponseEnvelope::new(
            name,
            [("equation", Value::String(args.equation))],
            content,
        ))
    }
}
