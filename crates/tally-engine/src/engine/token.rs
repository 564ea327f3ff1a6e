//! Expression tokenizer.
//!
//! Splits an expression on operator and parenthesis boundaries, trims the
//! pieces in between and classifies each one. Handles:
//! - Integer literals: `42`
//! - Variables: a run of letters followed by a run of digits (`A1`, `ab12`)
//! - Operators `+ - * /` and parentheses

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::error::FormatError;

/// A binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// `*` and `/` combine as soon as their right operand is known.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }
}

/// A lexical unit of an expression, borrowing from the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Number(&'a str),
    Variable(&'a str),
    Operator(Operator),
    LeftParen,
    RightParen,
}

impl Token<'_> {
    /// Numbers and variables.
    pub fn is_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Variable(_))
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(s) | Token::Variable(s) => f.write_str(s),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
        }
    }
}

fn delimiter_re() -> &'static Regex {
    static DELIMITER_RE: OnceLock<Regex> = OnceLock::new();
    DELIMITER_RE.get_or_init(|| {
        Regex::new(r"[()+\-*/]").expect("delimiter regex must compile")
    })
}

fn variable_re() -> &'static Regex {
    static VARIABLE_RE: OnceLock<Regex> = OnceLock::new();
    VARIABLE_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z]+[0-9]+$").expect("variable regex must compile")
    })
}

/// Returns true if `s` has the shape of a variable token.
pub fn is_variable(s: &str) -> bool {
    variable_re().is_match(s)
}

fn classify(piece: &str) -> Result<Token<'_>, FormatError> {
    if piece.bytes().all(|b| b.is_ascii_digit()) {
        Ok(Token::Number(piece))
    } else if is_variable(piece) {
        Ok(Token::Variable(piece))
    } else {
        Err(FormatError::IllegalToken(piece.to_string()))
    }
}

fn delimiter(symbol: &str) -> Token<'static> {
    match symbol {
        "(" => Token::LeftParen,
        ")" => Token::RightParen,
        "+" => Token::Operator(Operator::Add),
        "-" => Token::Operator(Operator::Subtract),
        "*" => Token::Operator(Operator::Multiply),
        _ => Token::Operator(Operator::Divide),
    }
}

/// Split an expression into tokens.
///
/// Whitespace around tokens is discarded; whitespace inside a piece (`1 2`)
/// makes that piece an illegal token.
pub fn tokenize(expression: &str) -> Result<Vec<Token<'_>>, FormatError> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for m in delimiter_re().find_iter(expression) {
        let piece = expression[last..m.start()].trim();
        if !piece.is_empty() {
            tokens.push(classify(piece)?);
        }
        tokens.push(delimiter(m.as_str()));
        last = m.end();
    }

    let rest = expression[last..].trim();
    if !rest.is_empty() {
        tokens.push(classify(rest)?);
    }

    Ok(tokens)
}
