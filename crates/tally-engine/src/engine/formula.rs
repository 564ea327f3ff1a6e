//! Validated formulas.
//!
//! A [`Formula`] is checked for syntax when it is built, so a cell can only
//! ever hold well-formed expressions. Variables are normalized up front and
//! the set of referenced names becomes the cell's dependee set in the store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{EvalError, FormatError};

use super::cell_name::Normalization;
use super::eval::{Lookup, evaluate};
use super::token::{Token, tokenize};

/// An immutable, syntactically valid arithmetic expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Formula {
    /// Canonical text: tokens without whitespace, variables normalized.
    text: String,
    variables: BTreeSet<String>,
}

impl Formula {
    /// Parse a formula, upper-casing variable names.
    pub fn new(expression: &str) -> Result<Formula, FormatError> {
        Self::with_normalization(expression, Normalization::default())
    }

    /// Parse a formula, normalizing variable names with `normalization`.
    pub fn with_normalization(
        expression: &str,
        normalization: Normalization,
    ) -> Result<Formula, FormatError> {
        let tokens = tokenize(expression)?;
        validate(&tokens)?;

        let mut text = String::with_capacity(expression.len());
        let mut variables = BTreeSet::new();
        for token in &tokens {
            match token {
                Token::Variable(name) => {
                    let name = normalization.apply(name);
                    text.push_str(&name);
                    variables.insert(name);
                }
                other => text.push_str(&other.to_string()),
            }
        }

        Ok(Formula { text, variables })
    }

    /// The normalized names this formula references.
    pub fn variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    /// Evaluate against `lookup`, which receives normalized names.
    pub fn evaluate<L>(&self, lookup: &L) -> Result<i64, EvalError>
    where
        L: Lookup + ?Sized,
    {
        evaluate(&self.text, lookup)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The same formula with its variables normalized by `normalization`.
    ///
    /// Only variables contain letters, so case mapping the canonical text
    /// touches nothing else.
    pub fn renormalized(&self, normalization: Normalization) -> Formula {
        Formula {
            text: normalization.apply(&self.text),
            variables: self
                .variables
                .iter()
                .map(|name| normalization.apply(name))
                .collect(),
        }
    }
}

/// Check the token sequence against the formula grammar.
fn validate(tokens: &[Token<'_>]) -> Result<(), FormatError> {
    let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
        return Err(FormatError::Empty);
    };
    if !(first.is_operand() || *first == Token::LeftParen) {
        return Err(FormatError::InvalidStart(first.to_string()));
    }
    if !(last.is_operand() || *last == Token::RightParen) {
        return Err(FormatError::InvalidEnd(last.to_string()));
    }

    let mut depth = 0usize;
    for token in tokens {
        match token {
            Token::LeftParen => depth += 1,
            Token::RightParen => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(FormatError::MismatchedParentheses)?;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(FormatError::MismatchedParentheses);
    }

    for pair in tokens.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let allowed = match prev {
            // An operand must follow an opening parenthesis or an operator.
            Token::LeftParen | Token::Operator(_) => {
                next.is_operand() || next == Token::LeftParen
            }
            // An operator or a closing parenthesis must follow an operand.
            Token::Number(_) | Token::Variable(_) | Token::RightParen => {
                matches!(next, Token::Operator(_) | Token::RightParen)
            }
        };
        if !allowed {
            if prev == Token::RightParen && matches!(next, Token::Number(_)) {
                return Err(FormatError::ImpliedMultiplication);
            }
            return Err(FormatError::UnexpectedToken {
                token: next.to_string(),
                after: prev.to_string(),
            });
        }
    }

    Ok(())
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Formula {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::new(s)
    }
}

impl TryFrom<String> for Formula {
    type Error = FormatError;

    /// Serialized text is already canonical, so it is kept as written.
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Formula::with_normalization(&s, Normalization::Preserve)
    }
}

impl From<Formula> for String {
    fn from(formula: Formula) -> String {
        formula.text
    }
}
