//! Integer expression evaluation.
//!
//! A single left-to-right scan over the tokens with an operand stack and an
//! operator stack. `*` and `/` combine as soon as their right operand is
//! pushed; `+` and `-` combine when the next `+`, `-` or `)` arrives. This
//! gives the usual precedence and left-to-right grouping without a
//! precedence table.

use crate::error::{ArithmeticError, EvalError, FormatError};

use super::token::{Operator, Token, tokenize};

/// Resolves variable names to integer values during evaluation.
///
/// Any closure `Fn(&str) -> Option<i64>` is a `Lookup`; `None` is reported as
/// an undefined variable.
pub trait Lookup {
    /// Returns the value of `name`, or the reason it has none.
    fn resolve(&self, name: &str) -> Result<i64, String>;
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Option<i64>,
{
    fn resolve(&self, name: &str) -> Result<i64, String> {
        self(name).ok_or_else(|| "undefined variable".to_string())
    }
}

/// An entry on the operator stack.
#[derive(Clone, Copy, Debug)]
enum Pending {
    Operator(Operator),
    Paren,
}

/// Evaluate an integer arithmetic expression.
///
/// Division truncates toward zero. Division by zero and overflow are
/// reported as [`ArithmeticError`]; a failed lookup as [`EvalError::Lookup`].
pub fn evaluate<L>(expression: &str, lookup: &L) -> Result<i64, EvalError>
where
    L: Lookup + ?Sized,
{
    let tokens = tokenize(expression)?;
    check_parentheses(&tokens)?;

    let mut operands: Vec<i64> = Vec::new();
    let mut operators: Vec<Pending> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(literal) => {
                let value = literal
                    .parse::<i64>()
                    .map_err(|_| ArithmeticError::Overflow)?;
                push_operand(&mut operands, &mut operators, value)?;
            }
            Token::Variable(name) => {
                let value = lookup.resolve(name).map_err(|reason| EvalError::Lookup {
                    name: name.to_string(),
                    reason,
                })?;
                push_operand(&mut operands, &mut operators, value)?;
            }
            Token::LeftParen => operators.push(Pending::Paren),
            Token::Operator(op) if op.is_multiplicative() => {
                operators.push(Pending::Operator(op));
            }
            Token::Operator(op) => {
                reduce_additive(&mut operands, &mut operators)?;
                operators.push(Pending::Operator(op));
            }
            Token::RightParen => {
                reduce_additive(&mut operands, &mut operators)?;
                match operators.pop() {
                    Some(Pending::Paren) => {}
                    Some(Pending::Operator(op)) => {
                        return Err(FormatError::MissingOperand(op.symbol()).into());
                    }
                    None => return Err(FormatError::MismatchedParentheses.into()),
                }
                if let Some(&Pending::Operator(op)) = operators.last()
                    && op.is_multiplicative()
                {
                    operators.pop();
                    let (left, right) = pop_pair(&mut operands, op)?;
                    operands.push(apply(op, left, right)?);
                }
            }
        }
    }

    match (operators.as_slice(), operands.as_slice()) {
        ([], [value]) => Ok(*value),
        ([Pending::Operator(op)], [left, right]) => Ok(apply(*op, *left, *right)?),
        _ => Err(FormatError::Unbalanced.into()),
    }
}

/// Reject unbalanced parentheses and implied multiplication such as `(2)3`.
fn check_parentheses(tokens: &[Token<'_>]) -> Result<(), FormatError> {
    let opened = tokens.iter().filter(|t| **t == Token::LeftParen).count();
    let closed = tokens.iter().filter(|t| **t == Token::RightParen).count();
    if opened != closed {
        return Err(FormatError::MismatchedParentheses);
    }

    let implied = tokens
        .windows(2)
        .any(|pair| matches!(pair, [Token::RightParen, Token::Number(_)]));
    if implied {
        return Err(FormatError::ImpliedMultiplication);
    }

    Ok(())
}

/// Push a new operand, combining it right away with a pending `*` or `/`.
fn push_operand(
    operands: &mut Vec<i64>,
    operators: &mut Vec<Pending>,
    value: i64,
) -> Result<(), EvalError> {
    if let Some(&Pending::Operator(op)) = operators.last()
        && op.is_multiplicative()
    {
        operators.pop();
        let left = operands
            .pop()
            .ok_or(FormatError::MissingOperand(op.symbol()))?;
        operands.push(apply(op, left, value)?);
    } else {
        operands.push(value);
    }
    Ok(())
}

/// Combine the top two operands if a `+` or `-` is pending.
fn reduce_additive(operands: &mut Vec<i64>, operators: &mut Vec<Pending>) -> Result<(), EvalError> {
    if let Some(&Pending::Operator(op)) = operators.last()
        && !op.is_multiplicative()
    {
        operators.pop();
        let (left, right) = pop_pair(operands, op)?;
        operands.push(apply(op, left, right)?);
    }
    Ok(())
}

/// Pop `(left, right)`; the right operand is on top.
fn pop_pair(operands: &mut Vec<i64>, op: Operator) -> Result<(i64, i64), FormatError> {
    let missing = FormatError::MissingOperand(op.symbol());
    let right = operands.pop().ok_or_else(|| missing.clone())?;
    let left = operands.pop().ok_or(missing)?;
    Ok((left, right))
}

fn apply(op: Operator, left: i64, right: i64) -> Result<i64, ArithmeticError> {
    let result = match op {
        Operator::Add => left.checked_add(right),
        Operator::Subtract => left.checked_sub(right),
        Operator::Multiply => left.checked_mul(right),
        Operator::Divide => {
            if right == 0 {
                return Err(ArithmeticError::DivisionByZero);
            }
            left.checked_div(right)
        }
    };
    result.ok_or(ArithmeticError::Overflow)
}
