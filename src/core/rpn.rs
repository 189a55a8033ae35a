use crate::core::containers::Stack;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpnError {
    #[error("Stack underflow at operator '{operator}'")]
    StackUnderflow { operator: char },

    #[error("Invalid number: {0}")]
    InvalidToken(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow at operator '{operator}'")]
    Overflow { operator: char },

    #[error("Invalid expression: {0} values remain")]
    LeftoverOperands(usize),

    #[error("Empty expression")]
    Empty,
}

/// Evaluates a whitespace-separated Reverse Polish Notation expression.
/// Numbers are pushed; each operator pops two operands and pushes the result.
pub fn evaluate(expression: &str) -> Result<i64, RpnError> {
    let mut stack: Stack<i64> = Stack::new();

    for token in expression.split_whitespace() {
        let operator = match token {
            "+" => '+',
            "-" => '-',
            "*" => '*',
            "/" => '/',
            number => {
                let value = number
                    .parse()
                    .map_err(|_| RpnError::InvalidToken(number.to_string()))?;
                stack.push(value);
                continue;
            }
        };

        let b = stack.pop().ok_or(RpnError::StackUnderflow { operator })?;
        let a = stack.pop().ok_or(RpnError::StackUnderflow { operator })?;
        let result = match operator {
            '+' => a.checked_add(b),
            '-' => a.checked_sub(b),
            '*' => a.checked_mul(b),
            _ => {
                if b == 0 {
                    return Err(RpnError::DivisionByZero);
                }
                a.checked_div(b)
            }
        };
        stack.push(result.ok_or(RpnError::Overflow { operator })?);
    }

    match stack.len() {
        0 => Err(RpnError::Empty),
        1 => stack.pop().ok_or(RpnError::Empty),
        remaining => Err(RpnError::LeftoverOperands(remaining)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textbook_expressions() {
        assert_eq!(evaluate("3 4 +"), Ok(7));
        assert_eq!(evaluate("15 7 1 1 + - *"), Ok(75));
        assert_eq!(evaluate("5 3 * 2 +"), Ok(17));
        assert_eq!(evaluate("20 4 /"), Ok(5));
    }

    #[test]
    fn test_operand_order_matters() {
        assert_eq!(evaluate("10 3 -"), Ok(7));
        assert_eq!(evaluate("3 10 -"), Ok(-7));
    }

    #[test]
    fn test_errors() {
        assert_eq!(evaluate("1 +"), Err(RpnError::StackUnderflow { operator: '+' }));
        assert_eq!(evaluate("1 two +"), Err(RpnError::InvalidToken("two".into())));
        assert_eq!(evaluate("1 0 /"), Err(RpnError::DivisionByZero));
        assert_eq!(evaluate("1 2 3 +"), Err(RpnError::LeftoverOperands(2)));
        assert_eq!(evaluate("   "), Err(RpnError::Empty));
        assert_eq!(
            evaluate("9223372036854775807 1 +"),
            Err(RpnError::Overflow { operator: '+' })
        );
    }
}
