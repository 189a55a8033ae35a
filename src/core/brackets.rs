use crate::core::containers::Stack;
use thiserror::Error;

/// Where a bracket expression stops balancing. Positions are character
/// indexes into the expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BracketError {
    #[error("Unexpected '{found}' at position {position} with nothing open")]
    UnexpectedCloser { found: char, position: usize },

    #[error("Mismatched '{found}' at position {position}, expected '{expected}'")]
    Mismatched {
        found: char,
        expected: char,
        position: usize,
    },

    #[error("Unclosed '{opener}' opened at position {position}")]
    Unclosed { opener: char, position: usize },
}

impl BracketError {
    pub fn position(&self) -> usize {
        match self {
            Self::UnexpectedCloser { position, .. }
            | Self::Mismatched { position, .. }
            | Self::Unclosed { position, .. } => *position,
        }
    }
}

/// One push or pop the matcher made, for narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketStep {
    Push { opener: char, position: usize },
    Match { opener: char, closer: char, position: usize },
}

fn closer_for(opener: char) -> Option<char> {
    match opener {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn is_closer(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

/// Checks bracket nesting, reporting every push and match to `on_step`.
/// Non-bracket characters are ignored.
pub fn check_traced(
    expression: &str,
    on_step: &mut dyn FnMut(BracketStep),
) -> Result<(), BracketError> {
    let mut open: Stack<(char, usize)> = Stack::new();

    for (position, c) in expression.chars().enumerate() {
        if closer_for(c).is_some() {
            open.push((c, position));
            on_step(BracketStep::Push {
                opener: c,
                position,
            });
        } else if is_closer(c) {
            let (opener, _) = open.pop().ok_or(BracketError::UnexpectedCloser {
                found: c,
                position,
            })?;
            let expected = closer_for(opener).unwrap_or(c);
            if expected != c {
                return Err(BracketError::Mismatched {
                    found: c,
                    expected,
                    position,
                });
            }
            on_step(BracketStep::Match {
                opener,
                closer: c,
                position,
            });
        }
    }

    match open.pop() {
        Some((opener, position)) => {
            // Report the innermost unclosed opener.
            Err(BracketError::Unclosed { opener, position })
        }
        None => Ok(()),
    }
}

pub fn check(expression: &str) -> Result<(), BracketError> {
    check_traced(expression, &mut |_| {})
}

pub fn is_balanced(expression: &str) -> bool {
    check(expression).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_expressions() {
        assert!(is_balanced("(a + {b * [c - d]})"));
        assert!(is_balanced(""));
        assert!(is_balanced("no brackets at all"));
        assert!(is_balanced("()[]{}"));
    }

    #[test]
    fn test_mismatched_closer_position() {
        let err = check("(a + [b)]").unwrap_err();
        assert_eq!(
            err,
            BracketError::Mismatched {
                found: ')',
                expected: ']',
                position: 7
            }
        );
        assert_eq!(err.position(), 7);
    }

    #[test]
    fn test_unexpected_closer() {
        assert_eq!(
            check("a)").unwrap_err(),
            BracketError::UnexpectedCloser {
                found: ')',
                position: 1
            }
        );
    }

    #[test]
    fn test_unclosed_reports_innermost_opener() {
        assert_eq!(
            check("{ (x").unwrap_err(),
            BracketError::Unclosed {
                opener: '(',
                position: 2
            }
        );
    }

    #[test]
    fn test_trace_pairs_each_closer_with_its_opener() {
        let mut steps = Vec::new();
        check_traced("([])", &mut |step| steps.push(step)).unwrap();
        assert_eq!(
            steps,
            vec![
                BracketStep::Push { opener: '(', position: 0 },
                BracketStep::Push { opener: '[', position: 1 },
                BracketStep::Match { opener: '[', closer: ']', position: 2 },
                BracketStep::Match { opener: '(', closer: ')', position: 3 },
            ]
        );
    }
}
