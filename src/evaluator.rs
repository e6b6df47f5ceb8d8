use crate::syntax::{BinaryExpression, Expression, SyntaxKind, SyntaxTree, Token};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("refusing to evaluate a tree with {count} diagnostic(s)")]
    Diagnostics { count: usize },

    #[error("division by zero at position {position}")]
    DivisionByZero { position: usize },

    #[error("remainder by zero at position {position}")]
    RemainderByZero { position: usize },

    #[error("integer overflow at position {position}")]
    Overflow { position: usize },

    #[error("missing operand at position {position}")]
    MissingOperand { position: usize },

    #[error("number literal at position {position} has no value")]
    InvalidLiteral { position: usize },

    /// The parser never puts anything but a binary operator here.
    #[error("internal error: unsupported binary operator {kind}")]
    UnsupportedOperator { kind: SyntaxKind },

    #[error("internal error: evaluation stack underflow")]
    StackUnderflow,
}

impl EvalError {
    /// True for faults caused by a broken tree rather than by user input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::UnsupportedOperator { .. } | Self::StackUnderflow)
    }
}

/// Evaluates a parsed line, refusing trees that carry diagnostics.
pub fn evaluate(tree: &SyntaxTree) -> Result<i32, EvalError> {
    if tree.has_diagnostics() {
        return Err(EvalError::Diagnostics {
            count: tree.diagnostics.len(),
        });
    }
    Evaluator::new(&tree.root).evaluate()
}

pub struct Evaluator<'a> {
    root: &'a Expression,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a Expression) -> Self {
        Evaluator { root }
    }

    pub fn evaluate(&self) -> Result<i32, EvalError> {
        let span = tracing::trace_span!("evaluate");
        let _entered = span.enter();
        let value = eval_expression(self.root)?;
        tracing::trace!("result = {}", value);
        Ok(value)
    }
}

enum Step<'a> {
    Visit(&'a Expression),
    Apply(&'a BinaryExpression),
}

// Post-order walk with an explicit work stack; left-deep chains of any length
// evaluate without growing the call stack.
fn eval_expression(root: &Expression) -> Result<i32, EvalError> {
    let mut work = vec![Step::Visit(root)];
    let mut values: Vec<i32> = Vec::new();

    while let Some(step) = work.pop() {
        match step {
            Step::Visit(Expression::Number(n)) => values.push(eval_number(&n.number)?),
            Step::Visit(Expression::Brackets(p)) => work.push(Step::Visit(&p.expression)),
            Step::Visit(Expression::Binary(b)) => {
                work.push(Step::Apply(b));
                work.push(Step::Visit(&b.right));
                work.push(Step::Visit(&b.left));
            }
            Step::Apply(b) => {
                let (rhs, lhs) = match (values.pop(), values.pop()) {
                    (Some(rhs), Some(lhs)) => (rhs, lhs),
                    _ => return Err(EvalError::StackUnderflow),
                };
                values.push(eval_binary(b, lhs, rhs)?);
            }
        }
    }

    match (values.pop(), values.is_empty()) {
        (Some(value), true) => Ok(value),
        _ => Err(EvalError::StackUnderflow),
    }
}

fn eval_number(token: &Token) -> Result<i32, EvalError> {
    if token.is_missing() {
        return Err(EvalError::MissingOperand {
            position: token.position,
        });
    }
    token.value.ok_or(EvalError::InvalidLiteral {
        position: token.position,
    })
}

fn eval_binary(b: &BinaryExpression, lhs: i32, rhs: i32) -> Result<i32, EvalError> {
    let position = b.operator.position;
    let overflow = EvalError::Overflow { position };

    let result = match b.operator.kind {
        SyntaxKind::PlusOperator => lhs.checked_add(rhs).ok_or(overflow)?,
        SyntaxKind::MinusOperator => lhs.checked_sub(rhs).ok_or(overflow)?,
        SyntaxKind::TimesOperator => lhs.checked_mul(rhs).ok_or(overflow)?,
        SyntaxKind::SlashOperator => {
            if rhs == 0 {
                return Err(EvalError::DivisionByZero { position });
            }
            lhs.checked_div(rhs).ok_or(overflow)?
        }
        SyntaxKind::ModOperator => {
            if rhs == 0 {
                return Err(EvalError::RemainderByZero { position });
            }
            lhs.checked_rem(rhs).ok_or(overflow)?
        }
        kind => return Err(EvalError::UnsupportedOperator { kind }),
    };
    tracing::trace!("{} {:?} {} = {}", lhs, b.operator.kind, rhs, result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> Result<i32, EvalError> {
        evaluate(&SyntaxTree::parse(input))
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("9-5-2"), Ok(2));
        assert_eq!(eval("2+3*4"), Ok(14));
        assert_eq!(eval("(2+3)*4"), Ok(20));
        assert_eq!(eval("((7))"), Ok(7));
        assert_eq!(eval(" 100 / 7 % 4 "), Ok(2));
    }

    #[test]
    fn truncating_division_and_dividend_sign_remainder() {
        assert_eq!(eval("(0-7)/2"), Ok(-3));
        assert_eq!(eval("(0-7)%2"), Ok(-1));
        assert_eq!(eval("7%(0-2)"), Ok(1));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(eval("4/0"), Err(EvalError::DivisionByZero { position: 1 }));
        assert_eq!(eval("4%(1-1)"), Err(EvalError::RemainderByZero { position: 1 }));
    }

    #[test]
    fn overflow_is_a_fault() {
        assert_eq!(eval("2147483647+1"), Err(EvalError::Overflow { position: 10 }));
        assert_eq!(eval("(0-2147483647-1)/(0-1)").unwrap_err(), EvalError::Overflow { position: 16 });
        assert_eq!(eval("(0-2147483647-1)%(0-1)").unwrap_err(), EvalError::Overflow { position: 16 });
    }

    #[test]
    fn refuses_trees_with_diagnostics() {
        assert_eq!(eval("2+"), Err(EvalError::Diagnostics { count: 1 }));
        assert_eq!(eval("2 @ 3"), Err(EvalError::Diagnostics { count: 2 }));
    }

    #[test]
    fn placeholder_operand_is_a_fault() {
        let tree = SyntaxTree::parse("2+");
        let err = Evaluator::new(&tree.root).evaluate().unwrap_err();
        assert_eq!(err, EvalError::MissingOperand { position: 2 });
        assert!(!err.is_internal());
    }

    #[test]
    fn overflowed_literal_is_a_fault() {
        let tree = SyntaxTree::parse("99999999999");
        let err = Evaluator::new(&tree.root).evaluate().unwrap_err();
        assert_eq!(err, EvalError::InvalidLiteral { position: 0 });
    }

    #[test]
    fn long_flat_chain() {
        let input = vec!["1"; 50_000].join("+");
        let tree = SyntaxTree::parse(&input);
        assert!(tree.diagnostics.is_empty());
        assert_eq!(evaluate(&tree), Ok(50_000));
    }

    #[test]
    fn long_chain_reports_first_fault() {
        let input = format!("{}/0{}", vec!["2"; 30_000].join("*"), "+1".repeat(30_000));
        assert_eq!(eval(&input), Err(EvalError::Overflow { position: 59 }));
    }

    #[test]
    fn unsupported_operator_is_internal() {
        let one = || Expression::number(Token::new(SyntaxKind::Number, 0, "1", Some(1)));
        let bogus = Expression::binary(one(), Token::new(SyntaxKind::OpenBracket, 1, "(", None), one());
        let err = Evaluator::new(&bogus).evaluate().unwrap_err();
        assert_eq!(err, EvalError::UnsupportedOperator { kind: SyntaxKind::OpenBracket });
        assert!(err.is_internal());
    }
}
