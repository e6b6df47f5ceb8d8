use crate::diagnostic::Diagnostic;
use crate::lexer::{Dialect, Lexer};
use crate::syntax::{Expression, SyntaxKind, SyntaxTree, Token};

/// Recursive descent parser over an eagerly lexed token buffer.
///
/// ```text
/// term    := factor (('+' | '-') factor)*
/// factor  := primary (('*' | '/' | '%') primary)*
/// primary := '(' term ')' | NUMBER
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
    diagnostics: Vec<Diagnostic>,
}

/// Deepest bracket nesting parsed into a tree; anything below is skipped.
pub const MAX_NESTING: usize = 256;

impl Parser {
    pub fn new(text: &str, dialect: Dialect) -> Self {
        let mut lexer = Lexer::with_dialect(text, dialect);
        let tokens: Vec<Token> = lexer.by_ref().filter(|t| !t.kind.is_trivia()).collect();
        Parser {
            tokens,
            current: 0,
            depth: 0,
            diagnostics: lexer.into_diagnostics(),
        }
    }

    pub fn parse(mut self) -> SyntaxTree {
        let span = tracing::trace_span!("parse");
        let _entered = span.enter();

        let root = self.term();
        let end_of_file = self.check(SyntaxKind::EndOfFile);
        tracing::trace!("accepted: diagnostics = {}", self.diagnostics.len());
        SyntaxTree {
            diagnostics: self.diagnostics,
            root,
            end_of_file,
        }
    }

    // The buffer always ends with the EndOfFile token.
    fn look_ahead(&self, offset: usize) -> &Token {
        let index = (self.current + offset).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn peek(&self) -> &Token {
        self.look_ahead(0)
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        self.current += 1;
        tracing::trace!("shift {:?}", token.kind);
        token
    }

    fn check(&mut self, kind: SyntaxKind) -> Token {
        if self.peek().kind == kind {
            return self.bump();
        }
        let actual = self.peek();
        tracing::trace!("expected {:?}, found {:?}", kind, actual.kind);
        let diagnostic = Diagnostic::UnexpectedToken {
            position: actual.position,
            actual: actual.kind,
            expected: kind,
        };
        let placeholder = Token::missing(kind, actual.position);
        self.diagnostics.push(diagnostic);
        placeholder
    }

    fn term(&mut self) -> Expression {
        let mut left = self.factor();
        while self.peek().kind.is_additive() {
            let operator = self.bump();
            let right = self.factor();
            tracing::trace!("reduce: term -> term {:?} factor", operator.kind);
            left = Expression::binary(left, operator, right);
        }
        left
    }

    fn factor(&mut self) -> Expression {
        let mut left = self.primary();
        while self.peek().kind.is_multiplicative() {
            let operator = self.bump();
            let right = self.primary();
            tracing::trace!("reduce: factor -> factor {:?} primary", operator.kind);
            left = Expression::binary(left, operator, right);
        }
        left
    }

    fn primary(&mut self) -> Expression {
        if self.peek().kind == SyntaxKind::OpenBracket {
            if self.depth >= MAX_NESTING {
                return self.skip_nested();
            }
            let open = self.bump();
            self.depth += 1;
            let expression = self.term();
            self.depth -= 1;
            let close = self.check(SyntaxKind::CloseBracket);
            tracing::trace!("reduce: primary -> `(' term `)'");
            return Expression::brackets(open, expression, close);
        }
        let number = self.check(SyntaxKind::Number);
        Expression::number(number)
    }

    // Consumes a too-deep bracket group up to its matching close bracket (or
    // end of input) and stands a missing number in for it.
    fn skip_nested(&mut self) -> Expression {
        let open = self.bump();
        tracing::trace!("nesting limit reached at {}", open.position);
        self.diagnostics.push(Diagnostic::NestingTooDeep {
            position: open.position,
            limit: MAX_NESTING,
        });

        let mut depth = 1;
        while depth > 0 {
            match self.peek().kind {
                SyntaxKind::EndOfFile => break,
                SyntaxKind::OpenBracket => depth += 1,
                SyntaxKind::CloseBracket => depth -= 1,
                _ => {}
            }
            self.bump();
        }
        Expression::number(Token::missing(SyntaxKind::Number, open.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> SyntaxTree {
        SyntaxTree::parse(input)
    }

    #[test]
    fn precedence() {
        assert_eq!(parse("2+3*4").root.to_string(), "(+ 2 (* 3 4))");
        assert_eq!(parse("(2+3)*4").root.to_string(), "(* (+ 2 3) 4)");
        assert_eq!(parse("8/4%3").root.to_string(), "(% (/ 8 4) 3)");
    }

    #[test]
    fn left_associative() {
        assert_eq!(parse("9-5-2").root.to_string(), "(- (- 9 5) 2)");
        assert_eq!(parse("1+2-3+4").root.to_string(), "(+ (- (+ 1 2) 3) 4)");
    }

    #[test]
    fn whitespace_and_undefined_are_filtered() {
        let tree = parse(" 2 @ 3 ");
        assert_eq!(
            tree.diagnostics,
            [
                Diagnostic::UndefinedToken {
                    position: 3,
                    character: '@'
                },
                Diagnostic::UnexpectedToken {
                    position: 5,
                    actual: SyntaxKind::Number,
                    expected: SyntaxKind::EndOfFile
                },
            ]
        );
        assert_eq!(tree.root.to_string(), "2");
    }

    #[test]
    fn dangling_operator_synthesizes_missing_number() {
        let tree = parse("2+");
        assert_eq!(
            tree.diagnostics,
            [Diagnostic::UnexpectedToken {
                position: 2,
                actual: SyntaxKind::EndOfFile,
                expected: SyntaxKind::Number
            }]
        );
        match &tree.root {
            Expression::Binary(b) => match &*b.right {
                Expression::Number(n) => {
                    assert!(n.number.is_missing());
                    assert_eq!(n.number.position, 2);
                }
                other => panic!("unexpected right operand {:?}", other),
            },
            other => panic!("unexpected root {:?}", other),
        }
        assert_eq!(tree.end_of_file.kind, SyntaxKind::EndOfFile);
        assert!(!tree.end_of_file.is_missing());
    }

    #[test]
    fn unclosed_bracket() {
        let tree = parse("(1+2");
        assert_eq!(
            tree.diagnostics,
            [Diagnostic::UnexpectedToken {
                position: 4,
                actual: SyntaxKind::EndOfFile,
                expected: SyntaxKind::CloseBracket
            }]
        );
        assert_eq!(tree.root.kind(), SyntaxKind::BracketedExpression);
    }

    #[test]
    fn trailing_tokens_yield_placeholder_end_of_file() {
        let tree = parse("1)");
        assert_eq!(
            tree.diagnostics,
            [Diagnostic::UnexpectedToken {
                position: 1,
                actual: SyntaxKind::CloseBracket,
                expected: SyntaxKind::EndOfFile
            }]
        );
        assert!(tree.end_of_file.is_missing());
    }

    #[test]
    fn one_line_can_report_many_problems() {
        let tree = parse("*)");
        assert_eq!(tree.diagnostics.len(), 3);
        assert!(tree.diagnostics.iter().all(Diagnostic::is_syntactic));
    }

    #[test]
    fn lexical_diagnostics_come_first() {
        let tree = parse("+ #");
        assert!(tree.diagnostics[0].is_lexical());
        assert!(tree.diagnostics[1..].iter().all(Diagnostic::is_syntactic));
    }

    #[test]
    fn empty_line() {
        let tree = parse("");
        assert_eq!(tree.diagnostics.len(), 1);
        assert_eq!(tree.root.kind(), SyntaxKind::NumberExpression);
    }

    #[test]
    fn nesting_at_the_limit_parses() {
        let input = format!("{}1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        let tree = parse(&input);
        assert!(tree.diagnostics.is_empty());
        assert_eq!(tree.root.to_string(), "1");
    }

    #[test]
    fn nesting_past_the_limit_is_skipped() {
        let input = format!("{}1{}+2", "(".repeat(20_000), ")".repeat(20_000));
        let tree = parse(&input);
        assert_eq!(
            tree.diagnostics,
            [Diagnostic::NestingTooDeep {
                position: MAX_NESTING,
                limit: MAX_NESTING
            }]
        );
        assert_eq!(tree.root.kind(), SyntaxKind::BinaryExpression);
        assert!(!tree.end_of_file.is_missing());
    }

    #[test]
    fn unclosed_deep_nesting_stops_at_end_of_input() {
        let tree = parse(&"(".repeat(1_000));
        assert_eq!(tree.diagnostics[0].position(), MAX_NESTING);
        assert!(tree.diagnostics[1..].iter().all(|d| matches!(
            d,
            Diagnostic::UnexpectedToken {
                expected: SyntaxKind::CloseBracket,
                ..
            }
        )));
        assert_eq!(tree.diagnostics.len(), MAX_NESTING + 1);
    }

    #[test]
    fn dotted_dialect() {
        let tree = SyntaxTree::parse_with("2.(3+1)", Dialect::Dotted);
        assert!(tree.diagnostics.is_empty());
        assert_eq!(tree.root.to_string(), "(* 2 (+ 3 1))");
    }
}
