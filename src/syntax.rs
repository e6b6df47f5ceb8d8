//! Syntax definition.

use crate::diagnostic::Diagnostic;
use std::{fmt, mem};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Number,
    Whitespace,
    PlusOperator,
    MinusOperator,
    TimesOperator,
    SlashOperator,
    ModOperator,
    OpenBracket,
    CloseBracket,
    UndefinedToken,
    EndOfFile,
    NumberExpression,
    BinaryExpression,
    BracketedExpression,
}

impl SyntaxKind {
    pub fn is_additive(self) -> bool {
        matches!(self, Self::PlusOperator | Self::MinusOperator)
    }

    pub fn is_multiplicative(self) -> bool {
        matches!(self, Self::TimesOperator | Self::SlashOperator | Self::ModOperator)
    }

    /// Whitespace and undefined tokens never reach the parser.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::UndefinedToken)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    /// Byte offset into the source line.
    pub position: usize,
    /// `None` for tokens synthesized while recovering from a syntax error.
    pub text: Option<String>,
    /// Decoded integer, only ever present on `Number` tokens.
    pub value: Option<i32>,
}

impl Token {
    pub fn new(kind: SyntaxKind, position: usize, text: impl Into<String>, value: Option<i32>) -> Self {
        Token {
            kind,
            position,
            text: Some(text.into()),
            value,
        }
    }

    pub fn missing(kind: SyntaxKind, position: usize) -> Self {
        Token {
            kind,
            position,
            text: None,
            value: None,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.text.is_none()
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberExpression {
    pub number: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketedExpression {
    pub open: Token,
    pub expression: Box<Expression>,
    pub close: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Number(NumberExpression),
    Binary(BinaryExpression),
    Brackets(BracketedExpression),
}

impl Expression {
    pub fn number(number: Token) -> Self {
        Self::Number(NumberExpression { number })
    }

    pub fn binary(left: Expression, operator: Token, right: Expression) -> Self {
        Self::Binary(BinaryExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    pub fn brackets(open: Token, expression: Expression, close: Token) -> Self {
        Self::Brackets(BracketedExpression {
            open,
            expression: Box::new(expression),
            close,
        })
    }

    pub fn kind(&self) -> SyntaxKind {
        self.as_node().kind()
    }

    pub fn as_node(&self) -> SyntaxNode<'_> {
        match self {
            Self::Number(n) => SyntaxNode::Number(n),
            Self::Binary(b) => SyntaxNode::Binary(b),
            Self::Brackets(p) => SyntaxNode::Brackets(p),
        }
    }

    fn detach_children(&mut self, pending: &mut Vec<Box<Expression>>) {
        let mut detach = |slot: &mut Box<Expression>| {
            if !matches!(**slot, Self::Number(..)) {
                let leaf = Box::new(Self::number(Token::missing(SyntaxKind::Number, 0)));
                pending.push(mem::replace(slot, leaf));
            }
        };
        match self {
            Self::Number(..) => {}
            Self::Binary(b) => {
                detach(&mut b.left);
                detach(&mut b.right);
            }
            Self::Brackets(p) => detach(&mut p.expression),
        }
    }
}

// Long operator chains nest as deep as they are long; unlink them bottom-up
// instead of letting the default drop recurse.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut child) = pending.pop() {
            child.detach_children(&mut pending);
        }
    }
}

/// Borrowed view over any node of a tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyntaxNode<'a> {
    Token(&'a Token),
    Number(&'a NumberExpression),
    Binary(&'a BinaryExpression),
    Brackets(&'a BracketedExpression),
}

impl<'a> SyntaxNode<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Self::Token(t) => t.kind,
            Self::Number(..) => SyntaxKind::NumberExpression,
            Self::Binary(..) => SyntaxKind::BinaryExpression,
            Self::Brackets(..) => SyntaxKind::BracketedExpression,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<SyntaxNode<'a>> {
        match *self {
            Self::Token(..) => vec![],
            Self::Number(n) => vec![SyntaxNode::Token(&n.number)],
            Self::Binary(b) => vec![
                b.left.as_node(),
                SyntaxNode::Token(&b.operator),
                b.right.as_node(),
            ],
            Self::Brackets(p) => vec![
                SyntaxNode::Token(&p.open),
                p.expression.as_node(),
                SyntaxNode::Token(&p.close),
            ],
        }
    }
}

impl<'a> From<&'a Token> for SyntaxNode<'a> {
    fn from(token: &'a Token) -> Self {
        Self::Token(token)
    }
}

impl<'a> From<&'a Expression> for SyntaxNode<'a> {
    fn from(expr: &'a Expression) -> Self {
        expr.as_node()
    }
}

/// Result of parsing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    pub diagnostics: Vec<Diagnostic>,
    pub root: Expression,
    pub end_of_file: Token,
}

impl SyntaxTree {
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, crate::lexer::Dialect::Standard)
    }

    pub fn parse_with(text: &str, dialect: crate::lexer::Dialect) -> Self {
        crate::parser::Parser::new(text, dialect).parse()
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

fn operator_symbol(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::PlusOperator => "+",
        SyntaxKind::MinusOperator => "-",
        SyntaxKind::TimesOperator => "*",
        SyntaxKind::SlashOperator => "/",
        SyntaxKind::ModOperator => "%",
        _ => "?",
    }
}

enum Piece<'a> {
    Node(&'a Expression),
    Text(&'static str),
}

/// Prefix form, e.g. `(+ 1 (* 2 3))`; brackets are implied by the nesting.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Piece::Node(self)];
        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Node(Self::Number(n)) => match n.number.value {
                    Some(v) => write!(f, "{}", v)?,
                    None => f.write_str("<missing>")?,
                },
                Piece::Node(Self::Binary(b)) => {
                    write!(f, "({} ", operator_symbol(b.operator.kind))?;
                    stack.push(Piece::Text(")"));
                    stack.push(Piece::Node(&b.right));
                    stack.push(Piece::Text(" "));
                    stack.push(Piece::Node(&b.left));
                }
                Piece::Node(Self::Brackets(p)) => stack.push(Piece::Node(&p.expression)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn binary_children_are_left_operator_right() {
        let tree = SyntaxTree::parse("1+2");
        let kinds: Vec<_> = tree.root.as_node().children().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            [
                SyntaxKind::NumberExpression,
                SyntaxKind::PlusOperator,
                SyntaxKind::NumberExpression
            ]
        );
    }

    #[test]
    fn bracket_children_wrap_inner_expression() {
        let tree = SyntaxTree::parse("(7)");
        let children = tree.root.as_node().children();
        let kinds: Vec<_> = children.iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            [
                SyntaxKind::OpenBracket,
                SyntaxKind::NumberExpression,
                SyntaxKind::CloseBracket
            ]
        );
        assert!(children[0].children().is_empty());
    }

    #[test]
    fn number_expression_has_single_token_child() {
        let tree = SyntaxTree::parse("42");
        let children = tree.root.as_node().children();
        assert_eq!(children.len(), 1);
        match children[0] {
            SyntaxNode::Token(t) => assert_eq!(t.value, Some(42)),
            other => panic!("unexpected child {:?}", other),
        }
    }

    #[test]
    fn missing_token_has_no_text() {
        let token = Token::missing(SyntaxKind::Number, 3);
        assert!(token.is_missing());
        assert_eq!(token.text(), "");
        assert_eq!(token.value, None);
    }

    #[test]
    fn kind_display_matches_identifier() {
        assert_eq!(SyntaxKind::BracketedExpression.to_string(), "BracketedExpression");
        assert_eq!(SyntaxKind::EndOfFile.to_string(), "EndOfFile");
    }

    #[test]
    fn expression_display_is_prefix_form() {
        let tree = SyntaxTree::parse("1+2*(3-4)");
        assert_eq!(tree.root.to_string(), "(+ 1 (* 2 (- 3 4)))");
    }

    #[test]
    fn long_chain_displays_and_drops() {
        let tree = SyntaxTree::parse(&vec!["1"; 50_000].join("-"));
        let text = tree.root.to_string();
        assert!(text.starts_with("(- (- (- "));
        assert!(text.ends_with(" 1) 1) 1)"));
        drop(tree);
    }

    #[test]
    fn dropping_keeps_nothing_behind() {
        let mut expr = SyntaxTree::parse("(1+2)*3").root;
        let mut pending = Vec::new();
        expr.detach_children(&mut pending);
        assert_eq!(pending.len(), 1);
        assert_eq!(expr.to_string(), "(* <missing> 3)");
    }
}
