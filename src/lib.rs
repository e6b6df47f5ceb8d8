//! Integer arithmetic calculator: lexer, recursive descent parser and
//! tree-walking evaluator over `+ - * / %` and brackets.

pub mod diagnostic;
pub mod display;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod session;
pub mod syntax;

pub use crate::{
    diagnostic::Diagnostic,
    evaluator::{evaluate, EvalError, Evaluator},
    lexer::{Dialect, Lexer},
    parser::Parser,
    syntax::{Expression, SyntaxKind, SyntaxNode, SyntaxTree, Token},
};
