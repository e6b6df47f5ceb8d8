use crate::diagnostic::Diagnostic;
use crate::syntax::{SyntaxKind, Token};

/// Which character stands for multiplication.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Dialect {
    /// `*`
    #[default]
    Standard,
    /// `.`
    Dotted,
}

impl Dialect {
    pub fn times_char(self) -> char {
        match self {
            Self::Standard => '*',
            Self::Dotted => '.',
        }
    }
}

pub struct Lexer<'source> {
    text: &'source str,
    pos: usize,
    dialect: Dialect,
    diagnostics: Vec<Diagnostic>,
    finished: bool,
}

impl<'source> Lexer<'source> {
    pub fn new(text: &'source str) -> Self {
        Self::with_dialect(text, Dialect::Standard)
    }

    pub fn with_dialect(text: &'source str, dialect: Dialect) -> Self {
        Lexer {
            text,
            pos: 0,
            dialect,
            diagnostics: Vec::new(),
            finished: false,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn current(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'source str {
        let text = self.text;
        let start = self.pos;
        while let Some(c) = self.current() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &text[start..self.pos]
    }

    pub fn next_token(&mut self) -> Token {
        let c = match self.current() {
            Some(c) => c,
            None => return Token::new(SyntaxKind::EndOfFile, self.pos, "\0", None),
        };
        let start = self.pos;

        if c.is_ascii_digit() {
            let text = self.eat_while(|c| c.is_ascii_digit());
            let value = match text.parse::<i32>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::trace!("number literal {:?} overflows i32", text);
                    self.diagnostics.push(Diagnostic::InvalidNumber {
                        position: start,
                        text: text.to_string(),
                    });
                    None
                }
            };
            return Token::new(SyntaxKind::Number, start, text, value);
        }

        if c.is_whitespace() {
            let text = self.eat_while(char::is_whitespace);
            return Token::new(SyntaxKind::Whitespace, start, text, None);
        }

        self.pos += c.len_utf8();
        let kind = match c {
            '+' => SyntaxKind::PlusOperator,
            '-' => SyntaxKind::MinusOperator,
            c if c == self.dialect.times_char() => SyntaxKind::TimesOperator,
            '/' => SyntaxKind::SlashOperator,
            '%' => SyntaxKind::ModOperator,
            '(' => SyntaxKind::OpenBracket,
            ')' => SyntaxKind::CloseBracket,
            _ => {
                tracing::trace!("undefined character {:?} at {}", c, start);
                self.diagnostics.push(Diagnostic::UndefinedToken {
                    position: start,
                    character: c,
                });
                SyntaxKind::UndefinedToken
            }
        };
        Token::new(kind, start, &self.text[start..self.pos], None)
    }
}

/// Yields every token up to and including the first `EndOfFile`.
impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == SyntaxKind::EndOfFile {
            self.finished = true;
        }
        Some(token)
    }
}
