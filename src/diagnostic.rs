use crate::syntax::SyntaxKind;

/// A recoverable problem found while lexing or parsing a line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error("Undefined token input: '{character}'")]
    UndefinedToken { position: usize, character: char },

    #[error("The number {text} is not a valid 32-bit integer.")]
    InvalidNumber { position: usize, text: String },

    #[error("Unexpected token {actual}, expected {expected}")]
    UnexpectedToken {
        position: usize,
        actual: SyntaxKind,
        expected: SyntaxKind,
    },

    #[error("Brackets nested deeper than {limit} levels")]
    NestingTooDeep { position: usize, limit: usize },
}

impl Diagnostic {
    /// Byte offset the diagnostic refers to.
    pub fn position(&self) -> usize {
        match self {
            Self::UndefinedToken { position, .. }
            | Self::InvalidNumber { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::NestingTooDeep { position, .. } => *position,
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::UndefinedToken { .. } | Self::InvalidNumber { .. })
    }

    pub fn is_syntactic(&self) -> bool {
        !self.is_lexical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let d = Diagnostic::UndefinedToken {
            position: 2,
            character: '@',
        };
        assert_eq!(d.to_string(), "Undefined token input: '@'");
        assert!(d.is_lexical());

        let d = Diagnostic::UnexpectedToken {
            position: 2,
            actual: SyntaxKind::EndOfFile,
            expected: SyntaxKind::Number,
        };
        assert_eq!(d.to_string(), "Unexpected token EndOfFile, expected Number");
        assert!(d.is_syntactic());
        assert_eq!(d.position(), 2);

        let d = Diagnostic::InvalidNumber {
            position: 0,
            text: "99999999999".into(),
        };
        assert_eq!(
            d.to_string(),
            "The number 99999999999 is not a valid 32-bit integer."
        );

        let d = Diagnostic::NestingTooDeep {
            position: 256,
            limit: 256,
        };
        assert_eq!(d.to_string(), "Brackets nested deeper than 256 levels");
        assert!(d.is_syntactic());
    }
}
