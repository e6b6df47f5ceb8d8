use intcalc::Dialect;
use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "intcalc", version, about = "Integer arithmetic calculator")]
pub struct Args {
    /// Evaluate this expression once and exit.
    pub expression: Option<String>,

    #[arg(long, value_enum, default_value_t = DialectArg::Standard)]
    pub dialect: DialectArg,

    /// Start with parse tree display enabled.
    #[arg(long)]
    pub show_tree: bool,

    #[arg(long, value_enum, default_value_t = Mode::default())]
    pub mode: Mode,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    Standard,
    /// `.` is multiplication.
    Dotted,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Standard => Dialect::Standard,
            DialectArg::Dotted => Dialect::Dotted,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Read lines from stdin.
    Plain,
    /// Raw-mode line editor with history.
    Line,
    /// Full-screen terminal UI.
    Tui,
}

impl Default for Mode {
    fn default() -> Self {
        if cfg!(feature = "tui") {
            Self::Tui
        } else if cfg!(feature = "line") {
            Self::Line
        } else {
            Self::Plain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["intcalc"]).unwrap();
        assert_eq!(args.expression, None);
        assert_eq!(args.dialect, DialectArg::Standard);
        assert!(!args.show_tree);
        assert_eq!(args.mode, Mode::default());
    }

    #[test]
    fn one_shot_with_options() {
        let args =
            Args::try_parse_from(["intcalc", "--dialect", "dotted", "--show-tree", "--mode", "plain", "2.3"])
                .unwrap();
        assert_eq!(args.expression.as_deref(), Some("2.3"));
        assert_eq!(Dialect::from(args.dialect), Dialect::Dotted);
        assert!(args.show_tree);
        assert_eq!(args.mode, Mode::Plain);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Args::try_parse_from(["intcalc", "--mode", "gui"]).is_err());
    }
}
