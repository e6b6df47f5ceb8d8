//! Per-line command handling shared by every front end.

use crate::diagnostic::Diagnostic;
use crate::display::TreeDisplay;
use crate::evaluator::{self, EvalError};
use crate::lexer::Dialect;
use crate::syntax::SyntaxTree;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    ToggleTree,
    Clear,
    Help,
    Evaluate(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let input = line.trim();
        if input.is_empty() {
            return Self::Quit;
        }
        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => Self::Quit,
            "#showtree" => Self::ToggleTree,
            "#clear" | "#cls" | "clear" => Self::Clear,
            "help" => Self::Help,
            // Leading whitespace stays so positions match the typed line.
            _ => Self::Evaluate(line.trim_end()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Value(i32),
    Diagnostics(Vec<Diagnostic>),
    Fault(EvalError),
}

/// Everything a front end needs to show for one evaluated line.
#[derive(Debug, Clone)]
pub struct Report {
    pub input: String,
    pub tree: Option<Vec<String>>,
    pub verdict: Verdict,
    pub duration: Duration,
}

impl Report {
    pub fn is_success(&self) -> bool {
        matches!(self.verdict, Verdict::Value(..))
    }

    /// Result or error lines, without the tree.
    pub fn message_lines(&self) -> Vec<String> {
        match &self.verdict {
            Verdict::Value(v) => vec![v.to_string()],
            Verdict::Diagnostics(diagnostics) => diagnostics.iter().map(ToString::to_string).collect(),
            Verdict::Fault(err) => vec![format!("Error: {}", err)],
        }
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Quit,
    TreeToggled(bool),
    Clear,
    Help,
    Report(Report),
}

impl Outcome {
    pub fn tree_toggle_message(enabled: bool) -> &'static str {
        if enabled {
            "Parse tree viewing enabled."
        } else {
            "Parse tree viewing disabled."
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub dialect: Dialect,
    pub show_tree: bool,
}

impl Session {
    pub fn new(dialect: Dialect, show_tree: bool) -> Self {
        Session { dialect, show_tree }
    }

    pub fn submit(&mut self, line: &str) -> Outcome {
        match Command::parse(line) {
            Command::Quit => Outcome::Quit,
            Command::ToggleTree => {
                self.show_tree = !self.show_tree;
                tracing::debug!("show_tree = {}", self.show_tree);
                Outcome::TreeToggled(self.show_tree)
            }
            Command::Clear => Outcome::Clear,
            Command::Help => Outcome::Help,
            Command::Evaluate(input) => Outcome::Report(self.run(input)),
        }
    }

    /// Runs the pipeline on one expression.
    pub fn run(&self, input: &str) -> Report {
        let start_time = Instant::now();
        let syntax_tree = SyntaxTree::parse_with(input, self.dialect);
        let tree = self
            .show_tree
            .then(|| TreeDisplay::new(&syntax_tree.root).lines());

        let verdict = if syntax_tree.has_diagnostics() {
            Verdict::Diagnostics(syntax_tree.diagnostics.clone())
        } else {
            match evaluator::evaluate(&syntax_tree) {
                Ok(value) => Verdict::Value(value),
                Err(err) => {
                    if err.is_internal() {
                        tracing::error!("internal evaluation failure on {:?}: {}", input, err);
                    }
                    Verdict::Fault(err)
                }
            }
        };
        let duration = start_time.elapsed();
        tracing::debug!("evaluated {:?} in {:?}", input, duration);

        Report {
            input: input.to_string(),
            tree,
            verdict,
            duration,
        }
    }
}

pub const HELP_LINES: &[&str] = &[
    "Integer calculator",
    "",
    "Operators:",
    "  + : Addition        (e.g., 5 + 3 = 8)",
    "  - : Subtraction     (e.g., 10 - 4 = 6)",
    "  * : Multiplication  (e.g., 6 * 7 = 42, '.' in the dotted dialect)",
    "  / : Division        (e.g., 15 / 4 = 3, truncating)",
    "  % : Remainder       (e.g., 10 % 3 = 1)",
    "  ( ) : Grouping      (e.g., (2 + 3) * 4 = 20)",
    "",
    "Commands:",
    "  #showTree : Toggle parse tree display",
    "  #clear, #cls : Clear the screen",
    "  help : Show this help",
    "  quit, or an empty line : Exit",
];
