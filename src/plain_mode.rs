use anyhow::{Context, Result};
use intcalc::session::{Outcome, Session, HELP_LINES};
use std::io::{self, BufRead, Write};

const PROMPT: &str = "lc> ";

/// ANSI "erase display" followed by "cursor home".
#[cfg(not(feature = "tui"))]
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[cfg(feature = "tui")]
fn clear_screen(out: &mut impl Write) -> io::Result<()> {
    use crossterm::{cursor::MoveTo, queue, terminal::{Clear, ClearType}};
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))
}

#[cfg(not(feature = "tui"))]
fn clear_screen(out: &mut impl Write) -> io::Result<()> {
    write!(out, "{}", CLEAR_SCREEN)
}

pub fn run_plain(session: Session) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    repl(session, stdin.lock(), stdout.lock())
}

pub fn repl(mut session: Session, mut input: impl BufRead, mut out: impl Write) -> Result<()> {
    writeln!(out, "Integer calculator, version {}", env!("CARGO_PKG_VERSION"))?;
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("failed to read input")?;
        if read == 0 {
            return Ok(());
        }

        match session.submit(&line) {
            Outcome::Quit => return Ok(()),
            Outcome::TreeToggled(enabled) => writeln!(out, "{}", Outcome::tree_toggle_message(enabled))?,
            Outcome::Clear => clear_screen(&mut out)?,
            Outcome::Help => {
                for line in HELP_LINES {
                    writeln!(out, "{}", line)?;
                }
            }
            Outcome::Report(report) => {
                for line in report.tree.iter().flatten().chain(&report.message_lines()) {
                    writeln!(out, "{}", line)?;
                }
            }
        }
    }
}
