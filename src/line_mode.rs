use anyhow::{Context, Result};
use intcalc::session::{Outcome, Report, Session, HELP_LINES};
use std::io::{stdin, stdout, Write};
use termion::{
    clear::{All as ClearAll, CurrentLine as ClearLine},
    color,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::TermRead,
    raw::IntoRawMode,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "lc> ";

/// Byte offset of the `index`-th grapheme cluster.
fn grapheme_to_byte_index(s: &str, index: usize) -> usize {
    s.grapheme_indices(true)
        .nth(index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

fn remove_grapheme(s: &mut String, index: usize) {
    let start = grapheme_to_byte_index(s, index);
    let end = grapheme_to_byte_index(s, index + 1);
    s.drain(start..end);
}

pub fn run_line(mut session: Session) -> Result<()> {
    println!("Integer calculator, version {}", env!("CARGO_PKG_VERSION"));
    println!("Navigation: ←/→, Backspace/Delete, Home/End, ↑/↓ for history");
    println!("Commands: '#showTree', '#clear', 'help', empty line or 'quit' to exit\n");

    let mut stdout = stdout().into_raw_mode().context("failed to enter raw mode")?;
    let mut history: Vec<String> = Vec::new();
    let mut history_index = 0;
    let mut keys = stdin().keys();

    loop {
        let mut expression = String::new();
        let mut cursor_pos = 0;
        write!(stdout, "\r{}{}", ClearLine, PROMPT)?;
        stdout.flush()?;
        let (_, row) = stdout.cursor_pos()?;

        loop {
            let byte_pos = grapheme_to_byte_index(&expression, cursor_pos);
            let column = 1 + PROMPT.len() + expression[..byte_pos].width();
            write!(
                stdout,
                "{}{}{}{}{}",
                Goto(1, row),
                ClearLine,
                PROMPT,
                expression,
                Goto(column as u16, row)
            )?;
            stdout.flush()?;

            let key = match keys.next() {
                Some(key) => key?,
                None => return Ok(()),
            };
            match key {
                Key::Char('\n') => break,
                Key::Ctrl('c') | Key::Ctrl('d') => {
                    write!(stdout, "\r\n")?;
                    return Ok(());
                }
                Key::Ctrl('u') => {
                    expression.clear();
                    cursor_pos = 0;
                }
                Key::Char(c) => {
                    let byte_idx = grapheme_to_byte_index(&expression, cursor_pos);
                    expression.insert(byte_idx, c);
                    cursor_pos = (cursor_pos + 1).min(grapheme_count(&expression));
                }
                Key::Backspace if cursor_pos > 0 => {
                    cursor_pos -= 1;
                    remove_grapheme(&mut expression, cursor_pos);
                }
                Key::Delete if cursor_pos < grapheme_count(&expression) => {
                    remove_grapheme(&mut expression, cursor_pos);
                }
                Key::Left if cursor_pos > 0 => cursor_pos -= 1,
                Key::Right if cursor_pos < grapheme_count(&expression) => cursor_pos += 1,
                Key::Home => cursor_pos = 0,
                Key::End => cursor_pos = grapheme_count(&expression),
                Key::Up => {
                    if history_index > 0 {
                        history_index -= 1;
                        expression = history[history_index].clone();
                        cursor_pos = grapheme_count(&expression);
                    }
                }
                Key::Down => {
                    if history_index < history.len().saturating_sub(1) {
                        history_index += 1;
                        expression = history[history_index].clone();
                        cursor_pos = grapheme_count(&expression);
                    } else {
                        history_index = history.len();
                        expression.clear();
                        cursor_pos = 0;
                    }
                }
                _ => {}
            }
        }
        write!(stdout, "\r\n")?;

        let outcome = session.submit(&expression);
        if !expression.trim().is_empty() {
            history.push(expression.trim().to_string());
            history_index = history.len();
        }

        match outcome {
            Outcome::Quit => return Ok(()),
            Outcome::TreeToggled(enabled) => {
                write!(stdout, "{}\r\n", Outcome::tree_toggle_message(enabled))?;
            }
            Outcome::Clear => {
                write!(stdout, "{}{}", ClearAll, Goto(1, 1))?;
                history.clear();
                history_index = 0;
            }
            Outcome::Help => {
                for line in HELP_LINES {
                    write!(stdout, "{}\r\n", line)?;
                }
            }
            Outcome::Report(report) => write_report(&mut stdout, &report)?,
        }
    }
}

fn write_report(out: &mut impl Write, report: &Report) -> Result<()> {
    if let Some(tree) = &report.tree {
        write!(out, "{}", color::Fg(color::Cyan))?;
        for line in tree {
            write!(out, "{}\r\n", line)?;
        }
        write!(out, "{}", color::Fg(color::Reset))?;
    }

    if report.is_success() {
        for line in report.message_lines() {
            write!(out, "{}\r\n", line)?;
        }
    } else {
        write!(out, "{}", color::Fg(color::Red))?;
        for line in report.message_lines() {
            write!(out, "{}\r\n", line)?;
        }
        write!(out, "{}", color::Fg(color::Reset))?;
    }
    Ok(())
}
