mod config;
#[cfg(feature = "line")]
mod line_mode;
mod plain_mode;
#[cfg(feature = "tui")]
mod render_help;
#[cfg(feature = "tui")]
mod tui_mode;

use anyhow::{bail, Result};
use clap::Parser as _;
use config::{Args, Mode};
use intcalc::session::{Session, Verdict};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    tracing::debug!("{:?}", args);
    let session = Session::new(args.dialect.into(), args.show_tree);

    if let Some(expression) = &args.expression {
        return Ok(run_once(&session, expression));
    }

    match args.mode {
        Mode::Plain => plain_mode::run_plain(session)?,
        #[cfg(feature = "line")]
        Mode::Line => line_mode::run_line(session)?,
        #[cfg(feature = "tui")]
        Mode::Tui => tui_mode::run_tui(session)?,
        #[allow(unreachable_patterns)]
        mode => bail!("mode {:?} is not available in this build", mode),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_once(session: &Session, expression: &str) -> ExitCode {
    let report = session.run(expression);
    if let Some(tree) = &report.tree {
        for line in tree {
            println!("{}", line);
        }
    }
    for line in report.message_lines() {
        match report.verdict {
            Verdict::Value(..) => println!("{}", line),
            _ => eprintln!("{}", line),
        }
    }
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
