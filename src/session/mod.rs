//! The interactive command loop.

pub mod input;
pub mod solve;
pub mod text;

use std::io::Write;

use tracing::debug;

use crate::config::Config;
use crate::engine::SymbolicEngine;
use crate::error::Result;

pub use input::{Input, LineSource, Scripted, Terminal};
pub use solve::solve;
pub use text::{EXAMPLES, Example};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    Interrupted,
    EndOfInput,
}

/// A command typed at the main prompt. Keywords are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    Help,
    Examples,
    Solve(&'a str),
}

impl<'a> Command<'a> {
    /// `None` for blank lines.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let lowered = line.to_lowercase();
        let command = if text::QUIT_WORDS.contains(&lowered.as_str()) {
            Command::Quit
        } else if lowered == text::HELP_WORD {
            Command::Help
        } else if lowered == text::EXAMPLES_WORD {
            Command::Examples
        } else {
            Command::Solve(line)
        };
        Some(command)
    }
}

enum MenuOutcome {
    Chosen(&'static Example),
    Skipped,
    Ended(Exit),
}

pub struct Session<E, S, W> {
    engine: E,
    input: S,
    out: W,
    variable: String,
}

impl<E, S, W> Session<E, S, W>
where
    E: SymbolicEngine,
    S: LineSource,
    W: Write,
{
    pub fn new(engine: E, input: S, out: W, config: &Config) -> Self {
        Self {
            engine,
            input,
            out,
            variable: config.variable.clone(),
        }
    }

    /// Run until the user quits, interrupts or input runs out.
    pub fn run(&mut self) -> Result<Exit> {
        text::write_header(&mut self.out)?;
        loop {
            self.out.flush()?;
            let line = match self.input.read_line(text::PROMPT) {
                Input::Line(line) => line,
                Input::Interrupted => return self.finish(Exit::Interrupted),
                Input::Eof => return self.finish(Exit::EndOfInput),
            };
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            debug!(?command, "command");
            match command {
                Command::Quit => return self.finish(Exit::Quit),
                Command::Help => text::write_help(&mut self.out)?,
                Command::Examples => match self.choose_example()? {
                    MenuOutcome::Chosen(example) => self.solve(example.expr)?,
                    MenuOutcome::Skipped => {}
                    MenuOutcome::Ended(exit) => return self.finish(exit),
                },
                Command::Solve(integrand) => self.solve(integrand)?,
            }
        }
    }

    pub fn into_parts(self) -> (E, S, W) {
        (self.engine, self.input, self.out)
    }

    fn solve(&mut self, integrand: &str) -> Result<()> {
        solve(&self.engine, integrand, &self.variable, &mut self.out)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn choose_example(&mut self) -> Result<MenuOutcome> {
        text::write_menu(&mut self.out)?;
        writeln!(self.out)?;
        self.out.flush()?;
        let outcome = match self.input.read_line(text::MENU_PROMPT) {
            Input::Line(choice) => match text::select_example(&choice) {
                Some(example) => MenuOutcome::Chosen(example),
                None => MenuOutcome::Skipped,
            },
            Input::Interrupted => MenuOutcome::Ended(Exit::Interrupted),
            Input::Eof => MenuOutcome::Ended(Exit::EndOfInput),
        };
        Ok(outcome)
    }

    fn finish(&mut self, exit: Exit) -> Result<Exit> {
        match exit {
            Exit::Interrupted => writeln!(self.out, "\n\n{}", text::INTERRUPT_FAREWELL)?,
            Exit::Quit | Exit::EndOfInput => writeln!(self.out, "\n{}", text::FAREWELL)?,
        }
        self.out.flush()?;
        debug!(?exit, "session ended");
        Ok(exit)
    }
}
