//! Line sources for the session: an interactive terminal or a fixed script.

use std::collections::VecDeque;
use std::io;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::error::{CasError, Result};

/// One answer from a line source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// The user pressed Ctrl-C.
    Interrupted,
    /// Input is exhausted (Ctrl-D or closed stdin).
    Eof,
}

pub trait LineSource {
    /// Show `prompt` and wait for one line.
    fn read_line(&mut self, prompt: &str) -> Input;
}

/// Line editor on the controlling terminal. History lives only for the process.
pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(readline_error)?;
        Ok(Self { editor })
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str) -> Input {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        debug!(error = %err, "could not record history entry");
                    }
                }
                Input::Line(line)
            }
            Err(ReadlineError::Interrupted) => Input::Interrupted,
            Err(ReadlineError::Eof) => Input::Eof,
            Err(err) => {
                warn!(error = %err, "failed to read input, ending session");
                Input::Eof
            }
        }
    }
}

fn readline_error(err: ReadlineError) -> CasError {
    match err {
        ReadlineError::Io(err) => CasError::Io(err),
        other => CasError::Io(io::Error::other(other.to_string())),
    }
}

/// Replays a fixed list of answers, then reports end of input.
///
/// Prompts are recorded so callers can check what the user would have been asked.
#[derive(Debug, Default, Clone)]
pub struct Scripted {
    inputs: VecDeque<Input>,
    pub prompts: Vec<String>,
}

impl Scripted {
    pub fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self::from_inputs(lines.into_iter().map(|l| Input::Line(l.into())))
    }

    pub fn from_inputs(inputs: impl IntoIterator<Item = Input>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
            prompts: Vec::new(),
        }
    }
}

impl LineSource for Scripted {
    fn read_line(&mut self, prompt: &str) -> Input {
        self.prompts.push(prompt.to_string());
        self.inputs.pop_front().unwrap_or(Input::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_replays_then_ends() {
        let mut source = Scripted::new(["help", "quit"]);
        assert_eq!(source.read_line("> "), Input::Line("help".into()));
        assert_eq!(source.read_line("> "), Input::Line("quit".into()));
        assert_eq!(source.read_line("> "), Input::Eof);
        assert_eq!(source.prompts.len(), 3);
    }

    #[test]
    fn scripted_can_interrupt() {
        let mut source = Scripted::from_inputs([Input::Interrupted]);
        assert_eq!(source.read_line("> "), Input::Interrupted);
    }
}
