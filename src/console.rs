//! Terminal input and output behind one seam.
//!
//! Everything the shell says or hears goes through [`Console`]. The session
//! loop and any foreground app share the one console instance, which is what
//! keeps input ownership unambiguous: whoever currently holds the `&mut`
//! is the only reader. [`StdConsole`] is the interactive implementation on
//! top of rustyline; [`MemConsole`] replays a scripted session for tests.

use anyhow::Context;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::collections::VecDeque;
use std::io::{self, Write};

/// One read from the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A full line, without the trailing newline.
    Line(String),
    /// Ctrl-C while reading.
    Interrupted,
    /// Ctrl-D (or the script ran dry).
    Eof,
}

/// The terminal as the shell sees it.
pub trait Console {
    /// Show `prompt` and block for one line of input.
    ///
    /// Ctrl-C and Ctrl-D are ordinary values here, not errors; `Err` is
    /// reserved for the terminal itself failing.
    fn read_line(&mut self, prompt: &str) -> io::Result<Input>;

    /// Write one line of normal output.
    fn print_line(&mut self, text: &str) -> io::Result<()>;

    /// Write one line of error output. Rendering may differ from
    /// [`Console::print_line`] (color), the stream does not.
    fn print_error(&mut self, text: &str) -> io::Result<()>;

    /// Clear the visible screen.
    fn clear_screen(&mut self) -> io::Result<()>;
}

/// Interactive console with line editing and in-process history.
pub struct StdConsole {
    editor: DefaultEditor,
    ansi: bool,
}

impl StdConsole {
    /// `ansi` turns on red error rendering; keep it off when stdout is not
    /// a real terminal.
    pub fn new(ansi: bool) -> anyhow::Result<Self> {
        let editor = DefaultEditor::new().context("failed to initialize line editor")?;
        Ok(StdConsole { editor, ansi })
    }
}

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Input> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor
                        .add_history_entry(line.as_str())
                        .map_err(io::Error::other)?;
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(err) => Err(io::Error::other(err)),
        }
    }

    fn print_line(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}")
    }

    fn print_error(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        if self.ansi {
            writeln!(out, "\x1b[31m{text}\x1b[0m")
        } else {
            writeln!(out, "{text}")
        }
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        write!(out, "\x1b[2J\x1b[1;1H")?;
        out.flush()
    }
}

/// Scripted console for tests: reads come from a queue, writes land in
/// `output`, and prompts are recorded as they are shown.
pub struct MemConsole {
    inputs: VecDeque<Input>,
    pub output: Vec<String>,
    pub prompts: Vec<String>,
    pub cleared: usize,
}

impl MemConsole {
    /// Console that types each of `lines` in order, then hits Ctrl-D.
    pub fn with_lines(lines: &[&str]) -> Self {
        Self::with_inputs(lines.iter().map(|l| Input::Line(l.to_string())).collect())
    }

    /// Console that replays arbitrary inputs, Ctrl-C and Ctrl-D included.
    pub fn with_inputs(inputs: Vec<Input>) -> Self {
        MemConsole {
            inputs: VecDeque::from(inputs),
            output: Vec::new(),
            prompts: Vec::new(),
            cleared: 0,
        }
    }

    /// Everything printed so far, one line per element.
    pub fn printed(&self) -> &[String] {
        &self.output
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }
}

impl Console for MemConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Input> {
        self.prompts.push(prompt.to_string());
        // A script that runs dry behaves like closed stdin, so any loop
        // driven by this console terminates.
        Ok(self.inputs.pop_front().unwrap_or(Input::Eof))
    }

    fn print_line(&mut self, text: &str) -> io::Result<()> {
        self.output.push(text.to_string());
        Ok(())
    }

    fn print_error(&mut self, text: &str) -> io::Result<()> {
        self.output.push(text.to_string());
        Ok(())
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.cleared += 1;
        Ok(())
    }
}
