//! The installable applications: calculator, notes and echo.
//!
//! Each one is a blocking sub-loop over the same console the shell itself
//! reads from. While an app runs, the outer session is parked; the app
//! returns control by seeing its own `exit` token.

use crate::console::{Console, Input};
use crate::eval;
use crate::registry::Flow;
use anyhow::Result;

/// An interactive program the store can install and run.
pub trait Application {
    /// Take over the console until done.
    ///
    /// Returns [`Flow::Continue`] when the user typed the app's `exit`
    /// token (back to the shell prompt), and [`Flow::Exit`] when the read
    /// was interrupted (Ctrl-C / Ctrl-D), which asks every enclosing loop
    /// to wind down as well.
    fn run(&mut self, console: &mut dyn Console) -> Result<Flow>;
}

/// Arithmetic REPL over the sandboxed evaluator. Accepts `exit` in any
/// case; errors are reported and the loop continues.
pub struct Calculator;

impl Application for Calculator {
    fn run(&mut self, console: &mut dyn Console) -> Result<Flow> {
        console.print_line("Simple Calculator - type 'exit' to quit")?;
        loop {
            let line = match console.read_line("calc> ")? {
                Input::Line(line) => line,
                Input::Interrupted | Input::Eof => {
                    console.print_line("Exiting calculator.")?;
                    return Ok(Flow::Exit);
                }
            };
            let expr = line.trim();
            if expr.eq_ignore_ascii_case("exit") {
                console.print_line("Exiting calculator.")?;
                return Ok(Flow::Continue);
            }
            match eval::evaluate(expr) {
                Ok(value) => console.print_line(&format!("= {value}"))?,
                Err(err) => console.print_error(&format!("Error: {err}"))?,
            }
        }
    }
}

/// In-memory note list. Notes accumulate for as long as the instance is
/// installed and are gone when it is uninstalled.
#[derive(Default)]
pub struct Notes {
    entries: Vec<String>,
}

impl Application for Notes {
    fn run(&mut self, console: &mut dyn Console) -> Result<Flow> {
        console.print_line("Simple Notes - type 'help' for commands, 'exit' to quit")?;
        loop {
            let line = match console.read_line("notes> ")? {
                Input::Line(line) => line,
                Input::Interrupted | Input::Eof => {
                    console.print_line("Exiting notes.")?;
                    return Ok(Flow::Exit);
                }
            };
            let cmd = line.trim();
            if cmd == "exit" {
                console.print_line("Exiting notes.")?;
                return Ok(Flow::Continue);
            } else if cmd == "help" {
                console.print_line("Commands: add <text>, list, clear, exit")?;
            } else if let Some(text) = cmd.strip_prefix("add ") {
                self.entries.push(text.trim().to_string());
                console.print_line("Note added.")?;
            } else if cmd == "list" {
                if self.entries.is_empty() {
                    console.print_line("No notes.")?;
                } else {
                    console.print_line("Notes:")?;
                    for (index, note) in self.entries.iter().enumerate() {
                        console.print_line(&format!("{}. {note}", index + 1))?;
                    }
                }
            } else if cmd == "clear" {
                self.entries.clear();
                console.print_line("All notes cleared.")?;
            } else {
                console.print_line("Unknown notes command. Type 'help'.")?;
            }
        }
    }
}

/// Repeats every line back verbatim until `exit` (any case).
pub struct Echo;

impl Application for Echo {
    fn run(&mut self, console: &mut dyn Console) -> Result<Flow> {
        console.print_line("Echo app - type something and it will repeat it. Type 'exit' to quit.")?;
        loop {
            let line = match console.read_line("echo> ")? {
                Input::Line(line) => line,
                Input::Interrupted | Input::Eof => {
                    console.print_line("Exiting echo.")?;
                    return Ok(Flow::Exit);
                }
            };
            if line.trim().eq_ignore_ascii_case("exit") {
                console.print_line("Exiting echo.")?;
                return Ok(Flow::Continue);
            }
            console.print_line(&line)?;
        }
    }
}
