//! The interactive session: welcome banner, prompt loop, shutdown.

use crate::builtin;
use crate::console::{Console, Input};
use crate::registry::{CommandContext, CommandRegistry, Flow};
use crate::store::AppStore;
use anyhow::Result;
use log::debug;

const PROMPT: &str = "C:\\FishyOS> ";

/// One run of the shell. Owns the registry and the store; the console is
/// borrowed for the duration of [`ShellSession::run`].
pub struct ShellSession {
    registry: CommandRegistry,
    store: AppStore,
}

impl ShellSession {
    /// Session with the stock commands and the stock app catalog.
    pub fn new() -> Self {
        let mut registry = CommandRegistry::new();
        builtin::register_builtins(&mut registry);
        ShellSession {
            registry,
            store: AppStore::new(),
        }
    }

    /// The command table, for registering or removing commands at runtime
    /// before (or between) [`ShellSession::run`] calls.
    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    /// Read and dispatch lines until the session ends.
    ///
    /// Ctrl-C or Ctrl-D at the prompt is treated as typing `exit`, so every
    /// shutdown goes through the same command path. A closed input stream
    /// always ends the loop, even if `exit` has been unregistered. `Err`
    /// means the console itself failed; user mistakes never end the loop.
    pub fn run(&mut self, console: &mut dyn Console) -> Result<()> {
        debug!("session starting");
        self.print_welcome(console)?;
        loop {
            let input = console.read_line(PROMPT)?;
            let closed = matches!(input, Input::Eof);
            let line = match input {
                Input::Line(line) => line,
                Input::Interrupted | Input::Eof => {
                    console.print_line("")?;
                    "exit".to_string()
                }
            };
            let mut ctx = CommandContext {
                registry: &self.registry,
                store: &mut self.store,
                console: &mut *console,
            };
            match self.registry.execute(&line, &mut ctx)? {
                Flow::Continue => {}
                Flow::Exit => break,
            }
            // Exhausted input must not spin: once the synthesized exit has
            // been dispatched, the session is over no matter what it did.
            if closed {
                break;
            }
        }
        debug!("session over");
        Ok(())
    }

    fn print_welcome(&self, console: &mut dyn Console) -> Result<()> {
        console.print_line(concat!("Welcome to FishyOS v", env!("CARGO_PKG_VERSION")))?;
        console.print_line("Type 'help' for a list of commands.")?;
        console.print_line("")?;
        Ok(())
    }
}

impl Default for ShellSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::MemConsole;
    use crate::registry::Command;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    #[test]
    fn test_immediate_exit_prints_welcome_and_goodbye() {
        let mut console = MemConsole::with_lines(&["exit"]);
        ShellSession::new().run(&mut console).unwrap();
        assert_eq!(
            console.output,
            vec![
                concat!("Welcome to FishyOS v", env!("CARGO_PKG_VERSION")).to_string(),
                "Type 'help' for a list of commands.".to_string(),
                String::new(),
                "Goodbye!".to_string(),
            ]
        );
        assert_eq!(console.prompts, vec!["C:\\FishyOS> ".to_string()]);
    }

    #[test]
    fn test_unknown_command_leaves_the_session_alive() {
        let mut console = MemConsole::with_lines(&["teleport home", "help", "exit"]);
        ShellSession::new().run(&mut console).unwrap();
        assert!(console.contains("Unknown command: teleport. Type 'help' for a list."));
        // Dispatch kept going after the unknown command.
        assert!(console.contains("Available commands:"));
        assert!(console.contains("Goodbye!"));
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let mut console = MemConsole::with_lines(&["", "   ", "exit"]);
        ShellSession::new().run(&mut console).unwrap();
        let blanks_reported = console
            .output
            .iter()
            .filter(|line| line.contains("Unknown command"))
            .count();
        assert_eq!(blanks_reported, 0);
    }

    #[test]
    fn test_full_app_lifecycle_through_the_session() {
        let mut console = MemConsole::with_lines(&[
            "install notes",
            "run notes",
            "add water the plants",
            "exit", // leaves notes
            "run notes",
            "list",
            "exit", // leaves notes again
            "uninstall notes",
            "apps",
            "exit", // leaves the shell
        ]);
        ShellSession::new().run(&mut console).unwrap();
        assert!(console.contains("Installed 'notes'."));
        assert!(console.contains("Launching 'notes'... (type 'exit' to return)"));
        assert!(console.contains("Note added."));
        // The note survived between the two runs.
        assert!(console.contains("1. water the plants"));
        assert!(console.contains("Uninstalled 'notes'."));
        assert!(console.contains("No apps installed."));
        assert!(console.contains("Goodbye!"));
    }

    #[test]
    fn test_interrupt_at_prompt_becomes_exit() {
        let mut console = MemConsole::with_inputs(vec![Input::Interrupted]);
        ShellSession::new().run(&mut console).unwrap();
        assert!(console.contains("Goodbye!"));
    }

    #[test]
    fn test_end_of_input_becomes_exit() {
        // No scripted lines at all: the first read is Ctrl-D.
        let mut console = MemConsole::with_lines(&[]);
        ShellSession::new().run(&mut console).unwrap();
        assert!(console.contains("Goodbye!"));
    }

    #[test]
    fn test_interrupt_inside_an_app_unwinds_the_whole_session() {
        let mut console = MemConsole::with_inputs(vec![
            Input::Line("install calc".to_string()),
            Input::Line("run calc".to_string()),
            Input::Line("1+1".to_string()),
            Input::Interrupted,
        ]);
        ShellSession::new().run(&mut console).unwrap();
        assert!(console.contains("= 2"));
        assert!(console.contains("Exiting calculator."));
        // The nested interrupt ends the session directly, without routing
        // through the exit command.
        assert!(!console.contains("Goodbye!"));
    }

    #[test]
    fn test_commands_can_be_added_at_runtime() {
        struct Ping;

        impl Command for Ping {
            fn execute(
                &self,
                args: &[&str],
                ctx: &mut CommandContext<'_>,
            ) -> Result<Flow> {
                ctx.console.print_line(&format!("PONG {}", args.join(" ")))?;
                Ok(Flow::Continue)
            }
        }

        let mut session = ShellSession::new();
        session
            .registry_mut()
            .register("ping", Rc::new(Ping), Some("Test command"), &[]);
        let mut console = MemConsole::with_lines(&["ping one two", "exit"]);
        session.run(&mut console).unwrap();
        assert!(console.contains("PONG one two"));
    }

    #[test]
    fn test_commands_can_be_removed_at_runtime() {
        let mut session = ShellSession::new();
        session.registry_mut().unregister("cls");
        let mut console = MemConsole::with_lines(&["clear", "exit"]);
        session.run(&mut console).unwrap();
        // The alias went away with the primary name.
        assert!(console.contains("Unknown command: clear. Type 'help' for a list."));
        assert_eq!(console.cleared, 0);
    }

    #[test]
    fn test_closed_input_ends_the_session_without_an_exit_command() {
        let mut session = ShellSession::new();
        session.registry_mut().unregister("exit");
        let mut console = MemConsole::with_lines(&["ver"]);
        session.run(&mut console).unwrap();
        // The synthesized exit found no handler, yet the session still ended
        // after a single report.
        let reported = console
            .output
            .iter()
            .filter(|line| line.starts_with("Unknown command: exit."))
            .count();
        assert_eq!(reported, 1);
        assert!(!console.contains("Goodbye!"));
    }
}
