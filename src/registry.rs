//! Command registration and dispatch.
//!
//! The registry owns the name → handler table. Handlers are shared trait
//! objects: registering a command under a primary name plus aliases stores
//! the same [`Rc`] under every name, and handler identity (pointer equality)
//! is what ties an alias back to its primary name for help listings and
//! unregistration.

use crate::console::Console;
use crate::store::AppStore;
use anyhow::Result;
use log::debug;
use std::collections::HashMap;
use std::rc::Rc;

/// What the session loop should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input.
    Continue,
    /// End the session. Only deliberate shutdown paths return this;
    /// failures are reported and map to `Continue`.
    Exit,
}

/// A command invocable from the shell prompt.
pub trait Command {
    /// Run the command with the whitespace-split arguments that followed
    /// its name. `Err` means the command faulted; the registry reports it
    /// and the session carries on.
    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<Flow>;
}

/// Everything a handler may touch, injected per call.
///
/// Handlers never reach for globals: the registry (for help listings), the
/// store and the console all arrive through here.
pub struct CommandContext<'a> {
    pub registry: &'a CommandRegistry,
    pub store: &'a mut AppStore,
    pub console: &'a mut dyn Console,
}

/// Name → handler table with alias support and fault isolation.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Rc<dyn Command>>,
    help: HashMap<String, String>,
    // Handler identity → primary name. Linear scans are fine at shell scale.
    primary: Vec<(Rc<dyn Command>, String)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name` and each alias, all lower-cased.
    ///
    /// Help text is keyed by the primary name only. Registering over an
    /// existing name silently replaces it.
    pub fn register(
        &mut self,
        name: &str,
        handler: Rc<dyn Command>,
        help_text: Option<&str>,
        aliases: &[&str],
    ) {
        let name = name.to_lowercase();
        debug!("registering command '{name}' with {} aliases", aliases.len());
        self.commands.insert(name.clone(), Rc::clone(&handler));
        if let Some(text) = help_text {
            self.help.insert(name.clone(), text.to_string());
        }
        match self
            .primary
            .iter_mut()
            .find(|(h, _)| Rc::ptr_eq(h, &handler))
        {
            Some((_, primary)) => *primary = name,
            None => self.primary.push((Rc::clone(&handler), name)),
        }
        for alias in aliases {
            self.commands.insert(alias.to_lowercase(), Rc::clone(&handler));
        }
    }

    /// Remove the command known by `name`, along with every other name
    /// bound to the same handler. Removing a command by one of its aliases
    /// therefore retires the whole family, so no stale alias can keep
    /// resolving to a handler whose primary name is gone.
    pub fn unregister(&mut self, name: &str) {
        let name = name.to_lowercase();
        self.help.remove(&name);
        let Some(handler) = self.commands.remove(&name) else {
            return;
        };
        debug!("unregistering command '{name}'");
        let bound: Vec<String> = self
            .commands
            .iter()
            .filter(|(_, h)| Rc::ptr_eq(h, &handler))
            .map(|(n, _)| n.clone())
            .collect();
        for stale in bound {
            self.commands.remove(&stale);
            self.help.remove(&stale);
        }
        self.primary.retain(|(h, _)| !Rc::ptr_eq(h, &handler));
    }

    /// Dispatch one input line.
    ///
    /// Blank lines are ignored. The first token, lower-cased, selects the
    /// handler; the remaining tokens are passed through verbatim. A missing
    /// command and a faulting handler are both reported on the console and
    /// the session continues; `Err` from this method means the console
    /// itself failed.
    pub fn execute(&self, line: &str, ctx: &mut CommandContext<'_>) -> Result<Flow> {
        let mut parts = line.split_whitespace();
        let Some(first) = parts.next() else {
            return Ok(Flow::Continue);
        };
        let name = first.to_lowercase();
        let args: Vec<&str> = parts.collect();
        let Some(handler) = self.commands.get(&name) else {
            ctx.console
                .print_error(&format!("Unknown command: {name}. Type 'help' for a list."))?;
            return Ok(Flow::Continue);
        };
        debug!("dispatching '{name}' with {} argument(s)", args.len());
        match handler.execute(&args, ctx) {
            Ok(flow) => Ok(flow),
            Err(err) => {
                ctx.console
                    .print_error(&format!("Command '{name}' failed: {err:#}"))?;
                Ok(Flow::Continue)
            }
        }
    }

    /// `(primary name, help text)` for every distinct handler, sorted by
    /// name. A handler registered under a primary name plus aliases shows
    /// up exactly once.
    pub fn iter_help(&self) -> Vec<(String, String)> {
        let mut seen: Vec<&Rc<dyn Command>> = Vec::new();
        let mut lines: Vec<(String, String)> = Vec::new();
        for (name, handler) in &self.commands {
            if seen.iter().any(|h| Rc::ptr_eq(h, handler)) {
                continue;
            }
            seen.push(handler);
            let primary = self
                .primary
                .iter()
                .find(|(h, _)| Rc::ptr_eq(h, handler))
                .map(|(_, n)| n.clone())
                .unwrap_or_else(|| name.clone());
            let text = self.help.get(&primary).cloned().unwrap_or_default();
            lines.push((primary, text));
        }
        lines.sort_by(|a, b| a.0.cmp(&b.0));
        lines
    }
}
