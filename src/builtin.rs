//! The built-in shell commands.
//!
//! Every handler prints through the injected console and touches the store
//! through the context, never through globals. Store refusals are printed
//! as-is; only unexpected faults bubble up to the registry's catch.

use crate::registry::{Command, CommandContext, CommandRegistry, Flow};
use anyhow::Result;
use std::rc::Rc;

/// Wire up the stock command set on `registry`.
pub(crate) fn register_builtins(registry: &mut CommandRegistry) {
    registry.register("help", Rc::new(Help), Some("Show this help message"), &["?", "h"]);
    registry.register("apps", Rc::new(Apps), Some("List installed apps"), &[]);
    registry.register(
        "store",
        Rc::new(Store),
        Some("Show available apps in App Store"),
        &[],
    );
    registry.register(
        "install",
        Rc::new(Install),
        Some("Install an app from App Store"),
        &[],
    );
    registry.register(
        "uninstall",
        Rc::new(Uninstall),
        Some("Uninstall an installed app"),
        &[],
    );
    registry.register("run", Rc::new(Run), Some("Run an installed app"), &[]);
    registry.register("cls", Rc::new(Cls), Some("Clear the screen"), &["clear"]);
    registry.register("ver", Rc::new(Ver), Some("Show FishyOS version info"), &[]);
    registry.register("about", Rc::new(About), Some("About FishyOS"), &[]);
    registry.register("exit", Rc::new(Exit), Some("Exit FishyOS"), &["quit", "q"]);
}

struct Help;

impl Command for Help {
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<Flow> {
        ctx.console.print_line("Available commands:")?;
        for (name, text) in ctx.registry.iter_help() {
            ctx.console.print_line(&format!(" {name:<12} - {text}"))?;
        }
        Ok(Flow::Continue)
    }
}

struct Apps;

impl Command for Apps {
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<Flow> {
        let installed = ctx.store.list_installed();
        if installed.is_empty() {
            ctx.console.print_line("No apps installed.")?;
        } else {
            ctx.console.print_line("Installed apps:")?;
            for name in installed {
                ctx.console.print_line(&format!(" - {name}"))?;
            }
        }
        Ok(Flow::Continue)
    }
}

struct Store;

impl Command for Store {
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<Flow> {
        ctx.console.print_line("Available apps in FishyOS Store:")?;
        for (name, installed) in ctx.store.list_catalog() {
            let status = if installed { "Installed" } else { "Not installed" };
            ctx.console.print_line(&format!(" - {name} [{status}]"))?;
        }
        Ok(Flow::Continue)
    }
}

struct Install;

impl Command for Install {
    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<Flow> {
        let Some(name) = args.first() else {
            ctx.console.print_line("Usage: install <appname>")?;
            return Ok(Flow::Continue);
        };
        match ctx.store.install(name) {
            Ok(()) => ctx.console.print_line(&format!("Installed '{name}'."))?,
            Err(err) => ctx.console.print_error(&err.to_string())?,
        }
        Ok(Flow::Continue)
    }
}

struct Uninstall;

impl Command for Uninstall {
    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<Flow> {
        let Some(name) = args.first() else {
            ctx.console.print_line("Usage: uninstall <appname>")?;
            return Ok(Flow::Continue);
        };
        match ctx.store.uninstall(name) {
            Ok(()) => ctx.console.print_line(&format!("Uninstalled '{name}'."))?,
            Err(err) => ctx.console.print_error(&err.to_string())?,
        }
        Ok(Flow::Continue)
    }
}

struct Run;

impl Command for Run {
    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<Flow> {
        let Some(name) = args.first() else {
            ctx.console.print_line("Usage: run <appname>")?;
            return Ok(Flow::Continue);
        };
        match ctx.store.instance_mut(name) {
            Ok(app) => {
                ctx.console
                    .print_line(&format!("Launching '{name}'... (type 'exit' to return)"))?;
                // Blocks until the app's own loop decides to return.
                app.run(&mut *ctx.console)
            }
            Err(err) => {
                ctx.console.print_error(&err.to_string())?;
                Ok(Flow::Continue)
            }
        }
    }
}

struct Cls;

impl Command for Cls {
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<Flow> {
        ctx.console.clear_screen()?;
        Ok(Flow::Continue)
    }
}

struct Ver;

impl Command for Ver {
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<Flow> {
        ctx.console
            .print_line(concat!("FishyOS version ", env!("CARGO_PKG_VERSION")))?;
        ctx.console.print_line("MS-DOS style shell simulator.")?;
        Ok(Flow::Continue)
    }
}

struct About;

impl Command for About {
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<Flow> {
        ctx.console
            .print_line("FishyOS - a playful MS-DOS style shell.")?;
        ctx.console.print_line("Type 'store' to see installable apps.")?;
        Ok(Flow::Continue)
    }
}

struct Exit;

impl Command for Exit {
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<Flow> {
        ctx.console.print_line("Goodbye!")?;
        Ok(Flow::Exit)
    }
}
