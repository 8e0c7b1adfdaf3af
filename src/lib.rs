//! A playful MS-DOS style shell with an app store.
//!
//! The shell reads one command per line at a `C:\FishyOS>` prompt. Commands
//! live in a [`registry::CommandRegistry`] (name plus aliases, dispatching
//! to shared handlers), and the `install`/`uninstall`/`run` commands drive a
//! [`store::AppStore`] of three installable apps: a calculator backed by the
//! sandboxed [`eval`] module, a notes pad, and an echo toy. A running app
//! takes over the console until the user exits it.
//!
//! The main entry point is [`ShellSession`] driven by a
//! [`console::Console`]: [`console::StdConsole`] for an interactive
//! terminal, or [`console::MemConsole`] to script a whole session.
//!
//! ```
//! use fishyos::ShellSession;
//! use fishyos::console::MemConsole;
//!
//! let mut console =
//!     MemConsole::with_lines(&["install calc", "run calc", "2+3*4", "exit", "exit"]);
//! ShellSession::new().run(&mut console).unwrap();
//! assert!(console.contains("= 14"));
//! ```

pub mod apps;
mod builtin;
pub mod console;
pub mod eval;
mod lexer;
mod parser;
pub mod registry;
mod session;
pub mod store;

/// Just a convenient re-export of the interactive session type.
///
/// See [`ShellSession`] for the high-level API and examples.
pub use session::ShellSession;
