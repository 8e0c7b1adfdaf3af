//! The app store: a static catalog plus installed-instance lifecycle.
//!
//! Each name moves through `NotInstalled -> Installed -> NotInstalled`.
//! Installing instantiates the catalog factory; the instance then lives
//! here, keeps its internal state across any number of runs, and is
//! dropped on uninstall. The store does no IO of its own: callers print,
//! the store only reports outcomes.

use crate::apps::{self, Application};
use log::debug;
use thiserror::Error;

/// Store operations that refuse to proceed. The messages are exactly what
/// the shell shows the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("App '{0}' not found in the store.")]
    AppNotFound(String),
    #[error("'{0}' is already installed.")]
    AlreadyInstalled(String),
    #[error("App '{0}' is not installed.")]
    NotInstalled(String),
}

/// One catalog entry: a name and the factory that builds a fresh instance.
pub struct AppDescriptor {
    pub name: &'static str,
    pub build: fn() -> Box<dyn Application>,
}

struct InstalledApp {
    name: &'static str,
    instance: Box<dyn Application>,
}

/// Catalog plus installed instances, in install order.
pub struct AppStore {
    catalog: Vec<AppDescriptor>,
    installed: Vec<InstalledApp>,
}

impl AppStore {
    /// Store over the stock catalog: calc, notes, echo.
    pub fn new() -> Self {
        Self::with_catalog(vec![
            AppDescriptor {
                name: "calc",
                build: || Box::new(apps::Calculator),
            },
            AppDescriptor {
                name: "notes",
                build: || Box::new(apps::Notes::default()),
            },
            AppDescriptor {
                name: "echo",
                build: || Box::new(apps::Echo),
            },
        ])
    }

    /// Store over a custom catalog. The catalog is fixed for the lifetime
    /// of the store.
    pub fn with_catalog(catalog: Vec<AppDescriptor>) -> Self {
        AppStore {
            catalog,
            installed: Vec::new(),
        }
    }

    /// Instantiate `name` from the catalog. Repeat installs are refused,
    /// so there is never more than one instance per name.
    pub fn install(&mut self, name: &str) -> Result<(), StoreError> {
        if self.is_installed(name) {
            return Err(StoreError::AlreadyInstalled(name.to_string()));
        }
        let descriptor = self
            .catalog
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| StoreError::AppNotFound(name.to_string()))?;
        debug!("installing app '{name}'");
        self.installed.push(InstalledApp {
            name: descriptor.name,
            instance: (descriptor.build)(),
        });
        Ok(())
    }

    /// Drop the installed instance for `name`. Whatever state it held is
    /// gone; a later install starts from the factory again.
    pub fn uninstall(&mut self, name: &str) -> Result<(), StoreError> {
        let index = self
            .installed
            .iter()
            .position(|app| app.name == name)
            .ok_or_else(|| StoreError::NotInstalled(name.to_string()))?;
        debug!("uninstalling app '{name}'");
        self.installed.remove(index);
        Ok(())
    }

    /// The installed instance for `name`, ready to run. The borrow keeps
    /// the store locked while the app is on screen.
    pub fn instance_mut(&mut self, name: &str) -> Result<&mut (dyn Application + '_), StoreError> {
        match self.installed.iter_mut().find(|app| app.name == name) {
            Some(app) => Ok(app.instance.as_mut()),
            None => Err(StoreError::NotInstalled(name.to_string())),
        }
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.iter().any(|app| app.name == name)
    }

    /// Installed names, oldest install first.
    pub fn list_installed(&self) -> Vec<&'static str> {
        self.installed.iter().map(|app| app.name).collect()
    }

    /// Every catalog entry with its install status, in catalog order.
    pub fn list_catalog(&self) -> Vec<(&'static str, bool)> {
        self.catalog
            .iter()
            .map(|d| (d.name, self.is_installed(d.name)))
            .collect()
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::MemConsole;

    #[test]
    fn test_install_is_idempotent_in_effect() {
        let mut store = AppStore::new();
        assert_eq!(store.install("calc"), Ok(()));
        assert_eq!(
            store.install("calc"),
            Err(StoreError::AlreadyInstalled("calc".to_string()))
        );
        // Exactly one instance survives the repeat attempt.
        assert_eq!(store.list_installed(), vec!["calc"]);
    }

    #[test]
    fn test_install_requires_a_catalog_entry() {
        let mut store = AppStore::new();
        assert_eq!(
            store.install("browser"),
            Err(StoreError::AppNotFound("browser".to_string()))
        );
        assert!(store.list_installed().is_empty());
    }

    #[test]
    fn test_catalog_lookup_is_case_sensitive() {
        let mut store = AppStore::new();
        assert_eq!(
            store.install("Calc"),
            Err(StoreError::AppNotFound("Calc".to_string()))
        );
    }

    #[test]
    fn test_uninstall_before_install_reports_not_installed() {
        let mut store = AppStore::new();
        assert_eq!(
            store.uninstall("calc"),
            Err(StoreError::NotInstalled("calc".to_string()))
        );
    }

    #[test]
    fn test_uninstall_then_reinstall_resets_instance_state() {
        let mut store = AppStore::new();
        store.install("notes").unwrap();

        let mut console = MemConsole::with_lines(&["add remember me", "exit"]);
        store.instance_mut("notes").unwrap().run(&mut console).unwrap();

        store.uninstall("notes").unwrap();
        store.install("notes").unwrap();

        let mut console = MemConsole::with_lines(&["list", "exit"]);
        store.instance_mut("notes").unwrap().run(&mut console).unwrap();
        assert!(console.contains("No notes."));
    }

    #[test]
    fn test_instance_state_persists_across_runs_while_installed() {
        let mut store = AppStore::new();
        store.install("notes").unwrap();

        let mut console = MemConsole::with_lines(&["add buy milk", "exit"]);
        store.instance_mut("notes").unwrap().run(&mut console).unwrap();

        let mut console = MemConsole::with_lines(&["list", "exit"]);
        store.instance_mut("notes").unwrap().run(&mut console).unwrap();
        assert!(console.contains("1. buy milk"));
    }

    #[test]
    fn test_run_lookup_fails_when_not_installed() {
        let mut store = AppStore::new();
        assert!(matches!(
            store.instance_mut("echo"),
            Err(StoreError::NotInstalled(_))
        ));
    }

    #[test]
    fn test_listings_report_status_in_catalog_and_install_order() {
        let mut store = AppStore::new();
        assert_eq!(
            store.list_catalog(),
            vec![("calc", false), ("notes", false), ("echo", false)]
        );
        store.install("echo").unwrap();
        store.install("calc").unwrap();
        assert_eq!(
            store.list_catalog(),
            vec![("calc", true), ("notes", false), ("echo", true)]
        );
        // Install order, not catalog order.
        assert_eq!(store.list_installed(), vec!["echo", "calc"]);
    }

    #[test]
    fn test_error_messages_match_the_shell_output() {
        assert_eq!(
            StoreError::AppNotFound("web".to_string()).to_string(),
            "App 'web' not found in the store."
        );
        assert_eq!(
            StoreError::AlreadyInstalled("calc".to_string()).to_string(),
            "'calc' is already installed."
        );
        assert_eq!(
            StoreError::NotInstalled("calc".to_string()).to_string(),
            "App 'calc' is not installed."
        );
    }
}
