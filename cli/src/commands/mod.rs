//! CLI Commands

pub mod analytics;
pub mod auth;
pub mod campaigns;
pub mod config;
pub mod dashboard;
pub mod segments;

use anyhow::{bail, Result};
use marktauto_client::{Page, Route, Shell};

use crate::output::{self, OutputFormat};

/// Shell plus the chosen output format
pub struct App {
    pub shell: Shell,
    pub format: OutputFormat,
}

impl App {
    pub fn new(shell: Shell, format: OutputFormat) -> Self {
        Self { shell, format }
    }

    /// Navigates to a page and prints it. A redirect to the login page
    /// prints that page and fails the command.
    pub fn show(&mut self, route: Route) -> Result<()> {
        let page = self.shell.go(route);
        self.format.page(&page)?;
        if page == Page::Login && route != Route::Login {
            bail!("Not logged in. Run `marktauto login` first.");
        }
        Ok(())
    }

    /// Prints the banner left by an action and converts its error
    pub fn finish<T>(&self, result: marktauto_client::Result<T>) -> Result<T> {
        output::notice(self.shell.notice());
        match result {
            Ok(value) => Ok(value),
            Err(e) if e.is_authentication_error() => {
                Err(anyhow::Error::new(e).context("Session missing or expired. Run `marktauto login`."))
            }
            Err(e) => Err(e.into()),
        }
    }
}
