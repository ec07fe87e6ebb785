//! Terminal driver for the CLI.
//!
//! Implements the [`Driver`] trait for a one-shot command: notices go to the
//! given writer (stderr in production), view changes are logged.

use std::{
    io::{self, Write},
    time::Instant,
};

use keepsake_app::{App, Driver, Notice, VaultView};

/// Terminal driver implementing the [`Driver`] trait.
#[derive(Debug)]
pub struct TerminalDriver<W> {
    notices: W,
}

impl<W: Write> TerminalDriver<W> {
    /// Driver writing notices to `notices`.
    pub fn new(notices: W) -> Self {
        Self { notices }
    }

    /// Recover the notice writer.
    pub fn into_inner(self) -> W {
        self.notices
    }
}

impl<W: Write> Driver for TerminalDriver<W> {
    type Error = io::Error;
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn render(&mut self, app: &App<Instant>) -> Result<(), io::Error> {
        match app.view() {
            VaultView::Locked => tracing::debug!("vault locked"),
            VaultView::Verifying { .. } => tracing::debug!("verifying passphrase"),
            VaultView::Unlocked { items, .. } => {
                tracing::debug!(records = items.len(), "vault unlocked");
            },
        }
        Ok(())
    }

    fn notify(&mut self, notice: &Notice) -> Result<(), io::Error> {
        writeln!(self.notices, "{notice}")
    }

    fn sign_out(&mut self) -> Result<(), io::Error> {
        tracing::info!("signed out");
        Ok(())
    }
}
