//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the vault's
//! lifecycle completely decoupled from storage and cryptography.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Tracks what the user may see: locked, verifying, or unlocked records.
//! - Ties every fetch to the unlock that requested it, so results for a
//!   superseded unlock are dropped.
//! - Runs the inactivity auto-lock timer.

use std::{ops::Sub, time::Duration};

use keepsake_core::{AutoLockTimeout, AutoLockTimer};

use crate::{AppAction, AppEvent, Notice, Passphrase, VaultView};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App<I> {
    /// What the user can see.
    view: VaultView,
    /// Inactivity timer.
    timer: AutoLockTimer<I>,
    /// Last message for the user. `None` if nothing to say.
    notice: Option<Notice>,
}

impl<I> App<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create a locked App with the given auto-lock timeout.
    pub fn new(timeout: AutoLockTimeout) -> Self {
        Self { view: VaultView::Locked, timer: AutoLockTimer::new(timeout), notice: None }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent<I>) -> Vec<AppAction> {
        match event {
            AppEvent::Tick { now } => {
                if !self.timer.poll(now) {
                    return vec![];
                }
                let was_open = self.close();
                tracing::debug!(was_open, "auto-lock expired");
                let mut actions = vec![AppAction::Lock];
                if was_open {
                    actions.extend(self.notify(Notice::AutoLocked));
                }
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::UnlockRequested { passphrase } => self.request_unlock(passphrase),
            AppEvent::Unlocked { generation } => match self.view {
                VaultView::Verifying { generation: None } => {
                    self.view = VaultView::Verifying { generation: Some(generation) };
                    vec![AppAction::FetchRecords { generation }, AppAction::Render]
                },
                // The user locked while the unlock was in flight.
                VaultView::Locked => vec![AppAction::Lock],
                VaultView::Verifying { .. } | VaultView::Unlocked { .. } => vec![],
            },
            AppEvent::RecordsLoaded { generation, records } => {
                if self.view.generation() != Some(generation) {
                    tracing::debug!(?generation, "dropping records for a superseded unlock");
                    return vec![];
                }
                self.view = VaultView::Unlocked { generation, items: records };
                vec![AppAction::Render]
            },
            AppEvent::VerificationFailed { generation } => {
                if self.view.generation() != Some(generation) {
                    return vec![];
                }
                self.close();
                let mut actions = self.notify(Notice::WrongPassphrase);
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::LoadFailed { message } => {
                let mut actions = Vec::new();
                if matches!(self.view, VaultView::Verifying { .. }) {
                    // Unverified keys are never left in place.
                    self.close();
                    actions.push(AppAction::Lock);
                }
                actions.extend(self.notify(Notice::Failed { message }));
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::RefreshRequested => match self.view {
                VaultView::Unlocked { generation, .. } => {
                    vec![AppAction::FetchRecords { generation }]
                },
                VaultView::Locked | VaultView::Verifying { .. } => vec![],
            },
            AppEvent::LockRequested => {
                self.close();
                self.notice = None;
                vec![AppAction::Lock, AppAction::Render]
            },
            AppEvent::LogoutRequested => {
                self.close();
                self.notice = None;
                vec![AppAction::Lock, AppAction::SignOut, AppAction::Render]
            },
            AppEvent::Hidden { at } => {
                if self.view.is_unlocked() {
                    self.timer.hidden(at);
                }
                vec![]
            },
            AppEvent::Visible => {
                self.timer.visible();
                vec![]
            },
            AppEvent::AutoLockChanged { timeout } => {
                self.timer.set_timeout(timeout);
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                if matches!(self.view, VaultView::Verifying { generation: None }) {
                    self.view = VaultView::Locked;
                }
                let mut actions = self.notify(Notice::Failed { message });
                actions.push(AppAction::Render);
                actions
            },
        }
    }

    /// Submit a passphrase.
    pub fn unlock(&mut self, passphrase: impl Into<String>) -> Vec<AppAction> {
        self.handle(AppEvent::UnlockRequested { passphrase: Passphrase::new(passphrase) })
    }

    /// Lock the vault.
    pub fn lock(&mut self) -> Vec<AppAction> {
        self.handle(AppEvent::LockRequested)
    }

    /// Lock the vault and end the session.
    pub fn logout(&mut self) -> Vec<AppAction> {
        self.handle(AppEvent::LogoutRequested)
    }

    /// Current view.
    pub fn view(&self) -> &VaultView {
        &self.view
    }

    /// Whether decrypted records are visible.
    pub fn is_unlocked(&self) -> bool {
        self.view.is_unlocked()
    }

    /// Last message for the user. `None` if nothing to say.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Configured auto-lock timeout.
    pub fn auto_lock_timeout(&self) -> AutoLockTimeout {
        self.timer.timeout()
    }

    fn request_unlock(&mut self, passphrase: Passphrase) -> Vec<AppAction> {
        if passphrase.is_empty() {
            let mut actions =
                self.notify(Notice::Failed { message: "passphrase is empty".to_owned() });
            actions.push(AppAction::Render);
            return actions;
        }

        self.view = VaultView::Verifying { generation: None };
        self.notice = None;
        vec![AppAction::Unlock { passphrase }, AppAction::Render]
    }

    /// Drop to `Locked`. Returns whether the vault was open or opening.
    fn close(&mut self) -> bool {
        let was_open = !matches!(self.view, VaultView::Locked);
        self.view = VaultView::Locked;
        self.timer.visible();
        was_open
    }

    fn notify(&mut self, notice: Notice) -> Vec<AppAction> {
        self.notice = Some(notice.clone());
        vec![AppAction::Notify { notice }]
    }
}
