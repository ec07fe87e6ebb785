//! Generic runtime for application orchestration.
//!
//! The Runtime feeds events into the [`App`], executes the resulting actions
//! against a [`VaultService`] and a [`Driver`], and feeds their outcomes
//! back until no actions remain.

use keepsake_core::{AutoLockTimeout, RecordStore, VaultError, VaultService};
use keepsake_crypto::{Entropy, OsEntropy};

use crate::{App, AppAction, AppEvent, Driver, Passphrase};

/// Generic runtime that orchestrates App, VaultService, and Driver.
///
/// # Type Parameters
///
/// - `S`: Record store behind the service
/// - `D`: Frontend driver
/// - `R`: Entropy source for encryption
pub struct Runtime<S, D, R = OsEntropy>
where
    D: Driver,
{
    service: VaultService<S, R>,
    driver: D,
    app: App<D::Instant>,
}

impl<S, D, R> Runtime<S, D, R>
where
    S: RecordStore,
    D: Driver,
    R: Entropy,
{
    /// Create a runtime with a locked App.
    pub fn new(service: VaultService<S, R>, driver: D, timeout: AutoLockTimeout) -> Self {
        Self { service, driver, app: App::new(timeout) }
    }

    /// Feed an event and execute actions until quiescent.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    pub fn dispatch(&mut self, event: AppEvent<D::Instant>) -> Result<(), D::Error> {
        let actions = self.app.handle(event);
        self.process_actions(actions)
    }

    /// Submit a passphrase and, if accepted, fetch and verify records.
    pub fn unlock(&mut self, passphrase: impl Into<String>) -> Result<(), D::Error> {
        self.dispatch(AppEvent::UnlockRequested { passphrase: Passphrase::new(passphrase) })
    }

    /// Lock the vault.
    pub fn lock(&mut self) -> Result<(), D::Error> {
        self.dispatch(AppEvent::LockRequested)
    }

    /// The vault went out of view now.
    pub fn hidden(&mut self) -> Result<(), D::Error> {
        let at = self.driver.now();
        self.dispatch(AppEvent::Hidden { at })
    }

    /// The vault is back in view.
    pub fn visible(&mut self) -> Result<(), D::Error> {
        self.dispatch(AppEvent::Visible)
    }

    /// Periodic tick at the driver's current time.
    pub fn tick(&mut self) -> Result<(), D::Error> {
        let now = self.driver.now();
        self.dispatch(AppEvent::Tick { now })
    }

    /// Process actions returned by the App.
    fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<(), D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                let Some(event) = self.execute(action)? else { continue };
                pending_actions.extend(self.app.handle(event));
            }
        }
        Ok(())
    }

    /// Execute one action, returning the event describing its outcome.
    fn execute(&mut self, action: AppAction) -> Result<Option<AppEvent<D::Instant>>, D::Error> {
        let holder = self.service.holder();

        let event = match action {
            AppAction::Render => {
                self.driver.render(&self.app)?;
                None
            },
            AppAction::Notify { notice } => {
                self.driver.notify(&notice)?;
                None
            },
            AppAction::SignOut => {
                self.driver.sign_out()?;
                None
            },
            AppAction::Lock => {
                holder.lock();
                None
            },
            AppAction::Unlock { passphrase } => match holder.unlock(passphrase.expose()) {
                Ok(generation) => Some(AppEvent::Unlocked { generation }),
                Err(err) => Some(AppEvent::Error { message: err.to_string() }),
            },
            AppAction::FetchRecords { generation } => match self.service.load_for(generation) {
                Ok(Some(records)) => Some(AppEvent::RecordsLoaded { generation, records }),
                Ok(None) => {
                    tracing::debug!(?generation, "skipping fetch for a superseded unlock");
                    None
                },
                Err(VaultError::WrongPassphrase) => {
                    Some(AppEvent::VerificationFailed { generation })
                },
                Err(err) => Some(AppEvent::LoadFailed { message: err.to_string() }),
            },
        };
        Ok(event)
    }

    /// The App state machine.
    pub fn app(&self) -> &App<D::Instant> {
        &self.app
    }

    /// The vault service.
    pub fn service(&self) -> &VaultService<S, R> {
        &self.service
    }

    /// The frontend driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutable access to the frontend driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
