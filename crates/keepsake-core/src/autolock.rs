//! Inactivity auto-lock.
//!
//! The timer knows nothing about clocks or windows: the caller reports when
//! the vault goes out of view (`hidden`), comes back (`visible`), and polls
//! with the current instant. Expiry fires once per hide.

use std::{ops::Sub, time::Duration};

use crate::settings::AutoLockTimeout;

/// Timer that expires after the vault has been hidden for the timeout.
#[derive(Debug, Clone)]
pub struct AutoLockTimer<I> {
    timeout: AutoLockTimeout,
    hidden_since: Option<I>,
}

impl<I> AutoLockTimer<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Disarmed timer.
    pub fn new(timeout: AutoLockTimeout) -> Self {
        Self { timeout, hidden_since: None }
    }

    /// Configured timeout.
    pub fn timeout(&self) -> AutoLockTimeout {
        self.timeout
    }

    /// Change the timeout. Disabling also disarms.
    pub fn set_timeout(&mut self, timeout: AutoLockTimeout) {
        self.timeout = timeout;
        if timeout.is_disabled() {
            self.hidden_since = None;
        }
    }

    /// The vault went out of view at `now`.
    ///
    /// Arms the timer unless auto-lock is disabled. Repeated calls keep the
    /// earliest instant.
    pub fn hidden(&mut self, now: I) {
        if self.timeout.is_disabled() || self.hidden_since.is_some() {
            return;
        }
        self.hidden_since = Some(now);
    }

    /// The vault is back in view; disarm.
    pub fn visible(&mut self) {
        self.hidden_since = None;
    }

    /// Whether the timer is counting down.
    pub fn is_armed(&self) -> bool {
        self.hidden_since.is_some()
    }

    /// Returns `true` exactly once when the timeout has elapsed since
    /// [`hidden`](Self::hidden), disarming the timer.
    pub fn poll(&mut self, now: I) -> bool {
        let (Some(since), Some(timeout)) = (self.hidden_since, self.timeout.as_duration()) else {
            return false;
        };

        if now < since || now - since < timeout {
            return false;
        }

        self.hidden_since = None;
        true
    }
}
