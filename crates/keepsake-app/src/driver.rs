//! Driver trait for abstracting frontend output.
//!
//! The [`Driver`] trait decouples the application runtime from a specific
//! frontend. Each frontend implements the trait to provide output and a
//! clock, while the generic [`crate::Runtime`] handles all orchestration.

use std::{ops::Sub, time::Duration};

use crate::{App, Notice};

/// Abstracts frontend I/O for the application runtime.
///
/// # Implementations
///
/// - **CLI**: writes the view to the terminal
/// - **Tests**: records calls and uses a simulated clock
pub trait Driver {
    /// Frontend-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App<Self::Instant>) -> Result<(), Self::Error>;

    /// Show a transient message.
    fn notify(&mut self, notice: &Notice) -> Result<(), Self::Error>;

    /// End the user session with the record service.
    fn sign_out(&mut self) -> Result<(), Self::Error>;
}
