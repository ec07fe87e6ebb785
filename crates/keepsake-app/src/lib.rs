//! Application layer for Keepsake
//!
//! Pure vault lifecycle state machine and a generic runtime, so frontends and
//! tests drive the same unlock, verify and auto-lock logic.
//!
//! # Components
//!
//! - [`App`]: vault view state machine (unlock, verify, lock, auto-lock)
//! - [`Driver`]: trait for frontend-specific output and time
//! - [`Runtime`]: executes [`AppAction`]s against a [`keepsake_core::VaultService`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod event;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use driver::Driver;
pub use event::{AppEvent, Passphrase};
pub use runtime::Runtime;
pub use state::{Notice, VaultView};
