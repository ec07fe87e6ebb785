//! Command-line frontend for Keepsake
//!
//! A thin shell over [`keepsake_app::Runtime`] that parses arguments, stores
//! records in Redb and prints results. All unlock and verification logic
//! lives in the generic runtime.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod render;
pub mod storage;
pub mod terminal;

pub use cli::{Args, Command, KindArg, SecretArgs};
pub use commands::{execute, run};
pub use error::CliError;
pub use storage::RedbStore;
pub use terminal::TerminalDriver;
