//! Keepsake command-line vault.
//!
//! # Usage
//!
//! ```bash
//! export KEEPSAKE_PASSPHRASE='my-super-secret-key'
//!
//! keepsake add password --title Server --username root
//! keepsake list --kind password
//! keepsake show 3f0c...
//! keepsake auto-lock 60000
//! ```

use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::Parser;
use keepsake_cli::{Args, run};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let mut out = io::stdout().lock();
    let mut notices = io::stderr();

    match run(args, &mut out, &mut notices) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(?err, "command failed");
            let _ = writeln!(notices, "keepsake: {err}");
            err.exit_code()
        },
    }
}
