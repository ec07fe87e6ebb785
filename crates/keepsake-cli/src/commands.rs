//! Command execution.
//!
//! Every vault command opens the vault the same way the interactive frontend
//! does: the passphrase goes through [`Runtime::unlock`], records are fetched
//! and verified, and the command only proceeds if the vault ended up
//! unlocked.

use std::{io::Write, sync::Arc};

use keepsake_app::{Notice, Runtime};
use keepsake_core::{
    AutoLockTimeout, RecordStore, SessionKeyHolder, SettingsStore, UnlockedItem, VaultService,
    generate_password, load_auto_lock, save_auto_lock,
};
use keepsake_crypto::{Cipher, Entropy, KdfParams, OsEntropy};

use crate::{
    cli::{Args, Command},
    error::CliError,
    render::{render_auto_lock, render_item, render_items},
    storage::RedbStore,
    terminal::TerminalDriver,
};

/// Run a parsed command against the database named in `args`.
///
/// Results go to `out`, notices to `notices`.
pub fn run(args: Args, out: &mut impl Write, notices: &mut impl Write) -> Result<(), CliError> {
    let params = KdfParams::new(args.iterations)?;

    if let Command::Generate { length } = args.command {
        writeln!(out, "{}", generate_password(&OsEntropy, length))?;
        return Ok(());
    }

    let store = RedbStore::open(&args.db)?;
    execute(
        store,
        Cipher::with_params(params),
        args.passphrase.as_deref(),
        args.command,
        out,
        notices,
    )
}

/// Run `command` against `store`.
pub fn execute<S, R>(
    store: S,
    cipher: Cipher<R>,
    passphrase: Option<&str>,
    command: Command,
    out: &mut impl Write,
    notices: &mut impl Write,
) -> Result<(), CliError>
where
    S: RecordStore + SettingsStore,
    R: Entropy,
{
    let timeout = load_auto_lock(&store)?;

    match command {
        Command::Generate { length } => {
            writeln!(out, "{}", generate_password(&OsEntropy, length))?;
        },
        Command::AutoLock { millis } => {
            let timeout = match millis {
                Some(millis) => {
                    let timeout = AutoLockTimeout::from_millis(millis);
                    save_auto_lock(&store, timeout)?;
                    tracing::info!(%timeout, "auto-lock timeout changed");
                    timeout
                },
                None => timeout,
            };
            render_auto_lock(out, timeout)?;
        },
        Command::Add { secret } => {
            let runtime = open_vault(store, cipher, passphrase, timeout, notices)?;
            let (title, payload) = secret.into_parts(&OsEntropy);
            let item = runtime.service().create(&title, &payload)?;
            writeln!(out, "{}", item.id)?;
        },
        Command::List { kind } => {
            let runtime = open_vault(store, cipher, passphrase, timeout, notices)?;
            let view = runtime.app().view();
            let items: Vec<UnlockedItem> = match kind {
                Some(kind) => view.items_of(&[kind.into()]).cloned().collect(),
                None => view.items().to_vec(),
            };
            render_items(out, &items)?;
        },
        Command::Show { id } => {
            let runtime = open_vault(store, cipher, passphrase, timeout, notices)?;
            let item = runtime
                .app()
                .view()
                .items()
                .iter()
                .find(|unlocked| unlocked.item.id == id)
                .ok_or(CliError::NotFound(id))?;
            render_item(out, item)?;
        },
        Command::Edit { id, secret } => {
            let runtime = open_vault(store, cipher, passphrase, timeout, notices)?;
            let (title, payload) = secret.into_parts(&OsEntropy);
            let item = runtime.service().update(id, &title, &payload)?;
            writeln!(out, "{}", item.id)?;
        },
        Command::Delete { id } => {
            let runtime = open_vault(store, cipher, passphrase, timeout, notices)?;
            runtime.service().delete(id)?;
        },
    }
    Ok(())
}

/// Unlock and verify, returning a runtime whose App is unlocked.
fn open_vault<'w, S, R, W>(
    store: S,
    cipher: Cipher<R>,
    passphrase: Option<&str>,
    timeout: AutoLockTimeout,
    notices: &'w mut W,
) -> Result<Runtime<S, TerminalDriver<&'w mut W>, R>, CliError>
where
    S: RecordStore,
    R: Entropy,
    W: Write,
{
    let passphrase =
        passphrase.filter(|passphrase| !passphrase.is_empty()).ok_or(CliError::MissingPassphrase)?;

    let service = VaultService::with_cipher(store, Arc::new(SessionKeyHolder::new()), cipher);
    let mut runtime = Runtime::new(service, TerminalDriver::new(notices), timeout);
    runtime.unlock(passphrase)?;

    if runtime.app().is_unlocked() {
        return Ok(runtime);
    }
    Err(match runtime.app().notice() {
        Some(Notice::WrongPassphrase) => CliError::WrongPassphrase,
        Some(notice) => CliError::Unlock(notice.to_string()),
        None => CliError::Unlock("verification did not complete".to_owned()),
    })
}
