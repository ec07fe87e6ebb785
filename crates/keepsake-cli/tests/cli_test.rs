//! End-to-end CLI tests against a temporary database.

use std::path::Path;

use clap::Parser;
use keepsake_cli::{Args, CliError, RedbStore, run};
use keepsake_core::{RecordStore, SimEnv};
use tempfile::tempdir;

/// Run `keepsake <argv>` with cheap key derivation, returning stdout and
/// stderr.
fn keepsake(db: &Path, argv: &[&str]) -> (Result<(), CliError>, String, String) {
    let db = db.to_str().unwrap();
    let mut full = vec!["keepsake", "--db", db, "--iterations", "16"];
    full.extend_from_slice(argv);
    let args = Args::try_parse_from(full).unwrap();

    let mut out = Vec::new();
    let mut notices = Vec::new();
    let result = run(args, &mut out, &mut notices);
    (result, String::from_utf8(out).unwrap(), String::from_utf8(notices).unwrap())
}

#[test]
fn add_list_show_with_right_passphrase() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("vault.redb");
    let key = "my-super-secret-key";

    let (result, id, _) = keepsake(&db, &[
        "--passphrase", key, "add", "password", "--title", "Server", "--username", "root",
        "--password", "secure_password_123",
    ]);
    result.unwrap();
    let id = id.trim().to_owned();

    let (result, listing, _) = keepsake(&db, &["--passphrase", key, "list"]);
    result.unwrap();
    assert!(listing.contains("Server"));
    assert!(!listing.contains("secure_password_123"));

    let (result, detail, _) = keepsake(&db, &["--passphrase", key, "show", id.as_str()]);
    result.unwrap();
    assert!(detail.contains("secure_password_123"));
}

#[test]
fn wrong_passphrase_is_rejected_and_retryable() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("vault.redb");

    let (result, _, _) =
        keepsake(&db, &["--passphrase", "right", "add", "note", "--title", "t", "--note", "n"]);
    result.unwrap();

    let (result, out, notices) = keepsake(&db, &["--passphrase", "wrong-key", "list"]);

    assert!(matches!(result, Err(CliError::WrongPassphrase)));
    assert!(result.is_err_and(|err| err.is_retryable()));
    assert!(out.is_empty(), "nothing may be printed for a wrong passphrase");
    assert!(notices.contains("wrong master passphrase"));
}

#[test]
fn wrong_passphrase_cannot_add_records() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("vault.redb");

    keepsake(&db, &["--passphrase", "right", "add", "note", "--title", "t", "--note", "n"])
        .0
        .unwrap();
    let (result, _, _) =
        keepsake(&db, &["--passphrase", "wrong", "add", "note", "--title", "x", "--note", "y"]);

    assert!(matches!(result, Err(CliError::WrongPassphrase)));
    let store = RedbStore::open_with_env(&db, SimEnv::default()).unwrap();
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn missing_passphrase() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("vault.redb");

    let (result, _, _) = keepsake(&db, &["list"]);

    assert!(matches!(result, Err(CliError::MissingPassphrase)));
}

#[test]
fn list_filters_by_kind() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("vault.redb");
    let pw = ["--passphrase", "k"];

    for argv in [
        &["add", "password", "--title", "Login", "--username", "u"][..],
        &["add", "note", "--title", "Diary", "--note", "dear diary"][..],
        &["add", "link", "--title", "Docs", "--url", "https://example.com"][..],
    ] {
        keepsake(&db, &[&pw[..], argv].concat()).0.unwrap();
    }

    let list = [&pw[..], &["list", "--kind", "note"][..]].concat();
    let (result, listing, _) = keepsake(&db, &list);
    result.unwrap();

    assert!(listing.contains("Diary"));
    assert!(!listing.contains("Login"));
    assert!(!listing.contains("Docs"));
}

#[test]
fn edit_and_delete() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("vault.redb");

    let (result, id, _) =
        keepsake(&db, &["--passphrase", "k", "add", "note", "--title", "t", "--note", "old"]);
    result.unwrap();
    let id = id.trim().to_owned();

    let edit = ["--passphrase", "k", "edit", id.as_str(), "note", "--title", "t2", "--note", "new"];
    keepsake(&db, &edit).0.unwrap();
    let (_, detail, _) = keepsake(&db, &["--passphrase", "k", "show", id.as_str()]);
    assert!(detail.contains("new"));
    assert!(detail.contains("t2"));

    keepsake(&db, &["--passphrase", "k", "delete", id.as_str()]).0.unwrap();
    let (result, _, _) = keepsake(&db, &["--passphrase", "k", "show", id.as_str()]);
    assert!(matches!(result, Err(CliError::NotFound(_))));
}

#[test]
fn auto_lock_setting_roundtrip() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("vault.redb");

    let (result, shown, _) = keepsake(&db, &["auto-lock"]);
    result.unwrap();
    assert!(shown.starts_with("auto-lock: 5 minutes"));

    keepsake(&db, &["auto-lock", "60000"]).0.unwrap();
    let (_, shown, _) = keepsake(&db, &["auto-lock"]);
    assert!(shown.starts_with("auto-lock: 1 minute"));
}

#[test]
fn generate_prints_password() {
    let dir = tempdir().unwrap();
    let (result, out, _) = keepsake(&dir.path().join("v.redb"), &["generate", "--length", "24"]);

    result.unwrap();
    assert_eq!(out.trim_end().len(), 24);
}

#[test]
fn invalid_iterations_rejected() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("v.redb");
    let args = Args::try_parse_from([
        "keepsake",
        "--db",
        db.to_str().unwrap(),
        "--iterations",
        "0",
        "generate",
    ])
    .unwrap();

    let result = run(args, &mut Vec::new(), &mut Vec::new());
    assert!(matches!(result, Err(CliError::Config(_))));
}
