//! Plain-text rendering of vault contents.
//!
//! All functions write to any [`Write`] so output can be captured in tests.

use std::io::{self, Write};

use keepsake_core::{AUTO_LOCK_PRESETS, AutoLockTimeout, SecretPayload, UnlockedItem};

/// Longest summary shown in a listing before it is cut.
const SUMMARY_WIDTH: usize = 40;

/// One line per record: id, kind, title and a non-secret summary.
///
/// Passwords are never shown in listings.
pub fn render_items(out: &mut impl Write, items: &[UnlockedItem]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "no records");
    }

    for unlocked in items {
        let line = format!(
            "{}  {:<8}  {:<20}  {}",
            unlocked.item.id,
            unlocked.kind(),
            unlocked.item.title,
            summary(&unlocked.payload)
        );
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

/// Every field of one record, secrets included.
pub fn render_item(out: &mut impl Write, unlocked: &UnlockedItem) -> io::Result<()> {
    writeln!(out, "id:          {}", unlocked.item.id)?;
    writeln!(out, "title:       {}", unlocked.item.title)?;
    writeln!(out, "kind:        {}", unlocked.kind())?;
    writeln!(out, "created:     {}", unlocked.item.created_at)?;

    let fields: Vec<(&str, Option<&String>)> = match &unlocked.payload {
        SecretPayload::Password { username, password } => {
            vec![("username", username.as_ref()), ("password", password.as_ref())]
        },
        SecretPayload::Note { note } => vec![("note", note.as_ref())],
        SecretPayload::Link { url, description } => {
            vec![("url", url.as_ref()), ("description", description.as_ref())]
        },
    };
    for (name, value) in fields {
        if let Some(value) = value {
            writeln!(out, "{:<12} {value}", format!("{name}:"))?;
        }
    }
    Ok(())
}

/// The current timeout and the presets to pick from.
pub fn render_auto_lock(out: &mut impl Write, current: AutoLockTimeout) -> io::Result<()> {
    writeln!(out, "auto-lock: {current}")?;
    for preset in &AUTO_LOCK_PRESETS {
        let marker = if preset.timeout == current { '*' } else { ' ' };
        writeln!(out, "{marker} {:<12} {}", preset.label, preset.timeout.as_millis())?;
    }
    Ok(())
}

fn summary(payload: &SecretPayload) -> String {
    let text = match payload {
        SecretPayload::Password { username, .. } => username.as_deref(),
        SecretPayload::Note { note } => note.as_deref().and_then(|note| note.lines().next()),
        SecretPayload::Link { url, .. } => url.as_deref(),
    };
    let text = text.unwrap_or_default();

    if text.chars().count() <= SUMMARY_WIDTH {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(SUMMARY_WIDTH - 3).collect();
    cut.push_str("...");
    cut
}
