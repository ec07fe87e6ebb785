//! Client settings.
//!
//! Settings are plain key/value strings kept next to the record store. The
//! only setting today is the auto-lock timeout.

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use crate::store::StoreError;

/// Settings key for the auto-lock timeout.
pub const AUTO_LOCK_KEY: &str = "keepsake-auto-lock-timeout";

/// Key/value persistence for client settings.
pub trait SettingsStore: Clone + Send + Sync + 'static {
    /// Stored value for `key`. `None` if never set.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory settings for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemorySettings {
    /// Empty settings.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Inactivity timeout before the vault locks itself, in milliseconds.
///
/// Zero disables auto-lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AutoLockTimeout(u64);

impl AutoLockTimeout {
    /// Auto-lock disabled.
    pub const DISABLED: Self = Self(0);

    /// Five minutes.
    pub const DEFAULT: Self = Self(300_000);

    /// Timeout of `millis` milliseconds; zero disables.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Milliseconds; zero when disabled.
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Whether auto-lock is off.
    pub const fn is_disabled(self) -> bool {
        self.0 == 0
    }

    /// The timeout as a duration. `None` when disabled.
    pub fn as_duration(self) -> Option<Duration> {
        (!self.is_disabled()).then(|| Duration::from_millis(self.0))
    }

    /// Parse a stored decimal value.
    ///
    /// Surrounding whitespace is ignored. Negative or non-numeric values
    /// yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse().ok().map(Self)
    }
}

impl Default for AutoLockTimeout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for AutoLockTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match AUTO_LOCK_PRESETS.iter().find(|preset| preset.timeout == *self) {
            Some(preset) => f.write_str(preset.label),
            None => write!(f, "{} ms", self.0),
        }
    }
}

/// A named timeout offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoLockPreset {
    /// Human-readable label.
    pub label: &'static str,
    /// Timeout it selects.
    pub timeout: AutoLockTimeout,
}

/// Timeouts offered to the user, shortest first.
pub const AUTO_LOCK_PRESETS: [AutoLockPreset; 7] = [
    AutoLockPreset { label: "never", timeout: AutoLockTimeout::DISABLED },
    AutoLockPreset { label: "30 seconds", timeout: AutoLockTimeout(30_000) },
    AutoLockPreset { label: "1 minute", timeout: AutoLockTimeout(60_000) },
    AutoLockPreset { label: "2 minutes", timeout: AutoLockTimeout(120_000) },
    AutoLockPreset { label: "5 minutes", timeout: AutoLockTimeout::DEFAULT },
    AutoLockPreset { label: "10 minutes", timeout: AutoLockTimeout(600_000) },
    AutoLockPreset { label: "30 minutes", timeout: AutoLockTimeout(1_800_000) },
];

/// Read the auto-lock timeout.
///
/// Missing or unparsable values fall back to [`AutoLockTimeout::DEFAULT`].
///
/// # Errors
///
/// - `StoreError`: the settings store failed
pub fn load_auto_lock<S: SettingsStore>(settings: &S) -> Result<AutoLockTimeout, StoreError> {
    let Some(raw) = settings.get(AUTO_LOCK_KEY)? else {
        return Ok(AutoLockTimeout::DEFAULT);
    };

    Ok(AutoLockTimeout::parse(&raw).unwrap_or_else(|| {
        tracing::warn!(value = %raw, "ignoring unparsable auto-lock timeout");
        AutoLockTimeout::DEFAULT
    }))
}

/// Persist the auto-lock timeout as a decimal string.
pub fn save_auto_lock<S: SettingsStore>(
    settings: &S,
    timeout: AutoLockTimeout,
) -> Result<(), StoreError> {
    settings.set(AUTO_LOCK_KEY, &timeout.as_millis().to_string())
}
