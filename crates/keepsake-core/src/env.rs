//! Environment abstraction for deterministic testing.
//!
//! Decouples vault logic from system resources (time, randomness). The
//! production [`SystemEnv`] reads the real clocks and the OS RNG; [`SimEnv`]
//! provides a manually advanced clock and a seeded generator so auto-lock
//! timing and generated passwords are reproducible in tests.

use std::{
    ops::Sub,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use keepsake_crypto::{Entropy, OsEntropy};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Abstract environment providing time and randomness.
///
/// Randomness comes from the [`Entropy`] supertrait so the same value can be
/// handed to the cipher.
///
/// # Invariants
///
/// - `now()` never goes backwards
/// - `fill()` uses cryptographically secure entropy in production
pub trait Environment: Entropy + Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production uses `std::time::Instant`; simulation uses the virtual
    /// elapsed time as a `Duration`.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Seconds since the Unix epoch, for record timestamps.
    fn wall_clock_secs(&self) -> u64;

    /// Generates a random `u128`.
    ///
    /// Used for record identifiers.
    fn random_u128(&self) -> u128 {
        let mut bytes = [0u8; 16];
        self.fill(&mut bytes);
        u128::from_be_bytes(bytes)
    }
}

/// Production environment using system time and the OS RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    pub fn new() -> Self {
        Self
    }
}

impl Entropy for SystemEnv {
    fn fill(&self, buffer: &mut [u8]) {
        OsEntropy.fill(buffer);
    }
}

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    #[allow(clippy::expect_used)]
    fn wall_clock_secs(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("invariant: system clock is after Unix epoch (1970-01-01)")
            .as_secs()
    }
}

/// Simulated environment with a manual clock and seeded RNG.
///
/// Clones share the same clock and generator state.
///
/// # Security
///
/// The generator is `ChaCha8` seeded from a `u64`: reproducible, and
/// therefore NOT a source of secrets. Only for tests and simulation.
#[derive(Debug, Clone)]
pub struct SimEnv {
    elapsed_ms: Arc<AtomicU64>,
    epoch_secs: u64,
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SimEnv {
    /// Simulation starting at virtual time zero with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            elapsed_ms: Arc::new(AtomicU64::new(0)),
            epoch_secs: 1_700_000_000,
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    /// Advance the virtual clock.
    pub fn advance(&self, by: Duration) {
        self.elapsed_ms.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Entropy for SimEnv {
    fn fill(&self, buffer: &mut [u8]) {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).fill_bytes(buffer);
    }
}

impl Environment for SimEnv {
    type Instant = Duration;

    fn now(&self) -> Self::Instant {
        Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst))
    }

    fn wall_clock_secs(&self) -> u64 {
        self.epoch_secs + self.elapsed_ms.load(Ordering::SeqCst) / 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_env_time_advances() {
        let env = SystemEnv::new();

        let t1 = env.now();
        std::thread::sleep(Duration::from_millis(5));
        let t2 = env.now();

        assert!(t2 > t1, "time should advance");
    }

    #[test]
    fn system_env_random_bytes_are_random() {
        let env = SystemEnv::new();
        assert_ne!(env.random_u128(), env.random_u128());
    }

    #[test]
    fn sim_env_clock_is_manual() {
        let env = SimEnv::default();
        assert_eq!(env.now(), Duration::ZERO);

        env.advance(Duration::from_secs(3));
        assert_eq!(env.now(), Duration::from_secs(3));
        assert_eq!(env.wall_clock_secs(), 1_700_000_003);
    }

    #[test]
    fn sim_env_clones_share_state() {
        let env = SimEnv::default();
        let clone = env.clone();

        clone.advance(Duration::from_millis(250));
        assert_eq!(env.now(), Duration::from_millis(250));
    }

    #[test]
    fn sim_env_is_reproducible() {
        let a = SimEnv::with_seed(42);
        let b = SimEnv::with_seed(42);

        let mut left = [0u8; 20];
        let mut right = [0u8; 20];
        a.fill(&mut left);
        b.fill(&mut right);

        assert_eq!(left, right);
        assert_ne!(left, [0u8; 20]);
    }

    #[test]
    fn sim_env_clones_share_generator() {
        let env = SimEnv::with_seed(9);
        let clone = env.clone();
        let fresh = SimEnv::with_seed(9);

        let first = clone.random_u128();
        assert_eq!(first, fresh.random_u128());
        assert_ne!(env.random_u128(), first, "clone must advance the shared stream");
    }

    #[test]
    fn sim_env_matches_chacha8_stream() {
        let mut expected = [0u8; 32];
        ChaCha8Rng::seed_from_u64(42).fill_bytes(&mut expected);

        let mut actual = [0u8; 32];
        SimEnv::with_seed(42).fill(&mut actual);

        assert_eq!(actual, expected);
    }

    #[test]
    fn sim_env_seeds_differ() {
        assert_ne!(SimEnv::with_seed(1).random_u128(), SimEnv::with_seed(2).random_u128());
    }
}
