use log::{debug, warn};
use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the random draws used by the tallying rules.
///
/// `pick(min, max)` returns a value `n` with `min <= n <= max`, drawn uniformly.
///
/// The caller must guarantee `min <= max`. An empty range is a programming
/// error: the implementations of this crate panic on it.
pub trait RandomPicker {
    fn pick(&mut self, min: usize, max: usize) -> usize;
}

fn check_range(min: usize, max: usize) {
    assert!(
        min <= max,
        "RandomPicker::pick: empty range [{}, {}]",
        min,
        max
    );
}

enum Source {
    Os(StdRng),
    Fallback(SmallRng),
}

/// Draws backed by the operating system entropy.
///
/// If the operating system cannot provide a seed, it falls back on a fast
/// pseudo-random generator seeded from the clock. The draws are then
/// hard to guess for a user, but not cryptographically secure.
pub struct SystemPicker {
    source: Source,
}

impl SystemPicker {
    pub fn new() -> SystemPicker {
        let source = match StdRng::try_from_os_rng() {
            Ok(rng) => Source::Os(rng),
            Err(e) => {
                warn!(
                    "SystemPicker: no entropy from the operating system ({}), using a clock-seeded generator",
                    e
                );
                let nanos = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or(0);
                Source::Fallback(SmallRng::seed_from_u64(nanos))
            }
        };
        SystemPicker { source }
    }

    pub fn is_cryptographic(&self) -> bool {
        matches!(self.source, Source::Os(_))
    }
}

impl Default for SystemPicker {
    fn default() -> Self {
        SystemPicker::new()
    }
}

impl RandomPicker for SystemPicker {
    fn pick(&mut self, min: usize, max: usize) -> usize {
        check_range(min, max);
        match &mut self.source {
            Source::Os(rng) => rng.random_range(min..=max),
            Source::Fallback(rng) => rng.random_range(min..=max),
        }
    }
}

/// Reproducible draws from a fixed seed.
pub struct SeededPicker {
    rng: StdRng,
}

impl SeededPicker {
    pub fn new(seed: u64) -> SeededPicker {
        debug!("SeededPicker: seed {}", seed);
        SeededPicker {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomPicker for SeededPicker {
    fn pick(&mut self, min: usize, max: usize) -> usize {
        check_range(min, max);
        self.rng.random_range(min..=max)
    }
}
