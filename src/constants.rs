//! Canonical scenario values.
//!
//! The classic puzzle: 100 prisoners, 100 boxes, 50 openings each. The
//! simulation is parameterized over N, but defaults to this scenario.

/// Number of prisoners (and boxes) in the classic puzzle.
pub const DEFAULT_PRISONERS: usize = 100;

/// Openings allowed per prisoner in the classic puzzle: half the boxes.
pub const DEFAULT_MAX_OPENS: usize = DEFAULT_PRISONERS / 2;

/// Trials per run when none is given.
pub const DEFAULT_TRIALS: usize = 100_000;

/// RNG seed when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Limit on N imposed by the `u16` success-count encoding in raw storage.
pub const MAX_PRISONERS: usize = u16::MAX as usize;

/// `max_opens` for an N-box game when none is given: floor(N / 2).
#[inline]
pub fn default_max_opens(prisoners: usize) -> usize {
    prisoners / 2
}
