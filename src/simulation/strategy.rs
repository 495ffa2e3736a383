//! Box-opening strategies.
//!
//! An [`OpeningStrategy`] decides which boxes a single prisoner opens. It sees
//! the box contents only through the slips it reveals, and may open at most
//! `max_opens` boxes. Both built-in rules open each box at most once.

use rand::seq::index;
use rand::RngCore;

use crate::permutation::Permutation;
use crate::types::StrategyKind;

/// Result of one prisoner's turn in the room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Search {
    /// The prisoner saw their own number.
    pub found: bool,
    /// Boxes opened, including the one holding the number when found.
    pub opened: usize,
}

/// A rule a prisoner follows to choose boxes.
pub trait OpeningStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Run prisoner `prisoner` (1-based) against `boxes` with at most `max_opens` openings.
    fn search(
        &self,
        prisoner: usize,
        boxes: &Permutation,
        max_opens: usize,
        rng: &mut dyn RngCore,
    ) -> Search;

    /// Whether the prisoner finds their own number.
    fn evaluate(
        &self,
        prisoner: usize,
        boxes: &Permutation,
        max_opens: usize,
        rng: &mut dyn RngCore,
    ) -> bool {
        self.search(prisoner, boxes, max_opens, rng).found
    }
}

// ── Random opening ────────────────────────────────────────────────────────

/// Open `max_opens` distinct boxes uniformly at random.
///
/// Per-prisoner success probability is `max_opens / N`, independently of the
/// permutation, so all N succeed with probability `(max_opens / N)^N`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomOpening;

impl OpeningStrategy for RandomOpening {
    fn name(&self) -> &str {
        "random"
    }

    fn search(
        &self,
        prisoner: usize,
        boxes: &Permutation,
        max_opens: usize,
        rng: &mut dyn RngCore,
    ) -> Search {
        let n = boxes.len();
        let amount = max_opens.min(n);
        // Sampled indices come out in random order: the order of opening.
        let chosen = index::sample(rng, n, amount);
        for (i, idx) in chosen.iter().enumerate() {
            if boxes.contents(idx + 1) == prisoner {
                return Search {
                    found: true,
                    opened: i + 1,
                };
            }
        }
        Search {
            found: false,
            opened: amount,
        }
    }
}

// ── Cycle following ───────────────────────────────────────────────────────

/// Open the box labelled with one's own number, then the box labelled with
/// each slip read, until one's own number shows up.
///
/// This walks the permutation cycle through `prisoner`, so it succeeds iff
/// that cycle has length ≤ `max_opens`. Consumes no randomness.
#[derive(Clone, Copy, Debug, Default)]
pub struct CycleFollowing;

impl OpeningStrategy for CycleFollowing {
    fn name(&self) -> &str {
        "cycle"
    }

    fn search(
        &self,
        prisoner: usize,
        boxes: &Permutation,
        max_opens: usize,
        _rng: &mut dyn RngCore,
    ) -> Search {
        let mut label = prisoner;
        for opened in 1..=max_opens {
            let slip = boxes.contents(label);
            if slip == prisoner {
                return Search {
                    found: true,
                    opened,
                };
            }
            label = slip;
        }
        Search {
            found: false,
            opened: max_opens,
        }
    }
}

static RANDOM_OPENING: RandomOpening = RandomOpening;
static CYCLE_FOLLOWING: CycleFollowing = CycleFollowing;

/// Built-in strategy for `kind`.
pub fn strategy_for(kind: StrategyKind) -> &'static dyn OpeningStrategy {
    match kind {
        StrategyKind::Random => &RANDOM_OPENING,
        StrategyKind::Cycle => &CYCLE_FOLLOWING,
    }
}
