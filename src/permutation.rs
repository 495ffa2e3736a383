//! Box contents: a random bijection from box labels to prisoner numbers.
//!
//! Labels and numbers are both 1-based. `boxes[b - 1]` is the number on the
//! slip inside box `b`. Every number 1..=N appears exactly once.
//!
//! Cycle structure: following "box x contains f(x)" from any box returns to
//! it after k steps, where k is the length of the cycle through x. The cycle
//! strategy succeeds for prisoner p iff the cycle containing p has length
//! ≤ `max_opens`.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{ConfigurationError, Result};

/// Mapping box label → number inside, a permutation of 1..=N.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    boxes: Vec<usize>,
}

impl Permutation {
    /// Uniform random permutation of 1..=N (fixed points allowed).
    ///
    /// Fisher–Yates shuffle: equivalent to placing slips one box at a time,
    /// each drawn without replacement from the remaining pool.
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut boxes: Vec<usize> = (1..=n).collect();
        boxes.shuffle(rng);
        Self { boxes }
    }

    /// Box `b` contains number `b`.
    pub fn identity(n: usize) -> Self {
        Self {
            boxes: (1..=n).collect(),
        }
    }

    /// Validated construction from explicit contents (`boxes[b - 1]` = number in box `b`).
    pub fn from_boxes(boxes: Vec<usize>) -> Result<Self> {
        if boxes.is_empty() {
            return Err(ConfigurationError::NoPrisoners);
        }
        let n = boxes.len();
        let mut seen = vec![false; n];
        for (i, &number) in boxes.iter().enumerate() {
            if number < 1 || number > n {
                return Err(ConfigurationError::InvalidPermutation(format!(
                    "box {} holds {}, outside 1..={}",
                    i + 1,
                    number,
                    n
                )));
            }
            if std::mem::replace(&mut seen[number - 1], true) {
                return Err(ConfigurationError::InvalidPermutation(format!(
                    "number {} appears more than once",
                    number
                )));
            }
        }
        Ok(Self { boxes })
    }

    /// Build from disjoint cycles written in box-following order:
    /// `[a, b, c]` means box a holds b, box b holds c, box c holds a.
    pub fn from_cycles(n: usize, cycles: &[&[usize]]) -> Result<Self> {
        let mut boxes = vec![0usize; n];
        for cycle in cycles {
            for (i, &label) in cycle.iter().enumerate() {
                let next = cycle[(i + 1) % cycle.len()];
                if label < 1 || label > n {
                    return Err(ConfigurationError::InvalidPermutation(format!(
                        "box label {} outside 1..={}",
                        label, n
                    )));
                }
                boxes[label - 1] = next;
            }
        }
        Self::from_boxes(boxes)
    }

    /// N.
    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Number inside box `label` (1-based).
    ///
    /// # Panics
    ///
    /// Panics if `label` is 0 or greater than N. Use [`Self::try_contents`]
    /// for labels that are not known to be in range.
    #[inline]
    pub fn contents(&self, label: usize) -> usize {
        debug_assert!(
            (1..=self.boxes.len()).contains(&label),
            "box label {label} out of range 1..={}",
            self.boxes.len()
        );
        self.boxes[label - 1]
    }

    /// Number inside box `label`, or `None` if there is no such box.
    #[inline]
    pub fn try_contents(&self, label: usize) -> Option<usize> {
        label.checked_sub(1).and_then(|i| self.boxes.get(i).copied())
    }

    /// All contents in box order.
    #[inline]
    pub fn boxes(&self) -> &[usize] {
        &self.boxes
    }

    /// Every number 1..=N appears exactly once.
    pub fn is_bijection(&self) -> bool {
        let n = self.boxes.len();
        let mut seen = vec![false; n];
        for &number in &self.boxes {
            if number < 1 || number > n || std::mem::replace(&mut seen[number - 1], true) {
                return false;
            }
        }
        true
    }

    /// Length of the cycle through box `label`.
    ///
    /// # Panics
    ///
    /// Panics if `label` is 0 or greater than N.
    pub fn cycle_length_of(&self, label: usize) -> usize {
        let mut len = 1;
        let mut current = self.contents(label);
        while current != label {
            current = self.contents(current);
            len += 1;
        }
        len
    }

    /// Lengths of all disjoint cycles, longest first. Sums to N.
    pub fn cycle_lengths(&self) -> Vec<usize> {
        let n = self.boxes.len();
        let mut visited = vec![false; n];
        let mut lengths = Vec::new();
        for start in 1..=n {
            if visited[start - 1] {
                continue;
            }
            let mut len = 0;
            let mut current = start;
            while !visited[current - 1] {
                visited[current - 1] = true;
                current = self.contents(current);
                len += 1;
            }
            lengths.push(len);
        }
        lengths.sort_unstable_by(|a, b| b.cmp(a));
        lengths
    }

    /// Length of the longest cycle (0 for an empty permutation).
    pub fn longest_cycle(&self) -> usize {
        self.cycle_lengths().first().copied().unwrap_or(0)
    }
}
