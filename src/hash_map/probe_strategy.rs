//! Probe strategies for the open-addressing table
//!
//! A [`ProbeStrategy`] turns a key and the table's current capacity into a
//! probe session: an iterator of candidate slot indices. The session owns
//! all per-operation state (the base hashes and the iteration counter), so a
//! strategy instance is immutable and can be shared by every operation on a
//! table without state leaking from one key to the next.
//!
//! Strategies must yield exactly `capacity` candidates and every index in
//! `[0, capacity)` exactly once. The table relies on this to bound a full
//! scan.

use crate::hash_map::hash_functions::{HornerHash, ReverseHornerHash, StringHash};

/// Produces the candidate slot sequence for a key
pub trait ProbeStrategy {
    /// Per-operation probe session
    type Sequence: Iterator<Item = usize>;

    /// Start a fresh probe session for `key` in a table of `capacity` slots
    ///
    /// `capacity` is a power of two, at least 2.
    fn probe(&self, key: &str, capacity: usize) -> Self::Sequence;
}

/// Double hashing over two Horner hashes
///
/// The i-th candidate is `(h1 + i * (2 * h2 + 1)) mod capacity` with
/// `h1 = primary(key, capacity)` and `h2 = secondary(key, capacity / 2)`.
/// The step is always odd, so with a power-of-two capacity the sequence is a
/// permutation of all slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoubleHashing<H1 = HornerHash, H2 = ReverseHornerHash> {
    primary: H1,
    secondary: H2,
}

impl<H1, H2> DoubleHashing<H1, H2>
where
    H1: StringHash,
    H2: StringHash,
{
    /// Combine two string hashes
    pub fn new(primary: H1, secondary: H2) -> Self {
        Self { primary, secondary }
    }

    /// The hash that picks the home slot
    pub fn primary(&self) -> &H1 {
        &self.primary
    }

    /// The hash that picks the step
    pub fn secondary(&self) -> &H2 {
        &self.secondary
    }
}

impl<H1, H2> ProbeStrategy for DoubleHashing<H1, H2>
where
    H1: StringHash,
    H2: StringHash,
{
    type Sequence = DoubleHashProbe;

    fn probe(&self, key: &str, capacity: usize) -> DoubleHashProbe {
        debug_assert!(capacity.is_power_of_two() && capacity >= 2);
        let home = self.primary.hash(key, capacity);
        let step = 2 * self.secondary.hash(key, capacity / 2) + 1;
        DoubleHashProbe {
            home,
            step,
            mask: capacity - 1,
            iteration: 0,
            remaining: capacity,
        }
    }
}

/// Probe session produced by [`DoubleHashing`]
#[derive(Debug, Clone)]
pub struct DoubleHashProbe {
    home: usize,
    step: usize,
    mask: usize,
    iteration: usize,
    remaining: usize,
}

impl DoubleHashProbe {
    /// Home slot of the key
    pub fn home(&self) -> usize {
        self.home
    }

    /// Distance between consecutive candidates, always odd
    pub fn step(&self) -> usize {
        self.step
    }
}

impl Iterator for DoubleHashProbe {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let index = self
            .home
            .wrapping_add(self.iteration.wrapping_mul(self.step))
            & self.mask;
        self.iteration += 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for DoubleHashProbe {}

/// Linear probing from the forward Horner home slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearProbing<H = HornerHash> {
    hash: H,
}

impl<H: StringHash> LinearProbing<H> {
    /// Probe linearly from `hash`'s home slot
    pub fn new(hash: H) -> Self {
        Self { hash }
    }
}

impl<H: StringHash> ProbeStrategy for LinearProbing<H> {
    type Sequence = LinearProbe;

    fn probe(&self, key: &str, capacity: usize) -> LinearProbe {
        debug_assert!(capacity.is_power_of_two() && capacity >= 2);
        LinearProbe {
            next: self.hash.hash(key, capacity),
            mask: capacity - 1,
            remaining: capacity,
        }
    }
}

/// Probe session produced by [`LinearProbing`]
#[derive(Debug, Clone)]
pub struct LinearProbe {
    next: usize,
    mask: usize,
    remaining: usize,
}

impl Iterator for LinearProbe {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let index = self.next;
        self.next = (self.next + 1) & self.mask;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for LinearProbe {}
