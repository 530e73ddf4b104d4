//! Polynomial string hashes used by the probe strategies
//!
//! Both hashes evaluate the key bytes as a polynomial with Horner's rule:
//! `acc = acc * multiplier + byte`. The forward hash walks the bytes
//! left-to-right, the reverse hash right-to-left with a different odd
//! multiplier so the pair stays decorrelated for double hashing.
//!
//! Arithmetic wraps in `u64` and the result is reduced modulo the requested
//! size once, after the last byte.
//!
//! # Usage
//!
//! ```rust
//! use openhash::hash_map::{horner_hash, reverse_horner_hash};
//!
//! let slot = horner_hash("cat", 8);
//! assert!(slot < 8);
//! assert_eq!(reverse_horner_hash("cat", 4), reverse_horner_hash("cat", 4));
//! ```

/// Multiplier for the forward Horner hash
pub const FORWARD_MULTIPLIER: u64 = 131;

/// Multiplier for the reverse Horner hash
pub const REVERSE_MULTIPLIER: u64 = 127;

#[inline]
fn horner_step(acc: u64, multiplier: u64, byte: u8) -> u64 {
    acc.wrapping_mul(multiplier).wrapping_add(byte as u64)
}

#[inline]
fn reduce(acc: u64, modulus: usize) -> usize {
    assert!(modulus > 0, "hash modulus must be non-zero");
    (acc % modulus as u64) as usize
}

/// Forward Horner hash of `key` with an explicit multiplier
#[inline]
pub fn horner_hash_with(key: &[u8], multiplier: u64, modulus: usize) -> usize {
    let acc = key
        .iter()
        .fold(0u64, |acc, &byte| horner_step(acc, multiplier, byte));
    reduce(acc, modulus)
}

/// Reverse Horner hash of `key` with an explicit multiplier
#[inline]
pub fn reverse_horner_hash_with(key: &[u8], multiplier: u64, modulus: usize) -> usize {
    let acc = key
        .iter()
        .rev()
        .fold(0u64, |acc, &byte| horner_step(acc, multiplier, byte));
    reduce(acc, modulus)
}

/// Forward Horner hash reduced into `[0, modulus)`
///
/// # Panics
///
/// Panics if `modulus` is zero.
#[inline]
pub fn horner_hash(key: &str, modulus: usize) -> usize {
    horner_hash_with(key.as_bytes(), FORWARD_MULTIPLIER, modulus)
}

/// Reverse Horner hash reduced into `[0, modulus)`
///
/// # Panics
///
/// Panics if `modulus` is zero.
#[inline]
pub fn reverse_horner_hash(key: &str, modulus: usize) -> usize {
    reverse_horner_hash_with(key.as_bytes(), REVERSE_MULTIPLIER, modulus)
}

/// A pure string hash reduced into `[0, modulus)`
pub trait StringHash {
    /// Hash `key` into `[0, modulus)`; `modulus` must be non-zero
    fn hash(&self, key: &str, modulus: usize) -> usize;
}

/// Left-to-right Horner hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HornerHash {
    multiplier: u64,
}

impl HornerHash {
    /// Hash with a custom multiplier
    pub const fn new(multiplier: u64) -> Self {
        Self { multiplier }
    }

    /// The multiplier applied per byte
    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }
}

impl Default for HornerHash {
    fn default() -> Self {
        Self::new(FORWARD_MULTIPLIER)
    }
}

impl StringHash for HornerHash {
    #[inline]
    fn hash(&self, key: &str, modulus: usize) -> usize {
        horner_hash_with(key.as_bytes(), self.multiplier, modulus)
    }
}

/// Right-to-left Horner hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReverseHornerHash {
    multiplier: u64,
}

impl ReverseHornerHash {
    /// Hash with a custom multiplier
    pub const fn new(multiplier: u64) -> Self {
        Self { multiplier }
    }

    /// The multiplier applied per byte
    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }
}

impl Default for ReverseHornerHash {
    fn default() -> Self {
        Self::new(REVERSE_MULTIPLIER)
    }
}

impl StringHash for ReverseHornerHash {
    #[inline]
    fn hash(&self, key: &str, modulus: usize) -> usize {
        reverse_horner_hash_with(key.as_bytes(), self.multiplier, modulus)
    }
}
