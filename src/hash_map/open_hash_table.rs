//! OpenHashTable - string-keyed open-addressing hash set
//!
//! Keys live directly in a power-of-two array of [`Slot`]s. Collisions are
//! resolved by a pluggable [`ProbeStrategy`] (double hashing by default) and
//! removal leaves a tombstone so probe chains that ran through the removed key
//! stay intact. The table doubles once the load factor reaches the configured
//! threshold; every growth re-places the live keys into a fresh array and
//! drops all tombstones.
//!
//! # Examples
//!
//! ```rust
//! use openhash::hash_map::OpenHashTable;
//!
//! let mut table = OpenHashTable::new();
//! assert!(table.insert("cat").unwrap());
//! assert!(!table.insert("cat").unwrap());
//! assert!(table.contains("cat"));
//! assert!(table.remove("cat"));
//! assert!(!table.contains("cat"));
//! ```

use crate::config::table::{GrowthPolicy, TableConfig, MIN_CAPACITY};
use crate::config::Config;
use crate::error::{OpenHashError, Result};
use crate::hash_map::probe_strategy::{DoubleHashing, ProbeStrategy};
use std::mem;

/// One cell of the table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Slot {
    /// Never held a key since the last growth
    #[default]
    Empty,
    /// Holds a live key
    Occupied(String),
    /// Held a key that was removed
    Deleted,
}

impl Slot {
    /// Check if slot is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    /// Check if slot holds a live key
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    /// Check if slot is a tombstone
    pub fn is_deleted(&self) -> bool {
        matches!(self, Slot::Deleted)
    }

    /// The live key, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Slot::Occupied(key) => Some(key),
            _ => None,
        }
    }
}

/// Outcome of walking a key's probe sequence
enum Probe {
    /// Key is stored at this index
    Found(usize),
    /// Key is absent; it would be placed at this index
    Vacant { index: usize, tombstone: bool },
    /// Every slot is occupied by another key
    Exhausted,
}

/// Open-addressing hash set of strings
///
/// Generic over the probe strategy `P`, fixed at construction.
#[derive(Debug, Clone)]
pub struct OpenHashTable<P = DoubleHashing> {
    /// Slot array, length is the capacity
    slots: Vec<Slot>,
    /// Occupied slots
    len: usize,
    /// Tombstones
    deleted: usize,
    /// Configuration
    config: TableConfig,
    /// Candidate sequence generator
    strategy: P,
}

impl OpenHashTable<DoubleHashing> {
    /// Create an 8-slot table with the default configuration
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::Empty; MIN_CAPACITY],
            len: 0,
            deleted: 0,
            config: TableConfig::default(),
            strategy: DoubleHashing::default(),
        }
    }

    /// Create a table with at least `min_capacity` slots
    ///
    /// The slot count is rounded up to the next power of two, minimum 8.
    pub fn with_capacity(min_capacity: usize) -> Result<Self> {
        Self::with_config(TableConfig::with_capacity(min_capacity.max(1)))
    }

    /// Create a table from a configuration
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_strategy(config, DoubleHashing::default())
    }
}

impl Default for OpenHashTable<DoubleHashing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ProbeStrategy> OpenHashTable<P> {
    /// Create a table with a custom probe strategy
    pub fn with_strategy(config: TableConfig, strategy: P) -> Result<Self> {
        config.validate()?;
        let capacity = config.effective_capacity()?;
        Ok(Self {
            slots: allocate_slots(capacity)?,
            len: 0,
            deleted: 0,
            config,
            strategy,
        })
    }

    /// Insert a key
    ///
    /// Returns `Ok(false)` without touching the table if the key is already
    /// present. An error means growth could not allocate or would pass
    /// `max_capacity`; the table is left exactly as it was before the call.
    pub fn insert(&mut self, key: &str) -> Result<bool> {
        let (mut index, mut tombstone) = match self.locate(key) {
            Probe::Found(_) => return Ok(false),
            Probe::Vacant { index, tombstone } => (index, tombstone),
            Probe::Exhausted => probe_exhausted(key, self.slots.len()),
        };

        let growth_policy = self.config.growth_policy;
        if growth_policy == GrowthPolicy::BeforeInsert && self.reaches_threshold(self.len + 1) {
            self.grow()?;
            index = self.vacant_index(key);
            tombstone = false;
        }

        let previous = mem::replace(&mut self.slots[index], Slot::Occupied(key.to_owned()));
        self.len += 1;
        if tombstone {
            self.deleted -= 1;
            log::trace!("Reused tombstone at slot {} for key {:?}", index, key);
        }

        if growth_policy == GrowthPolicy::AfterInsert && self.reaches_threshold(self.len) {
            if let Err(e) = self.grow() {
                self.slots[index] = previous;
                self.len -= 1;
                if tombstone {
                    self.deleted += 1;
                }
                return Err(e);
            }
        }
        Ok(true)
    }

    /// Slot index holding `key`, if present
    pub fn find(&self, key: &str) -> Option<usize> {
        match self.locate(key) {
            Probe::Found(index) => Some(index),
            _ => None,
        }
    }

    /// Check if the table holds `key`
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Remove a key, leaving a tombstone
    ///
    /// Returns `false` if the key was not present. Never shrinks the table.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.locate(key) {
            Probe::Found(index) => {
                self.slots[index] = Slot::Deleted;
                self.len -= 1;
                self.deleted += 1;
                true
            }
            _ => false,
        }
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot count, always a power of two
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Live keys divided by capacity
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    /// Number of tombstones
    pub fn deleted_count(&self) -> usize {
        self.deleted
    }

    /// Configuration the table was built with
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Probe strategy in use
    pub fn strategy(&self) -> &P {
        &self.strategy
    }

    /// Slot array in index order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Iterate over live keys in slot order
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Remove every key and tombstone, keeping the capacity
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.len = 0;
        self.deleted = 0;
    }

    /// Rebuild at the current capacity, dropping all tombstones
    pub fn revoke_deleted(&mut self) -> Result<()> {
        if self.deleted == 0 {
            return Ok(());
        }
        self.rebuild(self.slots.len())
    }

    /// Grow so that `additional` more keys fit without a rehash
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let target = self
            .len
            .checked_add(additional)
            .ok_or_else(|| OpenHashError::capacity_overflow(usize::MAX))?;
        let mut capacity = self.slots.len();
        while self.reaches_threshold_at(target, capacity) {
            capacity = capacity
                .checked_mul(2)
                .ok_or_else(|| OpenHashError::capacity_overflow(capacity))?;
        }
        if capacity != self.slots.len() {
            self.rebuild(capacity)?;
        }
        Ok(())
    }

    fn reaches_threshold(&self, count: usize) -> bool {
        self.reaches_threshold_at(count, self.slots.len())
    }

    fn reaches_threshold_at(&self, count: usize, capacity: usize) -> bool {
        count as f64 / capacity as f64 >= self.config.max_load_factor
    }

    // Deleted slots never end the walk; only Empty does.
    fn locate(&self, key: &str) -> Probe {
        let capacity = self.slots.len();
        let mut first_deleted = None;
        for index in self.strategy.probe(key, capacity).take(capacity) {
            match &self.slots[index] {
                Slot::Empty => {
                    return Probe::Vacant {
                        index: first_deleted.unwrap_or(index),
                        tombstone: first_deleted.is_some(),
                    }
                }
                Slot::Occupied(stored) if stored == key => return Probe::Found(index),
                Slot::Occupied(_) => {}
                Slot::Deleted => {
                    first_deleted.get_or_insert(index);
                }
            }
        }
        match first_deleted {
            Some(index) => Probe::Vacant {
                index,
                tombstone: true,
            },
            None => Probe::Exhausted,
        }
    }

    // Only valid when `key` is known to be absent.
    fn vacant_index(&self, key: &str) -> usize {
        match first_free(&self.strategy, &self.slots, key) {
            Some(index) => index,
            None => probe_exhausted(key, self.slots.len()),
        }
    }

    fn grow(&mut self) -> Result<()> {
        let capacity = self.slots.len();
        let doubled = capacity
            .checked_mul(2)
            .ok_or_else(|| OpenHashError::capacity_overflow(capacity))?;
        self.rebuild(doubled)
    }

    fn rebuild(&mut self, new_capacity: usize) -> Result<()> {
        self.config.check_capacity(new_capacity)?;
        // Allocate before touching the old array so failure leaves it intact
        let mut fresh = allocate_slots(new_capacity)?;
        let old_capacity = self.slots.len();
        let dropped = self.deleted;

        let mut moved = 0;
        for slot in mem::take(&mut self.slots) {
            if let Slot::Occupied(key) = slot {
                let index = match first_free(&self.strategy, &fresh, &key) {
                    Some(index) => index,
                    None => probe_exhausted(&key, new_capacity),
                };
                fresh[index] = Slot::Occupied(key);
                moved += 1;
            }
        }
        assert_eq!(moved, self.len, "rehash moved {} keys, expected {}", moved, self.len);

        self.slots = fresh;
        self.deleted = 0;
        log::debug!(
            "Rehashed table from {} to {} slots ({} keys, {} tombstones dropped)",
            old_capacity,
            new_capacity,
            moved,
            dropped
        );
        Ok(())
    }
}

/// Iterator over live keys, see [`OpenHashTable::keys`]
#[derive(Debug, Clone)]
pub struct Keys<'a> {
    slots: std::slice::Iter<'a, Slot>,
    remaining: usize,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let key = self.slots.by_ref().find_map(Slot::key)?;
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Keys<'_> {}

impl<'a, P: ProbeStrategy> IntoIterator for &'a OpenHashTable<P> {
    type Item = &'a str;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Keys<'a> {
        self.keys()
    }
}

fn allocate_slots(capacity: usize) -> Result<Vec<Slot>> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity).map_err(|_| {
        OpenHashError::out_of_memory(capacity.saturating_mul(mem::size_of::<Slot>()))
    })?;
    slots.resize(capacity, Slot::Empty);
    Ok(slots)
}

// First non-occupied candidate; callers guarantee `key` is not in `slots`.
fn first_free<P: ProbeStrategy>(strategy: &P, slots: &[Slot], key: &str) -> Option<usize> {
    let capacity = slots.len();
    strategy
        .probe(key, capacity)
        .take(capacity)
        .find(|&index| !slots[index].is_occupied())
}

#[cold]
fn probe_exhausted(key: &str, capacity: usize) -> ! {
    log::error!(
        "Probe sequence for {:?} exhausted all {} slots without a free slot",
        key,
        capacity
    );
    panic!(
        "open hash table invariant violated: no free slot for {:?} among {} slots",
        key, capacity
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_map::hash_functions::HornerHash;
    use crate::hash_map::probe_strategy::LinearProbing;
    use std::iter::Chain;
    use std::ops::Range;

    fn home_slot<P: ProbeStrategy>(table: &OpenHashTable<P>, key: &str) -> usize {
        table
            .strategy()
            .probe(key, table.capacity())
            .next()
            .unwrap()
    }

    /// A key other than `key` whose first candidate matches `key`'s
    fn colliding_key<P: ProbeStrategy>(table: &OpenHashTable<P>, key: &str) -> String {
        let home = home_slot(table, key);
        (0..10_000)
            .map(|i| format!("k{}", i))
            .find(|candidate| candidate != key && home_slot(table, candidate) == home)
            .unwrap()
    }

    #[test]
    fn test_basic_scenario() {
        let mut table = OpenHashTable::with_capacity(8).unwrap();
        assert!(table.insert("cat").unwrap());
        assert!(table.insert("dog").unwrap());
        assert!(!table.insert("cat").unwrap());
        assert!(table.contains("dog"));
        assert!(table.remove("cat"));
        assert!(!table.contains("cat"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_new_defaults() {
        let table = OpenHashTable::new();
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert_eq!(table.load_factor(), 0.0);
        assert!(table.slots().iter().all(Slot::is_empty));
    }

    #[test]
    fn test_capacity_rounding() {
        assert_eq!(OpenHashTable::with_capacity(0).unwrap().capacity(), 8);
        assert_eq!(OpenHashTable::with_capacity(5).unwrap().capacity(), 8);
        assert_eq!(OpenHashTable::with_capacity(9).unwrap().capacity(), 16);
        assert_eq!(OpenHashTable::with_capacity(1000).unwrap().capacity(), 1024);
    }

    #[test]
    fn test_find_returns_slot_index() {
        let mut table = OpenHashTable::new();
        table.insert("cat").unwrap();
        // "cat" starts probing at slot 2 in an 8-slot table
        assert_eq!(table.find("cat"), Some(2));
        assert_eq!(table.slots()[2].key(), Some("cat"));
        assert_eq!(table.find("dog"), None);
    }

    #[test]
    fn test_duplicate_leaves_load_factor() {
        let mut table = OpenHashTable::new();
        table.insert("a").unwrap();
        let before = table.load_factor();
        assert!(!table.insert("a").unwrap());
        assert_eq!(table.load_factor(), before);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_load_factor_steps() {
        let mut table = OpenHashTable::new();
        for (i, key) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            table.insert(key).unwrap();
            assert_eq!(table.load_factor(), (i + 1) as f64 / 8.0);
        }
    }

    #[test]
    fn test_growth_after_insert() {
        let mut table = OpenHashTable::new();
        for key in ["k1", "k2", "k3", "k4", "k5"] {
            assert!(table.insert(key).unwrap());
        }
        assert_eq!(table.capacity(), 8);
        assert!(table.insert("k6").unwrap());
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.load_factor(), 6.0 / 16.0);
        for key in ["k1", "k2", "k3", "k4", "k5", "k6"] {
            assert!(table.contains(key));
        }
    }

    #[test]
    fn test_growth_before_insert() {
        let config = TableConfig {
            growth_policy: GrowthPolicy::BeforeInsert,
            ..TableConfig::default()
        };
        let mut table = OpenHashTable::with_config(config).unwrap();
        for key in ["k1", "k2", "k3", "k4", "k5"] {
            table.insert(key).unwrap();
        }
        assert_eq!(table.capacity(), 8);

        // Duplicates never trigger growth
        assert!(!table.insert("k1").unwrap());
        assert_eq!(table.capacity(), 8);

        assert!(table.insert("k6").unwrap());
        assert_eq!(table.capacity(), 16);
        assert!(table.load_factor() < 0.75);
        for key in ["k1", "k2", "k3", "k4", "k5", "k6"] {
            assert!(table.contains(key));
        }
    }

    #[test]
    fn test_remove_semantics() {
        let mut table = OpenHashTable::new();
        table.insert("k").unwrap();
        assert!(table.remove("k"));
        assert!(!table.contains("k"));
        assert!(!table.remove("k"));
        assert!(!table.remove("never"));
        assert_eq!(table.deleted_count(), 1);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_remove_keeps_chain_intact() {
        let mut table = OpenHashTable::new();
        let first = "cat".to_string();
        let second = colliding_key(&table, &first);

        table.insert(&first).unwrap();
        table.insert(&second).unwrap();
        assert_ne!(table.find(&first), table.find(&second));

        assert!(table.remove(&first));
        assert!(table.slots()[home_slot(&table, &first)].is_deleted());
        assert!(table.contains(&second));
        assert!(table.remove(&second));
        assert!(table.is_empty());
    }

    #[test]
    fn test_tombstone_reuse() {
        let mut table = OpenHashTable::new();
        let first = "cat".to_string();
        let second = colliding_key(&table, &first);
        let home = home_slot(&table, &first);

        table.insert(&first).unwrap();
        table.remove(&first);
        assert_eq!(table.deleted_count(), 1);

        assert!(table.insert(&second).unwrap());
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.deleted_count(), 0);
        assert_eq!(table.find(&second), Some(home));
    }

    #[test]
    fn test_duplicate_detected_past_tombstone() {
        let mut table = OpenHashTable::new();
        let first = "cat".to_string();
        let second = colliding_key(&table, &first);

        table.insert(&first).unwrap();
        table.insert(&second).unwrap();
        table.remove(&first);

        // The tombstone sits before `second` in its chain
        assert!(!table.insert(&second).unwrap());
        assert_eq!(table.len(), 1);
        assert_eq!(table.deleted_count(), 1);
    }

    #[test]
    fn test_rehash_drops_tombstones() {
        let mut table = OpenHashTable::new();
        for i in 0..5 {
            table.insert(&format!("key{}", i)).unwrap();
        }
        table.remove("key0");
        table.remove("key1");
        assert_eq!(table.deleted_count(), 2);

        for i in 5..10 {
            table.insert(&format!("key{}", i)).unwrap();
        }
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.len(), 8);
        assert_eq!(table.deleted_count(), 0);
        assert_eq!(
            table.slots().iter().filter(|s| s.is_deleted()).count(),
            table.deleted_count()
        );
        for i in 2..10 {
            assert!(table.contains(&format!("key{}", i)));
        }
    }

    #[test]
    fn test_full_of_tombstones_terminates() {
        let mut table = OpenHashTable::new();
        for round in 0..20 {
            for i in 0..5 {
                table.insert(&format!("r{}k{}", round, i)).unwrap();
            }
            for i in 0..5 {
                assert!(table.remove(&format!("r{}k{}", round, i)));
            }
        }
        assert_eq!(table.capacity(), 8);
        assert!(table.is_empty());
        assert!(!table.contains("missing"));
        assert!(table.insert("fresh").unwrap());
        assert!(table.contains("fresh"));
    }

    #[test]
    fn test_empty_string_key() {
        let mut table = OpenHashTable::new();
        assert!(!table.contains(""));
        assert!(table.insert("").unwrap());
        assert!(!table.insert("").unwrap());
        assert!(table.contains(""));
        assert!(table.remove(""));
        assert!(!table.contains(""));
    }

    #[test]
    fn test_keys_iteration() {
        let mut table = OpenHashTable::new();
        for key in ["x", "y", "z"] {
            table.insert(key).unwrap();
        }
        table.remove("y");

        let mut keys: Vec<_> = table.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["x", "z"]);
        assert_eq!(table.keys().len(), 2);
        assert_eq!((&table).into_iter().count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut table = OpenHashTable::new();
        for i in 0..20 {
            table.insert(&i.to_string()).unwrap();
        }
        table.remove("3");
        let capacity = table.capacity();

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.deleted_count(), 0);
        assert_eq!(table.capacity(), capacity);
        assert!(!table.contains("4"));
    }

    #[test]
    fn test_revoke_deleted() {
        let mut table = OpenHashTable::with_capacity(64).unwrap();
        for i in 0..30 {
            table.insert(&format!("v{}", i)).unwrap();
        }
        for i in 0..15 {
            table.remove(&format!("v{}", i));
        }
        assert_eq!(table.deleted_count(), 15);

        table.revoke_deleted().unwrap();
        assert_eq!(table.deleted_count(), 0);
        assert_eq!(table.capacity(), 64);
        assert_eq!(table.len(), 15);
        assert!(table.slots().iter().all(|s| !s.is_deleted()));
        for i in 15..30 {
            assert!(table.contains(&format!("v{}", i)));
        }

        // No tombstones means nothing to do
        table.revoke_deleted().unwrap();
        assert_eq!(table.len(), 15);
    }

    #[test]
    fn test_reserve() {
        let mut table = OpenHashTable::new();
        table.reserve(100).unwrap();
        let capacity = table.capacity();
        assert_eq!(capacity, 256);

        for i in 0..100 {
            table.insert(&format!("r{}", i)).unwrap();
        }
        assert_eq!(table.capacity(), capacity);

        // Already large enough
        table.reserve(0).unwrap();
        assert_eq!(table.capacity(), capacity);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TableConfig {
            max_load_factor: 1.0,
            ..TableConfig::default()
        };
        assert!(OpenHashTable::with_config(config).is_err());
        assert!(matches!(
            OpenHashTable::with_capacity(usize::MAX),
            Err(OpenHashError::CapacityOverflow { .. })
        ));
    }

    #[test]
    fn test_linear_probing_strategy() {
        let strategy = LinearProbing::<HornerHash>::default();
        let mut table = OpenHashTable::with_strategy(TableConfig::default(), strategy).unwrap();
        for i in 0..100 {
            assert!(table.insert(&format!("lin{}", i)).unwrap());
        }
        assert_eq!(table.len(), 100);
        assert!(table.capacity().is_power_of_two());
        for i in 0..100 {
            assert!(table.contains(&format!("lin{}", i)));
        }
        assert!(!table.contains("lin100"));
    }

    #[test]
    fn test_higher_load_factor_config() {
        let config = TableConfig {
            max_load_factor: 0.875,
            ..TableConfig::default()
        };
        let mut table = OpenHashTable::with_config(config).unwrap();
        for i in 0..6 {
            table.insert(&format!("d{}", i)).unwrap();
        }
        assert_eq!(table.capacity(), 8);
        table.insert("d6").unwrap();
        assert_eq!(table.capacity(), 16);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut table = OpenHashTable::new();
        table.insert("shared").unwrap();
        let mut copy = table.clone();
        copy.remove("shared");
        assert!(table.contains("shared"));
        assert!(!copy.contains("shared"));
    }

    /// Yields no candidates at all
    #[derive(Debug, Clone)]
    struct NoCandidates;

    impl ProbeStrategy for NoCandidates {
        type Sequence = Range<usize>;

        fn probe(&self, _key: &str, _capacity: usize) -> Self::Sequence {
            0..0
        }
    }

    #[test]
    fn test_empty_sequence_finds_nothing() {
        let table = OpenHashTable::with_strategy(TableConfig::default(), NoCandidates).unwrap();
        assert_eq!(table.find("x"), None);
        assert!(!table.contains("x"));
    }

    #[test]
    #[should_panic(expected = "open hash table invariant violated")]
    fn test_exhausted_sequence_panics() {
        let mut table = OpenHashTable::with_strategy(TableConfig::default(), NoCandidates).unwrap();
        let _ = table.insert("x");
    }

    /// Home slot from the first letter ('a' is 0), then linear with wrap-around
    #[derive(Debug, Clone)]
    struct FirstLetter;

    impl ProbeStrategy for FirstLetter {
        type Sequence = Chain<Range<usize>, Range<usize>>;

        fn probe(&self, key: &str, capacity: usize) -> Self::Sequence {
            let letter = key.bytes().next().map_or(0, |b| b.wrapping_sub(b'a') as usize);
            let home = letter & (capacity - 1);
            (home..capacity).chain(0..home)
        }
    }

    fn capped(policy: GrowthPolicy) -> TableConfig {
        TableConfig {
            growth_policy: policy,
            max_capacity: Some(8),
            ..TableConfig::default()
        }
    }

    #[test]
    fn test_failed_growth_rolls_back_insert() {
        let mut table = OpenHashTable::with_config(capped(GrowthPolicy::AfterInsert)).unwrap();
        for key in ["k1", "k2", "k3", "k4", "k5"] {
            assert!(table.insert(key).unwrap());
        }
        let before: Vec<Slot> = table.slots().to_vec();

        assert!(matches!(
            table.insert("k6"),
            Err(OpenHashError::CapacityOverflow { requested: 16 })
        ));
        assert_eq!(table.len(), 5);
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.load_factor(), 0.625);
        assert_eq!(table.deleted_count(), 0);
        assert_eq!(table.slots(), &before[..]);
        assert!(!table.contains("k6"));

        // Duplicates never reach the growth check
        assert!(!table.insert("k1").unwrap());
    }

    #[test]
    fn test_failed_growth_restores_tombstone() {
        let mut table =
            OpenHashTable::with_strategy(capped(GrowthPolicy::AfterInsert), FirstLetter).unwrap();
        for key in ["a", "b", "c", "d", "e"] {
            assert!(table.insert(key).unwrap());
        }
        assert!(table.remove("a"));
        assert!(table.insert("f").unwrap());
        assert_eq!(table.find("f"), Some(5));
        assert_eq!((table.len(), table.deleted_count()), (5, 1));

        // "aa" walks past the tombstone at 0 to the Empty at 6, then takes slot 0
        assert!(table.insert("aa").is_err());
        assert!(table.slots()[0].is_deleted());
        assert_eq!(table.len(), 5);
        assert_eq!(table.deleted_count(), 1);
        assert!(!table.contains("aa"));
        for key in ["b", "c", "d", "e", "f"] {
            assert!(table.contains(key));
        }
    }

    #[test]
    fn test_failed_growth_before_insert_leaves_table_untouched() {
        let mut table = OpenHashTable::with_config(capped(GrowthPolicy::BeforeInsert)).unwrap();
        for key in ["k1", "k2", "k3", "k4", "k5"] {
            assert!(table.insert(key).unwrap());
        }
        let before: Vec<Slot> = table.slots().to_vec();
        assert!(table.insert("k6").is_err());
        assert_eq!(table.slots(), &before[..]);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_reserve_respects_max_capacity() {
        let config = TableConfig {
            max_capacity: Some(64),
            ..TableConfig::default()
        };
        let mut table = OpenHashTable::with_config(config).unwrap();
        table.insert("x").unwrap();
        table.reserve(40).unwrap();
        assert_eq!(table.capacity(), 64);
        assert!(matches!(
            table.reserve(100),
            Err(OpenHashError::CapacityOverflow { requested: 256 })
        ));
        assert_eq!(table.capacity(), 64);
        assert!(table.contains("x"));
    }
}
