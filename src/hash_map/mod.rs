//! Open-addressing hash table engine
//!
//! - `hash_functions`: forward and reverse Horner string hashes
//! - `probe_strategy`: the `ProbeStrategy` trait with double hashing and
//!   linear probing
//! - `OpenHashTable`: the slot array, growth policy and insert/find/remove

mod hash_functions;
mod open_hash_table;
mod probe_strategy;

pub use open_hash_table::{Keys, OpenHashTable, Slot};

pub use probe_strategy::{
    DoubleHashProbe, DoubleHashing, LinearProbe, LinearProbing, ProbeStrategy,
};

pub use hash_functions::{
    horner_hash, horner_hash_with, reverse_horner_hash, reverse_horner_hash_with, HornerHash,
    ReverseHornerHash, StringHash, FORWARD_MULTIPLIER, REVERSE_MULTIPLIER,
};
