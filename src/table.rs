use std::fmt::Debug;
use std::hash::Hash;

use crate::chaining::ChainingTable;
use crate::error::{TableError, TableResult};
use crate::open_addressing::OpenAddressingTable;

pub const DEFAULT_CAPACITY: usize = 16;
pub const DEFAULT_LOAD_FACTOR_THRESHOLD: f64 = 0.9;

/// Operations shared by every collision-resolution strategy.
///
/// Implementors own all of their storage and rehash themselves from inside
/// [`insert`](HashTable::insert); callers never trigger a resize directly.
pub trait HashTable<K, V> {
    /// Inserts `key` or overwrites its value, returning the previous value on update.
    ///
    /// Inserting an absent key grows the table first if the post-insert load factor
    /// would reach the threshold. Updating an existing key never rehashes.
    fn insert(&mut self, key: K, value: V) -> TableResult<Option<V>>;

    fn find(&self, key: &K) -> Option<&V>;

    /// Returns `true` iff the key was present.
    fn remove(&mut self, key: &K) -> bool;

    /// Every live entry, in storage order.
    fn entries(&self) -> Vec<(&K, &V)>;

    fn display(&self) -> String
    where
        K: Debug,
        V: Debug;

    fn len(&self) -> usize;

    fn capacity(&self) -> usize;

    fn load_factor_threshold(&self) -> f64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    capacity: usize,
    load_factor_threshold: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor_threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
        }
    }
}

impl TableConfig {
    pub fn new(capacity: usize, load_factor_threshold: f64) -> TableResult<Self> {
        if capacity == 0 {
            return Err(TableError::InvalidCapacity);
        }
        // NaN fails both comparisons
        if !(load_factor_threshold > 0.0 && load_factor_threshold <= 1.0) {
            return Err(TableError::InvalidLoadFactor(load_factor_threshold));
        }
        Ok(Self {
            capacity,
            load_factor_threshold,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn load_factor_threshold(&self) -> f64 {
        self.load_factor_threshold
    }
}

/// Returns the capacity a table must grow to before holding `len + 1` entries.
///
/// Doubles `capacity` until `(len + 1) / capacity` drops below `threshold`.
pub(crate) fn grown_capacity(len: usize, capacity: usize, threshold: f64) -> TableResult<usize> {
    let mut new_capacity: usize = capacity;
    while (len + 1) as f64 / new_capacity as f64 >= threshold {
        new_capacity = new_capacity
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow {
                capacity: new_capacity,
            })?;
    }
    Ok(new_capacity)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Chaining,
    OpenAddressing,
}

/// Builds a table of the requested kind behind the shared contract.
pub fn build_table<K, V>(kind: TableKind, config: TableConfig) -> Box<dyn HashTable<K, V>>
where
    K: Hash + Eq + 'static,
    V: 'static,
{
    match kind {
        TableKind::Chaining => Box::new(ChainingTable::with_config(config)),
        TableKind::OpenAddressing => Box::new(OpenAddressingTable::with_config(config)),
    }
}
