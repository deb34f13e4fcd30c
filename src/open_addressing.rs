use std::fmt::{Debug, Write};
use std::hash::{BuildHasher, Hash};

use log::{debug, error, trace, warn};

use crate::error::{TableError, TableResult};
use crate::hash::{hash_key, DefaultHashBuilder, ProbeSeq};
use crate::table::{grown_capacity, HashTable, TableConfig};

#[derive(Debug, Clone)]
enum Slot<K, V> {
    Empty,
    Occupied(K, V),
    /// Tombstone left by `remove`. Skipped by searches, reusable by inserts.
    Deleted,
}

impl<K, V> Slot<K, V> {
    #[inline]
    fn holds(&self, key: &K) -> bool
    where
        K: Eq,
    {
        matches!(self, Slot::Occupied(k, _) if k == key)
    }
}

/// Walk used to re-place live entries while rehashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RehashProbe {
    /// Re-place entries along the same double-hashing walk that `find` follows.
    #[default]
    DoubleHash,
    /// Re-place entries at `h1`, then `h1 + 1`, `h1 + 2`, ...
    ///
    /// This is the legacy placement. An entry pushed off its `h1` by this walk can
    /// sit behind an Empty slot on its double-hashing walk, where `find` and
    /// `remove` stop before reaching it. Inserts still see it, since the update
    /// pass covers every slot.
    Linear,
}

/// Open addressing over a single flat slot array, probed by double hashing.
#[derive(Debug, Clone)]
pub struct OpenAddressingTable<K, V, S = DefaultHashBuilder> {
    count: usize,
    tombstones: usize,
    load_factor_threshold: f64,
    rehash_probe: RehashProbe,
    slots: Vec<Slot<K, V>>,
    hash_builder: S,
}

impl<K, V> OpenAddressingTable<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V> Default for OpenAddressingTable<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> OpenAddressingTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub fn with_config_and_hasher(config: TableConfig, hash_builder: S) -> Self {
        Self {
            count: 0,
            tombstones: 0,
            load_factor_threshold: config.load_factor_threshold(),
            rehash_probe: RehashProbe::default(),
            slots: Self::empty_slots(config.capacity()),
            hash_builder,
        }
    }

    pub fn with_rehash_probe(mut self, rehash_probe: RehashProbe) -> Self {
        self.rehash_probe = rehash_probe;
        self
    }

    pub fn rehash_probe(&self) -> RehashProbe {
        self.rehash_probe
    }

    /// Number of Deleted slots awaiting the next rehash.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Slot index currently holding `key`, following the same walk as `find`.
    pub fn position(&self, key: &K) -> Option<usize> {
        let hash: u64 = hash_key(&self.hash_builder, key);
        for index in ProbeSeq::double(hash, self.slots.len()) {
            match &self.slots[index] {
                Slot::Empty => return None,
                slot if slot.holds(key) => return Some(index),
                _ => {}
            }
        }
        None
    }

    fn empty_slots(capacity: usize) -> Vec<Slot<K, V>> {
        let mut slots: Vec<Slot<K, V>> = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Slot::Empty);
        slots
    }

    /// Claims the first Empty or Deleted slot on the walk for `hash`, handing the
    /// pair back if the walk finds none.
    fn claim(&mut self, hash: u64, key: K, value: V) -> Result<(), (K, V)> {
        let capacity: usize = self.slots.len();
        for index in ProbeSeq::double(hash, capacity) {
            match self.slots[index] {
                Slot::Empty => {}
                Slot::Deleted => {
                    trace!("reusing tombstone at slot {}", index);
                    self.tombstones -= 1;
                }
                Slot::Occupied(..) => continue,
            }
            self.slots[index] = Slot::Occupied(key, value);
            self.count += 1;
            return Ok(());
        }
        Err((key, value))
    }

    /// Replaces the slot array with `new_capacity` Empty slots and re-places every
    /// live entry. Tombstones are dropped.
    fn rehash(&mut self, new_capacity: usize) {
        let old_capacity: usize = self.slots.len();
        let old: Vec<Slot<K, V>> =
            std::mem::replace(&mut self.slots, Self::empty_slots(new_capacity));
        for slot in old {
            if let Slot::Occupied(key, value) = slot {
                let hash: u64 = hash_key(&self.hash_builder, &key);
                let mut walk: ProbeSeq = match self.rehash_probe {
                    RehashProbe::DoubleHash => ProbeSeq::double(hash, new_capacity),
                    RehashProbe::Linear => ProbeSeq::linear(hash, new_capacity),
                };
                // both walks cover every slot and new_capacity exceeds the live count
                if let Some(index) = walk.find(|&i| matches!(self.slots[i], Slot::Empty)) {
                    self.slots[index] = Slot::Occupied(key, value);
                }
            }
        }
        debug!(
            "open addressing rehash {} -> {} slots, {} entries, {} tombstones dropped",
            old_capacity, new_capacity, self.count, self.tombstones
        );
        self.tombstones = 0;
    }
}

impl<K, V, S> HashTable<K, V> for OpenAddressingTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) -> TableResult<Option<V>> {
        let hash: u64 = hash_key(&self.hash_builder, &key);

        // update pass: an existing key may sit anywhere on its walk
        for index in ProbeSeq::double(hash, self.slots.len()) {
            if let Slot::Occupied(k, v) = &mut self.slots[index] {
                if *k == key {
                    return Ok(Some(std::mem::replace(v, value)));
                }
            }
        }

        let new_capacity: usize =
            grown_capacity(self.count, self.slots.len(), self.load_factor_threshold)?;
        if new_capacity != self.slots.len() {
            self.rehash(new_capacity);
        }

        let (key, value) = match self.claim(hash, key, value) {
            Ok(()) => return Ok(None),
            Err(pair) => pair,
        };

        let capacity: usize = self.slots.len();
        warn!(
            "no free slot for insert in {} slots ({} live), forcing a rehash",
            capacity, self.count
        );
        let doubled: usize = capacity
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow { capacity })?;
        self.rehash(doubled);
        match self.claim(hash, key, value) {
            Ok(()) => Ok(None),
            Err(_) => {
                error!("insert failed: no free slot in {} slots after rehash", doubled);
                Err(TableError::CapacityExhausted { capacity: doubled })
            }
        }
    }

    fn find(&self, key: &K) -> Option<&V> {
        let hash: u64 = hash_key(&self.hash_builder, key);
        for index in ProbeSeq::double(hash, self.slots.len()) {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied(k, v) if k == key => return Some(v),
                _ => {}
            }
        }
        None
    }

    fn remove(&mut self, key: &K) -> bool {
        match self.position(key) {
            Some(index) => {
                self.slots[index] = Slot::Deleted;
                self.count -= 1;
                self.tombstones += 1;
                trace!("slot {} tombstoned", index);
                true
            }
            None => false,
        }
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Occupied(k, v) => Some((k, v)),
                _ => None,
            })
            .collect()
    }

    fn display(&self) -> String
    where
        K: Debug,
        V: Debug,
    {
        let mut out: String = String::new();
        let _ = writeln!(
            out,
            "open addressing table: size {}, capacity {}, load factor {:.2}",
            self.count,
            self.slots.len(),
            self.load_factor()
        );
        if self.count == 0 && self.tombstones == 0 {
            out.push_str("(empty)\n");
            return out;
        }
        for (i, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => {}
                Slot::Occupied(k, v) => {
                    let _ = writeln!(out, "[{}] {{{:?} -> {:?}}}", i, k, v);
                }
                Slot::Deleted => {
                    let _ = writeln!(out, "[{}] <deleted>", i);
                }
            }
        }
        out
    }

    fn len(&self) -> usize {
        self.count
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn load_factor_threshold(&self) -> f64 {
        self.load_factor_threshold
    }
}
