use std::fmt::{Debug, Write};
use std::hash::{BuildHasher, Hash};

use log::debug;

use crate::error::TableResult;
use crate::hash::{bucket_index, hash_key, DefaultHashBuilder};
use crate::table::{grown_capacity, HashTable, TableConfig};

/// Separate chaining: one growable sequence of `(key, value)` pairs per bucket.
#[derive(Debug, Clone)]
pub struct ChainingTable<K, V, S = DefaultHashBuilder> {
    count: usize,
    load_factor_threshold: f64,
    buckets: Vec<Vec<(K, V)>>,
    hash_builder: S,
}

impl<K, V> ChainingTable<K, V, DefaultHashBuilder>
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

impl<K, V> Default for ChainingTable<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainingTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub fn with_config_and_hasher(config: TableConfig, hash_builder: S) -> Self {
        let mut buckets: Vec<Vec<(K, V)>> = Vec::with_capacity(config.capacity());
        buckets.resize_with(config.capacity(), Vec::new);
        Self {
            count: 0,
            load_factor_threshold: config.load_factor_threshold(),
            buckets,
            hash_builder,
        }
    }

    #[inline]
    fn index_of(&self, key: &K) -> usize {
        bucket_index(hash_key(&self.hash_builder, key), self.buckets.len())
    }

    /// Number of pairs chained in the bucket at `index`.
    pub fn bucket_len(&self, index: usize) -> usize {
        self.buckets.get(index).map_or(0, Vec::len)
    }

    /// Moves every pair into `new_capacity` fresh buckets. Keys are unique, so each
    /// pair is appended without scanning its new bucket.
    fn rehash(&mut self, new_capacity: usize) {
        let old_capacity: usize = self.buckets.len();
        let mut buckets: Vec<Vec<(K, V)>> = Vec::with_capacity(new_capacity);
        buckets.resize_with(new_capacity, Vec::new);
        let old: Vec<Vec<(K, V)>> = std::mem::replace(&mut self.buckets, buckets);
        for (key, value) in old.into_iter().flatten() {
            let index: usize = bucket_index(hash_key(&self.hash_builder, &key), new_capacity);
            self.buckets[index].push((key, value));
        }
        debug!(
            "chaining rehash {} -> {} buckets, {} entries",
            old_capacity, new_capacity, self.count
        );
    }
}

impl<K, V, S> HashTable<K, V> for ChainingTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) -> TableResult<Option<V>> {
        let index: usize = self.index_of(&key);
        if let Some(pair) = self.buckets[index].iter_mut().find(|pair| pair.0 == key) {
            return Ok(Some(std::mem::replace(&mut pair.1, value)));
        }

        let new_capacity: usize =
            grown_capacity(self.count, self.buckets.len(), self.load_factor_threshold)?;
        let index: usize = if new_capacity != self.buckets.len() {
            self.rehash(new_capacity);
            self.index_of(&key)
        } else {
            index
        };

        self.buckets[index].push((key, value));
        self.count += 1;
        Ok(None)
    }

    fn find(&self, key: &K) -> Option<&V> {
        self.buckets[self.index_of(key)]
            .iter()
            .find(|pair| pair.0 == *key)
            .map(|pair| &pair.1)
    }

    fn remove(&mut self, key: &K) -> bool {
        let index: usize = self.index_of(key);
        let chain: &mut Vec<(K, V)> = &mut self.buckets[index];
        match chain.iter().position(|pair| pair.0 == *key) {
            Some(position) => {
                chain.remove(position);
                self.count -= 1;
                true
            }
            None => false,
        }
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        self.buckets
            .iter()
            .flatten()
            .map(|(key, value)| (key, value))
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
            "chaining table: size {}, capacity {}, load factor {:.2}",
            self.count,
            self.buckets.len(),
            self.load_factor()
        );
        if self.count == 0 {
            out.push_str("(empty)\n");
            return out;
        }
        for (i, chain) in self.buckets.iter().enumerate() {
            if chain.is_empty() {
                continue;
            }
            let _ = write!(out, "[{}]:", i);
            for (key, value) in chain {
                let _ = write!(out, " {{{:?} -> {:?}}}", key, value);
            }
            out.push('\n');
        }
        out
    }

    fn len(&self) -> usize {
        self.count
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn load_factor_threshold(&self) -> f64 {
        self.load_factor_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::tests::Identity;

    fn identity_table(
        capacity: usize,
        threshold: f64,
    ) -> ChainingTable<u64, &'static str, Identity> {
        let config: TableConfig = TableConfig::new(capacity, threshold).unwrap();
        ChainingTable::with_config_and_hasher(config, Identity::default())
    }

    #[test]
    fn eight_keys_rehash_once() {
        let config: TableConfig = TableConfig::new(5, 0.9).unwrap();
        let mut table: ChainingTable<String, i32> = ChainingTable::with_config(config);
        let mut capacities: Vec<usize> = Vec::new();
        for i in 1..=8 {
            table.insert(format!("key{}", i), i * 100).unwrap();
            capacities.push(table.capacity());
            assert!(table.load_factor() < 0.9);
        }
        assert_eq!(capacities, vec![5, 5, 5, 5, 10, 10, 10, 10]);
        assert_eq!(table.len(), 8);
        assert_eq!(table.capacity(), 10);
        for i in 1..=8 {
            assert_eq!(table.find(&format!("key{}", i)), Some(&(i * 100)));
        }
    }

    #[test]
    fn colliding_keys_share_a_bucket() {
        let mut table = identity_table(4, 1.0);
        table.insert(1, "one").unwrap();
        table.insert(5, "five").unwrap();
        assert_eq!(table.bucket_len(1), 2);
        assert_eq!(table.find(&1), Some(&"one"));
        assert_eq!(table.find(&5), Some(&"five"));
        assert_eq!(table.find(&9), None);
    }

    #[test]
    fn remove_splices_and_keeps_chain_order() {
        let mut table = identity_table(4, 1.0);
        table.insert(1, "a").unwrap();
        table.insert(5, "b").unwrap();
        table.insert(9, "c").unwrap();
        assert_eq!(table.capacity(), 4);
        assert_eq!(table.bucket_len(1), 3);
        // the fourth key doubles to 8 buckets, which splits 5 away from 1, 9 and 17
        table.insert(17, "d").unwrap();
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.bucket_len(1), 3);
        assert_eq!(table.bucket_len(5), 1);
        assert!(table.remove(&9));
        assert!(!table.remove(&9));
        let chain: Vec<(u64, &str)> = table.buckets[1].clone();
        assert_eq!(chain, vec![(1, "a"), (17, "d")]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn update_does_not_grow() {
        let mut table = identity_table(2, 1.0);
        assert_eq!(table.insert(0, "x"), Ok(None));
        assert_eq!(table.capacity(), 2);
        assert_eq!(table.insert(0, "y"), Ok(Some("x")));
        assert_eq!(table.capacity(), 2);
        assert_eq!(table.len(), 1);
        assert_eq!(table.find(&0), Some(&"y"));
    }

    #[test]
    fn display_lists_live_entries() {
        let mut table = identity_table(4, 1.0);
        assert!(table.display().contains("(empty)"));
        table.insert(2, "two").unwrap();
        table.insert(3, "three").unwrap();
        table.remove(&3);
        let shown: String = table.display();
        assert!(shown.contains("[2]: {2 -> \"two\"}"));
        assert!(!shown.contains("three"));
        assert!(shown.starts_with("chaining table: size 1, capacity 4"));
    }
}
