use std::hint::black_box;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::TableResult;
use crate::table::HashTable;

/// Wall-clock time for `rounds` passes of `find` over `keys`.
pub fn time_lookups<K, V>(table: &dyn HashTable<K, V>, keys: &[K], rounds: usize) -> Duration {
    let now: Instant = Instant::now();
    for _ in 0..rounds {
        for key in keys {
            black_box(table.find(key));
        }
    }
    now.elapsed()
}

/// Keys to insert plus a shuffled search sequence mixing hits and misses.
#[derive(Debug, Clone)]
pub struct LookupWorkload {
    pub entries: Vec<(String, i32)>,
    pub searches: Vec<String>,
}

impl LookupWorkload {
    /// Share of searches that target an inserted key, out of ten.
    const HITS_PER_TEN: usize = 7;

    /// `n` unique keys and `m` searches drawn from a generator seeded with `seed`.
    pub fn generate(n: usize, m: usize, seed: u64) -> Self {
        let mut rng: StdRng = StdRng::seed_from_u64(seed);
        let entries: Vec<(String, i32)> = (0..n)
            .map(|i| {
                let key: String = format!("key_{}_{}", rng.gen_range(0..=1_000_000), i);
                (key, rng.gen_range(0..=1000))
            })
            .collect();

        let mut searches: Vec<String> = (0..m)
            .map(|i| {
                if i % 10 < Self::HITS_PER_TEN && !entries.is_empty() {
                    entries[i % entries.len()].0.clone()
                } else {
                    format!("search_key_{}", rng.gen_range(0..=1_000_000))
                }
            })
            .collect();
        searches.shuffle(&mut rng);

        Self { entries, searches }
    }

    pub fn fill(&self, table: &mut dyn HashTable<String, i32>) -> TableResult<()> {
        for (key, value) in &self.entries {
            table.insert(key.clone(), *value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{build_table, TableConfig, TableKind};

    #[test]
    fn workload_is_reproducible() {
        let a: LookupWorkload = LookupWorkload::generate(50, 250, 7);
        let b: LookupWorkload = LookupWorkload::generate(50, 250, 7);
        assert_eq!(a.entries, b.entries);
        assert_eq!(a.searches, b.searches);
        assert_eq!(a.entries.len(), 50);
        assert_eq!(a.searches.len(), 250);
    }

    #[test]
    fn searches_mix_hits_and_misses() {
        let workload: LookupWorkload = LookupWorkload::generate(100, 500, 1);
        let hits: usize = workload
            .searches
            .iter()
            .filter(|s| s.starts_with("key_"))
            .count();
        assert_eq!(hits, 350);
    }

    #[test]
    fn timed_lookups_see_every_inserted_key() {
        let workload: LookupWorkload = LookupWorkload::generate(200, 1000, 99);
        for kind in [TableKind::Chaining, TableKind::OpenAddressing] {
            let mut table: Box<dyn HashTable<String, i32>> =
                build_table(kind, TableConfig::default());
            workload.fill(table.as_mut()).unwrap();
            assert_eq!(table.len(), 200);
            for (key, value) in &workload.entries {
                assert_eq!(table.find(key), Some(value));
            }
            let _elapsed: Duration = time_lookups(table.as_ref(), &workload.searches, 2);
        }
    }
}
