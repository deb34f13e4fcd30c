use std::hash::{BuildHasher, Hash};

/// Hasher used when a table is built without an explicit `BuildHasher`.
pub type DefaultHashBuilder = xxhash_rust::xxh3::Xxh3Builder;

/// 2^64 divided by the golden ratio, rounded to the nearest odd integer.
///
/// The golden ratio can be calculated with Python 3 using the following statements:
///
/// ```text
/// from decimal import Decimal
/// golden_ratio = Decimal((Decimal(1.0) + Decimal.sqrt(Decimal(5.0)))/ Decimal(2.0))
/// golden_ratio
/// 1.618033988749894848204586834
/// ```
const GOLDEN_RATIO_MULTIPLIER: u64 = 11400714819323198485;

#[inline]
pub fn hash_key<K, S>(hash_builder: &S, key: &K) -> u64
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    hash_builder.hash_one(key)
}

/// Maps a hash onto `[0, capacity)`. Used for chaining buckets and as `h1` for probing.
#[inline]
pub fn bucket_index(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

/// Second hash for double hashing, always in `[1, capacity - 1]` and coprime with
/// `capacity`, so the probe walk visits every slot exactly once.
///
/// The step comes from the top bits of a Fibonacci (multiplicative) mix of the hash,
/// which is independent of the low bits that pick `h1`.
pub fn probe_step(hash: u64, capacity: usize) -> usize {
    if capacity <= 2 {
        return 1;
    }
    let mixed: u64 = hash.wrapping_mul(GOLDEN_RATIO_MULTIPLIER) >> 32;
    let mut step: usize = 1 + (mixed % (capacity as u64 - 1)) as usize;
    while gcd(step, capacity) != 1 {
        step += 1;
        if step == capacity {
            step = 1;
        }
    }
    step
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t: usize = a % b;
        a = b;
        b = t;
    }
    a
}

/// Yields `(start + i * step) mod capacity` for `i = 0 .. capacity`.
#[derive(Debug, Clone)]
pub struct ProbeSeq {
    index: usize,
    step: usize,
    capacity: usize,
    remaining: usize,
}

impl ProbeSeq {
    pub fn new(start: usize, step: usize, capacity: usize) -> Self {
        Self {
            index: start % capacity,
            step: step % capacity,
            capacity,
            remaining: capacity,
        }
    }

    /// Steady-state double-hashing walk for `hash`.
    pub fn double(hash: u64, capacity: usize) -> Self {
        Self::new(bucket_index(hash, capacity), probe_step(hash, capacity), capacity)
    }

    /// Unit-step walk starting at `h1`.
    pub fn linear(hash: u64, capacity: usize) -> Self {
        Self::new(bucket_index(hash, capacity), 1, capacity)
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current: usize = self.index;
        // (index + step) mod capacity without overflowing near usize::MAX
        self.index = if self.index >= self.capacity - self.step {
            self.index - (self.capacity - self.step)
        } else {
            self.index + self.step
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}
