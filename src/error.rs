use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    /// No Empty or Deleted slot was reachable on the probe walk, even after a forced rehash.
    #[error("no free slot reachable in a table of capacity {capacity} after a forced rehash")]
    CapacityExhausted { capacity: usize },
    #[error("capacity {capacity} cannot be doubled without overflow")]
    CapacityOverflow { capacity: usize },
    #[error("capacity must be greater than zero")]
    InvalidCapacity,
    #[error("load factor threshold {0} is outside (0, 1]")]
    InvalidLoadFactor(f64),
}

pub type TableResult<T> = Result<T, TableError>;
