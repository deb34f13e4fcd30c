//! Generic key-value tables with two collision-resolution strategies behind one
//! contract: separate chaining and open addressing with double hashing.

pub mod bench;
pub mod chaining;
pub mod error;
pub mod hash;
pub mod logger;
pub mod open_addressing;
pub mod table;

pub use chaining::ChainingTable;
pub use error::{TableError, TableResult};
pub use open_addressing::{OpenAddressingTable, RehashProbe};
pub use table::{build_table, HashTable, TableConfig, TableKind};
