mod mem_db;
mod sled_db;

pub use mem_db::MemoryDB;
pub use sled_db::SledDB;

use ruc::*;

/// key-value pairs
pub type StoreKey = Vec<u8>;
pub type KValue = (StoreKey, Vec<u8>);
pub type KVBatch = Vec<KValue>;

/// iterator
pub type DbIter<'a> = Box<dyn Iterator<Item = Result<KValue>> + 'a>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IterOrder {
    Asc,
    Desc,
}

/// Sorted KV store interface backing the world state
///
/// The primary section holds world-state entries; the auxiliary section
/// holds bookkeeping (such as the committed height) that must never show
/// up in a range scan.
pub trait LedgerDB: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    fn get_aux(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Range iterator over `[lower, upper)`. An empty `upper` leaves the range open.
    fn iter(&self, lower: &[u8], upper: &[u8], order: IterOrder) -> DbIter<'_>;

    /// Writes a batch of primary entries together with auxiliary entries.
    fn commit(&mut self, batch: KVBatch, aux: KVBatch, flush: bool) -> Result<()>;
}

/// Whether `[lower, upper)` can hold any key at all.
pub(crate) fn is_empty_range(lower: &[u8], upper: &[u8]) -> bool {
    !upper.is_empty() && lower >= upper
}
