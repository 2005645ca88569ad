#![allow(missing_docs)]

pub mod db;
pub mod iterator;
pub mod state;

pub use db::{IterOrder, KVBatch, KValue, LedgerDB, MemoryDB, SledDB, StoreKey};
pub use iterator::StateIterator;
pub use parking_lot::RwLock;
pub use ruc::{d, Result, RucResult};
pub use state::{
    ChainState, RangeQueryInfo, ReadWriteSet, State, ValidationCode, Version,
    VersionedValue,
};
pub use std::sync::Arc;
