pub mod chain_state;

pub use chain_state::{ChainState, ValidationCode, Version, VersionedValue};

use crate::db::{LedgerDB, StoreKey};
use parking_lot::RwLock;
use ruc::*;
use std::{collections::BTreeMap, sync::Arc};

/// Snapshot of one range query made during simulation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RangeQueryInfo {
    pub lower: StoreKey,
    pub upper: StoreKey,
    pub limit: Option<usize>,
    pub reads: Vec<(StoreKey, Version)>,
}

/// Everything a simulated transaction observed and intends to write.
///
/// `reads` maps each key to the committed version seen first, `None` when
/// the key was absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadWriteSet {
    pub reads: BTreeMap<StoreKey, Option<Version>>,
    pub range_queries: Vec<RangeQueryInfo>,
    pub writes: BTreeMap<StoreKey, Vec<u8>>,
}

impl ReadWriteSet {
    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Transaction simulator over a shared ChainState.
///
/// Reads always go to committed state; buffered writes stay invisible to
/// the same transaction until they are committed.
pub struct State<D: LedgerDB> {
    chain_state: Arc<RwLock<ChainState<D>>>,
    rwset: ReadWriteSet,
}

impl<D: LedgerDB> Clone for State<D> {
    fn clone(&self) -> Self {
        State {
            chain_state: self.chain_state.clone(),
            rwset: self.rwset.clone(),
        }
    }
}

impl<D: LedgerDB> State<D> {
    pub fn new(cs: Arc<RwLock<ChainState<D>>>) -> Self {
        State {
            chain_state: cs,
            rwset: ReadWriteSet::default(),
        }
    }

    pub fn chain_state(&self) -> Arc<RwLock<ChainState<D>>> {
        self.chain_state.clone()
    }

    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let value = self.chain_state.read().get(key).c(d!())?;
        self.rwset
            .reads
            .entry(key.to_vec())
            .or_insert_with(|| value.as_ref().map(|v| v.version));
        Ok(value.map(|v| v.value))
    }

    pub fn exists(&mut self, key: &[u8]) -> Result<bool> {
        self.get(key).map(|v| v.is_some())
    }

    pub fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.rwset.writes.insert(key.to_vec(), value);
    }

    /// Snapshots up to `limit` committed entries of `[lower, upper)`.
    pub fn range(
        &mut self,
        lower: &[u8],
        upper: &[u8],
        limit: Option<usize>,
    ) -> Result<Vec<(StoreKey, Vec<u8>)>> {
        let entries = self.chain_state.read().range(lower, upper, limit).c(d!())?;
        self.rwset.range_queries.push(RangeQueryInfo {
            lower: lower.to_vec(),
            upper: upper.to_vec(),
            limit,
            reads: entries.iter().map(|(k, v)| (k.clone(), v.version)).collect(),
        });
        Ok(entries.into_iter().map(|(k, v)| (k, v.value)).collect())
    }

    pub fn rwset(&self) -> &ReadWriteSet {
        &self.rwset
    }

    pub fn into_rwset(self) -> ReadWriteSet {
        self.rwset
    }

    pub fn discard(&mut self) {
        self.rwset = ReadWriteSet::default();
    }
}
