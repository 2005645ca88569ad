//! The ChainState is the committed world state of the ledger.
//!
//! Every value carries the height of the block that last wrote it, which is
//! what read-set validation compares against.
use crate::{
    db::{IterOrder, KVBatch, LedgerDB, StoreKey},
    state::{RangeQueryInfo, ReadWriteSet},
};
use ruc::*;
use std::collections::BTreeMap;

pub type Version = u64;

const HEIGHT_KEY: &[u8] = b"Height";
const VERSION_LEN: usize = std::mem::size_of::<Version>();

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionedValue {
    pub version: Version,
    pub value: Vec<u8>,
}

impl VersionedValue {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(VERSION_LEN + self.value.len());
        buf.extend_from_slice(&self.version.to_be_bytes());
        buf.extend_from_slice(&self.value);
        buf
    }

    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() < VERSION_LEN {
            return Err(eg!(format!(
                "versioned value too short: {} bytes",
                raw.len()
            )));
        }
        let mut ver = [0u8; VERSION_LEN];
        ver.copy_from_slice(&raw[..VERSION_LEN]);
        Ok(VersionedValue {
            version: Version::from_be_bytes(ver),
            value: raw[VERSION_LEN..].to_vec(),
        })
    }
}

/// Outcome of validating a simulated transaction against committed state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationCode {
    Valid,
    /// A key read during simulation changed (or appeared/disappeared).
    MvccReadConflict,
    /// The result of a range query changed.
    PhantomReadConflict,
}

impl ValidationCode {
    pub fn is_valid(self) -> bool {
        self == ValidationCode::Valid
    }
}

/// Concrete ChainState struct containing a reference to an instance of LedgerDB.
pub struct ChainState<D: LedgerDB> {
    name: String,
    db: D,
}

impl<D: LedgerDB> ChainState<D> {
    pub fn new(db: D, name: String) -> Self {
        let name = if name.is_empty() {
            "chain-state".to_owned()
        } else {
            name
        };
        ChainState { name, db }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Height of the last committed block, zero for a fresh ledger.
    pub fn height(&self) -> Result<u64> {
        match self.db.get_aux(HEIGHT_KEY).c(d!())? {
            Some(raw) if raw.len() == VERSION_LEN => {
                let mut h = [0u8; VERSION_LEN];
                h.copy_from_slice(&raw);
                Ok(u64::from_be_bytes(h))
            }
            Some(raw) => Err(eg!(format!(
                "corrupted height entry: {} bytes",
                raw.len()
            ))),
            None => Ok(0),
        }
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<VersionedValue>> {
        match self.db.get(key).c(d!())? {
            Some(raw) => VersionedValue::decode(&raw).c(d!()).map(Some),
            None => Ok(None),
        }
    }

    pub fn version_of(&self, key: &[u8]) -> Result<Option<Version>> {
        self.get(key).map(|v| v.map(|vv| vv.version))
    }

    pub fn exists(&self, key: &[u8]) -> Result<bool> {
        self.db.get(key).map(|v| v.is_some())
    }

    /// Walks `[lower, upper)` in key order until `func` returns true.
    pub fn iterate(
        &self,
        lower: &[u8],
        upper: &[u8],
        order: IterOrder,
        func: &mut dyn FnMut(&[u8], VersionedValue) -> bool,
    ) -> Result<()> {
        for kv in self.db.iter(lower, upper, order) {
            let (k, raw) = kv.c(d!())?;
            let value = VersionedValue::decode(&raw).c(d!())?;
            if func(&k, value) {
                break;
            }
        }
        Ok(())
    }

    /// Collects up to `limit` entries of `[lower, upper)` in ascending order.
    pub fn range(
        &self,
        lower: &[u8],
        upper: &[u8],
        limit: Option<usize>,
    ) -> Result<Vec<(StoreKey, VersionedValue)>> {
        let mut out = vec![];
        if limit == Some(0) {
            return Ok(out);
        }
        self.iterate(lower, upper, IterOrder::Asc, &mut |k, v| {
            out.push((k.to_vec(), v));
            limit.map_or(false, |n| out.len() >= n)
        })
        .c(d!())?;
        Ok(out)
    }

    /// Checks every read of a simulated transaction against committed versions.
    pub fn validate(&self, rwset: &ReadWriteSet) -> Result<ValidationCode> {
        for (key, seen) in rwset.reads.iter() {
            if self.version_of(key).c(d!())? != *seen {
                log::debug!(target: "storage", "{}: stale read on {:?}", self.name, key);
                return Ok(ValidationCode::MvccReadConflict);
            }
        }
        for query in rwset.range_queries.iter() {
            if !self.range_unchanged(query).c(d!())? {
                log::debug!(
                    target: "storage",
                    "{}: range [{:?}, {:?}) changed",
                    self.name,
                    query.lower,
                    query.upper
                );
                return Ok(ValidationCode::PhantomReadConflict);
            }
        }
        Ok(ValidationCode::Valid)
    }

    fn range_unchanged(&self, query: &RangeQueryInfo) -> Result<bool> {
        let current = self
            .range(&query.lower, &query.upper, query.limit)
            .c(d!())?
            .into_iter()
            .map(|(k, v)| (k, v.version))
            .collect::<Vec<_>>();
        Ok(current == query.reads)
    }

    /// Applies a write set at `height`, stamping every value with that height.
    pub fn commit(
        &mut self,
        writes: BTreeMap<StoreKey, Vec<u8>>,
        height: u64,
        flush: bool,
    ) -> Result<u64> {
        let current = self.height().c(d!())?;
        if height <= current {
            return Err(eg!(format!(
                "commit height {} not above current height {}",
                height, current
            )));
        }

        let batch: KVBatch = writes
            .into_iter()
            .map(|(k, value)| {
                let vv = VersionedValue {
                    version: height,
                    value,
                };
                (k, vv.encode())
            })
            .collect();
        let aux = vec![(HEIGHT_KEY.to_vec(), height.to_be_bytes().to_vec())];

        self.db.commit(batch, aux, flush).c(d!())?;
        Ok(height)
    }
}
