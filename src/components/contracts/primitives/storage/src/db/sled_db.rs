use super::{is_empty_range, DbIter, IterOrder, KVBatch, LedgerDB};
use ruc::*;
use sled::{transaction::ConflictableTransactionError, Transactional};
use std::{ops::Bound, path::Path};

const STATE_TREE: &str = "state";
const AUX_TREE: &str = "aux";

/// Persistent world state on top of sled.
pub struct SledDB {
    db: sled::Db,
    state: sled::Tree,
    aux: sled::Tree,
}

impl SledDB {
    /// Opens (or creates) the store under `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path).c(d!())?;
        let state = db.open_tree(STATE_TREE).c(d!())?;
        let aux = db.open_tree(AUX_TREE).c(d!())?;
        Ok(SledDB { db, state, aux })
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush().c(d!()).map(|_| ())
    }
}

impl LedgerDB for SledDB {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.state
            .get(key)
            .c(d!())
            .map(|v| v.map(|iv| iv.to_vec()))
    }

    fn get_aux(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.aux.get(key).c(d!()).map(|v| v.map(|iv| iv.to_vec()))
    }

    fn iter(&self, lower: &[u8], upper: &[u8], order: IterOrder) -> DbIter<'_> {
        if is_empty_range(lower, upper) {
            return Box::new(std::iter::empty());
        }
        let upper_bound = if upper.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(upper)
        };
        let range = self.state.range::<&[u8], _>((Bound::Included(lower), upper_bound));
        let to_kv = |kv: sled::Result<(sled::IVec, sled::IVec)>| {
            kv.map(|(k, v)| (k.to_vec(), v.to_vec())).c(d!())
        };
        match order {
            IterOrder::Asc => Box::new(range.map(to_kv)),
            IterOrder::Desc => Box::new(range.rev().map(to_kv)),
        }
    }

    fn commit(&mut self, batch: KVBatch, aux: KVBatch, flush: bool) -> Result<()> {
        let mut state_batch = sled::Batch::default();
        for (k, v) in batch {
            state_batch.insert(k, v);
        }
        let mut aux_batch = sled::Batch::default();
        for (k, v) in aux {
            aux_batch.insert(k, v);
        }

        // state and height land together or not at all
        (&self.state, &self.aux)
            .transaction(|(state, aux)| {
                state.apply_batch(&state_batch)?;
                aux.apply_batch(&aux_batch)?;
                Ok::<_, ConflictableTransactionError<sled::Error>>(())
            })
            .c(d!())?;

        if flush {
            self.flush().c(d!())?;
        }
        Ok(())
    }
}
