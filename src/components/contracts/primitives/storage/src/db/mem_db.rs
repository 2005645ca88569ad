use super::{is_empty_range, DbIter, IterOrder, KVBatch, LedgerDB};
use ruc::*;
use std::{collections::BTreeMap, ops::Bound};

/// In-process world state, lost when the process exits.
#[derive(Default)]
pub struct MemoryDB {
    main: BTreeMap<Vec<u8>, Vec<u8>>,
    aux: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryDB {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }
}

impl LedgerDB for MemoryDB {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.main.get(key).cloned())
    }

    fn get_aux(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.aux.get(key).cloned())
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
        let range = self
            .main
            .range::<[u8], _>((Bound::Included(lower), upper_bound))
            .map(|(k, v)| Ok((k.clone(), v.clone())));
        match order {
            IterOrder::Asc => Box::new(range),
            IterOrder::Desc => Box::new(range.rev()),
        }
    }

    fn commit(&mut self, batch: KVBatch, aux: KVBatch, _flush: bool) -> Result<()> {
        self.main.extend(batch);
        self.aux.extend(aux);
        Ok(())
    }
}
