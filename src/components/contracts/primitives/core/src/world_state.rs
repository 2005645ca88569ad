use ruc::*;
use tp_storage::{iterator::KV, LedgerDB, State, StateIterator};
use tp_types::transaction::QueryResponseMetadata;

/// The ledger stub a contract talks to.
///
/// Keys are strings; an empty range bound leaves that side of the range open.
pub trait WorldState {
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>>;

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    fn get_state_by_range(&mut self, start: &str, end: &str) -> Result<StateIterator>;

    /// One page of `[start, end)`, resuming at `bookmark` when it is set.
    fn get_state_by_range_with_pagination(
        &mut self,
        start: &str,
        end: &str,
        page_size: u32,
        bookmark: &str,
    ) -> Result<(StateIterator, QueryResponseMetadata)>;
}

/// Lower bound of a page: the bookmark when it lies inside the range.
pub fn page_start<'a>(start: &'a str, bookmark: &'a str) -> &'a str {
    if bookmark > start {
        bookmark
    } else {
        start
    }
}

/// Splits `page_size + 1` looked-ahead entries into the page and its metadata.
pub fn split_page(
    mut entries: Vec<KV>,
    page_size: u32,
) -> (Vec<KV>, QueryResponseMetadata) {
    let bookmark = if entries.len() > page_size as usize {
        entries
            .drain(page_size as usize..)
            .next()
            .map(|(k, _)| k)
            .unwrap_or_default()
    } else {
        String::new()
    };
    let meta = QueryResponseMetadata {
        fetched_records_count: entries.len() as u32,
        bookmark,
    };
    (entries, meta)
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eg!("key must not be an empty string"));
    }
    Ok(())
}

fn to_kv(entry: (Vec<u8>, Vec<u8>)) -> Result<KV> {
    let (k, v) = entry;
    String::from_utf8(k).c(d!("non-utf8 key")).map(|k| (k, v))
}

impl<D: LedgerDB> WorldState for State<D> {
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        check_key(key).c(d!())?;
        self.get(key.as_bytes()).c(d!())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        check_key(key).c(d!())?;
        self.set(key.as_bytes(), value);
        Ok(())
    }

    fn get_state_by_range(&mut self, start: &str, end: &str) -> Result<StateIterator> {
        let entries = self
            .range(start.as_bytes(), end.as_bytes(), None)
            .c(d!())?;
        Ok(StateIterator::with_results(
            entries.into_iter().map(to_kv).collect(),
        ))
    }

    fn get_state_by_range_with_pagination(
        &mut self,
        start: &str,
        end: &str,
        page_size: u32,
        bookmark: &str,
    ) -> Result<(StateIterator, QueryResponseMetadata)> {
        if page_size == 0 {
            return Err(eg!("page size must be positive"));
        }
        let lower = page_start(start, bookmark);
        let entries = self
            .range(
                lower.as_bytes(),
                end.as_bytes(),
                Some(page_size as usize + 1),
            )
            .c(d!())?
            .into_iter()
            .map(to_kv)
            .collect::<Result<Vec<_>>>()
            .c(d!())?;
        let (page, meta) = split_page(entries, page_size);
        Ok((StateIterator::new(page), meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::BTreeMap, sync::Arc};
    use tp_storage::{ChainState, MemoryDB, RwLock};

    fn state_with(keys: &[&str]) -> State<MemoryDB> {
        let mut cs = ChainState::new(MemoryDB::new(), "ws".to_owned());
        let writes = keys
            .iter()
            .map(|k| (k.as_bytes().to_vec(), k.as_bytes().to_vec()))
            .collect::<BTreeMap<_, _>>();
        cs.commit(writes, 1, false).unwrap();
        State::new(Arc::new(RwLock::new(cs)))
    }

    #[test]
    fn put_is_buffered_until_commit() {
        let mut state = state_with(&["asset1"]);
        state.put_state("asset2", b"x".to_vec()).unwrap();
        assert_eq!(state.get_state("asset2").unwrap(), None);
        assert_eq!(state.get_state("asset1").unwrap(), Some(b"asset1".to_vec()));
        assert!(state.put_state("", vec![]).is_err());
    }

    #[test]
    fn range_scan_is_ordered() {
        let mut state = state_with(&["asset3", "asset1", "asset2"]);
        let keys = state
            .get_state_by_range("", "")
            .unwrap()
            .map(|kv| kv.unwrap().0)
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["asset1", "asset2", "asset3"]);

        let keys = state
            .get_state_by_range("asset2", "asset3")
            .unwrap()
            .map(|kv| kv.unwrap().0)
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["asset2"]);
    }

    #[test]
    fn pagination_walks_every_key() {
        let mut state = state_with(&["asset1", "asset2", "asset3", "asset4", "asset5"]);
        let mut bookmark = String::new();
        let mut seen = vec![];
        loop {
            let (it, meta) = state
                .get_state_by_range_with_pagination("", "", 2, &bookmark)
                .unwrap();
            let page = it.map(|kv| kv.unwrap().0).collect::<Vec<_>>();
            assert_eq!(meta.fetched_records_count as usize, page.len());
            seen.extend(page);
            if meta.bookmark.is_empty() {
                break;
            }
            bookmark = meta.bookmark;
        }
        assert_eq!(seen, vec!["asset1", "asset2", "asset3", "asset4", "asset5"]);
        assert!(state
            .get_state_by_range_with_pagination("", "", 0, "")
            .is_err());
    }

    #[test]
    fn exact_page_has_empty_bookmark() {
        let mut state = state_with(&["asset1", "asset2"]);
        let (it, meta) = state
            .get_state_by_range_with_pagination("", "", 2, "")
            .unwrap();
        assert_eq!(it.count(), 2);
        assert_eq!(meta.bookmark, "");
    }
}
