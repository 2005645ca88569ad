use ruc::*;
use std::collections::VecDeque;

/// One world-state entry as seen by contract code.
pub type KV = (String, Vec<u8>);

/// Forward-only cursor over a range-query snapshot.
///
/// Once closed (explicitly or on drop) it yields nothing more.
pub struct StateIterator {
    items: VecDeque<Result<KV>>,
    closed: bool,
}

impl StateIterator {
    pub fn new(items: Vec<KV>) -> Self {
        Self::with_results(items.into_iter().map(Ok).collect())
    }

    /// Builds a cursor whose elements may already carry errors.
    pub fn with_results(items: Vec<Result<KV>>) -> Self {
        StateIterator {
            items: items.into(),
            closed: false,
        }
    }

    pub fn empty() -> Self {
        Self::with_results(vec![])
    }

    pub fn has_next(&self) -> bool {
        !self.closed && !self.items.is_empty()
    }

    pub fn close(&mut self) {
        self.items.clear();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Iterator for StateIterator {
    type Item = Result<KV>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.items.pop_front()
    }
}

impl Drop for StateIterator {
    fn drop(&mut self) {
        self.close();
    }
}
