use crate::world_state::WorldState;
use serde::{Deserialize, Serialize};

pub use parking_lot::RwLock;

#[derive(Clone, PartialEq, Eq, Debug, Hash, Copy, Serialize, Deserialize)]
pub enum RunTxMode {
    /// Simulate a transaction and throw its writes away
    Evaluate = 1,
    /// Simulate a transaction and commit it to the ledger
    Submit = 2,
}

impl RunTxMode {
    pub fn is_submit(self) -> bool {
        self == RunTxMode::Submit
    }
}

/// Per-transaction execution context handed to contract code.
pub struct Context<S: WorldState> {
    pub stub: S,
    pub run_mode: RunTxMode,
    pub tx_id: String,
    /// MSP id of the submitting client
    pub creator: String,
}

impl<S: WorldState> Context<S> {
    pub fn new(stub: S, run_mode: RunTxMode, tx_id: String, creator: String) -> Self {
        Context {
            stub,
            run_mode,
            tx_id,
            creator,
        }
    }

    pub fn run_mode(&self) -> RunTxMode {
        self.run_mode
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn into_stub(self) -> S {
        self.stub
    }
}
