//! BaseApp is the ledger host, this instance manages world-state storage and all module functions,
//! and runs contract invocations in submit or evaluate mode.

#![allow(missing_docs)]

mod app;
mod modules;


pub use app::SimulatedTx;

use crate::modules::ModuleManager;
use module_asset::DefaultGenesisAssets;
use parking_lot::RwLock;
use ruc::*;
use sha2::{Digest, Sha256};
use std::{
    path::Path,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::SystemTime,
};
use tp_storage::{ChainState, LedgerDB, MemoryDB, SledDB};
use tp_types::transaction::Invocation;

const APP_NAME: &str = "toma-trace";
const CHAIN_STATE_NAME: &str = "trace_db";

pub struct BaseApp<D: LedgerDB> {
    /// application name
    pub name: String,
    /// application's version string
    pub version: String,
    /// Committed world state
    pub chain_state: Arc<RwLock<ChainState<D>>>,
    /// Ordered module set
    pub modules: ModuleManager<D>,
    /// Flush the backend on every commit
    flush: bool,
    nonce: AtomicU64,
}

impl<D: LedgerDB> module_asset::Config for BaseApp<D> {
    type GenesisAssets = DefaultGenesisAssets;
}

impl<D: LedgerDB> BaseApp<D> {
    pub fn new(db: D, flush: bool) -> Self {
        let chain_state = Arc::new(RwLock::new(ChainState::new(
            db,
            CHAIN_STATE_NAME.to_owned(),
        )));
        let seed = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();

        BaseApp {
            name: APP_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            chain_state,
            modules: ModuleManager::default(),
            flush,
            nonce: AtomicU64::new(seed),
        }
    }

    /// Height of the last committed transaction.
    pub fn height(&self) -> Result<u64> {
        self.chain_state.read().height().c(d!())
    }

    /// Transaction id: hex SHA-256 over creator, function, args and a fresh nonce.
    pub(crate) fn next_tx_id(&self, creator: &str, inv: &Invocation) -> String {
        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(creator.as_bytes());
        hasher.update(inv.function.as_bytes());
        for arg in inv.args.iter() {
            hasher.update((arg.len() as u64).to_be_bytes());
            hasher.update(arg.as_bytes());
        }
        hasher.update(nonce.to_be_bytes());
        hex::encode(hasher.finalize())
    }
}

impl BaseApp<MemoryDB> {
    pub fn new_in_memory() -> Self {
        Self::new(MemoryDB::new(), false)
    }
}

impl BaseApp<SledDB> {
    /// Opens (or creates) a persistent ledger under `basedir`.
    pub fn open(basedir: &Path) -> Result<Self> {
        let db = SledDB::open(basedir).c(d!())?;
        Ok(Self::new(db, true))
    }
}
