#![cfg_attr(test, allow(unused_imports))]

pub use baseapp::{BaseApp, SimulatedTx};
pub use tp_core::context::{Context, RunTxMode};
pub use tp_storage::{MemoryDB, SledDB};
pub use tp_types::{transaction::Invocation, Asset, ContractError};

use lazy_static::lazy_static;
use ruc::*;
use std::{
    collections::{BTreeMap, HashMap},
    env::temp_dir,
    path::PathBuf,
    sync::Mutex,
    time::SystemTime,
};
use tp_core::world_state::{page_start, split_page, WorldState};
use tp_storage::StateIterator;
use tp_types::transaction::QueryResponseMetadata;

pub const FARMER_MSP: &str = "Org1MSP";
pub const WHOLESALER_MSP: &str = "Org2MSP";
pub const RETAILER_MSP: &str = "Org3MSP";

lazy_static! {
    pub static ref BASE_APP: Mutex<BaseApp<MemoryDB>> = Mutex::new(new_base_app());
}

/// In-memory world state whose writes land immediately, with switchable failures.
#[derive(Default)]
pub struct MockStub {
    pub state: BTreeMap<String, Vec<u8>>,
    /// Every `get_state` fails with this message.
    pub fail_get: Option<String>,
    /// `put_state` on these keys fails with the mapped message.
    pub fail_put: HashMap<String, String>,
    /// Range scans cannot start.
    pub fail_range: Option<String>,
    /// The scan yields an error in place of the entry at this position.
    pub fail_iter_at: Option<usize>,
}

impl MockStub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(assets: &[Asset]) -> Self {
        let mut stub = Self::new();
        for a in assets {
            stub.insert_json(&a.id, a);
        }
        stub
    }

    pub fn insert_json<T: serde::Serialize>(&mut self, key: &str, value: &T) {
        let bytes = pnk!(serde_json::to_vec(value).c(d!()));
        self.state.insert(key.to_owned(), bytes);
    }

    pub fn insert_raw(&mut self, key: &str, value: &[u8]) {
        self.state.insert(key.to_owned(), value.to_vec());
    }

    fn scan(&self, start: &str, end: &str, limit: Option<usize>) -> Vec<(String, Vec<u8>)> {
        self.state
            .iter()
            .filter(|(k, _)| k.as_str() >= start && (end.is_empty() || k.as_str() < end))
            .take(limit.unwrap_or(usize::MAX))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl WorldState for MockStub {
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(msg) = self.fail_get.as_ref() {
            return Err(eg!(msg.clone()));
        }
        Ok(self.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        if let Some(msg) = self.fail_put.get(key) {
            return Err(eg!(msg.clone()));
        }
        self.state.insert(key.to_owned(), value);
        Ok(())
    }

    fn get_state_by_range(&mut self, start: &str, end: &str) -> Result<StateIterator> {
        if let Some(msg) = self.fail_range.as_ref() {
            return Err(eg!(msg.clone()));
        }
        let fail_at = self.fail_iter_at;
        let items = self
            .scan(start, end, None)
            .into_iter()
            .enumerate()
            .map(|(i, kv)| {
                if Some(i) == fail_at {
                    Err(eg!("iterator failure"))
                } else {
                    Ok(kv)
                }
            })
            .collect();
        Ok(StateIterator::with_results(items))
    }

    fn get_state_by_range_with_pagination(
        &mut self,
        start: &str,
        end: &str,
        page_size: u32,
        bookmark: &str,
    ) -> Result<(StateIterator, QueryResponseMetadata)> {
        if let Some(msg) = self.fail_range.as_ref() {
            return Err(eg!(msg.clone()));
        }
        let entries = self.scan(
            page_start(start, bookmark),
            end,
            Some(page_size as usize + 1),
        );
        let (page, meta) = split_page(entries, page_size);
        Ok((StateIterator::new(page), meta))
    }
}

/// A transaction context over `stub`, as the farmer org.
pub fn mock_context(stub: MockStub) -> Context<MockStub> {
    Context::new(stub, RunTxMode::Submit, "mock-tx".to_owned(), FARMER_MSP.to_owned())
}

pub fn new_base_app() -> BaseApp<MemoryDB> {
    BaseApp::new(MemoryDB::new(), false)
}

pub fn new_sled_base_app() -> BaseApp<SledDB> {
    pnk!(BaseApp::<SledDB>::open(create_temp_db_path().as_path()))
}

pub fn create_temp_db_path() -> PathBuf {
    let time = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = temp_dir();
    path.push(format!("temp-trace-db-{}", time));
    path
}

/// A farmer-stage record with every later stage empty.
pub fn farmer_asset(id: &str) -> Asset {
    Asset {
        id: id.to_owned(),
        farmer_id: "F100".to_owned(),
        farmer_name: "Green Acres".to_owned(),
        farm_location: "Nashik".to_owned(),
        variety: "Roma".to_owned(),
        batch_no: "B100".to_owned(),
        harvest_date: "2024-05-01".to_owned(),
        price: "1500".to_owned(),
        quantity: "300".to_owned(),
        ..Default::default()
    }
}

pub fn create_invocation(asset: &Asset) -> Invocation {
    Invocation::new("CreateAsset", asset.to_args())
}
